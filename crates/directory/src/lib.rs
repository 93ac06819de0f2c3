//! Tenant directory domain: organizations and their member roster.

pub mod member;
pub mod organization;

pub use member::{AccessLevel, Member, MemberProfile, RegisterMember};
pub use organization::{CommunityType, Organization};

//! Process configuration read from environment variables.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MEMBER_CREDENTIAL_TTL_HOURS: i64 = 24;
/// Upper bound on the member credential lifetime (one leap year).
pub const MAX_MEMBER_CREDENTIAL_TTL_HOURS: i64 = 24 * 366;

const DEV_JWT_SECRET: &str = "dev-secret";
const DEV_CREDENTIAL_SECRET: &str = "dev-credential-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Clone)]
pub struct GatepassConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub credential_secret: String,
    pub member_credential_ttl: Duration,
}

impl core::fmt::Debug for GatepassConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GatepassConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("credential_secret", &"<redacted>")
            .field("member_credential_ttl", &self.member_credential_ttl)
            .finish()
    }
}

impl GatepassConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Unset secrets fall back to
    /// insecure development values with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = lookup("GATEPASS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("GATEPASS_BIND_ADDR", &bind_raw, e.to_string()))?;

        let jwt_secret = secret_or_dev(&lookup, "JWT_SECRET", DEV_JWT_SECRET);
        let credential_secret = secret_or_dev(&lookup, "GATEPASS_CREDENTIAL_SECRET", DEV_CREDENTIAL_SECRET);

        let member_credential_ttl = match lookup("GATEPASS_MEMBER_CREDENTIAL_TTL_HOURS") {
            None => Duration::hours(DEFAULT_MEMBER_CREDENTIAL_TTL_HOURS),
            Some(raw) => {
                let hours = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| ConfigError::invalid("GATEPASS_MEMBER_CREDENTIAL_TTL_HOURS", &raw, e.to_string()))?;
                if hours <= 0 {
                    return Err(ConfigError::invalid(
                        "GATEPASS_MEMBER_CREDENTIAL_TTL_HOURS",
                        &raw,
                        "must be positive",
                    ));
                }
                if hours > MAX_MEMBER_CREDENTIAL_TTL_HOURS {
                    return Err(ConfigError::invalid(
                        "GATEPASS_MEMBER_CREDENTIAL_TTL_HOURS",
                        &raw,
                        format!("must be at most {MAX_MEMBER_CREDENTIAL_TTL_HOURS}"),
                    ));
                }
                Duration::try_hours(hours).ok_or_else(|| {
                    ConfigError::invalid("GATEPASS_MEMBER_CREDENTIAL_TTL_HOURS", &raw, "out of range")
                })?
            }
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            credential_secret,
            member_credential_ttl,
        })
    }
}

fn secret_or_dev(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, dev: &str) -> String {
    match lookup(var).filter(|v| !v.is_empty()) {
        Some(v) => v,
        None => {
            tracing::warn!(var, "secret not set; using insecure dev default");
            dev.to_string()
        }
    }
}

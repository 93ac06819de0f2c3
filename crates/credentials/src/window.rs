use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatepass_core::ValueObject;

use crate::IssuanceError;

/// Closed interval `[start, end]` during which a credential admits entry.
///
/// Deserialization goes through [`ValidityWindow::new`], so a stored or
/// submitted window can never be inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct ValidityWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawWindow> for ValidityWindow {
    type Error = IssuanceError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

/// Where an instant falls relative to a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    Before,
    Within,
    After,
}

impl ValidityWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, IssuanceError> {
        if start > end {
            return Err(IssuanceError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Open-started window: admits everything up to and including `end`.
    pub fn until(end: DateTime<Utc>) -> Self {
        Self {
            start: DateTime::<Utc>::MIN_UTC,
            end,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Both bounds are inclusive.
    pub fn position(&self, now: DateTime<Utc>) -> WindowPosition {
        if now < self.start {
            WindowPosition::Before
        } else if now > self.end {
            WindowPosition::After
        } else {
            WindowPosition::Within
        }
    }

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.position(now) == WindowPosition::After
    }
}

impl ValueObject for ValidityWindow {}

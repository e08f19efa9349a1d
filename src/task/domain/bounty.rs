//! Bounty amount attached to a task.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Positive reward amount with an optional denomination suffix.
///
/// The original text is kept verbatim (`"100"`, `"1000000microSERVDR"`) and
/// never changes after a task is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bounty {
    raw: String,
    amount: u128,
    denom: Option<String>,
}

impl Bounty {
    /// Parses a bounty amount.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyBounty`] when the value is empty after
    /// trimming, or [`TaskDomainError::InvalidBounty`] when the amount is not
    /// a positive integer or the suffix is not alphabetic.
    pub fn parse(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyBounty);
        }

        let digits_end = normalized
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(normalized.len());
        let (digits, suffix) = normalized.split_at(digits_end);
        let amount = digits
            .parse::<u128>()
            .ok()
            .filter(|amount| *amount > 0)
            .ok_or_else(|| TaskDomainError::InvalidBounty(raw.clone()))?;
        if !suffix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(TaskDomainError::InvalidBounty(raw));
        }
        let denom = (!suffix.is_empty()).then(|| suffix.to_owned());

        Ok(Self {
            raw: normalized.to_owned(),
            amount,
            denom,
        })
    }

    /// Returns the numeric amount.
    #[must_use]
    pub const fn amount(&self) -> u128 {
        self.amount
    }

    /// Returns the denomination suffix, if one was given.
    #[must_use]
    pub fn denom(&self) -> Option<&str> {
        self.denom.as_deref()
    }

    /// Returns the bounty as originally written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl TryFrom<String> for Bounty {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Bounty> for String {
    fn from(value: Bounty) -> Self {
        value.raw
    }
}

impl fmt::Display for Bounty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

//! Phone identity with a single canonical storage form.
//!
//! Numbers are normalized exactly once, at construction; nothing in the
//! crate ever probes format variants at read time.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MarketError, MarketResult};

/// A phone number in canonical form: country-code digits only, no `+`,
/// no separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum digits for a country-code-qualified number.
    const MIN_DIGITS: usize = 8;
    /// Maximum digits per E.164.
    const MAX_DIGITS: usize = 15;

    /// Parse and normalize a phone number.
    ///
    /// Accepts an optional leading `+` and common separators (spaces,
    /// hyphens, parentheses); rejects anything else.
    pub fn parse(input: &str) -> MarketResult<Self> {
        let mut digits = String::with_capacity(input.len());
        for (i, c) in input.trim().chars().enumerate() {
            match c {
                '0'..='9' => digits.push(c),
                '+' if i == 0 => {}
                ' ' | '-' | '(' | ')' => {}
                _ => {
                    return Err(MarketError::Validation(format!(
                        "invalid character {c:?} in phone number"
                    )))
                }
            }
        }
        if digits.len() < Self::MIN_DIGITS || digits.len() > Self::MAX_DIGITS {
            return Err(MarketError::Validation(format!(
                "phone number must have {} to {} digits, got {}",
                Self::MIN_DIGITS,
                Self::MAX_DIGITS,
                digits.len()
            )));
        }
        Ok(Self(digits))
    }

    /// The canonical digit string, as stored.
    pub fn as_digits(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}", self.0)
    }
}

/// Contact details resolved from the identity provider for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub phone: PhoneNumber,

    /// Per-user notification opt-out flag; users are opted in by default.
    pub notifications_enabled: bool,
}

//! Core data model shared by the wallet, gateway, and view layers.
//!
//! Everything here is a point-in-time snapshot of state the contract owns.
//! A `Question` can be stale the moment it is returned; callers refetch
//! after any confirmed write instead of patching these values locally.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Decimal places of the chain's base currency unit.
pub const DECIMALS: u32 = 18;

const UNIT: u128 = 10u128.pow(DECIMALS);

/// A chain account address. Stored lowercased so comparisons are
/// case-insensitive regardless of how the provider checksums it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Elided form for display, `0x1234…abcd`.
    pub fn short(&self) -> String {
        if self.0.len() <= 10 {
            return self.0.clone();
        }
        format!("{}…{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque question identifier assigned by the contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A currency amount in base units (wei). Fixed-point with [`DECIMALS`]
/// places; arithmetic saturates rather than wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_base_units(raw: u128) -> Self {
        Self(raw)
    }

    pub fn base_units(self) -> u128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    /// Parses a decimal string such as `"0.01"` into base units. Rejects
    /// anything that is not a plain non-negative decimal with at most
    /// [`DECIMALS`] fractional digits.
    pub fn parse_units(text: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidAmount(text.to_string());
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let (int_part, frac_part) = match trimmed.split_once('.') {
            Some((i, f)) => (i, f),
            None => (trimmed, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if frac_part.len() > DECIMALS as usize {
            return Err(invalid());
        }
        let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !digits(int_part) || !digits(frac_part) {
            return Err(invalid());
        }

        let int: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid())?
        };
        let mut frac: u128 = if frac_part.is_empty() {
            0
        } else {
            frac_part.parse().map_err(|_| invalid())?
        };
        frac *= 10u128.pow(DECIMALS - frac_part.len() as u32);

        int.checked_mul(UNIT)
            .and_then(|v| v.checked_add(frac))
            .map(Amount)
            .ok_or_else(invalid)
    }

    /// Formats as a decimal string with trailing zeros trimmed.
    pub fn format_units(self) -> String {
        let int = self.0 / UNIT;
        let frac = self.0 % UNIT;
        if frac == 0 {
            return int.to_string();
        }
        let frac = format!("{frac:018}");
        format!("{int}.{}", frac.trim_end_matches('0'))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_units())
    }
}

/// Snapshot of one question, assembled by the gateway from several reads.
/// `vote_counts` has the same arity and order as `options`; `has_voted`
/// is relative to the account the snapshot was fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub options: Vec<String>,
    pub vote_counts: Vec<u64>,
    pub is_active: bool,
    pub has_voted: bool,
}

impl Question {
    pub fn total_votes(&self) -> u64 {
        self.vote_counts.iter().sum()
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// Per (account, question) standing: whether the account voted and how
/// much collateral it has deposited there.
#[derive(Debug, Clone, PartialEq)]
pub struct VotingStatus {
    pub question_id: QuestionId,
    pub has_voted: bool,
    pub deposit: Amount,
}

/// Aggregate shown on the landing screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetworkStats {
    pub question_count: u64,
    pub total_votes: u64,
}

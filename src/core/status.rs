//! Expense status - the lifecycle tag that drives every aggregate.
//!
//! Statuses are persisted as text. Reads are lenient: `"Received"` is an alias
//! of `Available`, and anything unrecognised counts as `Outstanding`.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::warn;

/// The four canonical expense statuses.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ExpenseStatus {
    /// Money still to be raised (the default)
    #[default]
    Outstanding,
    /// Promised but not yet received
    Pending,
    /// Received and ready to spend (historically also called "Received")
    #[serde(alias = "Received")]
    Available,
    /// Already paid out
    Spent,
}

impl ExpenseStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 4] = [Self::Outstanding, Self::Pending, Self::Available, Self::Spent];

    /// Canonical stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outstanding => "Outstanding",
            Self::Pending => "Pending",
            Self::Available => "Available",
            Self::Spent => "Spent",
        }
    }

    /// Parses a status name, case-insensitively, accepting `"Received"` for
    /// `Available`. Returns `None` for anything else.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "outstanding" => Some(Self::Outstanding),
            "pending" => Some(Self::Pending),
            "available" | "received" => Some(Self::Available),
            "spent" => Some(Self::Spent),
            _ => None,
        }
    }

    /// Interprets a stored status. Empty values are `Outstanding`; unknown
    /// values are also `Outstanding` but logged, since they point at data
    /// that was written outside the typed API.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        if value.trim().is_empty() {
            return Self::Outstanding;
        }
        Self::parse(value).unwrap_or_else(|| {
            warn!(status = value, "Unknown expense status, counting as Outstanding");
            Self::Outstanding
        })
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown expense status: {s}"))
    }
}

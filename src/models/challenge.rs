// SPDX-License-Identifier: MIT

//! Per-user challenge document stored in Firestore.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::AppError;

/// User id used when a request does not supply one.
pub const DEFAULT_USER_ID: &str = "default_user";

/// Completion history: `YYYY-MM-DD` date key to the set of completed
/// catalog indices for that day.
///
/// A `BTreeMap` keeps keys in chronological order (lexicographic on
/// `YYYY-MM-DD`); a `BTreeSet` bans duplicate indices and serializes as a
/// plain JSON array of integers.
pub type History = BTreeMap<String, BTreeSet<u32>>;

/// Challenge document, one per user, keyed by `user_id`.
///
/// Only raw state is persisted. Rank, level, and stats are derived fresh
/// from `history` on every read so they can never go stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserChallenge {
    /// External user identifier (also the document ID)
    pub user_id: String,
    /// When the challenge started (RFC3339, fixed civil offset)
    pub start_date: String,
    /// Whether the challenge is currently running
    #[serde(default)]
    pub active: bool,
    /// Per-day completed task indices
    #[serde(default)]
    pub history: History,
}

impl UserChallenge {
    /// Create a fresh record for a user starting their first challenge.
    pub fn new(user_id: &str, now: DateTime<FixedOffset>) -> Self {
        Self {
            user_id: user_id.to_string(),
            start_date: now.to_rfc3339(),
            active: true,
            history: History::new(),
        }
    }

    /// Parse the stored start date.
    ///
    /// An unparseable start date is data corruption, not a recoverable
    /// default: silently substituting "today" would corrupt the day
    /// counter for the whole challenge.
    pub fn parsed_start_date(&self) -> Result<DateTime<FixedOffset>, AppError> {
        DateTime::parse_from_rfc3339(&self.start_date).map_err(|e| {
            AppError::MalformedState(format!(
                "start_date '{}' for user '{}' is not a valid RFC3339 timestamp: {}",
                self.start_date, self.user_id, e
            ))
        })
    }

    /// Total lifetime completions across all history dates.
    pub fn total_completions(&self) -> u64 {
        self.history.values().map(|set| set.len() as u64).sum()
    }

    /// Number of distinct dates with a history entry, floored at 1 so
    /// averages over an empty history stay well-defined.
    pub fn active_day_count(&self) -> u64 {
        (self.history.len() as u64).max(1)
    }
}

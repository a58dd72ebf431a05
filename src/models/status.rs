// SPDX-License-Identifier: MIT

//! API view types derived from a challenge record.
//!
//! These are response-only shapes; nothing here is persisted.

use serde::Serialize;

/// Top-level status response.
///
/// `active: false` with no other fields means no challenge record exists
/// for the user.
#[derive(Debug, Serialize)]
pub struct StatusView {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge: Option<ChallengeView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today: Option<TodayView>,
}

impl StatusView {
    /// The response for a user with no challenge record.
    pub fn inactive() -> Self {
        Self {
            active: false,
            challenge: None,
            today: None,
        }
    }
}

/// Challenge-level derived fields.
#[derive(Debug, Serialize)]
pub struct ChallengeView {
    /// 1-based day counter since start
    pub current_day: i64,
    /// Rank letter derived from lifetime average completion
    pub current_rank: String,
    /// Level derived from lifetime completions
    pub current_level: u64,
    pub stats: StatsView,
    /// Stored start date, RFC3339
    pub start_date: String,
}

/// Today-level fields.
#[derive(Debug, Serialize)]
pub struct TodayView {
    pub day_number: i64,
    /// Civil date, `YYYY-MM-DD`
    pub date: String,
    /// Weekday name, "Monday" .. "Sunday"
    pub day_of_week: String,
    pub tasks: Vec<TaskView>,
    pub completion_percentage: f64,
    pub is_sunday: bool,
}

/// One catalog task with today's completion flag.
#[derive(Debug, Serialize)]
pub struct TaskView {
    pub label: String,
    pub scheduled_time: String,
    pub duration_minutes: u32,
    pub completed: bool,
}

/// Gamification attributes, monotone in lifetime completions.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatsView {
    pub strength: u64,
    pub vitality: u64,
    pub agility: u64,
    pub recovery: u64,
}

/// One row of the history report.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryEntry {
    /// Civil date, `YYYY-MM-DD`
    pub date: String,
    pub completion_percentage: f64,
}

// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod catalog;
pub mod challenge;
pub mod status;

pub use catalog::{TaskCatalog, TaskDefinition};
pub use challenge::{History, UserChallenge};
pub use status::{ChallengeView, HistoryEntry, StatsView, StatusView, TaskView, TodayView};

// SPDX-License-Identifier: MIT

//! Levelup-Tracker: personal daily-challenge progress API
//!
//! This crate provides the backend for a multi-week self-improvement
//! challenge: a fixed daily task list, per-day completion history, and
//! derived progress (day counter, rank, level, stats).

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use models::TaskCatalog;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub catalog: TaskCatalog,
}

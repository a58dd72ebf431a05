// SPDX-License-Identifier: MIT

//! Challenge API routes.
//!
//! Thin plumbing around the progress engine: each handler reads the
//! user's document, runs one engine operation with an explicit "now",
//! and persists the result. Concurrent edits for the same user are
//! last-write-wins.

use crate::error::Result;
use crate::models::challenge::DEFAULT_USER_ID;
use crate::models::{HistoryEntry, StatusView};
use crate::services::progress;
use crate::time_utils;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/challenge/current", get(get_current_status))
        .route("/api/challenge/start", post(start_challenge))
        .route("/api/challenge/task", post(update_task))
        .route("/api/challenge/history", get(get_history))
}

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

fn default_days() -> usize {
    30
}

// ─── Current Status ──────────────────────────────────────────

#[derive(Deserialize)]
struct StatusQuery {
    #[serde(default = "default_user_id")]
    user_id: String,
}

/// Get the live status view for a user, or `{"active": false}` when no
/// challenge record exists.
async fn get_current_status(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatusQuery>,
) -> Result<Json<StatusView>> {
    tracing::debug!(user_id = %params.user_id, "Fetching challenge status");

    let Some(record) = state.db.get_challenge(&params.user_id).await? else {
        return Ok(Json(StatusView::inactive()));
    };

    let view = progress::status(&record, &state.catalog, time_utils::civil_now())?;
    Ok(Json(view))
}

// ─── Start Challenge ─────────────────────────────────────────

#[derive(Deserialize)]
struct StartRequest {
    #[serde(default = "default_user_id")]
    user_id: String,
}

#[derive(Serialize)]
pub struct StartResponse {
    pub success: bool,
}

/// Start (or re-affirm) the challenge for a user.
///
/// Starting an already-active challenge is a no-op success.
async fn start_challenge(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartRequest>,
) -> Result<Json<StartResponse>> {
    let existing = state.db.get_challenge(&req.user_id).await?;
    let created = existing.is_none();

    let record = progress::start(
        existing,
        &req.user_id,
        state.config.restart_policy,
        time_utils::civil_now(),
    );
    state.db.upsert_challenge(&record).await?;

    tracing::info!(user_id = %req.user_id, created, "Challenge started");

    Ok(Json(StartResponse { success: true }))
}

// ─── Toggle Task ─────────────────────────────────────────────

#[derive(Deserialize)]
struct TaskUpdateRequest {
    #[serde(default = "default_user_id")]
    user_id: String,
    /// Accepted for wire compatibility with older clients; the history
    /// key is always derived from the server's "now", so past days can
    /// never be edited.
    #[serde(default)]
    #[allow(dead_code)]
    day_number: Option<i64>,
    task_index: u32,
    completed: bool,
}

#[derive(Serialize)]
pub struct TaskUpdateResponse {
    pub success: bool,
    /// Raw percentage for today after the change (no rest-day override)
    pub completion_percentage: f64,
}

/// Mark a task complete or incomplete in today's bucket.
async fn update_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TaskUpdateRequest>,
) -> Result<Json<TaskUpdateResponse>> {
    let mut record = state
        .db
        .get_challenge(&req.user_id)
        .await?
        .ok_or_else(|| crate::error::AppError::NotFound(format!("User {} not found", req.user_id)))?;

    let completion_percentage = progress::toggle_task(
        &mut record,
        state.catalog.len(),
        req.task_index,
        req.completed,
        time_utils::civil_now(),
    )?;

    state.db.update_history(&req.user_id, &record.history).await?;

    tracing::debug!(
        user_id = %req.user_id,
        task_index = req.task_index,
        completed = req.completed,
        completion_percentage,
        "Task toggled"
    );

    Ok(Json(TaskUpdateResponse {
        success: true,
        completion_percentage,
    }))
}

// ─── History ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct HistoryQuery {
    #[serde(default = "default_user_id")]
    user_id: String,
    #[serde(default = "default_days")]
    days: usize,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

/// Per-date completion report: ascending by date, last `days` entries.
/// Absent user yields an empty list, not an error.
async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>> {
    let history = match state.db.get_challenge(&params.user_id).await? {
        Some(record) => progress::history_report(&record, state.catalog.len(), params.days),
        None => Vec::new(),
    };

    Ok(Json(HistoryResponse { history }))
}

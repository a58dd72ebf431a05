// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.

use std::env;

/// Policy for re-starting an inactive challenge.
///
/// The product supports both readings of "start again": keep the original
/// start date so the day counter continues, or reset it for a fresh run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Reactivate and keep the original start date (default).
    PreserveStartDate,
    /// Reactivate with `start_date = now`.
    ResetStartDate,
}

impl RestartPolicy {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::PreserveStartDate),
            "reset" => Ok(Self::ResetStartDate),
            _ => Err(ConfigError::Invalid("RESTART_POLICY")),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID for the Firestore store
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Path to the task catalog JSON file
    pub catalog_path: String,
    /// What "start" does to an inactive challenge's start date
    pub restart_policy: RestartPolicy,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            catalog_path: "data/tasks.json".to_string(),
            restart_policy: RestartPolicy::PreserveStartDate,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            catalog_path: env::var("TASK_CATALOG_PATH")
                .unwrap_or_else(|_| "data/tasks.json".to_string()),
            restart_policy: match env::var("RESTART_POLICY") {
                Ok(raw) => RestartPolicy::parse(&raw)?,
                Err(_) => RestartPolicy::PreserveStartDate,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

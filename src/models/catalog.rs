// SPDX-License-Identifier: MIT

//! The task catalog: the fixed, ordered list of daily tasks.
//!
//! Task identity is positional. History records store catalog indices, so
//! the ordering must never change once users have history referencing it;
//! the catalog is deploy-time data, never user-editable.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One task in the daily list. Identified by its index in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Display label
    pub label: String,
    /// Scheduled time of day, "HH:MM"
    pub scheduled_time: String,
    /// Planned duration in minutes
    pub duration_minutes: u32,
}

/// Immutable ordered task list, injected into the engine via `AppState`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCatalog {
    tasks: Vec<TaskDefinition>,
}

impl TaskCatalog {
    /// Load the catalog from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::Io(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load the catalog from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let catalog: TaskCatalog =
            serde_json::from_str(json_data).map_err(|e| CatalogError::Parse(e.to_string()))?;
        if catalog.tasks.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(catalog)
    }

    /// Build a catalog from an explicit task list (tests, embedded defaults).
    pub fn from_tasks(tasks: Vec<TaskDefinition>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[TaskDefinition] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for TaskCatalog {
    /// The built-in four-task daily list, used when no catalog file is
    /// deployed alongside the binary.
    fn default() -> Self {
        let task = |label: &str, scheduled_time: &str, duration_minutes: u32| TaskDefinition {
            label: label.to_string(),
            scheduled_time: scheduled_time.to_string(),
            duration_minutes,
        };
        Self {
            tasks: vec![
                task("Morning: Wake, Meditate, College", "06:00", 60),
                task("Evening: Gym Warfare (1h 45m)", "17:00", 105),
                task("Night: Trading, Aptitude, Coding", "21:00", 120),
                task("Late Night: Content Creation", "23:00", 60),
            ],
        }
    }
}

/// Catalog loading errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(String),

    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("Catalog must contain at least one task")]
    Empty,
}

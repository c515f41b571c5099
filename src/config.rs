//! Run parameter resolution and the last-used-config cache.
//!
//! CLI values win; a JSON cache in the OS temp directory supplies last-used
//! fallbacks. Cache I/O never fails the run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, TaskgenError};

/// Assignee used when no value is given on the CLI or found in the cache.
pub const DEFAULT_ASSIGNEE: &str = "Unassigned <unassigned@example.com>";

const CACHE_FILE_NAME: &str = "taskgen-config.json";

/// Parameters of the last successful run, persisted between invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRunConfig {
    pub sprint_id: String,
    pub area_path_id: String,
    pub assigned_to: String,
}

/// Fully resolved parameters for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    pub sprint_id: String,
    pub area_path_id: String,
    pub assigned_to: String,
}

impl RunParams {
    pub fn to_saved(&self) -> SavedRunConfig {
        SavedRunConfig {
            sprint_id: self.sprint_id.clone(),
            area_path_id: self.area_path_id.clone(),
            assigned_to: self.assigned_to.clone(),
        }
    }
}

pub fn cache_path() -> PathBuf {
    std::env::temp_dir().join(CACHE_FILE_NAME)
}

/// Load the cached last-used config. Absence and parse failures both yield
/// `None`; a stale or corrupt cache must never block a run.
pub async fn load_saved(path: &Path) -> Option<SavedRunConfig> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(config) => {
                debug!(path = %path.display(), "Loaded cached run config");
                Some(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable config cache");
                None
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No cached run config found");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read config cache");
            None
        }
    }
}

/// Persist the resolved parameters for the next run. Failure is logged and
/// swallowed.
pub async fn save(config: &SavedRunConfig, path: &Path) {
    let content = match serde_json::to_string_pretty(config) {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, "Failed to serialize run config");
            return;
        }
    };

    match tokio::fs::write(path, content).await {
        Ok(()) => debug!(path = %path.display(), "Saved run config"),
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to save run config"),
    }
}

/// Resolve run parameters from CLI values with cached fallbacks. Sprint and
/// area-path identifiers are required after fallback; the assignee defaults
/// to `DEFAULT_ASSIGNEE`.
pub fn resolve(
    sprint_id: Option<String>,
    area_path_id: Option<String>,
    assigned_to: Option<String>,
    saved: Option<SavedRunConfig>,
) -> Result<RunParams> {
    let (saved_sprint, saved_area, saved_assignee) = match saved {
        Some(s) => (Some(s.sprint_id), Some(s.area_path_id), Some(s.assigned_to)),
        None => (None, None, None),
    };

    let sprint_id = sprint_id.or(saved_sprint).ok_or_else(|| {
        TaskgenError::Config("missing --sprint-id and no cached value available".to_string())
    })?;

    let area_path_id = area_path_id.or(saved_area).ok_or_else(|| {
        TaskgenError::Config("missing --area-path-id and no cached value available".to_string())
    })?;

    let assigned_to = assigned_to
        .or(saved_assignee)
        .unwrap_or_else(|| DEFAULT_ASSIGNEE.to_string());

    Ok(RunParams {
        sprint_id,
        area_path_id,
        assigned_to,
    })
}

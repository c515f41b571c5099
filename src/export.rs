//! CSV export of synthesized work items.
//!
//! Writes the fixed-schema row file consumed by the project-tracking import.
//! The schema is contractual: column order and the static metadata fields
//! must not change.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use crate::error::{Result, TaskgenError};
use crate::synth::FileTaskResult;

pub const CSV_HEADERS: [&str; 15] = [
    "ID",
    "Work Item Type",
    "Title 2",
    "Assigned To",
    "State",
    "Area ID",
    "Iteration ID",
    "Item Contrato",
    "ID SPF",
    "UST",
    "Complexidade",
    "Activity",
    "Description",
    "Estimate Made",
    "Remaining Work",
];

/// Import parameters attached to every exported row.
#[derive(Debug, Clone)]
pub struct ExportParams {
    pub assigned_to: String,
    pub area_id: String,
    pub iteration_id: String,
}

/// Commas delimit columns, so field text must not contain them.
fn sanitize(field: &str) -> String {
    field.replace(',', "")
}

/// Render the export file body: header line plus one `Task` row per work
/// item. Zero work items yields a header-only artifact, still valid.
pub fn build_csv(results: &[FileTaskResult], params: &ExportParams) -> String {
    let mut lines = vec![CSV_HEADERS.join(",")];

    for result in results {
        for task in &result.tasks {
            lines.push(format!(
                ",Task,{},{},To Do,{},{},Item 1,22,4,ÚNICA,Development,{},1,1",
                sanitize(&task.title),
                params.assigned_to,
                params.area_id,
                params.iteration_id,
                sanitize(&task.description),
            ));
        }
    }

    let mut body = lines.join("\n");
    body.push('\n');
    body
}

/// Write the export artifact into `dir` as `tasks-<d>-<m>-<H>-<M>.csv` and
/// return its path. A write failure is fatal to the run.
pub async fn write_csv(
    results: &[FileTaskResult],
    params: &ExportParams,
    dir: &Path,
) -> Result<PathBuf> {
    let body = build_csv(results, params);
    let file_name = format!("tasks-{}.csv", Local::now().format("%-d-%-m-%-H-%-M"));
    let path = dir.join(file_name);

    tokio::fs::write(&path, body)
        .await
        .map_err(|e| TaskgenError::Export(format!("{}: {}", path.display(), e)))?;

    debug!(path = %path.display(), "Wrote export file");
    Ok(path)
}

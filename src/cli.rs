//! Command-line surface.

use clap::Parser;

#[derive(Parser)]
#[command(name = "taskgen")]
#[command(
    author,
    version,
    about = "Generate project-tracking work items from uncommitted git changes",
    long_about = None
)]
pub struct Cli {
    /// Sprint (iteration) identifier for exported work items; falls back to
    /// the last-used value
    #[arg(long)]
    pub sprint_id: Option<String>,

    /// Area path identifier for exported work items; falls back to the
    /// last-used value
    #[arg(long)]
    pub area_path_id: Option<String>,

    /// Assignee for exported work items; falls back to the last-used value,
    /// then to a fixed default
    #[arg(long)]
    pub assigned_to: Option<String>,

    /// Natural language for generated titles and descriptions
    #[arg(long, default_value = "English")]
    pub language: String,

    #[arg(short, long)]
    pub verbose: bool,
}

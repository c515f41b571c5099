use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use taskgen::cli::Cli;
use taskgen::config;
use taskgen::error::{Result, TaskgenError};
use taskgen::export::{self, ExportParams};
use taskgen::git::GitRunner;
use taskgen::pipeline::Pipeline;
use taskgen::synth::OpenAiClient;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("taskgen=debug")
    } else {
        EnvFilter::new("taskgen=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    // Parameter resolution happens before any git or summarizer I/O; missing
    // required values end the run here.
    let cache_path = config::cache_path();
    let saved = config::load_saved(&cache_path).await;
    let params = config::resolve(cli.sprint_id, cli.area_path_id, cli.assigned_to, saved)?;
    config::save(&params.to_saved(), &cache_path).await;

    let api_key = resolve_api_key()?;
    let root = find_repo_root()?;

    info!(root = %root.display(), "Starting task generation");

    let git = Arc::new(GitRunner::new(&root));
    let summarizer = Arc::new(OpenAiClient::new(api_key, cli.language));
    let pipeline = Pipeline::new(git, summarizer);

    let outcome = pipeline.run(&root).await?;

    info!(
        files = outcome.results.len(),
        tasks = outcome.total_tasks(),
        failures = outcome.failure_count,
        "Synthesis complete"
    );

    let export_params = ExportParams {
        assigned_to: params.assigned_to,
        area_id: params.area_path_id,
        iteration_id: params.sprint_id,
    };

    let out_dir = std::env::current_dir()?;
    let export_path = export::write_csv(&outcome.results, &export_params, &out_dir).await?;

    info!(path = %export_path.display(), "Wrote work item export");
    Ok(())
}

fn resolve_api_key() -> Result<String> {
    std::env::var("TASKGEN_OPENAI_KEY")
        .or_else(|_| std::env::var("OPENAI_API_KEY"))
        .map_err(|_| {
            TaskgenError::Config(
                "set TASKGEN_OPENAI_KEY or OPENAI_API_KEY to reach the summarizer".to_string(),
            )
        })
}

fn find_repo_root() -> Result<PathBuf> {
    let current = std::env::current_dir()?;

    let mut path = current.as_path();
    loop {
        if path.join(".git").exists() {
            return Ok(path.to_path_buf());
        }
        path = path.parent().ok_or(TaskgenError::NotInGitRepo)?;
    }
}

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use mediasweep::prelude::*;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(summary) if cli.fail_on_errors && summary.failed > 0 => ExitCode::from(2),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<RunSummary> {
    let mut file = FileConfig::load(cli.config.as_deref())?;
    file.apply_env();
    let mut settings = file.validate().context("validating configuration")?;
    if cli.dry_run { settings.policy.dry_run = true; }
    if cli.print_ignored { settings.policy.print_ignored = true; }
    if settings.policy.dry_run {
        tracing::info!("test mode: nothing will be deleted");
    }

    let endpoint = settings.connection.endpoint.clone();
    let sweeper = Sweeper::new(settings, Box::new(JellyfinProvider::new()), Arc::new(TracingSink));
    let summary = sweeper
        .run()
        .await
        .with_context(|| format!("sweep against {} aborted", endpoint))?;

    if cli.json {
        println!("{}", serde_json::to_string(&summary)?);
    }
    Ok(summary)
}

// RUST_LOG wins over the default; `-v` only adds the crate debug directive on top.
fn log_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    let mut filter = rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    if verbose {
        if let Ok(directive) = "mediasweep=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

// Logs go to stderr so `--json` output stays machine-readable.
fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref(), verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

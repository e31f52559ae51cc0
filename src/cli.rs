use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Delete watched media that aged past the retention threshold
#[derive(Debug, Parser)]
#[command(name = "mediasweep")]
#[command(author, version, about = "Deletes watched movies and episodes from a Jellyfin-compatible server", long_about = None)]
pub struct Cli {
    /// Config file. Defaults to `config.toml` in the platform config directory.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only log what would be deleted, regardless of `test_mode` in the config.
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Log every item kept back by the ignore lists.
    #[arg(long, action = ArgAction::SetTrue)]
    pub print_ignored: bool,

    /// Print the run summary as JSON on stdout.
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Exit with status 2 when any delete failed.
    #[arg(long, action = ArgAction::SetTrue)]
    pub fail_on_errors: bool,

    /// Enable debug logging.
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,
}

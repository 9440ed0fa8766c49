//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Concurrently download and unpack game add-ons.
///
/// Reads the add-on list and target directory from a JSON configuration file,
/// fetches every add-on at once and shows one progress line per add-on.
#[derive(Parser, Debug)]
#[command(name = "addon-installer")]
#[command(author, version, about)]
pub struct Args {
    /// Fetch archives but do not extract them (dry run)
    #[arg(short = 'n', long)]
    pub noop: bool,

    /// Configuration file
    #[arg(short = 'c', long, value_name = "PATH", default_value = "conf.json")]
    pub conf: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Log level used when `RUST_LOG` is not set.
    ///
    /// Defaults to `warn` so routine log lines do not scroll the progress
    /// lines out of place.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

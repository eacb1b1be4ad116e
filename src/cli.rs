/// CLI argument parsing

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::{Overrides, MAX_STATS_SAMPLES};

// Build timestamp injected at compile time
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
pub const VERSION_WITH_BUILD: &str = concat!(env!("CARGO_PKG_VERSION"), " (built: ", env!("BUILD_TIMESTAMP"), ")");

// Get version with timestamp
pub fn get_version() -> &'static str {
    VERSION_WITH_BUILD
}

#[derive(Parser)]
#[command(name = "cloudops-dash")]
#[command(author, version = VERSION_WITH_BUILD, about = "Terminal dashboard for Docker container metrics", long_about = None)]
pub struct Cli {
    /// Backend base URL, e.g. http://localhost:8000/api
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List containers once and exit
    Containers {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Poll stats of one container and print each sample
    Stats {
        /// Container ID
        id: String,

        /// Stop after this many successful samples
        #[arg(
            short = 'n',
            long,
            default_value = "10",
            value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_STATS_SAMPLES)
        )]
        samples: usize,

        /// Polling interval in milliseconds (defaults to the configured one)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: Option<u64>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    View,
    /// Print the config file path
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

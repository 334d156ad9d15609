//! Command-line flags and the configuration built from them.

use clap::{Parser, ValueEnum};

/// Which group of demonstrations to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    /// Both groups, list first
    All,
    /// Deferred list transformations
    List,
    /// Stream pipelines
    Stream,
}

#[derive(Parser, Debug)]
#[command(name = "weft-demo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Walk through the Weft list and stream operations", long_about = None)]
pub struct Cli {
    /// Demonstrations to run
    #[arg(short, long, value_enum, default_value = "all")]
    pub section: Section,

    /// Tracing filter, e.g. `debug` or `weft_stream=trace` (overrides RUST_LOG)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Resolved settings handed to the runners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub run_list: bool,
    pub run_stream: bool,
    pub log_filter: Option<String>,
}

impl From<Cli> for DemoConfig {
    fn from(cli: Cli) -> Self {
        DemoConfig {
            run_list: matches!(cli.section, Section::All | Section::List),
            run_stream: matches!(cli.section, Section::All | Section::Stream),
            log_filter: cli.log_level,
        }
    }
}

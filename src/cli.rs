use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use clicker::OverflowPolicy;

#[derive(Debug, Parser)]
#[command(version, about = None, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Clicks per counter
    #[arg(short = 'n', long, default_value_t = 3)]
    pub clicks: u64,

    /// Number of independent counters
    #[arg(short, long, default_value_t = 1)]
    pub counters: usize,

    /// What to do when a counter reaches its bound
    #[arg(value_enum)]
    #[arg(short, long)]
    #[arg(default_value_t = Policy::Saturate)]
    pub policy: Policy,

    /// Execution mode
    #[arg(value_enum)]
    #[arg(short, long)]
    #[arg(default_value_t = Mode::Closure)]
    pub mode: Mode,

    /// Worker threads per counter in shared mode (at most 256)
    #[arg(short, long, default_value_t = 4)]
    pub threads: usize,

    /// Path to the output file
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Click closures handed out by the counter factory
    Closure,

    /// Click shared counters from several threads
    Shared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Stay at the largest value
    Saturate,

    /// Start over at zero
    Wrap,

    /// Stop with an error
    Checked,
}

impl From<Policy> for OverflowPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Saturate => OverflowPolicy::Saturate,
            Policy::Wrap => OverflowPolicy::Wrap,
            Policy::Checked => OverflowPolicy::Checked,
        }
    }
}

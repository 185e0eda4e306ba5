//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    bulk::BulkCommands, catalog::CatalogArgs, check::CheckCommands,
    completions::CompletionsArgs, init::InitArgs, job::JobCommands, mat::MatCommands,
    part::PartCommands, report::ReportCommands, schedule::ScheduleArgs, task::TaskCommands,
};

#[derive(Parser)]
#[command(name = "jobroute")]
#[command(author, version, about = "Shop-floor job routing")]
#[command(
    long_about = "Track jobs, their parts, each part's process routing, materials and checklist milestones as plain YAML files."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .jobroute/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new jobroute project
    Init(InitArgs),

    /// Job management (create, list, edit customer jobs)
    #[command(subcommand)]
    Job(JobCommands),

    /// Parts of a job
    #[command(subcommand)]
    Part(PartCommands),

    /// Process tasks (routing) of a part
    #[command(subcommand)]
    Task(TaskCommands),

    /// Job checklist milestones
    #[command(subcommand)]
    Check(CheckCommands),

    /// Material requirements of a job
    #[command(subcommand)]
    Mat(MatCommands),

    /// Create many parts at once
    #[command(subcommand)]
    Bulk(BulkCommands),

    /// Delivery status of every part against the job's target date
    Schedule(ScheduleArgs),

    /// Summaries, quotations, confirmations and profit charts
    #[command(subcommand)]
    Report(ReportCommands),

    /// Show departments, operations and process templates
    Catalog(CatalogArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (text for show, table for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <OutputFormat as ValueEnum>::from_str(s, true)
            .map_err(|_| format!("Invalid format: {}. Use auto, yaml, tsv, json, csv, md, or id", s))
    }
}

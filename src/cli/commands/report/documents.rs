//! `jobroute report quote|confirm` - customer documents

use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{self, Workspace};
use crate::cli::GlobalOpts;
use crate::report::{DocumentKind, DocumentRenderer, JobSummary, TeraRenderer};

use super::write_output;

#[derive(clap::Args, Debug)]
pub struct DocumentArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Document date (default: today)
    #[arg(long)]
    pub date: Option<String>,
}

pub fn run(kind: DocumentKind, args: DocumentArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let job = ws.load_job(&args.job)?;
    let date = match &args.date {
        Some(d) => helpers::parse_date(d)?,
        None => helpers::today(),
    };

    let renderer = TeraRenderer::new().map_err(|e| miette::miette!("{}", e))?;
    let content = renderer
        .render(kind, &JobSummary::from_job(&job), &ws.config.company, date)
        .map_err(|e| miette::miette!("{}", e))?;

    tracing::debug!(job = %job.job_number, %kind, "document rendered");
    write_output(&content, args.output)
}

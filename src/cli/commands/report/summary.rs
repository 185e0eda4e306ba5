//! `jobroute report summary` - one-page job summary

use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{format_date, Workspace};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::report::JobSummary;

use super::write_output;

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: SummaryArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let job = ws.load_job(&args.job)?;
    let summary = JobSummary::from_job(&job);

    let content = match ws.format(global) {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&summary).into_diagnostic()?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yml::to_string(&summary).into_diagnostic()?,
        _ => render(&summary),
    };
    write_output(&content, args.output)
}

/// Markdown summary: field table, then checklist table
fn render(summary: &JobSummary) -> String {
    let mut output = format!("# Job {}\n\n", summary.job_number);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (label, value) in summary.fields() {
        builder.push_record([label.to_string(), value]);
    }
    builder.push_record(["Parts".to_string(), summary.part_count.to_string()]);
    builder.push_record([
        "Routing Hours".to_string(),
        format!("{:.1}", summary.routing_hours),
    ]);
    output.push_str(&builder.build().with(Style::markdown()).to_string());

    output.push_str("\n\n## Checklist\n\n");
    let mut builder = Builder::default();
    builder.push_record(["Item", "Done", "Date", "Assignee"]);
    for line in &summary.checklist {
        builder.push_record([
            line.item.clone(),
            if line.done { "yes" } else { "no" }.to_string(),
            format_date(line.completed_on),
            line.assignee.clone(),
        ]);
    }
    output.push_str(&builder.build().with(Style::markdown()).to_string());
    output.push('\n');
    output
}

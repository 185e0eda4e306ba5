//! `jobroute report` command - summaries, customer documents, profit chart

mod documents;
mod profit;
mod summary;

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::cli::GlobalOpts;

pub use documents::DocumentArgs;
pub use profit::ProfitArgs;
pub use summary::SummaryArgs;

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Job summary: attributes, pricing and checklist
    Summary(SummaryArgs),

    /// Price quotation for the client
    #[clap(alias = "quotation")]
    Quote(DocumentArgs),

    /// Order confirmation for the client
    #[clap(alias = "confirmation")]
    Confirm(DocumentArgs),

    /// Profit percentage per part as a bar chart
    Profit(ProfitArgs),
}

pub fn run(cmd: ReportCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ReportCommands::Summary(args) => summary::run(args, global),
        ReportCommands::Quote(args) => {
            documents::run(crate::report::DocumentKind::Quotation, args, global)
        }
        ReportCommands::Confirm(args) => {
            documents::run(crate::report::DocumentKind::Confirmation, args, global)
        }
        ReportCommands::Profit(args) => profit::run(args, global),
    }
}

pub(crate) fn write_output(content: &str, output_path: Option<PathBuf>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            println!(
                "{} Report written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => print!("{}", content),
    }
    Ok(())
}

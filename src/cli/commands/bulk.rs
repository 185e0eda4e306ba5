//! `jobroute bulk` command - add many parts to a job at once
//!
//! Every source (generator, demonstration batch, CSV sheet) produces plain
//! records; the job accepts the whole batch or none of it.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::path::PathBuf;

use crate::cli::helpers::{self, Workspace};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::planning::bulk::{self, PartRecord};

#[derive(Subcommand, Debug)]
pub enum BulkCommands {
    /// Generate parts BASE-1 .. BASE-N sharing one drawing
    Generate(GenerateArgs),

    /// Load the demonstration batch (30 parts of 170888)
    Demo(DemoArgs),

    /// Import parts from a CSV sheet
    Import(ImportArgs),
}

#[derive(clap::Args, Debug)]
pub struct CommitOpts {
    /// Job reference (@N, job number, or id)
    pub job: String,

    /// Show the parts that would be added without saving
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub commit: CommitOpts,

    /// Base part number
    pub base: String,

    /// Number of parts to generate
    #[arg(allow_hyphen_values = true)]
    pub quantity: String,

    /// Drawing shared by every generated part
    #[arg(long, default_value = "")]
    pub drawing: String,
}

#[derive(clap::Args, Debug)]
pub struct DemoArgs {
    #[command(flatten)]
    pub commit: CommitOpts,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub commit: CommitOpts,

    /// CSV file with a header row (Part Number, Description, Quantity, Material, Drawing)
    pub file: PathBuf,
}

pub fn run(cmd: BulkCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        BulkCommands::Generate(args) => {
            let quantity = bulk::parse_quantity(&args.quantity)?;
            let records = bulk::generate(&args.base, quantity, &args.drawing)?;
            commit(records, &args.commit, global)
        }
        BulkCommands::Demo(args) => commit(bulk::demonstration(), &args.commit, global),
        BulkCommands::Import(args) => {
            let file = File::open(&args.file).into_diagnostic()?;
            let records = bulk::read_records(file)?;
            commit(records, &args.commit, global)
        }
    }
}

fn commit(records: Vec<PartRecord>, opts: &CommitOpts, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let mut job = ws.load_job(&opts.job)?;

    if opts.dry_run {
        // Validate against a scratch copy so errors show up before saving
        job.clone().add_generated_parts(records.clone())?;
        preview(&records, ws.format(global));
        println!(
            "{} {} part(s) would be added to job {}",
            style("!").yellow(),
            records.len(),
            style(&job.job_number).yellow()
        );
        return Ok(());
    }

    let added = job.add_generated_parts(records)?;
    ws.save_job(&mut job)?;

    helpers::success(
        global,
        format!(
            "Added {} part(s) to job {} ({} total)",
            added,
            style(&job.job_number).yellow(),
            job.parts().len()
        ),
    );
    Ok(())
}

fn preview(records: &[PartRecord], format: crate::cli::OutputFormat) {
    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("PART", 16),
        ColumnDef::new("DESCRIPTION", 24),
        ColumnDef::new("QTY", 6),
        ColumnDef::new("MATERIAL", 16),
        ColumnDef::new("DRAWING", 16),
    ];
    let rows: Vec<TableRow> = records
        .iter()
        .map(|r| {
            TableRow::new(r.part_number.clone())
                .cell(CellValue::Text(r.part_number.clone()))
                .cell(CellValue::Text(r.description.clone()))
                .cell(CellValue::Number(i64::from(r.quantity)))
                .cell(CellValue::Text(r.material.clone()))
                .cell(CellValue::Text(r.drawing.clone()))
        })
        .collect();
    TableFormatter::new(COLUMNS, "part").output(&rows, format);
}

//! `jobroute mat` command - material requirements of a job

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{self, Workspace};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::material::{AcquisitionStatus, MaterialRequirement};

#[derive(Subcommand, Debug)]
pub enum MatCommands {
    /// List the active material lines of a job
    List(ListArgs),

    /// Add a material line
    Add(AddArgs),

    /// Set the acquisition status of a line
    Status(StatusArgs),

    /// Mark a line fulfilled and drop it from the active list
    Fulfill(FulfillArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,

    /// Material description, e.g. "Acier 1020"
    pub material: String,

    /// Part the material is for
    #[arg(long, short = 'p')]
    pub part: Option<String>,

    /// Initial status
    #[arg(long, short = 's', default_value = "not_ordered")]
    pub status: AcquisitionStatus,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,

    /// Line number (1-based)
    pub line: usize,

    /// not_ordered, rfq, ordered or received
    pub status: AcquisitionStatus,
}

#[derive(clap::Args, Debug)]
pub struct FulfillArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,

    /// Line number (1-based)
    pub line: usize,
}

pub fn run(cmd: MatCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        MatCommands::List(args) => run_list(args, global),
        MatCommands::Add(args) => run_add(args, global),
        MatCommands::Status(args) => run_status(args, global),
        MatCommands::Fulfill(args) => run_fulfill(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let job = ws.load_job(&args.job)?;

    match ws.format(global) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&job.materials).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&job.materials).into_diagnostic()?);
        }
        format => {
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("#", 4),
                ColumnDef::new("MATERIAL", 28),
                ColumnDef::new("PART", 16),
                ColumnDef::new("STATUS", 12),
            ];
            let rows: Vec<TableRow> = job
                .materials
                .lines()
                .iter()
                .enumerate()
                .map(|(i, line)| {
                    TableRow::new((i + 1).to_string())
                        .cell(CellValue::Number(i as i64 + 1))
                        .cell(CellValue::Text(line.material.clone()))
                        .cell(CellValue::Text(line.part_number.clone()))
                        .cell(CellValue::Text(line.status.to_string()))
                })
                .collect();
            TableFormatter::new(COLUMNS, "material line").output(&rows, format);
        }
    }
    Ok(())
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let mut job = ws.load_job(&args.job)?;

    let mut line = MaterialRequirement::new(&args.material, args.part.unwrap_or_default());
    line.status = args.status;
    let index = job.materials.add(line);
    ws.save_job(&mut job)?;

    helpers::success(
        global,
        format!(
            "Added material {} to job {} (line {})",
            style(&args.material).cyan(),
            style(&job.job_number).yellow(),
            index + 1
        ),
    );
    Ok(())
}

fn run_status(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let mut job = ws.load_job(&args.job)?;

    let index = helpers::position(args.line, "Material line")?;
    let material = job.materials.set_status(index, args.status)?.material.clone();
    ws.save_job(&mut job)?;

    helpers::success(
        global,
        format!("{} is now {}", style(material).cyan(), args.status),
    );
    Ok(())
}

fn run_fulfill(args: FulfillArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let mut job = ws.load_job(&args.job)?;

    let index = helpers::position(args.line, "Material line")?;
    let line = job.materials.fulfill(index)?;
    ws.save_job(&mut job)?;

    helpers::success(
        global,
        format!(
            "Fulfilled {} ({} line(s) left)",
            style(&line.material).cyan(),
            job.materials.len()
        ),
    );
    Ok(())
}

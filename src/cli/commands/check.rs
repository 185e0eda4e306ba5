//! `jobroute check` command - job checklist milestones

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{self, format_date, Workspace};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum CheckCommands {
    /// Show the four milestones of a job
    Show(ShowArgs),

    /// Mark a milestone done, or undo it
    Toggle(ToggleArgs),

    /// Assign a milestone to someone on the roster
    Assign(AssignArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,
}

#[derive(clap::Args, Debug)]
pub struct ToggleArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,

    /// confirmation, material-requisition, purchase or job-released
    pub item: String,

    /// Completion date to record (default: today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct AssignArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,

    /// confirmation, material-requisition, purchase or job-released
    pub item: String,

    /// Name from the configured roster
    pub assignee: String,
}

pub fn run(cmd: CheckCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CheckCommands::Show(args) => run_show(args, global),
        CheckCommands::Toggle(args) => run_toggle(args, global),
        CheckCommands::Assign(args) => run_assign(args, global),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let job = ws.load_job(&args.job)?;

    match ws.format(global) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&job.checklist).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&job.checklist).into_diagnostic()?);
        }
        format => {
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("ITEM", 22),
                ColumnDef::new("DONE", 5),
                ColumnDef::new("DATE", 10),
                ColumnDef::new("ASSIGNEE", 20),
            ];
            let rows: Vec<TableRow> = job
                .checklist
                .items()
                .iter()
                .map(|item| {
                    TableRow::new(item.milestone.to_string())
                        .cell(CellValue::Text(item.milestone.to_string()))
                        .cell(CellValue::Done(item.is_done()))
                        .cell(CellValue::Date(item.completed_on()))
                        .cell(CellValue::Text(item.assignee.clone()))
                })
                .collect();
            TableFormatter::new(COLUMNS, "item")
                .with_hint(format!(
                    "{} of {} done for job {}.",
                    job.checklist.completed(),
                    rows.len(),
                    job.job_number
                ))
                .output(&rows, format);
        }
    }
    Ok(())
}

fn run_toggle(args: ToggleArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let mut job = ws.load_job(&args.job)?;
    let today = match &args.date {
        Some(d) => helpers::parse_date(d)?,
        None => helpers::today(),
    };

    let item = job.checklist.toggle(&args.item, today)?;
    let message = if item.is_done() {
        format!(
            "{} done on {}",
            style(item.milestone).yellow(),
            format_date(item.completed_on())
        )
    } else {
        format!("{} reopened", style(item.milestone).yellow())
    };
    ws.save_job(&mut job)?;

    helpers::success(global, message);
    Ok(())
}

fn run_assign(args: AssignArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let mut job = ws.load_job(&args.job)?;

    job.checklist
        .assign(&args.item, &args.assignee, &ws.config.roster())?;
    ws.save_job(&mut job)?;

    let milestone: crate::entities::checklist::Milestone = args.item.parse()?;
    helpers::success(
        global,
        format!(
            "{} assigned to {}",
            style(milestone).yellow(),
            job.checklist.item(milestone).assignee
        ),
    );
    Ok(())
}

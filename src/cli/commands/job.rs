//! `jobroute job` command - customer job management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{self, format_date, format_money, Workspace};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::shortid::ShortIdIndex;
use crate::core::store;
use crate::entities::checklist::Milestone;
use crate::entities::job::Job;

#[derive(Subcommand, Debug)]
pub enum JobCommands {
    /// Create a new job
    New(NewArgs),

    /// List jobs
    List(ListArgs),

    /// Show a job's details, parts and checklist
    Show(ShowArgs),

    /// Change job attributes
    Set(SetArgs),

    /// Edit the job file in your editor
    Edit(EditArgs),

    /// Delete a job
    Delete(DeleteArgs),
}

/// Job attributes shared by `new` and `set`
#[derive(clap::Args, Debug, Default)]
pub struct JobFields {
    /// What is being made
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Customer name
    #[arg(long, short = 'c')]
    pub client: Option<String>,

    /// Customer address
    #[arg(long)]
    pub address: Option<String>,

    /// Customer phone
    #[arg(long)]
    pub phone: Option<String>,

    /// Ordered quantity
    #[arg(long)]
    pub quantity: Option<u32>,

    /// Quoted price per unit
    #[arg(long)]
    pub price: Option<f64>,

    /// Estimated cost
    #[arg(long)]
    pub cost: Option<f64>,

    /// Target delivery date (YYYY-MM-DD)
    #[arg(long)]
    pub delivery: Option<String>,

    /// Drawing reference
    #[arg(long)]
    pub drawing: Option<String>,

    /// Free-form status
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Job number (required unless --interactive)
    #[arg(long, short = 'n')]
    pub number: Option<String>,

    #[command(flatten)]
    pub fields: JobFields,

    /// Prompt for the main fields
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search job number, client and description (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,

    /// Only jobs with every checklist milestone done
    #[arg(long, conflicts_with = "open")]
    pub released: bool,

    /// Only jobs with open checklist milestones
    #[arg(long)]
    pub open: bool,

    /// Show count only
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,

    /// New job number
    #[arg(long, short = 'n')]
    pub number: Option<String>,

    #[command(flatten)]
    pub fields: JobFields,

    /// Remove the target delivery date
    #[arg(long, conflicts_with = "delivery")]
    pub clear_delivery: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,

    /// Don't ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: JobCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        JobCommands::New(args) => run_new(args, global),
        JobCommands::List(args) => run_list(args, global),
        JobCommands::Show(args) => run_show(args, global),
        JobCommands::Set(args) => run_set(args, global),
        JobCommands::Edit(args) => run_edit(args, global),
        JobCommands::Delete(args) => run_delete(args, global),
    }
}

fn apply_fields(job: &mut Job, fields: JobFields) -> Result<()> {
    if let Some(v) = fields.description {
        job.description = v;
    }
    if let Some(v) = fields.client {
        job.client = v;
    }
    if let Some(v) = fields.address {
        job.client_address = v;
    }
    if let Some(v) = fields.phone {
        job.client_phone = v;
    }
    if let Some(v) = fields.quantity {
        job.quantity = v;
    }
    if let Some(v) = fields.price {
        job.unit_price = Some(v);
    }
    if let Some(v) = fields.cost {
        job.cost = Some(v);
    }
    if let Some(v) = fields.delivery {
        job.target_delivery = Some(helpers::parse_date(&v)?);
    }
    if let Some(v) = fields.drawing {
        job.drawing = v;
    }
    if let Some(v) = fields.status {
        job.status = v;
    }
    Ok(())
}

fn prompt_fields(number: Option<String>, mut fields: JobFields) -> Result<(String, JobFields)> {
    use dialoguer::Input;

    let number: String = Input::new()
        .with_prompt("Job number")
        .with_initial_text(number.unwrap_or_default())
        .interact_text()
        .into_diagnostic()?;
    let description: String = Input::new()
        .with_prompt("Description")
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;
    let client: String = Input::new()
        .with_prompt("Client")
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;
    let quantity: u32 = Input::new()
        .with_prompt("Quantity")
        .default(1)
        .interact_text()
        .into_diagnostic()?;
    let delivery: String = Input::new()
        .with_prompt("Target delivery (YYYY-MM-DD, empty for none)")
        .allow_empty(true)
        .validate_with(|s: &String| -> Result<(), String> {
            if s.is_empty() || helpers::parse_date(s).is_ok() {
                Ok(())
            } else {
                Err("expected YYYY-MM-DD".to_string())
            }
        })
        .interact_text()
        .into_diagnostic()?;

    fields.description = Some(description).filter(|s| !s.is_empty());
    fields.client = Some(client).filter(|s| !s.is_empty());
    fields.quantity = Some(quantity);
    fields.delivery = Some(delivery).filter(|s| !s.is_empty());
    Ok((number, fields))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;

    let (number, fields) = if args.interactive {
        prompt_fields(args.number, args.fields)?
    } else {
        let number = args.number.ok_or_else(|| {
            miette::miette!("a job number is required: use --number or --interactive")
        })?;
        (number, args.fields)
    };

    let mut job = Job::new(number, ws.config.author())?;
    apply_fields(&mut job, fields)?;
    let path = store::create(&ws.project, &job)?;

    if global.quiet {
        return Ok(());
    }
    println!(
        "{} Created job {} ({})",
        style("✓").green(),
        style(&job.job_number).yellow(),
        style(ws.short_id(&job)).cyan()
    );
    println!("   {}", style(path.display()).dim());
    Ok(())
}

fn matches_search(job: &Job, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    [&job.job_number, &job.client, &job.description]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let total = Milestone::ALL.len();

    let jobs: Vec<Job> = store::load_all(&ws.project)
        .into_iter()
        .filter(|j| args.search.as_deref().map_or(true, |s| matches_search(j, s)))
        .filter(|j| !args.released || j.checklist.completed() == total)
        .filter(|j| !args.open || j.checklist.completed() < total)
        .collect();

    if args.count {
        println!("{}", jobs.len());
        return Ok(());
    }

    let mut short_ids = ShortIdIndex::load(&ws.project);
    short_ids.rebuild(jobs.iter().map(|j| j.id.to_string()));
    if let Err(e) = short_ids.save(&ws.project) {
        tracing::warn!(error = %e, "could not save short id index");
    }

    match ws.format(global) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&jobs).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&jobs).into_diagnostic()?);
        }
        format => {
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("SHORT", 8),
                ColumnDef::new("JOB", 14),
                ColumnDef::new("CLIENT", 20),
                ColumnDef::new("DESCRIPTION", 30),
                ColumnDef::new("QTY", 6),
                ColumnDef::new("PARTS", 6),
                ColumnDef::new("DELIVERY", 10),
                ColumnDef::new("CHECK", 6),
            ];
            let rows: Vec<TableRow> = jobs
                .iter()
                .map(|j| {
                    let short = short_ids
                        .get_short_id(&j.id.to_string())
                        .map(|n| format!("@{}", n))
                        .unwrap_or_default();
                    TableRow::new(j.id.to_string())
                        .cell(CellValue::ShortId(short))
                        .cell(CellValue::Text(j.job_number.clone()))
                        .cell(CellValue::Text(j.client.clone()))
                        .cell(CellValue::Text(j.description.clone()))
                        .cell(CellValue::Number(i64::from(j.quantity)))
                        .cell(CellValue::Number(j.parts().len() as i64))
                        .cell(CellValue::Date(j.target_delivery))
                        .cell(CellValue::Text(format!("{}/{}", j.checklist.completed(), total)))
                })
                .collect();
            TableFormatter::new(COLUMNS, "job")
                .with_hint(format!("Use {} to reference by short ID.", style("@N").cyan()))
                .output(&rows, format);
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let job = ws.load_job(&args.job)?;

    match ws.format(global) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&job).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&job).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", job.id),
        _ => print_job(&job),
    }
    Ok(())
}

fn print_job(job: &Job) {
    let line = |label: &str, value: &str| {
        if !value.is_empty() {
            println!("{}: {}", style(label).bold(), value);
        }
    };

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(job.id).cyan());
    println!("{}: {}", style("Job").bold(), style(&job.job_number).yellow());
    line("Description", &job.description);
    line("Client", &job.client);
    line("Address", &job.client_address);
    line("Phone", &job.client_phone);
    println!("{}: {}", style("Quantity").bold(), job.quantity);
    line("Unit Price", &format_money(job.unit_price));
    line("Total", &format_money(job.total_price()));
    line("Cost", &format_money(job.cost));
    line("Delivery", &format_date(job.target_delivery));
    line("Drawing", &job.drawing);
    line("Status", &job.status);
    println!("{}", style("─".repeat(60)).dim());

    if !job.parts().is_empty() {
        println!("{}", style("Parts:").bold());
        for part in job.parts() {
            println!(
                "  {} {} x{} ({} task(s), {:.1} h){}",
                style("•").dim(),
                style(&part.part_number).cyan(),
                part.quantity,
                part.tasks().len(),
                part.routing_hours(),
                part.estimated_delivery
                    .map(|d| format!(" due {}", d))
                    .unwrap_or_default()
            );
        }
        println!();
    }

    println!("{}", style("Checklist:").bold());
    for item in job.checklist.items() {
        let mark = if item.is_done() {
            style("✓").green()
        } else {
            style("·").dim()
        };
        println!(
            "  {} {:<22} {:<10} {}",
            mark,
            item.milestone.to_string(),
            format_date(item.completed_on()),
            style(&item.assignee).dim()
        );
    }

    if !job.materials.is_empty() {
        println!();
        println!("{}", style("Materials:").bold());
        for (i, line) in job.materials.lines().iter().enumerate() {
            println!("  {}. {} [{}] {}", i + 1, line.material, line.status, style(&line.part_number).dim());
        }
    }

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {} | {}: {} | {}: {}",
        style("Author").dim(),
        job.author,
        style("Created").dim(),
        job.created.format("%Y-%m-%d %H:%M"),
        style("Revision").dim(),
        job.revision
    );
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let mut job = ws.load_job(&args.job)?;

    if let Some(number) = &args.number {
        job.set_job_number(number)?;
    }
    apply_fields(&mut job, args.fields)?;
    if args.clear_delivery {
        job.target_delivery = None;
    }
    ws.save_job(&mut job)?;

    helpers::success(
        global,
        format!("Updated job {} (revision {})", style(&job.job_number).yellow(), job.revision),
    );
    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let job = ws.load_job(&args.job)?;
    let path = ws.project.job_path(&job.id);

    println!(
        "Opening {} in {}...",
        style(&job.job_number).cyan(),
        style(ws.config.editor()).yellow()
    );
    ws.config.run_editor(&path).into_diagnostic()?;

    // Reload so a broken edit is reported right away
    let edited = store::load_job(&path)?;
    edited.validate(&ws.catalog()?).map_err(|e| {
        miette::Report::new(e).wrap_err(format!("{} does not hold a valid job", path.display()))
    })?;
    helpers::success(global, format!("{} is valid", style(&edited.job_number).yellow()));
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let job = ws.load_job(&args.job)?;

    let prompt = format!(
        "Delete job {} with {} part(s)?",
        job.job_number,
        job.parts().len()
    );
    if !helpers::confirm(&prompt, args.yes)? {
        println!("Cancelled");
        return Ok(());
    }

    store::remove(&ws.project, &job)?;
    helpers::success(global, format!("Deleted job {}", style(&job.job_number).yellow()));
    Ok(())
}

//! `jobroute part` command - parts of a job

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{self, format_date, format_money, Workspace};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::ProcessCatalog;
use crate::entities::part::PartRouter;

#[derive(Subcommand, Debug)]
pub enum PartCommands {
    /// Add a part to a job
    New(NewArgs),

    /// List the parts of a job
    List(ListArgs),

    /// Show one part with its routing
    Show(PartRef),

    /// Change part attributes
    Set(SetArgs),

    /// Remove a part and its routing from a job
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct PartRef {
    /// Job reference (@N, job number, or id)
    pub job: String,

    /// Part number
    pub part: String,
}

/// Part attributes shared by `new` and `set`
#[derive(clap::Args, Debug, Default)]
pub struct PartFields {
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long)]
    pub quantity: Option<u32>,

    #[arg(long, short = 'm')]
    pub material: Option<String>,

    /// Unit cost
    #[arg(long)]
    pub cost: Option<f64>,

    /// Unit selling price
    #[arg(long)]
    pub price: Option<f64>,

    /// Quoted hours
    #[arg(long)]
    pub hours: Option<f64>,

    #[arg(long)]
    pub dimension: Option<String>,

    #[arg(long)]
    pub drawing: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    /// Estimated delivery date (YYYY-MM-DD)
    #[arg(long)]
    pub delivery: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub target: PartRef,

    #[command(flatten)]
    pub fields: PartFields,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    #[command(flatten)]
    pub target: PartRef,

    #[command(flatten)]
    pub fields: PartFields,

    /// Remove the estimated delivery date
    #[arg(long, conflicts_with = "delivery")]
    pub clear_delivery: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub target: PartRef,

    /// Don't ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: PartCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PartCommands::New(args) => run_new(args, global),
        PartCommands::List(args) => run_list(args, global),
        PartCommands::Show(args) => run_show(args, global),
        PartCommands::Set(args) => run_set(args, global),
        PartCommands::Delete(args) => run_delete(args, global),
    }
}

fn apply_fields(part: &mut PartRouter, fields: PartFields) -> Result<()> {
    if let Some(v) = fields.description {
        part.description = v;
    }
    if let Some(v) = fields.quantity {
        part.quantity = v;
    }
    if let Some(v) = fields.material {
        part.material = v;
    }
    if let Some(v) = fields.cost {
        part.cost = Some(v);
    }
    if let Some(v) = fields.price {
        part.price = Some(v);
    }
    if let Some(v) = fields.hours {
        part.hours = Some(v);
    }
    if let Some(v) = fields.dimension {
        part.dimension = v;
    }
    if let Some(v) = fields.drawing {
        part.drawing = v;
    }
    if let Some(v) = fields.status {
        part.status = v;
    }
    if let Some(v) = fields.delivery {
        part.estimated_delivery = Some(helpers::parse_date(&v)?);
    }
    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let mut job = ws.load_job(&args.target.job)?;

    let mut part = PartRouter::new(&args.target.part)?;
    apply_fields(&mut part, args.fields)?;
    let part_number = part.part_number.clone();
    let index = job.add_part(part)?;
    ws.save_job(&mut job)?;

    helpers::success(
        global,
        format!(
            "Added part {} to job {} (#{})",
            style(&part_number).cyan(),
            style(&job.job_number).yellow(),
            index + 1
        ),
    );
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let job = ws.load_job(&args.job)?;

    match ws.format(global) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(job.parts()).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&job.parts()).into_diagnostic()?);
        }
        format => {
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("#", 4),
                ColumnDef::new("PART", 16),
                ColumnDef::new("DESCRIPTION", 28),
                ColumnDef::new("QTY", 6),
                ColumnDef::new("MATERIAL", 16),
                ColumnDef::new("TASKS", 6),
                ColumnDef::new("HOURS", 7),
                ColumnDef::new("DELIVERY", 10),
                ColumnDef::new("PRICE", 10),
            ];
            let rows: Vec<TableRow> = job
                .parts()
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    TableRow::new(p.part_number.clone())
                        .cell(CellValue::Number(i as i64 + 1))
                        .cell(CellValue::Text(p.part_number.clone()))
                        .cell(CellValue::Text(p.description.clone()))
                        .cell(CellValue::Number(i64::from(p.quantity)))
                        .cell(CellValue::Text(p.material.clone()))
                        .cell(CellValue::Number(p.tasks().len() as i64))
                        .cell(CellValue::Hours(p.routing_hours()))
                        .cell(CellValue::Date(p.estimated_delivery))
                        .cell(CellValue::Money(p.price))
                })
                .collect();
            TableFormatter::new(COLUMNS, "part").output(&rows, format);
        }
    }
    Ok(())
}

fn run_show(args: PartRef, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let job = ws.load_job(&args.job)?;
    let part = job
        .part(&args.part)
        .ok_or_else(|| crate::core::RoutingError::UnknownPart(args.part.clone()))?;

    match ws.format(global) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(part).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(part).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", part.part_number),
        _ => print_part(part, &ws.catalog()?),
    }
    Ok(())
}

fn print_part(part: &PartRouter, catalog: &ProcessCatalog) {
    let line = |label: &str, value: &str| {
        if !value.is_empty() {
            println!("{}: {}", style(label).bold(), value);
        }
    };

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Part").bold(), style(&part.part_number).cyan());
    line("Description", &part.description);
    println!("{}: {}", style("Quantity").bold(), part.quantity);
    line("Material", &part.material);
    line("Cost", &format_money(part.cost));
    line("Price", &format_money(part.price));
    line("Quoted Hours", &part.hours.map(|h| format!("{:.1}", h)).unwrap_or_default());
    line("Dimension", &part.dimension);
    line("Drawing", &part.drawing);
    line("Status", &part.status);
    line("Delivery", &format_date(part.estimated_delivery));
    println!("{}", style("─".repeat(60)).dim());

    if part.tasks().is_empty() {
        println!("{}", style("No tasks. Use `jobroute task template` to load a routing.").dim());
        return;
    }

    let stale = part.inconsistent_tasks(catalog);
    for (i, task) in part.tasks().iter().enumerate() {
        let flag = if stale.contains(&i) {
            style("!").yellow().bold().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "{}{:>3}. {:<18} {:<20} {:>6.1} h",
            flag,
            i + 1,
            task.department.to_string(),
            task.operation(),
            task.hours()
        );
        if task.notes_visible && !task.notes.is_empty() {
            println!("       {}", style(&task.notes).dim());
        }
    }
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {:.1} h", style("Routing").bold(), part.routing_hours());
    if !stale.is_empty() {
        println!(
            "{} {} task(s) use an operation no longer listed for their department",
            style("!").yellow(),
            stale.len()
        );
    }
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let mut job = ws.load_job(&args.target.job)?;

    let part = job.part_mut(&args.target.part)?;
    apply_fields(part, args.fields)?;
    if args.clear_delivery {
        part.estimated_delivery = None;
    }
    let part_number = part.part_number.clone();
    ws.save_job(&mut job)?;

    helpers::success(global, format!("Updated part {}", style(part_number).cyan()));
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let mut job = ws.load_job(&args.target.job)?;

    let tasks = job
        .part(&args.target.part)
        .map(|p| p.tasks().len())
        .ok_or_else(|| crate::core::RoutingError::UnknownPart(args.target.part.clone()))?;
    let prompt = format!(
        "Delete part {} and its {} task(s)?",
        args.target.part, tasks
    );
    if !helpers::confirm(&prompt, args.yes)? {
        println!("Cancelled");
        return Ok(());
    }

    let (_, removed) = job.delete_part(&args.target.part)?;
    ws.save_job(&mut job)?;
    helpers::success(
        global,
        format!(
            "Deleted part {} from job {}",
            style(&removed.part_number).cyan(),
            style(&job.job_number).yellow()
        ),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_fields() {
        let mut part = PartRouter::new("170888-1").unwrap();
        let fields = PartFields {
            quantity: Some(4),
            material: Some("Acier 1020".to_string()),
            price: Some(80.0),
            delivery: Some("2018-04-26".to_string()),
            ..PartFields::default()
        };
        apply_fields(&mut part, fields).unwrap();
        assert_eq!(part.quantity, 4);
        assert_eq!(part.material, "Acier 1020");
        assert_eq!(part.price, Some(80.0));
        assert_eq!(part.estimated_delivery.unwrap().to_string(), "2018-04-26");
        assert_eq!(part.cost, None);
    }
}

//! `jobroute task` command - edit the process routing of a part

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{self, Workspace};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::{Department, ProcessCatalog};
use crate::core::RoutingError;
use crate::entities::job::Job;
use crate::entities::part::PartRouter;

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List the tasks of a part in execution order
    List(PartArgs),

    /// Append a task
    Add(AddArgs),

    /// Remove the last task
    RemoveLast(PartArgs),

    /// Replace every task with a process template
    Template(TemplateArgs),

    /// Move a task to another department (operation resets to its first)
    Dept(DeptArgs),

    /// Choose a task's operation by name or number
    Op(OpArgs),

    /// Set a task's hours
    Hours(HoursArgs),

    /// Set a task's notes
    Notes(NotesArgs),

    /// Hide notes of one task, or of all tasks
    HideNotes(NotesToggleArgs),

    /// Show notes of one task, or of all tasks
    ShowNotes(NotesToggleArgs),
}

#[derive(clap::Args, Debug)]
pub struct PartArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,

    /// Part number
    pub part: String,
}

/// Department by name (`machining`, `surface-treatment`) or number (1-5)
pub fn parse_department(s: &str) -> Result<Department, String> {
    match s.trim().parse::<usize>() {
        Ok(n) => n
            .checked_sub(1)
            .and_then(Department::from_index)
            .ok_or_else(|| format!("Invalid department number: {}. Use 1 to {}", n, Department::ALL.len())),
        Err(_) => s.parse(),
    }
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub target: PartArgs,

    /// Department (default: methods)
    #[arg(long, short = 'd', value_parser = parse_department)]
    pub dept: Option<Department>,

    /// Operation name or number (default: the department's first)
    #[arg(long, short = 'o')]
    pub op: Option<String>,

    /// Hours for the whole part batch
    #[arg(long)]
    pub hours: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct TemplateArgs {
    #[command(flatten)]
    pub target: PartArgs,

    /// Template name (see `jobroute catalog`)
    #[arg(default_value = "standard")]
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct DeptArgs {
    #[command(flatten)]
    pub target: PartArgs,

    /// Task number (1-based)
    pub task: usize,

    #[arg(value_parser = parse_department)]
    pub department: Department,
}

#[derive(clap::Args, Debug)]
pub struct OpArgs {
    #[command(flatten)]
    pub target: PartArgs,

    /// Task number (1-based)
    pub task: usize,

    /// Operation name, or its number in the department's list
    pub operation: String,
}

#[derive(clap::Args, Debug)]
pub struct HoursArgs {
    #[command(flatten)]
    pub target: PartArgs,

    /// Task number (1-based)
    pub task: usize,

    pub hours: f64,
}

#[derive(clap::Args, Debug)]
pub struct NotesArgs {
    #[command(flatten)]
    pub target: PartArgs,

    /// Task number (1-based)
    pub task: usize,

    /// Note text (empty to clear)
    pub text: String,
}

#[derive(clap::Args, Debug)]
pub struct NotesToggleArgs {
    #[command(flatten)]
    pub target: PartArgs,

    /// Task number (1-based); all tasks when omitted
    pub task: Option<usize>,
}

pub fn run(cmd: TaskCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        TaskCommands::List(args) => run_list(args, global),
        TaskCommands::Add(args) => run_add(args, global),
        TaskCommands::RemoveLast(args) => run_remove_last(args, global),
        TaskCommands::Template(args) => run_template(args, global),
        TaskCommands::Dept(args) => run_dept(args, global),
        TaskCommands::Op(args) => run_op(args, global),
        TaskCommands::Hours(args) => run_hours(args, global),
        TaskCommands::Notes(args) => run_notes(args, global),
        TaskCommands::HideNotes(args) => run_toggle_notes(args, false, global),
        TaskCommands::ShowNotes(args) => run_toggle_notes(args, true, global),
    }
}

/// Load the job, apply `edit` to the part, save
fn edit_part<T>(
    ws: &Workspace,
    target: &PartArgs,
    edit: impl FnOnce(&mut PartRouter) -> Result<T>,
) -> Result<(Job, T)> {
    let mut job = ws.load_job(&target.job)?;
    let outcome = edit(job.part_mut(&target.part)?)?;
    ws.save_job(&mut job)?;
    Ok((job, outcome))
}

fn run_list(args: PartArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let catalog = ws.catalog()?;
    let job = ws.load_job(&args.job)?;
    let part = job
        .part(&args.part)
        .ok_or_else(|| RoutingError::UnknownPart(args.part.clone()))?;

    match ws.format(global) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(part.tasks()).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&part.tasks()).into_diagnostic()?);
        }
        format => {
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("#", 4),
                ColumnDef::new("DEPARTMENT", 18),
                ColumnDef::new("OPERATION", 20),
                ColumnDef::new("HOURS", 7),
                ColumnDef::new("NOTES", 40),
                ColumnDef::new("!", 3),
            ];
            let stale = part.inconsistent_tasks(&catalog);
            let rows: Vec<TableRow> = part
                .tasks()
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let notes = if t.notes_visible {
                        CellValue::Text(t.notes.clone())
                    } else {
                        CellValue::Empty
                    };
                    TableRow::new((i + 1).to_string())
                        .cell(CellValue::Number(i as i64 + 1))
                        .cell(CellValue::Text(t.department.to_string()))
                        .cell(CellValue::Text(t.operation().to_string()))
                        .cell(CellValue::Hours(t.hours()))
                        .cell(notes)
                        .cell(CellValue::Flag(stale.contains(&i)))
                })
                .collect();
            TableFormatter::new(COLUMNS, "task")
                .with_hint(format!("Routing total {:.1} h.", part.routing_hours()))
                .output(&rows, format);
        }
    }
    Ok(())
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let catalog = ws.catalog()?;

    let choice = args.op.as_deref().map(OperationChoice::parse).transpose()?;

    // A failed selection aborts before the job is saved
    let (_, (index, summary)) = edit_part(&ws, &args.target, |part| {
        let index = part.add_task(&catalog, args.dept, None, args.hours)?;
        if let Some(choice) = &choice {
            choice.apply(&catalog, part, index)?;
        }
        let summary = part
            .task(index)
            .map(|t| format!("{} / {}", t.department, t.operation()))
            .unwrap_or_default();
        Ok((index, summary))
    })?;

    helpers::success(
        global,
        format!("Added task {} to {}: {}", index + 1, style(&args.target.part).cyan(), summary),
    );
    Ok(())
}

fn run_remove_last(args: PartArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let (_, removed) = edit_part(&ws, &args, |part| Ok(part.remove_last_task()?))?;
    helpers::success(
        global,
        format!(
            "Removed {} / {} from {}",
            removed.department,
            removed.operation(),
            style(&args.part).cyan()
        ),
    );
    Ok(())
}

fn run_template(args: TemplateArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let catalog = ws.catalog()?;
    let template = catalog.template(&args.name)?.clone();

    let (_, count) = edit_part(&ws, &args.target, |part| {
        part.apply_template(&catalog, &template)?;
        Ok(part.tasks().len())
    })?;

    helpers::success(
        global,
        format!(
            "Loaded template {} into {} ({} task(s))",
            style(&template.name).yellow(),
            style(&args.target.part).cyan(),
            count
        ),
    );
    Ok(())
}

fn run_dept(args: DeptArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let catalog = ws.catalog()?;
    let index = helpers::position(args.task, "Task")?;

    let (_, operation) = edit_part(&ws, &args.target, |part| {
        part.set_task_department(&catalog, index, args.department)?;
        Ok(part
            .task(index)
            .map(|t| t.operation().to_string())
            .unwrap_or_default())
    })?;

    helpers::success(
        global,
        format!("Task {} moved to {} ({})", args.task, args.department, operation),
    );
    Ok(())
}

/// Operation typed by the user: a name, or a 1-based number in the
/// department's list
#[derive(Debug, PartialEq)]
enum OperationChoice {
    Name(String),
    Position(usize),
}

impl OperationChoice {
    fn parse(input: &str) -> Result<Self> {
        match input.trim().parse::<usize>() {
            Ok(n) => Ok(OperationChoice::Position(helpers::position(n, "Operation")?)),
            Err(_) => Ok(OperationChoice::Name(input.to_string())),
        }
    }

    fn apply(&self, catalog: &ProcessCatalog, part: &mut PartRouter, index: usize) -> Result<()> {
        match self {
            OperationChoice::Name(name) => part.set_task_operation(catalog, index, name)?,
            OperationChoice::Position(p) => part.select_task_operation(catalog, index, *p)?,
        }
        Ok(())
    }
}

fn run_op(args: OpArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let catalog = ws.catalog()?;
    let index = helpers::position(args.task, "Task")?;

    let choice = OperationChoice::parse(&args.operation)?;

    let (_, operation) = edit_part(&ws, &args.target, |part| {
        choice.apply(&catalog, part, index)?;
        Ok(part
            .task(index)
            .map(|t| t.operation().to_string())
            .unwrap_or_default())
    })?;

    helpers::success(global, format!("Task {} operation set to {}", args.task, operation));
    Ok(())
}

fn run_hours(args: HoursArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let index = helpers::position(args.task, "Task")?;
    let (_, total) = edit_part(&ws, &args.target, |part| {
        part.set_task_hours(index, args.hours)?;
        Ok(part.routing_hours())
    })?;
    helpers::success(
        global,
        format!("Task {} set to {:.1} h (routing total {:.1} h)", args.task, args.hours, total),
    );
    Ok(())
}

fn run_notes(args: NotesArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let index = helpers::position(args.task, "Task")?;
    edit_part(&ws, &args.target, |part| Ok(part.set_task_notes(index, args.text.clone())?))?;
    helpers::success(global, format!("Task {} notes updated", args.task));
    Ok(())
}

fn run_toggle_notes(args: NotesToggleArgs, visible: bool, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let index = args.task.map(|n| helpers::position(n, "Task")).transpose()?;
    edit_part(&ws, &args.target, |part| match index {
        Some(i) => Ok(part.toggle_task_notes(i, visible)?),
        None => {
            part.set_all_notes_visible(visible);
            Ok(())
        }
    })?;

    let which = args
        .task
        .map(|n| format!("task {}", n))
        .unwrap_or_else(|| "all tasks".to_string());
    let verb = if visible { "shown" } else { "hidden" };
    helpers::success(global, format!("Notes {} for {}", verb, which));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_department() {
        assert_eq!(parse_department("machining").unwrap(), Department::Machining);
        assert_eq!(parse_department("surface-treatment").unwrap(), Department::SurfaceTreatment);
        assert_eq!(parse_department("1").unwrap(), Department::Methods);
        assert_eq!(parse_department("5").unwrap(), Department::Inspection);
        assert!(parse_department("0").is_err());
        assert!(parse_department("6").is_err());
        assert!(parse_department("welding").is_err());
    }

    #[test]
    fn test_operation_choice() {
        assert_eq!(
            OperationChoice::parse("2").unwrap(),
            OperationChoice::Position(1)
        );
        assert_eq!(
            OperationChoice::parse("lathe").unwrap(),
            OperationChoice::Name("lathe".to_string())
        );
        assert!(OperationChoice::parse("0").is_err());

        let catalog = ProcessCatalog::reference();
        let mut part = PartRouter::new("P-1").unwrap();
        part.add_task(&catalog, Some(Department::Machining), None, None)
            .unwrap();
        OperationChoice::parse("2")
            .unwrap()
            .apply(&catalog, &mut part, 0)
            .unwrap();
        assert_eq!(part.tasks()[0].operation(), "5-axis mill");
        OperationChoice::parse("3-AXIS MILL")
            .unwrap()
            .apply(&catalog, &mut part, 0)
            .unwrap();
        assert_eq!(part.tasks()[0].operation(), "3-axis mill");
        assert!(OperationChoice::parse("4")
            .unwrap()
            .apply(&catalog, &mut part, 0)
            .is_err());
    }
}

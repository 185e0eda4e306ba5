//! `jobroute schedule` command - part delivery dates against the job target

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{self, Workspace};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::planning::delivery::{self, DeliveryStatus, JobSchedule, ScheduledDelivery};

#[derive(clap::Args, Debug)]
pub struct ScheduleArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,

    /// Compare against this date instead of the job's target delivery
    #[arg(long)]
    pub reference: Option<String>,
}

pub fn run(args: ScheduleArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let mut job = ws.load_job(&args.job)?;

    if let Some(reference) = &args.reference {
        job.target_delivery = Some(helpers::parse_date(reference)?);
    }
    let schedule = delivery::job_schedule(&job)?;

    match ws.format(global) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&schedule).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&schedule).into_diagnostic()?);
        }
        OutputFormat::Md => print!("{}", render(&schedule, true)),
        _ => {
            println!(
                "{} {} - reference {}",
                style("Delivery schedule").bold(),
                style(&job.job_number).yellow(),
                schedule.reference
            );
            println!("{}", render(&schedule, false));
            let late = schedule.late_parts().count();
            if late > 0 {
                println!("{} {} part(s) late", style("!").yellow(), late);
            }
        }
    }
    Ok(())
}

fn offset(delivery: &ScheduledDelivery) -> String {
    format!("{:+}", delivery.day_offset)
}

fn status_text(status: DeliveryStatus, markdown: bool) -> String {
    match (status, markdown) {
        (DeliveryStatus::Late, true) => format!("**{}**", status),
        (DeliveryStatus::Late, false) => style(status).red().bold().to_string(),
        (DeliveryStatus::OnTime, false) => style(status).green().to_string(),
        (DeliveryStatus::OnTime, true) => status.to_string(),
    }
}

/// Per-part rows followed by the project row
fn render(schedule: &JobSchedule, markdown: bool) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Part", "Estimated", "Days", "Status"]);

    for row in &schedule.rows {
        match &row.delivery {
            Some(d) => builder.push_record([
                row.part_number.clone(),
                d.date.to_string(),
                offset(d),
                status_text(d.status, markdown),
            ]),
            None => builder.push_record([
                row.part_number.clone(),
                "-".to_string(),
                "-".to_string(),
                "unscheduled".to_string(),
            ]),
        }
    }

    let project = &schedule.project;
    builder.push_record([
        "Project".to_string(),
        project.date.to_string(),
        offset(project),
        status_text(project.status, markdown),
    ]);

    let mut table = builder.build();
    if markdown {
        table.with(Style::markdown());
    } else {
        table.with(Style::rounded());
    }
    format!("{}\n", table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::job::Job;
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, m, d).unwrap()
    }

    #[test]
    fn test_markdown_schedule() {
        let mut job = Job::new("170888", "test").unwrap();
        job.target_delivery = Some(date(4, 21));
        job.create_part("A").unwrap().estimated_delivery = Some(date(4, 20));
        job.create_part("B").unwrap().estimated_delivery = Some(date(4, 28));
        job.create_part("C").unwrap();

        let schedule = delivery::job_schedule(&job).unwrap();
        let text = render(&schedule, true);
        assert!(text.contains("| A "));
        assert!(text.contains("2018-04-20"));
        assert!(text.contains("-1"));
        assert!(text.contains("+7"));
        assert!(text.contains("**late**"));
        assert!(text.contains("unscheduled"));
        assert!(text.lines().last().unwrap().starts_with("| Project"));
    }
}

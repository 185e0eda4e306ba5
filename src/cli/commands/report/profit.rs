//! `jobroute report profit` - profit percentage per part

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::Workspace;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::planning::profit::{profit_series, ProfitPoint};
use crate::report::bar_chart;

use super::write_output;

#[derive(clap::Args, Debug)]
pub struct ProfitArgs {
    /// Job reference (@N, job number, or id)
    pub job: String,

    /// Labour rate per routed hour (default: hourly_rate from config)
    #[arg(long)]
    pub rate: Option<f64>,

    /// Chart width in characters
    #[arg(long, default_value = "40")]
    pub width: usize,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: ProfitArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let job = ws.load_job(&args.job)?;
    let rate = args.rate.unwrap_or_else(|| ws.config.hourly_rate());
    let series = profit_series(&job, rate);

    let content = match ws.format(global) {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&series).into_diagnostic()?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yml::to_string(&series).into_diagnostic()?,
        OutputFormat::Md => table(&series),
        _ => {
            if series.is_empty() {
                println!(
                    "{} No part of job {} has both a price and a cost",
                    style("!").yellow(),
                    job.job_number
                );
                return Ok(());
            }
            let bars: Vec<(String, f64)> =
                series.iter().map(|p| (p.label.clone(), p.percent)).collect();
            format!(
                "Profit % per part, job {} at {:.2}/h\n\n{}",
                job.job_number,
                rate,
                bar_chart(&bars, args.width)
            )
        }
    };
    write_output(&content, args.output)
}

fn table(series: &[ProfitPoint]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Part", "Revenue", "Cost", "Profit %"]);
    for p in series {
        builder.push_record([
            p.label.clone(),
            format!("{:.2}", p.revenue),
            format!("{:.2}", p.cost),
            format!("{:.1}", p.percent),
        ]);
    }
    format!("{}\n", builder.build().with(Style::markdown()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profit_table() {
        let series = vec![ProfitPoint {
            label: "A".to_string(),
            revenue: 300.0,
            cost: 200.0,
            percent: 50.0,
        }];
        let text = table(&series);
        assert!(text.contains("| Part "));
        assert!(text.contains("300.00"));
        assert!(text.contains("50.0"));
    }
}

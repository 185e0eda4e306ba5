//! Shared helper functions for CLI commands

use chrono::NaiveDate;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::ProcessCatalog;
use crate::core::project::Project;
use crate::core::shortid::ShortIdIndex;
use crate::core::{store, Config};
use crate::entities::job::Job;

/// Everything a command needs once the project is located
pub struct Workspace {
    pub project: Project,
    pub config: Config,
}

impl Workspace {
    /// Locate the project (`--project` or walk up from cwd) and load config
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let project = match &global.project {
            Some(path) => Project::discover_from(path),
            None => Project::discover(),
        }
        .map_err(|e| miette::miette!("{}", e))?;
        let config = Config::load_for(Some(&project));
        Ok(Self { project, config })
    }

    pub fn catalog(&self) -> Result<ProcessCatalog> {
        Ok(self.config.catalog()?)
    }

    pub fn load_job(&self, reference: &str) -> Result<Job> {
        Ok(store::find(&self.project, reference)?)
    }

    pub fn save_job(&self, job: &mut Job) -> Result<()> {
        store::save(&self.project, job)?;
        Ok(())
    }

    /// Short id of a job, assigning one if it has none yet
    pub fn short_id(&self, job: &Job) -> String {
        let mut short_ids = ShortIdIndex::load(&self.project);
        let n = short_ids.add(job.id.to_string());
        if let Err(e) = short_ids.save(&self.project) {
            tracing::warn!(error = %e, "could not save short id index");
        }
        format!("JOB@{}", n)
    }

    /// Output format, with `default_format` from config replacing `auto`
    pub fn format(&self, global: &GlobalOpts) -> OutputFormat {
        effective_format(global.format, self.config.default_format.as_deref())
    }
}

pub fn effective_format(requested: OutputFormat, configured: Option<&str>) -> OutputFormat {
    if requested != OutputFormat::Auto {
        return requested;
    }
    configured
        .and_then(|s| s.parse().ok())
        .unwrap_or(OutputFormat::Auto)
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| miette::miette!("Invalid date '{}': expected YYYY-MM-DD", s))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Convert a 1-based position typed by the user to an index
pub fn position(n: usize, what: &str) -> Result<usize> {
    n.checked_sub(1)
        .ok_or_else(|| miette::miette!("{} numbers start at 1", what))
}

/// Ask before destroying something, unless `--yes` was given
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}

pub fn success(global: &GlobalOpts, message: impl std::fmt::Display) {
    if !global.quiet {
        println!("{} {}", style("✓").green(), message);
    }
}

pub fn format_money(v: Option<f64>) -> String {
    v.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

pub fn format_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_default()
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output (RFC 4180)
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_survives_unwritable_index() {
        let tmp = tempfile::tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        // A directory where the index file belongs makes every save fail
        std::fs::create_dir_all(project.project_dir().join("shortids.json")).unwrap();

        let ws = Workspace {
            project,
            config: Config::default(),
        };
        let job = Job::new("J-1", "test").unwrap();
        assert_eq!(ws.short_id(&job), "JOB@1");
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("Pièce usinée", 8), "Pièce...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2018-04-21").unwrap(),
            NaiveDate::from_ymd_opt(2018, 4, 21).unwrap()
        );
        assert!(parse_date("21/04/2018").is_err());
    }

    #[test]
    fn test_position() {
        assert_eq!(position(1, "Task").unwrap(), 0);
        assert!(position(0, "Task").is_err());
    }

    #[test]
    fn test_effective_format() {
        assert_eq!(effective_format(OutputFormat::Json, Some("csv")), OutputFormat::Json);
        assert_eq!(effective_format(OutputFormat::Auto, Some("csv")), OutputFormat::Csv);
        assert_eq!(effective_format(OutputFormat::Auto, Some("bogus")), OutputFormat::Auto);
        assert_eq!(effective_format(OutputFormat::Auto, None), OutputFormat::Auto);
    }
}

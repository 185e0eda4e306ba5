//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::catalog::{Department, ProcessCatalog, ProcessTemplate};
use crate::core::error::RoutingError;
use crate::core::Project;
use crate::entities::checklist::DEFAULT_ROSTER;

/// Supplier details printed on quotations and confirmations
#[derive(Debug, Clone, Default, PartialEq, Deserialize, serde::Serialize)]
#[serde(default)]
pub struct CompanyInfo {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Person signing outgoing documents
    pub signatory: Option<String>,
}

impl CompanyInfo {
    fn merge(&mut self, other: CompanyInfo) {
        if other.name.is_some() {
            self.name = other.name;
        }
        if other.address.is_some() {
            self.address = other.address;
        }
        if other.phone.is_some() {
            self.phone = other.phone;
        }
        if other.signatory.is_some() {
            self.signatory = other.signatory;
        }
    }
}

/// jobroute configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default author for new jobs
    pub author: Option<String>,

    /// Editor command for `jobroute job edit`
    pub editor: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// Names allowed as checklist assignees
    pub roster: Option<Vec<String>>,

    /// Labour rate used for profitability
    pub hourly_rate: Option<f64>,

    pub company: CompanyInfo,

    /// Per-department operation list overrides
    pub operations: BTreeMap<Department, Vec<String>>,

    /// Extra process templates (same name replaces a built-in one)
    pub templates: Vec<ProcessTemplate>,
}

impl Config {
    /// Load configuration for a known project (or none), merging every
    /// source in priority order
    pub fn load_for(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/jobroute/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (.jobroute/config.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&project.config_path()) {
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        if let Ok(author) = std::env::var("JOBROUTE_AUTHOR") {
            config.author = Some(author);
        }
        if let Ok(editor) = std::env::var("JOBROUTE_EDITOR") {
            config.editor = Some(editor);
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        // A freshly initialized config is all comments
        let blank = contents.lines().all(|l| {
            let l = l.trim();
            l.is_empty() || l.starts_with('#')
        });
        if blank {
            return None;
        }
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "jobroute")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.editor.is_some() {
            self.editor = other.editor;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.roster.is_some() {
            self.roster = other.roster;
        }
        if other.hourly_rate.is_some() {
            self.hourly_rate = other.hourly_rate;
        }
        self.company.merge(other.company);
        self.operations.extend(other.operations);
        for template in other.templates {
            self.templates.retain(|t| t.name != template.name);
            self.templates.push(template);
        }
    }

    /// Get the author name, falling back to git config or username
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }

        // Try git config
        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        // Fall back to username
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Checklist roster, the shop's default crew when not configured
    pub fn roster(&self) -> Vec<String> {
        match &self.roster {
            Some(names) if !names.is_empty() => names.clone(),
            _ => DEFAULT_ROSTER.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Labour rate per routed hour (0 when not configured)
    pub fn hourly_rate(&self) -> f64 {
        self.hourly_rate.unwrap_or(0.0)
    }

    /// Reference catalog with this configuration's overrides applied
    pub fn catalog(&self) -> Result<ProcessCatalog, RoutingError> {
        let mut catalog = ProcessCatalog::reference();
        for (department, operations) in &self.operations {
            catalog = catalog.with_operations(*department, operations.clone())?;
        }
        for template in &self.templates {
            catalog.resolve_template(template)?;
            catalog = catalog.with_template(template.clone());
        }
        Ok(catalog)
    }

    /// Get the editor command
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| "vi".to_string())
    }

    /// Run the editor on a file, properly handling commands with arguments
    /// (e.g., "emacsclient -nw" or "code --wait")
    pub fn run_editor(&self, file_path: &Path) -> std::io::Result<std::process::ExitStatus> {
        let editor = self.editor();
        let parts: Vec<&str> = editor.split_whitespace().collect();

        let Some((cmd, args)) = parts.split_first() else {
            return std::process::Command::new("vi").arg(file_path).status();
        };

        std::process::Command::new(cmd)
            .args(args)
            .arg(file_path)
            .status()
    }
}

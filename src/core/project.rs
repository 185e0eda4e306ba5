//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::JobId;

/// Marker directory holding project configuration
pub const PROJECT_DIR: &str = ".jobroute";

/// Directory holding one YAML file per job
pub const JOBS_DIR: &str = "jobs";

/// Represents a jobroute project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .jobroute/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::create_structure(root)
    }

    /// Force initialization even if .jobroute/ exists (rewrites the config)
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create_structure(root)
    }

    fn create_structure(root: PathBuf) -> Result<Self, ProjectError> {
        let io = |e: std::io::Error| ProjectError::IoError(e.to_string());

        std::fs::create_dir_all(root.join(PROJECT_DIR)).map_err(io)?;
        std::fs::create_dir_all(root.join(JOBS_DIR)).map_err(io)?;

        let project = Self { root };
        std::fs::write(project.config_path(), Self::default_config()).map_err(io)?;

        tracing::debug!(root = %project.root.display(), "project initialized");
        Ok(project)
    }

    fn default_config() -> &'static str {
        r#"# jobroute project configuration

# Default author for new jobs (can be overridden by global config)
# author: ""

# Editor to use for `jobroute job edit` (default: $EDITOR)
# editor: ""

# Default output format (auto, yaml, tsv, json, csv, md, id)
# default_format: auto

# Checklist assignees
# roster: ["Paul tempsdniaser", "Bob", "Jacqueline", "Chuck Norris"]

# Labour rate per routed hour, used by `jobroute report profit`
# hourly_rate: 75.0

# Supplier block printed on quotations and confirmations
# company:
#   name: SuperShop
#   address: ""
#   phone: ""
#   signatory: ""

# Replace a department's operation list
# operations:
#   machining: [Lathe, 5-axis mill, 3-axis mill, Wire EDM]

# Extra process templates; indices address the operation lists above
# templates:
#   - name: turn-and-inspect
#     steps:
#       - { department_index: 1, operation_index: 0, hours: 2.0 }
#       - { department_index: 4, operation_index: 0, hours: 0.5 }
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .jobroute configuration directory
    pub fn project_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.project_dir().join("config.yaml")
    }

    pub fn jobs_dir(&self) -> PathBuf {
        self.root.join(JOBS_DIR)
    }

    /// Path a job is stored at
    pub fn job_path(&self, id: &JobId) -> PathBuf {
        self.jobs_dir().join(id.file_name())
    }

    /// Iterate all job files in the project
    pub fn iter_job_files(&self) -> impl Iterator<Item = PathBuf> {
        walkdir::WalkDir::new(self.jobs_dir())
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().to_string_lossy().ends_with(".job.yaml"))
            .map(|e| e.path().to_path_buf())
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a jobroute project (searched from {searched_from:?}). Run 'jobroute init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("jobroute project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

//! Job storage - one YAML file per job under `jobs/`

use miette::Diagnostic;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::error::RoutingError;
use crate::core::project::Project;
use crate::core::shortid::ShortIdIndex;
use crate::entities::job::Job;
use crate::yaml::YamlSyntaxError;

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("cannot access {path:?}: {source}")]
    #[diagnostic(code(jobroute::store::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(Box<YamlSyntaxError>),

    #[error("{path:?} does not hold a valid job")]
    #[diagnostic(
        code(jobroute::store::invalid),
        help("fix the file by hand or with `jobroute job edit`")
    )]
    Invalid {
        path: PathBuf,
        #[source]
        #[diagnostic_source]
        source: RoutingError,
    },

    #[error("cannot serialize job '{job}': {message}")]
    #[diagnostic(code(jobroute::store::serialize))]
    Serialize { job: String, message: String },

    #[error("no job matches '{0}'")]
    #[diagnostic(
        code(jobroute::store::not_found),
        help("use a job number, a JOB- id, or @N from `jobroute job list`")
    )]
    NotFound(String),

    #[error("'{reference}' matches several jobs: {}", matches.join(", "))]
    #[diagnostic(code(jobroute::store::ambiguous), help("use more of the id, or the job number"))]
    Ambiguous {
        reference: String,
        matches: Vec<String>,
    },

    #[error("job number '{0}' is already used by another job")]
    #[diagnostic(code(jobroute::store::duplicate_job_number))]
    DuplicateJobNumber(String),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read one job file and check its part and task invariants
pub fn load_job(path: &Path) -> Result<Job, StoreError> {
    let content = fs::read_to_string(path).map_err(io_error(path))?;
    let job: Job = serde_yml::from_str(&content).map_err(|e| {
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        StoreError::Parse(Box::new(YamlSyntaxError::from_serde_error(&e, &content, &filename)))
    })?;
    job.check_structure().map_err(|source| StoreError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(job)
}

/// Every readable job in the project, oldest first.
///
/// Files that fail to parse are skipped with a warning; `find` reports them
/// in full when addressed directly.
pub fn load_all(project: &Project) -> Vec<Job> {
    let mut jobs: Vec<Job> = project
        .iter_job_files()
        .filter_map(|path| match load_job(&path) {
            Ok(job) => Some(job),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable job file");
                None
            }
        })
        .collect();
    jobs.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
    jobs
}

/// Resolve a job reference.
///
/// Accepts `@N` / `JOB@N`, an exact job number (case-insensitive), or a full
/// or partial job id.
pub fn find(project: &Project, reference: &str) -> Result<Job, StoreError> {
    let reference = reference.trim();
    let short_ids = ShortIdIndex::load(project);
    let wanted = short_ids
        .resolve(reference)
        .unwrap_or_else(|| reference.to_string());

    if let Ok(id) = wanted.parse() {
        let path = project.job_path(&id);
        if path.exists() {
            return load_job(&path);
        }
    }

    let jobs = load_all(project);

    if let Some(job) = jobs
        .iter()
        .find(|j| j.job_number.eq_ignore_ascii_case(&wanted))
    {
        return Ok(job.clone());
    }

    let upper = wanted.to_uppercase();
    let mut by_id: Vec<Job> = jobs
        .into_iter()
        .filter(|j| j.id.to_string().contains(&upper))
        .collect();

    match by_id.len() {
        0 => Err(StoreError::NotFound(reference.to_string())),
        1 => Ok(by_id.remove(0)),
        _ => Err(StoreError::Ambiguous {
            reference: reference.to_string(),
            matches: by_id.iter().map(|j| j.job_number.clone()).collect(),
        }),
    }
}

fn ensure_unique_number(project: &Project, job: &Job) -> Result<(), StoreError> {
    let taken = load_all(project)
        .iter()
        .any(|other| other.id != job.id && other.job_number.eq_ignore_ascii_case(&job.job_number));
    if taken {
        return Err(StoreError::DuplicateJobNumber(job.job_number.clone()));
    }
    Ok(())
}

fn write(project: &Project, job: &Job) -> Result<PathBuf, StoreError> {
    let path = project.job_path(&job.id);
    let yaml = serde_yml::to_string(job).map_err(|e| StoreError::Serialize {
        job: job.job_number.clone(),
        message: e.to_string(),
    })?;
    fs::create_dir_all(project.jobs_dir()).map_err(io_error(&path))?;
    fs::write(&path, yaml).map_err(io_error(&path))?;
    Ok(path)
}

/// Write a new job; its job number must not be in use
pub fn create(project: &Project, job: &Job) -> Result<PathBuf, StoreError> {
    ensure_unique_number(project, job)?;
    let path = write(project, job)?;
    tracing::info!(job = %job.job_number, id = %job.id, "job created");
    Ok(path)
}

/// Write back a modified job, bumping its revision
pub fn save(project: &Project, job: &mut Job) -> Result<PathBuf, StoreError> {
    ensure_unique_number(project, job)?;
    job.revision += 1;
    let path = write(project, job)?;
    tracing::info!(job = %job.job_number, revision = job.revision, "job saved");
    Ok(path)
}

pub fn remove(project: &Project, job: &Job) -> Result<PathBuf, StoreError> {
    let path = project.job_path(&job.id);
    fs::remove_file(&path).map_err(io_error(&path))?;
    tracing::info!(job = %job.job_number, "job deleted");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn project() -> (tempfile::TempDir, Project) {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        (tmp, project)
    }

    #[test]
    fn test_create_and_find() {
        let (_tmp, project) = project();
        let job = Job::new("J-100", "test").unwrap();
        create(&project, &job).unwrap();

        assert_eq!(find(&project, "j-100").unwrap().id, job.id);
        assert_eq!(find(&project, &job.id.to_string()).unwrap().id, job.id);
        let full = job.id.to_string();
        assert_eq!(find(&project, &full[4..14]).unwrap().id, job.id);
        assert!(matches!(
            find(&project, "J-999").unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[test]
    fn test_find_by_short_id() {
        let (_tmp, project) = project();
        let job = Job::new("J-1", "test").unwrap();
        create(&project, &job).unwrap();

        let mut index = ShortIdIndex::new();
        index.add(job.id.to_string());
        index.save(&project).unwrap();

        assert_eq!(find(&project, "@1").unwrap().id, job.id);
        assert_eq!(find(&project, "JOB@1").unwrap().id, job.id);
    }

    #[test]
    fn test_duplicate_job_number_rejected() {
        let (_tmp, project) = project();
        create(&project, &Job::new("J-1", "test").unwrap()).unwrap();
        let err = create(&project, &Job::new("j-1", "test").unwrap()).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateJobNumber(_)));
    }

    #[test]
    fn test_save_bumps_revision() {
        let (_tmp, project) = project();
        let mut job = Job::new("J-1", "test").unwrap();
        create(&project, &job).unwrap();

        job.client = "Acme".to_string();
        save(&project, &mut job).unwrap();
        let reloaded = find(&project, "J-1").unwrap();
        assert_eq!(reloaded.revision, 2);
        assert_eq!(reloaded.client, "Acme");
    }

    #[test]
    fn test_load_all_skips_broken_files() {
        let (_tmp, project) = project();
        let a = Job::new("J-A", "test").unwrap();
        create(&project, &a).unwrap();
        fs::write(project.jobs_dir().join("broken.job.yaml"), "id: [").unwrap();

        let jobs = load_all(&project);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].job_number, "J-A");
    }

    #[test]
    fn test_broken_file_reports_diagnostic() {
        let (_tmp, project) = project();
        let job = Job::new("J-A", "test").unwrap();
        let path = create(&project, &job).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        fs::write(&path, content.replace("author: test", "author: [")).unwrap();

        let err = find(&project, &job.id.to_string()).unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }

    #[test]
    fn test_duplicated_part_in_file_rejected() {
        let (_tmp, project) = project();
        let mut job = Job::new("J-A", "test").unwrap();
        job.create_part("P-1").unwrap();
        job.create_part("P-2").unwrap();
        let path = create(&project, &job).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        fs::write(&path, content.replace("part_number: P-2", "part_number: P-1")).unwrap();

        match find(&project, &job.id.to_string()).unwrap_err() {
            StoreError::Invalid { source, .. } => {
                assert_eq!(source, RoutingError::duplicate_part_number("P-1"));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert!(load_all(&project).is_empty());
    }

    #[test]
    fn test_remove() {
        let (_tmp, project) = project();
        let job = Job::new("J-1", "test").unwrap();
        let path = create(&project, &job).unwrap();
        remove(&project, &job).unwrap();
        assert!(!path.exists());
        assert!(load_all(&project).is_empty());
    }
}

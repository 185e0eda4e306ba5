//! Short ID aliases for jobs
//!
//! `jobroute job list` numbers the jobs it prints; `@2` (or `JOB@2`) then
//! refers to the second job of that listing until the next listing.

use std::collections::HashMap;
use std::fs;

use crate::core::project::{Project, PROJECT_DIR};

const INDEX_FILE: &str = "shortids.json";

/// A mapping of short IDs (@N) to full job IDs
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ShortIdIndex {
    entries: HashMap<u32, String>,
    #[serde(skip)]
    reverse: HashMap<String, u32>,
    next_id: u32,
}

impl ShortIdIndex {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            reverse: HashMap::new(),
            next_id: 1,
        }
    }

    /// Load the index from a project, or start empty
    pub fn load(project: &Project) -> Self {
        let path = project.root().join(PROJECT_DIR).join(INDEX_FILE);
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::new();
        };
        match serde_json::from_str::<ShortIdIndex>(&content) {
            Ok(mut index) => {
                index.reverse = index.entries.iter().map(|(k, v)| (v.clone(), *k)).collect();
                index
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding corrupt short id index");
                Self::new()
            }
        }
    }

    pub fn save(&self, project: &Project) -> std::io::Result<()> {
        let path = project.root().join(PROJECT_DIR).join(INDEX_FILE);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
    }

    /// Clear and renumber from 1 in the given order
    pub fn rebuild(&mut self, job_ids: impl IntoIterator<Item = String>) {
        self.entries.clear();
        self.reverse.clear();
        self.next_id = 1;

        for id in job_ids {
            self.add(id);
        }
    }

    /// Add a job ID and return its short ID
    pub fn add(&mut self, job_id: String) -> u32 {
        if let Some(&short_id) = self.reverse.get(&job_id) {
            return short_id;
        }

        let short_id = self.next_id;
        self.next_id += 1;
        self.entries.insert(short_id, job_id.clone());
        self.reverse.insert(job_id, short_id);
        short_id
    }

    /// Resolve `@N` / `JOB@N` to a full job ID.
    ///
    /// Returns `None` for anything else, including bare numbers, which are
    /// left for job-number matching.
    pub fn resolve(&self, reference: &str) -> Option<String> {
        let upper = reference.trim().to_uppercase();
        let number = upper
            .strip_prefix("JOB@")
            .or_else(|| upper.strip_prefix('@'))?;
        number
            .parse::<u32>()
            .ok()
            .and_then(|n| self.entries.get(&n).cloned())
    }

    pub fn get_short_id(&self, job_id: &str) -> Option<u32> {
        self.reverse.get(job_id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_add_and_resolve() {
        let mut index = ShortIdIndex::new();
        assert_eq!(index.add("JOB-01ABC".to_string()), 1);
        assert_eq!(index.add("JOB-02DEF".to_string()), 2);

        assert_eq!(index.resolve("@1"), Some("JOB-01ABC".to_string()));
        assert_eq!(index.resolve("job@2"), Some("JOB-02DEF".to_string()));
        assert_eq!(index.resolve("@99"), None);
    }

    #[test]
    fn test_bare_numbers_are_not_short_ids() {
        let mut index = ShortIdIndex::new();
        index.add("JOB-01ABC".to_string());
        assert_eq!(index.resolve("1"), None);
        assert_eq!(index.resolve("170888"), None);
    }

    #[test]
    fn test_short_id_rebuild() {
        let mut index = ShortIdIndex::new();
        index.add("JOB-OLD1".to_string());
        index.add("JOB-OLD2".to_string());

        index.rebuild(vec!["JOB-NEW1".to_string(), "JOB-NEW2".to_string(), "JOB-NEW3".to_string()]);

        assert_eq!(index.len(), 3);
        assert_eq!(index.resolve("@3"), Some("JOB-NEW3".to_string()));
        assert_eq!(index.get_short_id("JOB-OLD1"), None);
    }

    #[test]
    fn test_short_id_no_duplicates() {
        let mut index = ShortIdIndex::new();
        let a = index.add("JOB-001".to_string());
        let b = index.add("JOB-001".to_string());
        assert_eq!(a, b);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        let mut index = ShortIdIndex::new();
        index.add("JOB-001".to_string());
        index.save(&project).unwrap();

        let loaded = ShortIdIndex::load(&project);
        assert_eq!(loaded.resolve("@1"), Some("JOB-001".to_string()));
        assert_eq!(loaded.get_short_id("JOB-001"), Some(1));
    }
}

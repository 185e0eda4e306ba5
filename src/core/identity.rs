//! Job identity - `JOB-` prefixed ULIDs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Prefix every job id starts with
pub const JOB_PREFIX: &str = "JOB";

/// Stable identifier of a job, independent of its (editable) job number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId {
    ulid: Ulid,
}

impl JobId {
    pub fn new() -> Self {
        Self { ulid: Ulid::new() }
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self { ulid }
    }

    pub fn ulid(&self) -> Ulid {
        self.ulid
    }

    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }

    /// File name the job is stored under
    pub fn file_name(&self) -> String {
        format!("{}.job.yaml", self)
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", JOB_PREFIX, self.ulid)
    }
}

impl FromStr for JobId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, ulid_str) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;

        if !prefix.eq_ignore_ascii_case(JOB_PREFIX) {
            return Err(IdParseError::InvalidPrefix(prefix.to_string()));
        }

        let ulid = Ulid::from_string(ulid_str)
            .map_err(|e| IdParseError::InvalidUlid(ulid_str.to_string(), e.to_string()))?;

        Ok(Self { ulid })
    }
}

impl Serialize for JobId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid id prefix: '{0}' (expected JOB)")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in job id: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid ULID '{0}': {1}")]
    InvalidUlid(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_generation() {
        let id = JobId::new();
        assert!(id.to_string().starts_with("JOB-"));
        assert_eq!(id.to_string().len(), 30); // JOB- (4) + ULID (26)
    }

    #[test]
    fn test_job_id_roundtrip() {
        let original = JobId::new();
        let parsed = JobId::parse(&original.to_string()).unwrap();
        assert_eq!(original, parsed);
        assert_eq!(original.file_name(), format!("{}.job.yaml", original));
    }

    #[test]
    fn test_job_id_errors() {
        assert!(matches!(
            JobId::parse("REQ-01HQ3K4N5M6P7R8S9T0VWXYZAB").unwrap_err(),
            IdParseError::InvalidPrefix(_)
        ));
        assert!(matches!(
            JobId::parse("JOB01HQ3K4N5M6P7R8S9T0VWXYZAB").unwrap_err(),
            IdParseError::MissingDelimiter(_)
        ));
        assert!(matches!(
            JobId::parse("JOB-notaulid").unwrap_err(),
            IdParseError::InvalidUlid(_, _)
        ));
    }

    #[test]
    fn test_job_id_serde() {
        let id = JobId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: JobId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

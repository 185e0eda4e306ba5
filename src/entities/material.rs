//! Material requirements - raw stock a job still has to acquire

use serde::{Deserialize, Serialize};

use crate::core::error::RoutingError;

/// Where the acquisition of a material stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum AcquisitionStatus {
    #[default]
    NotOrdered,
    /// Request for quotation sent
    Rfq,
    Ordered,
    Received,
}

impl AcquisitionStatus {
    pub const ALL: [AcquisitionStatus; 4] = [
        AcquisitionStatus::NotOrdered,
        AcquisitionStatus::Rfq,
        AcquisitionStatus::Ordered,
        AcquisitionStatus::Received,
    ];
}

impl std::fmt::Display for AcquisitionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcquisitionStatus::NotOrdered => write!(f, "Not Ordered"),
            AcquisitionStatus::Rfq => write!(f, "RFQ"),
            AcquisitionStatus::Ordered => write!(f, "Ordered"),
            AcquisitionStatus::Received => write!(f, "Received"),
        }
    }
}

impl std::str::FromStr for AcquisitionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        match squashed.as_str() {
            "notordered" => Ok(AcquisitionStatus::NotOrdered),
            "rfq" => Ok(AcquisitionStatus::Rfq),
            "ordered" => Ok(AcquisitionStatus::Ordered),
            "received" => Ok(AcquisitionStatus::Received),
            _ => Err(format!(
                "Invalid material status: {}. Use not_ordered, rfq, ordered, or received",
                s
            )),
        }
    }
}

/// One active material line of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialRequirement {
    pub material: String,

    /// Part the material is for; free text, not checked against the job
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub part_number: String,

    #[serde(default)]
    pub status: AcquisitionStatus,
}

impl MaterialRequirement {
    pub fn new(material: impl Into<String>, part_number: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            part_number: part_number.into(),
            status: AcquisitionStatus::default(),
        }
    }
}

/// Active (unfulfilled) material lines in entry order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialList {
    lines: Vec<MaterialRequirement>,
}

impl MaterialList {
    pub fn lines(&self) -> &[MaterialRequirement] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Append a line and return its index
    pub fn add(&mut self, requirement: MaterialRequirement) -> usize {
        self.lines.push(requirement);
        self.lines.len() - 1
    }

    pub fn set_status(
        &mut self,
        index: usize,
        status: AcquisitionStatus,
    ) -> Result<&MaterialRequirement, RoutingError> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(RoutingError::UnknownMaterial(index + 1))?;
        line.status = status;
        Ok(line)
    }

    /// Fulfil a line; it leaves the active list for good and is returned
    pub fn fulfill(&mut self, index: usize) -> Result<MaterialRequirement, RoutingError> {
        if index >= self.lines.len() {
            return Err(RoutingError::UnknownMaterial(index + 1));
        }
        let line = self.lines.remove(index);
        tracing::info!(material = %line.material, part = %line.part_number, "material fulfilled");
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> MaterialList {
        let mut list = MaterialList::default();
        list.add(MaterialRequirement::new("Acier 1020", "170888-1"));
        list.add(MaterialRequirement::new("Alu 6061", "170888-2"));
        list
    }

    #[test]
    fn test_new_line_is_not_ordered() {
        let line = MaterialRequirement::new("Acier 1020", "");
        assert_eq!(line.status, AcquisitionStatus::NotOrdered);
    }

    #[test]
    fn test_set_status() {
        let mut list = list();
        let line = list.set_status(1, AcquisitionStatus::Rfq).unwrap();
        assert_eq!(line.status, AcquisitionStatus::Rfq);
        assert_eq!(
            list.set_status(2, AcquisitionStatus::Ordered).unwrap_err(),
            RoutingError::UnknownMaterial(3)
        );
    }

    #[test]
    fn test_fulfill_removes_line() {
        let mut list = list();
        let done = list.fulfill(0).unwrap();
        assert_eq!(done.material, "Acier 1020");
        assert_eq!(list.len(), 1);
        assert_eq!(list.lines()[0].material, "Alu 6061");
        assert!(list.fulfill(1).is_err());
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!(
            "not ordered".parse::<AcquisitionStatus>().unwrap(),
            AcquisitionStatus::NotOrdered
        );
        assert_eq!("RFQ".parse::<AcquisitionStatus>().unwrap(), AcquisitionStatus::Rfq);
        assert_eq!(AcquisitionStatus::NotOrdered.to_string(), "Not Ordered");
        assert!("lost".parse::<AcquisitionStatus>().is_err());
    }

    #[test]
    fn test_list_serializes_as_sequence() {
        let yaml = serde_yml::to_string(&list()).unwrap();
        assert!(yaml.starts_with("- material: Acier 1020"));
        assert!(yaml.contains("status: not_ordered"));
        assert!(!yaml.contains("fulfilled"));
        let parsed: MaterialList = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed, list());
    }

    #[test]
    fn test_stored_fulfilled_line_rejected() {
        let yaml = "- material: Acier 1020\n  status: received\n  fulfilled: true\n";
        assert!(serde_yml::from_str::<MaterialList>(yaml).is_err());
    }
}

//! Job entity - a customer order made of parts, materials and checklist milestones

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::core::catalog::ProcessCatalog;
use crate::core::error::RoutingError;
use crate::core::identity::JobId;
use crate::entities::checklist::Checklist;
use crate::entities::material::MaterialList;
use crate::entities::part::PartRouter;
use crate::planning::bulk::PartRecord;

fn default_revision() -> u32 {
    1
}

fn default_quantity() -> u32 {
    1
}

/// A customer job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,

    /// Human identifier, e.g. the customer's order number
    pub job_number: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_address: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_phone: String,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,

    /// Quoted price per unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,

    /// Reference date for every part's delivery status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_delivery: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub drawing: String,

    /// Display order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    parts: Vec<PartRouter>,

    #[serde(default)]
    pub checklist: Checklist,

    #[serde(default, skip_serializing_if = "MaterialList::is_empty")]
    pub materials: MaterialList,

    pub created: DateTime<Utc>,

    pub author: String,

    #[serde(default = "default_revision")]
    pub revision: u32,
}

impl Job {
    pub fn new(job_number: impl Into<String>, author: impl Into<String>) -> Result<Self, RoutingError> {
        let job_number = job_number.into().trim().to_string();
        if job_number.is_empty() {
            return Err(RoutingError::EmptyJobNumber);
        }
        Ok(Self {
            id: JobId::new(),
            job_number,
            description: String::new(),
            client: String::new(),
            client_address: String::new(),
            client_phone: String::new(),
            quantity: 1,
            cost: None,
            unit_price: None,
            target_delivery: None,
            status: String::new(),
            drawing: String::new(),
            parts: Vec::new(),
            checklist: Checklist::default(),
            materials: MaterialList::default(),
            created: Utc::now(),
            author: author.into(),
            revision: 1,
        })
    }

    /// Change the human identifier; uniqueness across jobs is the store's concern
    pub fn set_job_number(&mut self, job_number: &str) -> Result<(), RoutingError> {
        let job_number = job_number.trim();
        if job_number.is_empty() {
            return Err(RoutingError::EmptyJobNumber);
        }
        self.job_number = job_number.to_string();
        Ok(())
    }

    pub fn parts(&self) -> &[PartRouter] {
        &self.parts
    }

    pub fn part(&self, part_number: &str) -> Option<&PartRouter> {
        self.parts.iter().find(|p| p.part_number == part_number)
    }

    pub fn part_mut(&mut self, part_number: &str) -> Result<&mut PartRouter, RoutingError> {
        self.parts
            .iter_mut()
            .find(|p| p.part_number == part_number)
            .ok_or_else(|| RoutingError::UnknownPart(part_number.to_string()))
    }

    /// Part at a display position
    pub fn part_at(&self, index: usize) -> Option<&PartRouter> {
        self.parts.get(index)
    }

    fn has_part(&self, part_number: &str) -> bool {
        self.parts.iter().any(|p| p.part_number == part_number)
    }

    /// Append a part; its number must not already be used in this job
    pub fn add_part(&mut self, part: PartRouter) -> Result<usize, RoutingError> {
        if part.part_number.trim().is_empty() {
            return Err(RoutingError::empty_part_number());
        }
        if self.has_part(&part.part_number) {
            return Err(RoutingError::duplicate_part_number(part.part_number));
        }
        self.parts.push(part);
        Ok(self.parts.len() - 1)
    }

    /// Create and append an empty part router
    pub fn create_part(&mut self, part_number: &str) -> Result<&mut PartRouter, RoutingError> {
        let index = self.add_part(PartRouter::new(part_number)?)?;
        Ok(&mut self.parts[index])
    }

    /// Remove a part and all its tasks; later parts shift down one position.
    /// Returns the removed part and the position it held.
    pub fn delete_part(&mut self, part_number: &str) -> Result<(usize, PartRouter), RoutingError> {
        let index = self
            .parts
            .iter()
            .position(|p| p.part_number == part_number)
            .ok_or_else(|| RoutingError::UnknownPart(part_number.to_string()))?;
        Ok((index, self.parts.remove(index)))
    }

    /// Commit a batch of bulk-entry records as new parts.
    ///
    /// Every record is checked first (non-empty, not already in the job, not
    /// repeated in the batch); on any failure no part is added.
    pub fn add_generated_parts(&mut self, records: Vec<PartRecord>) -> Result<usize, RoutingError> {
        let mut batch: HashSet<&str> = HashSet::new();
        for record in &records {
            let number = record.part_number.trim();
            if number.is_empty() {
                return Err(RoutingError::empty_part_number());
            }
            if self.has_part(number) || !batch.insert(number) {
                return Err(RoutingError::duplicate_part_number(number));
            }
        }

        let parts = records
            .into_iter()
            .map(PartRecord::into_part)
            .collect::<Result<Vec<_>, _>>()?;
        let added = parts.len();
        self.parts.extend(parts);

        tracing::info!(job = %self.job_number, added, "generated parts committed");
        Ok(added)
    }

    /// Estimated delivery date of every part that has one
    pub fn part_delivery_dates(&self) -> BTreeMap<String, NaiveDate> {
        self.parts
            .iter()
            .filter_map(|p| p.estimated_delivery.map(|d| (p.part_number.clone(), d)))
            .collect()
    }

    /// Quoted total: unit price times job quantity
    pub fn total_price(&self) -> Option<f64> {
        self.unit_price.map(|p| p * f64::from(self.quantity))
    }

    /// Sum of routing hours over every part
    pub fn routing_hours(&self) -> f64 {
        self.parts
            .iter()
            .fold(0.0, |acc, p| acc + p.routing_hours())
    }

    /// Check what serde cannot: a non-empty job number, unique non-empty
    /// part numbers and valid task hours.
    ///
    /// Runs on every load, so it must not depend on the catalog.
    pub fn check_structure(&self) -> Result<(), RoutingError> {
        if self.job_number.trim().is_empty() {
            return Err(RoutingError::EmptyJobNumber);
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for part in &self.parts {
            if part.part_number.trim().is_empty() {
                return Err(RoutingError::empty_part_number());
            }
            if !seen.insert(part.part_number.as_str()) {
                return Err(RoutingError::duplicate_part_number(part.part_number.as_str()));
            }
            if let Some(bad) = part
                .tasks()
                .iter()
                .map(|t| t.hours())
                .find(|h| !h.is_finite() || *h < 0.0)
            {
                return Err(RoutingError::InvalidHours(bad));
            }
        }
        Ok(())
    }

    /// [`Job::check_structure`] plus every task operation belonging to its
    /// department in `catalog`
    pub fn validate(&self, catalog: &ProcessCatalog) -> Result<(), RoutingError> {
        self.check_structure()?;
        for part in &self.parts {
            if let Some(task) = part.tasks().iter().find(|t| !t.is_consistent(catalog)) {
                return Err(RoutingError::UnknownOperation {
                    department: task.department,
                    operation: task.operation().to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::bulk;

    fn job() -> Job {
        Job::new("J-2018-04", "test_author").unwrap()
    }

    #[test]
    fn test_job_creation() {
        let job = job();
        assert!(job.id.to_string().starts_with("JOB-"));
        assert_eq!(job.revision, 1);
        assert_eq!(job.quantity, 1);
        assert!(job.parts().is_empty());
        assert_eq!(job.checklist.completed(), 0);
        assert_eq!(Job::new(" ", "a").unwrap_err(), RoutingError::EmptyJobNumber);
    }

    #[test]
    fn test_add_part_rejects_duplicates() {
        let mut job = job();
        job.create_part("P-1").unwrap();
        assert_eq!(
            job.create_part("P-1").unwrap_err(),
            RoutingError::duplicate_part_number("P-1")
        );
        assert_eq!(job.create_part("").unwrap_err(), RoutingError::empty_part_number());
        assert_eq!(job.parts().len(), 1);
    }

    #[test]
    fn test_delete_part_shifts_positions() {
        let mut job = job();
        for pn in ["A", "B", "C"] {
            job.create_part(pn).unwrap();
        }
        let (index, removed) = job.delete_part("B").unwrap();
        assert_eq!(index, 1);
        assert_eq!(removed.part_number, "B");
        assert_eq!(job.part_at(1).unwrap().part_number, "C");
        assert_eq!(
            job.delete_part("B").unwrap_err(),
            RoutingError::UnknownPart("B".to_string())
        );
    }

    #[test]
    fn test_add_generated_parts() {
        let mut job = job();
        let added = job
            .add_generated_parts(bulk::generate("1000", 3, "DWG").unwrap())
            .unwrap();
        assert_eq!(added, 3);
        assert_eq!(job.parts()[2].part_number, "1000-3");
        assert_eq!(job.parts()[2].drawing, "DWG");
    }

    #[test]
    fn test_add_generated_parts_is_all_or_nothing() {
        let mut job = job();
        job.create_part("1000-2").unwrap();

        let err = job
            .add_generated_parts(bulk::generate("1000", 3, "").unwrap())
            .unwrap_err();
        assert_eq!(err, RoutingError::duplicate_part_number("1000-2"));
        assert_eq!(job.parts().len(), 1);

        let mut repeated = bulk::generate("X", 2, "").unwrap();
        repeated.push(PartRecord::new("X-1"));
        assert!(job.add_generated_parts(repeated).is_err());

        let with_blank = vec![PartRecord::new("Y-1"), PartRecord::new(" ")];
        assert!(job.add_generated_parts(with_blank).is_err());
        assert_eq!(job.parts().len(), 1);
    }

    #[test]
    fn test_part_delivery_dates_skip_unscheduled() {
        let mut job = job();
        let date = NaiveDate::from_ymd_opt(2018, 4, 18).unwrap();
        job.create_part("A").unwrap().estimated_delivery = Some(date);
        job.create_part("B").unwrap();
        let dates = job.part_delivery_dates();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates["A"], date);
    }

    #[test]
    fn test_total_price() {
        let mut job = job();
        assert_eq!(job.total_price(), None);
        job.unit_price = Some(12.5);
        job.quantity = 4;
        assert_eq!(job.total_price(), Some(50.0));
    }

    #[test]
    fn test_routing_hours_of_empty_job_is_positive_zero() {
        let mut job = job();
        assert!(job.routing_hours().is_sign_positive());
        job.create_part("A").unwrap();
        assert_eq!(job.routing_hours(), 0.0);
        assert!(job.routing_hours().is_sign_positive());
    }

    fn two_part_yaml() -> String {
        let catalog = ProcessCatalog::reference();
        let mut job = job();
        let a = job.create_part("P-1").unwrap();
        a.estimated_delivery = NaiveDate::from_ymd_opt(2018, 4, 18);
        a.add_task(&catalog, None, None, Some(2.5)).unwrap();
        job.create_part("P-2").unwrap().estimated_delivery = NaiveDate::from_ymd_opt(2018, 4, 28);
        serde_yml::to_string(&job).unwrap()
    }

    #[test]
    fn test_stored_duplicate_part_number_rejected() {
        let yaml = two_part_yaml().replace("part_number: P-2", "part_number: P-1");
        let parsed: Job = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.parts().len(), 2);
        assert_eq!(
            parsed.check_structure().unwrap_err(),
            RoutingError::duplicate_part_number("P-1")
        );
        assert!(parsed.validate(&ProcessCatalog::reference()).is_err());
    }

    #[test]
    fn test_stored_empty_part_number_rejected() {
        let yaml = two_part_yaml().replace("part_number: P-2", "part_number: ''");
        let parsed: Job = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.check_structure().unwrap_err(), RoutingError::empty_part_number());
    }

    #[test]
    fn test_stored_negative_hours_rejected() {
        let yaml = two_part_yaml().replace("hours: 2.5", "hours: -5.0");
        let parsed: Job = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.check_structure().unwrap_err(), RoutingError::InvalidHours(-5.0));
    }

    #[test]
    fn test_validate_reports_foreign_operation() {
        let catalog = ProcessCatalog::reference();
        let yaml = two_part_yaml().replace("operation: Planning", "operation: Lathe");
        let parsed: Job = serde_yml::from_str(&yaml).unwrap();
        parsed.check_structure().unwrap();
        assert!(matches!(
            parsed.validate(&catalog).unwrap_err(),
            RoutingError::UnknownOperation { ref operation, .. } if operation == "Lathe"
        ));

        let clean: Job = serde_yml::from_str(&two_part_yaml()).unwrap();
        clean.validate(&catalog).unwrap();
    }

    #[test]
    fn test_job_yaml_roundtrip() {
        let mut job = job();
        job.client = "Acme".to_string();
        job.target_delivery = NaiveDate::from_ymd_opt(2018, 4, 21);
        job.create_part("P-1").unwrap();

        let yaml = serde_yml::to_string(&job).unwrap();
        assert!(yaml.contains("job_number: J-2018-04"));
        assert!(yaml.contains("target_delivery: 2018-04-21"));
        assert!(!yaml.contains("materials"));

        let parsed: Job = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed, job);
    }
}

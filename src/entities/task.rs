//! Process task - one manufacturing step in a part's routing

use serde::{Deserialize, Serialize};

use crate::core::catalog::{Department, ProcessCatalog};
use crate::core::error::RoutingError;

fn default_visible() -> bool {
    true
}

fn is_true(v: &bool) -> bool {
    *v
}

/// One manufacturing operation step within a part router
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessTask {
    pub department: Department,

    /// Always a member of the department's operation list
    operation: String,

    #[serde(default)]
    hours: f64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    /// Presentation flag for the notes field
    #[serde(default = "default_visible", skip_serializing_if = "is_true")]
    pub notes_visible: bool,
}

impl ProcessTask {
    /// A zero-hour task on the department's first operation
    pub fn new(catalog: &ProcessCatalog, department: Department) -> Self {
        Self {
            department,
            operation: catalog.default_operation(department).to_string(),
            hours: 0.0,
            notes: String::new(),
            notes_visible: true,
        }
    }

    /// A task with an explicit operation and hours
    pub fn with_operation(
        catalog: &ProcessCatalog,
        department: Department,
        operation: &str,
        hours: f64,
    ) -> Result<Self, RoutingError> {
        let mut task = Self::new(catalog, department);
        task.set_operation(catalog, operation)?;
        task.set_hours(hours)?;
        Ok(task)
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }

    /// Move the task to another department; the operation snaps to that
    /// department's first entry
    pub fn set_department(&mut self, catalog: &ProcessCatalog, department: Department) {
        self.department = department;
        self.operation = catalog.default_operation(department).to_string();
    }

    /// Select an operation of the current department (case-insensitive)
    pub fn set_operation(
        &mut self,
        catalog: &ProcessCatalog,
        operation: &str,
    ) -> Result<(), RoutingError> {
        let canonical = catalog
            .resolve_operation(self.department, operation)
            .ok_or_else(|| RoutingError::UnknownOperation {
                department: self.department,
                operation: operation.to_string(),
            })?;
        self.operation = canonical.to_string();
        Ok(())
    }

    /// Select an operation by its position in the current department's list
    pub fn select_operation(
        &mut self,
        catalog: &ProcessCatalog,
        index: usize,
    ) -> Result<(), RoutingError> {
        let operation = catalog.operation_at(self.department, index).ok_or_else(|| {
            RoutingError::UnknownOperation {
                department: self.department,
                operation: format!("#{}", index + 1),
            }
        })?;
        self.operation = operation.to_string();
        Ok(())
    }

    pub fn set_hours(&mut self, hours: f64) -> Result<(), RoutingError> {
        if !hours.is_finite() || hours < 0.0 {
            return Err(RoutingError::InvalidHours(hours));
        }
        self.hours = hours;
        Ok(())
    }

    /// True if the stored operation still belongs to the department
    pub fn is_consistent(&self, catalog: &ProcessCatalog) -> bool {
        catalog.contains(self.department, &self.operation)
    }
}

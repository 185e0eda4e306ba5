//! Part router - manufacturing routing record for one part

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::catalog::{Department, ProcessCatalog, ProcessTemplate};
use crate::core::error::RoutingError;
use crate::entities::task::ProcessTask;

fn default_quantity() -> u32 {
    1
}

/// A part's attributes plus its ordered task sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRouter {
    /// Unique within the owning job
    pub part_number: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub material: String,

    /// Unit cost
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,

    /// Unit selling price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,

    /// Hours quoted for the part (free attribute, see [`PartRouter::routing_hours`])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dimension: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub drawing: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<NaiveDate>,

    /// Execution order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tasks: Vec<ProcessTask>,
}

impl PartRouter {
    /// Create an empty router; the part number must be non-empty
    pub fn new(part_number: impl Into<String>) -> Result<Self, RoutingError> {
        let part_number = part_number.into().trim().to_string();
        if part_number.is_empty() {
            return Err(RoutingError::empty_part_number());
        }
        Ok(Self {
            part_number,
            description: String::new(),
            quantity: 1,
            material: String::new(),
            cost: None,
            price: None,
            status: String::new(),
            hours: None,
            dimension: String::new(),
            drawing: String::new(),
            estimated_delivery: None,
            tasks: Vec::new(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }

    pub fn with_drawing(mut self, drawing: impl Into<String>) -> Self {
        self.drawing = drawing.into();
        self
    }

    pub fn with_estimated_delivery(mut self, date: NaiveDate) -> Self {
        self.estimated_delivery = Some(date);
        self
    }

    pub fn tasks(&self) -> &[ProcessTask] {
        &self.tasks
    }

    pub fn task(&self, index: usize) -> Option<&ProcessTask> {
        self.tasks.get(index)
    }

    fn task_mut(&mut self, index: usize) -> Result<&mut ProcessTask, RoutingError> {
        let part_number = &self.part_number;
        self.tasks
            .get_mut(index)
            .ok_or_else(|| RoutingError::UnknownTask {
                part_number: part_number.clone(),
                index: index + 1,
            })
    }

    /// Append a task and return its index.
    ///
    /// Department defaults to Methods, operation to the department's first
    /// entry, hours to zero.
    pub fn add_task(
        &mut self,
        catalog: &ProcessCatalog,
        department: Option<Department>,
        operation: Option<&str>,
        hours: Option<f64>,
    ) -> Result<usize, RoutingError> {
        let department = department.unwrap_or_default();
        let mut task = ProcessTask::new(catalog, department);
        if let Some(op) = operation {
            task.set_operation(catalog, op)?;
        }
        if let Some(h) = hours {
            task.set_hours(h)?;
        }
        self.tasks.push(task);
        Ok(self.tasks.len() - 1)
    }

    /// Remove the most recently added task
    pub fn remove_last_task(&mut self) -> Result<ProcessTask, RoutingError> {
        self.tasks
            .pop()
            .ok_or_else(|| RoutingError::EmptyTaskList(self.part_number.clone()))
    }

    /// Discard every task and load the template's steps in order.
    ///
    /// All steps are validated first; on error the part is left untouched.
    pub fn apply_template(
        &mut self,
        catalog: &ProcessCatalog,
        template: &ProcessTemplate,
    ) -> Result<(), RoutingError> {
        let steps = catalog.resolve_template(template)?;
        let tasks = steps
            .into_iter()
            .map(|step| {
                ProcessTask::with_operation(catalog, step.department, &step.operation, step.hours)
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            part = %self.part_number,
            template = %template.name,
            replaced = self.tasks.len(),
            loaded = tasks.len(),
            "replacing task list from template"
        );
        self.tasks = tasks;
        Ok(())
    }

    /// Show or hide one task's notes; no effect on hours or validation
    pub fn toggle_task_notes(&mut self, index: usize, visible: bool) -> Result<(), RoutingError> {
        self.task_mut(index)?.notes_visible = visible;
        Ok(())
    }

    /// Show or hide the notes of every task
    pub fn set_all_notes_visible(&mut self, visible: bool) {
        for task in &mut self.tasks {
            task.notes_visible = visible;
        }
    }

    pub fn set_task_department(
        &mut self,
        catalog: &ProcessCatalog,
        index: usize,
        department: Department,
    ) -> Result<(), RoutingError> {
        self.task_mut(index)?.set_department(catalog, department);
        Ok(())
    }

    pub fn set_task_operation(
        &mut self,
        catalog: &ProcessCatalog,
        index: usize,
        operation: &str,
    ) -> Result<(), RoutingError> {
        self.task_mut(index)?.set_operation(catalog, operation)
    }

    /// Pick a task's operation by its position in the department's list
    pub fn select_task_operation(
        &mut self,
        catalog: &ProcessCatalog,
        index: usize,
        position: usize,
    ) -> Result<(), RoutingError> {
        self.task_mut(index)?.select_operation(catalog, position)
    }

    pub fn set_task_hours(&mut self, index: usize, hours: f64) -> Result<(), RoutingError> {
        self.task_mut(index)?.set_hours(hours)
    }

    pub fn set_task_notes(
        &mut self,
        index: usize,
        notes: impl Into<String>,
    ) -> Result<(), RoutingError> {
        self.task_mut(index)?.notes = notes.into();
        Ok(())
    }

    /// Sum of all task hours
    pub fn routing_hours(&self) -> f64 {
        self.tasks.iter().fold(0.0, |acc, t| acc + t.hours())
    }

    /// Tasks whose operation no longer belongs to their department
    /// (e.g. after a catalog override removed it)
    pub fn inconsistent_tasks(&self, catalog: &ProcessCatalog) -> Vec<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_consistent(catalog))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::TemplateStep;

    fn part() -> PartRouter {
        PartRouter::new("Part-01").unwrap()
    }

    #[test]
    fn test_new_part_rejects_empty_number() {
        assert_eq!(
            PartRouter::new("   ").unwrap_err(),
            RoutingError::empty_part_number()
        );
        assert_eq!(PartRouter::new(" P-1 ").unwrap().part_number, "P-1");
    }

    #[test]
    fn test_add_task_defaults_and_index() {
        let catalog = ProcessCatalog::reference();
        let mut p = part();
        assert_eq!(p.add_task(&catalog, None, None, None).unwrap(), 0);
        assert_eq!(
            p.add_task(&catalog, Some(Department::Machining), Some("Lathe"), Some(2.5))
                .unwrap(),
            1
        );

        assert_eq!(p.tasks()[0].department, Department::Methods);
        assert_eq!(p.tasks()[0].operation(), "Planning");
        assert_eq!(p.tasks()[0].hours(), 0.0);
        assert_eq!(p.tasks()[1].operation(), "Lathe");
        assert_eq!(p.routing_hours(), 2.5);
    }

    #[test]
    fn test_routing_hours_without_tasks_is_positive_zero() {
        let p = part();
        assert_eq!(p.routing_hours(), 0.0);
        assert!(p.routing_hours().is_sign_positive());
        assert_eq!(format!("{:.1}", p.routing_hours()), "0.0");
    }

    #[test]
    fn test_select_task_operation_by_position() {
        let catalog = ProcessCatalog::reference();
        let mut p = part();
        p.add_task(&catalog, Some(Department::Machining), None, None).unwrap();
        p.select_task_operation(&catalog, 0, 2).unwrap();
        assert_eq!(p.tasks()[0].operation(), "3-axis mill");
        assert!(p.select_task_operation(&catalog, 0, 3).is_err());
        assert!(p.select_task_operation(&catalog, 1, 0).is_err());
        assert_eq!(p.tasks()[0].operation(), "3-axis mill");
    }

    #[test]
    fn test_add_task_rejects_foreign_operation() {
        let catalog = ProcessCatalog::reference();
        let mut p = part();
        let err = p
            .add_task(&catalog, Some(Department::Methods), Some("Lathe"), None)
            .unwrap_err();
        assert!(matches!(err, RoutingError::UnknownOperation { .. }));
        assert!(p.tasks().is_empty());
    }

    #[test]
    fn test_remove_last_task() {
        let catalog = ProcessCatalog::reference();
        let mut p = part();
        p.add_task(&catalog, Some(Department::Machining), None, None).unwrap();
        p.add_task(&catalog, Some(Department::Inspection), None, None).unwrap();

        let removed = p.remove_last_task().unwrap();
        assert_eq!(removed.department, Department::Inspection);
        assert_eq!(p.tasks().len(), 1);

        p.remove_last_task().unwrap();
        assert_eq!(
            p.remove_last_task().unwrap_err(),
            RoutingError::EmptyTaskList("Part-01".to_string())
        );
    }

    #[test]
    fn test_apply_template_replaces_existing_tasks() {
        let catalog = ProcessCatalog::reference();
        let mut p = part();
        p.add_task(&catalog, Some(Department::SubContracting), None, Some(8.0))
            .unwrap();

        p.apply_template(&catalog, &ProcessTemplate::standard()).unwrap();
        assert_eq!(p.tasks().len(), 5);
        assert_eq!(p.tasks()[0].operation(), "Planning");
        assert_eq!(p.tasks()[4].department, Department::Inspection);
        assert_eq!(p.routing_hours(), 10.5);
    }

    #[test]
    fn test_apply_template_is_idempotent() {
        let catalog = ProcessCatalog::reference();
        let template = ProcessTemplate::standard();

        let mut once = part();
        once.apply_template(&catalog, &template).unwrap();

        let mut twice = part();
        twice.apply_template(&catalog, &template).unwrap();
        twice.apply_template(&catalog, &template).unwrap();

        assert_eq!(once.tasks(), twice.tasks());
    }

    #[test]
    fn test_apply_template_out_of_range_leaves_part_untouched() {
        let catalog = ProcessCatalog::reference();
        let mut p = part();
        p.add_task(&catalog, Some(Department::Machining), None, Some(1.0))
            .unwrap();
        let before = p.clone();

        let bad = ProcessTemplate {
            name: "bad".to_string(),
            description: None,
            steps: vec![TemplateStep::new(0, 0, 1.0), TemplateStep::new(3, 2, 1.0)],
        };
        let err = p.apply_template(&catalog, &bad).unwrap_err();
        assert_eq!(
            err,
            RoutingError::TemplateIndexOutOfRange {
                step: 2,
                department_index: 3,
                operation_index: 2
            }
        );
        assert_eq!(p, before);

        let bad_dept = ProcessTemplate {
            name: "bad".to_string(),
            description: None,
            steps: vec![TemplateStep::new(5, 0, 1.0)],
        };
        assert!(p.apply_template(&catalog, &bad_dept).is_err());
        assert_eq!(p, before);
    }

    #[test]
    fn test_toggle_notes_is_presentation_only() {
        let catalog = ProcessCatalog::reference();
        let mut p = part();
        p.add_task(&catalog, Some(Department::Machining), None, Some(4.0))
            .unwrap();

        p.toggle_task_notes(0, false).unwrap();
        assert!(!p.tasks()[0].notes_visible);
        assert_eq!(p.tasks()[0].hours(), 4.0);
        assert!(p.tasks()[0].is_consistent(&catalog));

        assert_eq!(
            p.toggle_task_notes(3, true).unwrap_err(),
            RoutingError::UnknownTask {
                part_number: "Part-01".to_string(),
                index: 4
            }
        );

        p.set_all_notes_visible(true);
        assert!(p.tasks()[0].notes_visible);
    }

    #[test]
    fn test_inconsistent_tasks_after_catalog_change() {
        let catalog = ProcessCatalog::reference();
        let mut p = part();
        p.add_task(&catalog, Some(Department::Machining), Some("3-axis mill"), None)
            .unwrap();

        let narrowed = ProcessCatalog::reference()
            .with_operations(Department::Machining, vec!["Lathe".to_string()])
            .unwrap();
        assert_eq!(p.inconsistent_tasks(&narrowed), vec![0]);
        assert!(p.inconsistent_tasks(&catalog).is_empty());
    }
}

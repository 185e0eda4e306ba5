//! Process catalog - departments, their operations, and canned task templates
//!
//! The catalog is built once per run (reference data, then configuration
//! overrides) and handed by reference to anything that creates or edits
//! process tasks. Nothing reads it as global state.

use serde::{Deserialize, Serialize};

use crate::core::error::RoutingError;

/// Shop department a process task is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Department {
    #[default]
    Methods,
    Machining,
    SubContracting,
    SurfaceTreatment,
    Inspection,
}

impl Department {
    /// All departments in display order
    pub const ALL: [Department; 5] = [
        Department::Methods,
        Department::Machining,
        Department::SubContracting,
        Department::SurfaceTreatment,
        Department::Inspection,
    ];

    /// Position of this department in [`Department::ALL`]
    pub fn index(self) -> usize {
        match self {
            Department::Methods => 0,
            Department::Machining => 1,
            Department::SubContracting => 2,
            Department::SurfaceTreatment => 3,
            Department::Inspection => 4,
        }
    }

    /// Department at a display position, if any
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Stable identifier used in files and on the command line
    pub fn key(self) -> &'static str {
        match self {
            Department::Methods => "methods",
            Department::Machining => "machining",
            Department::SubContracting => "sub_contracting",
            Department::SurfaceTreatment => "surface_treatment",
            Department::Inspection => "inspection",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Department::Methods => write!(f, "Methods"),
            Department::Machining => write!(f, "Machining"),
            Department::SubContracting => write!(f, "Sub-contracting"),
            Department::SurfaceTreatment => write!(f, "Surface Treatment"),
            Department::Inspection => write!(f, "Inspection"),
        }
    }
}

impl std::str::FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        match squashed.as_str() {
            "methods" => Ok(Department::Methods),
            "machining" => Ok(Department::Machining),
            "subcontracting" => Ok(Department::SubContracting),
            "surfacetreatment" => Ok(Department::SurfaceTreatment),
            "inspection" => Ok(Department::Inspection),
            _ => Err(format!(
                "Invalid department: {}. Use methods, machining, sub_contracting, surface_treatment, or inspection",
                s
            )),
        }
    }
}

/// One step of a process template, addressed by catalog position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateStep {
    pub department_index: usize,
    pub operation_index: usize,
    #[serde(default)]
    pub hours: f64,
}

impl TemplateStep {
    pub fn new(department_index: usize, operation_index: usize, hours: f64) -> Self {
        Self {
            department_index,
            operation_index,
            hours,
        }
    }
}

/// A canned, ordered list of task definitions applied to a part as a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessTemplate {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub steps: Vec<TemplateStep>,
}

impl ProcessTemplate {
    /// The shop's standard routing: plan, program, turn, anodize, inspect
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            description: Some("Planning, programming, lathe, surface treatment, inspection".to_string()),
            steps: vec![
                TemplateStep::new(0, 0, 0.5),
                TemplateStep::new(0, 1, 3.0),
                TemplateStep::new(1, 0, 5.0),
                TemplateStep::new(3, 0, 1.0),
                TemplateStep::new(4, 0, 1.0),
            ],
        }
    }
}

/// A template step resolved against the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStep {
    pub department: Department,
    pub operation: String,
    pub hours: f64,
}

/// Department → operations lookup plus the named templates
#[derive(Debug, Clone)]
pub struct ProcessCatalog {
    operations: [Vec<String>; 5],
    templates: Vec<ProcessTemplate>,
}

impl Default for ProcessCatalog {
    fn default() -> Self {
        Self::reference()
    }
}

impl ProcessCatalog {
    /// Catalog with the shop's reference departments and the standard template
    pub fn reference() -> Self {
        fn ops(names: &[&str]) -> Vec<String> {
            names.iter().map(|s| s.to_string()).collect()
        }

        Self {
            operations: [
                ops(&["Planning", "Programming"]),
                ops(&["Lathe", "5-axis mill", "3-axis mill"]),
                ops(&["JobShop", "MechantMachinage", "MachinMachine", "ToolShop"]),
                ops(&["Black Oxyde", "Hard Anodize"]),
                ops(&["Manual Inspection", "CMM Inspection"]),
            ],
            templates: vec![ProcessTemplate::standard()],
        }
    }

    /// Replace one department's operation list
    pub fn with_operations(
        mut self,
        department: Department,
        operations: Vec<String>,
    ) -> Result<Self, RoutingError> {
        if operations.is_empty() {
            return Err(RoutingError::EmptyOperationList(department));
        }
        self.operations[department.index()] = operations;
        Ok(self)
    }

    /// Add a template, replacing any existing template with the same name
    pub fn with_template(mut self, template: ProcessTemplate) -> Self {
        self.templates.retain(|t| t.name != template.name);
        self.templates.push(template);
        self
    }

    /// Operations valid for a department, in display order
    pub fn operations(&self, department: Department) -> &[String] {
        &self.operations[department.index()]
    }

    /// The operation a task falls back to when its department changes
    pub fn default_operation(&self, department: Department) -> &str {
        // Lists are non-empty by construction
        self.operations(department)
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Operation at a position within the department's current list
    pub fn operation_at(&self, department: Department, index: usize) -> Option<&str> {
        self.operations(department).get(index).map(String::as_str)
    }

    /// Canonical spelling of an operation name (case-insensitive match)
    pub fn resolve_operation(&self, department: Department, name: &str) -> Option<&str> {
        let wanted = name.trim().to_lowercase();
        self.operations(department)
            .iter()
            .find(|op| op.to_lowercase() == wanted)
            .map(String::as_str)
    }

    pub fn contains(&self, department: Department, operation: &str) -> bool {
        self.operations(department).iter().any(|op| op == operation)
    }

    pub fn templates(&self) -> &[ProcessTemplate] {
        &self.templates
    }

    pub fn template(&self, name: &str) -> Result<&ProcessTemplate, RoutingError> {
        self.templates
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| RoutingError::UnknownTemplate(name.to_string()))
    }

    /// Resolve every step of a template, failing on the first bad index
    pub fn resolve_template(
        &self,
        template: &ProcessTemplate,
    ) -> Result<Vec<ResolvedStep>, RoutingError> {
        template
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let out_of_range = || RoutingError::TemplateIndexOutOfRange {
                    step: i + 1,
                    department_index: step.department_index,
                    operation_index: step.operation_index,
                };
                let department =
                    Department::from_index(step.department_index).ok_or_else(out_of_range)?;
                let operation = self
                    .operation_at(department, step.operation_index)
                    .ok_or_else(out_of_range)?;
                if !step.hours.is_finite() || step.hours < 0.0 {
                    return Err(RoutingError::InvalidHours(step.hours));
                }
                Ok(ResolvedStep {
                    department,
                    operation: operation.to_string(),
                    hours: step.hours,
                })
            })
            .collect()
    }
}

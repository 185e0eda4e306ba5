//! Domain errors for job routing operations
//!
//! Every rejected mutation on a job, part, task, checklist or material list
//! surfaces as one of these variants so callers can render a precise message.

use miette::Diagnostic;
use thiserror::Error;

use crate::core::catalog::Department;

/// Why a part number was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartNumberProblem {
    Empty,
    Duplicate,
}

impl std::fmt::Display for PartNumberProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartNumberProblem::Empty => write!(f, "part number is empty"),
            PartNumberProblem::Duplicate => write!(f, "part number is already used in this job"),
        }
    }
}

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum RoutingError {
    #[error("invalid part number '{part_number}': {problem}")]
    #[diagnostic(
        code(jobroute::part::invalid_number),
        help("part numbers must be non-empty and unique within a job")
    )]
    InvalidPartNumber {
        part_number: String,
        problem: PartNumberProblem,
    },

    #[error("job number is empty")]
    #[diagnostic(code(jobroute::job::invalid_number))]
    EmptyJobNumber,

    #[error("invalid quantity '{0}': expected a positive whole number")]
    #[diagnostic(
        code(jobroute::bulk::invalid_quantity),
        help("one batch holds 1 to 10000 parts")
    )]
    InvalidQuantity(String),

    #[error("part '{0}' has no tasks to remove")]
    #[diagnostic(code(jobroute::task::empty))]
    EmptyTaskList(String),

    #[error("unknown checklist item '{0}'")]
    #[diagnostic(
        code(jobroute::checklist::unknown_item),
        help("valid items: Confirmation, Material Requisition, Purchase, Job Released")
    )]
    UnknownChecklistItem(String),

    #[error("no part has an estimated delivery date")]
    #[diagnostic(
        code(jobroute::schedule::no_parts),
        help("set one with `jobroute part set <job> <part> --delivery YYYY-MM-DD`")
    )]
    NoPartsScheduled,

    #[error("template step {step} references department {department_index}, operation {operation_index}, which does not exist")]
    #[diagnostic(code(jobroute::template::out_of_range))]
    TemplateIndexOutOfRange {
        step: usize,
        department_index: usize,
        operation_index: usize,
    },

    #[error("'{operation}' is not an operation of {department}")]
    #[diagnostic(code(jobroute::task::unknown_operation))]
    UnknownOperation {
        department: Department,
        operation: String,
    },

    #[error("invalid hours {0}: must be a finite, non-negative number")]
    #[diagnostic(code(jobroute::task::invalid_hours))]
    InvalidHours(f64),

    #[error("no part '{0}' in this job")]
    #[diagnostic(code(jobroute::part::unknown))]
    UnknownPart(String),

    #[error("part '{part_number}' has no task #{index}")]
    #[diagnostic(code(jobroute::task::unknown), help("tasks are numbered from 1"))]
    UnknownTask { part_number: String, index: usize },

    #[error("no material line #{0}")]
    #[diagnostic(code(jobroute::material::unknown), help("material lines are numbered from 1"))]
    UnknownMaterial(usize),

    #[error("'{0}' is not on the roster")]
    #[diagnostic(
        code(jobroute::checklist::unknown_assignee),
        help("add the name to `roster:` in .jobroute/config.yaml")
    )]
    UnknownAssignee(String),

    #[error("no process template named '{0}'")]
    #[diagnostic(code(jobroute::template::unknown), help("run `jobroute catalog` to list templates"))]
    UnknownTemplate(String),

    #[error("job '{0}' has no target delivery date")]
    #[diagnostic(
        code(jobroute::schedule::no_target),
        help("set one with `jobroute job set <job> --delivery YYYY-MM-DD`")
    )]
    MissingTargetDate(String),

    #[error("department {0} has an empty operation list")]
    #[diagnostic(code(jobroute::catalog::empty_department))]
    EmptyOperationList(Department),

    #[error("bulk import failed at row {row}: {message}")]
    #[diagnostic(code(jobroute::bulk::import))]
    BulkImport { row: usize, message: String },
}

impl RoutingError {
    pub(crate) fn empty_part_number() -> Self {
        RoutingError::InvalidPartNumber {
            part_number: String::new(),
            problem: PartNumberProblem::Empty,
        }
    }

    pub(crate) fn duplicate_part_number(part_number: impl Into<String>) -> Self {
        RoutingError::InvalidPartNumber {
            part_number: part_number.into(),
            problem: PartNumberProblem::Duplicate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let err = RoutingError::duplicate_part_number("170888-1");
        assert_eq!(
            err.to_string(),
            "invalid part number '170888-1': part number is already used in this job"
        );

        let err = RoutingError::InvalidQuantity("abc".to_string());
        assert!(err.to_string().contains("'abc'"));
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = RoutingError::NoPartsScheduled;
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("jobroute::schedule::no_parts".to_string())
        );
    }
}

//! Reporting layer: job summary record, customer documents, text charts

pub mod chart;
pub mod document;
pub mod summary;

pub use chart::bar_chart;
pub use document::{DocumentError, DocumentKind, DocumentRenderer, TeraRenderer};
pub use summary::{ChecklistLine, JobSummary};

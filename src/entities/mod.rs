//! Routing domain model
//!
//! - [`Job`] - customer order: parts, materials, checklist, target delivery
//! - [`PartRouter`] - one part's attributes and ordered process tasks
//! - [`ProcessTask`] - a single department/operation step
//! - [`Checklist`] - the four administrative milestones of a job
//! - [`MaterialList`] - stock still to acquire

pub mod checklist;
pub mod job;
pub mod material;
pub mod part;
pub mod task;

pub use checklist::{Checklist, ChecklistItem, Milestone};
pub use job::Job;
pub use material::{AcquisitionStatus, MaterialList, MaterialRequirement};
pub use part::PartRouter;
pub use task::ProcessTask;

//! jobroute: shop-floor job routing
//!
//! Jobs, their parts and each part's process routing, material needs and
//! checklist milestones, kept as plain YAML files in a project directory.

pub mod cli;
pub mod core;
pub mod entities;
pub mod planning;
pub mod report;
pub mod yaml;

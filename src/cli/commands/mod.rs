//! CLI command implementations

pub mod bulk;
pub mod catalog;
pub mod check;
pub mod completions;
pub mod init;
pub mod job;
pub mod mat;
pub mod part;
pub mod report;
pub mod schedule;
pub mod task;

//! Core module - catalog, errors, identity, configuration and storage

pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod logging;
pub mod project;
pub mod shortid;
pub mod store;

pub use catalog::{Department, ProcessCatalog, ProcessTemplate, TemplateStep};
pub use config::{CompanyInfo, Config};
pub use error::RoutingError;
pub use identity::{IdParseError, JobId};
pub use project::{Project, ProjectError};
pub use shortid::ShortIdIndex;
pub use store::StoreError;

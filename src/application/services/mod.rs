//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CommandRunner)
//! but are themselves concrete structs, not traits.

mod install;
mod report;

pub use install::{InstallCommand, InstallReport, InstallService, InstallTarget};
pub use report::{extract_tree_section, ReportService};

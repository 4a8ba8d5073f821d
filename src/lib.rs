//! Replays a `mvn dependency:tree` report into `mvn install:install-file`
//! calls, so a copied dependency directory can seed an offline repository.
//!
//! Layers, innermost first:
//! - [`domain`]: coordinates, dependency trees, tree reconstruction
//! - [`application`]: report parsing and installation services
//! - [`infrastructure`]: filesystem and process boundaries, service wiring
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

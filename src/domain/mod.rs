//! Domain layer: coordinates, dependency trees and tree reconstruction
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod coordinate;
pub mod error;
pub mod tree;

pub use builder::{compute_level, Indent, TreeBuilder};
pub use coordinate::Coordinate;
pub use error::DomainError;
pub use tree::{DependencyNode, PreOrderIter, TreeNodeConvert};

//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed dependency-tree input.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed coordinate '{coordinate}': expected 5 or 6 fields, found {fields}")]
    MalformedCoordinate { coordinate: String, fields: usize },

    #[error("malformed indentation, no branch marker after {level} level(s): '{line}'")]
    MalformedIndentation { line: String, level: usize },

    #[error("malformed indentation, level {level} below a level {parent_level} node: '{line}'")]
    SkippedLevel {
        line: String,
        level: usize,
        parent_level: usize,
    },
}

//! Application-level errors (wraps domain errors)

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Which of a node's two files is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Library,
    Pom,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Library => write!(f, "library"),
            ArtifactKind::Pom => write!(f, "pom"),
        }
    }
}

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{kind} file not found: {path}")]
    MissingArtifactFile { kind: ArtifactKind, path: PathBuf },

    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("install command failed ({}): {command}\n{output}", exit_status(.exit_code))]
    ExternalCommandFailure {
        command: String,
        exit_code: Option<i32>,
        /// Captured stderr, or stdout when stderr is empty
        output: String,
    },

    #[error("dependency tree start marker '{marker}' not found in {path}")]
    SectionNotFound { marker: String, path: PathBuf },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}: {source}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "killed by signal".to_string(),
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

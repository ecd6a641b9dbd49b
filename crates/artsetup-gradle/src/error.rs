//! Errors specific to Gradle script resolution.

use artsetup_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradleError {
    #[error("Invalid working directory '{}'", path.display())]
    InvalidWorkingDirectory { path: PathBuf },

    #[error("No repository found in {source_name}")]
    NoRepositoryFound { source_name: String },

    #[error("No valid repository URL in {source_name} (tried: {})", attempted.join(", "))]
    NoValidUrl {
        source_name: String,
        attempted: Vec<String>,
        #[source]
        cause: CoreError,
    },

    #[error("Unresolved property in '{value}' ({source_name})")]
    UnresolvedProperty { source_name: String, value: String },

    #[error("Missing '{coordinate}' assignment in {}", file.display())]
    MissingCoordinate {
        coordinate: &'static str,
        file: PathBuf,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GradleError>;

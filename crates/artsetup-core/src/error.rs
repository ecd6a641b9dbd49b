//! Core error types for artsetup.

use thiserror::Error;

/// Errors shared by every tool integration.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid repository URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, CoreError>;

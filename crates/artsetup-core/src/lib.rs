//! Core abstractions for artsetup.
//!
//! Tool-agnostic building blocks shared by the per-tool crates:
//! - [`error`]: the shared error type
//! - [`properties`]: Java-style `.properties` reading
//! - [`repo_key`]: repository key extraction from repository URLs

pub mod error;
pub mod properties;
pub mod repo_key;

pub use error::{CoreError, Result};
pub use properties::{PropertyTable, parse_properties, read_properties_file};
pub use repo_key::extract_repo_key_from_artifactory_url;

//! Gradle support for artsetup.
//!
//! Reads Gradle build scripts without running Gradle to work out:
//! - which configured repository published artifacts go to
//!   ([`get_gradle_deploy_repository`])
//! - the project's `group:artifact:version` ([`get_gradle_artifact_coordinates`])
//! - whether a command line publishes at all ([`was_publish_command`])
//!
//! Both Groovy (`build.gradle`) and Kotlin (`build.gradle.kts`) DSLs are
//! handled heuristically: only the shapes projects conventionally use for
//! publishing configuration are recognised.

pub mod command;
pub mod config;
pub mod coordinates;
pub mod deploy;
pub mod error;
pub mod parser;
pub mod project;
pub mod selection;
pub mod types;

pub use command::{extract_build_file_path, was_publish_command};
pub use config::ResolverOptions;
pub use coordinates::get_gradle_artifact_coordinates;
pub use deploy::get_gradle_deploy_repository;
pub use error::{GradleError, Result};
pub use selection::{Channel, find_repo_in_properties, find_repository_key_from_matches};
pub use types::{ArtifactCoordinates, Dsl, ScriptDocument};

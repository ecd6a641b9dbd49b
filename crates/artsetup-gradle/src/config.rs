//! Resolver options.

use crate::command::extract_build_file_path;
use crate::parser::properties::{PropertyTable, parse_properties_from_args};
use serde::Deserialize;
use std::path::PathBuf;

/// Options shared by the deploy-repository and coordinate resolvers.
///
/// Deserializable so callers can keep them in a JSON options file:
///
/// ```json
/// { "properties": { "artifactoryUrl": "http://localhost:8081/artifactory" },
///   "buildFile": "sub/build.gradle", "maxIncludeDepth": 2 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverOptions {
    /// Highest-precedence properties, layered over everything read from
    /// the project.
    pub properties: PropertyTable,
    /// Build script to use instead of discovering one in the working
    /// directory. Relative paths are taken from the working directory.
    pub build_file: Option<PathBuf>,
    /// How many levels of `apply from` to follow.
    pub max_include_depth: usize,
    /// Version suffix that marks a snapshot.
    pub snapshot_suffix: String,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            properties: PropertyTable::new(),
            build_file: None,
            max_include_depth: 3,
            snapshot_suffix: "-SNAPSHOT".to_string(),
        }
    }
}

impl ResolverOptions {
    /// Folds in a Gradle argument vector: `-P`/`-D` properties go under the
    /// explicit ones, and `-b`/`-p` set the build file unless one is set.
    pub fn with_gradle_args<S: AsRef<str>>(mut self, args: &[S]) -> Self {
        let mut properties = parse_properties_from_args(args);
        properties.extend(std::mem::take(&mut self.properties));
        self.properties = properties;

        if self.build_file.is_none() {
            self.build_file = extract_build_file_path(args);
        }
        self
    }
}

//! Domain types for Gradle script resolution.

use crate::error::Result;
use crate::parser::scanner::{CodeMap, extract_all_blocks};
use std::fmt;
use std::path::{Path, PathBuf};

/// Script dialect, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dsl {
    Groovy,
    Kotlin,
}

impl Dsl {
    /// `*.kts` is Kotlin DSL; everything else is treated as Groovy.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("kts") => Self::Kotlin,
            _ => Self::Groovy,
        }
    }

    pub fn is_kotlin(self) -> bool {
        self == Self::Kotlin
    }
}

/// An immutable Gradle script plus its dialect.
#[derive(Debug, Clone)]
pub struct ScriptDocument {
    path: PathBuf,
    content: String,
    dsl: Dsl,
    code: CodeMap,
}

impl ScriptDocument {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        let content = content.into();
        let dsl = Dsl::from_path(&path);
        let code = CodeMap::new(&content);
        Self {
            path,
            content,
            dsl,
            code,
        }
    }

    /// Reads a script from disk as UTF-8.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded Gradle script {:?} ({} bytes)", path, content.len());
        Ok(Self::new(path, content))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn dsl(&self) -> Dsl {
        self.dsl
    }

    pub fn code_map(&self) -> &CodeMap {
        &self.code
    }

    /// Bodies of every `keyword { ... }` block in the script.
    pub fn blocks(&self, keyword: &str) -> Vec<&str> {
        extract_all_blocks(&self.content, keyword)
    }
}

/// Maven-style coordinates of a Gradle project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCoordinates {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl fmt::Display for ArtifactCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

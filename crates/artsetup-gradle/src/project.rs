//! Gradle project discovery and loading.
//!
//! Finds the build script, settings script and `gradle.properties` of a
//! working directory, follows `apply from` includes, and layers the
//! property table the way Gradle does (lowest first): built-ins,
//! `gradle.properties`, script declarations, explicit options.

use crate::config::ResolverOptions;
use crate::error::{GradleError, Result};
use crate::parser::includes::collect_applied_scripts;
use crate::parser::properties::{PropertyTable, extract_properties_from_script, read_properties_file};
use crate::types::ScriptDocument;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

pub const BUILD_FILES: [&str; 2] = ["build.gradle", "build.gradle.kts"];
pub const SETTINGS_FILES: [&str; 2] = ["settings.gradle", "settings.gradle.kts"];
pub const PROPERTIES_FILE: &str = "gradle.properties";

/// Everything read from one Gradle working directory.
#[derive(Debug)]
pub struct GradleProject {
    pub working_dir: PathBuf,
    /// Path of the build script, whether or not it exists.
    pub build_file: PathBuf,
    /// Build script followed by its applied scripts; empty without one.
    pub build_scripts: Vec<ScriptDocument>,
    /// Settings script followed by its applied scripts.
    pub settings_scripts: Vec<ScriptDocument>,
    /// Contents of `gradle.properties` alone.
    pub file_properties: PropertyTable,
    /// The merged table used for placeholder resolution.
    pub properties: PropertyTable,
}

impl GradleProject {
    /// Loads a project rooted at `working_dir`.
    ///
    /// # Errors
    ///
    /// - `GradleError::InvalidWorkingDirectory` if `working_dir` is empty or
    ///   not a directory
    /// - `GradleError::Io` if an existing build or settings script cannot
    ///   be read
    pub fn load(working_dir: &Path, options: &ResolverOptions) -> Result<Self> {
        if working_dir.as_os_str().is_empty() || !working_dir.is_dir() {
            return Err(GradleError::InvalidWorkingDirectory {
                path: working_dir.to_path_buf(),
            });
        }

        let file_properties = read_properties_file(&working_dir.join(PROPERTIES_FILE));

        let mut base = PropertyTable::new();
        let dir = working_dir.to_string_lossy().into_owned();
        base.insert("rootDir".to_string(), dir.clone());
        base.insert("projectDir".to_string(), dir);
        base.extend(file_properties.clone());

        let mut loader = ScriptLoader {
            base,
            script_properties: PropertyTable::new(),
            explicit: &options.properties,
            max_depth: options.max_include_depth,
        };

        let settings_scripts = match first_existing(working_dir, &SETTINGS_FILES) {
            Some(path) => loader.load_tree(&path)?,
            None => Vec::new(),
        };

        let build_file = match &options.build_file {
            Some(path) => build_file_override(working_dir, path),
            None => first_existing(working_dir, &BUILD_FILES)
                .unwrap_or_else(|| working_dir.join(BUILD_FILES[0])),
        };
        let build_scripts = if build_file.is_file() {
            loader.load_tree(&build_file)?
        } else {
            tracing::debug!("No build script at {:?}", build_file);
            Vec::new()
        };

        let properties = loader.effective();
        Ok(Self {
            working_dir: working_dir.to_path_buf(),
            build_file,
            build_scripts,
            settings_scripts,
            file_properties,
            properties,
        })
    }
}

fn first_existing(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names.iter().map(|name| dir.join(name)).find(|path| path.is_file())
}

/// Resolves an explicit build file. A missing `build.gradle` (what `-p dir`
/// expands to) falls back to whichever build script that directory has.
fn build_file_override(working_dir: &Path, path: &Path) -> PathBuf {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    };
    if !path.is_file()
        && path.file_name().is_some_and(|name| name == BUILD_FILES[0])
        && let Some(found) = path.parent().and_then(|dir| first_existing(dir, &BUILD_FILES))
    {
        tracing::debug!("Using {:?} in place of missing {:?}", found, path);
        return found;
    }
    path
}

struct ScriptLoader<'a> {
    base: PropertyTable,
    script_properties: PropertyTable,
    explicit: &'a PropertyTable,
    max_depth: usize,
}

impl ScriptLoader<'_> {
    fn effective(&self) -> PropertyTable {
        let mut table = self.base.clone();
        table.extend(self.script_properties.clone());
        table.extend(self.explicit.clone());
        table
    }

    /// Loads `entry` and the scripts it applies, breadth first.
    ///
    /// A missing or unreadable included script is skipped; the entry
    /// script itself must be readable. Each tree tracks its own visited
    /// set, so a script applied from both settings and build appears in both.
    fn load_tree(&mut self, entry: &Path) -> Result<Vec<ScriptDocument>> {
        let mut scripts = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([(entry.to_path_buf(), 0usize)]);

        while let Some((path, depth)) = queue.pop_front() {
            let key = std::fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
            if !visited.insert(key) {
                continue;
            }

            let doc = match ScriptDocument::load(&path) {
                Ok(doc) => doc,
                Err(e) if depth > 0 => {
                    tracing::warn!("Skipping applied script {:?}: {}", path, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            self.script_properties
                .extend(extract_properties_from_script(doc.content()));

            if depth < self.max_depth {
                let properties = self.effective();
                let applied = collect_applied_scripts(
                    doc.content(),
                    doc.dsl().is_kotlin(),
                    &properties,
                    &path,
                );
                queue.extend(applied.into_iter().map(|p| (p, depth + 1)));
            }

            scripts.push(doc);
        }

        Ok(scripts)
    }
}

//! Deploy-repository resolution for a Gradle working directory.

use crate::config::ResolverOptions;
use crate::coordinates::declared_version;
use crate::error::{GradleError, Result};
use crate::parser::properties::{PropertyTable, has_unresolved_placeholder, resolve_gradle_property};
use crate::parser::urls::find_urls_in_gradle_script;
use crate::project::GradleProject;
use crate::selection::{Channel, find_repo_in_properties, find_repository_key_from_matches};
use crate::types::ScriptDocument;
use std::path::Path;

/// Resolves the repository key that published artifacts should go to.
///
/// Search order, stopping at the first hit:
///
/// 1. repository URLs in the build script and the scripts it applies,
/// 2. repository URLs in the settings script (usually
///    `dependencyResolutionManagement`),
/// 3. repository-looking entries in `gradle.properties`.
///
/// `version` picks between snapshot and release repositories; when empty,
/// the project's own version is used (an explicit `version` property, the
/// build script's assignment, then `gradle.properties`). URL placeholders are
/// resolved against built-ins, `gradle.properties`, script declarations
/// and `options.properties`, in increasing precedence.
///
/// # Errors
///
/// - `GradleError::InvalidWorkingDirectory` if `working_dir` is empty or
///   missing
/// - `GradleError::UnresolvedProperty` if a script declares exactly one
///   repository URL and its placeholders cannot be resolved
/// - `GradleError::NoValidUrl` if scripts declared URLs but none carried a
///   repository key, and nothing else matched
/// - `GradleError::NoRepositoryFound` if nothing matched at all
pub fn get_gradle_deploy_repository(
    working_dir: &Path,
    version: &str,
    options: &ResolverOptions,
) -> Result<String> {
    let project = GradleProject::load(working_dir, options)?;

    let version = if version.trim().is_empty() {
        options
            .properties
            .get("version")
            .cloned()
            .or_else(|| declared_version(&project))
            .or_else(|| project.file_properties.get("version").cloned())
            .unwrap_or_default()
    } else {
        version.to_string()
    };
    let channel = Channel::for_version(&version, &options.snapshot_suffix);
    tracing::debug!(
        "Resolving deploy repository in {:?} for version '{}' ({:?})",
        working_dir,
        version,
        channel
    );

    let mut deferred: Option<GradleError> = None;

    for scripts in [&project.build_scripts, &project.settings_scripts] {
        match resolve_from_scripts(scripts, &project.properties, channel) {
            Ok(Some(key)) => return Ok(key),
            Ok(None) => {}
            Err(e @ GradleError::NoValidUrl { .. }) => {
                tracing::debug!("{}", e);
                deferred.get_or_insert(e);
            }
            Err(e) => return Err(e),
        }
    }

    let mut properties = project.file_properties.clone();
    properties.extend(options.properties.clone());
    match find_repo_in_properties(&properties, channel.is_snapshot()) {
        Ok(key) => Ok(key),
        Err(_) => Err(deferred.unwrap_or_else(|| GradleError::NoRepositoryFound {
            source_name: working_dir.display().to_string(),
        })),
    }
}

/// Runs the URL scan and selection over one group of scripts.
///
/// URLs with unresolved placeholders are left out of the selection. If
/// such a URL is the only one the scripts declare, that is an error.
fn resolve_from_scripts(
    scripts: &[ScriptDocument],
    properties: &PropertyTable,
    channel: Channel,
) -> Result<Option<String>> {
    let Some(entry) = scripts.first() else {
        return Ok(None);
    };
    let source_name = entry.path().display().to_string();

    let mut resolved = Vec::new();
    let mut unresolved = Vec::new();
    for script in scripts {
        for raw in find_urls_in_gradle_script(script.content(), script.dsl().is_kotlin()) {
            let url = resolve_gradle_property(&raw, properties);
            if has_unresolved_placeholder(&url) {
                tracing::debug!("Unresolved repository URL '{}' in {:?}", url, script.path());
                unresolved.push((script.path().display().to_string(), url));
            } else {
                resolved.push(url);
            }
        }
    }

    if resolved.is_empty() {
        return match unresolved.len() {
            0 => Ok(None),
            1 => {
                let (source_name, value) = unresolved.remove(0);
                Err(GradleError::UnresolvedProperty { source_name, value })
            }
            n => {
                tracing::warn!(
                    "Ignoring {} repository URL(s) with unresolved properties in {}",
                    n,
                    source_name
                );
                Ok(None)
            }
        };
    }

    find_repository_key_from_matches(&resolved, &source_name, channel.is_snapshot()).map(Some)
}

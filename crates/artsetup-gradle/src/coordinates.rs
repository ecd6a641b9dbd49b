//! Artifact coordinate extraction.

use crate::config::ResolverOptions;
use crate::error::{GradleError, Result};
use crate::parser::properties::resolve_gradle_property;
use crate::parser::scanner::find_blocks_with;
use crate::project::GradleProject;
use crate::types::{ArtifactCoordinates, ScriptDocument};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Matches: group = "x" / version = 'x' / name = "x" / artifactId = "x" as a statement
static RE_ASSIGNMENT: OnceLock<Regex> = OnceLock::new();
/// Matches: rootProject.name = "x"
static RE_ROOT_PROJECT_NAME: OnceLock<Regex> = OnceLock::new();

fn re_assignment() -> &'static Regex {
    RE_ASSIGNMENT.get_or_init(|| {
        Regex::new(
            r#"(?m)(?:^|;)[ \t]*(group|version|name|artifactId)\s*=\s*(?:"([^"\n]*)"|'([^'\n]*)')"#,
        )
        .unwrap()
    })
}

fn re_root_project_name() -> &'static Regex {
    RE_ROOT_PROJECT_NAME.get_or_init(|| {
        Regex::new(r#"rootProject\.name\s*=\s*(?:"([^"\n]*)"|'([^'\n]*)')"#).unwrap()
    })
}

#[derive(Debug, Default)]
struct Assignments {
    group: Option<String>,
    version: Option<String>,
    name: Option<String>,
    artifact_id: Option<String>,
}

/// Reads `group`, artifact name and `version` of the project in
/// `working_dir`.
///
/// `group` and `version` come from top-level assignments in the build
/// script or its applied scripts, then from an `allprojects { }` block,
/// then from `gradle.properties`. The artifact name comes from a top-level
/// `name = ...`, then a publication's `artifactId = ...`, then the
/// settings script's `rootProject.name`, and finally the directory name.
/// Values are resolved against the project's properties.
///
/// # Errors
///
/// - `GradleError::InvalidWorkingDirectory` if `working_dir` is empty or
///   missing
/// - `GradleError::MissingCoordinate` if `group` or `version` is nowhere
///   to be found
pub fn get_gradle_artifact_coordinates(
    working_dir: &Path,
    options: &ResolverOptions,
) -> Result<ArtifactCoordinates> {
    let project = GradleProject::load(working_dir, options)?;

    let mut top = Assignments::default();
    let mut nested = Assignments::default();
    for script in &project.build_scripts {
        scan_script(script, &mut top, &mut nested);
    }

    let resolve = |value: String| resolve_gradle_property(&value, &project.properties);
    let from_file = |key: &str| project.file_properties.get(key).cloned();
    let missing = |coordinate: &'static str| GradleError::MissingCoordinate {
        coordinate,
        file: project.build_file.clone(),
    };

    let group = top
        .group
        .or(nested.group)
        .or_else(|| from_file("group"))
        .map(resolve)
        .ok_or_else(|| missing("group"))?;
    let version = top
        .version
        .or(nested.version)
        .or_else(|| from_file("version"))
        .map(resolve)
        .ok_or_else(|| missing("version"))?;

    let artifact = top
        .name
        .or(top.artifact_id)
        .or_else(|| root_project_name(&project.settings_scripts))
        .map(resolve)
        .or_else(|| {
            working_dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_default();

    tracing::debug!("Coordinates of {:?}: {}:{}:{}", working_dir, group, artifact, version);
    Ok(ArtifactCoordinates {
        group,
        artifact,
        version,
    })
}

/// The version a project's build scripts assign, resolved.
pub(crate) fn declared_version(project: &GradleProject) -> Option<String> {
    let mut top = Assignments::default();
    let mut nested = Assignments::default();
    for script in &project.build_scripts {
        scan_script(script, &mut top, &mut nested);
    }
    top.version
        .or(nested.version)
        .map(|v| resolve_gradle_property(&v, &project.properties))
}

fn scan_script(script: &ScriptDocument, top: &mut Assignments, nested: &mut Assignments) {
    let content = script.content();
    let map = script.code_map();

    for caps in re_assignment().captures_iter(content) {
        let (Some(key), Some(value)) = (caps.get(1), caps.get(2).or_else(|| caps.get(3))) else {
            continue;
        };
        if !map.is_code(key.start()) {
            continue;
        }
        let value = value.as_str().to_string();

        match key.as_str() {
            "artifactId" => {
                top.artifact_id.get_or_insert(value);
            }
            field if map.depth_at(key.start()) == 0 => {
                *slot(top, field) = Some(value);
            }
            _ => {}
        }
    }

    for block in find_blocks_with(content, map, "allprojects") {
        let depth = map.depth_at(block.start);
        for caps in re_assignment().captures_iter(&content[block.clone()]) {
            let (Some(key), Some(value)) = (caps.get(1), caps.get(2).or_else(|| caps.get(3)))
            else {
                continue;
            };
            let offset = block.start + key.start();
            if !map.is_code(offset) || map.depth_at(offset) != depth {
                continue;
            }
            if matches!(key.as_str(), "group" | "version") {
                *slot(nested, key.as_str()) = Some(value.as_str().to_string());
            }
        }
    }
}

fn slot<'a>(assignments: &'a mut Assignments, field: &str) -> &'a mut Option<String> {
    match field {
        "group" => &mut assignments.group,
        "version" => &mut assignments.version,
        "name" => &mut assignments.name,
        _ => &mut assignments.artifact_id,
    }
}

fn root_project_name(settings: &[ScriptDocument]) -> Option<String> {
    settings.iter().find_map(|script| {
        re_root_project_name()
            .captures_iter(script.content())
            .filter(|caps| caps.get(0).is_some_and(|m| script.code_map().is_code(m.start())))
            .find_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn coordinates(dir: &Path) -> Result<ArtifactCoordinates> {
        get_gradle_artifact_coordinates(dir, &ResolverOptions::default())
    }

    #[test]
    fn test_groovy_coordinates() {
        let dir = project(&[(
            "build.gradle",
            "group = 'com.example'\nversion = '1.2.3'\nname = 'my-lib'\n",
        )]);
        let coords = coordinates(dir.path()).unwrap();
        assert_eq!(coords.group, "com.example");
        assert_eq!(coords.artifact, "my-lib");
        assert_eq!(coords.version, "1.2.3");
    }

    #[test]
    fn test_kotlin_defaults_artifact_to_directory() {
        let root = tempfile::tempdir().unwrap();
        let module = root.path().join("payments-api");
        fs::create_dir(&module).unwrap();
        fs::write(
            module.join("build.gradle.kts"),
            "group = \"com.example\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();
        let coords = coordinates(&module).unwrap();
        assert_eq!(coords.artifact, "payments-api");
    }

    #[test]
    fn test_missing_group() {
        let dir = project(&[("build.gradle", "version = '1.0'\n")]);
        let err = coordinates(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            GradleError::MissingCoordinate {
                coordinate: "group",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_version() {
        let dir = project(&[("build.gradle", "group = 'g'\n")]);
        let err = coordinates(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            GradleError::MissingCoordinate {
                coordinate: "version",
                ..
            }
        ));
    }

    #[test]
    fn test_nested_name_is_not_artifact() {
        let dir = project(&[(
            "build.gradle.kts",
            "group = \"g\"\nversion = \"1\"\npublishing {\n  repositories {\n    maven {\n      name = \"myRepo\"\n    }\n  }\n}\n",
        )]);
        let coords = coordinates(dir.path()).unwrap();
        assert_ne!(coords.artifact, "myRepo");
    }

    #[test]
    fn test_publication_artifact_id() {
        let dir = project(&[(
            "build.gradle",
            "group = 'g'\nversion = '1'\npublishing {\n  publications {\n    mavenJava(MavenPublication) {\n      artifactId = 'custom-id'\n    }\n  }\n}\n",
        )]);
        assert_eq!(coordinates(dir.path()).unwrap().artifact, "custom-id");
    }

    #[test]
    fn test_settings_root_project_name() {
        let dir = project(&[
            ("build.gradle", "group = 'g'\nversion = '1'\n"),
            ("settings.gradle", "rootProject.name = 'from-settings'\n"),
        ]);
        assert_eq!(coordinates(dir.path()).unwrap().artifact, "from-settings");
    }

    #[test]
    fn test_allprojects_fallback() {
        let dir = project(&[(
            "build.gradle",
            "allprojects {\n  group = 'org.acme'\n  version = '3.0'\n  repositories { maven { name = 'x' } }\n}\n",
        )]);
        let coords = coordinates(dir.path()).unwrap();
        assert_eq!(coords.group, "org.acme");
        assert_eq!(coords.version, "3.0");
    }

    #[test]
    fn test_gradle_properties_fallback_and_resolution() {
        let dir = project(&[
            ("build.gradle", "version = \"${baseVersion}-SNAPSHOT\"\n"),
            ("gradle.properties", "group=com.props\nbaseVersion=4.1\n"),
        ]);
        let coords = coordinates(dir.path()).unwrap();
        assert_eq!(coords.group, "com.props");
        assert_eq!(coords.version, "4.1-SNAPSHOT");
    }

    #[test]
    fn test_commented_assignment_ignored() {
        let dir = project(&[(
            "build.gradle",
            "// group = 'commented'\n/*\nversion = '0'\n*/\ngroup = 'real'\nversion = '2'\n",
        )]);
        let coords = coordinates(dir.path()).unwrap();
        assert_eq!(coords.group, "real");
        assert_eq!(coords.version, "2");
    }
}

//! Subcommand handlers.

use crate::cli::{Cli, Command, DeployRepoArgs, GradleCommand, IsPublishArgs, ProjectArgs};
use anyhow::{Context, Result};
use artsetup_gradle::{
    ResolverOptions, get_gradle_artifact_coordinates, get_gradle_deploy_repository,
    was_publish_command,
};
use std::path::Path;

/// Runs the parsed command and returns the line to print, if any.
pub fn run(cli: &Cli) -> Result<Option<String>> {
    match &cli.command {
        Command::Gradle(GradleCommand::DeployRepo(args)) => deploy_repo(args),
        Command::Gradle(GradleCommand::Coordinates(args)) => coordinates(args).map(Some),
        Command::Gradle(GradleCommand::IsPublish(args)) => Ok(Some(is_publish(args))),
    }
}

fn deploy_repo(args: &DeployRepoArgs) -> Result<Option<String>> {
    if !args.force && !was_publish_command(&args.gradle_args) {
        tracing::debug!("Gradle arguments {:?} do not publish", args.gradle_args);
        return Ok(None);
    }

    let options = load_options(args.project.config.as_deref())?.with_gradle_args(&args.gradle_args);
    let key = get_gradle_deploy_repository(&args.project.dir, &args.artifact_version, &options)
        .with_context(|| {
            format!(
                "failed to resolve deploy repository in {}",
                args.project.dir.display()
            )
        })?;
    Ok(Some(key))
}

fn coordinates(args: &ProjectArgs) -> Result<String> {
    let options = load_options(args.config.as_deref())?;
    let coordinates = get_gradle_artifact_coordinates(&args.dir, &options).with_context(|| {
        format!(
            "failed to read artifact coordinates in {}",
            args.dir.display()
        )
    })?;
    Ok(coordinates.to_string())
}

fn is_publish(args: &IsPublishArgs) -> String {
    was_publish_command(&args.gradle_args).to_string()
}

/// Reads resolver options from a JSON file, or defaults without one.
fn load_options(path: Option<&Path>) -> Result<ResolverOptions> {
    let Some(path) = path else {
        return Ok(ResolverOptions::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options file {}", path.display()))?;
    let options = serde_json::from_str(&content)
        .with_context(|| format!("invalid options file {}", path.display()))?;
    tracing::debug!("Loaded resolver options from {:?}", path);
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    const BUILD: &str = r#"
group = 'org.acme'
version = '1.0.0'

publishing {
    repositories {
        maven { url "${repoBase}/libs-snapshot-local" }
        maven { url "${repoBase}/libs-release-local" }
    }
}
"#;

    fn project() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("build.gradle"), BUILD).unwrap();
        fs::write(
            dir.path().join("settings.gradle"),
            "rootProject.name = 'acme-app'\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("gradle.properties"),
            "repoBase=http://localhost/artifactory\n",
        )
        .unwrap();
        dir
    }

    fn run_args(args: &[&str]) -> Result<Option<String>> {
        run(&Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn test_deploy_repo_release() {
        let dir = project();
        let dir_arg = dir.path().to_str().unwrap();
        let out = run_args(&[
            "artsetup", "gradle", "deploy-repo", "--dir", dir_arg, "--", "publish",
        ])
        .unwrap();
        assert_eq!(out.as_deref(), Some("libs-release-local"));
    }

    #[test]
    fn test_deploy_repo_snapshot_version() {
        let dir = project();
        let dir_arg = dir.path().to_str().unwrap();
        let out = run_args(&[
            "artsetup",
            "gradle",
            "deploy-repo",
            "--dir",
            dir_arg,
            "--version",
            "1.1.0-SNAPSHOT",
            "--",
            ":app:publishToMavenLocal",
        ])
        .unwrap();
        assert_eq!(out.as_deref(), Some("libs-snapshot-local"));
    }

    #[test]
    fn test_deploy_repo_skips_non_publish() {
        let dir = project();
        let dir_arg = dir.path().to_str().unwrap();
        let out = run_args(&[
            "artsetup", "gradle", "deploy-repo", "--dir", dir_arg, "--", "build",
        ])
        .unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn test_deploy_repo_force() {
        let dir = project();
        let dir_arg = dir.path().to_str().unwrap();
        let out = run_args(&["artsetup", "gradle", "deploy-repo", "--dir", dir_arg, "--force"])
            .unwrap();
        assert_eq!(out.as_deref(), Some("libs-release-local"));
    }

    #[test]
    fn test_deploy_repo_options_file() {
        let dir = project();
        let config = dir.path().join("artsetup.json");
        fs::write(
            &config,
            r#"{ "properties": { "repoBase": "https://other/artifactory" }, "snapshotSuffix": "-dev" }"#,
        )
        .unwrap();
        let dir_arg = dir.path().to_str().unwrap();
        let config_arg = config.to_str().unwrap();
        let out = run_args(&[
            "artsetup",
            "gradle",
            "deploy-repo",
            "--dir",
            dir_arg,
            "--config",
            config_arg,
            "--version",
            "2.0-dev",
            "--force",
        ])
        .unwrap();
        assert_eq!(out.as_deref(), Some("libs-snapshot-local"));
    }

    #[test]
    fn test_deploy_repo_error_has_context() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("build.gradle"), "plugins { id 'java' }\n").unwrap();
        let dir_arg = dir.path().to_str().unwrap();
        let err = run_args(&["artsetup", "gradle", "deploy-repo", "--dir", dir_arg, "--force"])
            .unwrap_err();
        assert!(format!("{err:#}").contains("failed to resolve deploy repository"));
    }

    #[test]
    fn test_invalid_options_file() {
        let dir = project();
        let config = dir.path().join("broken.json");
        fs::write(&config, "{ not json").unwrap();
        let err = load_options(Some(&config)).unwrap_err();
        assert!(err.to_string().starts_with("invalid options file"));
    }

    #[test]
    fn test_coordinates() {
        let dir = project();
        let dir_arg = dir.path().to_str().unwrap();
        let out = run_args(&["artsetup", "gradle", "coordinates", "--dir", dir_arg]).unwrap();
        assert_eq!(out.as_deref(), Some("org.acme:acme-app:1.0.0"));
    }

    #[test]
    fn test_is_publish() {
        let out = run_args(&["artsetup", "gradle", "is-publish", "--", "clean", "publish"]).unwrap();
        assert_eq!(out.as_deref(), Some("true"));
        let out = run_args(&["artsetup", "gradle", "is-publish", "--", "build"]).unwrap();
        assert_eq!(out.as_deref(), Some("false"));
        let out = run_args(&["artsetup", "gradle", "is-publish"]).unwrap();
        assert_eq!(out.as_deref(), Some("false"));
    }
}

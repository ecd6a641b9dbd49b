//! CLI argument definitions using the clap derive API.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve Artifactory deploy settings from build scripts.
#[derive(Debug, Parser)]
#[command(name = "artsetup", version, about)]
pub struct Cli {
    /// Log resolution steps to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Gradle projects.
    #[command(subcommand)]
    Gradle(GradleCommand),
}

#[derive(Debug, Subcommand)]
pub enum GradleCommand {
    /// Print the repository key a Gradle publish would deploy to.
    DeployRepo(DeployRepoArgs),
    /// Print the project's group:artifact:version.
    Coordinates(ProjectArgs),
    /// Print whether a Gradle command line publishes.
    IsPublish(IsPublishArgs),
}

/// Where the project lives and how to read it.
#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    /// Gradle working directory.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// JSON file with resolver options.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct DeployRepoArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Version being published; the project's own version when omitted.
    #[arg(long = "version", value_name = "VERSION", default_value = "")]
    pub artifact_version: String,

    /// Resolve even when the Gradle arguments do not publish.
    #[arg(long)]
    pub force: bool,

    /// Gradle command line, after `--`.
    #[arg(last = true, value_name = "GRADLE_ARGS")]
    pub gradle_args: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct IsPublishArgs {
    /// Gradle command line, after `--`.
    #[arg(last = true, value_name = "GRADLE_ARGS")]
    pub gradle_args: Vec<String>,
}

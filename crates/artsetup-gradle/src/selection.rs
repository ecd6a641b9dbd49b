//! Repository selection policy.
//!
//! Picks one repository key out of several candidates. The decision is an
//! ordered list of rules, tried in turn:
//!
//! 1. [`SelectionRule::Channel`]: a candidate named for the release
//!    channel (`snapshot` or `release`, case-insensitive).
//! 2. [`SelectionRule::Deploy`]: a candidate whose property name contains
//!    `deploy` (properties files only).
//! 3. [`SelectionRule::First`]: the first candidate. For URL lists that is
//!    document order; for properties files it is the alphabetically first
//!    property name, an arbitrary but stable tie-break.

use crate::error::{GradleError, Result};
use crate::parser::properties::PropertyTable;
use artsetup_core::extract_repo_key_from_artifactory_url;

const URL_MARKER: &str = "artifactory/";

/// Release channel of the version being published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Snapshot,
    Release,
}

impl Channel {
    pub fn from_snapshot_flag(is_snapshot: bool) -> Self {
        if is_snapshot {
            Self::Snapshot
        } else {
            Self::Release
        }
    }

    /// Snapshot if `version` ends with `suffix` (case-insensitive).
    pub fn for_version(version: &str, suffix: &str) -> Self {
        let version = version.trim().to_ascii_lowercase();
        let suffix = suffix.to_ascii_lowercase();
        Self::from_snapshot_flag(!suffix.is_empty() && version.ends_with(&suffix))
    }

    pub fn is_snapshot(self) -> bool {
        self == Self::Snapshot
    }

    fn marker(self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::Release => "release",
        }
    }

    fn names(self, text: &str) -> bool {
        text.to_ascii_lowercase().contains(self.marker())
    }
}

/// Which rule picked a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    Channel,
    Deploy,
    First,
}

/// A repository key plus what it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate<'a> {
    /// Property name; empty for URLs taken from scripts.
    name: &'a str,
    key: String,
}

fn select<'c, 'a>(
    candidates: &'c [Candidate<'a>],
    channel: Channel,
) -> Option<(&'c Candidate<'a>, SelectionRule)> {
    let rules = [SelectionRule::Channel, SelectionRule::Deploy, SelectionRule::First];

    rules.into_iter().find_map(|rule| {
        let found = match rule {
            SelectionRule::Channel => candidates
                .iter()
                .find(|c| channel.names(c.name) || channel.names(&c.key)),
            SelectionRule::Deploy => candidates
                .iter()
                .find(|c| c.name.to_ascii_lowercase().contains("deploy")),
            SelectionRule::First => candidates.first(),
        };
        found.map(|c| (c, rule))
    })
}

/// Chooses a repository key from candidate URLs found in `source_name`.
///
/// With `is_snapshot` the first URL whose key mentions "snapshot" wins,
/// otherwise the first whose key mentions "release"; failing that, the
/// first valid URL. URLs whose key cannot be extracted are skipped, and
/// repeated keys count once.
///
/// # Errors
///
/// - `GradleError::NoRepositoryFound` if `urls` is empty
/// - `GradleError::NoValidUrl` if no URL yields a key
pub fn find_repository_key_from_matches(
    urls: &[String],
    source_name: &str,
    is_snapshot: bool,
) -> Result<String> {
    if urls.is_empty() {
        return Err(GradleError::NoRepositoryFound {
            source_name: source_name.to_string(),
        });
    }

    let mut candidates: Vec<Candidate<'_>> = Vec::new();
    let mut last_error = None;
    for url in urls {
        match extract_repo_key_from_artifactory_url(url) {
            Ok(key) => {
                if !candidates.iter().any(|c| c.key == key) {
                    candidates.push(Candidate { name: "", key });
                }
            }
            Err(e) => {
                tracing::debug!("Skipping repository URL in {}: {}", source_name, e);
                last_error = Some(e);
            }
        }
    }

    let channel = Channel::from_snapshot_flag(is_snapshot);
    match select(&candidates, channel) {
        Some((candidate, rule)) => {
            tracing::debug!(
                "Selected repository '{}' from {} ({:?})",
                candidate.key,
                source_name,
                rule
            );
            Ok(candidate.key.clone())
        }
        None => Err(GradleError::NoValidUrl {
            source_name: source_name.to_string(),
            attempted: urls.to_vec(),
            cause: last_error.unwrap_or(artsetup_core::CoreError::InvalidUrl {
                url: String::new(),
                reason: "empty URL",
            }),
        }),
    }
}

/// Chooses a repository key from a flat property table.
///
/// Values are scanned, not names. Values containing `artifactory/` are
/// treated as repository URLs and take precedence; otherwise every
/// key-shaped value is a candidate, whatever its property is called.
/// Property names only steer the choice among candidates (channel, then
/// `deploy`, then the alphabetically first name). Values that are
/// parent-relative paths (`../`), contain `:` without being repository
/// URLs (Maven coordinates, plain URLs), start with a digit or `-`, or are
/// booleans are never candidates.
///
/// # Errors
///
/// Returns `GradleError::NoRepositoryFound` if no candidate remains.
pub fn find_repo_in_properties(properties: &PropertyTable, is_snapshot: bool) -> Result<String> {
    let mut names: Vec<&String> = properties.keys().collect();
    names.sort();

    let mut url_candidates = Vec::new();
    let mut key_candidates = Vec::new();

    for name in names {
        let value = properties[name].trim();
        if value.is_empty() || value.starts_with("../") || value.starts_with("..\\") {
            continue;
        }

        if value.contains(URL_MARKER) {
            if let Ok(key) = extract_repo_key_from_artifactory_url(value) {
                url_candidates.push(Candidate {
                    name: name.as_str(),
                    key,
                });
            }
        } else if !value.contains(':') && looks_like_repo_key(value) {
            key_candidates.push(Candidate {
                name: name.as_str(),
                key: value.to_string(),
            });
        }
    }

    let pool = if url_candidates.is_empty() {
        key_candidates
    } else {
        url_candidates
    };

    let channel = Channel::from_snapshot_flag(is_snapshot);
    match select(&pool, channel) {
        Some((candidate, rule)) => {
            tracing::debug!(
                "Selected repository '{}' from property '{}' ({:?})",
                candidate.key,
                candidate.name,
                rule
            );
            Ok(candidate.key.clone())
        }
        None => Err(GradleError::NoRepositoryFound {
            source_name: "properties".to_string(),
        }),
    }
}

fn looks_like_repo_key(value: &str) -> bool {
    let starts_ok = value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && !value.eq_ignore_ascii_case("true")
        && !value.eq_ignore_ascii_case("false")
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn props(pairs: &[(&str, &str)]) -> PropertyTable {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_channel_for_version() {
        assert_eq!(Channel::for_version("1.0-SNAPSHOT", "-SNAPSHOT"), Channel::Snapshot);
        assert_eq!(Channel::for_version("1.0-snapshot", "-SNAPSHOT"), Channel::Snapshot);
        assert_eq!(Channel::for_version("1.0", "-SNAPSHOT"), Channel::Release);
        assert_eq!(Channel::for_version("", "-SNAPSHOT"), Channel::Release);
        assert_eq!(Channel::for_version("1.0", ""), Channel::Release);
    }

    #[test]
    fn test_snapshot_preferred() {
        let list = urls(&["http://h/artifactory/libs-snapshot", "http://h/artifactory/libs-release"]);
        assert_eq!(
            find_repository_key_from_matches(&list, "build.gradle", true).unwrap(),
            "libs-snapshot"
        );
        assert_eq!(
            find_repository_key_from_matches(&list, "build.gradle", false).unwrap(),
            "libs-release"
        );
    }

    #[test]
    fn test_preference_is_case_insensitive() {
        let list = urls(&["http://h/artifactory/a", "http://h/artifactory/LIBS-SNAPSHOT"]);
        assert_eq!(
            find_repository_key_from_matches(&list, "build.gradle", true).unwrap(),
            "LIBS-SNAPSHOT"
        );
    }

    #[test]
    fn test_fallback_to_first() {
        let list = urls(&["http://h/artifactory/libs-local"]);
        assert_eq!(
            find_repository_key_from_matches(&list, "build.gradle", true).unwrap(),
            "libs-local"
        );
        let list = urls(&["not-a-url", "http://h/artifactory/b", "http://h/artifactory/c"]);
        assert_eq!(
            find_repository_key_from_matches(&list, "build.gradle", false).unwrap(),
            "b"
        );
    }

    #[test]
    fn test_empty_list() {
        let err = find_repository_key_from_matches(&[], "build.gradle", false).unwrap_err();
        assert!(matches!(err, GradleError::NoRepositoryFound { .. }));
    }

    #[test]
    fn test_only_invalid_urls() {
        let list = urls(&["not-a-url", "https://repo.maven.apache.org/maven2"]);
        let err = find_repository_key_from_matches(&list, "build.gradle", false).unwrap_err();
        match err {
            GradleError::NoValidUrl {
                source_name,
                attempted,
                ..
            } => {
                assert_eq!(source_name, "build.gradle");
                assert_eq!(attempted.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_properties_url_value() {
        let table = props(&[
            ("artifactory_deploy_url", "http://h/artifactory/libs-release-local"),
            ("version", "1.0.0"),
        ]);
        assert_eq!(find_repo_in_properties(&table, false).unwrap(), "libs-release-local");
    }

    #[test]
    fn test_properties_url_values_preferred_over_keys() {
        let table = props(&[
            ("deployRepo", "plain-repo"),
            ("repoUrl", "http://h/artifactory/from-url"),
        ]);
        assert_eq!(find_repo_in_properties(&table, false).unwrap(), "from-url");
    }

    #[test]
    fn test_properties_channel_by_name() {
        let table = props(&[
            ("releaseRepo", "libs-rel"),
            ("snapshotRepo", "libs-snap"),
        ]);
        assert_eq!(find_repo_in_properties(&table, true).unwrap(), "libs-snap");
        assert_eq!(find_repo_in_properties(&table, false).unwrap(), "libs-rel");
    }

    #[test]
    fn test_properties_deploy_before_alphabetical() {
        let table = props(&[("aRepo", "first"), ("deployRepo", "deployed")]);
        assert_eq!(find_repo_in_properties(&table, false).unwrap(), "deployed");
    }

    #[test]
    fn test_properties_alphabetical_fallback() {
        let table = props(&[("zRepo", "zzz"), ("mRepo", "mmm")]);
        assert_eq!(find_repo_in_properties(&table, true).unwrap(), "mmm");
    }

    #[test]
    fn test_properties_neutral_name() {
        let table = props(&[("target", "libs-local")]);
        assert_eq!(find_repo_in_properties(&table, false).unwrap(), "libs-local");
    }

    #[test]
    fn test_properties_alphabetical_fallback_any_name() {
        let table = props(&[("zz", "other"), ("artifactoryKey", "gradle-dev")]);
        assert_eq!(find_repo_in_properties(&table, true).unwrap(), "gradle-dev");
    }

    #[test]
    fn test_properties_exclusions() {
        let table = props(&[
            ("pluginRepo", "com.example:plugin:1.0"),
            ("repoPath", "../shared/repo"),
            ("releaseVersion", "1.2.3"),
            ("deployEnabled", "true"),
            ("repoJvm", "-Xmx2g"),
            ("mavenRepoUrl", "https://repo.maven.apache.org/maven2"),
            ("version", "1.0.0"),
            ("org.gradle.jvmargs", "-Xmx2g"),
        ]);
        let err = find_repo_in_properties(&table, false).unwrap_err();
        assert!(matches!(err, GradleError::NoRepositoryFound { .. }));
    }

    #[test]
    fn test_properties_empty() {
        assert!(find_repo_in_properties(&PropertyTable::new(), true).is_err());
    }
}

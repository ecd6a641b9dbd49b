//! Repository key extraction from repository URLs.

use crate::error::{CoreError, Result};

const MARKER: &str = "artifactory/";

/// Extracts the repository key from a repository URL.
///
/// The key is the deepest path segment after `artifactory/`, so
/// `http://host/artifactory/libs-release` and
/// `http://host/artifactory/api/maven/libs-release` both yield
/// `libs-release`. Surrounding whitespace, the query string and any
/// fragment are ignored.
///
/// # Errors
///
/// Returns `CoreError::InvalidUrl` if the URL is blank, has no
/// `artifactory/` segment, or has nothing after it.
///
/// # Examples
///
/// ```
/// use artsetup_core::extract_repo_key_from_artifactory_url;
///
/// let key = extract_repo_key_from_artifactory_url(
///     " https://acme.jfrog.io/artifactory/libs-release/?x=1 ",
/// ).unwrap();
/// assert_eq!(key, "libs-release");
/// ```
pub fn extract_repo_key_from_artifactory_url(url: &str) -> Result<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(invalid(url, "empty URL"));
    }

    let path = trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or(trimmed);

    let Some(idx) = path.find(MARKER) else {
        return Err(invalid(url, "missing 'artifactory/' path segment"));
    };

    path[idx + MARKER.len()..]
        .split('/')
        .filter(|segment| !segment.trim().is_empty())
        .next_back()
        .map(|segment| segment.trim().to_string())
        .ok_or_else(|| invalid(url, "no repository key after 'artifactory/'"))
}

fn invalid(url: &str, reason: &'static str) -> CoreError {
    CoreError::InvalidUrl {
        url: url.to_string(),
        reason,
    }
}

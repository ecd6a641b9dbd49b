//! Repository URL extraction from publishing configuration.
//!
//! Walks `publishing`, legacy `uploadArchives` and
//! `dependencyResolutionManagement` blocks down to their repository
//! declarations and pulls out the declared URL of each one.

use crate::parser::scanner::{CodeMap, find_blocks, is_delimiter};
use regex::Regex;
use std::sync::OnceLock;

/// Matches: url "x" / url 'x' / url("x")
static RE_URL_CALL: OnceLock<Regex> = OnceLock::new();
/// Matches: url = uri("x") / url = "x"
static RE_URL_ASSIGN: OnceLock<Regex> = OnceLock::new();
/// Matches: url.set(uri("x"))
static RE_URL_SET: OnceLock<Regex> = OnceLock::new();
/// Matches: setUrl("x")
static RE_SET_URL: OnceLock<Regex> = OnceLock::new();
/// Matches: repository(url: "x") / snapshotRepository(url: "x")
static RE_DEPLOYER_REPO: OnceLock<Regex> = OnceLock::new();

fn re_url_call() -> &'static Regex {
    RE_URL_CALL.get_or_init(|| {
        Regex::new(r#"url[ \t]*(?:\(\s*)?(?:"([^"\n]+)"|'([^'\n]+)')"#).unwrap()
    })
}

fn re_url_assign() -> &'static Regex {
    RE_URL_ASSIGN.get_or_init(|| {
        Regex::new(r#"url\s*=\s*(?:uri\(\s*)?(?:"([^"\n]+)"|'([^'\n]+)')"#).unwrap()
    })
}

fn re_url_set() -> &'static Regex {
    RE_URL_SET.get_or_init(|| {
        Regex::new(r#"url\.set\(\s*(?:uri\(\s*)?(?:"([^"\n]+)"|'([^'\n]+)')"#).unwrap()
    })
}

fn re_set_url() -> &'static Regex {
    RE_SET_URL
        .get_or_init(|| Regex::new(r#"setUrl\(\s*(?:"([^"\n]+)"|'([^'\n]+)')"#).unwrap())
}

fn re_deployer_repo() -> &'static Regex {
    RE_DEPLOYER_REPO.get_or_init(|| {
        Regex::new(
            r#"(?:snapshotRepository|repository)\s*\(\s*url\s*:\s*(?:uri\(\s*)?(?:"([^"\n]+)"|'([^'\n]+)')"#,
        )
        .unwrap()
    })
}

/// Statement shapes that declare a repository URL, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UrlShape {
    /// Groovy `url "..."`
    Call,
    /// `url = uri("...")`
    Assign,
    /// Kotlin `url.set(uri("..."))`
    Set,
    /// `setUrl("...")`
    Setter,
}

const SHAPES: [UrlShape; 4] = [UrlShape::Call, UrlShape::Assign, UrlShape::Set, UrlShape::Setter];

impl UrlShape {
    fn applies_to(self, is_kotlin: bool) -> bool {
        !(is_kotlin && self == Self::Call)
    }

    fn regex(self) -> &'static Regex {
        match self {
            Self::Call => re_url_call(),
            Self::Assign => re_url_assign(),
            Self::Set => re_url_set(),
            Self::Setter => re_set_url(),
        }
    }
}

/// Outer block keyword, then the repository declaration keyword under
/// its `repositories { }` block.
const REPOSITORY_PATHS: [(&str, &str); 3] = [
    ("publishing", "maven"),
    ("uploadArchives", "mavenDeployer"),
    ("dependencyResolutionManagement", "maven"),
];

/// Finds every repository URL declared in a script's publishing,
/// `uploadArchives` or `dependencyResolutionManagement` configuration.
///
/// URLs come back raw (placeholders unresolved) and in document order.
/// Within one `maven { }` body the first matching shape wins: Groovy
/// `url "..."`, then `url = uri("...")`, then `url.set(uri("..."))`.
/// A `mavenDeployer { }` body yields each `repository(url: ...)` and
/// `snapshotRepository(url: ...)` in order.
///
/// # Examples
///
/// ```
/// use artsetup_gradle::parser::urls::find_urls_in_gradle_script;
///
/// let script = r#"
/// publishing {
///     repositories {
///         maven { url = uri("http://localhost:8081/artifactory/libs-release") }
///     }
/// }
/// "#;
/// let urls = find_urls_in_gradle_script(script, true);
/// assert_eq!(urls, vec!["http://localhost:8081/artifactory/libs-release"]);
/// ```
pub fn find_urls_in_gradle_script(content: &str, is_kotlin: bool) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();

    for (outer, declaration) in REPOSITORY_PATHS {
        for outer_block in find_blocks(content, outer) {
            let outer_body = &content[outer_block.clone()];

            for repos_block in find_blocks(outer_body, "repositories") {
                let repos_body = &outer_body[repos_block.clone()];
                let repos_base = outer_block.start + repos_block.start;

                for decl_block in find_blocks(repos_body, declaration) {
                    let body = &repos_body[decl_block.clone()];
                    let base = repos_base + decl_block.start;

                    let urls = if declaration == "mavenDeployer" {
                        let deployer = shape_matches(body, re_deployer_repo());
                        if deployer.is_empty() {
                            first_url(body, is_kotlin).into_iter().collect()
                        } else {
                            deployer
                        }
                    } else {
                        first_url(body, is_kotlin).into_iter().collect()
                    };

                    found.extend(urls.into_iter().map(|(offset, url)| (base + offset, url)));
                }
            }
        }
    }

    found.sort_by_key(|(offset, _)| *offset);
    tracing::trace!("Found {} repository URL(s)", found.len());
    found.into_iter().map(|(_, url)| url).collect()
}

/// The URL of the first shape, in priority order, that matches `body`.
fn first_url(body: &str, is_kotlin: bool) -> Option<(usize, String)> {
    SHAPES
        .iter()
        .filter(|shape| shape.applies_to(is_kotlin))
        .find_map(|shape| shape_matches(body, shape.regex()).into_iter().next())
}

/// Every code-level match of `re` in `body` whose keyword is not glued to
/// a preceding identifier, with its offset.
fn shape_matches(body: &str, re: &Regex) -> Vec<(usize, String)> {
    let map = CodeMap::new(body);
    let bytes = body.as_bytes();

    re.captures_iter(body)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            if !map.is_code(start) || (start > 0 && !is_delimiter(bytes[start - 1])) {
                return None;
            }
            let url = caps.get(1).or_else(|| caps.get(2))?;
            Some((start, url.as_str().trim().to_string()))
        })
        .collect()
}

//! `apply from` script inclusion.

use crate::parser::properties::{PropertyTable, has_unresolved_placeholder, resolve_gradle_property};
use crate::parser::scanner::{CodeMap, is_delimiter};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Matches: apply from: "x" / apply(from: 'x') / apply(from = "x"), optionally wrapped in file(...)
static RE_APPLY_FROM: OnceLock<Regex> = OnceLock::new();

fn re_apply_from() -> &'static Regex {
    RE_APPLY_FROM.get_or_init(|| {
        Regex::new(
            r#"apply\s*(\()?\s*from\s*([:=])\s*(?:(?:rootProject\.|project\.)?file\(\s*)?(?:"([^"\n]+)"|'([^'\n]+)')"#,
        )
        .unwrap()
    })
}

/// Finds the local scripts a script applies.
///
/// Groovy scripts use `apply from: "<path>"`, Kotlin scripts
/// `apply(from = "<path>")`. Placeholders in the path are resolved against
/// `properties`; paths that stay unresolved or point at `http(s)://` are
/// skipped. Relative paths are taken from the directory of `current_file`.
///
/// Returned paths are not followed; callers decide how deep to go.
pub fn collect_applied_scripts(
    content: &str,
    is_kotlin: bool,
    properties: &PropertyTable,
    current_file: &Path,
) -> Vec<PathBuf> {
    let map = CodeMap::new(content);
    let bytes = content.as_bytes();
    let base_dir = current_file.parent().unwrap_or_else(|| Path::new(""));
    let mut scripts = Vec::new();

    for caps in re_apply_from().captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        let start = whole.start();
        if !map.is_code(start) || (start > 0 && !is_delimiter(bytes[start - 1])) {
            continue;
        }

        let has_parens = caps.get(1).is_some();
        let separator = caps.get(2).map_or("", |m| m.as_str());
        let dialect_ok = if is_kotlin {
            has_parens && separator == "="
        } else {
            separator == ":"
        };
        if !dialect_ok {
            continue;
        }

        let Some(raw) = caps.get(3).or_else(|| caps.get(4)) else {
            continue;
        };
        let resolved = resolve_gradle_property(raw.as_str(), properties);

        if has_unresolved_placeholder(&resolved) {
            tracing::warn!(
                "Skipping applied script with unresolved path '{}' in {:?}",
                resolved,
                current_file
            );
            continue;
        }
        if is_remote(&resolved) {
            tracing::debug!("Skipping remote applied script '{}'", resolved);
            continue;
        }

        let path = Path::new(&resolved);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        };
        tracing::debug!("Found applied script {:?} in {:?}", path, current_file);
        scripts.push(path);
    }

    scripts
}

fn is_remote(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

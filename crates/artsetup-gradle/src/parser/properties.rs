//! Property table building and placeholder resolution.
//!
//! Gradle sees properties from several layers. Lowest to highest:
//! `gradle.properties`, script `ext` assignments, then `-P`/`-D`
//! command-line arguments. This module extracts each layer and resolves
//! `${name}` / `$name` placeholders against the merged table.

use crate::parser::scanner::{CodeMap, find_blocks_with, is_delimiter};
use regex::{Captures, Regex};
use std::sync::OnceLock;

pub use artsetup_core::{PropertyTable, read_properties_file};

/// Upper bound on re-resolution of values that expand to further placeholders.
const MAX_RESOLVE_PASSES: usize = 8;

/// Matches: ext.key = "value" / project.ext.key = 'value'
static RE_EXT_FLAT: OnceLock<Regex> = OnceLock::new();
/// Matches: key = "value" as a statement inside an ext { } block
static RE_EXT_ASSIGN: OnceLock<Regex> = OnceLock::new();
/// Matches: set("key", "value") inside an ext { } block
static RE_EXT_SET: OnceLock<Regex> = OnceLock::new();
/// Matches: extra["key"] = "value" / extra.set("key", "value")
static RE_KOTLIN_EXTRA: OnceLock<Regex> = OnceLock::new();
/// Matches: val key = "value" / def key = 'value'
static RE_LOCAL: OnceLock<Regex> = OnceLock::new();

fn re_ext_flat() -> &'static Regex {
    RE_EXT_FLAT.get_or_init(|| {
        Regex::new(
            r#"(?:rootProject\.|project\.)?ext\.([A-Za-z_]\w*)\s*=\s*(?:"([^"\n]*)"|'([^'\n]*)')"#,
        )
        .unwrap()
    })
}

fn re_ext_assign() -> &'static Regex {
    RE_EXT_ASSIGN.get_or_init(|| {
        Regex::new(r#"(?m)(?:^|;)[ \t]*([A-Za-z_][\w.]*)\s*=\s*(?:"([^"\n]*)"|'([^'\n]*)')"#)
            .unwrap()
    })
}

fn re_ext_set() -> &'static Regex {
    RE_EXT_SET.get_or_init(|| {
        Regex::new(r#"set\(\s*["']([\w.]+)["']\s*,\s*(?:"([^"\n]*)"|'([^'\n]*)')\s*\)"#).unwrap()
    })
}

fn re_kotlin_extra() -> &'static Regex {
    RE_KOTLIN_EXTRA.get_or_init(|| {
        Regex::new(
            r#"extra(?:\[\s*"([\w.]+)"\s*\]\s*=\s*|\.set\(\s*"([\w.]+)"\s*,\s*)"([^"\n]*)""#,
        )
        .unwrap()
    })
}

fn re_local() -> &'static Regex {
    RE_LOCAL.get_or_init(|| {
        Regex::new(
            r#"(?:val|var|def)\s+([A-Za-z_]\w*)\s*(?::\s*String\s*)?=\s*(?:"([^"\n]*)"|'([^'\n]*)')"#,
        )
        .unwrap()
    })
}

/// A property declaration found in a script.
struct Declaration {
    /// Start of the whole statement; must be code for the declaration to count.
    start: usize,
    /// Byte offset of the key, for document order.
    offset: usize,
    key: String,
    value: String,
}

/// Extracts inline property declarations from a script.
///
/// Recognised forms: `ext { key = "value" }` blocks (including
/// `set("key", "value")`), flat `ext.key = "value"` and
/// `project.ext.key = "value"`, Kotlin `extra["key"] = "value"` and
/// `extra.set("key", "value")`, and script-local `val`/`def` string
/// declarations. Only quoted values are taken. When a key repeats, the
/// last declaration in document order wins.
pub fn extract_properties_from_script(content: &str) -> PropertyTable {
    let map = CodeMap::new(content);
    let mut decls = Vec::new();

    for block in find_blocks_with(content, &map, "ext") {
        let body = &content[block.clone()];
        for re in [re_ext_assign(), re_ext_set()] {
            for caps in re.captures_iter(body) {
                if let Some(decl) = declaration(&caps, 1, block.start) {
                    decls.push(decl);
                }
            }
        }
    }

    for caps in re_ext_flat().captures_iter(content) {
        if bounded(content, caps.get(0).map_or(0, |m| m.start()), false)
            && let Some(decl) = declaration(&caps, 1, 0)
        {
            decls.push(decl);
        }
    }

    for caps in re_kotlin_extra().captures_iter(content) {
        let start = caps.get(0).map_or(0, |m| m.start());
        if !bounded(content, start, true) {
            continue;
        }
        let key = caps.get(1).or_else(|| caps.get(2));
        if let (Some(key), Some(value)) = (key, caps.get(3)) {
            decls.push(Declaration {
                start,
                offset: key.start(),
                key: key.as_str().to_string(),
                value: value.as_str().to_string(),
            });
        }
    }

    for caps in re_local().captures_iter(content) {
        if bounded(content, caps.get(0).map_or(0, |m| m.start()), false)
            && let Some(decl) = declaration(&caps, 1, 0)
        {
            decls.push(decl);
        }
    }

    decls.retain(|d| map.is_code(d.start));
    decls.sort_by_key(|d| d.offset);

    let mut table = PropertyTable::new();
    for decl in decls {
        tracing::trace!("Script property {} = {:?}", decl.key, decl.value);
        table.insert(decl.key, decl.value);
    }
    table
}

/// Builds a declaration from a key group followed by a double-quoted and
/// a single-quoted value group.
fn declaration(caps: &Captures<'_>, key_group: usize, base: usize) -> Option<Declaration> {
    let key = caps.get(key_group)?;
    let value = caps
        .get(key_group + 1)
        .or_else(|| caps.get(key_group + 2))?;
    Some(Declaration {
        start: base + caps.get(0).map_or(key.start(), |m| m.start()),
        offset: base + key.start(),
        key: key.as_str().to_string(),
        value: value.as_str().to_string(),
    })
}

/// True if the match at `start` is not glued to a preceding identifier.
fn bounded(content: &str, start: usize, allow_member: bool) -> bool {
    match start.checked_sub(1).map(|i| content.as_bytes()[i]) {
        None => true,
        Some(b'.') => allow_member,
        Some(b) => is_delimiter(b),
    }
}

/// Collects `-Pkey=value` and `-Dkey=value` arguments.
///
/// Only the first `=` splits key from value. Flags without a key or with
/// an empty value are dropped, as is anything that is not such a flag.
///
/// # Examples
///
/// ```
/// use artsetup_gradle::parser::properties::parse_properties_from_args;
///
/// let props = parse_properties_from_args(&["publish", "-Prepo=libs", "-Dx=a=b"]);
/// assert_eq!(props.get("repo").map(String::as_str), Some("libs"));
/// assert_eq!(props.get("x").map(String::as_str), Some("a=b"));
/// ```
pub fn parse_properties_from_args<S: AsRef<str>>(args: &[S]) -> PropertyTable {
    let mut table = PropertyTable::new();

    for arg in args {
        let arg = arg.as_ref();
        let Some(rest) = arg.strip_prefix("-P").or_else(|| arg.strip_prefix("-D")) else {
            continue;
        };
        let Some((key, value)) = rest.split_once('=') else {
            continue;
        };
        if key.is_empty() || value.is_empty() {
            continue;
        }
        table.insert(key.to_string(), value.to_string());
    }

    table
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'.' || b == b'_'
}

/// Replaces `${name}` and `$name` placeholders with table entries.
///
/// `$name` takes the longest run of letters, digits, dots and underscores.
/// Dotted names are looked up literally; when the whole run is not a key,
/// the longest key ending at a dot boundary is used and the rest of the
/// run is kept verbatim (`$host.example.com` with `host` defined). Unknown
/// placeholders are left as written.
///
/// Values that expand to further placeholders are resolved again, a
/// bounded number of times.
///
/// # Examples
///
/// ```
/// use artsetup_gradle::parser::properties::{PropertyTable, resolve_gradle_property};
///
/// let mut props = PropertyTable::new();
/// props.insert("base".into(), "http://localhost:8081/artifactory".into());
/// assert_eq!(
///     resolve_gradle_property("${base}/libs-release", &props),
///     "http://localhost:8081/artifactory/libs-release"
/// );
/// assert_eq!(resolve_gradle_property("$missing/x", &props), "$missing/x");
/// ```
pub fn resolve_gradle_property(value: &str, properties: &PropertyTable) -> String {
    let mut current = value.to_string();
    for _ in 0..MAX_RESOLVE_PASSES {
        if !current.contains('$') {
            break;
        }
        let next = resolve_once(&current, properties);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn resolve_once(value: &str, properties: &PropertyTable) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(idx) = rest.find('$') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];

        if let Some(inner) = after.strip_prefix('{') {
            let Some(close) = inner.find('}') else {
                out.push_str(&rest[idx..]);
                return out;
            };
            let name = &inner[..close];
            match properties.get(name.trim()) {
                Some(resolved) => out.push_str(resolved),
                None => {
                    out.push_str("${");
                    out.push_str(name);
                    out.push('}');
                }
            }
            rest = &inner[close + 1..];
            continue;
        }

        let run_len = after.bytes().take_while(|&b| is_name_byte(b)).count();
        let run = &after[..run_len];
        if run.is_empty() {
            out.push('$');
        } else if let Some((name_len, resolved)) = longest_known_prefix(run, properties) {
            out.push_str(resolved);
            out.push_str(&run[name_len..]);
        } else {
            out.push('$');
            out.push_str(run);
        }
        rest = &after[run_len..];
    }

    out.push_str(rest);
    out
}

/// Longest prefix of `run` that is a key, trying the whole run first and
/// then each cut at a `.`.
fn longest_known_prefix<'a>(run: &str, properties: &'a PropertyTable) -> Option<(usize, &'a str)> {
    if let Some(value) = properties.get(run) {
        return Some((run.len(), value.as_str()));
    }
    run.char_indices()
        .rev()
        .filter(|&(_, c)| c == '.')
        .find_map(|(i, _)| properties.get(&run[..i]).map(|v| (i, v.as_str())))
}

/// True if `value` still contains a `${...}` or `$name` marker.
pub fn has_unresolved_placeholder(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'$'
            && bytes
                .get(i + 1)
                .is_some_and(|&next| next == b'{' || next.is_ascii_alphabetic() || next == b'_')
    })
}

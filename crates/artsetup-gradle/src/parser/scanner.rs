//! Lexical scanner for Gradle scripts.
//!
//! Knows just enough of Groovy and Kotlin to tell code from string
//! literals and comments, so that keyword lookups and brace balancing
//! ignore `"publishing"` in a description or a `}` inside a comment.
//! Anything outside the recognised shapes is opaque text.

use std::ops::Range;

/// Returns true for bytes that may bound a keyword.
pub fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'{' | b'}' | b'(' | b')' | b';' | b',' | b' ' | b'\t' | b'\n' | b'\r'
    )
}

pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Per-byte classification of a script.
///
/// A byte is "code" when it lies outside string literals and comments
/// (quotes and comment markers themselves are not code). Brace depth is
/// tracked over code bytes only.
#[derive(Debug, Clone)]
pub struct CodeMap {
    code: Vec<bool>,
    depth: Vec<u32>,
}

impl CodeMap {
    pub fn new(content: &str) -> Self {
        let bytes = content.as_bytes();
        let len = bytes.len();
        let mut code = vec![true; len];

        let mut i = 0;
        while i < len {
            let end = match bytes[i] {
                b'/' if bytes.get(i + 1) == Some(&b'/') => Some(
                    bytes[i..]
                        .iter()
                        .position(|&b| b == b'\n')
                        .map_or(len, |p| i + p),
                ),
                b'/' if bytes.get(i + 1) == Some(&b'*') => Some(
                    find_subslice(&bytes[i + 2..], b"*/").map_or(len, |p| i + 2 + p + 2),
                ),
                q @ (b'"' | b'\'') => Some(string_end(bytes, i, q)),
                _ => None,
            };

            match end {
                Some(end) => {
                    code[i..end].fill(false);
                    i = end;
                }
                None => i += 1,
            }
        }

        let mut depth = Vec::with_capacity(len);
        let mut current: u32 = 0;
        for (i, &b) in bytes.iter().enumerate() {
            if code[i] && b == b'}' {
                current = current.saturating_sub(1);
            }
            depth.push(current);
            if code[i] && b == b'{' {
                current += 1;
            }
        }

        Self { code, depth }
    }

    /// True if the byte at `offset` is outside strings and comments.
    pub fn is_code(&self, offset: usize) -> bool {
        self.code.get(offset).copied().unwrap_or(false)
    }

    /// Brace nesting depth at `offset`. A brace sits at the depth of the
    /// text surrounding it, not the text it encloses.
    pub fn depth_at(&self, offset: usize) -> u32 {
        self.depth.get(offset).copied().unwrap_or(0)
    }

    /// Byte offset of the `}` balancing the `{` at `open`.
    fn matching_brace(&self, bytes: &[u8], open: usize) -> Option<usize> {
        let mut depth: usize = 0;
        for (i, &b) in bytes.iter().enumerate().skip(open) {
            if !self.code[i] {
                continue;
            }
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

/// End offset (exclusive) of the string literal opening at `start`.
///
/// Triple-quoted strings may span lines. Single-quoted ones stop at the
/// end of the line when unterminated, which keeps a stray apostrophe from
/// swallowing the rest of the file.
fn string_end(bytes: &[u8], start: usize, quote: u8) -> usize {
    let len = bytes.len();
    let triple = [quote; 3];

    if bytes[start..].starts_with(&triple) {
        let mut j = start + 3;
        while j < len {
            if bytes[j] == b'\\' {
                j += 2;
                continue;
            }
            if bytes[j..].starts_with(&triple) {
                return j + 3;
            }
            j += 1;
        }
        return len;
    }

    let mut j = start + 1;
    while j < len {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => return j,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    len
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Byte ranges of the bodies of every `keyword { ... }` block in `content`.
///
/// Ranges exclude the braces themselves and are returned in document
/// order, nested occurrences included.
pub fn find_blocks(content: &str, keyword: &str) -> Vec<Range<usize>> {
    if keyword.is_empty() {
        return vec![];
    }

    let map = CodeMap::new(content);
    find_blocks_with(content, &map, keyword)
}

pub(crate) fn find_blocks_with(content: &str, map: &CodeMap, keyword: &str) -> Vec<Range<usize>> {
    let bytes = content.as_bytes();
    let len = bytes.len();
    let mut blocks = Vec::new();
    let mut search = 0;

    while let Some(rel) = content[search..].find(keyword) {
        let start = search + rel;
        let end = start + keyword.len();
        search = end;

        if !map.is_code(start) {
            continue;
        }
        let left_ok = start == 0 || is_delimiter(bytes[start - 1]);
        let right_ok = end == len || is_delimiter(bytes[end]);
        if !left_ok || !right_ok {
            continue;
        }

        let mut open = end;
        while open < len && is_whitespace(bytes[open]) {
            open += 1;
        }
        if open >= len || bytes[open] != b'{' || !map.is_code(open) {
            continue;
        }

        match map.matching_brace(bytes, open) {
            Some(close) => blocks.push(open + 1..close),
            None => tracing::trace!("Unbalanced '{}' block at offset {}", keyword, start),
        }
    }

    blocks
}

/// Returns the body of every `keyword { ... }` block in `content`.
///
/// Occurrences inside strings or comments, or embedded in a longer
/// identifier, do not count. Unbalanced blocks are dropped rather than
/// reported.
///
/// # Examples
///
/// ```
/// use artsetup_gradle::parser::scanner::extract_all_blocks;
///
/// let script = "publishing { repositories { maven { url 'x' } } }";
/// let blocks = extract_all_blocks(script, "repositories");
/// assert_eq!(blocks, vec![" maven { url 'x' } "]);
/// ```
pub fn extract_all_blocks<'a>(content: &'a str, keyword: &str) -> Vec<&'a str> {
    find_blocks(content, keyword)
        .into_iter()
        .map(|range| &content[range])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiters() {
        for b in b"{}();, \t\n\r" {
            assert!(is_delimiter(*b), "{:?} should be a delimiter", *b as char);
        }
        assert!(!is_delimiter(b'a'));
        assert!(!is_delimiter(b'.'));
        assert!(!is_delimiter(b'_'));
    }

    #[test]
    fn test_whitespace() {
        assert!(is_whitespace(b' '));
        assert!(is_whitespace(b'\n'));
        assert!(!is_whitespace(b'{'));
    }

    #[test]
    fn test_single_block() {
        let blocks = extract_all_blocks("ext {\n  a = '1'\n}\n", "ext");
        assert_eq!(blocks, vec!["\n  a = '1'\n"]);
    }

    #[test]
    fn test_nested_braces_reproduced_verbatim() {
        let content = "publishing {\n  repositories {\n    maven { url 'x' }\n  }\n}";
        let blocks = extract_all_blocks(content, "publishing");
        assert_eq!(
            blocks,
            vec!["\n  repositories {\n    maven { url 'x' }\n  }\n"]
        );
    }

    #[test]
    fn test_multiple_blocks_in_order() {
        let content = "maven { url 'a' }\nmaven { url 'b' }";
        let blocks = extract_all_blocks(content, "maven");
        assert_eq!(blocks, vec![" url 'a' ", " url 'b' "]);
    }

    #[test]
    fn test_nested_same_keyword() {
        let content = "repositories { repositories { x } }";
        let blocks = extract_all_blocks(content, "repositories");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1], " x ");
    }

    #[test]
    fn test_keyword_inside_string_ignored() {
        let content = "description = \"publishing is great\"\nversion = '1'";
        assert!(extract_all_blocks(content, "publishing").is_empty());

        let content = "def s = 'publishing { x }'";
        assert!(extract_all_blocks(content, "publishing").is_empty());
    }

    #[test]
    fn test_keyword_inside_comments_ignored() {
        let content = "// publishing { a }\n/* publishing { b } */\npublishing { c }";
        let blocks = extract_all_blocks(content, "publishing");
        assert_eq!(blocks, vec![" c "]);
    }

    #[test]
    fn test_keyword_as_substring_ignored() {
        let content = "context { a }\nextension { b }\next { c }";
        let blocks = extract_all_blocks(content, "ext");
        assert_eq!(blocks, vec![" c "]);
    }

    #[test]
    fn test_braces_in_strings_and_comments_skipped() {
        let content = "maven {\n  url \"http://x/}\" // }\n  /* { */\n}";
        let blocks = extract_all_blocks(content, "maven");
        assert_eq!(blocks, vec!["\n  url \"http://x/}\" // }\n  /* { */\n"]);
    }

    #[test]
    fn test_keyword_without_brace_is_not_a_match() {
        let content = "maven(MavenPublication)\nmaven;\n";
        assert!(extract_all_blocks(content, "maven").is_empty());
    }

    #[test]
    fn test_brace_on_next_line() {
        let content = "publishing\n{\n  x\n}";
        assert_eq!(extract_all_blocks(content, "publishing"), vec!["\n  x\n"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_all_blocks("", "ext").is_empty());
        assert!(extract_all_blocks("ext { a }", "").is_empty());
    }

    #[test]
    fn test_unbalanced_block_dropped() {
        assert!(extract_all_blocks("publishing { repositories {", "publishing").is_empty());
    }

    #[test]
    fn test_triple_quoted_strings() {
        let content = "def d = \"\"\"\npublishing { }\n\"\"\"\npublishing { real }";
        assert_eq!(extract_all_blocks(content, "publishing"), vec![" real "]);
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let content = "def s = \"a \\\" publishing { x }\"\npublishing { y }";
        assert_eq!(extract_all_blocks(content, "publishing"), vec![" y "]);
    }

    #[test]
    fn test_apostrophe_does_not_swallow_file() {
        let content = "// it's fine\npublishing { y }";
        assert_eq!(extract_all_blocks(content, "publishing"), vec![" y "]);
    }

    #[test]
    fn test_non_ascii_content() {
        let content = "description = \"héllo wörld\"\next { a = 'ü' }";
        assert_eq!(extract_all_blocks(content, "ext"), vec![" a = 'ü' "]);
    }

    #[test]
    fn test_code_map_depth() {
        let content = "a { b { c } }";
        let map = CodeMap::new(content);
        assert_eq!(map.depth_at(0), 0);
        assert_eq!(map.depth_at(2), 0);
        assert_eq!(map.depth_at(4), 1);
        assert_eq!(map.depth_at(8), 2);
        assert_eq!(map.depth_at(12), 0);
    }

    #[test]
    fn test_code_map_strings() {
        let content = "a 'b' c";
        let map = CodeMap::new(content);
        assert!(map.is_code(0));
        assert!(!map.is_code(2));
        assert!(!map.is_code(3));
        assert!(!map.is_code(4));
        assert!(map.is_code(6));
        assert!(!map.is_code(100));
    }
}

//! Composite/included-build enumeration (§4.2 point 2).
//!
//! Scans `settings.gradle`/`settings.gradle.kts` for `includeBuild(...)`
//! calls using a manual byte-level lexer that tracks string/comment state,
//! so occurrences inside string literals or comments are never mistaken for
//! real includes.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

pub const BUILDSRC_DIR_NAME: &str = "buildSrc";
pub const BUILDSRC_PROJECT_PATH_PREFIX: &str = ":__buildSrc";

/// Locate a project directory's settings file, preferring the Groovy DSL.
pub fn find_settings_file(dir: &Path) -> Option<PathBuf> {
    for name in ["settings.gradle", "settings.gradle.kts"] {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Recursively enumerate every build root reachable from `root_dir` via
/// `includeBuild`, including `root_dir` itself. De-duplicated by
/// canonicalized directory (falls back to the raw join when
/// canonicalization fails, e.g. in tests against nonexistent fixtures).
///
/// Discovery order is root-first, then each build's own `includeBuild`
/// targets in encounter order (§5, "Ordering guarantees") — a `VecDeque`
/// used FIFO (`push_back`/`pop_front`) rather than as a LIFO stack, so two
/// sibling includes surface in the order they appear in the settings file
/// rather than reversed.
pub fn enumerate_composite_builds(root_dir: &Path) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::from([root_dir.to_path_buf()]);

    while let Some(dir) = queue.pop_front() {
        let key = dunce::canonicalize(&dir).unwrap_or_else(|_| dir.clone());
        if !seen.insert(key) {
            continue;
        }
        order.push(dir.clone());

        let Some(settings_path) = find_settings_file(&dir) else {
            continue;
        };
        let Ok(contents) = std::fs::read_to_string(&settings_path) else {
            continue;
        };
        for rel in parse_included_build_dirs(&contents) {
            if let Some(resolved) = normalize_dir_rel(&rel) {
                queue.push_back(dir.join(resolved));
            }
        }
    }

    order
}

/// Returns `true` if a settings file's content contains any `include` /
/// `includeFlat` / `includeBuild` keyword outside strings/comments — a
/// cheap heuristic for "this directory is probably a multi-project build"
/// used before paying for a full probe invocation.
pub fn settings_suggest_multi_project(contents: &str) -> bool {
    for keyword in ["includeBuild", "includeFlat", "include"] {
        if find_keyword_outside_strings(contents, keyword).is_some() {
            return true;
        }
    }
    false
}

/// Extract the relative directory argument of every `includeBuild(...)`
/// call in a settings script, outside of string/comment context.
pub fn parse_included_build_dirs(contents: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut search_from = 0;
    while let Some(start) = find_keyword_outside_strings(&contents[search_from..], "includeBuild")
    {
        let abs_start = search_from + start;
        let after_keyword = abs_start + "includeBuild".len();
        if let Some(arg) = extract_first_string_argument(&contents[after_keyword..]) {
            out.push(arg);
        }
        search_from = after_keyword;
    }
    out
}

/// After `includeBuild`, skip whitespace/`(` and read the first quoted
/// string literal argument, handling single/double quotes and simple
/// backslash escapes.
fn extract_first_string_argument(rest: &str) -> Option<String> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() && (bytes[i] as char).is_whitespace() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'(' {
        i += 1;
        while i < bytes.len() && (bytes[i] as char).is_whitespace() {
            i += 1;
        }
    }
    let quote = *bytes.get(i)?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    i += 1;
    let mut value = String::new();
    while i < bytes.len() {
        let c = bytes[i];
        if c == b'\\' && i + 1 < bytes.len() {
            value.push(bytes[i + 1] as char);
            i += 2;
            continue;
        }
        if c == quote {
            return Some(value);
        }
        value.push(c as char);
        i += 1;
    }
    None
}

/// Normalize a relative `includeBuild` directory argument: reject absolute
/// paths and Windows drive-letter paths, strip a leading `./`, strip a
/// trailing `/`.
fn normalize_dir_rel(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('/') || trimmed.starts_with('\\') {
        return None;
    }
    if trimmed.len() >= 2 && trimmed.as_bytes()[1] == b':' {
        return None;
    }
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

/// Find the first byte offset of `keyword` in `contents` that does not fall
/// inside a quoted string or a `//`/`/* */` comment, and is a whole
/// "word" (not a substring of a longer identifier).
pub fn find_keyword_outside_strings(contents: &str, keyword: &str) -> Option<usize> {
    let bytes = contents.as_bytes();
    let kw = keyword.as_bytes();
    let mut i = 0;
    let mut state = LexState::Code;

    while i < bytes.len() {
        match state {
            LexState::Code => {
                if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'/') {
                    state = LexState::LineComment;
                    i += 2;
                    continue;
                }
                if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
                    state = LexState::BlockComment;
                    i += 2;
                    continue;
                }
                if bytes[i] == b'"' {
                    if matches_triple(bytes, i, b'"') {
                        state = LexState::TripleString(b'"');
                        i += 3;
                    } else {
                        state = LexState::String(b'"');
                        i += 1;
                    }
                    continue;
                }
                if bytes[i] == b'\'' {
                    if matches_triple(bytes, i, b'\'') {
                        state = LexState::TripleString(b'\'');
                        i += 3;
                    } else {
                        state = LexState::String(b'\'');
                        i += 1;
                    }
                    continue;
                }
                if bytes[i..].starts_with(kw) && is_word_boundary(bytes, i, kw.len()) {
                    return Some(i);
                }
                i += 1;
            }
            LexState::LineComment => {
                if bytes[i] == b'\n' {
                    state = LexState::Code;
                }
                i += 1;
            }
            LexState::BlockComment => {
                if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    state = LexState::Code;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            LexState::String(q) => {
                if bytes[i] == b'\\' {
                    i += 2;
                    continue;
                }
                if bytes[i] == q {
                    state = LexState::Code;
                }
                i += 1;
            }
            LexState::TripleString(q) => {
                if bytes[i] == b'\\' {
                    i += 2;
                    continue;
                }
                if matches_triple(bytes, i, q) {
                    state = LexState::Code;
                    i += 3;
                } else {
                    i += 1;
                }
            }
        }
    }
    None
}

enum LexState {
    Code,
    LineComment,
    BlockComment,
    String(u8),
    TripleString(u8),
}

fn matches_triple(bytes: &[u8], i: usize, q: u8) -> bool {
    bytes.get(i) == Some(&q) && bytes.get(i + 1) == Some(&q) && bytes.get(i + 2) == Some(&q)
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_word_boundary(bytes: &[u8], start: usize, len: usize) -> bool {
    let before_ok = start == 0 || !is_word_byte(bytes[start - 1]);
    let after_ok = bytes.get(start + len).map_or(true, |&b| !is_word_byte(b));
    before_ok && after_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_include_build_outside_strings_and_comments() {
        let contents = r#"
            // includeBuild("commented-out")
            /* includeBuild("also-commented") */
            includeBuild("../libs/util")
            includeBuild '../libs/other'
        "#;
        let dirs = parse_included_build_dirs(contents);
        assert_eq!(dirs, vec!["../libs/util".to_string(), "../libs/other".to_string()]);
    }

    #[test]
    fn ignores_keyword_appearing_inside_string_literal() {
        let contents = r#"rootProject.name = "includeBuild-ish""#;
        assert!(parse_included_build_dirs(contents).is_empty());
    }

    #[test]
    fn ignores_keyword_as_substring_of_longer_identifier() {
        let contents = "myIncludeBuildHelper()";
        assert!(find_keyword_outside_strings(contents, "includeBuild").is_none());
    }

    #[test]
    fn normalizes_dot_slash_and_trailing_slash() {
        let contents = r#"includeBuild("./libs/util/")"#;
        let dirs = parse_included_build_dirs(contents);
        assert_eq!(dirs, vec!["./libs/util/".to_string()]);
        assert_eq!(normalize_dir_rel(&dirs[0]), Some(PathBuf::from("libs/util")));
    }

    #[test]
    fn rejects_absolute_and_drive_letter_paths() {
        assert_eq!(normalize_dir_rel("/abs/path"), None);
        assert_eq!(normalize_dir_rel("C:\\abs\\path"), None);
    }

    #[test]
    fn settings_suggest_multi_project_detects_include() {
        assert!(settings_suggest_multi_project("include(':a', ':b')"));
        assert!(!settings_suggest_multi_project("rootProject.name = 'solo'"));
    }

    #[test]
    fn enumerate_composite_builds_recurses_and_dedups() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        let util = dir.path().join("libs/util");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::create_dir_all(&util).unwrap();
        std::fs::write(
            root.join("settings.gradle"),
            "includeBuild(\"../libs/util\")\n",
        )
        .unwrap();
        // util has no settings file of its own; still reachable as a leaf.
        let builds = enumerate_composite_builds(&root);
        assert_eq!(builds.len(), 2);
        assert_eq!(builds[0], root);
    }

    /// §5 "Ordering guarantees": sibling `includeBuild` targets are
    /// discovered in encounter order, not reversed.
    #[test]
    fn enumerate_composite_builds_preserves_sibling_encounter_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        let first = dir.path().join("libs/first");
        let second = dir.path().join("libs/second");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::create_dir_all(&first).unwrap();
        std::fs::create_dir_all(&second).unwrap();
        std::fs::write(
            root.join("settings.gradle"),
            "includeBuild(\"../libs/first\")\nincludeBuild(\"../libs/second\")\n",
        )
        .unwrap();

        let builds = enumerate_composite_builds(&root);
        assert_eq!(builds, vec![root, first, second]);
    }
}

//! Build target URI scheme (§6.2): `<projectDirAsFileUri>?sourceset=<urlEncodedSourceSetName>`.
//!
//! Kept dependency-light: no full URL-parsing crate, just the minimal
//! percent-encode / percent-decode this one scheme needs.

use std::path::{Path, PathBuf};

use gradle_bsp_model::BuildTargetIdentifier;

use crate::error::{GradleBspError, Result};

/// Build a stable target URI for `(project_dir, source_set_name)` (§6.2).
///
/// The query parameter is the single source of source-set identity;
/// `project_dir` must be absolute.
pub fn build_target_uri(project_dir: &Path, source_set_name: &str) -> Result<BuildTargetIdentifier> {
    let dir_uri = path_to_file_uri(project_dir)?;
    let encoded = encode_query_component(source_set_name);
    Ok(BuildTargetIdentifier::new(format!(
        "{dir_uri}?sourceset={encoded}"
    )))
}

/// Parse a target URI back into `(project_dir, source_set_name)`.
///
/// Tolerates arbitrary additional query keys (§6.2); only `sourceset` is
/// significant. Directory equality alone is never used as identity — a URI
/// with no `sourceset` key is rejected.
pub fn parse_build_target_uri(uri: &BuildTargetIdentifier) -> Result<(PathBuf, String)> {
    let (base, query) = uri
        .uri
        .split_once('?')
        .ok_or_else(|| GradleBspError::InvalidUri(uri.uri.clone()))?;

    let mut source_set = None;
    for pair in query.split('&') {
        if let Some(value) = pair.strip_prefix("sourceset=") {
            source_set = Some(decode_query_component(value)?);
        }
    }
    let source_set = source_set.ok_or_else(|| GradleBspError::InvalidUri(uri.uri.clone()))?;
    let dir = file_uri_to_path(base)?;
    Ok((dir, source_set))
}

/// Convert an absolute filesystem path into a `file://` URI string.
pub fn path_to_file_uri(path: &Path) -> Result<String> {
    if !path.is_absolute() {
        return Err(GradleBspError::InvalidUri(format!(
            "project dir is not absolute: {}",
            path.display()
        )));
    }
    let path_str = path
        .to_str()
        .ok_or_else(|| GradleBspError::InvalidUri(format!("non-utf8 path: {}", path.display())))?;

    #[cfg(windows)]
    {
        let normalized = path_str.replace('\\', "/");
        let normalized = normalized.strip_prefix('/').unwrap_or(&normalized);
        Ok(format!("file:///{}", encode_path_component(normalized)))
    }
    #[cfg(not(windows))]
    {
        Ok(format!("file://{}", encode_path_component(path_str)))
    }
}

/// Convert a `file://` URI string back into an absolute filesystem path.
pub fn file_uri_to_path(uri: &str) -> Result<PathBuf> {
    let rest = uri
        .strip_prefix("file://")
        .ok_or_else(|| GradleBspError::InvalidUri(uri.to_string()))?;
    let decoded = percent_decode(rest)?;

    #[cfg(windows)]
    {
        let decoded = decoded.trim_start_matches('/');
        Ok(PathBuf::from(decoded.replace('/', "\\")))
    }
    #[cfg(not(windows))]
    {
        if !decoded.starts_with('/') {
            return Err(GradleBspError::InvalidUri(uri.to_string()));
        }
        Ok(PathBuf::from(decoded))
    }
}

/// Percent-encode a path for embedding in a `file://` authority-less URI.
/// Leaves `/` unescaped (it is the path separator, not reserved within the
/// path component here) but escapes everything RFC 3986 marks reserved or
/// non-ASCII.
fn encode_path_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Percent-encode a query-string value (§6.2 `urlEncodedSourceSetName`).
/// Unlike [`encode_path_component`], `/` and `?`/`&`/`=` must be escaped
/// since they would otherwise be mistaken for query structure.
fn encode_query_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn decode_query_component(s: &str) -> Result<String> {
    percent_decode(s)
}

fn percent_decode(s: &str) -> Result<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|h| u8::from_str_radix(h, 16).ok());
            match hex {
                Some(byte) => {
                    out.push(byte);
                    i += 3;
                }
                None => {
                    out.push(bytes[i]);
                    i += 1;
                }
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| GradleBspError::InvalidUri(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn round_trips_simple_source_set_name() {
        let dir = Path::new("/home/u/app");
        let uri = build_target_uri(dir, "main").unwrap();
        assert_eq!(uri.uri, "file:///home/u/app?sourceset=main");
        let (parsed_dir, parsed_name) = parse_build_target_uri(&uri).unwrap();
        assert_eq!(parsed_dir, dir);
        assert_eq!(parsed_name, "main");
    }

    #[cfg(unix)]
    #[test]
    fn round_trips_reserved_characters_in_source_set_name() {
        let dir = Path::new("/home/u/app");
        for name in ["debug&release", "a b", "name=value", "100% done", "a/b"] {
            let uri = build_target_uri(dir, name).unwrap();
            let (parsed_dir, parsed_name) = parse_build_target_uri(&uri).unwrap();
            assert_eq!(parsed_dir, dir);
            assert_eq!(parsed_name, name);
        }
    }

    #[cfg(unix)]
    #[test]
    fn tolerates_additional_query_keys() {
        let identifier = BuildTargetIdentifier::new("file:///home/u/app?foo=bar&sourceset=test&baz=qux");
        let (dir, name) = parse_build_target_uri(&identifier).unwrap();
        assert_eq!(dir, PathBuf::from("/home/u/app"));
        assert_eq!(name, "test");
    }

    #[test]
    fn rejects_uri_without_sourceset_key() {
        let identifier = BuildTargetIdentifier::new("file:///home/u/app?other=1");
        assert!(parse_build_target_uri(&identifier).is_err());
    }

    #[test]
    fn rejects_relative_project_dir() {
        assert!(build_target_uri(Path::new("relative/dir"), "main").is_err());
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized Java major version.
///
/// Gradle and Maven both accept a wide variety of string spellings for the
/// same version ("17", "1.8", "17.0.2", "JavaVersion.VERSION_17",
/// "VERSION_1_8", "8u402", "17-ea"); [`JavaVersion::parse`] collapses all of
/// them to a single `u16` major version so the rest of the pipeline never has
/// to re-derive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JavaVersion(pub u16);

impl JavaVersion {
    pub fn major(self) -> u16 {
        self.0
    }

    /// Parse a Gradle/Maven-style Java version string into its major version.
    ///
    /// Returns `None` if no recognizable major version could be extracted.
    pub fn parse(raw: &str) -> Option<JavaVersion> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        // "JavaVersion.VERSION_17", "VERSION_1_8", "VERSION_17"
        let stripped = raw
            .strip_prefix("JavaVersion.")
            .unwrap_or(raw)
            .strip_prefix("VERSION_")
            .unwrap_or(raw.strip_prefix("JavaVersion.VERSION_").unwrap_or(raw));

        let digits = extract_leading_version(stripped)?;
        Self::from_legacy_or_major(&digits)
    }

    fn from_legacy_or_major(digits: &str) -> Option<JavaVersion> {
        // "1_8" / "1.8" legacy form: major version is the second component.
        let parts: Vec<&str> = digits.split(|c| c == '.' || c == '_').collect();
        if parts.len() >= 2 && parts[0] == "1" {
            let major: u16 = parts[1].parse().ok()?;
            return Some(JavaVersion(major));
        }
        let major: u16 = parts.first()?.parse().ok()?;
        Some(JavaVersion(major))
    }
}

/// Pulls the leading run of version-shaped characters (digits, `.`, `_`) out
/// of a string that may carry trailing noise like `-ea` or a `u`-update
/// suffix (`8u402` -> `8`).
fn extract_leading_version(s: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = s.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() || c == '.' || c == '_' {
            out.push(c);
            chars.next();
        } else {
            break;
        }
    }
    if out.is_empty() {
        return None;
    }
    // "8u402" style update suffix: drop everything from the first non version
    // char onward, which the loop above already did (stopped at 'u').
    // But "17.0.2" should keep only the major component, not the patch.
    if let Some(first_dot) = out.find('.') {
        if !out.starts_with("1.") {
            out.truncate(first_dot);
        }
    }
    Some(out)
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

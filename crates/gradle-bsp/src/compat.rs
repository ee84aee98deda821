//! Gradle/Java version compatibility helpers (§6.1), part of the
//! `GradleDriver` collaborator contract.

/// Highest JDK major version string a given Gradle version is documented to
/// support, per the published compatibility matrix. Empty string for
/// versions below Gradle's own minimum (2.0).
pub fn latest_compatible_java_version(gradle_version: &str) -> String {
    let Some(v) = parse_gradle_version(gradle_version) else {
        return String::new();
    };

    const TABLE: &[((u32, u32), &str)] = &[
        ((8, 8), "22"),
        ((8, 5), "21"),
        ((8, 4), "20"),
        ((8, 3), "19"),
        ((7, 3), "17"),
        ((7, 0), "16"),
        ((6, 8), "16"),
        ((6, 7), "15"),
        ((6, 3), "14"),
        ((5, 4), "13"),
        ((4, 10), "12"),
        ((4, 8), "11"),
        ((4, 3), "10"),
        ((4, 1), "9"),
        ((2, 0), "1.8"),
    ];

    for &((major, minor), java) in TABLE {
        if v >= (major, minor) {
            return java.to_string();
        }
    }
    String::new()
}

/// The oldest JDK major version every supported Gradle version can run on.
pub fn oldest_compatible_java_version() -> &'static str {
    "1.8"
}

/// Parses a Gradle version string (`"8.5"`, `"8.5.1"`, `"8.5-rc-1"`) into a
/// `(major, minor)` pair for comparison against the compatibility table.
fn parse_gradle_version(raw: &str) -> Option<(u32, u32)> {
    let core = raw.split(['-', '+']).next().unwrap_or(raw);
    let mut parts = core.split('.');
    let major: u32 = parts.next()?.parse().ok()?;
    let minor: u32 = parts.next().and_then(|m| m.parse().ok()).unwrap_or(0);
    Some((major, minor))
}

/// Numeric ordering over the table's string outputs, used to verify
/// monotonicity (§8 invariant 5): empty sorts below any numeric value, and
/// "1.8" sorts below plain-integer major versions.
pub fn compare_java_version_strings(a: &str, b: &str) -> std::cmp::Ordering {
    fn rank(s: &str) -> Option<u32> {
        if s.is_empty() {
            return None;
        }
        if s == "1.8" {
            return Some(8);
        }
        s.parse().ok()
    }
    rank(a).cmp(&rank(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_scenario_s5() {
        assert_eq!(latest_compatible_java_version("8.5"), "21");
        assert_eq!(latest_compatible_java_version("7.0"), "16");
        assert_eq!(latest_compatible_java_version("1.9"), "");
        assert_eq!(oldest_compatible_java_version(), "1.8");
    }

    #[test]
    fn handles_patch_and_prerelease_suffixes() {
        assert_eq!(latest_compatible_java_version("8.5.1"), "21");
        assert_eq!(latest_compatible_java_version("7.0-rc-1"), "16");
    }

    #[test]
    fn below_gradle_minimum_yields_empty() {
        assert_eq!(latest_compatible_java_version("1.12"), "");
        assert_eq!(latest_compatible_java_version("garbage"), "");
    }

    #[test]
    fn table_is_monotonic_in_gradle_version() {
        let samples = [
            "1.9", "2.0", "4.1", "4.3", "4.8", "4.10", "5.4", "6.3", "6.7", "6.8", "7.0", "7.3",
            "8.3", "8.4", "8.5", "8.8", "9.0",
        ];
        let mut prev_value = String::new();
        for (i, &v) in samples.iter().enumerate() {
            let value = latest_compatible_java_version(v);
            if i > 0 {
                let ord = compare_java_version_strings(&prev_value, &value);
                assert_ne!(ord, std::cmp::Ordering::Greater, "{prev_value} > {value}");
            }
            prev_value = value;
        }
    }
}

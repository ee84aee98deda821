//! Configuration (§12, ambient stack).
//!
//! `parallelism` bounds the per-project probe worker pool, `probe_timeout`
//! bounds a single probe invocation.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

/// Gradle invocation configuration. No file-based preference loading lives
/// in this crate (out of scope per §1) — callers construct this directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradleConfig {
    /// Explicit `gradle`/`gradlew` binary. When absent, discovery prefers
    /// the project's wrapper script if `prefer_wrapper` is set.
    pub gradle_path: Option<PathBuf>,
    pub prefer_wrapper: bool,
    /// Bounds the per-project probe worker pool (§5). Defaults to
    /// `std::thread::available_parallelism()`.
    pub parallelism: Option<NonZeroUsize>,
    /// Bounds a single `gradle` invocation.
    pub probe_timeout: Option<Duration>,
}

impl Default for GradleConfig {
    fn default() -> Self {
        Self {
            gradle_path: None,
            prefer_wrapper: true,
            parallelism: None,
            probe_timeout: Some(Duration::from_secs(15 * 60)),
        }
    }
}

impl GradleConfig {
    /// The effective worker-pool size: `parallelism` if set, otherwise
    /// `available_parallelism()`, otherwise 1.
    pub fn effective_parallelism(&self) -> usize {
        self.parallelism
            .map(NonZeroUsize::get)
            .or_else(|| std::thread::available_parallelism().ok().map(NonZeroUsize::get))
            .unwrap_or(1)
    }
}

/// Gradle installation/user-home preferences, consumed by
/// `GradleDriver::connect` (§6.1). Environment fallback to
/// `GRADLE_HOME`/`GRADLE_USER_HOME` applies when a field is `None` (§6.4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradlePreferences {
    pub gradle_home: Option<PathBuf>,
    pub gradle_user_home: Option<PathBuf>,
}

impl GradlePreferences {
    /// Resolve `gradle_home`, falling back to the `GRADLE_HOME` environment
    /// variable (§6.4).
    pub fn resolved_gradle_home(&self) -> Option<PathBuf> {
        self.gradle_home
            .clone()
            .or_else(|| std::env::var_os("GRADLE_HOME").map(PathBuf::from))
    }

    /// Resolve `gradle_user_home`, falling back to `GRADLE_USER_HOME`.
    pub fn resolved_gradle_user_home(&self) -> Option<PathBuf> {
        self.gradle_user_home
            .clone()
            .or_else(|| std::env::var_os("GRADLE_USER_HOME").map(PathBuf::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_parallelism_uses_explicit_override() {
        let config = GradleConfig {
            parallelism: NonZeroUsize::new(3),
            ..GradleConfig::default()
        };
        assert_eq!(config.effective_parallelism(), 3);
    }

    #[test]
    fn effective_parallelism_falls_back_to_available_parallelism() {
        let config = GradleConfig::default();
        assert!(config.effective_parallelism() >= 1);
    }

    #[test]
    fn preferences_fall_back_to_environment() {
        // SAFETY (test-only): env var mutation races with other tests that
        // touch the same key. No other test in this crate reads/writes
        // GRADLE_HOME, so this is safe in practice for this test binary.
        unsafe {
            std::env::set_var("GRADLE_HOME", "/opt/gradle-home");
        }
        let prefs = GradlePreferences::default();
        assert_eq!(prefs.resolved_gradle_home(), Some(PathBuf::from("/opt/gradle-home")));
        unsafe {
            std::env::remove_var("GRADLE_HOME");
        }
    }
}

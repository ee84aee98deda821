//! Collaborator contracts (§6.1): the narrow interfaces this crate calls
//! out to but does not itself implement. Concrete JSON-RPC transport, CLI
//! argument parsing, and a full Tooling-API-grade connector lifecycle are
//! out of scope (§1) — these traits pin only the seam the core depends on.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::GradlePreferences;
use crate::error::Result;

/// A resolved handle to a `gradle`/`gradlew` invocation target: the binary
/// path plus the environment it should run with. Returned by
/// [`GradleDriver::connect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradleConnection {
    pub gradle_program: PathBuf,
    pub gradle_user_home: Option<PathBuf>,
}

/// Resolves the effective `gradle` binary per preference (wrapper /
/// explicit version / explicit installation / `PATH` default) and opens a
/// connection used by the probe/aggregator.
pub trait GradleDriver: Send + Sync {
    fn connect(
        &self,
        project_root: &Path,
        preferences: &GradlePreferences,
    ) -> Result<GradleConnection>;
}

/// A single progress event from a delegated build/test invocation. Opaque
/// to the core (§1, "Compilation/testing execution ... delegated to Gradle
/// launchers").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildProgressEvent {
    Started { task: String },
    Output { line: String },
    Finished { task: String, success: bool },
}

/// A single BSP-style build-target selector (project dir + source-set
/// name), used to scope a test/run invocation to one or more targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSelector {
    pub project_dir: PathBuf,
    pub source_set_name: String,
}

/// Drives compilation/test execution. Out of scope for this crate's core
/// (§1); this trait exists only so the BSP-facing layer can depend on a
/// stable seam instead of a concrete Gradle-CLI implementation.
pub trait BuildInvoker: Send + Sync {
    fn run_build(
        &self,
        task_names: &[String],
        args: &[String],
        env: &[(String, String)],
    ) -> Result<Vec<BuildProgressEvent>>;

    fn run_tests(&self, target_selectors: &[TargetSelector]) -> Result<Vec<BuildProgressEvent>>;
}

/// Returns the filesystem path of the Gradle init script that applies the
/// probe logic (§6.1). `ModelProbe` (`crate::probe`) owns actually writing
/// this file; this trait is the narrow seam another component could
/// substitute — e.g. a test double that serves a fixed fixture script, or
/// an alternate injection mechanism for a different build tool front-end.
pub trait PluginInjector: Send + Sync {
    fn init_script_path(&self) -> Result<PathBuf>;
}

/// The default [`PluginInjector`]: writes `crate::probe`'s init script to a
/// uniquely-named temp file, matching [`crate::probe::write_init_script`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPluginInjector;

impl PluginInjector for DefaultPluginInjector {
    fn init_script_path(&self) -> Result<PathBuf> {
        Ok(crate::probe::write_init_script()?)
    }
}

/// Bounds a single probe/build invocation from [`crate::config::GradleConfig`].
pub fn probe_timeout_or_default(configured: Option<Duration>) -> Duration {
    configured.unwrap_or(Duration::from_secs(15 * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plugin_injector_writes_a_script_file() {
        let injector = DefaultPluginInjector;
        let path = injector.init_script_path().unwrap();
        assert!(path.is_file());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn probe_timeout_falls_back_to_fifteen_minutes() {
        assert_eq!(
            probe_timeout_or_default(None),
            Duration::from_secs(15 * 60)
        );
        assert_eq!(
            probe_timeout_or_default(Some(Duration::from_secs(5))),
            Duration::from_secs(5)
        );
    }
}

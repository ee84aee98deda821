//! Archive expansion probing (§9, "classpath expansion"; §13).
//!
//! The probe's `archiveOutputFiles` report (§4.1) comes straight from
//! Gradle's own task model and is trusted as configuration, not as a claim
//! about what is currently on disk — the jar task may simply not have run
//! yet. But if the archive *does* exist and isn't a readable zip, trusting
//! its reported class-dir expansion would hand editors a phantom classpath
//! entry once the real substitution (§4.3) drops the original jar path.
//! This module is the guard: open the archive the same defensive way
//! `nova_build::jpms` opens a jar to look for `module-info.class`, and
//! report whether it is trustworthy.

use std::fs::File;
use std::path::Path;

/// `true` if `path` does not exist yet (the reported archive is still
/// configuration, not yet built) or opens as a valid zip archive. `false`
/// only when the file exists but fails to parse as a zip — a corrupt or
/// truncated archive whose reported expansion should not be trusted.
pub fn archive_output_is_trustworthy(path: &Path) -> bool {
    match File::open(path) {
        Ok(file) => zip::ZipArchive::new(file).is_ok(),
        Err(_) => true,
    }
}

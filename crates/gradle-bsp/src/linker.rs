//! `DependencyLinker` (§4.3): a pure post-pass over the flat model list that
//! resolves inter-project dependency edges and rewrites archive classpath
//! entries into their class-dir expansion.
//!
//! Indexes every model's output directories and archive paths once, then
//! walks each model's classpath against that index to both rewrite archive
//! entries into their class-dir expansion and record the resulting
//! inter-project dependency edges.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use gradle_bsp_model::{SourceSetIdentity, SourceSetModel};

/// Rewrite every model's `compile_classpath` and `build_target_dependencies`
/// in place against the full sibling set. No I/O, no interior mutability.
pub fn link(mut models: Vec<SourceSetModel>) -> Vec<SourceSetModel> {
    let outputs = build_output_index(&models);
    let archive_expansion = build_archive_expansion_index(&models);

    for model in &mut models {
        let own_identity = model.identity();
        let mut new_classpath = Vec::with_capacity(model.compile_classpath.len());
        let mut dependencies = std::collections::BTreeSet::new();

        for entry in std::mem::take(&mut model.compile_classpath) {
            let normalized = normalize_path(&entry);
            if let Some(owner) = outputs.get(&normalized) {
                if *owner != own_identity {
                    dependencies.insert(owner.clone());
                }
            }
            match archive_expansion.get(&normalized) {
                Some(expansion) if !expansion.is_empty() => {
                    new_classpath.extend(expansion.iter().cloned());
                }
                _ => new_classpath.push(entry),
            }
        }

        model.compile_classpath = new_classpath;
        model.build_target_dependencies = dependencies;
    }

    models
}

/// `outputs[file] -> owning model identity`, from every model's
/// `source_output_dirs ∪ resource_output_dirs` and every archive key, keyed
/// by normalized path so differing-but-equivalent spellings of the same
/// directory (`.../build/./classes` vs `.../build/classes`) still match.
fn build_output_index(models: &[SourceSetModel]) -> HashMap<PathBuf, SourceSetIdentity> {
    let mut index = HashMap::new();
    for model in models {
        let identity = model.identity();
        for dir in model.source_output_dirs.iter().chain(&model.resource_output_dirs) {
            index.insert(normalize_path(dir), identity.clone());
        }
        for archive in &model.archive_output_files {
            index.insert(normalize_path(&archive.archive_path), identity.clone());
        }
    }
    index
}

/// `archive_expansion[archive_path] -> class dirs it bundles`, keyed by
/// normalized archive path (see [`build_output_index`]).
fn build_archive_expansion_index(models: &[SourceSetModel]) -> HashMap<PathBuf, Vec<PathBuf>> {
    let mut index = HashMap::new();
    for model in models {
        for archive in &model.archive_output_files {
            index.insert(normalize_path(&archive.archive_path), archive.class_dirs.clone());
        }
    }
    index
}

/// Lexically normalizes a path for equality comparison: drops `.` components
/// and resolves `..` components without touching the filesystem, so
/// `a/b/../c` and `a/c` index identically. Never pops past the root/prefix.
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

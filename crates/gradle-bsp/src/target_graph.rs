//! `TargetGraph` (§4.4): the single shared mutable state of the adapter.
//!
//! Holds the current snapshot behind `RwLock<Arc<Snapshot>>` so readers
//! (BSP request handlers) clone an `Arc` under a read lock and release it
//! immediately, while a writer builds the next `Snapshot` off to the side
//! and only takes the write lock for the pointer swap (§9, "Target-graph
//! publish"). A plain `Mutex` would serialize `get_all`/`get_by_*` against
//! each other even though they never mutate anything; the `RwLock` lets
//! concurrent reads proceed uncontended.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use gradle_bsp_model::{
    BuildTarget, BuildTargetCapabilities, BuildTargetData, BuildTargetIdentifier, BuildTargetTag,
    JvmBuildTargetData, LanguageExtension, LanguageId, SourceSetModel,
};

use crate::error::{GradleBspError, Result};
use crate::uri::{build_target_uri, path_to_file_uri};

/// One probed model paired with its derived BSP-facing [`BuildTarget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradleBuildTarget {
    pub model: SourceSetModel,
    pub target: BuildTarget,
}

#[derive(Debug, Default)]
struct Snapshot {
    /// Discovery order preserved (§5, "Ordering guarantees").
    ordered: Vec<GradleBuildTarget>,
    by_uri: BTreeMap<String, usize>,
    by_project_and_source_set: BTreeMap<(String, String), usize>,
}

impl Snapshot {
    fn build(models: Vec<SourceSetModel>) -> Result<Self> {
        let mut ordered = Vec::with_capacity(models.len());
        let mut by_uri = BTreeMap::new();
        let mut by_project_and_source_set = BTreeMap::new();

        for model in models {
            let target = build_target_from_model(&model)?;
            let index = ordered.len();
            by_uri.insert(target.id.uri.clone(), index);
            by_project_and_source_set.insert(
                (model.project_path.clone(), model.source_set_name.clone()),
                index,
            );
            ordered.push(GradleBuildTarget { model, target });
        }

        Ok(Self {
            ordered,
            by_uri,
            by_project_and_source_set,
        })
    }
}

/// Holds the current snapshot of probed+linked models as BSP build targets.
/// `store` replaces the prior snapshot wholesale; there is no partial-update
/// path (§3, "Lifecycle").
#[derive(Debug)]
pub struct TargetGraph {
    snapshot: RwLock<Arc<Snapshot>>,
}

impl Default for TargetGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetGraph {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
        }
    }

    /// Atomically replace the current snapshot with one built from `models`
    /// (already linked). Returns the new target list on success; on error
    /// (`ModelDeserializationFailed`) the previous snapshot is retained.
    pub fn store(&self, models: Vec<SourceSetModel>) -> Result<Vec<BuildTarget>> {
        let snapshot = Arc::new(Snapshot::build(models)?);
        let targets = snapshot.ordered.iter().map(|g| g.target.clone()).collect();
        *self
            .snapshot
            .write()
            .expect("target graph lock poisoned")
            = snapshot;
        Ok(targets)
    }

    /// All target/model pairs in the current snapshot, in discovery order.
    pub fn get_all(&self) -> Vec<GradleBuildTarget> {
        let snapshot = self.snapshot.read().expect("target graph lock poisoned");
        snapshot.ordered.clone()
    }

    pub fn get_by_uri(&self, uri: &str) -> Result<GradleBuildTarget> {
        let snapshot = self.snapshot.read().expect("target graph lock poisoned");
        snapshot
            .by_uri
            .get(uri)
            .map(|&i| snapshot.ordered[i].clone())
            .ok_or_else(|| {
                GradleBspError::TargetNotFound(BuildTargetIdentifier::new(uri.to_string()))
            })
    }

    pub fn get_by_project_and_source_set(
        &self,
        project_path: &str,
        source_set_name: &str,
    ) -> Result<GradleBuildTarget> {
        let snapshot = self.snapshot.read().expect("target graph lock poisoned");
        snapshot
            .by_project_and_source_set
            .get(&(project_path.to_string(), source_set_name.to_string()))
            .map(|&i| snapshot.ordered[i].clone())
            .ok_or_else(|| {
                GradleBspError::TargetNotFound(BuildTargetIdentifier::new(format!(
                    "{project_path}?sourceset={source_set_name}"
                )))
            })
    }
}

const TEST_SOURCE_SET_NAMES: &[&str] = &["test", "androidtest", "unittest"];

fn looks_like_test_source_set(source_set_name: &str) -> bool {
    let lower = source_set_name.to_ascii_lowercase();
    TEST_SOURCE_SET_NAMES.contains(&lower.as_str())
        || lower.ends_with("unittest")
        || lower.ends_with("androidtest")
}

fn build_target_from_model(model: &SourceSetModel) -> Result<BuildTarget> {
    let id = build_target_uri(&model.project_dir, &model.source_set_name)?;
    let base_directory = Some(path_to_file_uri(&model.project_dir)?);

    let mut tags = Vec::new();
    if model.has_tests || looks_like_test_source_set(&model.source_set_name) {
        tags.push(BuildTargetTag::Test);
    }
    let is_test_like = tags.contains(&BuildTargetTag::Test);
    if !is_test_like && !model.source_dirs.is_empty() {
        tags.push(BuildTargetTag::Library);
    }

    let language_ids: Vec<LanguageId> = model
        .extensions
        .keys()
        .filter_map(|name| LanguageId::from_language_name(name))
        .collect();

    let dependencies = model
        .build_target_dependencies
        .iter()
        .map(|dep| build_target_uri(&dep.project_dir, &dep.source_set_name))
        .collect::<Result<Vec<_>>>()?;

    let capabilities = BuildTargetCapabilities {
        can_compile: model.classes_task_name.is_some(),
        can_test: model.has_tests,
        // No application-plugin marker is threaded through the model
        // (DESIGN.md); `can_run` stays conservative until one is.
        can_run: false,
    };

    let data = select_language_extension(model).map(|ext| match ext {
        LanguageExtension::Java(java) => BuildTargetData::Jvm(JvmBuildTargetData {
            java_home: None,
            java_version: java.java_version.map(|v| v.to_string()),
            gradle_version: model.gradle_version.clone(),
            source_compatibility: java.source_compatibility.clone(),
            target_compatibility: java.target_compatibility.clone(),
        }),
        // Scala/Kotlin/Groovy carry no per-language extension data today;
        // they still surface as the `jvm` data kind they compile to.
        LanguageExtension::Kotlin | LanguageExtension::Scala | LanguageExtension::Groovy => {
            BuildTargetData::Jvm(JvmBuildTargetData {
                gradle_version: model.gradle_version.clone(),
                ..Default::default()
            })
        }
    });

    Ok(BuildTarget {
        id,
        display_name: Some(model.display_name.clone()),
        base_directory,
        tags,
        language_ids,
        dependencies,
        capabilities,
        data,
    })
}

/// Multi-language precedence (§9, decided): Scala > Kotlin > Java.
fn select_language_extension(model: &SourceSetModel) -> Option<&LanguageExtension> {
    for name in ["scala", "kotlin", "java"] {
        if let Some(ext) = model.extensions.get(name) {
            return Some(ext);
        }
    }
    model.extensions.values().next()
}

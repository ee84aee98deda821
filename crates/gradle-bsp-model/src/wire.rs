//! The JSON schema the probe's injected init script emits on stdout.
//!
//! Every optional field carries `#[serde(default)]` so a field the probe
//! omitted deserializes to an empty collection rather than requiring
//! downstream code to distinguish "absent" from "empty" (§9, "Serializable
//! models").

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireModuleDependency {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    /// `classifier -> file URI`. `"default"` key (or an absent classifier
    /// key entirely) denotes the unclassified artifact.
    #[serde(default)]
    pub classifiers: std::collections::BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireArchiveOutput {
    pub archive_path: String,
    #[serde(default)]
    pub class_dirs: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireJavaExtension {
    #[serde(default)]
    pub java_version: Option<String>,
    #[serde(default)]
    pub source_compatibility: Option<String>,
    #[serde(default)]
    pub target_compatibility: Option<String>,
    #[serde(default)]
    pub compiler_args: Vec<String>,
}

/// One project/source-set/variant record as emitted by the probe's
/// `printBspSourceSetModels` task. See `gradle-bsp::probe` for the init
/// script that produces this JSON and the normalization that turns it into
/// an owned [`crate::SourceSetModel`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSourceSetModel {
    pub project_name: String,
    pub project_path: String,
    pub project_dir: String,
    pub root_dir: String,
    pub source_set_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub gradle_version: String,

    #[serde(default)]
    pub android_plugin_kind: Option<String>,

    #[serde(default)]
    pub classes_task_name: Option<String>,
    #[serde(default)]
    pub clean_task_name: Option<String>,
    #[serde(default)]
    pub task_names: Vec<String>,

    #[serde(default)]
    pub source_dirs: Vec<String>,
    #[serde(default)]
    pub generated_source_dirs: Vec<String>,
    #[serde(default)]
    pub resource_dirs: Vec<String>,
    #[serde(default)]
    pub source_output_dirs: Vec<String>,
    #[serde(default)]
    pub resource_output_dirs: Vec<String>,

    #[serde(default)]
    pub archive_output_files: Vec<WireArchiveOutput>,

    #[serde(default)]
    pub compile_classpath: Vec<String>,

    #[serde(default)]
    pub module_dependencies: Vec<WireModuleDependency>,

    #[serde(default)]
    pub has_tests: bool,

    #[serde(default)]
    pub java_extension: Option<WireJavaExtension>,
    #[serde(default)]
    pub has_kotlin: bool,
    #[serde(default)]
    pub has_scala: bool,
    #[serde(default)]
    pub has_groovy: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireProjectListing {
    pub path: String,
    pub dir: String,
}

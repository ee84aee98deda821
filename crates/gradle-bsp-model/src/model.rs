use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::JavaVersion;

/// The `(projectDir, sourceSetName)` pair that uniquely identifies one
/// [`SourceSetModel`] within an aggregation. This is the pre-URI identity
/// the linker and target graph key everything off of.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceSetIdentity {
    pub project_dir: PathBuf,
    pub source_set_name: String,
}

impl SourceSetIdentity {
    pub fn new(project_dir: impl Into<PathBuf>, source_set_name: impl Into<String>) -> Self {
        Self {
            project_dir: project_dir.into(),
            source_set_name: source_set_name.into(),
        }
    }
}

/// Which Android plugin-kind produced a variant-backed source set, if any.
/// Non-Android source sets carry [`AndroidVariantKind::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AndroidVariantKind {
    None,
    Application,
    Library,
    DynamicFeature,
    Feature,
    Test,
}

/// One classified classifier artifact (main/sources/javadoc/...) belonging to
/// a resolved module dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleClassifier {
    /// `None` denotes the default (unclassified) artifact.
    pub classifier: Option<String>,
    pub file_uri: String,
}

/// An external (non-project) dependency resolved on a source set's compile
/// classpath.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDependency {
    pub group: String,
    pub name: String,
    pub version: String,
    pub classifiers: Vec<ModuleClassifier>,
}

/// Java-specific language extension data (§4.1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaExtension {
    pub java_version: Option<JavaVersion>,
    pub source_compatibility: Option<String>,
    pub target_compatibility: Option<String>,
    pub compiler_args: Vec<String>,
}

/// A language-specific enrichment record attached to a [`SourceSetModel`].
/// Only Java is modeled in depth today; Scala/Kotlin/Groovy presence is
/// tracked so `dataKind` precedence (§9) and `languageIds` (§4.4) can be
/// computed without a dedicated record for each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageExtension {
    Java(JavaExtension),
    Kotlin,
    Scala,
    Groovy,
}

impl LanguageExtension {
    pub fn language_name(&self) -> &'static str {
        match self {
            LanguageExtension::Java(_) => "java",
            LanguageExtension::Kotlin => "kotlin",
            LanguageExtension::Scala => "scala",
            LanguageExtension::Groovy => "groovy",
        }
    }
}

/// One archive (jar/war) produced from this source set's outputs, mapped to
/// the class directories it bundles. Used by [`crate::BuildTarget`]-adjacent
/// linking to let editors see unpacked class trees instead of archive
/// contents (§4.3, "classpath expansion").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveOutput {
    pub archive_path: PathBuf,
    pub class_dirs: Vec<PathBuf>,
}

/// One per (project, source-set-or-Android-variant) (§3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSetModel {
    // Identity
    pub project_name: String,
    pub project_path: String,
    pub project_dir: PathBuf,
    pub root_dir: PathBuf,
    pub source_set_name: String,
    pub display_name: String,
    pub gradle_version: String,
    pub android_variant_kind: AndroidVariantKind,

    // Tasks
    pub classes_task_name: Option<String>,
    pub clean_task_name: Option<String>,
    pub task_names: BTreeSet<String>,

    // Directories
    pub source_dirs: BTreeSet<PathBuf>,
    pub generated_source_dirs: BTreeSet<PathBuf>,
    pub resource_dirs: BTreeSet<PathBuf>,
    pub source_output_dirs: BTreeSet<PathBuf>,
    pub resource_output_dirs: BTreeSet<PathBuf>,

    // Outputs
    pub archive_output_files: Vec<ArchiveOutput>,

    // Classpath (ordered; order is semantically meaningful, see §4.3)
    pub compile_classpath: Vec<PathBuf>,

    // Dependencies
    pub module_dependencies: Vec<ModuleDependency>,
    pub build_target_dependencies: BTreeSet<SourceSetIdentity>,

    // Capabilities
    pub has_tests: bool,
    pub extensions: BTreeMap<String, LanguageExtension>,
}

impl SourceSetModel {
    pub fn identity(&self) -> SourceSetIdentity {
        SourceSetIdentity::new(self.project_dir.clone(), self.source_set_name.clone())
    }

    /// Find an archive's expansion by the exact archive path, used by the
    /// linker's `archiveExpansion` index (§4.3).
    pub fn archive_expansion(&self, archive_path: &std::path::Path) -> Option<&[PathBuf]> {
        self.archive_output_files
            .iter()
            .find(|a| a.archive_path == archive_path)
            .map(|a| a.class_dirs.as_slice())
    }

    /// True iff `path` is one of this model's own output directories
    /// (source or resource). Used to suppress self-dependencies when an
    /// archive built from a model's own outputs shows up on its own
    /// classpath (§4.3 edge case).
    pub fn owns_output(&self, path: &std::path::Path) -> bool {
        self.source_output_dirs.contains(path) || self.resource_output_dirs.contains(path)
    }

    /// Java extension, if this model has one. Most non-Android, non-polyglot
    /// modules have exactly this.
    pub fn java_extension(&self) -> Option<&JavaExtension> {
        self.extensions.get("java").and_then(|ext| match ext {
            LanguageExtension::Java(java) => Some(java),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_model(project_dir: &str, source_set_name: &str) -> SourceSetModel {
        SourceSetModel {
            project_name: "demo".into(),
            project_path: ":demo".into(),
            project_dir: PathBuf::from(project_dir),
            root_dir: PathBuf::from("/ws"),
            source_set_name: source_set_name.into(),
            display_name: format!("demo [{source_set_name}]"),
            gradle_version: "8.5".into(),
            android_variant_kind: AndroidVariantKind::None,
            classes_task_name: None,
            clean_task_name: None,
            task_names: BTreeSet::new(),
            source_dirs: BTreeSet::new(),
            generated_source_dirs: BTreeSet::new(),
            resource_dirs: BTreeSet::new(),
            source_output_dirs: BTreeSet::new(),
            resource_output_dirs: BTreeSet::new(),
            archive_output_files: Vec::new(),
            compile_classpath: Vec::new(),
            module_dependencies: Vec::new(),
            build_target_dependencies: BTreeSet::new(),
            has_tests: false,
            extensions: BTreeMap::new(),
        }
    }

    #[test]
    fn identity_round_trips_project_dir_and_source_set() {
        let model = empty_model("/ws/demo", "main");
        let identity = model.identity();
        assert_eq!(identity.project_dir, PathBuf::from("/ws/demo"));
        assert_eq!(identity.source_set_name, "main");
    }

    #[test]
    fn archive_expansion_looks_up_by_exact_path() {
        let mut model = empty_model("/ws/demo", "main");
        model.archive_output_files.push(ArchiveOutput {
            archive_path: PathBuf::from("/ws/demo/build/libs/demo.jar"),
            class_dirs: vec![PathBuf::from("/ws/demo/build/classes/java/main")],
        });
        assert_eq!(
            model.archive_expansion(std::path::Path::new("/ws/demo/build/libs/demo.jar")),
            Some(&[PathBuf::from("/ws/demo/build/classes/java/main")][..])
        );
        assert_eq!(
            model.archive_expansion(std::path::Path::new("/ws/other.jar")),
            None
        );
    }

    #[test]
    fn owns_output_checks_both_source_and_resource_sets() {
        let mut model = empty_model("/ws/demo", "main");
        model
            .source_output_dirs
            .insert(PathBuf::from("/ws/demo/build/classes/java/main"));
        model
            .resource_output_dirs
            .insert(PathBuf::from("/ws/demo/build/resources/main"));
        assert!(model.owns_output(std::path::Path::new("/ws/demo/build/classes/java/main")));
        assert!(model.owns_output(std::path::Path::new("/ws/demo/build/resources/main")));
        assert!(!model.owns_output(std::path::Path::new("/ws/other")));
    }
}

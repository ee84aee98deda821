use serde::{Deserialize, Serialize};

/// A build target's unique identifier: a `file://` project-dir URI with a
/// `sourceset` query parameter (§6.2). This is the only serialized form;
/// construction/parsing lives in `gradle-bsp::uri`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildTargetIdentifier {
    pub uri: String,
}

impl BuildTargetIdentifier {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTargetTag {
    Library,
    Test,
    Application,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    Java,
    Scala,
    Kotlin,
    Groovy,
}

impl LanguageId {
    pub fn from_language_name(name: &str) -> Option<Self> {
        match name {
            "java" => Some(LanguageId::Java),
            "scala" => Some(LanguageId::Scala),
            "kotlin" => Some(LanguageId::Kotlin),
            "groovy" => Some(LanguageId::Groovy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTargetCapabilities {
    #[serde(default)]
    pub can_compile: bool,
    #[serde(default)]
    pub can_test: bool,
    #[serde(default)]
    pub can_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Jvm,
}

/// Extended JVM build-target payload. Carries the standard BSP `jvm` fields
/// (`javaHome`, `javaVersion`) plus the Gradle-specific superset named in
/// §6.3 (`gradleVersion`, `sourceCompatibility`, `targetCompatibility`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JvmBuildTargetData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java_home: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java_version: Option<String>,
    pub gradle_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_compatibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_compatibility: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "dataKind", content = "data", rename_all = "lowercase")]
pub enum BuildTargetData {
    Jvm(JvmBuildTargetData),
}

/// BSP's abstraction of one compilable/testable/runnable unit (§2, §6.3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTarget {
    pub id: BuildTargetIdentifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_directory: Option<String>,
    pub tags: Vec<BuildTargetTag>,
    pub language_ids: Vec<LanguageId>,
    pub dependencies: Vec<BuildTargetIdentifier>,
    pub capabilities: BuildTargetCapabilities,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub data: Option<BuildTargetData>,
}

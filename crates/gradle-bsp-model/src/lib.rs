//! Shared, process-free data types for the Gradle build-target graph.
//!
//! This crate holds the wire schema the probe's JSON crosses into Rust with
//! (`wire`), the owned [`SourceSetModel`] record the rest of the pipeline
//! operates on (`model`), and the BSP-facing [`BuildTarget`] shape
//! (`build_target`). Nothing here spawns a process or touches the
//! filesystem beyond `Path`/`PathBuf` values.

mod build_target;
mod java_version;
mod model;
mod wire;

pub use build_target::{
    BuildTarget, BuildTargetCapabilities, BuildTargetData, BuildTargetIdentifier, BuildTargetTag,
    DataKind, JvmBuildTargetData, LanguageId,
};
pub use java_version::JavaVersion;
pub use model::{
    AndroidVariantKind, ArchiveOutput, JavaExtension, LanguageExtension, ModuleClassifier,
    ModuleDependency, SourceSetIdentity, SourceSetModel,
};
pub use wire::{
    WireArchiveOutput, WireJavaExtension, WireModuleDependency, WireProjectListing,
    WireSourceSetModel,
};

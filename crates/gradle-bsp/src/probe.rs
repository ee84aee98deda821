//! `ModelProbe` (§4.1): the Gradle-side extractor and the Rust-side
//! normalization of its JSON output into owned [`SourceSetModel`] records.
//!
//! The probe itself runs as a task registered by an injected Gradle init
//! script, standing in for direct in-process access to a live `Project`
//! (§9). The init script wraps its JSON output in sentinel markers on
//! stdout; this module locates that block and deserializes it via
//! `gradle-bsp-model`'s wire types.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use gradle_bsp_model::{
    AndroidVariantKind, ArchiveOutput, JavaExtension, JavaVersion, LanguageExtension,
    ModuleClassifier, ModuleDependency, SourceSetIdentity, SourceSetModel, WireProjectListing,
    WireSourceSetModel,
};

use crate::command::CommandRunner;
use crate::error::{GradleBspError, Result};

pub const BSP_JSON_BEGIN: &str = "BSP_GRADLE_JSON_BEGIN";
pub const BSP_JSON_END: &str = "BSP_GRADLE_JSON_END";
pub const BSP_PROJECTS_BEGIN: &str = "BSP_GRADLE_PROJECTS_BEGIN";
pub const BSP_PROJECTS_END: &str = "BSP_GRADLE_PROJECTS_END";

const PROBE_TASK: &str = "printBspSourceSetModels";
const PROJECTS_TASK: &str = "printBspProjects";
const MIN_GRADLE_MAJOR: u32 = 2;

/// Write the probe's init script to a uniquely-named temp file and return
/// its path. The caller is responsible for deleting it after use.
pub fn write_init_script() -> std::io::Result<PathBuf> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let path = std::env::temp_dir().join(format!("bsp_gradle_probe_init_{nanos}.gradle"));
    std::fs::write(&path, INIT_SCRIPT)?;
    Ok(path)
}

/// Run the per-project probe task and return the normalized models it
/// produced. `project_path` is `None` for the root project.
pub fn probe_project(
    runner: &dyn CommandRunner,
    gradle_program: &Path,
    build_root: &Path,
    project_path: Option<&str>,
) -> Result<Vec<SourceSetModel>> {
    let init_script = write_init_script()?;
    let result = (|| {
        let mut args = vec![
            "--init-script".to_string(),
            init_script.to_string_lossy().into_owned(),
            "--no-daemon".to_string(),
            "--console=plain".to_string(),
            "-q".to_string(),
        ];
        if let Some(path) = project_path.filter(|p| !p.is_empty()) {
            args.push("-Pbsp.projectPath".to_string());
            args.push(format!("{path}"));
        }
        args.push(PROBE_TASK.to_string());

        let output = runner.run(build_root, gradle_program, &args)?;
        if !output.status.success() {
            return Err(GradleBspError::probe_failure(
                project_path.unwrap_or(":"),
                output.combined(),
            ));
        }
        let wire_models = extract_sentinel_json::<Vec<WireSourceSetModel>>(
            &output.combined(),
            BSP_JSON_BEGIN,
            BSP_JSON_END,
        )?
        .unwrap_or_default();

        wire_models
            .into_iter()
            .map(normalize_wire_model)
            .collect::<Result<Vec<_>>>()
    })();

    let _ = std::fs::remove_file(&init_script);
    result
}

/// Run the root-only project-listing task (used by the aggregator to
/// enumerate `BasicGradleProject`s within one build, §4.2 point 3).
pub fn list_projects(
    runner: &dyn CommandRunner,
    gradle_program: &Path,
    build_root: &Path,
) -> Result<Vec<WireProjectListing>> {
    let init_script = write_init_script()?;
    let result = (|| {
        let args = vec![
            "--init-script".to_string(),
            init_script.to_string_lossy().into_owned(),
            "--no-daemon".to_string(),
            "--console=plain".to_string(),
            "-q".to_string(),
            PROJECTS_TASK.to_string(),
        ];
        let output = runner.run(build_root, gradle_program, &args)?;
        if !output.status.success() {
            return Err(GradleBspError::probe_failure(":", output.combined()));
        }
        Ok(extract_sentinel_json::<Vec<WireProjectListing>>(
            &output.combined(),
            BSP_PROJECTS_BEGIN,
            BSP_PROJECTS_END,
        )?
        .unwrap_or_default())
    })();

    let _ = std::fs::remove_file(&init_script);
    result
}

/// Locate a `BEGIN`/`END`-delimited JSON block inside noisy Gradle console
/// output and deserialize it. Returns `Ok(None)` if the markers are absent
/// (e.g. the task produced no output for an empty project).
fn extract_sentinel_json<T: serde::de::DeserializeOwned>(
    combined_output: &str,
    begin: &str,
    end: &str,
) -> Result<Option<T>> {
    let Some(begin_idx) = combined_output.find(begin) else {
        return Ok(None);
    };
    let after_begin = begin_idx + begin.len();
    let Some(end_idx) = combined_output[after_begin..].find(end) else {
        return Ok(None);
    };
    let payload = combined_output[after_begin..after_begin + end_idx].trim();
    if payload.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(payload)?))
}

/// Verifies the probed Gradle version clears the minimum this crate
/// supports (§7 `GradleVersionUnsupported`).
pub fn check_gradle_version_supported(gradle_version: &str) -> Result<()> {
    let major = gradle_version
        .split('.')
        .next()
        .and_then(|s| s.parse::<u32>().ok());
    match major {
        Some(major) if major >= MIN_GRADLE_MAJOR => Ok(()),
        _ => Err(GradleBspError::GradleVersionUnsupported {
            found: gradle_version.to_string(),
            minimum: format!("{MIN_GRADLE_MAJOR}.0"),
        }),
    }
}

/// Convert one wire record into an owned [`SourceSetModel`], treating every
/// absent optional field as empty (never as an error) per §9.
fn normalize_wire_model(wire: WireSourceSetModel) -> Result<SourceSetModel> {
    check_gradle_version_supported(&wire.gradle_version)?;

    if wire.project_dir.is_empty() || wire.source_set_name.is_empty() {
        return Err(GradleBspError::ModelDeserializationFailed(format!(
            "project {} is missing a mandatory identity field (projectDir/sourceSetName)",
            wire.project_path
        )));
    }

    let project_dir = PathBuf::from(&wire.project_dir);
    let root_dir = PathBuf::from(&wire.root_dir);
    let display_name = wire
        .display_name
        .unwrap_or_else(|| format!("{} [{}]", wire.project_name, wire.source_set_name));

    let android_variant_kind = match wire.android_plugin_kind.as_deref() {
        None => AndroidVariantKind::None,
        Some("application") => AndroidVariantKind::Application,
        Some("library") => AndroidVariantKind::Library,
        Some("dynamic-feature") => AndroidVariantKind::DynamicFeature,
        Some("feature") => AndroidVariantKind::Feature,
        Some("test") => AndroidVariantKind::Test,
        Some(_) => AndroidVariantKind::None,
    };

    let mut extensions = BTreeMap::new();
    if let Some(java) = wire.java_extension {
        extensions.insert(
            "java".to_string(),
            LanguageExtension::Java(JavaExtension {
                java_version: java.java_version.as_deref().and_then(JavaVersion::parse),
                source_compatibility: java.source_compatibility,
                target_compatibility: java.target_compatibility,
                compiler_args: java.compiler_args,
            }),
        );
    }
    if wire.has_kotlin {
        extensions.insert("kotlin".to_string(), LanguageExtension::Kotlin);
    }
    if wire.has_scala {
        extensions.insert("scala".to_string(), LanguageExtension::Scala);
    }
    if wire.has_groovy {
        extensions.insert("groovy".to_string(), LanguageExtension::Groovy);
    }

    let module_dependencies = wire
        .module_dependencies
        .into_iter()
        .map(|dep| ModuleDependency {
            group: dep.group,
            name: dep.name,
            version: dep.version,
            classifiers: dep
                .classifiers
                .into_iter()
                .map(|(classifier, file_uri)| ModuleClassifier {
                    classifier: if classifier.is_empty() || classifier == "default" {
                        None
                    } else {
                        Some(classifier)
                    },
                    file_uri,
                })
                .collect(),
        })
        .collect();

    // An archive that exists on disk but fails to parse as a zip is not
    // trusted as a class-dir expansion source (§9, "classpath expansion");
    // it is dropped here so the linker never substitutes a phantom
    // expansion for a corrupt archive (archive that simply hasn't been
    // built yet is trusted as reported).
    let archive_output_files = wire
        .archive_output_files
        .into_iter()
        .map(|a| ArchiveOutput {
            archive_path: PathBuf::from(a.archive_path),
            class_dirs: a.class_dirs.into_iter().map(PathBuf::from).collect(),
        })
        .filter(|a| crate::archive::archive_output_is_trustworthy(&a.archive_path))
        .collect();

    Ok(SourceSetModel {
        project_name: wire.project_name,
        project_path: wire.project_path,
        project_dir,
        root_dir,
        source_set_name: wire.source_set_name,
        display_name,
        gradle_version: wire.gradle_version,
        android_variant_kind,
        classes_task_name: wire.classes_task_name,
        clean_task_name: wire.clean_task_name,
        task_names: wire.task_names.into_iter().collect::<BTreeSet<_>>(),
        source_dirs: wire.source_dirs.into_iter().map(PathBuf::from).collect(),
        generated_source_dirs: wire
            .generated_source_dirs
            .into_iter()
            .map(PathBuf::from)
            .collect(),
        resource_dirs: wire.resource_dirs.into_iter().map(PathBuf::from).collect(),
        source_output_dirs: wire
            .source_output_dirs
            .into_iter()
            .map(PathBuf::from)
            .collect(),
        resource_output_dirs: wire
            .resource_output_dirs
            .into_iter()
            .map(PathBuf::from)
            .collect(),
        archive_output_files,
        compile_classpath: wire.compile_classpath.into_iter().map(PathBuf::from).collect(),
        module_dependencies,
        build_target_dependencies: BTreeSet::<SourceSetIdentity>::new(),
        has_tests: wire.has_tests,
        extensions,
    })
}

/// The Gradle init script the probe injects. All member lookups are
/// guarded (`try { ... } catch (Throwable ignored) {}`) so a missing
/// accessor on an unexpected Gradle/AGP version degrades that one field to
/// absent rather than failing the whole probe (§4.1, "guarded reflection").
const INIT_SCRIPT: &str = r#"
import groovy.json.JsonOutput
import org.gradle.jvm.JvmLibrary
import org.gradle.language.base.artifact.SourcesArtifact
import org.gradle.language.java.artifact.JavadocArtifact
import org.gradle.api.artifacts.component.ModuleComponentIdentifier

def guarded = { cl ->
    try { return cl() } catch (Throwable ignored) { return null }
}

// Resolved artifacts for `config`, keyed by "group:name:version", with a
// best-effort sources/javadoc classifier lookup layered on top (§4.1
// "module_dependencies"). A config that fails to resolve yields [].
def resolveModuleDependencies = { proj, config ->
    if (config == null) return []
    def byCoord = [:]
    guarded {
        config.resolvedConfiguration.lenientConfiguration.artifacts.each { artifact ->
            def id = artifact.moduleVersion.id
            def key = "${id.group}:${id.name}:${id.version}"
            def entry = byCoord[key]
            if (entry == null) {
                entry = [group: id.group, name: id.name, version: id.version, classifiers: [:]]
                byCoord[key] = entry
            }
            def classifier = artifact.classifier ?: 'default'
            entry.classifiers[classifier] = artifact.file.toURI().toString()
        }
    }
    guarded {
        def componentIds = config.incoming.resolutionResult.allDependencies
            .findAll { it.hasProperty('selected') }
            .collect { it.selected.id }
        def result = proj.dependencies.createArtifactResolutionQuery()
            .forComponents(componentIds)
            .withArtifacts(JvmLibrary, SourcesArtifact, JavadocArtifact)
            .execute()
        result.resolvedComponents.each { component ->
            def id = component.id
            if (!(id instanceof ModuleComponentIdentifier)) return
            def key = "${id.group}:${id.module}:${id.version}"
            def entry = byCoord[key]
            if (entry == null) return
            component.getArtifacts(SourcesArtifact).each { sa ->
                guarded { entry.classifiers['sources'] = sa.file.toURI().toString() }
            }
            component.getArtifacts(JavadocArtifact).each { ja ->
                guarded { entry.classifiers['javadoc'] = ja.file.toURI().toString() }
            }
        }
    }
    return byCoord.values().toList()
}

// Jar/War-style archive tasks whose inputs bundle this source set's class
// or resource output directories, mapped to the class dirs they bundle
// (§4.1 "archive_output_files", §4.3 class-dir expansion).
def archiveOutputsForOutput = { proj, outputDirs ->
    def outputFiles = outputDirs as Set
    guarded {
        proj.tasks.withType(org.gradle.jvm.tasks.Jar).findAll { jarTask ->
            def inputFiles = jarTask.inputs.files.files
            outputFiles.any { inputFiles.contains(it) }
        }.collect { jarTask ->
            def archiveFile = guarded { jarTask.archiveFile.get().asFile } ?: jarTask.archivePath
            [archivePath: archiveFile.absolutePath, classDirs: outputDirs.collect { it.absolutePath }]
        }
    } ?: []
}

// Files a compile task produces that are not already covered by a
// declared source dir, by path-prefix containment (§4.1
// "generated_source_dirs").
def generatedSourceDirsFor = { compileTask, declaredDirs ->
    if (compileTask == null) return []
    guarded {
        def roots = new LinkedHashSet()
        compileTask.source.files.each { f ->
            def covered = declaredDirs.any { d -> f.absolutePath.startsWith(d.absolutePath + File.separator) }
            if (!covered) {
                roots << f.parentFile.absolutePath
            }
        }
        roots.toList()
    } ?: []
}

def sourceSetModel = { proj, sourceSetName, body ->
    def model = [
        projectName: proj.name,
        projectPath: proj.path,
        projectDir: proj.projectDir.absolutePath,
        rootDir: proj.rootProject.projectDir.absolutePath,
        sourceSetName: sourceSetName,
        gradleVersion: proj.gradle.gradleVersion,
    ]
    body(model)
    return model
}

def javaCompilerArgs = { compileTask ->
    guarded {
        def args = []
        def seenReleaseOrTarget = compileTask.options.compilerArgs.any {
            it == '--release' || it == '-release' || it == '--target' || it == '-target' || it == '--source' || it == '-source'
        }
        if (!seenReleaseOrTarget) {
            def release = guarded { compileTask.options.release?.getOrNull() }
            if (release != null) {
                args << '--release' << release.toString()
            } else {
                if (compileTask.sourceCompatibility) args << '-source' << compileTask.sourceCompatibility
                if (compileTask.targetCompatibility) args << '-target' << compileTask.targetCompatibility
            }
        }
        args.addAll(compileTask.options.compilerArgs)
        return args
    } ?: []
}

allprojects { proj ->
    proj.tasks.register("printBspSourceSetModels") {
        doLast {
            def models = []
            def android = proj.extensions.findByName("android")
            if (android != null) {
                // Android path (§4.1): variant-collection accessor chosen by plugin kind,
                // each reflective lookup guarded independently.
                def androidPluginKind = guarded {
                    if (proj.pluginManager.hasPlugin('com.android.application')) return 'application'
                    if (proj.pluginManager.hasPlugin('com.android.library')) return 'library'
                    if (proj.pluginManager.hasPlugin('com.android.dynamic-feature')) return 'dynamic-feature'
                    if (proj.pluginManager.hasPlugin('com.android.feature')) return 'feature'
                    if (proj.pluginManager.hasPlugin('com.android.test')) return 'test'
                    return null
                }
                def variantFamilies = guarded {
                    def families = []
                    (guarded { proj.android.applicationVariants } ?: []).each { v -> families << [variant: v, isUnitTest: false] }
                    (guarded { proj.android.libraryVariants } ?: []).each { v -> families << [variant: v, isUnitTest: false] }
                    (guarded { proj.android.testVariants } ?: []).each { v -> families << [variant: v, isUnitTest: false] }
                    (guarded { proj.android.unitTestVariants } ?: []).each { v -> families << [variant: v, isUnitTest: true] }
                    return families
                } ?: []
                variantFamilies.each { fam ->
                    def variant = fam.variant
                    def isUnitTest = fam.isUnitTest
                    def model = sourceSetModel(proj, variant.name) { m ->
                        m.androidPluginKind = androidPluginKind
                        m.hasTests = guarded { variant.testedVariant != null } ?: false
                        m.classesTaskName = "assemble${variant.name.capitalize()}"

                        def javaDirs = guarded {
                            variant.sourceSets.collectMany { it.javaDirectories.collect { d -> d } }
                        } ?: []
                        m.sourceDirs = javaDirs.collect { it.absolutePath }

                        def resDirs = isUnitTest ? [] : (guarded {
                            variant.sourceSets.collectMany { it.resDirectories.collect { d -> d.absolutePath } }
                        } ?: [])
                        def resourcesDirs = guarded {
                            variant.sourceSets.collectMany { it.resourcesDirectories.collect { d -> d.absolutePath } }
                        } ?: []
                        m.resourceDirs = (resDirs + resourcesDirs).unique()

                        m.compileClasspath = guarded { variant.compileConfiguration.files.collect { it.absolutePath } } ?: []
                        m.moduleDependencies = resolveModuleDependencies(proj, guarded { variant.compileConfiguration })

                        def javaCompileTask = guarded { variant.javaCompileProvider.get() }
                        if (javaCompileTask != null) {
                            m.sourceOutputDirs = guarded { [javaCompileTask.destinationDirectory.get().asFile.absolutePath] } ?: []
                            m.generatedSourceDirs = generatedSourceDirsFor(javaCompileTask, javaDirs)
                        }

                        def resourceOutputs = []
                        def processResourcesTask = guarded { variant.processJavaResourcesProvider.get() }
                        if (processResourcesTask != null) {
                            def dir = guarded { processResourcesTask.destinationDir.absolutePath }
                            if (dir != null) resourceOutputs << dir
                        }
                        if (!isUnitTest) {
                            def mergeResourcesTask = guarded { variant.mergeResourcesProvider.get() }
                            if (mergeResourcesTask != null) {
                                def dir = guarded { mergeResourcesTask.outputDir.absolutePath }
                                if (dir != null) resourceOutputs << dir
                            }
                        }
                        m.resourceOutputDirs = resourceOutputs

                        // Synthetic `UNKNOWN`-group entries: the SDK bootclasspath and the
                        // variant's generated R.jar have no Maven coordinate of their own, but
                        // still belong on the module-dependency list they ultimately feed into
                        // (§4.1 "module_dependencies", scenario S4).
                        def moduleDeps = new ArrayList(m.moduleDependencies)
                        def bootClasspath = guarded {
                            proj.extensions.findByName('androidComponents')?.sdkComponents?.bootclasspathProvider?.get()
                        } ?: []
                        bootClasspath.each { f ->
                            moduleDeps << [group: 'UNKNOWN', name: f.name, version: '', classifiers: ['default': f.toURI().toString()]]
                        }
                        def rJarFile = guarded { processResourcesTask?.rClassOutputJar?.get()?.asFile }
                        if (rJarFile != null) {
                            moduleDeps << [group: 'UNKNOWN', name: 'R.jar', version: '', classifiers: ['default': rJarFile.toURI().toString()]]
                        }
                        m.moduleDependencies = moduleDeps
                    }
                    models << model
                }
            } else {
                def sourceSets = proj.extensions.findByName("sourceSets")
                sourceSets?.each { ss ->
                    def model = sourceSetModel(proj, ss.name) { m ->
                        def declaredSourceDirs = guarded { ss.allJava.srcDirs.toList() } ?: []
                        m.sourceDirs = declaredSourceDirs.collect { it.absolutePath }
                        m.resourceDirs = guarded { ss.resources.srcDirs.collect { it.absolutePath } } ?: []
                        def sourceOutputDirs = guarded { ss.output.classesDirs.files.toList() } ?: []
                        m.sourceOutputDirs = sourceOutputDirs.collect { it.absolutePath }
                        def resourcesOutputDir = guarded { ss.output.resourcesDir }
                        m.resourceOutputDirs = resourcesOutputDir != null ? [resourcesOutputDir.absolutePath] : []
                        def compileClasspathConfig = guarded { proj.configurations.findByName(ss.compileClasspathConfigurationName) }
                        m.compileClasspath = guarded { compileClasspathConfig?.files?.collect { it.absolutePath } } ?: []
                        m.moduleDependencies = resolveModuleDependencies(proj, compileClasspathConfig)
                        m.archiveOutputFiles = archiveOutputsForOutput(proj, sourceOutputDirs + (resourcesOutputDir != null ? [resourcesOutputDir] : []))
                        m.classesTaskName = ss.classesTaskName
                        def compileJavaTask = proj.tasks.findByName(ss.getCompileTaskName("java"))
                        if (compileJavaTask != null) {
                            m.javaExtension = [
                                sourceCompatibility: compileJavaTask.sourceCompatibility,
                                targetCompatibility: compileJavaTask.targetCompatibility,
                                compilerArgs: javaCompilerArgs(compileJavaTask),
                            ]
                            m.generatedSourceDirs = generatedSourceDirsFor(compileJavaTask, declaredSourceDirs)
                        }
                        def testTask = proj.tasks.findByName(ss.name == "test" ? "test" : "${ss.name}")
                        m.hasTests = guarded { testTask != null && !testTask.getTestClassesDirs().isEmpty() } ?: false
                    }
                    models << model
                }
            }
            println("BSP_GRADLE_JSON_BEGIN")
            println(JsonOutput.toJson(models))
            println("BSP_GRADLE_JSON_END")
        }
    }

    if (proj == proj.rootProject) {
        proj.tasks.register("printBspProjects") {
            doLast {
                def listing = proj.allprojects.collect { [path: it.path, dir: it.projectDir.absolutePath] }
                println("BSP_GRADLE_PROJECTS_BEGIN")
                println(JsonOutput.toJson(listing))
                println("BSP_GRADLE_PROJECTS_END")
            }
        }
    }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandOutput;
    use gradle_bsp_model::WireModuleDependency;
    use std::process::ExitStatus;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct StaticRunner {
        response: Mutex<Option<CommandOutput>>,
    }

    impl CommandRunner for StaticRunner {
        fn run(
            &self,
            _cwd: &Path,
            _program: &Path,
            _args: &[String],
        ) -> std::io::Result<CommandOutput> {
            Ok(self.response.lock().unwrap().take().unwrap())
        }
    }

    #[cfg(unix)]
    fn exit_success() -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(0)
    }

    #[test]
    fn extract_sentinel_json_ignores_surrounding_gradle_noise() {
        let combined = "Some gradle preamble\nBSP_GRADLE_JSON_BEGIN\n[1,2,3]\nBSP_GRADLE_JSON_END\nBUILD SUCCESSFUL\n";
        let parsed: Option<Vec<i32>> =
            extract_sentinel_json(combined, BSP_JSON_BEGIN, BSP_JSON_END).unwrap();
        assert_eq!(parsed, Some(vec![1, 2, 3]));
    }

    #[test]
    fn extract_sentinel_json_returns_none_without_markers() {
        let parsed: Option<Vec<i32>> =
            extract_sentinel_json("no markers here", BSP_JSON_BEGIN, BSP_JSON_END).unwrap();
        assert_eq!(parsed, None);
    }

    #[test]
    fn check_gradle_version_supported_rejects_below_minimum() {
        assert!(check_gradle_version_supported("1.12").is_err());
        assert!(check_gradle_version_supported("8.5").is_ok());
    }

    #[test]
    fn normalize_wire_model_fills_defaults_for_missing_fields() {
        let wire = WireSourceSetModel {
            project_name: "demo".into(),
            project_path: ":demo".into(),
            project_dir: "/ws/demo".into(),
            root_dir: "/ws".into(),
            source_set_name: "main".into(),
            gradle_version: "8.5".into(),
            ..Default::default()
        };
        let model = normalize_wire_model(wire).unwrap();
        assert_eq!(model.display_name, "demo [main]");
        assert!(model.source_dirs.is_empty());
        assert!(!model.has_tests);
        assert_eq!(model.android_variant_kind, AndroidVariantKind::None);
    }

    #[test]
    fn normalize_wire_model_rejects_missing_project_dir() {
        let wire = WireSourceSetModel {
            project_name: "demo".into(),
            project_path: ":demo".into(),
            project_dir: String::new(),
            root_dir: "/ws".into(),
            source_set_name: "main".into(),
            gradle_version: "8.5".into(),
            ..Default::default()
        };
        assert!(matches!(
            normalize_wire_model(wire),
            Err(GradleBspError::ModelDeserializationFailed(_))
        ));
    }

    /// A reported archive that exists on disk but is not a valid zip is
    /// dropped rather than trusted for class-dir expansion (§9); a reported
    /// archive that doesn't exist yet (jar task hasn't run) is kept as-is.
    #[test]
    fn normalize_wire_model_drops_untrustworthy_archives() {
        let dir = tempfile::tempdir().unwrap();
        let corrupt = dir.path().join("corrupt.jar");
        std::fs::write(&corrupt, b"not a zip").unwrap();
        let not_built_yet = dir.path().join("not-built-yet.jar");

        let wire = WireSourceSetModel {
            project_name: "demo".into(),
            project_path: ":demo".into(),
            project_dir: "/ws/demo".into(),
            root_dir: "/ws".into(),
            source_set_name: "main".into(),
            gradle_version: "8.5".into(),
            archive_output_files: vec![
                gradle_bsp_model::WireArchiveOutput {
                    archive_path: corrupt.to_string_lossy().into_owned(),
                    class_dirs: vec!["/ws/demo/build/classes/java/main".into()],
                },
                gradle_bsp_model::WireArchiveOutput {
                    archive_path: not_built_yet.to_string_lossy().into_owned(),
                    class_dirs: vec!["/ws/demo/build/classes/java/main".into()],
                },
            ],
            ..Default::default()
        };
        let model = normalize_wire_model(wire).unwrap();
        assert_eq!(model.archive_output_files.len(), 1);
        assert_eq!(model.archive_output_files[0].archive_path, not_built_yet);
    }

    /// S4: an Android application module's `debug` variant reports its
    /// plugin kind and carries an `UNKNOWN`-group bootclasspath entry
    /// (android.jar has no Maven coordinates) through untouched.
    #[test]
    fn normalize_wire_model_maps_android_plugin_kinds() {
        for (wire_kind, expected) in [
            ("application", AndroidVariantKind::Application),
            ("library", AndroidVariantKind::Library),
            ("dynamic-feature", AndroidVariantKind::DynamicFeature),
            ("feature", AndroidVariantKind::Feature),
            ("test", AndroidVariantKind::Test),
            ("unrecognized-future-kind", AndroidVariantKind::None),
        ] {
            let wire = WireSourceSetModel {
                project_name: "app".into(),
                project_path: ":app".into(),
                project_dir: "/ws/app".into(),
                root_dir: "/ws".into(),
                source_set_name: "debug".into(),
                gradle_version: "8.5".into(),
                android_plugin_kind: Some(wire_kind.to_string()),
                module_dependencies: vec![WireModuleDependency {
                    group: "UNKNOWN".into(),
                    name: "android.jar".into(),
                    version: "".into(),
                    classifiers: std::collections::BTreeMap::new(),
                }],
                ..Default::default()
            };
            let model = normalize_wire_model(wire).unwrap();
            assert_eq!(model.android_variant_kind, expected, "kind {wire_kind}");
            assert_eq!(model.module_dependencies.len(), 1);
            assert_eq!(model.module_dependencies[0].group, "UNKNOWN");
        }
    }

    #[cfg(unix)]
    #[test]
    fn probe_project_normalizes_output_from_runner() {
        let wire_json = r#"[{"projectName":"demo","projectPath":":demo","projectDir":"/ws/demo","rootDir":"/ws","sourceSetName":"main","gradleVersion":"8.5"}]"#;
        let combined = format!("BSP_GRADLE_JSON_BEGIN\n{wire_json}\nBSP_GRADLE_JSON_END\n");
        let runner = StaticRunner {
            response: Mutex::new(Some(CommandOutput {
                status: exit_success(),
                stdout: combined,
                stderr: String::new(),
                truncated: false,
            })),
        };
        let models = probe_project(&runner, Path::new("gradle"), Path::new("/ws"), None).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].project_path, ":demo");
    }
}

//! `BuildAggregator` (§4.2): drives one aggregation pass across the root
//! build, every included/editable build, and each build's `buildSrc`
//! pseudo-project, fanning per-project probes out across a bounded worker
//! pool.
//!
//! A `CancellationToken` is threaded through every spawned probe so a
//! cancelled aggregation stops handing out new work as soon as the running
//! workers notice (§5).

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use gradle_bsp_model::SourceSetModel;

use crate::collaborators::GradleConnection;
use crate::command::{CancellationToken, CommandRunner};
use crate::config::GradleConfig;
use crate::error::{GradleBspError, Result};
use crate::probe;
use crate::settings::{enumerate_composite_builds, BUILDSRC_DIR_NAME, BUILDSRC_PROJECT_PATH_PREFIX};

/// One per-project probe invocation to run.
#[derive(Debug, Clone)]
struct ProbeWorkItem {
    build_root: PathBuf,
    /// `None` probes the root project of `build_root`.
    project_path: Option<String>,
}

/// Drives the Gradle side of one `workspace/buildTargets` request: build
/// discovery, per-project probe fan-out, and raw-model collection. Does not
/// link dependencies or construct `BuildTarget`s — that is `DependencyLinker`
/// and `TargetGraph`'s job (§2).
#[derive(Debug, Clone)]
pub struct BuildAggregator {
    config: GradleConfig,
    runner: Arc<dyn CommandRunner>,
}

impl BuildAggregator {
    pub fn new(config: GradleConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// Run one full aggregation pass rooted at `project_root`.
    ///
    /// Blocks until every per-project probe invocation returns (§5,
    /// "Suspension/blocking points"). A per-project probe failure is
    /// recorded and that project is simply omitted; the aggregation as a
    /// whole only fails on cancellation or on a structurally invalid model.
    pub fn run(
        &self,
        project_root: &Path,
        connection: &GradleConnection,
        cancellation: &CancellationToken,
    ) -> Result<Vec<SourceSetModel>> {
        let build_roots = enumerate_composite_builds(project_root);
        tracing::debug!(count = build_roots.len(), "discovered build roots");

        let work_items = self.enumerate_work_items(&build_roots, connection, cancellation)?;
        if cancellation.is_cancelled() {
            return Err(GradleBspError::AggregationCancelled);
        }

        let models = self.run_work_items(work_items, connection, cancellation)?;
        if cancellation.is_cancelled() {
            return Err(GradleBspError::AggregationCancelled);
        }

        Ok(models)
    }

    /// Enumerate every per-project probe to run: each build root's own
    /// projects (via the `printBspProjects`-equivalent listing task) plus a
    /// synthetic `buildSrc` entry when that directory exists (§4.2 point 3).
    fn enumerate_work_items(
        &self,
        build_roots: &[PathBuf],
        connection: &GradleConnection,
        cancellation: &CancellationToken,
    ) -> Result<Vec<ProbeWorkItem>> {
        let mut items = Vec::new();
        for build_root in build_roots {
            if cancellation.is_cancelled() {
                return Err(GradleBspError::AggregationCancelled);
            }

            match probe::list_projects(
                self.runner.as_ref(),
                &connection.gradle_program,
                build_root,
            ) {
                Ok(listing) if !listing.is_empty() => {
                    for project in listing {
                        let project_path = if project.path.is_empty() || project.path == ":" {
                            None
                        } else {
                            Some(project.path)
                        };
                        items.push(ProbeWorkItem {
                            build_root: build_root.clone(),
                            project_path,
                        });
                    }
                }
                Ok(_) => {
                    // Empty listing (e.g. probe task produced no output):
                    // still probe the root project itself.
                    items.push(ProbeWorkItem {
                        build_root: build_root.clone(),
                        project_path: None,
                    });
                }
                Err(err) => {
                    tracing::error!(build_root = %build_root.display(), error = %err, "failed to list projects");
                    items.push(ProbeWorkItem {
                        build_root: build_root.clone(),
                        project_path: None,
                    });
                }
            }

            let build_src_dir = build_root.join(BUILDSRC_DIR_NAME);
            if build_src_dir.is_dir() {
                items.push(ProbeWorkItem {
                    build_root: build_src_dir,
                    project_path: Some(BUILDSRC_PROJECT_PATH_PREFIX.to_string()),
                });
            }
        }
        Ok(items)
    }

    /// Run every queued probe across a bounded worker pool sized from
    /// `GradleConfig::effective_parallelism` (§5, "Scheduling model").
    fn run_work_items(
        &self,
        work_items: Vec<ProbeWorkItem>,
        connection: &GradleConnection,
        cancellation: &CancellationToken,
    ) -> Result<Vec<SourceSetModel>> {
        let worker_count = self
            .config
            .effective_parallelism()
            .min(work_items.len().max(1));

        let queue = Mutex::new(VecDeque::from(work_items));
        let results = Mutex::new(Vec::new());

        std::thread::scope(|scope| {
            for _ in 0..worker_count {
                scope.spawn(|| loop {
                    if cancellation.is_cancelled() {
                        return;
                    }
                    let item = {
                        let mut queue = queue.lock().expect("probe queue lock poisoned");
                        queue.pop_front()
                    };
                    let Some(item) = item else { return };

                    let span = tracing::info_span!(
                        "probe_project",
                        build_root = %item.build_root.display(),
                        project_path = item.project_path.as_deref().unwrap_or(":"),
                    );
                    let _enter = span.enter();

                    match probe::probe_project(
                        self.runner.as_ref(),
                        &connection.gradle_program,
                        &item.build_root,
                        item.project_path.as_deref(),
                    ) {
                        Ok(models) => {
                            results
                                .lock()
                                .expect("probe results lock poisoned")
                                .extend(models);
                        }
                        Err(err) => {
                            tracing::error!(error = %err, "probe failed for project, omitting");
                        }
                    }
                });
            }
        });

        Ok(results.into_inner().expect("probe results lock poisoned"))
    }
}

use gradle_bsp_model::BuildTargetIdentifier;

/// The §7 error taxonomy. Per-project failures (`ProbeFailure`,
/// `ReflectionMissing`) never escape the aggregator as a whole-call error;
/// they are recorded and the affected project is simply omitted.
#[derive(Debug, thiserror::Error)]
pub enum GradleBspError {
    #[error("gradle version {found} is below the minimum supported version {minimum}")]
    GradleVersionUnsupported { found: String, minimum: String },

    #[error("probe failed for project {project_path}: {reason}")]
    ProbeFailure {
        project_path: String,
        reason: String,
    },

    #[error("expected member `{0}` was not present on this Gradle/AGP version")]
    ReflectionMissing(String),

    #[error("no build target found for {}", .0.uri)]
    TargetNotFound(BuildTargetIdentifier),

    #[error("aggregation cancelled")]
    AggregationCancelled,

    #[error("model deserialization failed: {0}")]
    ModelDeserializationFailed(String),

    #[error("invalid build target uri `{0}`")]
    InvalidUri(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse probe output as json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GradleBspError>;

impl GradleBspError {
    pub fn probe_failure(project_path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ProbeFailure {
            project_path: project_path.into(),
            reason: reason.into(),
        }
    }
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::Sources;

/// Caller-supplied auxiliary fields (style, audience, goals), kept in the
/// order they were added so assembled stage inputs are deterministic
#[derive(Debug, Clone, Default)]
pub struct AuxParams {
    params: Vec<(String, String)>,
}

impl AuxParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.push((name.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// Everything the caller supplies for one pipeline invocation
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// What the run should accomplish; included in every stage input
    pub objective: String,
    /// One or two content sources to fetch
    pub sources: Sources,
    /// Extra fields forwarded into stage inputs
    pub aux: AuxParams,
}

impl RunRequest {
    pub fn new(objective: impl Into<String>, sources: Sources) -> Self {
        Self {
            objective: objective.into(),
            sources,
            aux: AuxParams::new(),
        }
    }

    pub fn with_aux(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.aux.push(name, value);
        self
    }
}

/// How one stage attempt ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    /// The stage produced output text (possibly empty)
    Ok { output: String },
    /// The stage failed; `detail` is the rendered cause
    Error { detail: String },
}

impl StageOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Ok { output } => Some(output),
            Self::Error { .. } => None,
        }
    }
}

/// Record of one stage attempt, appended in execution order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    /// Declared stage name (e.g. "fact_check")
    pub stage: String,
    /// Source label for per-source branch results in multi-source runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Output or failure detail
    pub outcome: StageOutcome,
    /// Wall-clock time spent in the completion call
    pub elapsed_ms: u64,
}

/// Terminal status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Succeeded,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Where a failed run stopped and why
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunFailure {
    /// Name of the failing stage, or "fetch" when no stage ran
    pub stage: String,
    /// Source label when the failure was tied to one source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Rendered cause
    pub cause: String,
}

/// Complete record of one pipeline invocation
///
/// `stages` holds results in execution order. A failed run carries the results
/// of every stage attempted before (and including) the failure and nothing
/// after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub run_id: String,
    /// Name of the pipeline plan that ran
    pub pipeline: String,
    pub objective: String,
    pub stages: Vec<StageResult>,
    pub status: RunStatus,
    /// Output of the synthesis stage, present only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_artifact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<RunFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl PipelineRun {
    /// Start an empty record; it stays failed until `finish_ok` is called
    pub fn begin(pipeline: impl Into<String>, objective: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            pipeline: pipeline.into(),
            objective: objective.into(),
            stages: Vec::new(),
            status: RunStatus::Failed,
            final_artifact: None,
            failure: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Append the next stage result
    pub fn record(&mut self, result: StageResult) {
        self.stages.push(result);
    }

    /// Close the run as succeeded with the synthesis output
    pub fn finish_ok(&mut self, artifact: impl Into<String>) {
        self.status = RunStatus::Succeeded;
        self.final_artifact = Some(artifact.into());
        self.finished_at = Some(Utc::now());
    }

    /// Close the run as failed at the named point
    pub fn fail(&mut self, failure: RunFailure) {
        self.status = RunStatus::Failed;
        self.failure = Some(failure);
        self.finished_at = Some(Utc::now());
    }

    pub fn is_succeeded(&self) -> bool {
        self.status == RunStatus::Succeeded
    }
}

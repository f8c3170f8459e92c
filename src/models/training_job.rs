//! Router training job model.
//!
//! Epistemic foundation:
//! - K_i: Status is RUNNING until the server reports a terminal state
//! - K_i: Terminal jobs are immutable at rest; update_time stops moving
//! - B_i: Terminal failure is data, not a client fault → returned, not raised

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ChatMessage, MeridianError, Result};

/// Status of a router training job.
///
/// `Running` is the only non-terminal state. `Failure` means the server may
/// still retry internally; `FailureWithoutRetry` means all attempts are
/// exhausted. The distinction is server-determined; the client only
/// reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrainingJobStatus {
    Running,
    Success,
    Failure,
    FailureWithoutRetry,
}

impl TrainingJobStatus {
    /// True once no further transition is possible.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }

    /// True for either failure state.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failure | Self::FailureWithoutRetry)
    }
}

impl std::fmt::Display for TrainingJobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "RUNNING"),
            Self::Success => write!(f, "SUCCESS"),
            Self::Failure => write!(f, "FAILURE"),
            Self::FailureWithoutRetry => write!(f, "FAILURE_WITHOUT_RETRY"),
        }
    }
}

/// Snapshot of an asynchronous router training job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterTrainingJob {
    /// Full hierarchical resource name of the job
    pub name: String,

    /// Name of the router being trained
    pub router_name: String,

    /// Name of the judge providing the training signal
    pub judge_name: String,

    /// Version of the judge pinned for this job
    #[serde(default)]
    pub judge_version: u32,

    /// Current status
    pub status: TrainingJobStatus,

    /// When the job was created
    pub create_time: DateTime<Utc>,

    /// When the job last changed; stops moving once terminal
    pub update_time: DateTime<Utc>,

    /// Candidate model identifiers the router is trained across
    pub llms: Vec<String>,

    /// Server-reported failure detail, when the job failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// How many times the server has retried the job internally
    #[serde(default)]
    pub retry_count: u32,
}

impl RouterTrainingJob {
    /// Short job id: the trailing segment of the job's resource name.
    pub fn id(&self) -> &str {
        job_id_of(&self.name)
    }
}

/// One training conversation: the message list a candidate model is run
/// against during training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRequest {
    pub messages: Vec<ChatMessage>,
}

impl TrainingRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}

/// Extract a job id from either a bare id or a full hierarchical name.
///
/// Unlike resource-name derivation this is lenient: an input without a
/// separator is already an id.
pub fn job_id_of(name_or_id: &str) -> &str {
    match name_or_id.rsplit_once('/') {
        Some((_, id)) => id,
        None => name_or_id,
    }
}

/// Validate a caller-supplied job reference down to a non-empty id.
pub fn validate_job_id(name_or_id: &str) -> Result<&str> {
    let id = job_id_of(name_or_id);
    if id.is_empty() {
        return Err(MeridianError::MalformedResourceName(
            name_or_id.to_string(),
        ));
    }
    Ok(id)
}

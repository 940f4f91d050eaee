use serde::{Deserialize, Serialize};

use crate::domain::{JobId, TaskId};

/// Form payload for `POST /generate`. Field names follow the wire contract,
/// which is camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub topic: String,
    pub content_type: String,
    pub target_audience: String,
    pub tone: String,
}

/// 202 acknowledgment body: the job has been queued, not finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationAccepted {
    pub message: String,
    #[serde(rename = "request_id")]
    pub job_id: JobId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    pub task_id: TaskId,
    pub output: String,
}

/// Finished generation run: the final document plus the per-task
/// intermediate outputs in execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub final_output: String,
    pub task_outputs: Vec<TaskOutput>,
}

/// Inbound events on the persistent socket. The client sends nothing on
/// this channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerEvent {
    GenerationComplete {
        #[serde(rename = "request_id")]
        job_id: JobId,
        result: GenerationResult,
    },
    GenerationError {
        #[serde(rename = "request_id")]
        job_id: JobId,
        error: String,
    },
}

impl ServerEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            Self::GenerationComplete { job_id, .. } | Self::GenerationError { job_id, .. } => {
                *job_id
            }
        }
    }
}

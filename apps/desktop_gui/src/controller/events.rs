//! UI/backend events and error modeling for the studio GUI controller.

use client_core::{SubmitError, GENERIC_SUBMIT_FAILURE};
use shared::{domain::JobId, protocol::GenerationResult};

#[derive(Debug, Clone)]
pub enum UiEvent {
    Accepted {
        job_id: JobId,
    },
    Completed {
        job_id: JobId,
        result: GenerationResult,
    },
    /// Terminal failure pushed over the event socket.
    Failed {
        job_id: JobId,
        error: String,
    },
    /// The submit call itself failed; no job was started.
    SubmitFailed {
        message: String,
    },
    Info(String),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Backend,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    EventStream,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Backend => "Backend",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

/// Rewrites connection noise into something actionable; everything else keeps
/// the message the backend (or the error taxonomy) already chose.
pub fn classify_submit_failure(err: &SubmitError) -> String {
    match err {
        SubmitError::Transport(source) => {
            let lower = source.to_string().to_ascii_lowercase();
            if lower.contains("connection refused")
                || lower.contains("dns")
                || lower.contains("timed out")
            {
                "Generation backend unreachable; check the server URL and try again.".to_string()
            } else {
                GENERIC_SUBMIT_FAILURE.to_string()
            }
        }
        other => other.user_message(),
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("socket")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("generation") || message_lower.contains("quota") {
            UiErrorCategory::Backend
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

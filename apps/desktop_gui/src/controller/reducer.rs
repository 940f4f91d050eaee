//! Explicit generation lifecycle state. Every visual toggle (trigger enabled
//! state, busy label, loading note, result/error panes, wide layout cue) is
//! derived from [`ControllerState`], never flipped ad hoc by the view.

use shared::{
    domain::{JobId, TaskId},
    protocol::{GenerationRequest, GenerationResult},
};
use tracing::debug;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiErrorContext, UiEvent};

pub const TRIGGER_LABEL_IDLE: &str = "Generate Content";
pub const TRIGGER_LABEL_BUSY: &str = "Generating...";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub topic: String,
    pub content_type: String,
    pub target_audience: String,
    pub tone: String,
}

impl FormFields {
    /// Raw pass-through: fields are submitted as typed, empty strings
    /// included. The backend owns validation.
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest {
            topic: self.topic.clone(),
            content_type: self.content_type.clone(),
            target_audience: self.target_audience.clone(),
            tone: self.tone.clone(),
        }
    }
}

/// One rendered task section. Output text is display data, never markup.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSection {
    pub task_id: TaskId,
    pub output: String,
}

/// View model for a finished run. Backend strings are carried verbatim and
/// rendered through plain text widgets, so markup in them stays inert.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub final_output: String,
    pub sections: Vec<TaskSection>,
}

impl ResultView {
    pub fn from_result(result: GenerationResult) -> Self {
        Self {
            final_output: result.final_output,
            sections: result
                .task_outputs
                .into_iter()
                .map(|task| TaskSection {
                    task_id: task.task_id,
                    output: task.output,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationPhase {
    Idle,
    /// POST dispatched, acknowledgment pending.
    Submitting,
    /// Acknowledged; the terminal event for `job_id` has not arrived yet.
    Waiting { job_id: JobId },
    Result { view: ResultView },
    Failed { message: String },
}

#[derive(Debug, Clone)]
pub struct ControllerState {
    pub form: FormFields,
    pub phase: GenerationPhase,
    /// Auxiliary layout cue: widens the workspace while a run is in
    /// progress or showing a result; reverted on failure.
    pub wide_layout: bool,
    pub status: String,
}

impl ControllerState {
    pub fn new(form: FormFields) -> Self {
        Self {
            form,
            phase: GenerationPhase::Idle,
            wide_layout: false,
            status: String::new(),
        }
    }

    pub fn trigger_enabled(&self) -> bool {
        !matches!(
            self.phase,
            GenerationPhase::Submitting | GenerationPhase::Waiting { .. }
        )
    }

    pub fn trigger_label(&self) -> &'static str {
        if self.trigger_enabled() {
            TRIGGER_LABEL_IDLE
        } else {
            TRIGGER_LABEL_BUSY
        }
    }

    pub fn loading_visible(&self) -> bool {
        !self.trigger_enabled()
    }

    pub fn loading_note(&self) -> Option<&'static str> {
        match self.phase {
            GenerationPhase::Submitting => Some("Submitting request..."),
            GenerationPhase::Waiting { .. } => {
                Some("Generation started. Waiting for results...")
            }
            _ => None,
        }
    }

    /// Submit click. Returns the command to dispatch, or `None` while a run
    /// is already in flight (the trigger is the only throttle, and it is
    /// authoritative here rather than cosmetic).
    pub fn submit(&mut self) -> Option<BackendCommand> {
        if !self.trigger_enabled() {
            return None;
        }
        self.phase = GenerationPhase::Submitting;
        self.wide_layout = true;
        self.status.clear();
        Some(BackendCommand::SubmitGeneration {
            request: self.form.to_request(),
        })
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Accepted { job_id } => {
                if matches!(self.phase, GenerationPhase::Submitting) {
                    self.phase = GenerationPhase::Waiting { job_id };
                    self.status = "Generation started".to_string();
                } else {
                    debug!(%job_id, "ignoring acceptance outside of a submit");
                }
            }
            UiEvent::Completed { job_id, result } => {
                if self.is_waiting_for(job_id) {
                    self.phase = GenerationPhase::Result {
                        view: ResultView::from_result(result),
                    };
                    self.status.clear();
                } else {
                    debug!(%job_id, "ignoring completion for a job we are not waiting on");
                }
            }
            UiEvent::Failed { job_id, error } => {
                if self.is_waiting_for(job_id) {
                    self.phase = GenerationPhase::Failed { message: error };
                    self.wide_layout = false;
                } else {
                    debug!(%job_id, "ignoring failure for a job we are not waiting on");
                }
            }
            UiEvent::SubmitFailed { message } => {
                if matches!(self.phase, GenerationPhase::Submitting) {
                    self.phase = GenerationPhase::Failed { message };
                    self.wide_layout = false;
                }
            }
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::Error(error) => {
                // Non-terminal (socket/protocol) trouble: keep the phase, a
                // waiting job is still waiting, but tell the user.
                self.status = match error.context() {
                    UiErrorContext::BackendStartup => {
                        format!("Startup failure: {}", error.message())
                    }
                    UiErrorContext::EventStream => {
                        format!("{} error: {}", err_label(error.category()), error.message())
                    }
                };
            }
        }
    }

    fn is_waiting_for(&self, job_id: JobId) -> bool {
        matches!(self.phase, GenerationPhase::Waiting { job_id: expected } if expected == job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::events::{UiError, UiErrorContext};
    use shared::protocol::TaskOutput;

    fn sample_form() -> FormFields {
        FormFields {
            topic: "T".to_string(),
            content_type: "blog".to_string(),
            target_audience: "devs".to_string(),
            tone: "casual".to_string(),
        }
    }

    fn two_task_result() -> GenerationResult {
        GenerationResult {
            final_output: "<p>Hi</p>".to_string(),
            task_outputs: vec![
                TaskOutput {
                    task_id: TaskId(1),
                    output: "A".to_string(),
                },
                TaskOutput {
                    task_id: TaskId(2),
                    output: "B".to_string(),
                },
            ],
        }
    }

    fn waiting_state(job_id: JobId) -> ControllerState {
        let mut state = ControllerState::new(sample_form());
        state.submit().expect("command");
        state.apply(UiEvent::Accepted { job_id });
        state
    }

    #[test]
    fn submit_disables_trigger_and_applies_layout_cue_before_any_response() {
        let mut state = ControllerState::new(sample_form());
        assert!(state.trigger_enabled());
        assert_eq!(state.trigger_label(), TRIGGER_LABEL_IDLE);

        let command = state.submit().expect("command");
        let BackendCommand::SubmitGeneration { request } = command;
        assert_eq!(request.topic, "T");
        assert_eq!(request.content_type, "blog");
        assert_eq!(request.target_audience, "devs");
        assert_eq!(request.tone, "casual");

        assert!(!state.trigger_enabled());
        assert_eq!(state.trigger_label(), TRIGGER_LABEL_BUSY);
        assert!(state.loading_visible());
        assert!(state.wide_layout);
    }

    #[test]
    fn submit_is_refused_while_a_run_is_in_flight() {
        let mut state = ControllerState::new(sample_form());
        state.submit().expect("command");
        assert!(state.submit().is_none());

        state.apply(UiEvent::Accepted {
            job_id: JobId::random(),
        });
        assert!(state.submit().is_none(), "waiting still blocks resubmission");
    }

    #[test]
    fn acceptance_moves_to_waiting_and_keeps_loading_visible() {
        let job_id = JobId::random();
        let state = waiting_state(job_id);
        assert_eq!(state.phase, GenerationPhase::Waiting { job_id });
        assert!(state.loading_visible());
        assert_eq!(
            state.loading_note(),
            Some("Generation started. Waiting for results...")
        );
    }

    #[test]
    fn completion_renders_sections_in_task_order_and_reenables_trigger() {
        let job_id = JobId::random();
        let mut state = waiting_state(job_id);

        state.apply(UiEvent::Completed {
            job_id,
            result: two_task_result(),
        });

        let GenerationPhase::Result { view } = &state.phase else {
            panic!("expected result phase, got {:?}", state.phase);
        };
        assert_eq!(view.final_output, "<p>Hi</p>");
        assert_eq!(
            view.sections,
            vec![
                TaskSection {
                    task_id: TaskId(1),
                    output: "A".to_string()
                },
                TaskSection {
                    task_id: TaskId(2),
                    output: "B".to_string()
                },
            ]
        );
        assert!(state.trigger_enabled());
        assert_eq!(state.trigger_label(), TRIGGER_LABEL_IDLE);
        assert!(state.wide_layout, "layout cue persists for the result view");
    }

    #[test]
    fn second_run_fully_replaces_the_previous_result() {
        let first_job = JobId::random();
        let mut state = waiting_state(first_job);
        state.apply(UiEvent::Completed {
            job_id: first_job,
            result: two_task_result(),
        });

        state.submit().expect("command");
        let second_job = JobId::random();
        state.apply(UiEvent::Accepted { job_id: second_job });
        state.apply(UiEvent::Completed {
            job_id: second_job,
            result: GenerationResult {
                final_output: "fresh".to_string(),
                task_outputs: Vec::new(),
            },
        });

        let GenerationPhase::Result { view } = &state.phase else {
            panic!("expected result phase, got {:?}", state.phase);
        };
        assert_eq!(view.final_output, "fresh");
        assert!(view.sections.is_empty(), "no residue from the first run");
    }

    #[test]
    fn failure_event_reverts_layout_cue_and_reenables_trigger() {
        let job_id = JobId::random();
        let mut state = waiting_state(job_id);
        assert!(state.wide_layout);

        state.apply(UiEvent::Failed {
            job_id,
            error: "An error occurred during content generation.".to_string(),
        });

        assert_eq!(
            state.phase,
            GenerationPhase::Failed {
                message: "An error occurred during content generation.".to_string()
            }
        );
        assert!(!state.wide_layout);
        assert!(state.trigger_enabled());
    }

    #[test]
    fn submit_failure_surfaces_backend_message_with_trigger_enabled() {
        let mut state = ControllerState::new(sample_form());
        state.submit().expect("command");

        state.apply(UiEvent::SubmitFailed {
            message: "quota exceeded".to_string(),
        });

        assert_eq!(
            state.phase,
            GenerationPhase::Failed {
                message: "quota exceeded".to_string()
            }
        );
        assert!(state.trigger_enabled());
        assert!(!state.wide_layout);
    }

    #[test]
    fn terminal_events_for_other_jobs_change_nothing() {
        let job_id = JobId::random();
        let mut state = waiting_state(job_id);

        state.apply(UiEvent::Completed {
            job_id: JobId::random(),
            result: two_task_result(),
        });
        assert_eq!(state.phase, GenerationPhase::Waiting { job_id });

        state.apply(UiEvent::Failed {
            job_id: JobId::random(),
            error: "stale".to_string(),
        });
        assert_eq!(state.phase, GenerationPhase::Waiting { job_id });
        assert!(!state.trigger_enabled(), "stray events cannot re-arm the trigger");
    }

    #[test]
    fn socket_errors_keep_a_waiting_job_waiting() {
        let job_id = JobId::random();
        let mut state = waiting_state(job_id);

        state.apply(UiEvent::Error(UiError::from_message(
            UiErrorContext::EventStream,
            "socket receive failed: connection reset",
        )));

        assert_eq!(state.phase, GenerationPhase::Waiting { job_id });
        assert!(state.status.contains("Transport error"));
    }
}

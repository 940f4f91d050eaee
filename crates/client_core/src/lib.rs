use std::sync::Arc;

use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use shared::{
    domain::JobId,
    error::ApiError,
    protocol::{GenerationAccepted, GenerationRequest, GenerationResult, ServerEvent},
};
use tokio::sync::{broadcast, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{info, warn};

pub mod error;

pub use error::{ConnectError, SubmitError, GENERIC_SUBMIT_FAILURE};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events fanned out to frontends. `Completed` and `Failed` are only emitted
/// for the job currently in flight; everything else on the socket is dropped
/// after logging.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    Accepted {
        job_id: JobId,
    },
    Completed {
        job_id: JobId,
        result: GenerationResult,
    },
    Failed {
        job_id: JobId,
        error: String,
    },
    Error(String),
}

struct GenerationClientState {
    ws_started: bool,
    in_flight: Option<JobId>,
}

/// Acknowledgment body as received. A 2xx response may still carry an
/// `error` field, which is a logical failure.
#[derive(Debug, Deserialize)]
struct AckBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    request_id: Option<JobId>,
    #[serde(default)]
    error: Option<String>,
}

pub struct GenerationClient {
    http: Client,
    server_url: String,
    inner: Mutex<GenerationClientState>,
    events: broadcast::Sender<ClientEvent>,
}

impl GenerationClient {
    pub fn new(server_url: impl Into<String>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            http: Client::new(),
            server_url: server_url.into(),
            inner: Mutex::new(GenerationClientState {
                ws_started: false,
                in_flight: None,
            }),
            events,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Connects the persistent event socket and spawns the read loop.
    /// Registered once at startup; terminal events arrive here at arbitrary
    /// later times, outside any submit call stack.
    pub async fn connect(self: &Arc<Self>) -> Result<(), ConnectError> {
        {
            let guard = self.inner.lock().await;
            if guard.ws_started {
                return Err(ConnectError::AlreadyConnected);
            }
        }

        let ws_url = if let Some(rest) = self.server_url.strip_prefix("https://") {
            format!("wss://{rest}/ws")
        } else if let Some(rest) = self.server_url.strip_prefix("http://") {
            format!("ws://{rest}/ws")
        } else {
            return Err(ConnectError::UnsupportedScheme);
        };

        let (ws_stream, _) = connect_async(&ws_url)
            .await
            .map_err(|source| ConnectError::Socket {
                url: ws_url.clone(),
                source,
            })?;
        let (_, mut ws_reader) = ws_stream.split();

        {
            let mut guard = self.inner.lock().await;
            guard.ws_started = true;
        }
        info!(%ws_url, "event socket connected");

        let client = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(msg) = ws_reader.next().await {
                match msg {
                    Ok(Message::Text(text)) => client.handle_event_frame(&text).await,
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(err) => {
                        let _ = client
                            .events
                            .send(ClientEvent::Error(format!("socket receive failed: {err}")));
                        break;
                    }
                }
            }
            let mut guard = client.inner.lock().await;
            guard.ws_started = false;
        });

        Ok(())
    }

    /// Submits one generation request. Exactly one POST per call; on
    /// acceptance the returned job id becomes the single in-flight job that
    /// terminal events are matched against.
    pub async fn submit(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationAccepted, SubmitError> {
        let response = self
            .http
            .post(format!("{}/generate", self.server_url))
            .json(request)
            .send()
            .await
            .map_err(SubmitError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ApiError>().await {
                Ok(envelope) => envelope.message,
                Err(_) => GENERIC_SUBMIT_FAILURE.to_string(),
            };
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: AckBody = response
            .json()
            .await
            .map_err(|err| SubmitError::InvalidAck(err.to_string()))?;

        if let Some(message) = body.error {
            return Err(SubmitError::Backend { message });
        }

        let job_id = body
            .request_id
            .ok_or_else(|| SubmitError::InvalidAck("acknowledgment missing request_id".into()))?;

        {
            let mut guard = self.inner.lock().await;
            guard.in_flight = Some(job_id);
        }

        let ack = GenerationAccepted {
            message: body.message.unwrap_or_else(|| "Generation started".to_string()),
            job_id,
        };
        info!(%job_id, topic = %request.topic, "generation accepted");
        let _ = self.events.send(ClientEvent::Accepted { job_id });
        Ok(ack)
    }

    async fn handle_event_frame(&self, text: &str) {
        let event = match serde_json::from_str::<ServerEvent>(text) {
            Ok(event) => event,
            Err(err) => {
                let _ = self
                    .events
                    .send(ClientEvent::Error(format!("invalid server event: {err}")));
                return;
            }
        };

        let job_id = event.job_id();
        let resolves_in_flight = {
            let mut guard = self.inner.lock().await;
            match guard.in_flight {
                Some(expected) if expected == job_id => {
                    guard.in_flight = None;
                    true
                }
                _ => false,
            }
        };
        if !resolves_in_flight {
            warn!(%job_id, "dropping terminal event for stale or unknown job");
            return;
        }

        let _ = self.events.send(match event {
            ServerEvent::GenerationComplete { job_id, result } => {
                ClientEvent::Completed { job_id, result }
            }
            ServerEvent::GenerationError { job_id, error } => {
                ClientEvent::Failed { job_id, error }
            }
        });
    }
}

#[cfg(test)]
mod tests;

use thiserror::Error;

/// Fallback shown when a failed submission carries no usable message.
pub const GENERIC_SUBMIT_FAILURE: &str = "An error occurred. Please try again.";

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("server url must start with http:// or https://")]
    UnsupportedScheme,
    #[error("event socket is already connected")]
    AlreadyConnected,
    #[error("failed to connect websocket {url}: {source}")]
    Socket {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The request never produced an HTTP response.
    #[error("failed to reach generation backend: {0}")]
    Transport(#[source] reqwest::Error),
    /// Non-2xx status, message taken from the error envelope when present.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// HTTP success whose body carried an `error` field.
    #[error("{message}")]
    Backend { message: String },
    #[error("backend acknowledgment was malformed: {0}")]
    InvalidAck(String),
}

impl SubmitError {
    /// Message suitable for the error view. Backend-supplied text is passed
    /// through verbatim; transport and parse failures fall back to the
    /// generic message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } | Self::Backend { message } => message.clone(),
            Self::Transport(_) | Self::InvalidAck(_) => GENERIC_SUBMIT_FAILURE.to_string(),
        }
    }
}

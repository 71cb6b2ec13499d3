//! Error taxonomy for the client.
//!
//! Validation errors (`EmptyContent`, `EmptyInterests`, `IndexOutOfRange`) are
//! raised before any network call. `Transport` is a request-level fault;
//! `GenerationFailed` means the backend answered but signaled failure;
//! `MalformedPayload` means it answered success with a shape we do not accept.
//! Poll-budget exhaustion is not an error: see `poller::PollOutcome::TimedOut`.

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Study content was blank or whitespace-only. Checked before any request.
    #[error("no study content provided; type or ingest some material first")]
    EmptyContent,

    /// Profile save requires at least one interest.
    #[error("profile needs at least one interest before it can be saved")]
    EmptyInterests,

    /// Positional interest removal outside the list bounds.
    #[error("interest index {index} out of range (have {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Network/HTTP-layer fault: connect, timeout, body decode.
    #[error("transport error: {0}")]
    Transport(String),

    /// Backend responded with a non-success HTTP status or a non-zero
    /// envelope code. Carries the best available detail message.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// Backend reported success but the payload is missing the required
    /// top-level sequence for this artifact kind.
    #[error("malformed {kind} payload: {reason}")]
    MalformedPayload { kind: &'static str, reason: String },

    /// Local file I/O failure: profile store, content input, export output.
    #[error("file error: {0}")]
    Store(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

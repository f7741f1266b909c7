//! Core error types for sleepdiary-core.
//!
//! Collaborator failures and wizard-level failures are kept separate:
//! [`ClientError`] covers the question/response API, [`WizardError`] covers
//! a running session. Validation rules themselves never error -- they return
//! an optional message (see [`crate::validate`]).

use thiserror::Error;

/// Errors from the external questionnaire API collaborators.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connection, timeout, TLS).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status. The message is the
    /// server's own error text and is surfaced to the user verbatim.
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL is not valid.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Errors from a wizard session.
#[derive(Error, Debug)]
pub enum WizardError {
    /// The questionnaire loaded but contained no questions.
    #[error("questionnaire has no questions")]
    NoQuestions,

    /// An operation was called in a state that does not allow it.
    #[error("wizard session is not active")]
    NotActive,

    /// A question id was not found in the loaded graph.
    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    /// A jump target is not answered, not visited, and ahead of the
    /// current position.
    #[error("navigation to question {0} is not allowed yet")]
    JumpRefused(String),

    /// A completeness or session rule failed. Blocks advance/submit only.
    #[error("{0}")]
    Validation(String),

    /// The server rejected the submitted response. Message is verbatim.
    #[error("{0}")]
    Submission(String),

    /// A collaborator call failed on a critical path.
    #[error(transparent)]
    Client(#[from] ClientError),
}

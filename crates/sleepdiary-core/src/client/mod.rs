//! External collaborators of the wizard engine.
//!
//! The engine never talks to a server directly; everything goes through
//! [`QuestionnaireClient`]. [`HttpClient`] speaks the original REST API,
//! [`MemoryClient`] serves an owned question list and is what the CLI replay
//! and the test suite drive sessions against.

pub mod http;
pub mod memory;

pub use http::HttpClient;
pub use memory::MemoryClient;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answer::AnswerStore;
use crate::error::ClientError;
use crate::question::{Locale, Question};

/// Request body for the server-side "what comes next" decision. The server
/// sees the full current answer set and may apply its own branching logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextQuestionRequest {
    pub questionnaire_id: String,
    pub current_question_id: String,
    pub current_answers: AnswerStore,
}

/// Request body for submitting a finished response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRequest {
    pub questionnaire_id: String,
    pub answers: AnswerStore,
}

/// A stored response as returned by the server after submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedResponse {
    pub id: String,
    pub questionnaire_id: String,
    pub answers: AnswerStore,
    pub created_at: DateTime<Utc>,
}

/// The question/response API the wizard engine consumes. One session issues
/// at most one call at a time, so implementations need no internal ordering.
#[allow(async_fn_in_trait)]
pub trait QuestionnaireClient {
    /// Fetch a single question, localized.
    async fn fetch_question(&self, id: &str, locale: Locale) -> Result<Question, ClientError>;

    /// Fetch all questions of a questionnaire. `questionnaire_id` may also
    /// be a questionnaire type alias ("morning"/"evening"); the server
    /// resolves it.
    async fn fetch_questions(
        &self,
        questionnaire_id: &str,
        locale: Locale,
        include_deleted: bool,
    ) -> Result<Vec<Question>, ClientError>;

    /// Ask the server which question follows the current one given the full
    /// answer set. `None` means the questionnaire is finished.
    async fn fetch_next_question(
        &self,
        request: &NextQuestionRequest,
        locale: Locale,
    ) -> Result<Option<Question>, ClientError>;

    /// Submit the finished response. The engine has already applied its own
    /// rules; a server rejection is still surfaced verbatim.
    async fn submit_response(
        &self,
        request: &ResponseRequest,
    ) -> Result<SubmittedResponse, ClientError>;
}

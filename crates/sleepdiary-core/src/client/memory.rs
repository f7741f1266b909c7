//! In-memory implementation of [`QuestionnaireClient`] over an owned
//! question list.
//!
//! Replicates the server's default next-question walk: the next root
//! question with a strictly greater order than the current question's main
//! ancestor. Used by the CLI replay command and throughout the test suite.

use std::sync::Mutex;

use chrono::Utc;

use crate::client::{NextQuestionRequest, QuestionnaireClient, ResponseRequest, SubmittedResponse};
use crate::error::ClientError;
use crate::graph::QuestionGraph;
use crate::question::{Locale, Question};

/// Offline questionnaire source for one questionnaire.
#[derive(Debug)]
pub struct MemoryClient {
    graph: QuestionGraph,
    submitted: Mutex<Vec<ResponseRequest>>,
}

impl MemoryClient {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            graph: QuestionGraph::new(questions),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Responses recorded by `submit_response`, oldest first.
    pub fn submitted(&self) -> Vec<ResponseRequest> {
        self.submitted
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    fn not_found(id: &str) -> ClientError {
        ClientError::Server {
            status: 404,
            message: format!("question not found: {id}"),
        }
    }
}

impl QuestionnaireClient for MemoryClient {
    async fn fetch_question(&self, id: &str, _locale: Locale) -> Result<Question, ClientError> {
        self.graph
            .get(id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn fetch_questions(
        &self,
        _questionnaire_id: &str,
        _locale: Locale,
        _include_deleted: bool,
    ) -> Result<Vec<Question>, ClientError> {
        Ok(self.graph.all().to_vec())
    }

    async fn fetch_next_question(
        &self,
        request: &NextQuestionRequest,
        _locale: Locale,
    ) -> Result<Option<Question>, ClientError> {
        let Some(main) = self.graph.main_ancestor(&request.current_question_id) else {
            return Ok(None);
        };
        let current_order = main.order;
        Ok(self
            .graph
            .root_questions()
            .into_iter()
            .find(|q| q.order > current_order)
            .cloned())
    }

    async fn submit_response(
        &self,
        request: &ResponseRequest,
    ) -> Result<SubmittedResponse, ClientError> {
        if let Ok(mut log) = self.submitted.lock() {
            log.push(request.clone());
        }
        Ok(SubmittedResponse {
            id: uuid::Uuid::new_v4().to_string(),
            questionnaire_id: request.questionnaire_id.clone(),
            answers: request.answers.clone(),
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::AnswerStore;
    use crate::question::QuestionType;

    fn client() -> MemoryClient {
        MemoryClient::new(vec![
            Question::new("q1", 1, QuestionType::Text),
            Question::new("q2", 2, QuestionType::MultipleChoice)
                .with_conditional_child("yes", "q2a"),
            Question::new("q2a", 20, QuestionType::Numeric),
            Question::new("q3", 3, QuestionType::Slider),
        ])
    }

    fn next_request(current: &str) -> NextQuestionRequest {
        NextQuestionRequest {
            questionnaire_id: "morning".into(),
            current_question_id: current.into(),
            current_answers: AnswerStore::new(),
        }
    }

    #[tokio::test]
    async fn test_next_walks_roots_in_order() {
        let client = client();
        let next = client
            .fetch_next_question(&next_request("q1"), Locale::Da)
            .await
            .unwrap();
        assert_eq!(next.unwrap().id, "q2");
        let last = client
            .fetch_next_question(&next_request("q3"), Locale::Da)
            .await
            .unwrap();
        assert!(last.is_none());
    }

    #[tokio::test]
    async fn test_next_from_conditional_child_uses_parent_position() {
        let client = client();
        let next = client
            .fetch_next_question(&next_request("q2a"), Locale::Da)
            .await
            .unwrap();
        assert_eq!(next.unwrap().id, "q3");
    }

    #[tokio::test]
    async fn test_fetch_question_not_found() {
        let client = client();
        let err = client.fetch_question("nope", Locale::Da).await.unwrap_err();
        assert!(matches!(err, ClientError::Server { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_submit_records_request() {
        let client = client();
        let request = ResponseRequest {
            questionnaire_id: "morning".into(),
            answers: AnswerStore::new(),
        };
        let response = client.submit_response(&request).await.unwrap();
        assert_eq!(response.questionnaire_id, "morning");
        assert_eq!(client.submitted().len(), 1);
    }
}

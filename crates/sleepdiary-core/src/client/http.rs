//! HTTP implementation of [`QuestionnaireClient`] against the original
//! questionnaire REST API.
//!
//! Error bodies of the shape `{"error": "..."}` or `{"message": "..."}` are
//! unwrapped so the server's own text reaches the user verbatim. A 204 on
//! the next-question endpoint means the questionnaire is finished.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::client::{NextQuestionRequest, QuestionnaireClient, ResponseRequest, SubmittedResponse};
use crate::error::ClientError;
use crate::question::{Locale, Question};

/// Client for the questionnaire REST API.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base: Url,
    http: reqwest::Client,
    token: Option<String>,
}

impl HttpClient {
    /// Create a client for the given API base URL (e.g. `https://host/api`).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        // joining relative paths needs the trailing slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            http: reqwest::Client::new(),
            token: None,
        })
    }

    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        self.authorized(self.http.get(url))
    }

    fn post(&self, url: Url) -> reqwest::RequestBuilder {
        self.authorized(self.http.post(url))
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::server_error(status, response).await)
        }
    }

    async fn server_error(status: StatusCode, response: reqwest::Response) -> ClientError {
        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("error")
                .or_else(|| body.get("message"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string()),
            Err(_) => status.to_string(),
        };
        ClientError::Server {
            status: status.as_u16(),
            message,
        }
    }
}

impl QuestionnaireClient for HttpClient {
    async fn fetch_question(&self, id: &str, locale: Locale) -> Result<Question, ClientError> {
        let mut url = self.endpoint(&format!("questions/{id}"))?;
        url.query_pairs_mut()
            .append_pair("language", locale.as_str());
        Self::decode(self.get(url).send().await?).await
    }

    async fn fetch_questions(
        &self,
        questionnaire_id: &str,
        locale: Locale,
        include_deleted: bool,
    ) -> Result<Vec<Question>, ClientError> {
        let mut url = self.endpoint("questions")?;
        url.query_pairs_mut()
            .append_pair("questionnaireId", questionnaire_id)
            .append_pair("language", locale.as_str())
            .append_pair("includeDeleted", if include_deleted { "true" } else { "false" });
        Self::decode(self.get(url).send().await?).await
    }

    async fn fetch_next_question(
        &self,
        request: &NextQuestionRequest,
        locale: Locale,
    ) -> Result<Option<Question>, ClientError> {
        let mut url = self.endpoint("responses/next-question")?;
        url.query_pairs_mut()
            .append_pair("language", locale.as_str());
        let response = self.post(url).json(request).send().await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let status = response.status();
        if status.is_success() {
            Ok(Some(response.json().await?))
        } else {
            Err(Self::server_error(status, response).await)
        }
    }

    async fn submit_response(
        &self,
        request: &ResponseRequest,
    ) -> Result<SubmittedResponse, ClientError> {
        let url = self.endpoint("responses")?;
        Self::decode(self.post(url).json(request).send().await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = HttpClient::new("https://example.test/api").unwrap();
        let url = client.endpoint("questions/q1").unwrap();
        assert_eq!(url.as_str(), "https://example.test/api/questions/q1");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpClient::new("not a url").is_err());
    }
}

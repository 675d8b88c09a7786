/**
 * HTTP AI Collaborator Client
 *
 * Production implementation of the AI collaborator boundary over HTTP.
 * Every request is a single POST to `{base_url}/collaborate` carrying
 * `{ sessionId, kind, context }`; the response body is either
 * `{ suggestions: [...] }` or `{ resolutionText, resolutionData }`.
 *
 * Timeouts are applied by the caller (the session actor wraps every call
 * in the configured `ai_call_timeout`), so this client only maps transport
 * and decoding failures into the uniform `AiError`.
 */
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    AiCollaborator, AiError, AiResolution, AiSuggestion, ResolutionRequest, SuggestionRequest,
};

/// HTTP client for the external AI collaborator service
#[derive(Debug, Clone)]
pub struct HttpAiCollaborator {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CollaborateRequest<'a> {
    session_id: &'a str,
    kind: &'a str,
    context: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct SuggestionsResponse {
    suggestions: Vec<AiSuggestion>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolutionResponse {
    resolution_text: String,
    #[serde(default)]
    resolution_data: serde_json::Value,
}

impl HttpAiCollaborator {
    /// Create a new client for the given service base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create a client reusing an existing reqwest client
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/collaborate", self.base_url.trim_end_matches('/'))
    }

    async fn post(&self, body: &CollaborateRequest<'_>) -> Result<reqwest::Response, AiError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(body)
            .send()
            .await
            .map_err(|e| AiError::new(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AiError::new(format!(
                "service returned {}",
                response.status()
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl AiCollaborator for HttpAiCollaborator {
    async fn suggest(&self, request: SuggestionRequest) -> Result<Vec<AiSuggestion>, AiError> {
        tracing::debug!(
            "[AI] Requesting {} for session {}",
            request.kind.as_str(),
            request.session_id
        );

        let body = CollaborateRequest {
            session_id: &request.session_id,
            kind: request.kind.as_str(),
            context: &request.context,
        };

        let response = self.post(&body).await?;
        let parsed: SuggestionsResponse = response
            .json()
            .await
            .map_err(|e| AiError::new(format!("malformed suggestion response: {}", e)))?;

        tracing::debug!(
            "[AI] Received {} suggestions for session {}",
            parsed.suggestions.len(),
            request.session_id
        );

        Ok(parsed.suggestions)
    }

    async fn resolve(&self, request: ResolutionRequest) -> Result<AiResolution, AiError> {
        tracing::debug!(
            "[AI] Requesting conflict resolution for {} in session {}",
            request.conflict.id,
            request.session_id
        );

        let context = serde_json::json!({
            "conflict": request.conflict,
            "history": request.history,
        });
        let body = CollaborateRequest {
            session_id: &request.session_id,
            kind: "conflict-resolution",
            context: &context,
        };

        let response = self.post(&body).await?;
        let parsed: ResolutionResponse = response
            .json()
            .await
            .map_err(|e| AiError::new(format!("malformed resolution response: {}", e)))?;

        Ok(AiResolution {
            resolution_text: parsed.resolution_text,
            resolution_data: parsed.resolution_data,
        })
    }
}

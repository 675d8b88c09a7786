//! Shared test helpers
//!
//! Provides a programmable in-process AI collaborator and event-stream
//! assertion helpers used across the integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use collabhub::backend::ai::{
    AiCollaborator, AiError, AiResolution, AiSuggestion, ResolutionRequest, SuggestionRequest,
};
use collabhub::backend::session::ConnectionHandle;
use collabhub::shared::{CoordinatorConfig, SessionEvent, SuggestionPriority};

/// How long event assertions wait before giving up
pub const EVENT_WAIT: Duration = Duration::from_secs(2);

/// Coordinator configuration tuned for fast tests
pub fn test_config() -> CoordinatorConfig {
    CoordinatorConfig::builder()
        .message_log_cap(50)
        .suggestion_cap(20)
        .ai_call_timeout(Duration::from_millis(500))
        .session_teardown_grace(Duration::from_millis(50))
        .build()
        .expect("test config")
}

/// Programmable AI collaborator
///
/// Responses are consumed in FIFO order; an empty queue yields a canned
/// success so tests only script the calls they care about. An optional
/// delay is applied before every reply.
#[derive(Default)]
pub struct MockAiCollaborator {
    suggest_replies: Mutex<VecDeque<Result<Vec<AiSuggestion>, AiError>>>,
    resolve_replies: Mutex<VecDeque<Result<AiResolution, AiError>>>,
    delay: Option<Duration>,
}

impl MockAiCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_suggestions(&self, titles: &[&str]) {
        let suggestions = titles
            .iter()
            .map(|title| AiSuggestion {
                title: title.to_string(),
                description: format!("description for {}", title),
                priority: SuggestionPriority::Medium,
                payload: serde_json::Value::Null,
            })
            .collect();
        self.suggest_replies
            .lock()
            .unwrap()
            .push_back(Ok(suggestions));
    }

    pub fn queue_suggest_failure(&self, message: &str) {
        self.suggest_replies
            .lock()
            .unwrap()
            .push_back(Err(AiError::new(message)));
    }

    pub fn queue_resolution(&self, text: &str) {
        self.resolve_replies.lock().unwrap().push_back(Ok(AiResolution {
            resolution_text: text.to_string(),
            resolution_data: serde_json::Value::Null,
        }));
    }

    pub fn queue_resolve_failure(&self, message: &str) {
        self.resolve_replies
            .lock()
            .unwrap()
            .push_back(Err(AiError::new(message)));
    }
}

#[async_trait]
impl AiCollaborator for MockAiCollaborator {
    async fn suggest(&self, _request: SuggestionRequest) -> Result<Vec<AiSuggestion>, AiError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.suggest_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(vec![AiSuggestion {
                    title: "canned suggestion".to_string(),
                    description: "default mock response".to_string(),
                    priority: SuggestionPriority::Medium,
                    payload: serde_json::Value::Null,
                }])
            })
    }

    async fn resolve(&self, _request: ResolutionRequest) -> Result<AiResolution, AiError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.resolve_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(AiResolution {
                    resolution_text: "canned resolution".to_string(),
                    resolution_data: serde_json::Value::Null,
                })
            })
    }
}

/// Await the next event on a connection, panicking on timeout
pub async fn next_event(connection: &mut ConnectionHandle) -> SessionEvent {
    tokio::time::timeout(EVENT_WAIT, connection.next_event())
        .await
        .expect("timed out waiting for event")
        .expect("event stream ended unexpectedly")
}

/// Await the next event, skipping presence-changed updates
pub async fn next_non_presence_event(connection: &mut ConnectionHandle) -> SessionEvent {
    loop {
        match next_event(connection).await {
            SessionEvent::PresenceChanged { .. } => continue,
            other => return other,
        }
    }
}

/// Assert the next event is presence-changed and return the snapshot
pub async fn expect_presence(
    connection: &mut ConnectionHandle,
) -> Vec<collabhub::shared::Collaborator> {
    match next_event(connection).await {
        SessionEvent::PresenceChanged { collaborators } => collaborators,
        other => panic!("expected presence-changed, got {:?}", other),
    }
}

/// Assert the next event is a message and return it
pub async fn expect_message(connection: &mut ConnectionHandle) -> collabhub::shared::Message {
    match next_event(connection).await {
        SessionEvent::Message { message } => message,
        other => panic!("expected message, got {:?}", other),
    }
}

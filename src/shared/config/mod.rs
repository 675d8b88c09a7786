//! Coordinator configuration module
//!
//! Provides the recognized configuration options for the session
//! coordinator, with the documented defaults, a builder, and loading from
//! environment variables. Missing or malformed environment values fall back
//! to the defaults and are logged rather than failing startup.

use std::time::Duration;

use thiserror::Error;

/// Default bounded message log size per session
pub const DEFAULT_MESSAGE_LOG_CAP: usize = 500;
/// Default cap on stored suggestions per session
pub const DEFAULT_SUGGESTION_CAP: usize = 200;
/// Default timeout for AI collaborator calls
pub const DEFAULT_AI_CALL_TIMEOUT: Duration = Duration::from_secs(30);
/// Default grace period before an empty session is torn down
pub const DEFAULT_TEARDOWN_GRACE: Duration = Duration::from_secs(300);

/// Session coordinator configuration
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Maximum messages retained per session; oldest are dropped beyond this
    pub message_log_cap: usize,
    /// Maximum suggestions retained per session (terminal evicted first)
    pub suggestion_cap: usize,
    /// Timeout applied to every AI collaborator call
    pub ai_call_timeout: Duration,
    /// Grace period after presence reaches zero before teardown
    pub session_teardown_grace: Duration,
    /// Whether a sender receives its own chat messages back
    pub echo_chat_to_sender: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            message_log_cap: DEFAULT_MESSAGE_LOG_CAP,
            suggestion_cap: DEFAULT_SUGGESTION_CAP,
            ai_call_timeout: DEFAULT_AI_CALL_TIMEOUT,
            session_teardown_grace: DEFAULT_TEARDOWN_GRACE,
            echo_chat_to_sender: true,
        }
    }
}

impl CoordinatorConfig {
    /// Create a new CoordinatorConfigBuilder
    pub fn builder() -> CoordinatorConfigBuilder {
        CoordinatorConfigBuilder::default()
    }

    /// Load configuration from `COLLABHUB_*` environment variables
    ///
    /// Recognized variables (all optional):
    /// - `COLLABHUB_MESSAGE_LOG_CAP`
    /// - `COLLABHUB_SUGGESTION_CAP`
    /// - `COLLABHUB_AI_CALL_TIMEOUT_MS`
    /// - `COLLABHUB_SESSION_TEARDOWN_GRACE_MS`
    /// - `COLLABHUB_ECHO_CHAT_TO_SENDER` (`true`/`false`)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(cap) = read_env_parsed::<usize>("COLLABHUB_MESSAGE_LOG_CAP") {
            config.message_log_cap = cap;
        }
        if let Some(cap) = read_env_parsed::<usize>("COLLABHUB_SUGGESTION_CAP") {
            config.suggestion_cap = cap;
        }
        if let Some(ms) = read_env_parsed::<u64>("COLLABHUB_AI_CALL_TIMEOUT_MS") {
            config.ai_call_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env_parsed::<u64>("COLLABHUB_SESSION_TEARDOWN_GRACE_MS") {
            config.session_teardown_grace = Duration::from_millis(ms);
        }
        if let Some(echo) = read_env_parsed::<bool>("COLLABHUB_ECHO_CHAT_TO_SENDER") {
            config.echo_chat_to_sender = echo;
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.message_log_cap == 0 {
            return Err(ConfigError::InvalidValue("message_log_cap must be > 0"));
        }
        if self.suggestion_cap == 0 {
            return Err(ConfigError::InvalidValue("suggestion_cap must be > 0"));
        }
        Ok(())
    }
}

/// Read and parse an environment variable, logging and skipping bad values
fn read_env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    match std::env::var(name) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("[Config] Ignoring unparseable {}={:?}", name, raw);
                None
            }
        },
        Err(_) => None,
    }
}

/// Builder for CoordinatorConfig
#[derive(Debug, Default)]
pub struct CoordinatorConfigBuilder {
    message_log_cap: Option<usize>,
    suggestion_cap: Option<usize>,
    ai_call_timeout: Option<Duration>,
    session_teardown_grace: Option<Duration>,
    echo_chat_to_sender: Option<bool>,
}

impl CoordinatorConfigBuilder {
    /// Set the message log cap
    pub fn message_log_cap(mut self, cap: usize) -> Self {
        self.message_log_cap = Some(cap);
        self
    }

    /// Set the suggestion cap
    pub fn suggestion_cap(mut self, cap: usize) -> Self {
        self.suggestion_cap = Some(cap);
        self
    }

    /// Set the AI call timeout
    pub fn ai_call_timeout(mut self, timeout: Duration) -> Self {
        self.ai_call_timeout = Some(timeout);
        self
    }

    /// Set the session teardown grace period
    pub fn session_teardown_grace(mut self, grace: Duration) -> Self {
        self.session_teardown_grace = Some(grace);
        self
    }

    /// Set whether chat messages echo back to their sender
    pub fn echo_chat_to_sender(mut self, echo: bool) -> Self {
        self.echo_chat_to_sender = Some(echo);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<CoordinatorConfig, ConfigError> {
        let defaults = CoordinatorConfig::default();
        let config = CoordinatorConfig {
            message_log_cap: self.message_log_cap.unwrap_or(defaults.message_log_cap),
            suggestion_cap: self.suggestion_cap.unwrap_or(defaults.suggestion_cap),
            ai_call_timeout: self.ai_call_timeout.unwrap_or(defaults.ai_call_timeout),
            session_teardown_grace: self
                .session_teardown_grace
                .unwrap_or(defaults.session_teardown_grace),
            echo_chat_to_sender: self
                .echo_chat_to_sender
                .unwrap_or(defaults.echo_chat_to_sender),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}

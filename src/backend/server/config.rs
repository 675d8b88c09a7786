/**
 * Server Configuration
 *
 * Loads the HTTP-facing settings from the environment. Coordinator tuning
 * lives in the shared [`CoordinatorConfig`]; this layer adds the bind port
 * and the AI collaborator service endpoint. Malformed values are logged and
 * fall back to defaults rather than failing startup.
 */
use crate::shared::config::CoordinatorConfig;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_AI_URL: &str = "http://127.0.0.1:8700";

/// Full server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port the server binds on all interfaces
    pub port: u16,
    /// Base URL of the AI collaborator service
    pub ai_base_url: String,
    /// Coordinator tuning knobs
    pub coordinator: CoordinatorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            ai_base_url: DEFAULT_AI_URL.to_string(),
            coordinator: CoordinatorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// `SERVER_PORT` and `COLLABHUB_AI_URL` configure this layer; the
    /// coordinator knobs come from the `COLLABHUB_*` variables documented
    /// on [`CoordinatorConfig::from_env`].
    pub fn from_env() -> Self {
        let mut config = ServerConfig::default();

        if let Ok(raw) = std::env::var("SERVER_PORT") {
            match raw.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => tracing::warn!("[Config] Ignoring unparseable SERVER_PORT={:?}", raw),
            }
        }

        if let Ok(url) = std::env::var("COLLABHUB_AI_URL") {
            if url.trim().is_empty() {
                tracing::warn!("[Config] Ignoring empty COLLABHUB_AI_URL");
            } else {
                config.ai_base_url = url;
            }
        }

        config.coordinator = CoordinatorConfig::from_env();
        config
    }
}

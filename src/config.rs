//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is read first for local
//! development; real environment variables take precedence.

use std::env;
use std::path::PathBuf;

/// Default chat-completions endpoint of the AI gateway.
pub const DEFAULT_AI_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
/// Default model requested from the gateway.
pub const DEFAULT_AI_MODEL: &str = "google/gemini-2.5-flash";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Chat-completions endpoint used for generation
    pub ai_gateway_url: String,
    /// Model name sent to the gateway
    pub ai_model: String,
    /// Per-request timeout for generation calls
    pub ai_request_timeout_secs: u64,
    /// Directory holding the favorites slot
    pub favorites_dir: PathBuf,
    /// Optional catalog file replacing the built-in one
    pub catalog_path: Option<PathBuf>,
    /// When false, every signed-in user may generate
    pub paywall_enabled: bool,
    /// Users treated as having purchased the unlock
    pub unlocked_users: Vec<String>,

    // --- Secrets ---
    /// Bearer key for the AI gateway
    pub ai_gateway_api_key: String,
    /// JWT signing key shared with the auth provider (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            ai_gateway_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            ai_model: DEFAULT_AI_MODEL.to_string(),
            ai_request_timeout_secs: 5,
            favorites_dir: PathBuf::from("data/local"),
            catalog_path: None,
            paywall_enabled: true,
            unlocked_users: Vec::new(),
            ai_gateway_api_key: "test_gateway_key".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: parse_or("PORT", 8080)?,
            ai_gateway_url: env::var("AI_GATEWAY_URL")
                .unwrap_or_else(|_| DEFAULT_AI_GATEWAY_URL.to_string()),
            ai_model: env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_AI_MODEL.to_string()),
            ai_request_timeout_secs: parse_or("AI_REQUEST_TIMEOUT_SECS", 30)?,
            favorites_dir: env::var("FAVORITES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/local")),
            catalog_path: env::var("CATALOG_PATH").ok().map(PathBuf::from),
            paywall_enabled: parse_or("PAYWALL_ENABLED", true)?,
            unlocked_users: env::var("UNLOCKED_USERS")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),

            ai_gateway_api_key: env::var("AI_GATEWAY_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("AI_GATEWAY_API_KEY"))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }

    pub fn ai_request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ai_request_timeout_secs)
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated list, dropping blanks.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("AI_GATEWAY_API_KEY", " test_key ");
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("UNLOCKED_USERS", "alice, bob,,");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.ai_gateway_api_key, "test_key");
        assert_eq!(config.unlocked_users, vec!["alice", "bob"]);
        assert_eq!(config.port, 8080);
        assert!(config.paywall_enabled);
    }

    #[test]
    fn test_parse_or_rejects_garbage() {
        env::set_var("ACTIVITY_JAR_TEST_PORT", "eighty");
        assert!(matches!(
            parse_or::<u16>("ACTIVITY_JAR_TEST_PORT", 8080),
            Err(ConfigError::Invalid("ACTIVITY_JAR_TEST_PORT", _))
        ));

        env::set_var("ACTIVITY_JAR_TEST_PORT", " 9090 ");
        assert_eq!(parse_or::<u16>("ACTIVITY_JAR_TEST_PORT", 8080).unwrap(), 9090);

        assert_eq!(parse_or::<u16>("ACTIVITY_JAR_TEST_UNSET", 8080).unwrap(), 8080);
    }

    #[test]
    fn test_parse_list() {
        assert!(parse_list("").is_empty());
        assert_eq!(parse_list("a,b"), vec!["a", "b"]);
    }
}

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the Google Programmable Search API key.
pub const SEARCH_API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Environment variable holding the Programmable Search engine identifier (`cx`).
pub const SEARCH_ENGINE_ID_VAR: &str = "GOOGLE_SEARCH_ENGINE_ID";

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
    /// Optional JSON corpus replacing the embedded one.
    pub corpus_path: Option<PathBuf>,
    /// Timeout applied by the outbound HTTP client.
    pub http_timeout_secs: u64,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_secs: 5,
            corpus_path: None,
            http_timeout_secs: 15,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Search credentials are deliberately absent: they are read per call by
    /// [`SearchCredentials::from_env`] so a server without them still starts.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            shutdown_timeout_secs: env::var("SHUTDOWN_TIMEOUT")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
            corpus_path: env::var("CORPUS_PATH").ok().map(PathBuf::from),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()?,
            max_body_bytes: env::var("MAX_BODY_BYTES")
                .unwrap_or_else(|_| "1048576".to_string())
                .parse()?,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Credentials for the third-party search API.
#[derive(Debug, Clone)]
pub struct SearchCredentials {
    pub api_key: String,
    pub engine_id: String,
}

impl SearchCredentials {
    /// Read both credentials from the process environment.
    ///
    /// Returns `None` when either is missing or blank.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var(SEARCH_API_KEY_VAR).ok()?;
        let engine_id = env::var(SEARCH_ENGINE_ID_VAR).ok()?;
        Self::new(api_key, engine_id)
    }

    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Option<Self> {
        let api_key = api_key.into();
        let engine_id = engine_id.into();
        if api_key.trim().is_empty() || engine_id.trim().is_empty() {
            return None;
        }
        Some(Self { api_key, engine_id })
    }
}

/// Where tool handlers obtain search credentials at call time.
#[derive(Debug, Clone, Default)]
pub enum CredentialSource {
    /// Read the process environment on every call.
    #[default]
    Environment,
    /// Fixed credentials (or their absence), for embedding and tests.
    Fixed(Option<SearchCredentials>),
}

impl CredentialSource {
    pub fn resolve(&self) -> Option<SearchCredentials> {
        match self {
            CredentialSource::Environment => SearchCredentials::from_env(),
            CredentialSource::Fixed(creds) => creds.clone(),
        }
    }
}

use std::env;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend endpoint and credential source.
    pub generator: GeneratorConfig,
    /// Sampling parameters.
    pub generation: GenerationConfig,
    /// Log level and format.
    pub logging: LoggingConfig,
    /// HTTP request limits.
    pub request: RequestConfig,
}

/// Text-generation backend configuration.
///
/// Holds the *name* of the variable carrying the credential, never the
/// credential itself.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Base URL of the backend, without the model path.
    pub base_url: String,
    /// Model name placed in the endpoint path.
    pub model: String,
    /// Environment variable holding the credential.
    pub credential_var: String,
    /// How the credential is sent.
    pub auth_scheme: AuthScheme,
}

/// How the credential is presented to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `x-goog-api-key` header
    ApiKey,
    /// `Authorization: Bearer` header
    Bearer,
}

/// Sampling parameters for generation requests
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Sampling temperature, clamped to `[0, 2]`.
    pub temperature: f64,
    /// Maximum output tokens.
    pub max_tokens: u32,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Wall-clock ceiling for one generation call.
    pub timeout_ms: u64,
}

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default model name.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";
/// Default environment variable holding the credential.
pub const DEFAULT_CREDENTIAL_VAR: &str = "GOOGLE_API_KEY";

const MAX_TEMPERATURE: f64 = 2.0;

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let generator = GeneratorConfig {
            base_url: env::var("GENERATOR_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: env::var("GENERATOR_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            credential_var: env::var("GENERATOR_CREDENTIAL_VAR")
                .unwrap_or_else(|_| DEFAULT_CREDENTIAL_VAR.to_string()),
            auth_scheme: match env::var("GENERATOR_AUTH_SCHEME") {
                Ok(raw) => AuthScheme::parse(&raw)?,
                Err(_) => AuthScheme::ApiKey,
            },
        };

        if generator.model.trim().is_empty() {
            return Err(AppError::Config {
                message: "GENERATOR_MODEL cannot be empty".to_string(),
            });
        }

        let defaults = GenerationConfig::default();
        let generation = GenerationConfig {
            temperature: env::var("GENERATION_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|t| t.is_finite())
                .map(|t| t.clamp(0.0, MAX_TEMPERATURE))
                .unwrap_or(defaults.temperature),
            max_tokens: env::var("GENERATION_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_tokens),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(RequestConfig::default().timeout_ms),
        };

        Ok(Config {
            generator,
            generation,
            logging,
            request,
        })
    }
}

impl AuthScheme {
    /// Parse a scheme name as written in `GENERATOR_AUTH_SCHEME`
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_lowercase().as_str() {
            "api_key" | "apikey" | "key" => Ok(AuthScheme::ApiKey),
            "bearer" | "token" => Ok(AuthScheme::Bearer),
            other => Err(AppError::Config {
                message: format!(
                    "GENERATOR_AUTH_SCHEME must be 'api_key' or 'bearer', got '{}'",
                    other
                ),
            }),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            credential_var: DEFAULT_CREDENTIAL_VAR.to_string(),
            auth_scheme: AuthScheme::ApiKey,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout_ms: 30000 }
    }
}

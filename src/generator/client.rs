use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::credentials::{CredentialProvider, EnvCredentialProvider};
use super::types::{GenerateContentRequest, GenerateContentResponse, GenerationRequest, GenerationResult};
use super::Generator;
use crate::config::{GeneratorConfig, RequestConfig};
use crate::error::{BackendResult, GenerationError};

/// Longest backend error body carried into a failure detail
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Generator backed by the `generateContent` HTTP API
#[derive(Clone)]
pub struct HttpGenerator {
    client: Client,
    base_url: String,
    model: String,
    credentials: Arc<dyn CredentialProvider>,
    timeout_ms: u64,
}

impl HttpGenerator {
    /// Create a generator whose credential is read from the configured env var
    pub fn new(config: &GeneratorConfig, request_config: RequestConfig) -> BackendResult<Self> {
        Self::with_credentials(
            config,
            request_config,
            Arc::new(EnvCredentialProvider::from_config(config)),
        )
    }

    /// Create a generator with an explicit credential provider
    pub fn with_credentials(
        config: &GeneratorConfig,
        request_config: RequestConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(GenerationError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            credentials,
            timeout_ms: request_config.timeout_ms,
        })
    }

    /// Full URL of the generation endpoint
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Model name requests are sent to
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn try_generate(&self, request: &GenerationRequest) -> BackendResult<String> {
        // Fail before touching the network when no credential is available
        let credential = self
            .credentials
            .credential()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| GenerationError::MissingCredential {
                message: format!("no credential available from {}", self.credentials.describe()),
            })?;
        let auth = credential.header()?;

        let url = self.endpoint();

        tokio::time::timeout(
            Duration::from_millis(self.timeout_ms),
            self.execute_request(&url, auth, request),
        )
        .await
        .map_err(|_| GenerationError::Timeout {
            timeout_ms: self.timeout_ms,
        })?
    }

    /// Execute a single request (internal)
    async fn execute_request(
        &self,
        url: &str,
        (auth_header, auth_value): (&'static str, HeaderValue),
        request: &GenerationRequest,
    ) -> BackendResult<String> {
        debug!(
            model = %self.model,
            prompt_chars = request.prompt_text().len(),
            temperature = request.temperature(),
            max_tokens = request.max_tokens(),
            "Calling generation backend"
        );

        let body = GenerateContentRequest::from(request);

        let response = self
            .client
            .post(url)
            .header(auth_header, auth_value)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            return Err(GenerationError::Backend {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        GenerateContentResponse::parse_text(&text)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            // Strip the URL so API keys carried in query strings never surface
            GenerationError::Transport {
                message: e.without_url().to_string(),
            }
        }
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let start = Instant::now();
        let result = self.try_generate(request).await;
        let latency = start.elapsed();

        match &result {
            Ok(text) => info!(
                model = %self.model,
                latency_ms = latency.as_millis(),
                completion_chars = text.len(),
                "Generation call succeeded"
            ),
            Err(e) => error!(
                model = %self.model,
                kind = %e.kind(),
                error = %e,
                latency_ms = latency.as_millis(),
                "Generation call failed"
            ),
        }

        result.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthScheme;
    use crate::error::ErrorKind;
    use crate::generator::credentials::{Credential, StaticCredentialProvider};

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            base_url: "https://example.test/".to_string(),
            model: "gemini-2.0-flash-lite".to_string(),
            credential_var: "UNUSED".to_string(),
            auth_scheme: AuthScheme::ApiKey,
        }
    }

    #[test]
    fn test_client_creation() {
        let generator = HttpGenerator::new(&config(), RequestConfig::default());
        assert!(generator.is_ok());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let generator = HttpGenerator::new(&config(), RequestConfig::default()).unwrap();
        assert_eq!(
            generator.endpoint(),
            "https://example.test/v1beta/models/gemini-2.0-flash-lite:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_credential_fails_fast() {
        let generator = HttpGenerator::with_credentials(
            &config(),
            RequestConfig::default(),
            Arc::new(StaticCredentialProvider::none()),
        )
        .unwrap();

        let result = generator
            .generate(&GenerationRequest::new("prompt", 0.7, 16))
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::AuthError));
    }

    #[tokio::test]
    async fn test_blank_credential_is_auth_error() {
        let generator = HttpGenerator::with_credentials(
            &config(),
            RequestConfig::default(),
            Arc::new(StaticCredentialProvider::new(Credential::ApiKey(String::new()))),
        )
        .unwrap();

        let result = generator
            .generate(&GenerationRequest::new("prompt", 0.7, 16))
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::AuthError));
    }
}

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, GenerationError};

/// A single generation request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    prompt_text: String,
    temperature: f64,
    max_tokens: u32,
}

impl GenerationRequest {
    /// Create a request from a rendered prompt and sampling parameters
    pub fn new(prompt_text: impl Into<String>, temperature: f64, max_tokens: u32) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            temperature,
            max_tokens,
        }
    }

    /// The full prompt text
    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    /// Sampling temperature
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Maximum number of output tokens
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

/// Outcome of a generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    /// The backend produced text.
    Success {
        /// Generated report text.
        text: String,
    },
    /// The call failed; `kind` names the failure category.
    Failure {
        /// Failure category.
        kind: ErrorKind,
        /// Human-readable error message.
        detail: String,
    },
}

impl GenerationResult {
    /// Create a success result
    pub fn success(text: impl Into<String>) -> Self {
        GenerationResult::Success { text: text.into() }
    }

    /// Create a failure result
    pub fn failure(kind: ErrorKind, detail: impl Into<String>) -> Self {
        GenerationResult::Failure {
            kind,
            detail: detail.into(),
        }
    }

    /// Whether this is a success
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }

    /// Generated text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            GenerationResult::Success { text } => Some(text),
            GenerationResult::Failure { .. } => None,
        }
    }

    /// Failure kind, if any
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            GenerationResult::Success { .. } => None,
            GenerationResult::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl From<Result<String, GenerationError>> for GenerationResult {
    fn from(result: Result<String, GenerationError>) -> Self {
        match result {
            Ok(text) => GenerationResult::Success { text },
            Err(e) => GenerationResult::Failure {
                kind: e.kind(),
                detail: e.to_string(),
            },
        }
    }
}

// ============================================================================
// Wire types (generateContent)
// ============================================================================

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    /// Prompt content blocks.
    pub contents: Vec<Content>,
    /// Sampling parameters.
    #[serde(rename = "generationConfig")]
    pub generation_config: WireGenerationConfig,
}

/// A content block made of parts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Author role, e.g. "model".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single content part
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Text payload; absent for non-text parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Sampling parameters on the wire
#[derive(Debug, Clone, Serialize)]
pub struct WireGenerationConfig {
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum output tokens.
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

/// Response body from `generateContent`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    /// Response candidates; the first one is used.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Token accounting.
    #[serde(rename = "usageMetadata")]
    pub usage_metadata: Option<UsageMetadata>,
}

/// One response candidate
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    /// Generated content.
    pub content: Option<Content>,
    /// Why generation stopped, e.g. "STOP" or "SAFETY".
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Deserialize)]
pub struct UsageMetadata {
    /// Tokens in the prompt.
    #[serde(rename = "promptTokenCount")]
    pub prompt_token_count: Option<u32>,
    /// Tokens in the candidates.
    #[serde(rename = "candidatesTokenCount")]
    pub candidates_token_count: Option<u32>,
    /// Total tokens billed.
    #[serde(rename = "totalTokenCount")]
    pub total_token_count: Option<u32>,
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts: vec![Part {
                    text: Some(request.prompt_text().to_string()),
                }],
            }],
            generation_config: WireGenerationConfig {
                temperature: request.temperature(),
                max_output_tokens: request.max_tokens(),
            },
        }
    }
}

impl GenerateContentResponse {
    /// Parse a raw response body, validating its shape.
    ///
    /// The text of the first candidate's parts is concatenated; a body that is
    /// not JSON, has no candidates, or carries no non-empty text is rejected.
    pub fn parse_text(body: &str) -> Result<String, GenerationError> {
        let response: GenerateContentResponse =
            serde_json::from_str(body).map_err(|e| GenerationError::MalformedResponse {
                message: format!("Failed to parse response: {}", e),
            })?;
        response.into_text()
    }

    /// Extract generated text from an already-decoded response
    pub fn into_text(self) -> Result<String, GenerationError> {
        let candidate =
            self.candidates
                .into_iter()
                .next()
                .ok_or_else(|| GenerationError::MalformedResponse {
                    message: "response contains no candidates".to_string(),
                })?;

        let content = candidate
            .content
            .ok_or_else(|| GenerationError::MalformedResponse {
                message: match candidate.finish_reason {
                    Some(reason) => format!("candidate has no content (finishReason: {})", reason),
                    None => "candidate has no content".to_string(),
                },
            })?;

        let text: String = content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .concat();

        if text.trim().is_empty() {
            return Err(GenerationError::MalformedResponse {
                message: "candidate content has no text".to_string(),
            });
        }

        Ok(text)
    }
}

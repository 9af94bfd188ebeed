//! Pluggable credential acquisition for the generation backend.
//!
//! A [`CredentialProvider`] is consulted once per call, before any network
//! traffic. Returning `None` makes the call fail fast with an auth error.

use reqwest::header::HeaderValue;
use std::env;
use std::fmt;

use crate::config::{AuthScheme, GeneratorConfig};
use crate::error::{BackendResult, GenerationError};

/// Credential material presented to the backend.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Sent as the `x-goog-api-key` header.
    ApiKey(String),
    /// Sent as `Authorization: Bearer <token>`.
    Bearer(String),
}

impl Credential {
    /// Wrap a raw secret according to the configured scheme
    pub fn for_scheme(scheme: AuthScheme, secret: impl Into<String>) -> Self {
        match scheme {
            AuthScheme::ApiKey => Credential::ApiKey(secret.into()),
            AuthScheme::Bearer => Credential::Bearer(secret.into()),
        }
    }

    /// Whether the secret is blank
    pub fn is_empty(&self) -> bool {
        match self {
            Credential::ApiKey(s) | Credential::Bearer(s) => s.trim().is_empty(),
        }
    }

    /// Header name and value for this credential.
    ///
    /// Secrets that cannot travel as a header value (control characters,
    /// trailing newlines) are rejected here, before any request is built.
    pub(crate) fn header(&self) -> BackendResult<(&'static str, HeaderValue)> {
        let (name, raw) = match self {
            Credential::ApiKey(key) => ("x-goog-api-key", key.clone()),
            Credential::Bearer(token) => ("Authorization", format!("Bearer {}", token)),
        };
        let mut value =
            HeaderValue::from_str(&raw).map_err(|_| GenerationError::InvalidCredential {
                message: "credential contains characters not allowed in an HTTP header"
                    .to_string(),
            })?;
        value.set_sensitive(true);
        Ok((name, value))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Credential::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// Source of credentials for generation calls.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialProvider: Send + Sync {
    /// Current credential, or `None` when none is configured.
    fn credential(&self) -> Option<Credential>;

    /// Short human-readable description of where credentials come from.
    fn describe(&self) -> String;
}

/// Reads the credential from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvCredentialProvider {
    var: String,
    scheme: AuthScheme,
}

impl EnvCredentialProvider {
    /// Create a provider reading `var`
    pub fn new(var: impl Into<String>, scheme: AuthScheme) -> Self {
        Self {
            var: var.into(),
            scheme,
        }
    }

    /// Create a provider from generator configuration
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.credential_var.clone(), config.auth_scheme)
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn credential(&self) -> Option<Credential> {
        env::var(&self.var)
            .ok()
            .map(|secret| Credential::for_scheme(self.scheme, secret))
            .filter(|c| !c.is_empty())
    }

    fn describe(&self) -> String {
        format!("environment variable {}", self.var)
    }
}

/// A fixed credential, or none at all.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Option<Credential>,
}

impl StaticCredentialProvider {
    /// Always yield `credential`
    pub fn new(credential: Credential) -> Self {
        Self {
            credential: Some(credential),
        }
    }

    /// Never yield a credential
    pub fn none() -> Self {
        Self { credential: None }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn credential(&self) -> Option<Credential> {
        self.credential.clone()
    }

    fn describe(&self) -> String {
        "static credential".to_string()
    }
}

//! Text-generation backend.
//!
//! [`Generator`] is the seam the pipeline calls through; [`HttpGenerator`] is
//! the production implementation speaking the `generateContent` wire format.

mod client;
pub mod credentials;
mod types;


pub use client::HttpGenerator;
pub use credentials::{
    Credential, CredentialProvider, EnvCredentialProvider, StaticCredentialProvider,
};
pub use types::*;

use async_trait::async_trait;

/// Sends a generation request to a backend.
///
/// Implementations never return a Rust error: every failure is folded into
/// [`GenerationResult::Failure`] with its [`ErrorKind`](crate::error::ErrorKind).
#[async_trait]
pub trait Generator: Send + Sync {
    /// Perform one generation call.
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult;
}

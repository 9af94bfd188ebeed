//! # Incident Triage
//!
//! A small orchestration core that turns a free-text network incident
//! description into a root-cause report.
//!
//! ## Stages
//!
//! - **Predict**: keyword classification into a category tag
//! - **Retrieve**: canned troubleshooting knowledge for that tag
//! - **Synthesize**: one call to a text-generation backend
//!
//! ## Architecture
//!
//! ```text
//! Caller (CLI) → Pipeline → Classifier → KnowledgeStore → PromptBuilder
//!                                                              ↓
//!                                 Generator (HTTP generateContent)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use incident_triage::{Config, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let pipeline = Pipeline::from_config(&config)?;
//!     let report = pipeline.analyze_incident("users report slow page loads").await;
//!     println!("{}", report.render());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Configuration loaded from environment variables.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// Text-generation backend client and types.
pub mod generator;
/// Prompt text for the root-cause report.
pub mod prompts;
/// Classification, knowledge retrieval, prompt building and the pipeline.
pub mod triage;

pub use config::Config;
pub use error::{AppError, AppResult, ErrorKind};
pub use generator::{GenerationRequest, GenerationResult, Generator};
pub use triage::{CategoryTag, Pipeline, PipelineReport};

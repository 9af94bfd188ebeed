//! Incident triage stages.
//!
//! - [`classify`]: keyword prediction of a [`CategoryTag`]
//! - [`KnowledgeStore`]: canned troubleshooting knowledge per tag
//! - [`PromptBuilder`]: renders the generation request
//! - [`Pipeline`]: runs the stages in order and produces a [`PipelineReport`]

mod classifier;
mod knowledge;
mod pipeline;
mod prompt;

pub use classifier::*;
pub use knowledge::*;
pub use pipeline::*;
pub use prompt::*;

use crate::error::{AppError, AppResult};

/// Reject incident text a caller should not submit.
///
/// The pipeline itself accepts any text; this is the caller-side guard.
/// Accepted text is returned unchanged so the prompt carries it verbatim.
pub fn validate_incident(text: &str) -> AppResult<&str> {
    if text.trim().is_empty() {
        return Err(AppError::Validation {
            field: "incident".to_string(),
            reason: "incident description cannot be empty".to_string(),
        });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_incident() {
        assert_eq!(validate_incident("  slow wifi \n").unwrap(), "  slow wifi \n");
        assert!(matches!(
            validate_incident(" \t\n"),
            Err(AppError::Validation { .. })
        ));
    }
}

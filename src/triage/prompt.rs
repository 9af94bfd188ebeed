//! Renders an incident and its retrieved knowledge into a generation request.

use super::classifier::CategoryTag;
use super::knowledge::KnowledgeRecord;
use crate::config::GenerationConfig;
use crate::generator::GenerationRequest;
use crate::prompts::{ANALYST_PREAMBLE, INCIDENT_HEADING, KNOWLEDGE_HEADING, REPORT_SECTIONS};

/// Builds generation requests with fixed sampling parameters
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    generation: GenerationConfig,
}

impl PromptBuilder {
    /// Create a builder using `generation` for every request
    pub fn new(generation: GenerationConfig) -> Self {
        Self { generation }
    }

    /// Render the prompt. The incident text is inserted verbatim.
    pub fn build(
        &self,
        incident: &str,
        tag: CategoryTag,
        record: &KnowledgeRecord,
    ) -> GenerationRequest {
        let prompt = format!(
            "{preamble}\n\n\
             {incident_heading}\n{incident}\n\n\
             **Predicted Category:** {tag}\n\n\
             {knowledge_heading}\n\
             Title: {title}\n\
             Content: {content}\n\
             Actionable Intelligence: {action}\n\n\
             {sections}",
            preamble = ANALYST_PREAMBLE,
            incident_heading = INCIDENT_HEADING,
            incident = incident,
            tag = tag.label(),
            knowledge_heading = KNOWLEDGE_HEADING,
            title = record.title,
            content = record.content,
            action = record.action,
            sections = REPORT_SECTIONS,
        );

        GenerationRequest::new(
            prompt,
            self.generation.temperature,
            self.generation.max_tokens,
        )
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::SECTION_LABELS;
    use crate::triage::knowledge::KnowledgeStore;

    fn build(incident: &str) -> GenerationRequest {
        let store = KnowledgeStore::builtin();
        PromptBuilder::default().build(
            incident,
            CategoryTag::HighLatency,
            store.lookup(CategoryTag::HighLatency),
        )
    }

    #[test]
    fn test_incident_text_is_verbatim() {
        let incident = "Users report {slow} loads; <script>\"quoted\"</script>\n\tsecond line";
        assert!(build(incident).prompt_text().contains(incident));
    }

    #[test]
    fn test_long_incident_not_truncated() {
        let incident = "slow ".repeat(10_000);
        assert!(build(&incident).prompt_text().contains(&incident));
    }

    #[test]
    fn test_prompt_requests_three_sections() {
        let req = build("slow");
        for label in SECTION_LABELS {
            assert!(req.prompt_text().contains(label), "{}", label);
        }
    }

    #[test]
    fn test_prompt_includes_knowledge_and_category() {
        let req = build("slow");
        assert!(req
            .prompt_text()
            .contains("Title: High Network Latency Troubleshooting Guide"));
        assert!(req.prompt_text().contains("**Predicted Category:** high latency"));
    }

    #[test]
    fn test_sampling_parameters_from_config() {
        let builder = PromptBuilder::new(GenerationConfig {
            temperature: 0.2,
            max_tokens: 256,
        });
        let record = KnowledgeStore::general_record();
        let req = builder.build("x", CategoryTag::Unknown, &record);
        assert_eq!(req.temperature(), 0.2);
        assert_eq!(req.max_tokens(), 256);
    }
}

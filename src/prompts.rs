//! Centralized prompt text for the root-cause report.
//!
//! Keeping the instructions here makes them easy to review and version
//! independently of the substitution logic in [`crate::triage::prompt`].

/// Role and task framing placed at the top of every prompt.
pub const ANALYST_PREAMBLE: &str = "Act as a senior network engineer and root cause analyst. \
Your task is to analyze a network incident and provide a clear, human-readable explanation of \
the root cause, including the 'why' behind the problem.

Based on the following incident description and retrieved network knowledge, generate a concise report.";

/// Heading for the incident text.
pub const INCIDENT_HEADING: &str = "**Incident Description:**";

/// Heading for the retrieved knowledge block.
pub const KNOWLEDGE_HEADING: &str = "**Retrieved Knowledge:**";

/// Required report layout.
pub const REPORT_SECTIONS: &str = r#"Your response must include the following sections:
1.  **Identified Problem:** A single sentence summarizing the core issue.
2.  **Root Cause Analysis:** A brief paragraph explaining the 'why' behind the problem. Use the provided knowledge and connect it to the incident description.
3.  **Actionable Intelligence:** Extract and rephrase the "actionable intelligence" to provide a clear, next-step recommendation."#;

/// Section labels the backend is asked to produce, in order.
pub const SECTION_LABELS: [&str; 3] = [
    "Identified Problem",
    "Root Cause Analysis",
    "Actionable Intelligence",
];

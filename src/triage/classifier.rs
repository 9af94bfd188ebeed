//! Keyword-based incident classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification bucket for an incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryTag {
    /// Slow responses or long round-trip times.
    HighLatency,
    /// Packets dropped in transit.
    PacketLoss,
    /// Destination host or service cannot be reached.
    ServiceUnreachable,
    /// No keyword rule matched.
    Unknown,
}

impl CategoryTag {
    /// Every tag, in declaration order
    pub const ALL: [CategoryTag; 4] = [
        CategoryTag::HighLatency,
        CategoryTag::PacketLoss,
        CategoryTag::ServiceUnreachable,
        CategoryTag::Unknown,
    ];

    /// Human-readable label, e.g. "high latency"
    pub fn label(&self) -> &'static str {
        match self {
            CategoryTag::HighLatency => "high latency",
            CategoryTag::PacketLoss => "packet loss",
            CategoryTag::ServiceUnreachable => "service unreachable",
            CategoryTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Ordered (keywords, tag) rules; the first rule with a matching keyword wins.
const RULES: &[(&[&str], CategoryTag)] = &[
    (&["latency", "slow"], CategoryTag::HighLatency),
    (&["packet", "drop"], CategoryTag::PacketLoss),
    (&["unreachable", "down"], CategoryTag::ServiceUnreachable),
];

/// Classify an incident description.
///
/// Matching is case-insensitive substring search, so "slowdown" matches
/// `slow` before it can match `down`.
pub fn classify(text: &str) -> CategoryTag {
    let text = text.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, tag)| *tag)
        .unwrap_or(CategoryTag::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_keywords_any_case() {
        for text in [
            "High LATENCY on the uplink",
            "users report slow page loads",
            "Everything is SLOW",
            "latency",
        ] {
            assert_eq!(classify(text), CategoryTag::HighLatency, "{}", text);
        }
    }

    #[test]
    fn test_packet_loss_keywords() {
        assert_eq!(classify("Packet loss on eth0"), CategoryTag::PacketLoss);
        assert_eq!(classify("VPN keeps dropping"), CategoryTag::PacketLoss);
    }

    #[test]
    fn test_unreachable_keywords() {
        assert_eq!(
            classify("API gateway unreachable from branch office"),
            CategoryTag::ServiceUnreachable
        );
        assert_eq!(classify("The DNS server is DOWN"), CategoryTag::ServiceUnreachable);
    }

    #[test]
    fn test_first_rule_wins() {
        // Mentions both latency and packets; latency rule comes first
        assert_eq!(
            classify("latency spikes and packet drops"),
            CategoryTag::HighLatency
        );
        assert_eq!(classify("slowdown"), CategoryTag::HighLatency);
    }

    #[test]
    fn test_no_match_is_unknown() {
        assert_eq!(classify("printer jammed"), CategoryTag::Unknown);
        assert_eq!(classify(""), CategoryTag::Unknown);
    }

    #[test]
    fn test_labels() {
        assert_eq!(CategoryTag::HighLatency.to_string(), "high latency");
        assert_eq!(CategoryTag::Unknown.label(), "unknown");
    }

    #[test]
    fn test_serialization() {
        assert_eq!(
            serde_json::to_string(&CategoryTag::ServiceUnreachable).unwrap(),
            "\"service_unreachable\""
        );
    }
}

//! Static troubleshooting knowledge keyed by category.

use serde::Serialize;
use std::collections::HashMap;

use super::classifier::CategoryTag;

/// Canned reference text for a known problem class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeRecord {
    /// Guide title.
    pub title: String,
    /// Background on causes and diagnostics.
    pub content: String,
    /// Recommended next step.
    pub action: String,
}

impl KnowledgeRecord {
    /// Create a record
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            action: action.into(),
        }
    }
}

/// Read-only table of knowledge records.
///
/// `lookup` is total: any tag without an entry resolves to the default record.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    records: HashMap<CategoryTag, KnowledgeRecord>,
    default_record: KnowledgeRecord,
}

impl KnowledgeStore {
    /// Store carrying the built-in network troubleshooting records
    pub fn builtin() -> Self {
        let mut records = HashMap::new();
        records.insert(
            CategoryTag::HighLatency,
            KnowledgeRecord::new(
                "High Network Latency Troubleshooting Guide",
                "High latency can be caused by network congestion, firewall misconfigurations, \
                 or a slow server response. Correlate with network traffic logs (e.g., via `ping` \
                 or `traceroute`) and server performance metrics. The root cause is often \
                 identified by analyzing packet loss and jitter.",
                "Action: Investigate firewall rules for any recent changes and check server \
                 CPU/memory usage during peak latency.",
            ),
        );
        records.insert(
            CategoryTag::PacketLoss,
            KnowledgeRecord::new(
                "Network Packet Loss Analysis",
                "Packet loss indicates dropped packets during transmission. Common causes include \
                 faulty cabling, overloaded network devices (routers, switches), or insufficient \
                 bandwidth. Check device health, CPU/memory usage, and review interface counters \
                 for discard rates.",
                "Action: Ping network hops to isolate the area of packet loss and check device \
                 health metrics for signs of an overload.",
            ),
        );
        records.insert(
            CategoryTag::ServiceUnreachable,
            KnowledgeRecord::new(
                "Service Unreachable Troubleshooting",
                "A 'service unreachable' error suggests a problem with DNS resolution, an \
                 incorrect IP address, or a service not running on the destination server. Start \
                 by verifying DNS and checking the service status (`systemctl status [service]`) \
                 on the target machine.",
                "Action: Perform a DNS lookup and verify the service is running. If both are \
                 correct, check routing tables for misconfigurations.",
            ),
        );

        Self::with_records(records, Self::general_record())
    }

    /// Store built from a custom table and fallback record
    pub fn with_records(
        records: HashMap<CategoryTag, KnowledgeRecord>,
        default_record: KnowledgeRecord,
    ) -> Self {
        Self {
            records,
            default_record,
        }
    }

    /// Record used for `Unknown` and for any tag missing from the table
    pub fn general_record() -> KnowledgeRecord {
        KnowledgeRecord::new(
            "General Network Troubleshooting",
            "No specific match found in the knowledge base. The analysis will proceed with \
             general best practices.",
            "Action: Start with basic checks like connectivity (`ping`), device status, and \
             recent configuration changes.",
        )
    }

    /// Knowledge for `tag`
    pub fn lookup(&self, tag: CategoryTag) -> &KnowledgeRecord {
        self.records.get(&tag).unwrap_or(&self.default_record)
    }
}

impl Default for KnowledgeStore {
    fn default() -> Self {
        Self::builtin()
    }
}

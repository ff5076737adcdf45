use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::finding::{Finding, Severity};

/// The result produced by one agent for one file.
///
/// Findings are kept in production order; nothing downstream re-sorts them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    /// Name of the agent that produced this result.
    pub agent_name: String,
    /// Findings in the order the agent produced them.
    pub findings: Vec<Finding>,
    /// Wall-clock duration of the agent run in milliseconds.
    pub duration_ms: u64,
    /// Instant the result settled.
    pub completed_at: DateTime<Utc>,
    /// True when the agent exhausted its retry budget or produced
    /// unparseable output and the findings were replaced by a single
    /// diagnostic entry.
    pub degraded: bool,
}

impl AgentResult {
    pub fn completed(agent_name: impl Into<String>, findings: Vec<Finding>, duration_ms: u64) -> Self {
        Self {
            agent_name: agent_name.into(),
            findings,
            duration_ms,
            completed_at: Utc::now(),
            degraded: false,
        }
    }

    /// Build a degraded result carrying a single diagnostic finding.
    pub fn degraded(agent_name: impl Into<String>, diagnostic: Finding, duration_ms: u64) -> Self {
        Self {
            agent_name: agent_name.into(),
            findings: vec![diagnostic],
            duration_ms,
            completed_at: Utc::now(),
            degraded: true,
        }
    }

    /// Returns a map of severity level to the count of findings at that severity.
    pub fn finding_counts(&self) -> HashMap<Severity, usize> {
        let mut counts = HashMap::new();
        for finding in &self.findings {
            *counts.entry(finding.severity).or_insert(0) += 1;
        }
        counts
    }

    /// Returns the total number of findings in this result.
    pub fn total_findings(&self) -> usize {
        self.findings.len()
    }
}

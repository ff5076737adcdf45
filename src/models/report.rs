use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::finding::{Finding, Severity};

/// file path -> agent name -> findings in production order.
///
/// Ordered maps keep serialization and summary recomputation deterministic:
/// two identical snapshots always yield byte-identical output.
pub type FileResults = BTreeMap<String, BTreeMap<String, Vec<Finding>>>;

/// Summary statistics over a review's `file_results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub total_files: usize,
    pub total_issues: usize,
    pub critical_issues: usize,
    /// Count per severity; all five levels are always present.
    pub severity_breakdown: BTreeMap<Severity, usize>,
    /// Count per opaque category key.
    pub category_breakdown: BTreeMap<String, usize>,
    pub duration_seconds: f64,
    /// Agents with at least one recorded entry, sorted.
    pub agents_used: Vec<String>,
}

/// The sealed output of one review. Produced only after every task for the
/// review has settled; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewReport {
    pub pr_number: u64,
    pub repo_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub summary: ReviewSummary,
    pub file_results: FileResults,
}

impl ReviewReport {
    /// Total findings across all files and agents.
    pub fn total_findings(&self) -> usize {
        self.file_results
            .values()
            .flat_map(|agents| agents.values())
            .map(|findings| findings.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_stable_field_names() {
        let report = ReviewReport {
            pr_number: 42,
            repo_name: "owner/repo".into(),
            start_time: Utc::now(),
            end_time: Utc::now(),
            summary: ReviewSummary {
                total_files: 0,
                total_issues: 0,
                critical_issues: 0,
                severity_breakdown: Severity::ALL.iter().map(|s| (*s, 0)).collect(),
                category_breakdown: BTreeMap::new(),
                duration_seconds: 0.0,
                agents_used: vec![],
            },
            file_results: BTreeMap::new(),
        };

        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("pr_number").is_some());
        assert!(value.get("repo_name").is_some());
        assert!(value.get("file_results").is_some());
        let summary = value.get("summary").unwrap();
        assert!(summary.get("severity_breakdown").unwrap().get("CRITICAL").is_some());
        assert!(summary.get("agents_used").is_some());
        assert!(summary.get("duration_seconds").is_some());
    }
}

//! Per-review result aggregation.
//!
//! One aggregator instance is owned by each review. All writes go through
//! the review's task-completion handlers, one at a time, behind the lock;
//! nothing else touches the state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::models::{AgentResult, FileResults, ReviewSummary, Severity};

/// A consistent view of a review's accumulated state: the file results plus
/// a summary recomputed from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSnapshot {
    pub file_results: FileResults,
    pub summary: ReviewSummary,
}

#[derive(Debug, Default)]
struct AggregateState {
    file_results: FileResults,
    /// Set once the report is built; later writes are anomalies.
    sealed: bool,
    /// Set on cancellation; partial results are gone for good.
    discarded: bool,
}

/// Collects settled agent results for one review and computes summary
/// statistics on demand.
pub struct ResultAggregator {
    review_id: Uuid,
    start_time: DateTime<Utc>,
    state: RwLock<AggregateState>,
}

impl ResultAggregator {
    pub fn new(review_id: Uuid) -> Self {
        Self {
            review_id,
            start_time: Utc::now(),
            state: RwLock::new(AggregateState::default()),
        }
    }

    pub fn review_id(&self) -> Uuid {
        self.review_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Record one settled agent result, preserving the findings' production
    /// order.
    ///
    /// A duplicate (file, agent) record means the scheduler broke its
    /// contract; the later write overwrites and the fault is logged, never
    /// silently tolerated. Records arriving after sealing or cancellation
    /// are discarded as scheduling anomalies.
    pub async fn record(&self, file_path: &str, agent_name: &str, result: AgentResult) {
        let mut state = self.state.write().await;

        if state.sealed || state.discarded {
            warn!(
                review_id = %self.review_id,
                file = file_path,
                agent = agent_name,
                "Late result for a finalized or cancelled review, discarding"
            );
            return;
        }

        debug!(
            review_id = %self.review_id,
            file = file_path,
            agent = agent_name,
            findings = result.findings.len(),
            degraded = result.degraded,
            duration_ms = result.duration_ms,
            "Recording agent result"
        );

        let slot = state.file_results.entry(file_path.to_string()).or_default();
        if slot.insert(agent_name.to_string(), result.findings).is_some() {
            error!(
                review_id = %self.review_id,
                file = file_path,
                agent = agent_name,
                "Duplicate (file, agent) result overwrote an earlier record"
            );
        }
    }

    /// Clone the current state and recompute the summary from scratch.
    pub async fn snapshot(&self) -> ReviewSnapshot {
        let state = self.state.read().await;
        let duration = (Utc::now() - self.start_time).num_milliseconds().max(0) as f64 / 1000.0;
        ReviewSnapshot {
            file_results: state.file_results.clone(),
            summary: summarize(&state.file_results, duration),
        }
    }

    /// Stop accepting writes and hand the accumulated results to the report
    /// builder.
    pub async fn seal(&self) -> FileResults {
        let mut state = self.state.write().await;
        state.sealed = true;
        std::mem::take(&mut state.file_results)
    }

    /// Drop all partial results for a cancelled review.
    pub async fn discard(&self) {
        let mut state = self.state.write().await;
        state.discarded = true;
        state.file_results.clear();
    }
}

/// Pure summary computation over `file_results`.
///
/// Always a full pass, never incremental bookkeeping: recomputing twice from
/// the same snapshot must yield identical summaries.
pub fn summarize(file_results: &FileResults, duration_seconds: f64) -> ReviewSummary {
    let mut severity_breakdown: std::collections::BTreeMap<Severity, usize> =
        Severity::ALL.iter().map(|s| (*s, 0)).collect();
    let mut category_breakdown = std::collections::BTreeMap::new();
    let mut agents_used = std::collections::BTreeSet::new();
    let mut total_issues = 0;

    for agents in file_results.values() {
        for (agent_name, findings) in agents {
            agents_used.insert(agent_name.clone());
            for finding in findings {
                total_issues += 1;
                *severity_breakdown.entry(finding.severity).or_insert(0) += 1;
                *category_breakdown.entry(finding.category.clone()).or_insert(0) += 1;
            }
        }
    }

    let critical_issues = severity_breakdown[&Severity::Critical];

    ReviewSummary {
        total_files: file_results.len(),
        total_issues,
        critical_issues,
        severity_breakdown,
        category_breakdown,
        duration_seconds,
        agents_used: agents_used.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Finding;

    fn finding(line: u32, severity: Severity, category: &str) -> Finding {
        Finding::new(line, severity, category, "msg", "fix", "f.py")
    }

    async fn scenario_a_aggregator() -> ResultAggregator {
        // f.py: Security finds 2 CRITICAL + 1 LOW, Performance finds 1 HIGH.
        let aggregator = ResultAggregator::new(Uuid::new_v4());
        aggregator
            .record(
                "f.py",
                "Security",
                AgentResult::completed(
                    "Security",
                    vec![
                        finding(3, Severity::Critical, "sql_injection"),
                        finding(8, Severity::Critical, "secrets"),
                        finding(20, Severity::Low, "crypto"),
                    ],
                    100,
                ),
            )
            .await;
        aggregator
            .record(
                "f.py",
                "Performance",
                AgentResult::completed(
                    "Performance",
                    vec![finding(11, Severity::High, "complexity|database")],
                    80,
                ),
            )
            .await;
        aggregator
    }

    #[tokio::test]
    async fn test_summary_counts_match_scenario() {
        let aggregator = scenario_a_aggregator().await;
        let snapshot = aggregator.snapshot().await;
        let summary = &snapshot.summary;

        assert_eq!(summary.total_files, 1);
        assert_eq!(summary.total_issues, 4);
        assert_eq!(summary.critical_issues, 2);
        assert_eq!(summary.severity_breakdown[&Severity::Critical], 2);
        assert_eq!(summary.severity_breakdown[&Severity::High], 1);
        assert_eq!(summary.severity_breakdown[&Severity::Low], 1);
        assert_eq!(summary.severity_breakdown[&Severity::Medium], 0);
        assert_eq!(summary.severity_breakdown[&Severity::Info], 0);
        assert_eq!(summary.agents_used, vec!["Performance", "Security"]);
    }

    #[tokio::test]
    async fn test_summary_invariants() {
        let aggregator = scenario_a_aggregator().await;
        let summary = aggregator.snapshot().await.summary;

        let severity_sum: usize = summary.severity_breakdown.values().sum();
        let category_sum: usize = summary.category_breakdown.values().sum();
        assert_eq!(summary.total_issues, severity_sum);
        assert_eq!(summary.total_issues, category_sum);
        assert_eq!(summary.critical_issues, summary.severity_breakdown[&Severity::Critical]);
    }

    #[tokio::test]
    async fn test_compound_category_counted_as_one_key() {
        let aggregator = scenario_a_aggregator().await;
        let summary = aggregator.snapshot().await.summary;
        assert_eq!(summary.category_breakdown["complexity|database"], 1);
        assert!(!summary.category_breakdown.contains_key("complexity"));
        assert!(!summary.category_breakdown.contains_key("database"));
    }

    #[tokio::test]
    async fn test_summary_recomputation_is_deterministic() {
        let aggregator = scenario_a_aggregator().await;
        let snapshot = aggregator.snapshot().await;
        let a = summarize(&snapshot.file_results, 1.5);
        let b = summarize(&snapshot.file_results, 1.5);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[tokio::test]
    async fn test_production_order_preserved() {
        let aggregator = ResultAggregator::new(Uuid::new_v4());
        let out_of_line_order = vec![
            finding(40, Severity::Low, "naming"),
            finding(2, Severity::High, "auth"),
            finding(17, Severity::Info, "comment"),
        ];
        aggregator
            .record("f.py", "Style", AgentResult::completed("Style", out_of_line_order.clone(), 10))
            .await;

        let snapshot = aggregator.snapshot().await;
        let stored = &snapshot.file_results["f.py"]["Style"];
        let lines: Vec<u32> = stored.iter().map(|f| f.line_number).collect();
        assert_eq!(lines, vec![40, 2, 17]);
    }

    #[tokio::test]
    async fn test_duplicate_record_overwrites() {
        let aggregator = ResultAggregator::new(Uuid::new_v4());
        aggregator
            .record("f.py", "Security", AgentResult::completed("Security", vec![finding(1, Severity::High, "auth")], 10))
            .await;
        aggregator
            .record("f.py", "Security", AgentResult::completed("Security", vec![finding(2, Severity::Low, "crypto")], 10))
            .await;

        let snapshot = aggregator.snapshot().await;
        let stored = &snapshot.file_results["f.py"]["Security"];
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].line_number, 2);
    }

    #[tokio::test]
    async fn test_record_after_seal_is_discarded() {
        let aggregator = scenario_a_aggregator().await;
        let sealed = aggregator.seal().await;
        assert_eq!(sealed.len(), 1);

        aggregator
            .record("late.py", "Security", AgentResult::completed("Security", vec![finding(1, Severity::High, "auth")], 10))
            .await;
        let snapshot = aggregator.snapshot().await;
        assert!(snapshot.file_results.is_empty());
    }

    #[tokio::test]
    async fn test_discard_clears_partial_results() {
        let aggregator = scenario_a_aggregator().await;
        aggregator.discard().await;
        let snapshot = aggregator.snapshot().await;
        assert!(snapshot.file_results.is_empty());
        assert_eq!(snapshot.summary.total_issues, 0);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&FileResults::new(), 0.0);
        assert_eq!(summary.total_files, 0);
        assert_eq!(summary.total_issues, 0);
        assert_eq!(summary.severity_breakdown.len(), 5);
        assert!(summary.agents_used.is_empty());
    }
}

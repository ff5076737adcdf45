//! Configuration surface consumed by the orchestration core.
//!
//! Values are supplied by the embedding application (file/env parsing is its
//! concern); everything here deserializes with serde and carries working
//! defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_max_concurrent_tasks() -> usize {
    5
}

fn default_requests_per_minute() -> u32 {
    60
}

fn default_task_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_agents() -> Vec<String> {
    vec![
        "Security".to_string(),
        "Performance".to_string(),
        "Style".to_string(),
        "Documentation".to_string(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Global ceiling on concurrently running (file, agent) tasks, shared
    /// across all active reviews.
    #[serde(default = "default_max_concurrent_tasks")]
    pub max_concurrent_tasks: usize,

    /// Process-wide ceiling on model calls per minute.
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,

    /// Per-attempt timeout for one model call.
    #[serde(default = "default_task_timeout_secs")]
    pub task_timeout_secs: u64,

    /// Retries after the initial attempt before a task degrades.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Optional wall-clock bound for a whole review. Expiry triggers the
    /// review's cancellation token; there is no per-review timeout beyond
    /// that.
    #[serde(default)]
    pub review_timeout_secs: Option<u64>,

    /// Agents to run when a request does not name its own set.
    #[serde(default = "default_agents")]
    pub default_agents: Vec<String>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: default_max_concurrent_tasks(),
            requests_per_minute: default_requests_per_minute(),
            task_timeout_secs: default_task_timeout_secs(),
            max_retries: default_max_retries(),
            review_timeout_secs: None,
            default_agents: default_agents(),
        }
    }
}

impl OrchestratorConfig {
    pub fn task_timeout(&self) -> Duration {
        Duration::from_secs(self.task_timeout_secs)
    }

    pub fn review_timeout(&self) -> Option<Duration> {
        self.review_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.max_concurrent_tasks, 5);
        assert_eq!(config.requests_per_minute, 60);
        assert_eq!(config.task_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert!(config.review_timeout().is_none());
        assert_eq!(config.default_agents.len(), 4);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: OrchestratorConfig =
            serde_json::from_str(r#"{"max_concurrent_tasks": 2, "review_timeout_secs": 300}"#)
                .unwrap();
        assert_eq!(config.max_concurrent_tasks, 2);
        assert_eq!(config.review_timeout(), Some(Duration::from_secs(300)));
        assert_eq!(config.requests_per_minute, 60);
    }
}

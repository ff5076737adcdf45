use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::OrchestratorConfig;
use crate::errors::{with_retry, CriticError, RetryConfig};
use crate::limiter::RateLimiter;
use crate::llm::ModelProvider;
use crate::models::{AgentResult, FileChange, Finding, Severity};
use super::parser;
use super::registry::AgentProfile;

/// Capability interface for one review agent: analyze one changed file and
/// settle with a result, no matter what went wrong underneath.
#[async_trait]
pub trait ReviewAgent: Send + Sync {
    fn name(&self) -> &str;

    async fn analyze(&self, file: &FileChange) -> AgentResult;
}

/// Model-backed agent executor for one (file, agent) analysis unit.
///
/// Each attempt takes a rate-limiter slot before calling the model and is
/// bounded by the per-task timeout. Transient failures retry with classified
/// backoff; exhausted retries and unparseable output degrade to a single
/// `agent_failure` diagnostic finding instead of failing the review.
pub struct AgentRunner {
    profile: AgentProfile,
    llm: Arc<dyn ModelProvider>,
    limiter: Arc<RateLimiter>,
    timeout: Duration,
    retry: RetryConfig,
}

impl AgentRunner {
    pub fn new(
        profile: AgentProfile,
        llm: Arc<dyn ModelProvider>,
        limiter: Arc<RateLimiter>,
        config: &OrchestratorConfig,
    ) -> Self {
        Self {
            profile,
            llm,
            limiter,
            timeout: config.task_timeout(),
            retry: RetryConfig { max_retries: config.max_retries },
        }
    }

    async fn attempt(&self, file: &FileChange) -> Result<Vec<Finding>, CriticError> {
        self.limiter.acquire().await;

        let prompt = self.build_prompt(file);
        let call = self.llm.complete(&prompt, Some(&self.profile.system_prompt));
        let response = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| {
                CriticError::Timeout(format!(
                    "{} timed out after {}s on {}",
                    self.profile.name,
                    self.timeout.as_secs(),
                    file.path
                ))
            })??;

        let findings = parser::parse_findings(&response.content, &file.path)?;
        Ok(parser::filter_findings(findings, self.profile.max_findings))
    }

    fn build_prompt(&self, file: &FileChange) -> String {
        let mut prompt = format!(
            "Review the following code changes in {}:\n\n=== CODE DIFF ===\n{}\n",
            file.path, file.diff
        );

        if let Some(content) = &file.content {
            let mut end = content.len().min(3000);
            while !content.is_char_boundary(end) {
                end -= 1;
            }
            prompt.push_str(&format!(
                "\n=== FULL FILE CONTENT (truncated) ===\n{}\n",
                &content[..end]
            ));
        }

        prompt.push_str(&format!(
            "\nProvide your review as a JSON object:\n\
             {{\"issues\": [{{\"line_number\": <int>, \
             \"severity\": \"CRITICAL|HIGH|MEDIUM|LOW|INFO\", \
             \"category\": \"{}\", \
             \"message\": \"description of the issue\", \
             \"suggestion\": \"how to fix it\"}}]}}\n\
             Focus on issues relevant to your expertise. Return only valid JSON.",
            self.profile.category_hint
        ));

        prompt
    }

    fn failure_finding(&self, file: &FileChange, error: &CriticError) -> Finding {
        Finding::new(
            0,
            Severity::Low,
            "agent_failure",
            format!("{} could not complete its review: {}", self.profile.name, error),
            "Re-run the review or check the model provider.",
            &file.path,
        )
    }
}

#[async_trait]
impl ReviewAgent for AgentRunner {
    fn name(&self) -> &str {
        &self.profile.name
    }

    async fn analyze(&self, file: &FileChange) -> AgentResult {
        let start = Instant::now();

        let outcome = with_retry(&self.profile.name, &self.retry, || self.attempt(file)).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(findings) => {
                info!(
                    agent = %self.profile.name,
                    file = %file.path,
                    duration_ms,
                    findings = findings.len(),
                    "Agent completed review"
                );
                AgentResult::completed(&self.profile.name, findings, duration_ms)
            }
            Err(e) => {
                warn!(
                    agent = %self.profile.name,
                    file = %file.path,
                    duration_ms,
                    error = %e,
                    "Agent failed, degrading to diagnostic finding"
                );
                AgentResult::degraded(&self.profile.name, self.failure_finding(file, &e), duration_ms)
            }
        }
    }
}

//! Fans a review request out into (file, agent) tasks and joins them back
//! into a finalized report.
//!
//! Concurrency is bounded by a global semaphore shared across all active
//! reviews: a review with many files competes for the same pool instead of
//! starving others. Cancellation is cooperative; in-flight tasks observe it
//! at their next suspension point and release their slots promptly.

pub mod state;

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::aggregate::{ResultAggregator, ReviewSnapshot};
use crate::agents::{AgentRegistry, AgentRunner, ReviewAgent};
use crate::errors::CriticError;
use crate::llm::ModelProvider;
use crate::models::{FileChange, ReviewReport, ReviewRequest};
use crate::reporting::builder;

pub use state::{ReviewHandle, ReviewPhase, SchedulerContext};

struct ReviewEntry {
    cancel: CancellationToken,
    aggregator: Arc<ResultAggregator>,
    phase_rx: watch::Receiver<ReviewPhase>,
}

/// Entry point of the orchestration core: submit, cancel, await.
pub struct TaskScheduler {
    ctx: SchedulerContext,
    registry: Arc<AgentRegistry>,
    llm: Arc<dyn ModelProvider>,
    reviews: DashMap<Uuid, ReviewEntry>,
}

impl TaskScheduler {
    pub fn new(ctx: SchedulerContext, registry: AgentRegistry, llm: Arc<dyn ModelProvider>) -> Self {
        Self {
            ctx,
            registry: Arc::new(registry),
            llm,
            reviews: DashMap::new(),
        }
    }

    /// Expand the request into tasks and start dispatching them.
    ///
    /// The only errors surfaced to the caller are failures to start: an
    /// empty file set, an empty agent set, or an unknown agent name. Every
    /// per-task fault after this point is absorbed into the report.
    pub fn submit(&self, request: ReviewRequest) -> Result<ReviewHandle, CriticError> {
        if request.files.is_empty() {
            return Err(CriticError::Rejected("no files to review".into()));
        }

        let agent_names = request
            .agents
            .clone()
            .unwrap_or_else(|| self.ctx.config.default_agents.clone());
        if agent_names.is_empty() {
            return Err(CriticError::Rejected("no agents enabled".into()));
        }
        let profiles = self.registry.resolve(&agent_names)?;

        // Duplicate paths in the request would violate the aggregator's
        // (file, agent) uniqueness contract; drop them up front.
        let mut seen = HashSet::new();
        let files: Vec<Arc<FileChange>> = request
            .files
            .into_iter()
            .filter(|f| {
                let fresh = seen.insert(f.path.clone());
                if !fresh {
                    warn!(file = %f.path, "Duplicate file path in request, keeping first occurrence");
                }
                fresh
            })
            .map(Arc::new)
            .collect();

        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        let aggregator = Arc::new(ResultAggregator::new(id));
        let (phase_tx, phase_rx) = watch::channel(ReviewPhase::Running);

        let agents: Vec<Arc<dyn ReviewAgent>> = profiles
            .into_iter()
            .map(|profile| {
                Arc::new(AgentRunner::new(
                    profile,
                    self.llm.clone(),
                    self.ctx.limiter.clone(),
                    &self.ctx.config,
                )) as Arc<dyn ReviewAgent>
            })
            .collect();

        info!(
            review_id = %id,
            pr_number = request.pr_number,
            repo = %request.repo_name,
            files = files.len(),
            agents = agents.len(),
            "Review submitted"
        );

        // Review-level timeout is just a wrapping cancellation trigger.
        if let Some(deadline) = self.ctx.config.review_timeout() {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(deadline) => {
                        warn!(review_id = %id, "Review deadline exceeded, cancelling");
                        cancel.cancel();
                    }
                }
            });
        }

        tokio::spawn(run_review(
            self.ctx.clone(),
            request.pr_number,
            request.repo_name,
            files,
            agents,
            aggregator.clone(),
            cancel.clone(),
            phase_tx,
        ));

        self.reviews.insert(id, ReviewEntry { cancel, aggregator, phase_rx });
        Ok(ReviewHandle { id })
    }

    /// Cancel a review: stop dispatching, unwind in-flight tasks at their
    /// next suspension point, discard partial results.
    pub fn cancel(&self, handle: &ReviewHandle) {
        if let Some(entry) = self.reviews.get(&handle.id) {
            info!(review_id = %handle.id, "Cancelling review");
            entry.cancel.cancel();
        } else {
            warn!(review_id = %handle.id, "Cancel requested for unknown review");
        }
    }

    /// Block until every task for the review has settled.
    ///
    /// Returns the sealed report, or `CriticError::Cancelled` if the review
    /// was cancelled before it finished.
    pub async fn await_completion(&self, handle: &ReviewHandle) -> Result<ReviewReport, CriticError> {
        let mut phase_rx = self
            .reviews
            .get(&handle.id)
            .map(|entry| entry.phase_rx.clone())
            .ok_or_else(|| CriticError::Scheduling(format!("unknown review {}", handle.id)))?;

        let phase = phase_rx
            .wait_for(ReviewPhase::is_settled)
            .await
            .map_err(|_| CriticError::Internal("review supervisor dropped its phase channel".into()))?
            .clone();

        match phase {
            ReviewPhase::Finished(report) => Ok((*report).clone()),
            ReviewPhase::Cancelled => Err(CriticError::Cancelled),
            ReviewPhase::Running => Err(CriticError::Internal("settled review still running".into())),
        }
    }

    /// Fetch the finalized report without blocking, if the review is done.
    pub fn report(&self, handle: &ReviewHandle) -> Option<Arc<ReviewReport>> {
        let entry = self.reviews.get(&handle.id)?;
        let report = match &*entry.phase_rx.borrow() {
            ReviewPhase::Finished(report) => Some(report.clone()),
            _ => None,
        };
        report
    }

    /// Partial file results plus a running summary for an in-flight review.
    pub async fn snapshot(&self, handle: &ReviewHandle) -> Option<ReviewSnapshot> {
        let aggregator = self.reviews.get(&handle.id)?.aggregator.clone();
        Some(aggregator.snapshot().await)
    }

    /// Drop the bookkeeping for a settled review. No-op while running.
    pub fn forget(&self, handle: &ReviewHandle) {
        let settled = self
            .reviews
            .get(&handle.id)
            .map(|entry| entry.phase_rx.borrow().is_settled())
            .unwrap_or(false);
        if settled {
            self.reviews.remove(&handle.id);
        }
    }

    pub fn active_reviews(&self) -> usize {
        self.reviews
            .iter()
            .filter(|entry| !entry.phase_rx.borrow().is_settled())
            .count()
    }
}

/// Supervisor for one review: spawn all tasks, join them, then finalize or
/// discard.
#[allow(clippy::too_many_arguments)]
async fn run_review(
    ctx: SchedulerContext,
    pr_number: u64,
    repo_name: String,
    files: Vec<Arc<FileChange>>,
    agents: Vec<Arc<dyn ReviewAgent>>,
    aggregator: Arc<ResultAggregator>,
    cancel: CancellationToken,
    phase_tx: watch::Sender<ReviewPhase>,
) {
    let review_id = aggregator.review_id();
    let mut tasks = JoinSet::new();

    for file in &files {
        for agent in &agents {
            let file = file.clone();
            let agent = agent.clone();
            let slots = ctx.slots.clone();
            let cancel = cancel.clone();
            let aggregator = aggregator.clone();

            tasks.spawn(async move {
                // Hold the worker-pool slot only while actually running; a
                // cancelled task gives it back at once.
                let _permit = tokio::select! {
                    _ = cancel.cancelled() => return,
                    permit = slots.acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(_) => return,
                    },
                };

                let result = tokio::select! {
                    _ = cancel.cancelled() => return,
                    result = agent.analyze(&file) => result,
                };

                aggregator.record(&file.path, agent.name(), result).await;
            });
        }
    }

    // Join barrier: every task settles (success, degraded, or cancelled)
    // before the review does.
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!(review_id = %review_id, error = %e, "Review task panicked");
        }
    }

    if cancel.is_cancelled() {
        aggregator.discard().await;
        info!(review_id = %review_id, "Review cancelled, partial results discarded");
        let _ = phase_tx.send(ReviewPhase::Cancelled);
        return;
    }

    let report = builder::finalize_report(pr_number, &repo_name, &aggregator).await;
    info!(
        review_id = %review_id,
        total_issues = report.summary.total_issues,
        critical_issues = report.summary.critical_issues,
        duration_seconds = report.summary.duration_seconds,
        "Review finalized"
    );
    let _ = phase_tx.send(ReviewPhase::Finished(Arc::new(report)));
}

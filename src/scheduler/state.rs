use std::sync::Arc;

use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::config::OrchestratorConfig;
use crate::limiter::RateLimiter;
use crate::models::ReviewReport;

/// Shared mutable resources for all reviews: the global worker-pool ceiling
/// and the process-wide rate limiter. Passed explicitly into the scheduler
/// and runners rather than hidden in a singleton, so tests can inject their
/// own limits.
#[derive(Clone)]
pub struct SchedulerContext {
    pub config: Arc<OrchestratorConfig>,
    pub limiter: Arc<RateLimiter>,
    /// Bounds concurrently running (file, agent) tasks across all reviews.
    pub slots: Arc<Semaphore>,
}

impl SchedulerContext {
    pub fn new(config: OrchestratorConfig) -> Self {
        let limiter = Arc::new(RateLimiter::new(config.requests_per_minute));
        let slots = Arc::new(Semaphore::new(config.max_concurrent_tasks.max(1)));
        Self {
            config: Arc::new(config),
            limiter,
            slots,
        }
    }
}

/// Opaque handle to a submitted review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReviewHandle {
    pub(crate) id: Uuid,
}

impl ReviewHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl std::fmt::Display for ReviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.id.fmt(f)
    }
}

/// Terminal-state machine observed by `await_completion`.
#[derive(Debug, Clone)]
pub enum ReviewPhase {
    Running,
    Finished(Arc<ReviewReport>),
    Cancelled,
}

impl ReviewPhase {
    pub fn is_settled(&self) -> bool {
        !matches!(self, ReviewPhase::Running)
    }
}

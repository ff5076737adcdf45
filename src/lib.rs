//! Orchestration core for multi-agent code review.
//!
//! A review request (repo, PR number, changed files, enabled agents) is
//! expanded into one task per (file, agent) pair. Tasks run on a bounded
//! worker pool shared across all active reviews, each model call gated by a
//! process-wide rate limiter. Per-task failures never abort a review: an
//! agent that exhausts its retry budget degrades to a single diagnostic
//! finding. Once every task has settled, the results are assembled into a
//! severity/category-ranked [`models::ReviewReport`].
//!
//! The model transport is injected as an [`llm::ModelProvider`] trait object;
//! GitHub access, webhook handling, and prompt/retrieval subsystems live
//! outside this crate.

pub mod aggregate;
pub mod agents;
pub mod config;
pub mod errors;
pub mod limiter;
pub mod llm;
pub mod models;
pub mod reporting;
pub mod scheduler;

pub use config::OrchestratorConfig;
pub use errors::CriticError;
pub use models::{AgentResult, FileChange, Finding, ReviewReport, ReviewRequest, Severity};
pub use scheduler::{ReviewHandle, SchedulerContext, TaskScheduler};

use serde::{Deserialize, Serialize};

/// One changed file within a review request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChange {
    /// Repository-relative path.
    pub path: String,
    /// Unified diff of the change.
    pub diff: String,
    /// Full file content after the change, if the caller has it.
    pub content: Option<String>,
}

impl FileChange {
    pub fn new(path: impl Into<String>, diff: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            diff: diff.into(),
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// A request to review one pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub pr_number: u64,
    /// Repository name in `owner/repo` form.
    pub repo_name: String,
    pub files: Vec<FileChange>,
    /// Agents to run for this review. `None` uses the configured default set.
    #[serde(default)]
    pub agents: Option<Vec<String>>,
}

impl ReviewRequest {
    pub fn new(pr_number: u64, repo_name: impl Into<String>, files: Vec<FileChange>) -> Self {
        Self {
            pr_number,
            repo_name: repo_name.into(),
            files,
            agents: None,
        }
    }

    pub fn with_agents(mut self, agents: Vec<String>) -> Self {
        self.agents = Some(agents);
        self
    }
}

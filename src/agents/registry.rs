use std::collections::BTreeMap;

use crate::errors::CriticError;

/// Static description of one review agent: how it frames its expertise to
/// the model and how much output it is allowed to keep.
#[derive(Debug, Clone)]
pub struct AgentProfile {
    pub name: String,
    /// System prompt establishing the agent's specialty.
    pub system_prompt: String,
    /// Category vocabulary suggested to the model for this agent.
    pub category_hint: String,
    /// Findings kept per file after dedup and ranking.
    pub max_findings: usize,
}

impl AgentProfile {
    pub fn new(
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        category_hint: impl Into<String>,
        max_findings: usize,
    ) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            category_hint: category_hint.into(),
            max_findings,
        }
    }
}

/// Maps agent names to profiles. The enabled set for a review is resolved
/// against this at submit time; unknown names reject the request instead of
/// failing mid-flight.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    profiles: BTreeMap<String, AgentProfile>,
}

impl AgentRegistry {
    pub fn empty() -> Self {
        Self { profiles: BTreeMap::new() }
    }

    /// Registry preloaded with the four built-in reviewers.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(AgentProfile::new(
            "Security",
            "You are a security expert reviewing code for vulnerabilities.\n\
             Focus on: SQL injection, XSS, authentication issues, exposed secrets, OWASP Top 10.\n\
             Provide specific line numbers and severity levels (CRITICAL, HIGH, MEDIUM, LOW).",
            "sql_injection|xss|auth|secrets|crypto|path_traversal|injection|other",
            20,
        ));
        registry.register(AgentProfile::new(
            "Performance",
            "You are a performance optimization expert reviewing code.\n\
             Focus on: time complexity, memory usage, database queries, caching opportunities.\n\
             Identify O(n\u{b2}) or worse algorithms, N+1 queries, memory leaks.",
            "complexity|memory|database|caching|io|algorithm|resource_leak",
            15,
        ));
        registry.register(AgentProfile::new(
            "Style",
            "You are a code style expert ensuring clean, readable code.\n\
             Focus on: naming conventions, code organization, DRY principles, readability.\n\
             Reference language-specific style guides (PEP8, ESLint, etc.).",
            "naming|organization|duplication|readability|convention",
            20,
        ));
        registry.register(AgentProfile::new(
            "Documentation",
            "You are a documentation expert reviewing code documentation.\n\
             Focus on: docstrings, inline comments, README updates, API documentation.\n\
             Ensure complex logic is explained and public APIs are documented.",
            "docstring|comment|api_docs|readme",
            15,
        ));
        registry
    }

    pub fn register(&mut self, profile: AgentProfile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    pub fn get(&self, name: &str) -> Option<&AgentProfile> {
        self.profiles.get(name)
    }

    /// Registered agent names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Resolve an enabled set into profiles, rejecting unknown names.
    pub fn resolve(&self, names: &[String]) -> Result<Vec<AgentProfile>, CriticError> {
        names
            .iter()
            .map(|name| {
                self.get(name).cloned().ok_or_else(|| {
                    CriticError::Rejected(format!(
                        "unknown agent '{}' (registered: {})",
                        name,
                        self.names().join(", ")
                    ))
                })
            })
            .collect()
    }
}

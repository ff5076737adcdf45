//! Turns raw model output into findings.
//!
//! Models are asked for a JSON object with an `issues` array, but real
//! responses wrap it in prose, hand back line numbers as strings or ranges,
//! and invent severity labels. Parsing tolerates all of that; only a
//! response with no JSON object at all is an error (the runner degrades it).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::errors::CriticError;
use crate::models::{Finding, Severity};

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)").expect("valid regex"));

/// Parse a model response into findings for one file, in response order.
pub fn parse_findings(response: &str, file_path: &str) -> Result<Vec<Finding>, CriticError> {
    let json_start = response
        .find('{')
        .ok_or_else(|| CriticError::Parse("no JSON object in model response".into()))?;
    let json_end = response
        .rfind('}')
        .ok_or_else(|| CriticError::Parse("unterminated JSON object in model response".into()))?;
    if json_end < json_start {
        return Err(CriticError::Parse("malformed JSON object in model response".into()));
    }

    let data: Value = serde_json::from_str(&response[json_start..=json_end])
        .map_err(|e| CriticError::Parse(format!("invalid JSON in model response: {}", e)))?;

    let issues = match data.get("issues").and_then(Value::as_array) {
        Some(issues) => issues,
        None => {
            debug!(file = file_path, "Model response has no issues array, treating as clean");
            return Ok(Vec::new());
        }
    };

    let findings = issues
        .iter()
        .map(|issue| {
            Finding::new(
                extract_line_number(issue.get("line_number")),
                issue
                    .get("severity")
                    .and_then(Value::as_str)
                    .map(Severity::parse_lenient)
                    .unwrap_or(Severity::Medium),
                issue
                    .get("category")
                    .and_then(Value::as_str)
                    .unwrap_or("general"),
                issue.get("message").and_then(Value::as_str).unwrap_or(""),
                issue.get("suggestion").and_then(Value::as_str).unwrap_or(""),
                file_path,
            )
        })
        .collect();

    Ok(findings)
}

/// Line numbers arrive as integers, numeric strings, or ranges like
/// "12-15"; the first integer wins, anything else maps to 0.
fn extract_line_number(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0) as u32,
        Some(Value::String(s)) => LINE_RE
            .captures(s)
            .and_then(|cap| cap[1].parse().ok())
            .unwrap_or(0),
        _ => 0,
    }
}

/// Per-agent post-filter: drop duplicates, rank by severity then line, and
/// cap at the agent's finding budget.
pub fn filter_findings(mut findings: Vec<Finding>, max_findings: usize) -> Vec<Finding> {
    let mut seen = HashSet::new();
    findings.retain(|f| seen.insert((f.line_number, f.category.clone(), f.message.clone())));
    findings.sort_by(|a, b| {
        a.severity
            .rank()
            .cmp(&b.severity.rank())
            .then(a.line_number.cmp(&b.line_number))
    });
    findings.truncate(max_findings);
    findings
}

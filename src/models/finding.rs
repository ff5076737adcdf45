use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity level for a review finding, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    /// All levels, most severe first. Summary breakdowns enumerate this so
    /// every bucket is present even when its count is zero.
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    /// Returns a numeric rank where lower values indicate higher severity.
    /// Critical = 0, High = 1, Medium = 2, Low = 3, Info = 4.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
            Severity::Info => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        }
    }

    /// Parse a severity label. Unknown labels fall back to `Medium`, matching
    /// how sloppy model output is tolerated elsewhere in the pipeline.
    pub fn parse_lenient(label: &str) -> Severity {
        match label.trim().to_ascii_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            "MEDIUM" => Severity::Medium,
            "LOW" => Severity::Low,
            "INFO" => Severity::Info,
            _ => Severity::Medium,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single issue reported by one agent for one file. Immutable once created.
///
/// `category` is an opaque key chosen by the agent; compound tags such as
/// `"complexity|database"` are stored and counted as-is, never split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub line_number: u32,
    pub severity: Severity,
    pub category: String,
    pub message: String,
    pub suggestion: String,
    pub file_path: String,
    pub timestamp: DateTime<Utc>,
}

impl Finding {
    pub fn new(
        line_number: u32,
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            severity,
            category: category.into(),
            message: message.into(),
            suggestion: suggestion.into(),
            file_path: file_path.into(),
            timestamp: Utc::now(),
        }
    }
}

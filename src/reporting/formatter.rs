//! Markdown rendering of a finalized report, suitable for posting as a PR
//! comment.

use crate::models::{Finding, ReviewReport, Severity};

/// Render the full report: header, severity table, per-file findings
/// (critical first), agents-used footer.
pub fn format_report_markdown(report: &ReviewReport) -> String {
    let mut out = String::new();

    out.push_str("## Code Review Report\n\n");
    out.push_str(&format!("**Repository:** {}\n", report.repo_name));
    out.push_str(&format!("**Pull Request:** #{}\n", report.pr_number));
    out.push_str(&format!("**Review Duration:** {:.1}s\n\n", report.summary.duration_seconds));

    out.push_str("### Summary\n");
    out.push_str(&format!("- **Total Issues:** {}\n", report.summary.total_issues));
    out.push_str(&format!("- **Critical Issues:** {}\n", report.summary.critical_issues));
    out.push_str(&format!("- **Files Reviewed:** {}\n\n", report.summary.total_files));

    if report.summary.total_issues > 0 {
        out.push_str(&format_severity_table(report));
    }

    out.push_str("### Detailed Results\n\n");
    for (file_path, agents) in &report.file_results {
        let mut all_findings: Vec<(&str, &Finding)> = agents
            .iter()
            .flat_map(|(agent, findings)| findings.iter().map(move |f| (agent.as_str(), f)))
            .collect();
        if all_findings.is_empty() {
            continue;
        }
        // Rank by severity then line for readability; the underlying report
        // keeps production order.
        all_findings.sort_by_key(|(_, f)| (f.severity.rank(), f.line_number));

        out.push_str(&format!("#### `{}`\n\n", file_path));
        for (agent, finding) in all_findings {
            out.push_str(&format!(
                "- **Line {}** `{}` ({}): {}\n",
                finding.line_number, finding.severity, agent, finding.message
            ));
            if !finding.suggestion.is_empty() {
                out.push_str(&format!("  - Suggestion: {}\n", finding.suggestion));
            }
        }
        out.push('\n');
    }

    out.push_str("---\n");
    out.push_str(&format!("*Agents used: {}*\n", report.summary.agents_used.join(", ")));

    out
}

fn format_severity_table(report: &ReviewReport) -> String {
    let mut out = String::from("### Issues by Severity\n| Severity | Count |\n|---|---|\n");
    for severity in Severity::ALL {
        let count = report.summary.severity_breakdown[&severity];
        if count > 0 {
            out.push_str(&format!("| {} | {} |\n", severity, count));
        }
    }
    out.push('\n');
    out
}

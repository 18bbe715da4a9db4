//! Markdown status reports posted by `/report`.

use slashbot_github::client::{CombinedStatus, Issue, PullRequest};
use std::fmt::Write;

fn status_emoji(state: &str) -> &'static str {
    match state {
        "success" => "✅",
        "failure" | "error" => "❌",
        _ => "⏳",
    }
}

fn mergeable_label(mergeable: Option<bool>) -> &'static str {
    match mergeable {
        Some(true) => "✅ Yes",
        Some(false) => "❌ No",
        None => "⏳ Unknown",
    }
}

/// Format a pull request summary including the head commit's CI status.
pub fn pull_request_report(pr: &PullRequest, status: &CombinedStatus) -> String {
    let mut report = String::from("## 📊 Pull Request Report\n\n");

    // Writing to a String cannot fail.
    let _ = writeln!(report, "**PR:** #{} - {}", pr.number, pr.title);
    let _ = writeln!(report, "**Author:** @{}", pr.user.login);
    let _ = writeln!(report, "**Status:** {}", pr.state);
    let _ = writeln!(report, "**Mergeable:** {}\n", mergeable_label(pr.mergeable));
    let _ = writeln!(report, "**CI Status:** {}\n", status.state);

    if !status.statuses.is_empty() {
        report.push_str("### Check Details\n");
        for check in &status.statuses {
            let _ = writeln!(
                report,
                "- {} **{}**: {}",
                status_emoji(&check.state),
                check.context,
                check.state
            );
        }
    }

    let _ = writeln!(report, "\n**Files Changed:** {}", pr.changed_files);
    let _ = writeln!(
        report,
        "**Additions:** +{} | **Deletions:** -{}",
        pr.additions, pr.deletions
    );

    report
}

/// Format an issue summary.
pub fn issue_report(issue: &Issue) -> String {
    let labels: Vec<&str> = issue.labels.iter().map(|l| l.name.as_str()).collect();

    let mut report = String::from("## 📋 Issue Report\n\n");
    let _ = writeln!(report, "**Issue:** #{} - {}", issue.number, issue.title);
    let _ = writeln!(report, "**Author:** @{}", issue.user.login);
    let _ = writeln!(report, "**Status:** {}", issue.state);
    let _ = writeln!(report, "**Labels:** {}", labels.join(", "));
    let _ = writeln!(report, "**Comments:** {}", issue.comments);

    report
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

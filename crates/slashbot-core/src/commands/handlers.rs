//! Built-in command handlers.
//!
//! Messages posted back to GitHub stay short; error detail goes to the logs.

use async_trait::async_trait;
use slashbot_github::client::{MergeMethod, MergePullRequestRequest, PullRequest};
use slashbot_github::ApiError;
use tracing::{error, info};

use super::context::{CommandContext, EventContext};
use super::dispatcher::CommandHandler;
use super::report::{issue_report, pull_request_report};
use super::CommandResult;

/// Comment posted when a pull request is opened.
pub const WELCOME_MESSAGE: &str = "👋 Thanks for opening this pull request!\n\n\
Available commands:\n\
- `/test [workflow]` - Trigger CI workflow\n\
- `/merge [method]` - Merge this PR (squash/merge/rebase)\n\
- `/report` - Generate status report\n";

// ============================================================================
// /test
// ============================================================================

/// `/test [workflow]`: dispatch a GitHub Actions workflow run.
///
/// Runs on the pull request head branch, or on the repository default branch
/// outside a pull request.
pub struct TestCommand;

impl TestCommand {
    async fn trigger(
        ctx: &CommandContext<'_>,
        workflow_name: &str,
        git_ref: &str,
    ) -> Result<CommandResult, ApiError> {
        let workflows = ctx.operations.list_workflows(&ctx.repo).await?;

        let Some(workflow) = workflows.iter().find(|w| w.matches(workflow_name)) else {
            return Ok(CommandResult::failure(format!(
                "❌ Workflow '{}' not found",
                workflow_name
            )));
        };

        let accepted = ctx
            .operations
            .trigger_workflow(&ctx.repo, workflow.id, git_ref)
            .await?;

        if accepted {
            Ok(CommandResult::success(format!(
                "✅ Triggered workflow '{}' on branch '{}'",
                workflow_name, git_ref
            )))
        } else {
            Ok(CommandResult::failure(format!(
                "❌ Failed to trigger workflow '{}'",
                workflow_name
            )))
        }
    }
}

#[async_trait]
impl CommandHandler for TestCommand {
    async fn handle(&self, ctx: &CommandContext<'_>, args: &str) -> CommandResult {
        let workflow_name = if args.is_empty() {
            ctx.settings.default_workflow.as_str()
        } else {
            args
        };

        let git_ref = match ctx.event.pull_request() {
            Some(pr) => pr.head.branch_ref.as_str(),
            None => ctx.repository.default_branch.as_str(),
        };

        info!(workflow = %workflow_name, git_ref = %git_ref, "Triggering workflow");

        match Self::trigger(ctx, workflow_name, git_ref).await {
            Ok(result) => result,
            Err(e) => {
                error!(workflow = %workflow_name, error = %e, "Workflow trigger failed");
                CommandResult::failure(format!(
                    "❌ Error triggering workflow '{}'",
                    workflow_name
                ))
            }
        }
    }
}

// ============================================================================
// /merge
// ============================================================================

/// `/merge [squash|merge|rebase]`: merge the pull request when it is
/// conflict-free and CI is passing or still running.
pub struct MergeCommand;

impl MergeCommand {
    /// Unrecognized or missing arguments fall back to squash.
    pub fn merge_method(args: &str) -> MergeMethod {
        args.parse().unwrap_or(MergeMethod::Squash)
    }

    async fn merge(
        ctx: &CommandContext<'_>,
        pr: &PullRequest,
        method: MergeMethod,
    ) -> Result<CommandResult, ApiError> {
        if pr.mergeable == Some(false) {
            return Ok(CommandResult::failure(
                "❌ Pull request has merge conflicts and cannot be merged",
            ));
        }

        let status = ctx
            .operations
            .get_combined_status(&ctx.repo, &pr.head.sha)
            .await?;

        if status.state != "success" && status.state != "pending" {
            return Ok(CommandResult::failure(format!(
                "❌ Cannot merge: CI checks are {}",
                status.state
            )));
        }

        let request = MergePullRequestRequest {
            commit_title: Some(format!("Merge PR #{}: {}", pr.number, pr.title)),
            commit_message: Some(format!("Merged via slashbot using {} method", method)),
            merge_method: method,
        };

        let result = ctx
            .operations
            .merge_pull_request(&ctx.repo, pr.number, &request)
            .await?;

        if result.merged {
            Ok(CommandResult::success(format!(
                "✅ Successfully merged PR #{} using {} method",
                pr.number, method
            )))
        } else {
            info!(number = pr.number, reason = %result.message, "Merge declined");
            Ok(CommandResult::failure(format!(
                "❌ Failed to merge PR #{}",
                pr.number
            )))
        }
    }
}

#[async_trait]
impl CommandHandler for MergeCommand {
    async fn handle(&self, ctx: &CommandContext<'_>, args: &str) -> CommandResult {
        let Some(pr) = ctx.event.pull_request() else {
            return CommandResult::failure("❌ /merge can only be used on pull requests");
        };

        let method = Self::merge_method(args);
        info!(number = pr.number, method = %method, "Attempting merge");

        match Self::merge(ctx, pr, method).await {
            Ok(result) => result,
            Err(e) => {
                error!(number = pr.number, error = %e, "Merge failed");
                CommandResult::failure(format!("❌ Error merging PR #{}", pr.number))
            }
        }
    }
}

// ============================================================================
// /report
// ============================================================================

/// `/report`: post a Markdown summary of the pull request or issue.
pub struct ReportCommand;

impl ReportCommand {
    async fn report(ctx: &CommandContext<'_>) -> Result<Option<u64>, ApiError> {
        let (number, body) = match ctx.event {
            EventContext::PullRequest(pr) => {
                let status = ctx
                    .operations
                    .get_combined_status(&ctx.repo, &pr.head.sha)
                    .await?;
                (pr.number, pull_request_report(pr, &status))
            }
            EventContext::Issue(issue) => (issue.number, issue_report(issue)),
            EventContext::None => return Ok(None),
        };

        ctx.operations
            .create_comment(&ctx.repo, number, &body)
            .await?;

        Ok(Some(number))
    }
}

#[async_trait]
impl CommandHandler for ReportCommand {
    async fn handle(&self, ctx: &CommandContext<'_>, _args: &str) -> CommandResult {
        let kind = ctx.event.kind();

        match Self::report(ctx).await {
            Ok(Some(number)) => {
                info!(number, kind, "Posted report");
                CommandResult::success(format!("✅ Posted report on {} #{}", kind, number))
            }
            Ok(None) => CommandResult::failure("❌ No PR or issue context for report"),
            Err(e) => {
                error!(kind, error = %e, "Report generation failed");
                CommandResult::failure("❌ Error generating report")
            }
        }
    }
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;

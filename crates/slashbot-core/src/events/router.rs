//! Production [`EventProcessor`].

use async_trait::async_trait;
use slashbot_github::auth::InstallationId;
use slashbot_github::client::RepositoryClientProvider;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::payload::{EventHeader, IssueCommentEvent, PullRequestEvent, PushEvent};
use super::{EventOutcome, EventProcessor};
use crate::commands::{parse, CommandDispatcher, WELCOME_MESSAGE};
use crate::error::EventError;

/// Routes events to command dispatch or logging.
///
/// Payloads are decoded and filtered before any GitHub call, so ignored
/// events never mint an installation token.
pub struct EventRouter {
    clients: Arc<dyn RepositoryClientProvider>,
    dispatcher: Arc<CommandDispatcher>,
}

impl EventRouter {
    pub fn new(clients: Arc<dyn RepositoryClientProvider>, dispatcher: Arc<CommandDispatcher>) -> Self {
        Self {
            clients,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    async fn issue_comment(
        &self,
        installation_id: InstallationId,
        event: IssueCommentEvent,
    ) -> Result<EventOutcome, EventError> {
        if event.action != "created" {
            debug!(action = %event.action, "Ignoring comment action");
            return Ok(EventOutcome::ignored(format!(
                "issue_comment action '{}'",
                event.action
            )));
        }

        // Replies posted by this app arrive as comments too and quote command names.
        if event.comment.user.is_bot() {
            debug!(author = %event.comment.user.login, "Ignoring bot comment");
            return Ok(EventOutcome::ignored(format!(
                "comment by bot '{}'",
                event.comment.user.login
            )));
        }

        let body = event.comment.body.as_deref().unwrap_or_default();
        let commands = parse(body);

        info!(
            author = %event.comment.user.login,
            number = event.issue.number,
            "Processing comment"
        );

        if commands.is_empty() {
            info!("No commands found in comment");
            return Ok(EventOutcome::NoCommands);
        }

        let names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
        info!(count = commands.len(), commands = ?names, "Found commands");

        let operations = self.clients.for_installation(installation_id).await?;
        let repo = event.repository.repository_ref();

        let (pull_request, issue) = if event.issue.is_pull_request() {
            let pr = operations.get_pull_request(&repo, event.issue.number).await?;
            (Some(pr), None)
        } else {
            let issue = operations.get_issue(&repo, event.issue.number).await?;
            (None, Some(issue))
        };

        let results = self
            .dispatcher
            .dispatch(
                &commands,
                &event.repository,
                pull_request,
                issue,
                operations.as_ref(),
            )
            .await?;

        Ok(EventOutcome::CommandsExecuted { results })
    }

    async fn pull_request(
        &self,
        installation_id: InstallationId,
        event: PullRequestEvent,
    ) -> Result<EventOutcome, EventError> {
        info!(number = event.number, action = %event.action, "Pull request event");

        match event.action.as_str() {
            "opened" => {
                let operations = self.clients.for_installation(installation_id).await?;
                operations
                    .create_comment(
                        &event.repository.repository_ref(),
                        event.number,
                        WELCOME_MESSAGE,
                    )
                    .await?;
                Ok(EventOutcome::WelcomePosted {
                    number: event.number,
                })
            }
            "synchronize" => {
                info!(number = event.number, "Pull request synchronized with new commits");
                Ok(EventOutcome::Logged)
            }
            other => Ok(EventOutcome::ignored(format!(
                "pull_request action '{}'",
                other
            ))),
        }
    }

    fn push(&self, event: PushEvent) -> EventOutcome {
        info!(
            git_ref = %event.git_ref,
            pusher = %event.pusher_name(),
            commits = event.commits.len(),
            "Push received"
        );

        if event.is_default_branch() {
            info!(branch = %event.repository.default_branch, "Push to default branch");
        }

        EventOutcome::Logged
    }
}

#[async_trait]
impl EventProcessor for EventRouter {
    #[instrument(skip(self, payload))]
    async fn process(
        &self,
        event_type: &str,
        payload: serde_json::Value,
    ) -> Result<EventOutcome, EventError> {
        if !super::SUPPORTED_EVENTS.contains(&event_type) {
            info!("Event type not handled");
            return Ok(EventOutcome::ignored(format!("event type '{}'", event_type)));
        }

        let header: EventHeader = serde_json::from_value(payload.clone())?;
        let Some(installation_id) = header.installation_id() else {
            warn!("No installation id in event");
            return Ok(EventOutcome::ignored("missing installation id"));
        };

        match event_type {
            "issue_comment" => {
                let event = serde_json::from_value(payload)?;
                self.issue_comment(installation_id, event).await
            }
            "pull_request" => {
                let event = serde_json::from_value(payload)?;
                self.pull_request(installation_id, event).await
            }
            _ => {
                let event = serde_json::from_value(payload)?;
                Ok(self.push(event))
            }
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;

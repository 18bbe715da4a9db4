//! Sequential command dispatch.

use async_trait::async_trait;
use slashbot_github::client::{Issue, PullRequest, Repository, RepositoryOperations};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::context::{CommandContext, CommandSettings, EventContext};
use super::handlers::{MergeCommand, ReportCommand, TestCommand};
use super::{Command, CommandResult};
use crate::error::DispatchError;

/// Handler for one slash command.
///
/// Implementations convert every failure into a failed [`CommandResult`]; no
/// error escapes a handler.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &CommandContext<'_>, args: &str) -> CommandResult;
}

/// Registration table mapping command names to handlers.
///
/// # Examples
///
/// ```rust
/// use slashbot_core::commands::{CommandDispatcher, CommandSettings};
///
/// let dispatcher = CommandDispatcher::with_builtin_commands(CommandSettings::default());
/// assert_eq!(dispatcher.commands(), vec!["merge", "report", "test"]);
/// ```
pub struct CommandDispatcher {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
    settings: CommandSettings,
}

impl CommandDispatcher {
    /// Create a dispatcher without any registered commands.
    pub fn new(settings: CommandSettings) -> Self {
        Self {
            handlers: HashMap::new(),
            settings,
        }
    }

    /// Create a dispatcher with `/test`, `/merge` and `/report` registered.
    pub fn with_builtin_commands(settings: CommandSettings) -> Self {
        let mut dispatcher = Self::new(settings);
        dispatcher.register("test", Arc::new(TestCommand));
        dispatcher.register("merge", Arc::new(MergeCommand));
        dispatcher.register("report", Arc::new(ReportCommand));
        dispatcher
    }

    /// Register a handler, replacing any previous handler for `name`.
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(name.into().to_lowercase(), handler);
    }

    /// Registered command names, sorted.
    pub fn commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn settings(&self) -> &CommandSettings {
        &self.settings
    }

    /// Execute `commands` against the pull request or issue they were issued on.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::InvalidContext` when both a pull request and an
    /// issue are supplied. Command failures are reported in the results.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use slashbot_core::commands::{parse, CommandDispatcher, CommandSettings};
    /// # use slashbot_github::client::{Repository, RepositoryOperations};
    /// # fn setup() -> (Repository, Box<dyn RepositoryOperations>) { unimplemented!() }
    /// # tokio_test::block_on(async {
    /// let (repository, operations) = setup();
    /// let dispatcher = CommandDispatcher::with_builtin_commands(CommandSettings::default());
    ///
    /// let results = dispatcher
    ///     .dispatch(&parse("/test\n/report"), &repository, None, None, operations.as_ref())
    ///     .await
    ///     .unwrap();
    /// assert_eq!(results.len(), 2);
    /// # });
    /// ```
    pub async fn dispatch(
        &self,
        commands: &[Command],
        repository: &Repository,
        pull_request: Option<PullRequest>,
        issue: Option<Issue>,
        operations: &dyn RepositoryOperations,
    ) -> Result<Vec<CommandResult>, DispatchError> {
        let event = EventContext::from_parts(pull_request, issue)?;
        let ctx = CommandContext::new(repository, &event, operations, &self.settings);
        Ok(self.run(commands, &ctx).await)
    }

    /// Execute `commands` in order, posting each result as a comment.
    ///
    /// Every command runs, whatever the outcome of the previous one. Nothing is
    /// posted when there is no pull request or issue; a failed post is logged.
    #[instrument(skip_all, fields(repository = %ctx.repo, context = ctx.event.kind(), count = commands.len()))]
    pub async fn run(&self, commands: &[Command], ctx: &CommandContext<'_>) -> Vec<CommandResult> {
        let mut results = Vec::with_capacity(commands.len());

        for command in commands {
            info!(command = %command.name, args = %command.args, "Executing command");

            let result = match self.handlers.get(&command.name) {
                Some(handler) => handler.handle(ctx, &command.args).await,
                None => CommandResult::failure(format!("❌ Unknown command: /{}", command.name)),
            };

            if !result.success {
                warn!(command = %command.name, message = %result.message, "Command failed");
            }

            if let Some(number) = ctx.event.number() {
                if let Err(e) = ctx
                    .operations
                    .create_comment(&ctx.repo, number, &result.message)
                    .await
                {
                    warn!(
                        command = %command.name,
                        number,
                        error = %e,
                        "Failed to post command result"
                    );
                }
            }

            results.push(result);
        }

        info!(
            executed = results.len(),
            succeeded = results.iter().filter(|r| r.success).count(),
            "Commands executed"
        );

        results
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;

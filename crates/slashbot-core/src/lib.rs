//! # slashbot core
//!
//! Domain logic for the slashbot GitHub App: slash-command extraction,
//! sequential command dispatch and webhook event routing.
//!
//! ## Architecture
//!
//! - Business logic depends on the `RepositoryOperations` and
//!   `RepositoryClientProvider` traits from `slashbot-github`
//! - GitHub access is injected at runtime, so everything here is testable
//!   against in-memory collaborators
//!
//! ## Usage
//!
//! ```rust
//! use slashbot_core::commands::parse;
//!
//! let commands = parse("Thanks!\n/test ci.yml\n/merge squash");
//! assert_eq!(commands.len(), 2);
//! assert_eq!(commands[0].name, "test");
//! assert_eq!(commands[0].args, "ci.yml");
//! ```

pub mod commands;
pub mod error;
pub mod events;

pub use commands::{
    parse, Command, CommandContext, CommandDispatcher, CommandHandler, CommandResult,
    CommandSettings, EventContext,
};
pub use error::{DispatchError, EventError};
pub use events::{EventOutcome, EventProcessor, EventRouter, SUPPORTED_EVENTS};

#[cfg(test)]
pub(crate) mod test_support;

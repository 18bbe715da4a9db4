//! Slash-command extraction.
//!
//! A command is a `/` directly followed by word characters, anywhere on a
//! line, optionally followed by an argument running to the end of that line:
//!
//! ```text
//! Looks good to me.
//! /test ci.yml        -> ("test", "ci.yml")
//! /merge              -> ("merge", "")
//! CC/report           -> ("report", "")
//! ```

use regex::Regex;
use std::sync::OnceLock;

use super::Command;

fn command_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"/(\w+)(?:[ \t]+(.+))?").expect("command pattern is valid")
    })
}

/// Extract commands from `text` in document order.
///
/// Duplicates are kept. Returns an empty vector when nothing matches.
///
/// # Examples
///
/// ```rust
/// use slashbot_core::commands::parse;
///
/// let commands = parse("/test\n/merge Squash\n/report");
/// let names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
///
/// assert_eq!(names, vec!["test", "merge", "report"]);
/// assert_eq!(commands[1].args, "Squash");
/// ```
pub fn parse(text: &str) -> Vec<Command> {
    let mut commands = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        for captures in command_pattern().captures_iter(line) {
            let Some(name) = captures.get(1) else {
                continue;
            };

            let args = captures
                .get(2)
                .map(|m| m.as_str().trim())
                .unwrap_or_default();

            // The slash sits immediately before the name.
            let position = line_start + name.start() - 1;

            commands.push(Command::new(name.as_str().to_lowercase(), args, position));
        }

        line_start += line.len() + 1;
    }

    commands
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;

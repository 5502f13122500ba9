//! Interactive reviewer selection
//!
//! Lists the candidates on stderr and reads a single reply. On an attended
//! terminal the reply comes through dialoguer; otherwise one line is read
//! straight from stdin so piped selections work. Validation is deliberately
//! left to the resolver: the reply is returned raw, and a bad one fails the
//! invocation instead of re-prompting, so a script driving the wrapper never
//! hangs on a prompt loop.

use aw_core::directory::Candidate;
use aw_core::error::{ArcWrapError, Result};
use aw_core::resolver::SelectionPrompt;
use console::style;
use dialoguer::Input;

/// Terminal prompt for picking between ambiguous reviewer matches
pub struct ConsolePrompt;

impl ConsolePrompt {
    /// Create a terminal prompt
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsolePrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionPrompt for ConsolePrompt {
    fn select(&mut self, fragment: &str, candidates: &[Candidate]) -> Result<String> {
        eprintln!();
        eprintln!(
            "'{}' matches more than one reviewer:",
            style(fragment).bold()
        );
        for (i, candidate) in candidates.iter().enumerate() {
            if candidate.real_name.is_empty() {
                eprintln!("  {}. {}", i + 1, style(&candidate.user_name).cyan());
            } else {
                eprintln!(
                    "  {}. {} {}",
                    i + 1,
                    style(&candidate.user_name).cyan(),
                    style(format!("({})", candidate.real_name)).dim()
                );
            }
        }

        if console::user_attended_stderr() {
            let reply: String = Input::new()
                .with_prompt(format!("Pick one [1-{}]", candidates.len()))
                .allow_empty(true)
                .interact_text()
                .map_err(|e| match e {
                    dialoguer::Error::IO(io) => ArcWrapError::Io(io),
                })?;
            Ok(reply)
        } else {
            // No terminal attended: read the piped selection directly,
            // since dialoguer refuses to prompt without one.
            eprint!("Pick one [1-{}]: ", candidates.len());
            let mut reply = String::new();
            std::io::stdin().read_line(&mut reply)?;
            Ok(reply)
        }
    }
}

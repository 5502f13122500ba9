//! arc-wrap - transparent wrapper around the arc CLI
//!
//! Every invocation is forwarded to arc unchanged, except for two things the
//! wrapper adds on the way through:
//!
//! - the `--rr` shorthand is resolved against the review server's user
//!   directory and rewritten to a canonical `--reviewers` flag
//! - team-wide config defaults are merged into `~/.arcrc` once a day
//!
//! ## Quick Start
//!
//! ```bash
//! # Exactly like running arc directly
//! arc-wrap diff
//!
//! # Shorthand reviewer names, resolved interactively when ambiguous
//! arc-wrap diff --rr jane,smith
//! ```

mod app;
mod prompt;
mod sync;

fn main() {
    if let Err(err) = app::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

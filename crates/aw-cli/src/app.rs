//! Wrapper entry logic
//!
//! Order matters here: the periodic config sync runs first, then the
//! argument rewrite, and the hand-off to the tool comes last. Anything that
//! fails before the hand-off aborts the invocation without touching the
//! wrapped tool.

use anyhow::Result;
use aw_core::resolver::ReviewerResolver;
use aw_core::rewrite::rewrite_args;
use aw_integration::{ConduitClient, Handoff};
use aw_storage::Settings;
use clap::Parser;
use tracing::debug;

use crate::prompt::ConsolePrompt;
use crate::sync;

/// Environment variable selecting the log filter (e.g. `debug`, `aw_core=trace`)
const ENV_LOG: &str = "ARC_WRAP_LOG";

/// arc-wrap - transparent wrapper around arc
///
/// Help and version flags are disabled on purpose: `--help` belongs to the
/// wrapped tool, like every other argument.
#[derive(Debug, Parser)]
#[command(name = "arc-wrap")]
#[command(about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Arguments passed through to the wrapped tool
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Run the wrapper
pub fn run() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let settings = Settings::load();
    let program = settings.tool_program();
    debug!("Wrapping {} with {} argument(s)", program, cli.args.len());

    sync::maybe_sync(&settings)?;

    let client = ConduitClient::new(program.clone());
    let prompt = ConsolePrompt::new();
    let mut resolver = ReviewerResolver::new(client, prompt);
    let args = rewrite_args(&cli.args, &mut resolver)?;

    Handoff::new(program, args).exec()?;
    Ok(())
}

/// Log to stderr; stdout belongs to the wrapped tool
fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

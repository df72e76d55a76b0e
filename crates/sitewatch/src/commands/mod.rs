//! Command dispatch: bridges CLI args -> board commands -> output formatting.

pub mod board;
pub mod config_cmd;
pub mod sites;
pub mod util;
pub mod watch;

use sitewatch_core::MonitorConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an endpoint-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    monitor: MonitorConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Sites(args) => sites::handle(args, &monitor, global).await,
        Command::Watch(args) => watch::handle(args, monitor, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

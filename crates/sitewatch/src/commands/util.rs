//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use sitewatch_core::{HttpSource, MonitorConfig, SiteSource, SiteStatus, StatusBoard};

use crate::cli::{FilterArgs, GlobalOpts};
use crate::error::CliError;

/// Stderr spinner for one-shot fetches; `None` when quiet or not a terminal.
pub fn spinner(message: &str, quiet: bool) -> Option<ProgressBar> {
    if quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

/// Fetch one snapshot from the configured endpoint.
pub async fn fetch_snapshot(
    monitor: &MonitorConfig,
    global: &GlobalOpts,
) -> Result<Vec<SiteStatus>, CliError> {
    let source = HttpSource::new(monitor)?;
    let progress = spinner(&format!("Fetching {}", source.endpoint()), global.quiet);

    let result = source.fetch().await;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    let records = result?;
    tracing::debug!(records = records.len(), "snapshot fetched");
    Ok(records)
}

/// Apply `--search` / `--category` to the board, in that order.
pub fn apply_filters(board: &mut StatusBoard, filter: &FilterArgs) {
    if let Some(ref term) = filter.search {
        board.set_search(term);
    }
    if !filter.category.is_empty() {
        board.set_category_filters(filter.category.iter().map(|c| c.trim().to_owned()));
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

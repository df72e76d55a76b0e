//! Live dashboard: periodic refresh plus line commands on stdin.
//!
//! The screen is redrawn whenever the board view or the refresh status
//! changes, or after a command. Logs go to a file (see `main`).

use std::fmt::Write as _;
use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use chrono::FixedOffset;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use sitewatch_core::timefmt::format_refresh_time;
use sitewatch_core::{BoardView, FetchPhase, MonitorConfig, RefreshDriver, RefreshStatus, SiteSource};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::{board, util};

const HELP_LINE: &str =
    "/text search · c A,B categories · n/p page · <number> jump · r refresh · q quit";

// ── Input ───────────────────────────────────────────────────────────

/// One line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    /// `/text`; a bare `/` clears the search.
    Search(String),
    /// `c A,B`; a bare `c` selects every category.
    Categories(Vec<String>),
    Next,
    Previous,
    Page(usize),
    Refresh,
    Quit,
    Help,
    Unknown(String),
}

fn parse_input(line: &str) -> Option<Input> {
    // The search term is taken verbatim after the slash.
    if let Some(term) = line.trim_start().strip_prefix('/') {
        return Some(Input::Search(term.trim_end_matches('\r').to_owned()));
    }

    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if line == "c" || line.starts_with("c ") {
        let selected = line[1..]
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned)
            .collect();
        return Some(Input::Categories(selected));
    }

    Some(match line {
        "n" | "next" => Input::Next,
        "p" | "prev" => Input::Previous,
        "r" | "refresh" => Input::Refresh,
        "q" | "quit" | "exit" => Input::Quit,
        "?" | "h" | "help" => Input::Help,
        other => match other.parse::<usize>() {
            Ok(page) => Input::Page(page),
            Err(_) => Input::Unknown(other.to_owned()),
        },
    })
}

// ── Screen ──────────────────────────────────────────────────────────

struct Screen<'a> {
    endpoint: &'a str,
    interval: Duration,
    offset: FixedOffset,
    color: bool,
}

impl Screen<'_> {
    /// The whole frame as text; no terminal control codes.
    fn compose(&self, view: &BoardView, status: &RefreshStatus, notice: Option<&str>) -> String {
        let mut out = output::heading(&format!("sitewatch · {}", self.endpoint), self.color);

        let refreshed = status.last_success.map_or_else(
            || "never".to_owned(),
            |at| format_refresh_time(at, self.offset),
        );
        let _ = write!(
            out,
            "\nLast refreshed: {refreshed} · every {}",
            humantime::format_duration(self.interval)
        );
        if status.is_loading() && status.last_success.is_some() {
            out.push_str(" · refreshing…");
        }

        let categories = if view.all_categories_selected {
            "all".to_owned()
        } else {
            view.selected_categories.join(", ")
        };
        let search = if view.search_term.is_empty() {
            "-"
        } else {
            view.search_term.as_str()
        };
        let _ = write!(out, "\nSearch: {search} · Categories: {categories}\n\n");

        match &status.phase {
            FetchPhase::Loading if status.last_success.is_none() => {
                out.push_str("Loading site status…");
            }
            FetchPhase::Failed(message) => {
                let _ = write!(
                    out,
                    "{}\n  {message}\n  Retrying on the next refresh (r to retry now).",
                    output::heading("✖ Failed to load site status", self.color)
                );
            }
            _ => out.push_str(&board::render_board(view, self.color)),
        }

        if let Some(notice) = notice {
            let _ = write!(out, "\n\n{notice}");
        }
        let _ = write!(out, "\n\n{HELP_LINE}\n> ");
        out
    }
}

fn draw(frame: &str) {
    let mut stdout = std::io::stdout().lock();
    if stdout.is_terminal() {
        // Clear screen, cursor home.
        let _ = write!(stdout, "\x1b[2J\x1b[H");
    }
    let _ = write!(stdout, "{frame}");
    let _ = stdout.flush();
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    args: WatchArgs,
    mut monitor: MonitorConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(ref raw) = args.interval {
        monitor.refresh_interval = parse_interval(raw)?;
    }

    let driver = RefreshDriver::from_config(&monitor)?;
    driver.with_board(|b| util::apply_filters(b, &args.filter));

    let endpoint = driver.source().endpoint().to_string();
    let screen = Screen {
        endpoint: &endpoint,
        interval: monitor.refresh_interval,
        offset: monitor.display_offset,
        color: output::should_color(&global.color_mode()),
    };

    info!(endpoint = %endpoint, interval = ?monitor.refresh_interval, "watch started");

    let mut views = driver.views();
    let mut status = driver.status();
    let startup = {
        let driver = driver.clone();
        tokio::spawn(async move { driver.start().await })
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut notice: Option<String> = None;

    loop {
        let view: Arc<BoardView> = views.borrow_and_update().clone();
        let current = status.borrow_and_update().clone();
        draw(&screen.compose(&view, &current, notice.as_deref()));

        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() { break; }
            }
            changed = status.changed() => {
                if changed.is_err() { break; }
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    debug!("stdin closed, continuing until interrupted");
                    stdin_open = false;
                    continue;
                };
                match parse_input(&line) {
                    None => {}
                    Some(Input::Quit) => break,
                    Some(input) => notice = apply_input(&driver, input),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    startup.abort();
    driver.shutdown().await;
    if std::io::stdout().is_terminal() {
        println!();
    }
    info!("watch stopped");
    Ok(())
}

/// Run one command against the driver; returns a message to show.
fn apply_input<S: SiteSource>(driver: &RefreshDriver<S>, input: Input) -> Option<String> {
    match input {
        Input::Search(term) => {
            driver.with_board(|b| b.set_search(&term));
            None
        }
        Input::Categories(selected) => {
            driver.with_board(|b| b.set_category_filters(selected));
            None
        }
        Input::Next => driver.with_board(|b| b.next_page()).err().map(|e| e.to_string()),
        Input::Previous => driver
            .with_board(|b| b.previous_page())
            .err()
            .map(|e| e.to_string()),
        Input::Page(n) => driver.with_board(|b| b.page(n)).err().map(|e| e.to_string()),
        Input::Refresh => {
            drop(driver.trigger());
            None
        }
        Input::Help => Some(HELP_LINE.to_owned()),
        Input::Unknown(text) => Some(format!("Unknown command '{text}'. Type ? for help.")),
        Input::Quit => None,
    }
}

fn parse_interval(raw: &str) -> Result<Duration, CliError> {
    let interval = humantime::parse_duration(raw).map_err(|e| CliError::Validation {
        field: "interval".into(),
        reason: e.to_string(),
    })?;
    if interval < Duration::from_secs(1) {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "must be at least 1s".into(),
        });
    }
    Ok(interval)
}

//! Site command handlers.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use sitewatch_core::{MonitorConfig, SiteRow, SiteStatus, StatusBoard};

use crate::cli::{GlobalOpts, SitesArgs, SitesCommand};
use crate::error::CliError;
use crate::output;

use super::{board, util};

// ── Category row ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CategoryCount {
    gateway: String,
    sites: usize,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Gateway Type")]
    gateway: String,
    #[tabled(rename = "Sites")]
    sites: usize,
}

impl From<&CategoryCount> for CategoryRow {
    fn from(c: &CategoryCount) -> Self {
        Self {
            gateway: c.gateway.clone(),
            sites: c.sites,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    args: SitesArgs,
    monitor: &MonitorConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let records = util::fetch_snapshot(monitor, global).await?;
    let mut status_board = StatusBoard::new();
    status_board.ingest(records);

    let color = output::should_color(&global.color_mode());

    match args.command {
        SitesCommand::List(list) => {
            util::apply_filters(&mut status_board, &list.filter);

            if list.page != 1 {
                if let Err(e) = status_board.page(list.page) {
                    warn!(error = %e, "ignoring page request");
                    if !global.quiet {
                        eprintln!("warning: {e}; showing page 1");
                    }
                }
            }

            let view = status_board.view();
            let out = output::render_single(
                &global.output_format(),
                view.as_ref(),
                |v| board::render_board(v, color),
                |v| {
                    v.rows
                        .iter()
                        .map(|r| r.site_code.clone())
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Show { site } => {
            let found = find_site(&status_board, &site).ok_or_else(|| CliError::NotFound {
                resource_type: "site".into(),
                identifier: site.clone(),
                list_command: "sites list".into(),
            })?;

            let detail = board::SiteDetail::new(&SiteRow::from(found), monitor.display_offset);
            let out = output::render_single(
                &global.output_format(),
                &detail,
                |d| board::render_detail(d, color),
                |d| d.site_code.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Categories => {
            let counts = category_counts(&status_board);
            let out = output::render_list(
                &global.output_format(),
                &counts,
                |c| CategoryRow::from(c),
                |c| c.gateway.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Exact code match first, then case-insensitive code or name.
fn find_site<'a>(board: &'a StatusBoard, needle: &str) -> Option<&'a SiteStatus> {
    let records = &board.state().records;
    records
        .iter()
        .find(|s| s.code == needle)
        .or_else(|| {
            records.iter().find(|s| {
                s.code.eq_ignore_ascii_case(needle) || s.name.eq_ignore_ascii_case(needle)
            })
        })
        .map(Arc::as_ref)
}

fn category_counts(board: &StatusBoard) -> Vec<CategoryCount> {
    let state = board.state();
    state
        .categories
        .iter()
        .map(|gateway| CategoryCount {
            gateway: gateway.clone(),
            sites: state
                .records
                .iter()
                .filter(|s| &s.gateway == gateway)
                .count(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sitewatch_core::{AliveSignal, DeviceProbe, DeviceSlot};

    use super::*;

    fn site(name: &str, code: &str, gateway: &str) -> SiteStatus {
        SiteStatus {
            name: name.into(),
            code: code.into(),
            gateway: gateway.into(),
            probes: DeviceSlot::ALL.map(|slot| DeviceProbe {
                slot,
                ip: None,
                status: None,
                pinged_on: None,
            }),
            alive: AliveSignal {
                alive: None,
                hash_key: None,
                received_on: None,
                device_id: None,
            },
        }
    }

    fn sample_board() -> StatusBoard {
        let mut board = StatusBoard::new();
        board.ingest(vec![
            site("Andheri East", "MUM-014", "Fiber"),
            site("Baner", "PUN-002", "4G"),
            site("Kothrud", "PUN-009", "Fiber"),
        ]);
        board
    }

    #[test]
    fn finds_by_code_or_name() {
        let board = sample_board();
        assert_eq!(find_site(&board, "PUN-002").unwrap().name, "Baner");
        assert_eq!(find_site(&board, "mum-014").unwrap().name, "Andheri East");
        assert_eq!(find_site(&board, "kothrud").unwrap().code, "PUN-009");
        assert!(find_site(&board, "nowhere").is_none());
    }

    #[test]
    fn counts_sites_per_category() {
        let counts = category_counts(&sample_board());
        let pairs: Vec<_> = counts.iter().map(|c| (c.gateway.as_str(), c.sites)).collect();
        assert_eq!(pairs, [("Fiber", 2), ("4G", 1)]);
    }
}

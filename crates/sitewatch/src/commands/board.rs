//! Board rendering shared by `sites` and `watch`.

use std::fmt::Write;

use chrono::FixedOffset;
use serde::Serialize;
use tabled::Tabled;

use sitewatch_core::cell::tooltip_content;
use sitewatch_core::{
    AliveCell, BoardView, CellRef, DeviceCell, PageWindow, SiteRow, StatusKind, Tooltip,
};

use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct BoardTableRow {
    #[tabled(rename = "Site Name")]
    name: String,
    #[tabled(rename = "Site Code")]
    code: String,
    #[tabled(rename = "Gateway")]
    gateway: String,
    #[tabled(rename = "Aggregator")]
    aggregator: String,
    #[tabled(rename = "Cabin A")]
    cabin_a: String,
    #[tabled(rename = "Cabin B")]
    cabin_b: String,
    #[tabled(rename = "Router")]
    router: String,
    #[tabled(rename = "POC3")]
    poc3: String,
    #[tabled(rename = "Alive Signal")]
    alive: String,
}

impl BoardTableRow {
    pub fn new(row: &SiteRow, color: bool) -> Self {
        let device = |i: usize| {
            row.devices
                .get(i)
                .map(|cell| output::paint(cell.kind, &device_badge(cell), color))
                .unwrap_or_default()
        };

        Self {
            name: row.site_name.clone(),
            code: row.site_code.clone(),
            gateway: row.gateway.clone(),
            aggregator: device(0),
            cabin_a: device(1),
            cabin_b: device(2),
            router: device(3),
            poc3: device(4),
            alive: output::paint(row.alive.kind, &alive_badge(&row.alive), color),
        }
    }
}

/// `📶 10.0.0.1`, or the placeholder text when there is no IP.
pub fn device_badge(cell: &DeviceCell) -> String {
    badge(cell.kind, cell.ip.as_deref().unwrap_or_default())
}

/// `📶 <device id>`, or `No Signal`.
pub fn alive_badge(cell: &AliveCell) -> String {
    badge(cell.kind, &cell.device_id)
}

fn badge(kind: StatusKind, label: &str) -> String {
    match (kind.placeholder(), kind.glyph()) {
        (Some(text), _) => text.to_owned(),
        (None, Some(glyph)) if label.is_empty() => glyph.to_owned(),
        (None, Some(glyph)) => format!("{glyph} {label}"),
        (None, None) => label.to_owned(),
    }
}

// ── Board ───────────────────────────────────────────────────────────

/// Table, entries label and page controls.
pub fn render_board(view: &BoardView, color: bool) -> String {
    let mut out = if view.is_empty() {
        "No sites match the current filters.".to_owned()
    } else {
        let rows: Vec<_> = view
            .rows
            .iter()
            .map(|row| BoardTableRow::new(row, color))
            .collect();
        output::render_table(&rows)
    };

    let _ = write!(out, "\n{}", view.summary.entries_label());
    let pager = render_pager(&view.window, view.summary.has_previous(), view.summary.has_next());
    if !pager.is_empty() {
        let _ = write!(out, "\n{pager}");
    }
    out
}

/// `‹ Prev  1 … 3 4 [5] 6 7 … 9  Next ›`; empty when there are no pages.
pub fn render_pager(window: &PageWindow, has_previous: bool, has_next: bool) -> String {
    if window.total_pages == 0 {
        return String::new();
    }

    let mut tokens = Vec::new();
    if window.show_first {
        tokens.push("1".to_owned());
    }
    if window.leading_ellipsis {
        tokens.push("…".to_owned());
    }
    tokens.extend(window.pages.iter().map(|&p| {
        if p == window.current {
            format!("[{p}]")
        } else {
            p.to_string()
        }
    }));
    if window.trailing_ellipsis {
        tokens.push("…".to_owned());
    }
    if window.show_last {
        tokens.push(window.total_pages.to_string());
    }

    let mut line = String::new();
    if has_previous {
        line.push_str("‹ Prev  ");
    }
    line.push_str(&tokens.join(" "));
    if has_next {
        line.push_str("  Next ›");
    }
    line
}

// ── Site detail ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CellDetail {
    pub device: String,
    pub kind: StatusKind,
    pub badge: String,
    pub tooltip: Option<Tooltip>,
}

#[derive(Debug, Serialize)]
pub struct SiteDetail {
    pub site_name: String,
    pub site_code: String,
    pub gateway: String,
    pub cells: Vec<CellDetail>,
}

impl SiteDetail {
    pub fn new(row: &SiteRow, offset: FixedOffset) -> Self {
        let mut cells: Vec<CellDetail> = row
            .devices
            .iter()
            .map(|cell| CellDetail {
                device: cell.device_label.clone(),
                kind: cell.kind,
                badge: device_badge(cell),
                tooltip: tooltip_content(CellRef::from(cell), offset),
            })
            .collect();

        cells.push(CellDetail {
            device: sitewatch_core::cell::ALIVE_SIGNAL_TITLE.to_owned(),
            kind: row.alive.kind,
            badge: alive_badge(&row.alive),
            tooltip: tooltip_content(CellRef::from(&row.alive), offset),
        });

        Self {
            site_name: row.site_name.clone(),
            site_code: row.site_code.clone(),
            gateway: row.gateway.clone(),
            cells,
        }
    }
}

/// Every cell with its tooltip lines indented beneath.
pub fn render_detail(detail: &SiteDetail, color: bool) -> String {
    let mut out = output::heading(
        &format!(
            "{} ({}) · {}",
            detail.site_name, detail.site_code, detail.gateway
        ),
        color,
    );

    for cell in &detail.cells {
        let _ = write!(
            out,
            "\n  {:<20} {}",
            cell.device,
            output::paint(cell.kind, &cell.badge, color)
        );
        if let Some(ref tip) = cell.tooltip {
            let _ = write!(out, "\n      {}", tip.status_line());
            let _ = write!(out, "\n      {}", tip.secondary_line);
            if let Some(ref hash) = tip.hash_line {
                let _ = write!(out, "\n      {hash}");
            }
        }
    }
    out
}

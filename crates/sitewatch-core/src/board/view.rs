// ── Render contract ──
//
// Snapshots handed to renderers. A renderer reads these and performs
// no filtering or status logic of its own.

use serde::Serialize;

use crate::cell::{AliveCell, DeviceCell};
use crate::model::SiteStatus;

/// `Showing {start} to {end} of {total} entries` data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationSummary {
    pub start_entry: usize,
    pub end_entry: usize,
    pub total_entries: usize,
    pub current_page: usize,
    pub total_pages: usize,
}

impl PaginationSummary {
    /// Whether a "previous" control is enabled.
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Whether a "next" control is enabled.
    pub fn has_next(&self) -> bool {
        self.total_pages > 0 && self.current_page < self.total_pages
    }

    pub fn entries_label(&self) -> String {
        format!(
            "Showing {} to {} of {} entries",
            self.start_entry, self.end_entry, self.total_entries
        )
    }
}

/// Page-number controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub pages: Vec<usize>,
    pub current: usize,
    pub total_pages: usize,
    /// Render a leading "1" link.
    pub show_first: bool,
    /// Render "…" after the leading "1".
    pub leading_ellipsis: bool,
    /// Render a trailing link to the last page.
    pub show_last: bool,
    /// Render "…" before the trailing link.
    pub trailing_ellipsis: bool,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteRow {
    pub site_name: String,
    pub site_code: String,
    pub gateway: String,
    /// One cell per device slot, in column order.
    pub devices: Vec<DeviceCell>,
    pub alive: AliveCell,
}

impl From<&SiteStatus> for SiteRow {
    fn from(site: &SiteStatus) -> Self {
        Self {
            site_name: site.name.clone(),
            site_code: site.code.clone(),
            gateway: site.gateway.clone(),
            devices: site.probes.iter().map(DeviceCell::from).collect(),
            alive: AliveCell::from(&site.alive),
        }
    }
}

/// Everything needed to draw the board once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub rows: Vec<SiteRow>,
    pub summary: PaginationSummary,
    pub window: PageWindow,
    pub categories: Vec<String>,
    pub selected_categories: Vec<String>,
    pub all_categories_selected: bool,
    pub search_term: String,
}

impl BoardView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

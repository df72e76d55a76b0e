// ── Board state and pure derivations ──
//
// `BoardState` is plain owned data. Everything a renderer needs is
// derived from it by the free functions below; nothing here mutates.

use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexSet;

use super::view::{PageWindow, PaginationSummary};
use crate::model::SiteStatus;

/// Rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Page numbers shown around the current page.
pub const DEFAULT_PAGE_WINDOW: usize = 5;

/// Gateway category selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Accept every category, including ones that appear later.
    #[default]
    All,
    /// Accept exactly these categories.
    Only(BTreeSet<String>),
}

impl CategoryFilter {
    pub fn accepts(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected.contains(category),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Everything the board owns.
#[derive(Debug, Clone)]
pub struct BoardState {
    /// Latest full snapshot, replaced wholesale on ingest.
    pub records: Arc<Vec<Arc<SiteStatus>>>,
    /// Distinct gateway categories of `records`, first-seen order.
    pub categories: IndexSet<String>,
    /// Lower-cased search term; empty matches everything.
    pub search_term: String,
    pub category_filter: CategoryFilter,
    /// 1-based page cursor.
    pub current_page: usize,
    pub page_size: usize,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            records: Arc::new(Vec::new()),
            categories: IndexSet::new(),
            search_term: String::new(),
            category_filter: CategoryFilter::All,
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl BoardState {
    /// The categories a renderer should show as checked.
    pub fn selected_categories(&self) -> Vec<String> {
        match &self.category_filter {
            CategoryFilter::All => self.categories.iter().cloned().collect(),
            CategoryFilter::Only(selected) => self
                .categories
                .iter()
                .filter(|c| selected.contains(c.as_str()))
                .cloned()
                .collect(),
        }
    }
}

// ── Predicates ───────────────────────────────────────────────────────

/// Case-insensitive substring match on name, code and category.
///
/// `term` must already be lower-cased.
pub fn matches_search(site: &SiteStatus, term: &str) -> bool {
    term.is_empty()
        || site.name.to_lowercase().contains(term)
        || site.code.to_lowercase().contains(term)
        || site.gateway.to_lowercase().contains(term)
}

fn accepts(state: &BoardState, site: &SiteStatus) -> bool {
    matches_search(site, &state.search_term) && state.category_filter.accepts(&site.gateway)
}

// ── Derivations ──────────────────────────────────────────────────────

/// Records matching both the search term and the category filter, in
/// snapshot order.
pub fn filtered_view(state: &BoardState) -> Vec<Arc<SiteStatus>> {
    state
        .records
        .iter()
        .filter(|site| accepts(state, site))
        .cloned()
        .collect()
}

pub fn filtered_count(state: &BoardState) -> usize {
    state.records.iter().filter(|site| accepts(state, site)).count()
}

/// `ceil(filtered / page_size)`; zero when nothing matches.
pub fn total_pages(state: &BoardState) -> usize {
    filtered_count(state).div_ceil(state.page_size.max(1))
}

/// The rows of the current page.
pub fn page_slice(state: &BoardState) -> Vec<Arc<SiteStatus>> {
    let size = state.page_size.max(1);
    state
        .records
        .iter()
        .filter(|site| accepts(state, site))
        .skip(state.current_page.saturating_sub(1) * size)
        .take(size)
        .cloned()
        .collect()
}

pub fn pagination_summary(state: &BoardState) -> PaginationSummary {
    let size = state.page_size.max(1);
    let total_entries = filtered_count(state);
    let current_page = state.current_page;

    let start_entry = if total_entries == 0 {
        0
    } else {
        current_page.saturating_sub(1) * size + 1
    };

    PaginationSummary {
        start_entry,
        end_entry: (current_page * size).min(total_entries),
        total_entries,
        current_page,
        total_pages: total_entries.div_ceil(size),
    }
}

/// Sliding window of page numbers centered on the current page.
///
/// When the window hits the last page it grows back towards page 1 so
/// it keeps `max_visible` entries whenever enough pages exist.
pub fn page_window(state: &BoardState, max_visible: usize) -> PageWindow {
    let max_visible = max_visible.max(1);
    let total = total_pages(state);
    let current = state.current_page;

    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let end = start.saturating_add(max_visible - 1).min(total);
    if end + 1 < start.saturating_add(max_visible) {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }

    PageWindow {
        pages: (start..=end).collect(),
        current,
        total_pages: total,
        show_first: start > 1,
        leading_ellipsis: start > 2,
        show_last: end < total,
        trailing_ellipsis: end + 1 < total,
    }
}

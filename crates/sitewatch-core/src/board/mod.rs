// ── Status board ──
//
// Owns the latest snapshot plus the search/filter/page state and turns
// commands into `BoardView` snapshots. Every command republishes the
// view through a `watch` channel so renderers can observe instead of
// polling.

mod state;
mod view;

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::error::CoreError;
use crate::model::SiteStatus;

pub use state::{
    BoardState, CategoryFilter, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_WINDOW, filtered_count,
    filtered_view, matches_search, page_slice, page_window, pagination_summary, total_pages,
};
pub use view::{BoardView, PageWindow, PaginationSummary, SiteRow};

/// Filterable, paginated view over site status snapshots.
pub struct StatusBoard {
    state: BoardState,
    views: watch::Sender<Arc<BoardView>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        let state = BoardState::default();
        let (views, _) = watch::channel(Arc::new(render(&state)));
        Self { state, views }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// The most recently published view.
    pub fn view(&self) -> Arc<BoardView> {
        self.views.borrow().clone()
    }

    /// Subscribe to view changes. The receiver starts at the current view.
    pub fn subscribe(&self) -> watch::Receiver<Arc<BoardView>> {
        self.views.subscribe()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the snapshot wholesale.
    ///
    /// Known categories are recomputed. An "all" selection stays "all"
    /// and so picks up new categories; an explicit selection is kept.
    /// The page cursor is clamped into the new page range.
    pub fn ingest(&mut self, records: Vec<SiteStatus>) -> Arc<BoardView> {
        self.state.categories = records.iter().map(|r| r.gateway.clone()).collect();
        self.state.records = Arc::new(records.into_iter().map(Arc::new).collect());

        let pages = total_pages(&self.state);
        self.state.current_page = self.state.current_page.clamp(1, pages.max(1));

        debug!(
            records = self.state.records.len(),
            categories = self.state.categories.len(),
            page = self.state.current_page,
            "snapshot ingested"
        );
        self.publish()
    }

    /// Set the free-text search term and return to page 1.
    ///
    /// The term is lower-cased and stored as typed; surrounding
    /// whitespace is part of the match.
    pub fn set_search(&mut self, term: &str) -> Arc<BoardView> {
        self.state.search_term = term.to_lowercase();
        self.state.current_page = 1;
        self.publish()
    }

    /// Select gateway categories and return to page 1.
    ///
    /// An empty selection, or one naming every known category, means
    /// "all".
    pub fn set_category_filters<I, S>(&mut self, selected: I) -> Arc<BoardView>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selected: BTreeSet<String> = selected.into_iter().map(Into::into).collect();

        self.state.category_filter = if selected.is_empty() || self.covers_known(&selected) {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(selected)
        };
        self.state.current_page = 1;

        debug!(filter = ?self.state.category_filter, "category filter changed");
        self.publish()
    }

    /// Jump to page `n`. Out-of-range requests are rejected and leave
    /// the cursor where it was.
    pub fn page(&mut self, n: usize) -> Result<Arc<BoardView>, CoreError> {
        let pages = total_pages(&self.state);
        if n == 0 || n > pages {
            return Err(CoreError::PageOutOfRange {
                requested: n,
                total_pages: pages,
            });
        }
        self.state.current_page = n;
        Ok(self.publish())
    }

    pub fn next_page(&mut self) -> Result<Arc<BoardView>, CoreError> {
        self.page(self.state.current_page + 1)
    }

    pub fn previous_page(&mut self) -> Result<Arc<BoardView>, CoreError> {
        self.page(self.state.current_page.saturating_sub(1))
    }

    // ── Internals ────────────────────────────────────────────────────

    fn covers_known(&self, selected: &BTreeSet<String>) -> bool {
        selected.len() == self.state.categories.len()
            && self.state.categories.iter().all(|c| selected.contains(c))
    }

    fn publish(&mut self) -> Arc<BoardView> {
        let view = Arc::new(render(&self.state));
        self.views.send_replace(Arc::clone(&view));
        view
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the full render snapshot from a state.
pub fn render(state: &BoardState) -> BoardView {
    let all_categories_selected = match &state.category_filter {
        CategoryFilter::All => true,
        CategoryFilter::Only(selected) => {
            selected.len() == state.categories.len()
                && state.categories.iter().all(|c| selected.contains(c))
        }
    };

    BoardView {
        rows: page_slice(state)
            .iter()
            .map(|site| SiteRow::from(site.as_ref()))
            .collect(),
        summary: pagination_summary(state),
        window: page_window(state, DEFAULT_PAGE_WINDOW),
        categories: state.categories.iter().cloned().collect(),
        selected_categories: state.selected_categories(),
        all_categories_selected,
        search_term: state.search_term.clone(),
    }
}

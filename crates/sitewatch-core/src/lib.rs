// sitewatch-core: Board state, cell derivation and refresh driving between
// sitewatch-api and renderers (CLI).

pub mod board;
pub mod cell;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod placement;
pub mod refresh;
pub mod timefmt;

// ── Primary re-exports ──────────────────────────────────────────────
pub use board::{
    BoardState, BoardView, CategoryFilter, PageWindow, PaginationSummary, SiteRow, StatusBoard,
};
pub use cell::{AliveCell, CellRef, DeviceCell, StatusKind, Tooltip};
pub use config::{MonitorConfig, TlsVerification};
pub use error::CoreError;
pub use refresh::{FetchPhase, HttpSource, RefreshDriver, RefreshOutcome, RefreshStatus, SiteSource};

// Re-export model types at the crate root for ergonomics.
pub use model::{AliveSignal, DeviceProbe, DeviceSlot, LooseValue, SiteStatus};

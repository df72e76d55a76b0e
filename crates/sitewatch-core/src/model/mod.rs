// ── Domain model ──
//
// Site status snapshots as the board sees them. Built from the wire
// records in `convert.rs`; never patched after construction.

mod site;

pub use site::{AliveSignal, DeviceProbe, DeviceSlot, SiteStatus};

/// Loosely-typed status scalar, shared with the wire layer.
pub use sitewatch_api::LooseValue;

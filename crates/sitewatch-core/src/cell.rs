//! Per-cell display state: status badges and tooltip content.
//!
//! Two status mappings coexist and stay distinct:
//!
//! - the badge kind ([`classify`]) follows truthiness, so `null` is
//!   `Down` and `"0"` is `Alive`;
//! - the device tooltip text compares the stringified value against
//!   `"1"` and `"0"` and falls back to `Unknown`.
//!
//! A renderer therefore can show a green badge whose tooltip reads
//! "Status: Unknown" (e.g. for `true`).

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::{AliveSignal, DeviceProbe, LooseValue};
use crate::timefmt;

/// Tooltip title of the heartbeat cell.
pub const ALIVE_SIGNAL_TITLE: &str = "Alive Signal";

/// Shown instead of a missing heartbeat hash key.
pub const MISSING_HASH_KEY: &str = "N/A";

// ── StatusKind ──────────────────────────────────────────────────────

/// Display classification of a cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StatusKind {
    Alive,
    Down,
    Unknown,
    NoIp,
    NoSignal,
}

impl StatusKind {
    /// Badge glyph for probed states; placeholders have none.
    pub fn glyph(self) -> Option<&'static str> {
        match self {
            Self::Alive => Some("📶"),
            Self::Down => Some("📵"),
            Self::Unknown => Some("🔍"),
            Self::NoIp | Self::NoSignal => None,
        }
    }

    /// Text of a placeholder badge.
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Self::NoIp => Some("No IP"),
            Self::NoSignal => Some("No Signal"),
            Self::Alive | Self::Down | Self::Unknown => None,
        }
    }
}

/// Badge classification of a raw status value.
///
/// Truthy values are `Alive`; everything else, including an absent
/// value, is `Down`. `Unknown` is never produced here.
pub fn classify(status: Option<&LooseValue>) -> StatusKind {
    if status.is_some_and(LooseValue::is_truthy) {
        StatusKind::Alive
    } else {
        StatusKind::Down
    }
}

// ── Cells ───────────────────────────────────────────────────────────

/// A standard device cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceCell {
    pub device_label: String,
    pub ip: Option<String>,
    pub kind: StatusKind,
    pub status: Option<LooseValue>,
    pub pinged_on: Option<String>,
}

/// The heartbeat cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AliveCell {
    pub kind: StatusKind,
    pub flag: Option<LooseValue>,
    pub hash_key: String,
    pub received_on: Option<String>,
    pub device_id: String,
}

pub fn describe_cell(
    ip: Option<&str>,
    status: Option<&LooseValue>,
    pinged_on: Option<&str>,
    device_label: &str,
) -> DeviceCell {
    let ip = ip.filter(|s| !s.is_empty());
    let kind = if ip.is_none() {
        StatusKind::NoIp
    } else {
        classify(status)
    };

    DeviceCell {
        device_label: device_label.to_owned(),
        ip: ip.map(str::to_owned),
        kind,
        status: status.cloned(),
        pinged_on: pinged_on.map(str::to_owned),
    }
}

pub fn describe_alive_cell(
    alive_flag: Option<&LooseValue>,
    hash_key: Option<&str>,
    received_on: Option<&str>,
    device_id: Option<&LooseValue>,
) -> AliveCell {
    let kind = match alive_flag {
        None => StatusKind::NoSignal,
        Some(flag) => classify(Some(flag)),
    };

    AliveCell {
        kind,
        flag: alive_flag.cloned(),
        hash_key: hash_key
            .filter(|k| !k.is_empty())
            .unwrap_or(MISSING_HASH_KEY)
            .to_owned(),
        received_on: received_on.map(str::to_owned),
        device_id: device_id.map(ToString::to_string).unwrap_or_default(),
    }
}

impl From<&DeviceProbe> for DeviceCell {
    fn from(p: &DeviceProbe) -> Self {
        describe_cell(
            p.ip.as_deref(),
            p.status.as_ref(),
            p.pinged_on.as_deref(),
            p.slot.label(),
        )
    }
}

impl From<&AliveSignal> for AliveCell {
    fn from(a: &AliveSignal) -> Self {
        describe_alive_cell(
            a.alive.as_ref(),
            a.hash_key.as_deref(),
            a.received_on.as_deref(),
            a.device_id.as_ref(),
        )
    }
}

// ── Tooltips ────────────────────────────────────────────────────────

/// Borrowed view over either cell type.
#[derive(Debug, Clone, Copy)]
pub enum CellRef<'a> {
    Device(&'a DeviceCell),
    Alive(&'a AliveCell),
}

impl<'a> From<&'a DeviceCell> for CellRef<'a> {
    fn from(cell: &'a DeviceCell) -> Self {
        Self::Device(cell)
    }
}

impl<'a> From<&'a AliveCell> for CellRef<'a> {
    fn from(cell: &'a AliveCell) -> Self {
        Self::Alive(cell)
    }
}

/// Hover/click detail for a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub title: String,
    /// "Alive", "Down" or "Unknown".
    pub status_text: &'static str,
    pub secondary_line: String,
    pub hash_line: Option<String>,
}

impl Tooltip {
    /// The status line as rendered, e.g. `Status: Alive`.
    pub fn status_line(&self) -> String {
        format!("Status: {}", self.status_text)
    }
}

/// Tooltip text of a device cell, from the stringified status.
pub fn device_status_text(status: Option<&LooseValue>) -> &'static str {
    match status.map(ToString::to_string).as_deref() {
        Some("1") => "Alive",
        Some("0") => "Down",
        _ => "Unknown",
    }
}

/// Tooltip text of the heartbeat cell. There is no `Unknown` branch.
pub fn alive_status_text(flag: Option<&LooseValue>) -> &'static str {
    let is_alive = flag.is_some_and(|f| {
        f.is_bool_true() || f.to_string().trim().to_lowercase() == "true"
    });
    if is_alive { "Alive" } else { "Down" }
}

/// Tooltip for a cell, or `None` for placeholder cells (no IP / no signal).
pub fn tooltip_content(cell: CellRef<'_>, offset: FixedOffset) -> Option<Tooltip> {
    match cell {
        CellRef::Device(c) if c.kind == StatusKind::NoIp => None,
        CellRef::Device(c) => Some(Tooltip {
            title: c.device_label.clone(),
            status_text: device_status_text(c.status.as_ref()),
            secondary_line: format!(
                "Pinged On: {}",
                timefmt::format_timestamp(c.pinged_on.as_deref(), offset)
            ),
            hash_line: None,
        }),
        CellRef::Alive(c) if c.kind == StatusKind::NoSignal => None,
        CellRef::Alive(c) => Some(Tooltip {
            title: ALIVE_SIGNAL_TITLE.to_owned(),
            status_text: alive_status_text(c.flag.as_ref()),
            secondary_line: format!(
                "Received On: {}",
                timefmt::format_timestamp(c.received_on.as_deref(), offset)
            ),
            hash_line: Some(format!("Hash Key: {}", c.hash_key)),
        }),
    }
}

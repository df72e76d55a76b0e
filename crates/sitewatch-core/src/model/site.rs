// ── Site status domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use super::LooseValue;

/// The monitored devices of a site, in display column order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
pub enum DeviceSlot {
    #[strum(serialize = "Aggregator")]
    Aggregator,
    #[strum(serialize = "Cabin A Controller")]
    CabinAController,
    #[strum(serialize = "Cabin B Controller")]
    CabinBController,
    #[strum(serialize = "Router")]
    Router,
    #[strum(serialize = "POC3")]
    Poc3,
}

impl DeviceSlot {
    pub const ALL: [DeviceSlot; 5] = [
        Self::Aggregator,
        Self::CabinAController,
        Self::CabinBController,
        Self::Router,
        Self::Poc3,
    ];

    /// Human-readable device name used as tooltip title.
    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Ping result for one device of a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProbe {
    pub slot: DeviceSlot,
    pub ip: Option<String>,
    pub status: Option<LooseValue>,
    pub pinged_on: Option<String>,
}

/// Heartbeat reported by the aggregator, independent of ping status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliveSignal {
    pub alive: Option<LooseValue>,
    pub hash_key: Option<String>,
    pub received_on: Option<String>,
    pub device_id: Option<LooseValue>,
}

/// One site of the status snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteStatus {
    pub name: String,
    pub code: String,
    /// Gateway category, used for category filtering.
    pub gateway: String,
    pub probes: [DeviceProbe; 5],
    pub alive: AliveSignal,
}

impl SiteStatus {
    /// The probe for a given device slot.
    pub fn probe(&self, slot: DeviceSlot) -> Option<&DeviceProbe> {
        self.probes.iter().find(|p| p.slot == slot)
    }
}

// ── Wire → domain conversion ──
//
// Regroups the endpoint's flat per-device columns into probes.

use sitewatch_api::SiteStatusRecord;

use crate::model::{AliveSignal, DeviceProbe, DeviceSlot, SiteStatus};

impl From<SiteStatusRecord> for SiteStatus {
    fn from(r: SiteStatusRecord) -> Self {
        let probe = |slot, ip, status, pinged_on| DeviceProbe {
            slot,
            ip,
            status,
            pinged_on,
        };

        Self {
            name: r.site_name,
            code: r.site_code,
            gateway: r.gateway_type,
            probes: [
                probe(
                    DeviceSlot::Aggregator,
                    r.aggregator_ip,
                    r.aggregator_status,
                    r.aggregator_pinged_on,
                ),
                probe(
                    DeviceSlot::CabinAController,
                    r.cabina_controller_ip,
                    r.cabina_controller_status,
                    r.cabina_pinged_on,
                ),
                probe(
                    DeviceSlot::CabinBController,
                    r.cabinb_controller_ip,
                    r.cabinb_controller_status,
                    r.cabinb_pinged_on,
                ),
                probe(
                    DeviceSlot::Router,
                    r.router_ip,
                    r.router_status,
                    r.router_pinged_on,
                ),
                probe(DeviceSlot::Poc3, r.poc3_ip, r.poc3_status, r.poc3_pinged_on),
            ],
            alive: AliveSignal {
                alive: r.aggregator_alive_status,
                hash_key: r.aggregator_hash_key,
                received_on: r.aggregator_alive_last_received_on,
                device_id: r.aggregator_device_id,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::LooseValue;

    #[test]
    fn columns_map_to_their_slots() {
        let record = SiteStatusRecord {
            site_name: "Baner".into(),
            site_code: "PUN-002".into(),
            gateway_type: "4G".into(),
            cabinb_controller_ip: Some("10.2.0.3".into()),
            cabinb_controller_status: Some(LooseValue::Int(0)),
            poc3_pinged_on: Some("2024-06-15T10:30:00".into()),
            aggregator_hash_key: Some("abc".into()),
            ..SiteStatusRecord::default()
        };

        let site = SiteStatus::from(record);

        let cabin_b = site.probe(DeviceSlot::CabinBController).unwrap();
        assert_eq!(cabin_b.ip.as_deref(), Some("10.2.0.3"));
        assert_eq!(cabin_b.status, Some(LooseValue::Int(0)));
        assert_eq!(
            site.probe(DeviceSlot::Poc3).unwrap().pinged_on.as_deref(),
            Some("2024-06-15T10:30:00")
        );
        assert_eq!(site.alive.hash_key.as_deref(), Some("abc"));
        assert_eq!(site.gateway, "4G");
    }
}

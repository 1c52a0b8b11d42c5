// Connection quality analysis
//
// Pure function of one status blob — no I/O, no mutable state. The
// report is recomputed on every poll and never merged with a previous
// one. Missing or malformed fields degrade to zeros and empty lists;
// the protocol is unversioned and must never crash the client.

use serde::Serialize;

use plcwatch_api::{StatusBlob, protocol};

/// Minimum healthy throughput per direction. A fixed quality floor for
/// the powerline medium, not a tunable.
pub const MIN_LINK_MBPS: u64 = 25;

// The device reports link rates in its native unit; 32/1000 of a Mbps
// per unit is a protocol fact of this device family.
const RATE_UNIT_NUMERATOR: u64 = 32;
const RATE_UNIT_DIVISOR: u64 = 1000;

/// Convert native rate units to Mbps (floor).
pub fn rate_units_to_mbps(raw_units: u64) -> u64 {
    raw_units * RATE_UNIT_NUMERATOR / RATE_UNIT_DIVISOR
}

/// Derived connection-quality snapshot for one device.
///
/// Carries both the raw per-link lists (for diagnostics) and the
/// derived master-only throughput the issue detection is based on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub device_name: String,
    pub uptime_secs: u64,
    pub device_id: u64,
    pub domain_master_id: u64,
    /// Master-link rates in native units.
    pub master_rx_units: u64,
    pub master_tx_units: u64,
    /// Master-link throughput in Mbps.
    pub master_rx_mbps: u64,
    pub master_tx_mbps: u64,
    /// Raw per-link lists; indexes align across the three.
    pub rx_units: Vec<u64>,
    pub tx_units: Vec<u64>,
    pub device_ids: Vec<u64>,
    pub mac_addresses: Vec<String>,
    pub master_lost_count: u64,
    pub lost_map_count: u64,
    pub issues: Vec<String>,
}

impl QualityReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Analyze a status blob into a quality report.
pub fn analyze(blob: &StatusBlob) -> QualityReport {
    let device_ids = blob.u64_list(protocol::DIDS_KEY);
    let rx_units = blob.u64_list(protocol::RX_BPS_KEY);
    let tx_units = blob.u64_list(protocol::TX_BPS_KEY);
    let mac_addresses = blob.str_list(protocol::MACS_KEY);

    let device_id = blob.u64_or_zero(protocol::DEVICE_DID_KEY);
    let domain_master_id = blob.u64_or_zero(protocol::DM_DID_KEY);

    // The representative throughput is the link to the domain master.
    // A master absent from the per-link lists still leaves a usable
    // signal: take the best observed rate per direction, independently.
    let master_index = device_ids.iter().position(|did| *did == domain_master_id);
    let (master_rx, master_tx) = match master_index {
        Some(i) => (
            rx_units.get(i).copied().unwrap_or(0),
            tx_units.get(i).copied().unwrap_or(0),
        ),
        None => (
            rx_units.iter().copied().max().unwrap_or(0),
            tx_units.iter().copied().max().unwrap_or(0),
        ),
    };

    let master_rx_mbps = rate_units_to_mbps(master_rx);
    let master_tx_mbps = rate_units_to_mbps(master_tx);

    let mut issues = Vec::new();
    if master_rx == 0 && master_tx == 0 {
        issues.push("no bandwidth detected (0 Mbps RX/TX)".to_owned());
    } else if master_rx == 0 {
        issues.push("no receive bandwidth detected".to_owned());
    } else if master_tx == 0 {
        issues.push("no transmit bandwidth detected".to_owned());
    }
    if master_rx_mbps < MIN_LINK_MBPS {
        issues.push(format!("low receive bandwidth ({master_rx_mbps} Mbps)"));
    }
    if master_tx_mbps < MIN_LINK_MBPS {
        issues.push(format!("low transmit bandwidth ({master_tx_mbps} Mbps)"));
    }

    QualityReport {
        device_name: blob.get(protocol::DEVICE_NAME_KEY).unwrap_or_default().to_owned(),
        uptime_secs: blob.u64_or_zero(protocol::UPTIME_KEY),
        device_id,
        domain_master_id,
        master_rx_units: master_rx,
        master_tx_units: master_tx,
        master_rx_mbps,
        master_tx_mbps,
        rx_units,
        tx_units,
        device_ids,
        mac_addresses,
        master_lost_count: blob.u64_or_zero(protocol::DM_LOST_KEY),
        lost_map_count: blob.u64_or_zero(protocol::MAP_LOST_KEY),
        issues,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn blob(raw: &str) -> StatusBlob {
        StatusBlob::parse(raw)
    }

    #[test]
    fn empty_blob_yields_zeroed_report_with_no_bandwidth_issue() {
        let report = analyze(&blob(""));

        assert_eq!(report.device_name, "");
        assert_eq!(report.uptime_secs, 0);
        assert_eq!(report.device_id, 0);
        assert_eq!(report.domain_master_id, 0);
        assert_eq!(report.master_rx_mbps, 0);
        assert_eq!(report.master_tx_mbps, 0);
        assert!(report.rx_units.is_empty());
        assert!(report.tx_units.is_empty());
        assert!(report.device_ids.is_empty());
        assert!(report.mac_addresses.is_empty());
        assert!(
            report
                .issues
                .contains(&"no bandwidth detected (0 Mbps RX/TX)".to_owned())
        );
    }

    #[test]
    fn unit_conversion_floors() {
        assert_eq!(rate_units_to_mbps(1000), 32);
        assert_eq!(rate_units_to_mbps(500), 16);
        assert_eq!(rate_units_to_mbps(0), 0);
        // 31 units * 32 / 1000 = 0.992 → floor to 0
        assert_eq!(rate_units_to_mbps(31), 0);
    }

    #[test]
    fn healthy_link_raises_no_issues() {
        let report = analyze(&blob(
            "GHN.GENERAL.DM_DID=1\n\
             DIDMNG.GENERAL.DIDS=1\n\
             DIDMNG.GENERAL.RX_BPS=1000\n\
             DIDMNG.GENERAL.TX_BPS=1000\n",
        ));

        assert_eq!(report.master_rx_mbps, 32);
        assert_eq!(report.master_tx_mbps, 32);
        assert!(report.is_healthy());
    }

    #[test]
    fn low_receive_bandwidth_carries_computed_mbps() {
        let report = analyze(&blob(
            "GHN.GENERAL.DM_DID=1\n\
             DIDMNG.GENERAL.DIDS=1\n\
             DIDMNG.GENERAL.RX_BPS=500\n\
             DIDMNG.GENERAL.TX_BPS=1000\n",
        ));

        assert_eq!(report.master_rx_mbps, 16);
        assert!(
            report
                .issues
                .contains(&"low receive bandwidth (16 Mbps)".to_owned())
        );
        assert!(!report.issues.iter().any(|i| i.contains("transmit")));
    }

    #[test]
    fn master_link_selected_by_domain_master_id() {
        let report = analyze(&blob(
            "GHN.GENERAL.DM_DID=2\n\
             DIDMNG.GENERAL.DIDS=1,2,3\n\
             DIDMNG.GENERAL.RX_BPS=10,20,30\n\
             DIDMNG.GENERAL.TX_BPS=40,50,60\n",
        ));

        assert_eq!(report.master_rx_units, 20);
        assert_eq!(report.master_tx_units, 50);
    }

    #[test]
    fn absent_master_falls_back_to_independent_maxima() {
        let report = analyze(&blob(
            "GHN.GENERAL.DM_DID=9\n\
             DIDMNG.GENERAL.DIDS=1,2,3\n\
             DIDMNG.GENERAL.RX_BPS=10,30,20\n\
             DIDMNG.GENERAL.TX_BPS=5,1,9\n",
        ));

        // Max per direction, not necessarily from the same link.
        assert_eq!(report.master_rx_units, 30);
        assert_eq!(report.master_tx_units, 9);
    }

    #[test]
    fn zero_rx_only_reports_no_receive_bandwidth() {
        let report = analyze(&blob(
            "GHN.GENERAL.DM_DID=1\n\
             DIDMNG.GENERAL.DIDS=1\n\
             DIDMNG.GENERAL.RX_BPS=0\n\
             DIDMNG.GENERAL.TX_BPS=1000\n",
        ));

        assert!(
            report
                .issues
                .contains(&"no receive bandwidth detected".to_owned())
        );
        assert!(!report.issues.iter().any(|i| i.starts_with("no transmit")));
        // 0 Mbps is also below the floor; both issues apply.
        assert!(
            report
                .issues
                .contains(&"low receive bandwidth (0 Mbps)".to_owned())
        );
    }

    #[test]
    fn zero_tx_only_reports_no_transmit_bandwidth() {
        let report = analyze(&blob(
            "GHN.GENERAL.DM_DID=1\n\
             DIDMNG.GENERAL.DIDS=1\n\
             DIDMNG.GENERAL.RX_BPS=1000\n\
             DIDMNG.GENERAL.TX_BPS=0\n",
        ));

        assert!(
            report
                .issues
                .contains(&"no transmit bandwidth detected".to_owned())
        );
        assert!(!report.issues.iter().any(|i| i.starts_with("no receive")));
    }

    #[test]
    fn report_carries_diagnostics_fields() {
        let report = analyze(&blob(
            "SYSTEM.PRODUCTION.DEVICE_NAME=attic\n\
             SYSTEM.GENERAL.UPTIME=7200\n\
             GHN.GENERAL.DEVICE_DID=3\n\
             GHN.GENERAL.DM_DID=1\n\
             DIDMNG.GENERAL.DIDS=1,3\n\
             DIDMNG.GENERAL.MACS=aa:bb:cc:00:00:01,aa:bb:cc:00:00:03\n\
             DIDMNG.GENERAL.RX_BPS=1000,900\n\
             DIDMNG.GENERAL.TX_BPS=1000,900\n\
             GHN.COUNTERS.DM_LOST=4\n\
             GHN.COUNTERS.MAP_LOST=7\n",
        ));

        assert_eq!(report.device_name, "attic");
        assert_eq!(report.uptime_secs, 7200);
        assert_eq!(report.device_id, 3);
        assert_eq!(report.domain_master_id, 1);
        assert_eq!(report.mac_addresses.len(), 2);
        assert_eq!(report.master_lost_count, 4);
        assert_eq!(report.lost_map_count, 7);
        assert_eq!(report.rx_units, vec![1000, 900]);
    }
}

//! Page catalog: pure functions from a provider snapshot to display lines.
//!
//! Four pages in fixed order, cycled modulo [`PAGE_COUNT`] by short
//! presses. When no WAN uplink is configured the Access-Point block
//! overrides every page.

use crate::config::{CONFIG_IP, CONFIG_PIN};
use crate::provider::Snapshot;

/// Number of pages in the catalog.
pub const PAGE_COUNT: usize = 4;

/// Whether the Access-Point fallback is active for this snapshot.
///
/// The external network scripts write `none` when no uplink is configured;
/// an absent or empty state file means the same thing.
pub fn access_point_mode(snapshot: &Snapshot) -> bool {
    matches!(snapshot.wan_if.as_str(), "none" | "N/A" | "")
}

/// Renders the page at `page` (taken modulo [`PAGE_COUNT`]) for the given
/// snapshot. The Access-Point block overrides every page while active.
pub fn render(snapshot: &Snapshot, page: usize) -> Vec<String> {
    if access_point_mode(snapshot) {
        return access_point_block(snapshot);
    }
    match page % PAGE_COUNT {
        0 => connectivity_page(snapshot),
        1 => info_page(snapshot),
        2 => summary_page(snapshot),
        _ => stats_page(snapshot),
    }
}

/// Fixed configuration-mode block shown while no uplink is configured.
fn access_point_block(snapshot: &Snapshot) -> Vec<String> {
    vec![
        "Access Point Mode".to_string(),
        format!("Config IP: {}", CONFIG_IP),
        format!("PIN: {}", CONFIG_PIN),
        format!("Clients: {}", snapshot.clients),
    ]
}

fn connectivity_page(snapshot: &Snapshot) -> Vec<String> {
    let wan_line = if snapshot.captive {
        format!("WAN: {} (CAPTIVE)", snapshot.wan_ip)
    } else {
        format!("WAN: {}", snapshot.wan_ip)
    };
    vec![
        wan_line,
        format!("WAN Port: {}", snapshot.wan_if),
        format!("LAN: {}", snapshot.lan_ifs),
        format!("Clients: {}", snapshot.clients),
    ]
}

fn info_page(snapshot: &Snapshot) -> Vec<String> {
    vec![
        "Atlantis Router".to_string(),
        format!("Setup: http://{}", CONFIG_IP),
        "Hold 5s: copy logs".to_string(),
        format!("Clients: {}", snapshot.clients),
    ]
}

fn summary_page(snapshot: &Snapshot) -> Vec<String> {
    let Some(summary) = &snapshot.summary else {
        return vec![
            "Last Session".to_string(),
            "No summary found".to_string(),
        ];
    };
    vec![
        "Last Session".to_string(),
        format!("Clients: {:.1}", summary.avg_clients),
        format!(
            "Blocked: {:.0} ({:.1}%)",
            summary.avg_ads_blocked, summary.avg_ads_pct
        ),
        format!("Queries: {:.0}", summary.avg_queries),
    ]
}

fn stats_page(snapshot: &Snapshot) -> Vec<String> {
    let Some(stats) = &snapshot.stats else {
        return vec![
            "Pi-hole Today".to_string(),
            "No stats available".to_string(),
        ];
    };
    vec![
        "Pi-hole Today".to_string(),
        format!("Queries: {}", stats.dns_queries_today),
        format!(
            "Blocked: {} ({:.1}%)",
            stats.ads_blocked_today, stats.ads_percentage_today
        ),
        format!("Clients: {}", stats.unique_clients),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{LiveStats, SessionSummary};

    fn online_snapshot() -> Snapshot {
        Snapshot {
            wan_if: "eth0".to_string(),
            lan_ifs: "eth1,eth2".to_string(),
            captive: false,
            wan_ip: "10.20.30.40".to_string(),
            clients: 3,
            summary: None,
            stats: None,
        }
    }

    #[test]
    fn connectivity_page_matches_layout() {
        let lines = render(&online_snapshot(), 0);
        assert_eq!(
            lines,
            vec![
                "WAN: 10.20.30.40",
                "WAN Port: eth0",
                "LAN: eth1,eth2",
                "Clients: 3",
            ]
        );
    }

    #[test]
    fn captive_portal_suffixes_the_wan_line() {
        let mut snap = online_snapshot();
        snap.captive = true;
        assert_eq!(render(&snap, 0)[0], "WAN: 10.20.30.40 (CAPTIVE)");
    }

    #[test]
    fn info_page_shows_client_count() {
        let lines = render(&online_snapshot(), 1);
        assert_eq!(lines[0], "Atlantis Router");
        assert_eq!(lines[3], "Clients: 3");
    }

    #[test]
    fn summary_page_without_summary_shows_message() {
        let lines = render(&online_snapshot(), 2);
        assert_eq!(lines, vec!["Last Session", "No summary found"]);
    }

    #[test]
    fn summary_page_formats_averages() {
        let mut snap = online_snapshot();
        snap.summary = Some(SessionSummary {
            avg_clients: 2.5,
            avg_ads_blocked: 142.0,
            avg_queries: 980.0,
            avg_ads_pct: 14.5,
        });
        assert_eq!(
            render(&snap, 2),
            vec![
                "Last Session",
                "Clients: 2.5",
                "Blocked: 142 (14.5%)",
                "Queries: 980",
            ]
        );
    }

    #[test]
    fn stats_page_without_stats_shows_message() {
        let lines = render(&online_snapshot(), 3);
        assert_eq!(lines, vec!["Pi-hole Today", "No stats available"]);
    }

    #[test]
    fn stats_page_formats_counters() {
        let mut snap = online_snapshot();
        snap.stats = Some(LiveStats {
            dns_queries_today: 9823,
            ads_blocked_today: 1204,
            ads_percentage_today: 12.3,
            unique_clients: 4,
        });
        assert_eq!(
            render(&snap, 3),
            vec![
                "Pi-hole Today",
                "Queries: 9823",
                "Blocked: 1204 (12.3%)",
                "Clients: 4",
            ]
        );
    }

    #[test]
    fn access_point_block_overrides_every_page() {
        let mut snap = online_snapshot();
        snap.wan_if = "none".to_string();
        let expected = vec![
            "Access Point Mode".to_string(),
            "Config IP: 192.168.1.1".to_string(),
            "PIN: 0831".to_string(),
            "Clients: 3".to_string(),
        ];
        for page in 0..PAGE_COUNT {
            assert_eq!(render(&snap, page), expected);
        }
    }

    #[test]
    fn absent_wan_state_also_triggers_access_point_mode() {
        let mut snap = online_snapshot();
        for value in ["N/A", ""] {
            snap.wan_if = value.to_string();
            assert!(access_point_mode(&snap));
        }
        snap.wan_if = "eth0".to_string();
        assert!(!access_point_mode(&snap));
    }

    #[test]
    fn page_index_wraps_modulo_page_count() {
        let snap = online_snapshot();
        assert_eq!(render(&snap, 4), render(&snap, 0));
        assert_eq!(render(&snap, 7), render(&snap, 3));
    }
}

//! Data providers: point-in-time facts about the router, gathered fresh on
//! every render tick.
//!
//! Every provider is independently failable and degrades to a sentinel
//! value ("N/A", "0.0.0.0", 0, `None`) instead of raising. A failure is
//! logged and shows up as an in-page placeholder, nothing more.

mod stats;
mod summary;

use std::path::Path;

use tracing::debug;

pub use stats::{LiveStats, STATS_TIMEOUT, StatsClient};
pub use summary::{SessionSummary, latest_summary};

use crate::config::PanelConfig;
use crate::system::{CommandRunner, FileSystem};

/// One render tick's worth of provider output.
///
/// Rebuilt from scratch each tick; a failed provider contributes its
/// sentinel, never a stale previous value.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// WAN interface name, `"none"` when no uplink is configured.
    pub wan_if: String,
    /// Comma-separated LAN interface list.
    pub lan_ifs: String,
    /// Captive-portal flag reported by the connectivity checker.
    pub captive: bool,
    /// First IPv4 address of the WAN interface, `"0.0.0.0"` when unknown.
    pub wan_ip: String,
    /// Associated client count on the LAN bridge.
    pub clients: u32,
    /// Most recent completed-session summary, if any exists.
    pub summary: Option<SessionSummary>,
    /// Live ad-filter stats, if the endpoint answered.
    pub stats: Option<LiveStats>,
}

/// Gathers provider facts from state files, external commands and the
/// live stats endpoint.
pub struct Providers<F: FileSystem, C: CommandRunner> {
    fs: F,
    cmd: C,
    stats: StatsClient,
    cfg: PanelConfig,
}

impl<F: FileSystem, C: CommandRunner> Providers<F, C> {
    pub fn new(fs: F, cmd: C, stats: StatsClient, cfg: PanelConfig) -> Self {
        Self {
            fs,
            cmd,
            stats,
            cfg,
        }
    }

    /// Collects a full snapshot. The live stats fetch is the only call
    /// here that can stall, and it is bounded by [`STATS_TIMEOUT`].
    pub fn collect(&self) -> Snapshot {
        let wan_if = self.wan_interface();
        let wan_ip = self.interface_ipv4(&wan_if);
        Snapshot {
            wan_ip,
            lan_ifs: self.lan_interfaces(),
            captive: self.captive_active(),
            clients: self.client_count(),
            summary: latest_summary(&self.fs, &self.cfg.history_dir),
            stats: self.stats.fetch(),
            wan_if,
        }
    }

    /// Reads a trimmed state-file value, falling back to `default` when the
    /// file is absent or unreadable.
    fn state_value(&self, path: &Path, default: &str) -> String {
        match self.fs.read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                debug!("state file {:?} unreadable ({}), using {:?}", path, e, default);
                default.to_string()
            }
        }
    }

    /// WAN interface name from the state file; `"none"` when absent.
    pub fn wan_interface(&self) -> String {
        self.state_value(&self.cfg.wan_file, "none")
    }

    /// LAN interface list from the state file; `"N/A"` when absent.
    pub fn lan_interfaces(&self) -> String {
        self.state_value(&self.cfg.lan_file, "N/A")
    }

    /// Whether the connectivity checker currently reports a captive portal.
    pub fn captive_active(&self) -> bool {
        self.state_value(&self.cfg.captive_file, "OK") == "CAPTIVE"
    }

    /// First IPv4 address of `iface` via `ip -4 addr show`; `"0.0.0.0"` on
    /// any failure.
    pub fn interface_ipv4(&self, iface: &str) -> String {
        const SENTINEL: &str = "0.0.0.0";
        if iface.is_empty() || iface == "none" || iface == "N/A" {
            return SENTINEL.to_string();
        }
        let output = match self.cmd.run("ip", &["-4", "addr", "show", iface]) {
            Ok(out) if out.success => out,
            Ok(_) => {
                debug!("ip addr show {} exited non-zero", iface);
                return SENTINEL.to_string();
            }
            Err(e) => {
                debug!("ip addr show {} failed: {}", iface, e);
                return SENTINEL.to_string();
            }
        };
        parse_first_inet(&output.stdout).unwrap_or_else(|| SENTINEL.to_string())
    }

    /// Number of ARP entries on the LAN bridge; 0 on any failure.
    pub fn client_count(&self) -> u32 {
        let output = match self.cmd.run("arp", &["-n"]) {
            Ok(out) if out.success => out,
            Ok(_) | Err(_) => {
                debug!("arp -n unavailable, reporting 0 clients");
                return 0;
            }
        };
        output
            .stdout
            .lines()
            .filter(|line| line.split_whitespace().next_back() == Some(self.cfg.lan_bridge.as_str()))
            .count() as u32
    }
}

/// Extracts the address from the first `inet a.b.c.d/prefix` token pair in
/// `ip -4 addr show` output.
fn parse_first_inet(stdout: &str) -> Option<String> {
    for line in stdout.lines() {
        let mut tokens = line.split_whitespace();
        while let Some(token) = tokens.next() {
            if token == "inet" {
                let addr = tokens.next()?;
                return Some(addr.split('/').next().unwrap_or(addr).to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::{MockCommands, MockFs};
    use std::time::Duration;

    const IP_SHOW_ETH0: &str = "\
2: eth0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc fq_codel state UP
    inet 10.20.30.40/24 brd 10.20.30.255 scope global dynamic eth0
       valid_lft 86393sec preferred_lft 86393sec
";

    const ARP_TABLE: &str = "\
Address                  HWtype  HWaddress           Flags Mask            Iface
192.168.1.10             ether   aa:bb:cc:dd:ee:01   C                     br0
192.168.1.11             ether   aa:bb:cc:dd:ee:02   C                     br0
10.20.30.1               ether   aa:bb:cc:dd:ee:03   C                     eth0
192.168.1.12             ether   aa:bb:cc:dd:ee:04   C                     br0
";

    fn providers(fs: MockFs, cmd: MockCommands) -> Providers<MockFs, MockCommands> {
        // Port 1 is never listening, so stats degrade to None immediately.
        let stats = StatsClient::new("http://127.0.0.1:1/api.php", Duration::from_millis(200))
            .expect("client");
        Providers::new(fs, cmd, stats, PanelConfig::default())
    }

    #[test]
    fn state_files_fall_back_to_defaults_when_absent() {
        let p = providers(MockFs::new(), MockCommands::new());
        assert_eq!(p.wan_interface(), "none");
        assert_eq!(p.lan_interfaces(), "N/A");
        assert!(!p.captive_active());
    }

    #[test]
    fn state_files_are_trimmed() {
        let fs = MockFs::new();
        fs.add_file("/tmp/atlantis-wan", "eth0\n");
        fs.add_file("/tmp/atlantis-captive", "CAPTIVE\n");
        let p = providers(fs, MockCommands::new());
        assert_eq!(p.wan_interface(), "eth0");
        assert!(p.captive_active());
    }

    #[test]
    fn interface_ipv4_parses_first_address() {
        let cmd = MockCommands::new();
        cmd.on_success("ip -4 addr show eth0", IP_SHOW_ETH0);
        let p = providers(MockFs::new(), cmd);
        assert_eq!(p.interface_ipv4("eth0"), "10.20.30.40");
    }

    #[test]
    fn interface_ipv4_degrades_to_sentinel() {
        let cmd = MockCommands::new();
        cmd.on_failure("ip -4 addr show wlan1");
        cmd.on_success("ip -4 addr show eth1", "2: eth1: <NO-CARRIER> state DOWN\n");
        let p = providers(MockFs::new(), cmd);

        // Missing interface (command exits non-zero).
        assert_eq!(p.interface_ipv4("wlan1"), "0.0.0.0");
        // Interface without an address.
        assert_eq!(p.interface_ipv4("eth1"), "0.0.0.0");
        // Command not present at all.
        assert_eq!(p.interface_ipv4("eth9"), "0.0.0.0");
        // No uplink configured: lookup is skipped entirely.
        assert_eq!(p.interface_ipv4("none"), "0.0.0.0");
    }

    #[test]
    fn client_count_counts_bridge_entries_only() {
        let cmd = MockCommands::new();
        cmd.on_success("arp -n", ARP_TABLE);
        let p = providers(MockFs::new(), cmd);
        assert_eq!(p.client_count(), 3);
    }

    #[test]
    fn client_count_is_zero_on_failure() {
        let p = providers(MockFs::new(), MockCommands::new());
        assert_eq!(p.client_count(), 0);
    }

    #[test]
    fn collect_assembles_degraded_snapshot() {
        let p = providers(MockFs::new(), MockCommands::new());
        let snap = p.collect();
        assert_eq!(snap.wan_if, "none");
        assert_eq!(snap.wan_ip, "0.0.0.0");
        assert_eq!(snap.lan_ifs, "N/A");
        assert!(!snap.captive);
        assert_eq!(snap.clients, 0);
        assert_eq!(snap.summary, None);
        assert_eq!(snap.stats, None);
    }

    #[test]
    fn parse_first_inet_handles_garbage() {
        assert_eq!(parse_first_inet(""), None);
        assert_eq!(parse_first_inet("no addresses here"), None);
        assert_eq!(
            parse_first_inet("    inet 192.168.1.1/24 brd ..."),
            Some("192.168.1.1".to_string())
        );
    }
}

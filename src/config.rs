//! Daemon configuration: state-file paths, hold thresholds, tick intervals.

use std::path::PathBuf;
use std::time::Duration;

/// Gateway address shown in the Access-Point configuration block.
pub const CONFIG_IP: &str = "192.168.1.1";

/// Configuration PIN shown in the Access-Point configuration block.
pub const CONFIG_PIN: &str = "0831";

/// Runtime configuration for the panel daemon.
///
/// Defaults match the appliance image; every field can be overridden from
/// the command line.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// State file holding the WAN interface name ("none" when no uplink).
    pub wan_file: PathBuf,
    /// State file holding the comma-separated LAN interface list.
    pub lan_file: PathBuf,
    /// State file holding the captive-portal status ("OK" or "CAPTIVE").
    pub captive_file: PathBuf,
    /// LAN bridge interface used for client counting.
    pub lan_bridge: String,
    /// Directory of dated session summary files.
    pub history_dir: PathBuf,
    /// Status log file copied during export.
    pub status_log: PathBuf,
    /// Live ad-filter stats endpoint.
    pub stats_url: String,
    /// Sysfs value file of the panel button GPIO (active-low).
    pub button_value_file: PathBuf,
    /// Candidate mount roots probed for an external volume during export.
    pub mount_candidates: Vec<PathBuf>,
    /// Session summarization command run before power-off.
    pub summarize_cmd: String,

    /// Button sampling tick.
    pub sample_interval: Duration,
    /// Render tick.
    pub render_interval: Duration,
    /// Press duration that arms the log-export action.
    pub copy_hold: Duration,
    /// Press duration that triggers shutdown.
    pub shutdown_hold: Duration,
    /// How long sequencer feedback frames stay on screen.
    pub dwell: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            wan_file: PathBuf::from("/tmp/atlantis-wan"),
            lan_file: PathBuf::from("/tmp/atlantis-lan"),
            captive_file: PathBuf::from("/tmp/atlantis-captive"),
            lan_bridge: "br0".to_string(),
            history_dir: PathBuf::from("/var/lib/atlantis/history"),
            status_log: PathBuf::from("/var/log/atlantis-status.log"),
            stats_url: "http://127.0.0.1/admin/api.php".to_string(),
            button_value_file: PathBuf::from("/sys/class/gpio/gpio4/value"),
            mount_candidates: vec![
                PathBuf::from("/media/usb0"),
                PathBuf::from("/media/usb1"),
                PathBuf::from("/mnt/usb"),
            ],
            summarize_cmd: "/usr/local/bin/atlantis-summarize".to_string(),
            sample_interval: Duration::from_millis(100),
            render_interval: Duration::from_secs(5),
            copy_hold: Duration::from_secs(5),
            shutdown_hold: Duration::from_secs(10),
            dwell: Duration::from_secs(3),
        }
    }
}

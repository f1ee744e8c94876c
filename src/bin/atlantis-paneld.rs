//! atlantis-paneld - front-panel status/control daemon.
//!
//! Renders router state to the panel display on a slow tick and samples the
//! panel button on a fast tick. Short press cycles pages, a 5 s hold exports
//! logs to USB, a 10 s hold powers the device off.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use atlantis_panel::button::{ButtonClassifier, SysfsPin};
use atlantis_panel::config::PanelConfig;
use atlantis_panel::dispatch::{ActionState, Dispatcher, shared_state};
use atlantis_panel::page;
use atlantis_panel::provider::{Providers, STATS_TIMEOUT, StatsClient};
use atlantis_panel::sequence::Sequencer;
use atlantis_panel::surface::{FrameFileSurface, StdoutSurface, Surface};
use atlantis_panel::system::{RealCommands, RealFs};

/// Front-panel status/control daemon.
#[derive(Parser)]
#[command(name = "atlantis-paneld", about = "Front-panel status/control daemon", version)]
struct Args {
    /// State file holding the WAN interface name.
    #[arg(long, default_value = "/tmp/atlantis-wan")]
    wan_file: PathBuf,

    /// State file holding the LAN interface list.
    #[arg(long, default_value = "/tmp/atlantis-lan")]
    lan_file: PathBuf,

    /// State file holding the captive-portal status ("OK"/"CAPTIVE").
    #[arg(long, default_value = "/tmp/atlantis-captive")]
    captive_file: PathBuf,

    /// LAN bridge interface used for client counting.
    #[arg(long, default_value = "br0")]
    lan_bridge: String,

    /// Directory of dated session summary files.
    #[arg(long, default_value = "/var/lib/atlantis/history")]
    history_dir: PathBuf,

    /// Status log copied during USB export.
    #[arg(long, default_value = "/var/log/atlantis-status.log")]
    status_log: PathBuf,

    /// Live ad-filter stats endpoint.
    #[arg(long, default_value = "http://127.0.0.1/admin/api.php")]
    stats_url: String,

    /// GPIO number of the panel button (active-low, sysfs).
    #[arg(long, default_value = "4")]
    button_gpio: u32,

    /// Write frames to this file instead of stdout (consumed by the
    /// display driver).
    #[arg(long, value_name = "PATH")]
    frame_file: Option<PathBuf>,

    /// Render interval in seconds.
    #[arg(short, long, default_value = "5")]
    interval: u64,

    /// Button sampling interval in milliseconds.
    #[arg(long, default_value = "100")]
    sample_ms: u64,

    /// Hold duration in seconds that triggers the log export.
    #[arg(long, default_value = "5")]
    copy_hold: u64,

    /// Hold duration in seconds that triggers shutdown.
    #[arg(long, default_value = "10")]
    shutdown_hold: u64,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("atlantis_paneld={}", level).parse().unwrap())
        .add_directive(format!("atlantis_panel={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Render sink selected on the command line.
enum PanelSurface {
    Stdout(StdoutSurface),
    File(FrameFileSurface),
}

impl Surface for PanelSurface {
    fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        match self {
            PanelSurface::Stdout(s) => s.draw(lines),
            PanelSurface::File(s) => s.draw(lines),
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if args.shutdown_hold <= args.copy_hold {
        error!(
            "--shutdown-hold ({}s) must be greater than --copy-hold ({}s)",
            args.shutdown_hold, args.copy_hold
        );
        std::process::exit(1);
    }

    let cfg = PanelConfig {
        wan_file: args.wan_file,
        lan_file: args.lan_file,
        captive_file: args.captive_file,
        lan_bridge: args.lan_bridge,
        history_dir: args.history_dir,
        status_log: args.status_log,
        stats_url: args.stats_url,
        button_value_file: PathBuf::from(format!(
            "/sys/class/gpio/gpio{}/value",
            args.button_gpio
        )),
        sample_interval: Duration::from_millis(args.sample_ms),
        render_interval: Duration::from_secs(args.interval),
        copy_hold: Duration::from_secs(args.copy_hold),
        shutdown_hold: Duration::from_secs(args.shutdown_hold),
        ..PanelConfig::default()
    };

    info!("atlantis-paneld {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Config: render={}s, sample={}ms, copy_hold={}s, shutdown_hold={}s",
        args.interval, args.sample_ms, args.copy_hold, args.shutdown_hold
    );
    info!(
        "Paths: wan={:?}, lan={:?}, captive={:?}, history={:?}",
        cfg.wan_file, cfg.lan_file, cfg.captive_file, cfg.history_dir
    );

    let surface = match args.frame_file {
        Some(path) => {
            info!("Rendering frames to {:?}", path);
            PanelSurface::File(FrameFileSurface::new(path))
        }
        None => PanelSurface::Stdout(StdoutSurface::new()),
    };
    let surface = Arc::new(Mutex::new(surface));

    let stats = match StatsClient::new(&cfg.stats_url, STATS_TIMEOUT) {
        Ok(stats) => stats,
        Err(e) => {
            error!("failed to build stats client: {}", e);
            std::process::exit(1);
        }
    };
    let providers = Providers::new(RealFs::new(), RealCommands::new(), stats, cfg.clone());

    let state = shared_state();
    let sequencer = Sequencer::new(surface.clone(), RealFs::new(), RealCommands::new(), cfg.clone());
    let dispatcher = Dispatcher::new(state.clone(), sequencer);

    // Setup graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    // Button thread: fast tick, never blocked by the render loop.
    let button_handle = {
        let running = running.clone();
        let pin = SysfsPin::new(RealFs::new(), cfg.button_value_file.clone());
        let mut classifier = ButtonClassifier::new(cfg.copy_hold, cfg.shutdown_hold);
        let sample_interval = cfg.sample_interval;
        std::thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                let pressed = pin.is_pressed();
                if let Some(event) = classifier.sample(pressed, Instant::now()) {
                    dispatcher.handle(event);
                }
                std::thread::sleep(sample_interval);
            }
        })
    };

    info!("Starting render loop");
    let mut frame_count: u64 = 0;

    while running.load(Ordering::SeqCst) {
        let snapshot = providers.collect();
        let (current_page, action) = {
            let state = state.lock().unwrap_or_else(PoisonError::into_inner);
            (state.page, state.action)
        };

        // While a sequence is in flight its feedback frames own the
        // display; skip the periodic redraw.
        if action == ActionState::Idle {
            let lines = page::render(&snapshot, current_page);
            let mut surface = surface.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = surface.draw(&lines) {
                error!("frame draw failed: {}", e);
            }
            frame_count += 1;
            debug!(
                "Frame #{}: page={}, wan={}, clients={}",
                frame_count, current_page, snapshot.wan_if, snapshot.clients
            );
        } else {
            debug!("render tick skipped, action in flight: {:?}", action);
        }

        // Sleep with periodic checks for shutdown signal
        let sleep_interval = Duration::from_millis(100);
        let mut remaining = cfg.render_interval;
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(sleep_interval);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
    }

    info!("Shutting down...");
    if button_handle.join().is_err() {
        warn!("button thread panicked");
    }
    info!("Shutdown complete");
}

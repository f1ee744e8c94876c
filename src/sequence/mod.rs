//! Export and shutdown sequences: display feedback interleaved with
//! external commands.
//!
//! Every step is an explicit `Result` that is logged and degraded into a
//! feedback frame on failure; nothing propagates past the sequencer. The
//! shutdown sequence has no return path by design — the process is expected
//! to terminate via the OS power-off call.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;
use tracing::{error, info, warn};

use crate::config::PanelConfig;
use crate::surface::Surface;
use crate::system::{CommandRunner, FileSystem};

const PROC_MOUNTS: &str = "/proc/mounts";

/// A sequencer step that could not complete.
#[derive(Debug)]
pub enum SequenceError {
    /// The command could not be spawned.
    Io(io::Error),
    /// The command ran but exited non-zero.
    Command(String),
}

impl std::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceError::Io(e) => write!(f, "I/O error: {}", e),
            SequenceError::Command(line) => write!(f, "command failed: {}", line),
        }
    }
}

impl std::error::Error for SequenceError {}

impl From<io::Error> for SequenceError {
    fn from(e: io::Error) -> Self {
        SequenceError::Io(e)
    }
}

/// Runs the export and shutdown sequences against the shared render
/// surface and the OS.
pub struct Sequencer<S: Surface, F: FileSystem, C: CommandRunner> {
    surface: Arc<Mutex<S>>,
    fs: F,
    cmd: C,
    cfg: PanelConfig,
}

impl<S: Surface, F: FileSystem, C: CommandRunner> Sequencer<S, F, C> {
    pub fn new(surface: Arc<Mutex<S>>, fs: F, cmd: C, cfg: PanelConfig) -> Self {
        Self {
            surface,
            fs,
            cmd,
            cfg,
        }
    }

    /// Copies the status log and history directory to a mounted external
    /// volume. Always returns; every failure is rendered, not raised.
    pub fn export(&self) {
        self.draw(&["Copying logs...".to_string()]);

        let Some(volume) = self.find_mounted_volume() else {
            warn!("no external volume mounted, export skipped");
            self.feedback("No USB drive found");
            return;
        };

        match self.copy_logs(&volume) {
            Ok(dest) => {
                info!("logs copied to {}", dest.display());
                let name = volume
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| volume.display().to_string());
                self.feedback(&format!("Copied to {}", name));
            }
            Err(e) => {
                error!("log export failed: {}", e);
                self.feedback("Copy failed");
            }
        }
    }

    /// Saves a final session summary and powers the device off.
    pub fn shutdown(&self) {
        self.feedback("Saving logs...");
        if let Err(e) = self.run_checked(&self.cfg.summarize_cmd, &[]) {
            // Best-effort: a missing summary must not block power-off.
            warn!("session summarization failed: {}", e);
        }

        self.feedback("Shutting down");
        if let Err(e) = self.run_checked("shutdown", &["-h", "now"]) {
            error!("power-off invocation failed: {}", e);
        }
    }

    /// Probes the fixed candidate roots against `/proc/mounts` and returns
    /// the first one that is currently a mount point.
    fn find_mounted_volume(&self) -> Option<PathBuf> {
        let mounts = match self.fs.read_to_string(Path::new(PROC_MOUNTS)) {
            Ok(mounts) => mounts,
            Err(e) => {
                warn!("{} unreadable: {}", PROC_MOUNTS, e);
                return None;
            }
        };
        let mount_points: Vec<&str> = mounts
            .lines()
            .filter_map(|line| line.split_whitespace().nth(1))
            .collect();
        self.cfg
            .mount_candidates
            .iter()
            .find(|candidate| {
                candidate
                    .to_str()
                    .is_some_and(|c| mount_points.contains(&c))
            })
            .cloned()
    }

    fn copy_logs(&self, volume: &Path) -> Result<PathBuf, SequenceError> {
        let dest = volume.join(format!(
            "atlantis-logs-{}",
            Local::now().format("%Y%m%d-%H%M%S")
        ));
        let dest_str = dest.display().to_string();
        let status_log = self.cfg.status_log.display().to_string();
        let history_dir = self.cfg.history_dir.display().to_string();

        self.run_checked("mkdir", &["-p", &dest_str])?;
        self.run_checked("cp", &["-a", &status_log, &dest_str])?;
        self.run_checked("cp", &["-a", &history_dir, &dest_str])?;
        self.run_checked("sync", &[])?;
        Ok(dest)
    }

    /// Runs one external command, mapping a non-zero exit to an error.
    fn run_checked(&self, program: &str, args: &[&str]) -> Result<(), SequenceError> {
        let output = self.cmd.run(program, args)?;
        if !output.success {
            return Err(SequenceError::Command(format!(
                "{} {}",
                program,
                args.join(" ")
            )));
        }
        Ok(())
    }

    /// Draws a frame and holds it on screen for the configured dwell time.
    fn feedback(&self, message: &str) {
        self.draw(&[message.to_string()]);
        std::thread::sleep(self.cfg.dwell);
    }

    fn draw(&self, lines: &[String]) {
        let mut surface = self
            .surface
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = surface.draw(lines) {
            warn!("surface draw failed: {}", e);
        }
    }
}

//! Button monitor: press-duration classification for the single panel button.
//!
//! The button is sampled on a fixed tick; classification is duration-based
//! over samples, not edge-based, so a single-sample glitch is just a very
//! short press. Threshold convention: closed lower bound (`held >= threshold`
//! fires). The copy action is armed when the copy threshold is crossed but
//! delivered on release, so a hold that continues to the shutdown threshold
//! upgrades to shutdown and never also triggers an export.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::system::FileSystem;

/// Classified outcome of a press cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Released before the copy threshold: advance the page.
    ShortPress,
    /// Held past the copy threshold and released before the shutdown
    /// threshold: export logs to USB.
    HoldCopy,
    /// Held past the shutdown threshold: power the device off. Emitted as
    /// soon as the threshold is observed, at most once per continuous
    /// press.
    HoldShutdown,
}

/// Press-duration state machine.
///
/// Feed one pin sample per tick via [`sample`](Self::sample); at most one
/// event is emitted per call.
#[derive(Debug)]
pub struct ButtonClassifier {
    copy_hold: Duration,
    shutdown_hold: Duration,
    press_start: Option<Instant>,
    copy_armed: bool,
    shutdown_fired: bool,
}

impl ButtonClassifier {
    pub fn new(copy_hold: Duration, shutdown_hold: Duration) -> Self {
        Self {
            copy_hold,
            shutdown_hold,
            press_start: None,
            copy_armed: false,
            shutdown_fired: false,
        }
    }

    /// Processes one sample of the pin state at time `now`.
    pub fn sample(&mut self, pressed: bool, now: Instant) -> Option<ButtonEvent> {
        if pressed {
            let start = match self.press_start {
                Some(start) => start,
                None => {
                    self.press_start = Some(now);
                    self.copy_armed = false;
                    self.shutdown_fired = false;
                    return None;
                }
            };

            let held = now.duration_since(start);
            if !self.shutdown_fired && held >= self.shutdown_hold {
                self.shutdown_fired = true;
                debug!("button held {:?}, shutdown threshold crossed", held);
                return Some(ButtonEvent::HoldShutdown);
            }
            if !self.copy_armed && held >= self.copy_hold {
                self.copy_armed = true;
                debug!("button held {:?}, copy threshold crossed", held);
            }
            return None;
        }

        // Released: classify the completed press, if any.
        let start = self.press_start.take()?;
        if self.shutdown_fired {
            // The hold action superseded this press cycle.
            return None;
        }
        let held = now.duration_since(start);
        if held >= self.shutdown_hold {
            // Release landed on the shutdown bound before it was sampled
            // while held; same closed-interval convention applies.
            Some(ButtonEvent::HoldShutdown)
        } else if self.copy_armed || held >= self.copy_hold {
            Some(ButtonEvent::HoldCopy)
        } else {
            Some(ButtonEvent::ShortPress)
        }
    }
}

/// Active-low GPIO line read through a sysfs-style value file.
///
/// The value file contains `0` while the button is pressed (pulled high
/// when idle). A read error counts as released.
pub struct SysfsPin<F: FileSystem> {
    fs: F,
    value_file: PathBuf,
}

impl<F: FileSystem> SysfsPin<F> {
    pub fn new(fs: F, value_file: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            value_file: value_file.into(),
        }
    }

    /// Reads the current pin state. Constant-time local read, never blocks.
    pub fn is_pressed(&self) -> bool {
        match self.fs.read_to_string(&self.value_file) {
            Ok(value) => value.trim() == "0",
            Err(e) => {
                debug!("button value file unreadable: {}", e);
                false
            }
        }
    }
}

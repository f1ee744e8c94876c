//! atlantis-panel — front-panel status/control daemon for the Atlantis
//! travel router.
//!
//! Provides:
//! - `system` — filesystem and external-command abstractions (real + mock)
//! - `provider` — point-in-time data providers and the per-tick snapshot
//! - `page` — page catalog: pure snapshot-to-text-lines rendering
//! - `button` — press-duration classifier and sysfs input pin
//! - `dispatch` — shared panel state and the action dispatcher
//! - `sequence` — log-export and shutdown sequences
//! - `surface` — render-surface sink abstraction
//! - `config` — daemon configuration (paths, thresholds, intervals)

pub mod button;
pub mod config;
pub mod dispatch;
pub mod page;
pub mod provider;
pub mod sequence;
pub mod surface;
pub mod system;

//! Render surface: the opaque sink the daemon pushes full text frames to.
//!
//! The physical display driver is an external collaborator; the daemon only
//! produces an ordered sequence of text lines per frame. Two real sinks are
//! provided: stdout (development) and a frame file consumed by the display
//! helper process.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// Full-frame text sink. No partial-frame update contract.
pub trait Surface: Send {
    /// Replaces the whole frame with the given lines.
    fn draw(&mut self, lines: &[String]) -> io::Result<()>;
}

/// Prints each frame to stdout, fenced for readability.
#[derive(Debug, Default)]
pub struct StdoutSurface;

impl StdoutSurface {
    pub fn new() -> Self {
        Self
    }
}

impl Surface for StdoutSurface {
    fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "----------------")?;
        for line in lines {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }
}

/// Writes each frame to a plain-text file read by the display driver.
///
/// The frame is written to a sibling temp file and renamed into place so
/// the driver never observes a half-written frame.
#[derive(Debug)]
pub struct FrameFileSurface {
    path: PathBuf,
    tmp_path: PathBuf,
}

impl FrameFileSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut tmp_path = path.clone();
        tmp_path.set_extension("tmp");
        Self { path, tmp_path }
    }
}

impl Surface for FrameFileSurface {
    fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        let mut frame = lines.join("\n");
        frame.push('\n');
        std::fs::write(&self.tmp_path, frame)?;
        std::fs::rename(&self.tmp_path, &self.path)
    }
}

/// Records every frame drawn, for assertions in tests.
#[derive(Debug, Default)]
pub struct MockSurface {
    frames: Mutex<Vec<Vec<String>>>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames drawn so far, oldest first.
    pub fn frames(&self) -> Vec<Vec<String>> {
        self.frames.lock().unwrap().clone()
    }

    /// The most recently drawn frame.
    pub fn last_frame(&self) -> Option<Vec<String>> {
        self.frames.lock().unwrap().last().cloned()
    }
}

impl Surface for MockSurface {
    fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        self.frames.lock().unwrap().push(lines.to_vec());
        Ok(())
    }
}

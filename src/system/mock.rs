//! In-memory doubles for testing without a real router.
//!
//! `MockFs` simulates the state files, sysfs GPIO value file and summary
//! directory in memory; `MockCommands` replays canned command output and
//! records every invocation so tests can assert which external commands ran.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::system::traits::{CommandOutput, CommandRunner, FileSystem};

/// In-memory filesystem for testing.
#[derive(Debug, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: Mutex<HashMap<PathBuf, String>>,
    /// Set of directories (for read_dir support).
    directories: Mutex<HashSet<PathBuf>>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    ///
    /// Parent directories are created automatically.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.files.lock().unwrap().insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.directories.lock().unwrap().insert(path);
    }

    /// Replaces a file's content, or removes it when `content` is `None`.
    pub fn set_file(&self, path: impl AsRef<Path>, content: Option<&str>) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.files.lock().unwrap();
        match content {
            Some(c) => {
                files.insert(path, c.to_string());
            }
            None => {
                files.remove(&path);
            }
        }
    }

    fn add_parents(&self, path: &Path) {
        let mut directories = self.directories.lock().unwrap();
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{:?} not found", path)))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
            || self.directories.lock().unwrap().contains(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.directories.lock().unwrap().contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{:?} not found", path),
            ));
        }
        let mut entries: Vec<PathBuf> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        entries.sort();
        Ok(entries)
    }
}

/// Command runner replaying canned responses.
///
/// Responses are keyed by the full command line (program and arguments
/// joined with spaces). Unconfigured commands fail to spawn, which matches
/// a missing binary on the device.
#[derive(Debug, Default)]
pub struct MockCommands {
    responses: Mutex<HashMap<String, CommandOutput>>,
    prefix_responses: Mutex<Vec<(String, CommandOutput)>>,
    calls: Mutex<Vec<String>>,
}

impl MockCommands {
    /// Creates a new mock runner with no configured commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures a successful invocation with the given stdout.
    pub fn on_success(&self, line: &str, stdout: &str) {
        self.responses.lock().unwrap().insert(
            line.to_string(),
            CommandOutput {
                success: true,
                stdout: stdout.to_string(),
            },
        );
    }

    /// Configures an invocation that runs but exits non-zero.
    pub fn on_failure(&self, line: &str) {
        self.responses.lock().unwrap().insert(
            line.to_string(),
            CommandOutput {
                success: false,
                stdout: String::new(),
            },
        );
    }

    /// Configures a successful invocation for any command line starting
    /// with `prefix`. Useful when an argument embeds a timestamp.
    pub fn on_success_prefix(&self, prefix: &str) {
        self.prefix_responses.lock().unwrap().push((
            prefix.to_string(),
            CommandOutput {
                success: true,
                stdout: String::new(),
            },
        ));
    }

    /// Returns every command line invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for MockCommands {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().unwrap().push(line.clone());
        if let Some(output) = self.responses.lock().unwrap().get(&line) {
            return Ok(output.clone());
        }
        if let Some((_, output)) = self
            .prefix_responses
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix))
        {
            return Ok(output.clone());
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} not found", line),
        ))
    }
}

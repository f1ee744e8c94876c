//! OS access layer.
//!
//! All filesystem reads and external-command invocations go through the
//! [`FileSystem`] and [`CommandRunner`] traits so every component can be
//! exercised in tests without a router.

pub mod mock;
mod traits;

pub use mock::{MockCommands, MockFs};
pub use traits::{CommandOutput, CommandRunner, FileSystem, RealCommands, RealFs};

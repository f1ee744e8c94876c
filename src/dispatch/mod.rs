//! Shared panel state and the action dispatcher.
//!
//! The dispatcher is the only writer of the shared state: short presses
//! advance the page index, hold events run the export or shutdown sequence.
//! It is invoked synchronously from the button-sampling thread; the render
//! loop only ever reads the page index.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::button::ButtonEvent;
use crate::page::PAGE_COUNT;
use crate::sequence::Sequencer;
use crate::surface::Surface;
use crate::system::{CommandRunner, FileSystem};

/// Whether an export or shutdown sequence currently owns the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    ExportInProgress,
    /// Terminal: the process is expected to die via the OS power-off.
    ShutdownInProgress,
}

/// State shared between the button thread and the render loop.
#[derive(Debug)]
pub struct PanelState {
    /// Currently selected page, in `[0, PAGE_COUNT)`.
    pub page: usize,
    pub action: ActionState,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            page: 0,
            action: ActionState::Idle,
        }
    }
}

/// Creates the shared state handle.
pub fn shared_state() -> Arc<Mutex<PanelState>> {
    Arc::new(Mutex::new(PanelState::default()))
}

/// Reacts to classified button events and owns all state mutation.
pub struct Dispatcher<S: Surface, F: FileSystem, C: CommandRunner> {
    state: Arc<Mutex<PanelState>>,
    sequencer: Sequencer<S, F, C>,
}

impl<S: Surface, F: FileSystem, C: CommandRunner> Dispatcher<S, F, C> {
    pub fn new(state: Arc<Mutex<PanelState>>, sequencer: Sequencer<S, F, C>) -> Self {
        Self { state, sequencer }
    }

    /// Handles one classified event. Sequences run to completion on the
    /// caller's thread; events arriving while one is in flight are ignored.
    pub fn handle(&self, event: ButtonEvent) {
        match event {
            ButtonEvent::ShortPress => {
                let mut state = self.lock_state();
                if state.action != ActionState::Idle {
                    debug!("short press ignored, action in flight");
                    return;
                }
                state.page = (state.page + 1) % PAGE_COUNT;
                info!("page advanced to {}", state.page);
            }
            ButtonEvent::HoldCopy => {
                {
                    let mut state = self.lock_state();
                    if state.action != ActionState::Idle {
                        debug!("copy hold ignored, action in flight");
                        return;
                    }
                    state.action = ActionState::ExportInProgress;
                }
                info!("copy hold: exporting logs");
                self.sequencer.export();
                self.lock_state().action = ActionState::Idle;
            }
            ButtonEvent::HoldShutdown => {
                {
                    let mut state = self.lock_state();
                    if state.action != ActionState::Idle {
                        debug!("shutdown hold ignored, action in flight");
                        return;
                    }
                    state.action = ActionState::ShutdownInProgress;
                }
                info!("shutdown hold: powering off");
                self.sequencer.shutdown();
                // No return to Idle: the OS power-off is expected to
                // terminate the process.
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

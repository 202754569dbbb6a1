//! GTK-free lifecycle state machine and window sizing.
//!
//! The UI layer drives these transitions; keeping them free of GTK lets the
//! ordering rules be tested without a display.

use thiserror::Error;

use crate::config;

/// Why the event loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The main window was destroyed
    WindowDestroyed,
    /// SIGINT or SIGTERM arrived while running
    Interrupted,
    /// `stop()` was called
    Requested,
}

/// UI lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    /// Nothing loaded yet
    Uninitialized,
    /// Layout loaded, widgets resolved and callbacks attached
    Built,
    /// Window shown, event loop running
    Running,
    /// Event loop finished
    Stopped(StopReason),
}

/// Events that trigger lifecycle transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Built,
    Started,
    WindowDestroyed,
    Interrupted,
    StopRequested,
}

/// Commands emitted for the runner to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    /// Size and show the main window, then run the loop
    ShowWindow,
    /// Ask the event loop to return
    QuitLoop,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid UI state transition: {event:?} while {state:?}")]
pub struct TransitionError {
    pub state: UiState,
    pub event: UiEvent,
}

/// Lifecycle state machine
#[derive(Debug)]
pub struct Lifecycle {
    pub state: UiState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: UiState::Uninitialized,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == UiState::Running
    }

    /// Reason the loop stopped, if it has
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.state {
            UiState::Stopped(reason) => Some(reason),
            _ => None,
        }
    }

    /// Process an event and return commands to execute
    pub fn process(&mut self, event: UiEvent) -> Result<Vec<UiCommand>, TransitionError> {
        let mut commands = Vec::new();

        let next = match (self.state, event) {
            (UiState::Uninitialized, UiEvent::Built) => UiState::Built,

            (UiState::Built, UiEvent::Started) => {
                commands.push(UiCommand::ShowWindow);
                UiState::Running
            }

            (UiState::Built | UiState::Running, UiEvent::WindowDestroyed) => {
                commands.push(UiCommand::QuitLoop);
                UiState::Stopped(StopReason::WindowDestroyed)
            }

            (UiState::Running, UiEvent::Interrupted) => {
                commands.push(UiCommand::QuitLoop);
                UiState::Stopped(StopReason::Interrupted)
            }

            (UiState::Built | UiState::Running, UiEvent::StopRequested) => {
                commands.push(UiCommand::QuitLoop);
                UiState::Stopped(StopReason::Requested)
            }

            // Late destroy/stop/interrupt after the loop already stopped
            (
                UiState::Stopped(_),
                UiEvent::WindowDestroyed | UiEvent::Interrupted | UiEvent::StopRequested,
            ) => self.state,

            (state, event) => return Err(TransitionError { state, event }),
        };

        self.state = next;
        Ok(commands)
    }
}

/// How the main window is sized before being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowGeometry {
    /// Size request covering the whole display
    Fullscreen { width: i32, height: i32 },
    /// Default development size
    Windowed { width: i32, height: i32 },
}

impl WindowGeometry {
    /// Pick the geometry for `kiosk` given the display size, if known.
    ///
    /// Without a usable display size kiosk mode falls back to the windowed
    /// default.
    pub fn choose(kiosk: bool, display: Option<(i32, i32)>) -> Self {
        match display {
            Some((width, height)) if kiosk && width > 0 && height > 0 => {
                WindowGeometry::Fullscreen { width, height }
            }
            _ => WindowGeometry::Windowed {
                width: config::DEFAULT_WIDTH,
                height: config::DEFAULT_HEIGHT,
            },
        }
    }

    pub fn size(&self) -> (i32, i32) {
        match *self {
            WindowGeometry::Fullscreen { width, height }
            | WindowGeometry::Windowed { width, height } => (width, height),
        }
    }
}

//! Blocking GLib main loop with interrupt handling.

use std::cell::RefCell;
use std::rc::Rc;

use glib::{ControlFlow, MainLoop};
use nix::sys::signal::Signal;

use crate::state::{Lifecycle, StopReason, TransitionError, UiCommand, UiEvent};

/// Owns the main loop and the lifecycle it reports into.
///
/// Cheap to clone; clones share the same loop and lifecycle so signal
/// handlers and UI callbacks can stop it.
#[derive(Clone)]
pub struct Runner {
    main_loop: MainLoop,
    lifecycle: Rc<RefCell<Lifecycle>>,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self {
            main_loop: MainLoop::new(None, false),
            lifecycle: Rc::new(RefCell::new(Lifecycle::new())),
        }
    }

    /// Process an event through the lifecycle and execute its commands.
    ///
    /// `on_show` runs for [`UiCommand::ShowWindow`].
    pub fn dispatch(
        &self,
        event: UiEvent,
        on_show: impl FnOnce(),
    ) -> Result<(), TransitionError> {
        let commands = self.lifecycle.borrow_mut().process(event)?;

        let mut on_show = Some(on_show);
        for cmd in commands {
            match cmd {
                UiCommand::ShowWindow => {
                    if let Some(show) = on_show.take() {
                        show();
                    }
                }
                UiCommand::QuitLoop => self.main_loop.quit(),
            }
        }

        Ok(())
    }

    /// Quit on SIGINT and SIGTERM instead of dying mid-dispatch
    pub fn install_signal_handlers(&self) {
        for signal in [Signal::SIGINT, Signal::SIGTERM] {
            let runner = self.clone();
            glib::unix_signal_add_local(signal as i32, move || {
                log::info!("{} received, quitting ...", signal);
                runner.stop_with(UiEvent::Interrupted);
                ControlFlow::Continue
            });
        }
    }

    /// Enter the loop; returns once something stops it
    pub fn run(&self, on_show: impl FnOnce()) -> Result<StopReason, TransitionError> {
        self.dispatch(UiEvent::Started, on_show)?;

        // A stop that raced ahead of the loop (e.g. destroy during show)
        if self.is_running() {
            self.main_loop.run();
        }

        Ok(self.stop_reason().unwrap_or(StopReason::Requested))
    }

    /// Ask the loop to return
    pub fn stop(&self) {
        self.stop_with(UiEvent::StopRequested);
    }

    /// Record that the main window went away and quit
    pub fn window_destroyed(&self) {
        self.stop_with(UiEvent::WindowDestroyed);
    }

    fn stop_with(&self, event: UiEvent) {
        if let Err(e) = self.dispatch(event, || {}) {
            log::debug!("Ignoring stop: {}", e);
        }
    }

    pub fn mark_built(&self) -> Result<(), TransitionError> {
        self.dispatch(UiEvent::Built, || {})
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.lifecycle.borrow().stop_reason()
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.borrow().is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::Mutex;
    use std::time::Duration;

    // The loop runs on the global default main context; serialize tests that
    // spin it.
    static LOOP_LOCK: Mutex<()> = Mutex::new(());

    fn built_runner() -> Runner {
        let runner = Runner::new();
        runner.mark_built().unwrap();
        runner
    }

    #[test]
    fn test_run_requires_build() {
        let runner = Runner::new();
        assert!(runner.run(|| panic!("window shown before build")).is_err());
        assert!(!runner.is_running());
    }

    #[test]
    fn test_stop_request_ends_loop() {
        let _guard = LOOP_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let runner = built_runner();
        let shown = Rc::new(Cell::new(false));

        let stopper = runner.clone();
        let flag = shown.clone();
        let reason = runner
            .run(move || {
                flag.set(true);
                glib::timeout_add_local_once(Duration::from_millis(10), move || stopper.stop());
            })
            .unwrap();

        assert!(shown.get());
        assert_eq!(reason, StopReason::Requested);
    }

    #[test]
    fn test_window_destroyed_ends_loop() {
        let _guard = LOOP_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let runner = built_runner();

        let stopper = runner.clone();
        let reason = runner
            .run(move || {
                glib::timeout_add_local_once(Duration::from_millis(10), move || {
                    stopper.window_destroyed()
                });
            })
            .unwrap();

        assert_eq!(reason, StopReason::WindowDestroyed);
        // Late stop does not overwrite the reason
        runner.stop();
        assert_eq!(runner.stop_reason(), Some(StopReason::WindowDestroyed));
    }

    #[test]
    fn test_interrupt_ends_loop_orderly() {
        let _guard = LOOP_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let runner = built_runner();
        runner.install_signal_handlers();

        let reason = runner
            .run(|| {
                glib::timeout_add_local_once(Duration::from_millis(10), || {
                    nix::sys::signal::raise(Signal::SIGINT).unwrap();
                });
            })
            .unwrap();

        assert_eq!(reason, StopReason::Interrupted);
        assert!(!runner.is_running());
    }

    #[test]
    fn test_stop_before_run_skips_loop() {
        let runner = built_runner();
        runner.stop();
        assert!(runner.run(|| {}).is_err());
        assert_eq!(runner.stop_reason(), Some(StopReason::Requested));
    }
}

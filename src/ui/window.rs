//! Main window: builds the UI from the layout file and runs it.

use std::cell::OnceCell;
use std::path::Path;
use std::rc::Rc;

use gio::prelude::ListModelExt;
use gtk4 as gtk;
use gtk4::gdk;
use gtk4::prelude::*;
use libadwaita as adw;
use thiserror::Error;

use crate::config::{self, Resources};
use crate::fonts;
use crate::runner::Runner;
use crate::state::{StopReason, TransitionError, WindowGeometry};
use crate::ui::callbacks::CALLBACKS;

#[derive(Error, Debug)]
pub enum UiError {
    #[error("Widget \"{0}\" not found")]
    MissingWidget(String),
    #[error("Widget \"{id}\" is a {found}, expected {expected}")]
    WrongType {
        id: String,
        expected: String,
        found: String,
    },
    #[error("Failed to initialize GTK: {0}")]
    Init(#[from] glib::BoolError),
    #[error("Failed to load UI definition: {0}")]
    Builder(#[from] glib::Error),
    #[error("No display available")]
    NoDisplay,
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Turn a builder lookup into a fatal error when the widget is absent
pub fn require<T>(found: Option<T>, id: &str) -> Result<T, UiError> {
    found.ok_or_else(|| UiError::MissingWidget(id.to_string()))
}

/// Resolve a layout object, telling a missing id apart from a wrong class
pub fn downcast_widget<T>(found: Option<glib::Object>, id: &str) -> Result<T, UiError>
where
    T: IsA<glib::Object>,
{
    let object = require(found, id)?;
    let found = object.type_().name().to_string();
    object.downcast::<T>().map_err(|_| UiError::WrongType {
        id: id.to_string(),
        expected: T::static_type().name().to_string(),
        found,
    })
}

/// The application UI: main window, secondary dialog and the loop running them
pub struct AppUi {
    pub window: adw::Window,
    // Keeps every object from the layout alive, the dialog included
    _builder: gtk::Builder,
    _style: gtk::CssProvider,
    runner: Runner,
    kiosk: bool,
}

impl AppUi {
    /// Load fonts, build the widget tree and apply the stylesheet.
    ///
    /// Fonts are registered before GTK is initialized so the stylesheet can
    /// use them.
    pub fn new(kiosk: bool, resources: &Resources) -> Result<Self, UiError> {
        fonts::load_fonts(&resources.fonts_dir());

        adw::init()?;
        let runner = Runner::new();

        // Callbacks resolve the dialog lazily; it only exists once the
        // layout has been parsed.
        let dialog_cell: Rc<OnceCell<gtk::Window>> = Rc::new(OnceCell::new());
        let builder = gtk::Builder::new();
        builder.set_scope(Some(&callback_scope(&dialog_cell)));

        log::debug!("Loading layout {}", resources.layout().display());
        builder.add_from_file(resources.layout())?;

        let style = load_css(&resources.stylesheet())?;

        let window: adw::Window =
            downcast_widget(builder.object(config::MAIN_WINDOW_ID), config::MAIN_WINDOW_ID)?;
        let dialog: gtk::Window =
            downcast_widget(builder.object(config::DIALOG_ID), config::DIALOG_ID)?;
        let _ = dialog_cell.set(dialog);

        let on_destroy = runner.clone();
        window.connect_destroy(move |_| {
            log::debug!("Main window destroyed");
            on_destroy.window_destroyed();
        });

        runner.mark_built()?;

        Ok(Self {
            window,
            _builder: builder,
            _style: style,
            runner,
            kiosk,
        })
    }

    /// Size and show the window, then block until the loop stops
    pub fn start(&self) -> Result<StopReason, UiError> {
        self.runner.install_signal_handlers();

        let reason = self.runner.run(|| {
            let geometry = WindowGeometry::choose(self.kiosk, display_size());
            self.apply_geometry(geometry);
            self.window.present();
        })?;

        log::info!("Event loop stopped: {:?}", reason);
        Ok(reason)
    }

    /// Ask the event loop to return.
    ///
    /// For code embedding the UI; the binary itself stops through window
    /// destruction or signals.
    #[allow(dead_code)]
    pub fn stop(&self) {
        self.runner.stop();
    }

    fn apply_geometry(&self, geometry: WindowGeometry) {
        let (width, height) = geometry.size();
        log::info!("Window geometry: {:?}", geometry);
        match geometry {
            WindowGeometry::Fullscreen { .. } => {
                self.window.set_size_request(width, height);
                self.window.set_decorated(false);
                self.window.set_cursor_from_name(Some("none"));
            }
            WindowGeometry::Windowed { .. } => {
                self.window.set_default_size(width, height);
            }
        }
    }
}

/// Builder scope mapping each handler name from the layout to its action
fn callback_scope(dialog: &Rc<OnceCell<gtk::Window>>) -> gtk::BuilderRustScope {
    let scope = gtk::BuilderRustScope::new();

    for &(name, action) in CALLBACKS {
        let dialog = dialog.clone();
        scope.add_callback(name, move |_| {
            match dialog.get() {
                Some(dialog) => action.apply(dialog),
                None => log::warn!("{:?} fired before the dialog was resolved", action),
            }
            None
        });
    }

    scope
}

/// Install the stylesheet for the whole display
fn load_css(path: &Path) -> Result<gtk::CssProvider, UiError> {
    let display = gdk::Display::default().ok_or(UiError::NoDisplay)?;

    let provider = gtk::CssProvider::new();
    provider.connect_parsing_error(|_, section, error| {
        log::warn!("Stylesheet error at {}: {}", section, error);
    });
    log::debug!("Loading stylesheet {}", path.display());
    provider.load_from_path(path);

    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );

    Ok(provider)
}

/// Size of the first monitor of the default display
fn display_size() -> Option<(i32, i32)> {
    let display = gdk::Display::default()?;
    let monitor = display.monitors().item(0).and_downcast::<gdk::Monitor>()?;
    let geometry = monitor.geometry();
    Some((geometry.width(), geometry.height()))
}

// Building a real layout needs a display, so these tests stop at the lookup
// seams: `require` and `downcast_widget` take what `Builder::object` returns.
// Plain gio objects stand in for widgets.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_present_widget() {
        assert_eq!(require(Some(7), "window").unwrap(), 7);
    }

    #[test]
    fn test_require_missing_widget_is_fatal() {
        let err = require::<u32>(None, "my_dialog").unwrap_err();
        assert!(matches!(err, UiError::MissingWidget(ref id) if id == "my_dialog"));
        assert_eq!(err.to_string(), "Widget \"my_dialog\" not found");
    }

    #[test]
    fn test_downcast_widget_matching_class() {
        let object = gio::Cancellable::new().upcast::<glib::Object>();
        assert!(downcast_widget::<gio::Cancellable>(Some(object), "window").is_ok());
    }

    #[test]
    fn test_downcast_widget_absent_id() {
        let err = downcast_widget::<gio::Cancellable>(None, "my_dialog").unwrap_err();
        assert!(matches!(err, UiError::MissingWidget(ref id) if id == "my_dialog"));
    }

    #[test]
    fn test_downcast_widget_wrong_class_is_distinct() {
        let object = gio::Cancellable::new().upcast::<glib::Object>();
        let err = downcast_widget::<gio::SimpleAction>(Some(object), "window").unwrap_err();
        match err {
            UiError::WrongType { ref id, ref expected, ref found } => {
                assert_eq!(id, "window");
                assert_eq!(expected, "GSimpleAction");
                assert_eq!(found, "GCancellable");
            }
            other => panic!("expected type mismatch, got {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "Widget \"window\" is a GCancellable, expected GSimpleAction"
        );
    }

    #[test]
    fn test_layout_declares_required_widgets() {
        let layout = include_str!("../../data/ui.ui");
        for id in [config::MAIN_WINDOW_ID, config::DIALOG_ID] {
            assert!(layout.contains(&format!("id=\"{}\"", id)), "missing {}", id);
        }
    }
}

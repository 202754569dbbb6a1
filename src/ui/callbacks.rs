//! Handlers for the callbacks declared in the layout file.
//!
//! The layout names its signal handlers; each name maps to a [`UiAction`]
//! here. The table is installed into the builder scope once, before the
//! layout is parsed, so an unknown handler name fails the build.

use gtk4 as gtk;
use gtk4::prelude::*;

/// Actions the layout can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    ShowDialog,
    CloseDialog,
}

/// Handler name to action table
pub const CALLBACKS: &[(&str, UiAction)] = &[
    ("show_dialog_cb", UiAction::ShowDialog),
    ("close_dialog_cb", UiAction::CloseDialog),
];

/// A secondary dialog whose visibility the callbacks toggle
pub trait DialogControl {
    fn show(&self);
    fn hide(&self);
}

impl DialogControl for gtk::Window {
    fn show(&self) {
        self.present();
    }

    fn hide(&self) {
        self.set_visible(false);
    }
}

impl UiAction {
    pub fn apply(self, dialog: &impl DialogControl) {
        log::debug!("Callback action {:?}", self);
        match self {
            UiAction::ShowDialog => dialog.show(),
            UiAction::CloseDialog => dialog.hide(),
        }
    }
}

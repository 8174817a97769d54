//! Events the panel client emits toward whatever renders it.
//!
//! Each variant corresponds to one thing the surrounding UI does: re-render,
//! hand the user a download, or show a toast.

use super::state::PanelView;

/// Notifications from the panel client to its UI.
#[derive(Debug)]
pub enum PanelEvent {
    /// A fresh snapshot of the view state; replaces whatever was rendered.
    StateUpdate(Box<PanelView>),
    /// A completed file download, ready to hand to the user.
    Download {
        path: String,
        mime: String,
        bytes: Vec<u8>,
    },
    /// A human-readable success message.
    Notice(String),
    /// A human-readable failure message. View state is left untouched.
    Error(String),
}

/// Abstracts the delivery of panel events so tests (and headless hosts) can
/// capture them over a channel. Fire-and-forget.
pub trait EventProxy: Send + Sync + Clone + 'static {
    fn send_event(&self, event: PanelEvent);
}

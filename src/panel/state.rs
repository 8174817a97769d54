//! The view state owned by the panel client, and its render snapshot.

use serde::Serialize;

use crate::core::{path, FileEntry, RootDirectories};

/// Mutable session state of one panel client.
///
/// `browse_path` changes only through user navigation and the initial
/// `root-directories` reply; the responder never writes it.
#[derive(Debug, Default)]
pub struct PanelState {
    /// The absolute path currently displayed.
    pub browse_path: String,
    /// The root the session browses under, fixed once roots are resolved.
    pub active_root: Option<String>,
    /// The three well-known roots; populated once per session, then frozen.
    pub roots: Option<RootDirectories>,
    /// The current directory listing, replaced wholesale on every
    /// `directory-listing` reply.
    pub entries: Vec<FileEntry>,
    /// `true` once the responder has acknowledged a ping.
    pub connected: bool,
}

impl PanelState {
    /// The entries whose metadata retrieval succeeded.
    pub fn valid_entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter(|entry| entry.is_valid())
    }
}

/// An immutable snapshot of the panel state for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct PanelView {
    pub browse_path: String,
    /// Breadcrumb segments relative to the session root. Derived data,
    /// recomputed for every snapshot.
    pub breadcrumbs: Vec<String>,
    pub entries: Vec<FileEntry>,
    pub connected: bool,
}

/// Builds the render snapshot from the current state.
pub fn panel_view(state: &PanelState) -> PanelView {
    let breadcrumbs = match &state.active_root {
        Some(root) => match path::relative_segments(&state.browse_path, root) {
            Ok(segments) => segments,
            Err(e) => {
                // Not-under-root is rendered as one opaque segment rather
                // than dropping anything.
                tracing::warn!("Browse path escaped the session root: {}", e);
                vec![state.browse_path.clone()]
            }
        },
        None => Vec::new(),
    };

    PanelView {
        browse_path: state.browse_path.clone(),
        breadcrumbs,
        entries: state.entries.clone(),
        connected: state.connected,
    }
}

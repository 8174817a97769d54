//! The control-panel endpoint.
//!
//! The client owns the browse state, issues commands, and reconciles the
//! responder's asynchronous replies. The protocol carries no request IDs, so
//! replies are matched purely by name: a later-arriving listing always wins
//! the view-state write, and a stale one is repaired by the next refresh.

pub mod events;
pub mod state;

use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::ExplorerConfig;
use crate::core::{path, transcode, RootDirectories, RootKind};
use crate::protocol::registry::HandlerRegistry;
use crate::protocol::transport::{handler, send_typed, Transport};
use crate::protocol::{
    command, reply, DirectoryListing, ErrorReply, FileContentReply, NewFolderPayload, PathPayload,
    PingPayload, SuccessReply, UploadFilePayload,
};
use events::{EventProxy, PanelEvent};
use state::{panel_view, PanelState, PanelView};

fn lock_state(state: &Arc<Mutex<PanelState>>) -> MutexGuard<'_, PanelState> {
    state.lock().expect("panel state lock poisoned")
}

/// Locks the state, applies `update`, and pushes a fresh snapshot to the UI.
fn with_state_and_notify<P: EventProxy>(
    state: &Arc<Mutex<PanelState>>,
    proxy: &P,
    update: impl FnOnce(&mut PanelState),
) {
    let mut guard = lock_state(state);
    update(&mut guard);
    proxy.send_event(PanelEvent::StateUpdate(Box::new(panel_view(&guard))));
}

/// The panel endpoint. Attach once per session; detach (or drop) to release
/// every reply subscription.
pub struct PanelClient<P: EventProxy> {
    transport: Arc<dyn Transport>,
    state: Arc<Mutex<PanelState>>,
    registry: HandlerRegistry,
    proxy: P,
}

impl<P: EventProxy> PanelClient<P> {
    /// Registers the reply handlers, probes the responder with `ping`, and
    /// requests the root directories that seed the initial browse path.
    pub fn attach(transport: Arc<dyn Transport>, config: ExplorerConfig, proxy: P) -> Self {
        let state = Arc::new(Mutex::new(PanelState::default()));
        let mut registry = HandlerRegistry::new(transport.clone());

        {
            let state = state.clone();
            let proxy = proxy.clone();
            registry.register(
                reply::PING_ACK,
                handler(move |payload| {
                    let state = state.clone();
                    let proxy = proxy.clone();
                    async move { handle_ping_ack(payload, &state, &proxy) }
                }),
            );
        }
        {
            let state = state.clone();
            let proxy = proxy.clone();
            let transport = transport.clone();
            let default_root = config.default_root;
            registry.register(
                reply::ROOT_DIRECTORIES,
                handler(move |payload| {
                    let state = state.clone();
                    let proxy = proxy.clone();
                    let transport = transport.clone();
                    async move {
                        handle_root_directories(payload, default_root, &state, &proxy, &transport)
                    }
                }),
            );
        }
        {
            let state = state.clone();
            let proxy = proxy.clone();
            registry.register(
                reply::DIRECTORY_LISTING,
                handler(move |payload| {
                    let state = state.clone();
                    let proxy = proxy.clone();
                    async move { handle_directory_listing(payload, &state, &proxy) }
                }),
            );
        }
        {
            let proxy = proxy.clone();
            registry.register(
                reply::FILE_CONTENT,
                handler(move |payload| {
                    let proxy = proxy.clone();
                    async move { handle_file_content(payload, &proxy) }
                }),
            );
        }
        {
            let state = state.clone();
            let proxy = proxy.clone();
            let transport = transport.clone();
            registry.register(
                reply::SUCCESS,
                handler(move |payload| {
                    let state = state.clone();
                    let proxy = proxy.clone();
                    let transport = transport.clone();
                    async move { handle_success(payload, &state, &proxy, &transport) }
                }),
            );
        }
        {
            let proxy = proxy.clone();
            registry.register(
                reply::ERROR,
                handler(move |payload| {
                    let proxy = proxy.clone();
                    async move { handle_error(payload, &proxy) }
                }),
            );
        }

        debug_assert_eq!(registry.len(), reply::ALL.len());
        send_typed(
            transport.as_ref(),
            command::PING,
            &PingPayload {
                from: config.sender_tag.clone(),
            },
        );
        transport.send_message(command::GET_ROOT_DIRECTORIES, serde_json::json!({}));
        tracing::info!("Panel client attached, awaiting root directories");

        Self {
            transport,
            state,
            registry,
            proxy,
        }
    }

    /// The current render snapshot.
    pub fn view(&self) -> PanelView {
        panel_view(&lock_state(&self.state))
    }

    /// `true` once the responder has acknowledged the ping.
    pub fn connected(&self) -> bool {
        lock_state(&self.state).connected
    }

    /// Re-lists the current directory.
    pub fn refresh(&self) {
        let current = lock_state(&self.state).browse_path.clone();
        if current.is_empty() {
            tracing::warn!("Nothing to refresh, no directory open yet");
            return;
        }
        self.send_command(command::LIST_DIRECTORY, &PathPayload { path: current });
    }

    /// Navigates to `path` and requests its listing.
    pub fn open_directory(&self, path: impl Into<String>) {
        let path = path.into();
        if path.is_empty() {
            tracing::warn!("Ignoring navigation to an empty path");
            return;
        }
        with_state_and_notify(&self.state, &self.proxy, |s| s.browse_path = path.clone());
        self.send_command(command::LIST_DIRECTORY, &PathPayload { path });
    }

    /// Navigates to the breadcrumb prefix ending at segment `index`
    /// (index 0 is the first segment below the root).
    pub fn open_breadcrumb(&self, index: usize) {
        let target = {
            let guard = lock_state(&self.state);
            let root = match guard.active_root.clone() {
                Some(root) => root,
                None => {
                    tracing::warn!("Cannot navigate breadcrumbs before roots are resolved");
                    return;
                }
            };
            match path::relative_segments(&guard.browse_path, &root) {
                Ok(segments) => path::path_for_prefix(&root, &segments, index + 1),
                Err(e) => {
                    tracing::warn!("Cannot navigate breadcrumbs: {}", e);
                    return;
                }
            }
        };
        self.open_directory(target);
    }

    /// Navigates back to the session root.
    pub fn open_root(&self) {
        match lock_state(&self.state).active_root.clone() {
            Some(root) => self.open_directory(root),
            None => tracing::warn!("Roots are not resolved yet"),
        }
    }

    /// Requests a file's content; the reply arrives as
    /// [`PanelEvent::Download`].
    pub fn download_file(&self, path: impl Into<String>) {
        self.send_command(
            command::GET_FILE_CONTENT,
            &PathPayload { path: path.into() },
        );
    }

    /// Deletes a file or directory; a success reply triggers a refresh.
    pub fn delete_path(&self, path: impl Into<String>) {
        self.send_command(command::DELETE, &PathPayload { path: path.into() });
    }

    /// Uploads `bytes` as `name` into the current directory. The base64
    /// conversion completes before the command is sent; the payload has no
    /// streaming form.
    pub fn upload_file(&self, name: impl Into<String>, bytes: &[u8]) {
        let path = lock_state(&self.state).browse_path.clone();
        if path.is_empty() {
            tracing::warn!("Cannot upload before a directory is open");
            return;
        }
        self.send_command(
            command::UPLOAD_FILE,
            &UploadFilePayload {
                path,
                name: name.into(),
                content: transcode::encode(bytes),
            },
        );
    }

    /// Creates a folder named `name` inside the current directory.
    pub fn create_folder(&self, name: impl Into<String>) {
        let path = lock_state(&self.state).browse_path.clone();
        if path.is_empty() {
            tracing::warn!("Cannot create a folder before a directory is open");
            return;
        }
        self.send_command(
            command::NEW_FOLDER,
            &NewFolderPayload {
                path,
                name: name.into(),
            },
        );
    }

    /// Releases every reply subscription. Dropping the client has the same
    /// effect.
    pub fn detach(mut self) {
        self.registry.release_all();
        tracing::info!("Panel client detached");
    }

    fn send_command<T: Serialize>(&self, name: &str, payload: &T) {
        send_typed(self.transport.as_ref(), name, payload);
    }
}

fn handle_ping_ack<P: EventProxy>(payload: Value, state: &Arc<Mutex<PanelState>>, proxy: &P) {
    match serde_json::from_value::<PingPayload>(payload) {
        Ok(ack) => tracing::info!("Responder is live (tag '{}')", ack.from),
        Err(_) => tracing::debug!("Ping acknowledged without a sender tag"),
    }
    with_state_and_notify(state, proxy, |s| s.connected = true);
}

/// Populates the root map once and seeds the browse path from the configured
/// default root, then requests the first listing.
fn handle_root_directories<P: EventProxy>(
    payload: Value,
    default_root: RootKind,
    state: &Arc<Mutex<PanelState>>,
    proxy: &P,
    transport: &Arc<dyn Transport>,
) {
    let roots = match serde_json::from_value::<RootDirectories>(payload) {
        Ok(roots) => roots,
        Err(_) => {
            tracing::warn!("Ignoring malformed root-directories reply");
            return;
        }
    };

    let initial = {
        let mut guard = lock_state(state);
        if guard.roots.is_some() {
            tracing::warn!("Ignoring repeated root-directories reply; roots are fixed per session");
            return;
        }
        let initial = roots.get(default_root).to_string();
        guard.active_root = Some(initial.clone());
        guard.browse_path = initial.clone();
        guard.roots = Some(roots);
        proxy.send_event(PanelEvent::StateUpdate(Box::new(panel_view(&guard))));
        initial
    };

    send_typed(
        transport.as_ref(),
        command::LIST_DIRECTORY,
        &PathPayload { path: initial },
    );
}

/// A listing reply replaces the previous entries wholesale; there is no
/// incremental merge.
fn handle_directory_listing<P: EventProxy>(
    payload: Value,
    state: &Arc<Mutex<PanelState>>,
    proxy: &P,
) {
    let listing = match serde_json::from_value::<DirectoryListing>(payload) {
        Ok(listing) => listing,
        Err(_) => {
            tracing::warn!("Ignoring malformed directory-listing reply");
            return;
        }
    };
    with_state_and_notify(state, proxy, |s| s.entries = listing.files);
}

/// Rebuilds the downloadable bytes from a content reply. A decode failure
/// surfaces as an error event, never as silently corrupted data.
fn handle_file_content<P: EventProxy>(payload: Value, proxy: &P) {
    let content = match serde_json::from_value::<FileContentReply>(payload) {
        Ok(content) => content,
        Err(_) => {
            tracing::warn!("Ignoring malformed file-content reply");
            return;
        }
    };

    match transcode::decode(&content.content) {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&content.path)
                .first_or_octet_stream()
                .to_string();
            proxy.send_event(PanelEvent::Download {
                path: content.path,
                mime,
                bytes,
            });
        }
        Err(e) => proxy.send_event(PanelEvent::Error(e.to_string())),
    }
}

/// Surfaces the message and, when the refresh flag is set, re-lists the
/// directory that is current *now*; mutating replies carry no listing of
/// their own.
fn handle_success<P: EventProxy>(
    payload: Value,
    state: &Arc<Mutex<PanelState>>,
    proxy: &P,
    transport: &Arc<dyn Transport>,
) {
    let success = match serde_json::from_value::<SuccessReply>(payload) {
        Ok(success) => success,
        Err(_) => {
            tracing::warn!("Ignoring malformed success reply");
            return;
        }
    };

    proxy.send_event(PanelEvent::Notice(
        success.message.unwrap_or_else(|| "Success".to_string()),
    ));

    if success.refresh {
        let current = lock_state(state).browse_path.clone();
        if current.is_empty() {
            tracing::warn!("Refresh requested before any directory was opened");
            return;
        }
        send_typed(
            transport.as_ref(),
            command::LIST_DIRECTORY,
            &PathPayload { path: current },
        );
    }
}

/// Error replies surface to the user and touch nothing else.
fn handle_error<P: EventProxy>(payload: Value, proxy: &P) {
    let message = serde_json::from_value::<ErrorReply>(payload)
        .map(|e| e.message)
        .unwrap_or_else(|_| "Unknown error".to_string());
    proxy.send_event(PanelEvent::Error(message));
}

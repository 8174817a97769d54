//! The endpoint embedded in the target application.
//!
//! The responder owns no state beyond its live subscriptions: every inbound
//! command runs one storage operation and emits exactly one typed reply
//! (listings may additionally emit one combined stat-error reply). A failure
//! inside a handler becomes an `error` reply; it never takes the process
//! down.

pub mod handlers;

use serde::Serialize;
use std::sync::Arc;

use crate::core::FileSystem;
use crate::protocol::registry::HandlerRegistry;
use crate::protocol::transport::{handler, send_typed, Transport};
use crate::protocol::{command, reply, ErrorReply, SuccessReply};

/// Tag the responder puts into its `ping-ack` replies.
pub const APP_TAG: &str = "app";

/// Sends typed replies back to the panel.
#[derive(Clone)]
pub struct ReplySender {
    transport: Arc<dyn Transport>,
}

impl ReplySender {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn send<T: Serialize>(&self, name: &str, payload: &T) {
        send_typed(self.transport.as_ref(), name, payload);
    }

    /// Emits the generic `error` reply.
    pub fn send_error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("Replying with error: {}", message);
        self.send(reply::ERROR, &ErrorReply { message });
    }

    /// Emits the generic `success` reply; `refresh` asks the panel to
    /// re-list its current directory.
    pub fn send_success(&self, message: impl Into<String>, refresh: bool) {
        self.send(
            reply::SUCCESS,
            &SuccessReply {
                message: Some(message.into()),
                refresh,
            },
        );
    }
}

/// The in-app endpoint. Attach it once per session; detach (or drop) to
/// release every command subscription.
pub struct Responder {
    registry: HandlerRegistry,
}

impl Responder {
    /// Registers one handler per command on `transport`, performing storage
    /// operations through `fs`.
    pub fn attach(transport: Arc<dyn Transport>, fs: Arc<dyn FileSystem>) -> Self {
        let mut registry = HandlerRegistry::new(transport.clone());
        let replies = ReplySender::new(transport);

        {
            let replies = replies.clone();
            registry.register(
                command::PING,
                handler(move |payload| {
                    let replies = replies.clone();
                    async move { handlers::ping(payload, replies).await }
                }),
            );
        }
        {
            let fs = fs.clone();
            let replies = replies.clone();
            registry.register(
                command::GET_ROOT_DIRECTORIES,
                handler(move |payload| {
                    let fs = fs.clone();
                    let replies = replies.clone();
                    async move { handlers::get_root_directories(payload, fs, replies).await }
                }),
            );
        }
        {
            let fs = fs.clone();
            let replies = replies.clone();
            registry.register(
                command::LIST_DIRECTORY,
                handler(move |payload| {
                    let fs = fs.clone();
                    let replies = replies.clone();
                    async move { handlers::list_directory(payload, fs, replies).await }
                }),
            );
        }
        {
            let fs = fs.clone();
            let replies = replies.clone();
            registry.register(
                command::GET_FILE_CONTENT,
                handler(move |payload| {
                    let fs = fs.clone();
                    let replies = replies.clone();
                    async move { handlers::get_file_content(payload, fs, replies).await }
                }),
            );
        }
        {
            let fs = fs.clone();
            let replies = replies.clone();
            registry.register(
                command::DELETE,
                handler(move |payload| {
                    let fs = fs.clone();
                    let replies = replies.clone();
                    async move { handlers::delete(payload, fs, replies).await }
                }),
            );
        }
        {
            let fs = fs.clone();
            let replies = replies.clone();
            registry.register(
                command::UPLOAD_FILE,
                handler(move |payload| {
                    let fs = fs.clone();
                    let replies = replies.clone();
                    async move { handlers::upload_file(payload, fs, replies).await }
                }),
            );
        }
        {
            let replies = replies.clone();
            registry.register(
                command::NEW_FOLDER,
                handler(move |payload| {
                    let fs = fs.clone();
                    let replies = replies.clone();
                    async move { handlers::new_folder(payload, fs, replies).await }
                }),
            );
        }

        debug_assert_eq!(registry.len(), command::ALL.len());
        tracing::info!("Responder attached, {} command handlers live", registry.len());
        Self { registry }
    }

    /// Releases every command subscription. Dropping the responder has the
    /// same effect.
    pub fn detach(mut self) {
        self.registry.release_all();
        tracing::info!("Responder detached");
    }
}

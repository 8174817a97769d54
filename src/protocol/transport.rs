//! The transport seam between the two endpoints.
//!
//! A [`Transport`] delivers named, JSON-serializable messages with
//! at-most-once semantics and no request/response correlation. The trait
//! mirrors the substrate the endpoints run on, so tests and embeddings can
//! substitute their own channel.

use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The future a message handler runs to completion per delivered message.
pub type HandlerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A callback invoked with the payload of each delivered message.
pub type MessageHandler = Arc<dyn Fn(serde_json::Value) -> HandlerFuture + Send + Sync>;

/// Wraps an async closure into a [`MessageHandler`].
pub fn handler<F, Fut>(f: F) -> MessageHandler
where
    F: Fn(serde_json::Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |payload| Box::pin(f(payload)))
}

/// A channel that delivers named messages between the two endpoints.
pub trait Transport: Send + Sync + 'static {
    /// Sends `payload` under `name` to the peer endpoint. Fire-and-forget:
    /// delivery is asynchronous and at most once.
    fn send_message(&self, name: &str, payload: serde_json::Value);

    /// Registers `handler` for messages named `name`. The listener stays
    /// live until the returned [`Subscription`] is released.
    fn add_message_listener(&self, name: &str, handler: MessageHandler) -> Subscription;
}

/// Serializes `payload` and sends it, logging instead of panicking when the
/// value cannot be represented as JSON.
pub fn send_typed<T: Serialize>(transport: &dyn Transport, name: &str, payload: &T) {
    match serde_json::to_value(payload) {
        Ok(value) => transport.send_message(name, value),
        Err(e) => tracing::error!("Failed to serialize '{}' payload: {}", name, e),
    }
}

/// A release-once handle for a registered message listener.
///
/// Releasing happens exactly once, either through [`Subscription::release`]
/// or on drop, so the listener is torn down on every exit path.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Removes the listener from its transport.
    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("released", &self.release.is_none())
            .finish()
    }
}

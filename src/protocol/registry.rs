//! Per-endpoint bookkeeping of live message listeners.

use std::collections::HashMap;
use std::sync::Arc;

use super::transport::{MessageHandler, Subscription, Transport};

/// Owns every subscription one endpoint holds on its transport.
///
/// Guarantees at most one live handler per message name: registering a name
/// again releases the previous listener before the new one is added, so a
/// re-attach never leaves two handlers receiving the same message. Dropping
/// the registry releases everything, which covers teardown on failure paths
/// as well as orderly shutdown.
pub struct HandlerRegistry {
    transport: Arc<dyn Transport>,
    active: HashMap<String, Subscription>,
}

impl HandlerRegistry {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            active: HashMap::new(),
        }
    }

    /// Registers `handler` for `name`, replacing any previous registration.
    pub fn register(&mut self, name: &str, handler: MessageHandler) {
        if let Some(previous) = self.active.remove(name) {
            tracing::debug!("Replacing live handler for '{}'", name);
            previous.release();
        }
        let subscription = self.transport.add_message_listener(name, handler);
        self.active.insert(name.to_string(), subscription);
    }

    /// Releases every live subscription.
    pub fn release_all(&mut self) {
        for (name, subscription) in self.active.drain() {
            tracing::debug!("Releasing handler for '{}'", name);
            subscription.release();
        }
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl Drop for HandlerRegistry {
    fn drop(&mut self) {
        self.release_all();
    }
}

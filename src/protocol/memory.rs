//! An in-process transport: two endpoints joined by a pair of channels.
//!
//! Useful for tests and for embeddings where both endpoints live in the same
//! process. Messages are delivered at most once, in send order per
//! direction; each delivered message's handler runs to completion before the
//! next message in that direction is dispatched, while the two directions
//! interleave freely.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::transport::{MessageHandler, Subscription, Transport};

type ListenerMap = Arc<Mutex<HashMap<String, Vec<(u64, MessageHandler)>>>>;

/// One endpoint of an in-memory duplex channel.
pub struct MemoryTransport {
    outbound: mpsc::UnboundedSender<(String, Value)>,
    listeners: ListenerMap,
    next_listener_id: AtomicU64,
    pump: JoinHandle<()>,
}

/// Creates two connected endpoints. Must be called from within a tokio
/// runtime; each endpoint spawns one pump task that stops when its peer is
/// dropped.
pub fn pair() -> (MemoryTransport, MemoryTransport) {
    let (left_tx, left_rx) = mpsc::unbounded_channel();
    let (right_tx, right_rx) = mpsc::unbounded_channel();

    let left = MemoryTransport::new(left_tx, right_rx);
    let right = MemoryTransport::new(right_tx, left_rx);
    (left, right)
}

impl MemoryTransport {
    fn new(
        outbound: mpsc::UnboundedSender<(String, Value)>,
        mut inbound: mpsc::UnboundedReceiver<(String, Value)>,
    ) -> Self {
        let listeners: ListenerMap = Arc::default();

        let pump_listeners = listeners.clone();
        let pump = tokio::spawn(async move {
            while let Some((name, payload)) = inbound.recv().await {
                let handlers: Vec<MessageHandler> = {
                    let map = pump_listeners.lock().expect("listener table lock poisoned");
                    map.get(&name)
                        .map(|entries| entries.iter().map(|(_, h)| h.clone()).collect())
                        .unwrap_or_default()
                };

                if handlers.is_empty() {
                    tracing::debug!("No listener for message '{}', dropping it", name);
                    continue;
                }
                for handler in handlers {
                    handler(payload.clone()).await;
                }
            }
        });

        Self {
            outbound,
            listeners,
            next_listener_id: AtomicU64::new(0),
            pump,
        }
    }
}

impl Transport for MemoryTransport {
    fn send_message(&self, name: &str, payload: Value) {
        if self.outbound.send((name.to_string(), payload)).is_err() {
            tracing::warn!("Peer endpoint is gone, message '{}' dropped", name);
        }
    }

    fn add_message_listener(&self, name: &str, handler: MessageHandler) -> Subscription {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut map = self.listeners.lock().expect("listener table lock poisoned");
            map.entry(name.to_string()).or_default().push((id, handler));
        }

        let listeners: Weak<_> = Arc::downgrade(&self.listeners);
        let name = name.to_string();
        Subscription::new(move || {
            let Some(listeners) = listeners.upgrade() else {
                return;
            };
            let mut map = listeners.lock().expect("listener table lock poisoned");
            if let Some(entries) = map.get_mut(&name) {
                entries.retain(|(entry_id, _)| *entry_id != id);
                if entries.is_empty() {
                    map.remove(&name);
                }
            }
        })
    }
}

impl Drop for MemoryTransport {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

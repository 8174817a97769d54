//! A bidirectional file-explorer protocol between an application-embedded
//! responder and an external control panel.
//!
//! The two endpoints exchange named, JSON-serializable messages over a
//! [`protocol::transport::Transport`]: the panel issues commands, the
//! [`responder::Responder`] performs one storage operation per command and
//! emits exactly one typed reply, and the [`panel::PanelClient`] reconciles
//! those replies into its view state. File content rides the JSON-only
//! transport as base64 text.

pub mod config;
pub mod core;
pub mod panel;
pub mod protocol;
pub mod responder;

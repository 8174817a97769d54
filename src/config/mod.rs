//! Construction-time configuration for a panel session.
//!
//! The protocol persists nothing of its own, so this is plain data handed to
//! [`crate::panel::PanelClient::attach`] by the embedding host.

use serde::{Deserialize, Serialize};

use crate::core::RootKind;

/// Settings for one panel session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// The root whose path seeds the initial browse location.
    pub default_root: RootKind,
    /// The tag this panel puts into its `ping` probes.
    pub sender_tag: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            default_root: RootKind::Document,
            sender_tag: "panel".to_string(),
        }
    }
}

//! The wire catalog: message names and their payload shapes.
//!
//! Names are partitioned into two disjoint vocabularies, [`command`] for
//! panel-to-app messages and [`reply`] for app-to-panel messages, so an
//! endpoint never handles its own outbound names. Payloads are plain serde
//! structs carried as JSON values.

pub mod memory;
pub mod registry;
pub mod transport;

use serde::{Deserialize, Serialize};

use crate::core::FileEntry;

/// Names the panel sends and the responder handles.
pub mod command {
    pub const PING: &str = "ping";
    pub const GET_ROOT_DIRECTORIES: &str = "get-root-directories";
    pub const LIST_DIRECTORY: &str = "list-directory";
    pub const GET_FILE_CONTENT: &str = "get-file-content";
    pub const DELETE: &str = "delete";
    pub const UPLOAD_FILE: &str = "upload-file";
    pub const NEW_FOLDER: &str = "new-folder";

    pub const ALL: &[&str] = &[
        PING,
        GET_ROOT_DIRECTORIES,
        LIST_DIRECTORY,
        GET_FILE_CONTENT,
        DELETE,
        UPLOAD_FILE,
        NEW_FOLDER,
    ];
}

/// Names the responder sends and the panel handles.
pub mod reply {
    pub const PING_ACK: &str = "ping-ack";
    pub const ROOT_DIRECTORIES: &str = "root-directories";
    pub const DIRECTORY_LISTING: &str = "directory-listing";
    pub const FILE_CONTENT: &str = "file-content";
    pub const SUCCESS: &str = "success";
    pub const ERROR: &str = "error";

    pub const ALL: &[&str] = &[
        PING_ACK,
        ROOT_DIRECTORIES,
        DIRECTORY_LISTING,
        FILE_CONTENT,
        SUCCESS,
        ERROR,
    ];
}

/// Payload of `ping` and `ping-ack`; `from` tags the sending endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingPayload {
    pub from: String,
}

/// Payload of the single-path commands (`list-directory`,
/// `get-file-content`, `delete`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathPayload {
    pub path: String,
}

/// Payload of `upload-file`; `content` is base64 text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadFilePayload {
    pub path: String,
    pub name: String,
    pub content: String,
}

/// Payload of `new-folder`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFolderPayload {
    pub path: String,
    pub name: String,
}

/// Payload of `directory-listing`: the full entry set for one directory,
/// replacing whatever the panel held before.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryListing {
    pub files: Vec<FileEntry>,
}

/// Payload of `file-content`; echoes the requested path so the panel can
/// name the download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContentReply {
    pub content: String,
    pub path: String,
}

/// Payload of the generic `success` reply. `refresh` asks the panel to
/// re-list its current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

/// Payload of the generic `error` reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReply {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn command_and_reply_vocabularies_are_disjoint() {
        for name in command::ALL {
            assert!(
                !reply::ALL.contains(name),
                "'{name}' appears in both directions"
            );
        }
    }

    #[test]
    fn success_reply_fields_default_when_absent() {
        let success: SuccessReply = serde_json::from_value(json!({})).unwrap();
        assert!(success.message.is_none());
        assert!(!success.refresh);

        let success: SuccessReply =
            serde_json::from_value(json!({ "message": "File deleted", "refresh": true })).unwrap();
        assert_eq!(success.message.as_deref(), Some("File deleted"));
        assert!(success.refresh);
    }

    #[test]
    fn upload_payload_requires_all_fields() {
        let missing_content = json!({ "path": "/data/app", "name": "a.txt" });
        assert!(serde_json::from_value::<UploadFilePayload>(missing_content).is_err());
    }
}

//! One handler per command.
//!
//! Validation policy: a payload that does not deserialize, or whose required
//! `path` is empty, names no well-formed request; the command is ignored
//! with a log line and no reply. Everything after validation answers with
//! exactly one typed reply.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use std::sync::Arc;

use super::{ReplySender, APP_TAG};
use crate::core::{transcode, EntryInfo, FileEntry, FileSystem};
use crate::protocol::{
    reply, DirectoryListing, FileContentReply, NewFolderPayload, PathPayload, PingPayload,
    UploadFilePayload,
};

/// Answers a liveness probe with `ping-ack`.
pub async fn ping(payload: Value, replies: ReplySender) {
    match serde_json::from_value::<PingPayload>(payload) {
        Ok(request) => tracing::info!("Ping from '{}'", request.from),
        Err(_) => tracing::debug!("Ping without a sender tag"),
    }
    replies.send(
        reply::PING_ACK,
        &PingPayload {
            from: APP_TAG.to_string(),
        },
    );
}

/// Resolves the three fixed roots. Cannot fail.
pub async fn get_root_directories(_payload: Value, fs: Arc<dyn FileSystem>, replies: ReplySender) {
    replies.send(reply::ROOT_DIRECTORIES, &fs.root_directories());
}

/// Lists a directory, statting each entry independently.
///
/// One entry failing to stat must not sink the whole listing: valid entries
/// are always sent, and the collected failures follow as a single combined
/// `error` reply.
pub async fn list_directory(payload: Value, fs: Arc<dyn FileSystem>, replies: ReplySender) {
    let request = match serde_json::from_value::<PathPayload>(payload) {
        Ok(request) => request,
        Err(_) => {
            tracing::warn!("Ignoring list-directory with malformed payload");
            return;
        }
    };
    if request.path.is_empty() {
        return;
    }

    let path = Utf8PathBuf::from(request.path);
    let names = match fs.read_dir(&path).await {
        Ok(names) => names,
        Err(e) => {
            replies.send_error(e.to_string());
            return;
        }
    };

    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        let info = match fs.stat(&path.join(&name)).await {
            Ok(stat) => EntryInfo::Stat(stat),
            Err(e) => EntryInfo::Error {
                message: e.to_string(),
            },
        };
        entries.push(FileEntry { name, info });
    }

    let (valid, failed): (Vec<FileEntry>, Vec<FileEntry>) =
        entries.into_iter().partition(FileEntry::is_valid);

    replies.send(reply::DIRECTORY_LISTING, &DirectoryListing { files: valid });

    if !failed.is_empty() {
        let joined = failed
            .iter()
            .filter_map(|entry| match &entry.info {
                EntryInfo::Error { message } => Some(message.as_str()),
                EntryInfo::Stat(_) => None,
            })
            .collect::<Vec<_>>()
            .join(", ");
        replies.send_error(joined);
    }
}

/// Reads a file and ships its content as base64 text, echoing the path.
pub async fn get_file_content(payload: Value, fs: Arc<dyn FileSystem>, replies: ReplySender) {
    let request = match serde_json::from_value::<PathPayload>(payload) {
        Ok(request) => request,
        Err(_) => {
            tracing::warn!("Ignoring get-file-content with malformed payload");
            return;
        }
    };
    if request.path.is_empty() {
        return;
    }

    match fs.read(Utf8Path::new(&request.path)).await {
        Ok(bytes) => replies.send(
            reply::FILE_CONTENT,
            &FileContentReply {
                content: transcode::encode(&bytes),
                path: request.path,
            },
        ),
        Err(e) => replies.send_error(e.to_string()),
    }
}

/// Deletes a file or directory (recursively).
pub async fn delete(payload: Value, fs: Arc<dyn FileSystem>, replies: ReplySender) {
    let request = match serde_json::from_value::<PathPayload>(payload) {
        Ok(request) => request,
        Err(_) => {
            tracing::warn!("Ignoring delete with malformed payload");
            return;
        }
    };
    if request.path.is_empty() {
        return;
    }

    match fs.remove(Utf8Path::new(&request.path)).await {
        Ok(()) => replies.send_success("File deleted", true),
        Err(e) => replies.send_error(e.to_string()),
    }
}

/// Decodes uploaded base64 content and writes it to `path/name`.
///
/// Malformed base64 is a well-formed request gone wrong, so it earns an
/// `error` reply rather than the silent-ignore treatment.
pub async fn upload_file(payload: Value, fs: Arc<dyn FileSystem>, replies: ReplySender) {
    let request = match serde_json::from_value::<UploadFilePayload>(payload) {
        Ok(request) => request,
        Err(_) => {
            tracing::warn!("Ignoring upload-file with malformed payload");
            return;
        }
    };
    if request.path.is_empty() || request.name.is_empty() {
        return;
    }

    let bytes = match transcode::decode(&request.content) {
        Ok(bytes) => bytes,
        Err(e) => {
            replies.send_error(e.to_string());
            return;
        }
    };

    let target = Utf8Path::new(&request.path).join(&request.name);
    match fs.write(&target, &bytes).await {
        Ok(()) => replies.send_success("File uploaded", true),
        Err(e) => replies.send_error(e.to_string()),
    }
}

/// Creates a directory at `path/name`, including intermediate directories.
pub async fn new_folder(payload: Value, fs: Arc<dyn FileSystem>, replies: ReplySender) {
    let request = match serde_json::from_value::<NewFolderPayload>(payload) {
        Ok(request) => request,
        Err(_) => {
            tracing::warn!("Ignoring new-folder with malformed payload");
            return;
        }
    };
    if request.path.is_empty() || request.name.is_empty() {
        return;
    }

    let target = Utf8Path::new(&request.path).join(&request.name);
    match fs.create_dir_all(&target).await {
        Ok(()) => replies.send_success("Folder created", true),
        Err(e) => replies.send_error(e.to_string()),
    }
}

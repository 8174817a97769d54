//! Shared data model for both protocol endpoints.

pub mod error;
pub mod fs;
pub mod path;
pub mod transcode;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use error::ExplorerError;
pub use fs::{FileSystem, LocalFileSystem};

/// Metadata for a single file-system entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileStat {
    /// `false` when the path does not exist (a successful stat, not an error).
    pub exists: bool,
    pub is_directory: bool,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl FileStat {
    /// The stat of a path that does not exist.
    pub fn missing() -> Self {
        Self {
            exists: false,
            is_directory: false,
            size: 0,
            modified: None,
        }
    }
}

/// Outcome of statting one directory entry: either its metadata or the
/// failure that prevented retrieving it.
///
/// An explicit sum type, so consumers must handle both cases; a failed entry
/// never masquerades as a stat with empty fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntryInfo {
    Stat(FileStat),
    Error { message: String },
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub info: EntryInfo,
}

impl FileEntry {
    /// `true` when metadata retrieval succeeded for this entry.
    pub fn is_valid(&self) -> bool {
        matches!(self.info, EntryInfo::Stat(_))
    }

    pub fn stat(&self) -> Option<&FileStat> {
        match &self.info {
            EntryInfo::Stat(stat) => Some(stat),
            EntryInfo::Error { .. } => None,
        }
    }
}

/// The fixed set of well-known storage locations an application exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootKind {
    Document,
    Cache,
    Bundle,
}

/// Absolute paths of the three well-known roots, resolved once per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootDirectories {
    pub document: Utf8PathBuf,
    pub cache: Utf8PathBuf,
    pub bundle: Utf8PathBuf,
}

impl RootDirectories {
    pub fn get(&self, kind: RootKind) -> &Utf8Path {
        match kind {
            RootKind::Document => &self.document,
            RootKind::Cache => &self.cache,
            RootKind::Bundle => &self.bundle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_info_serializes_with_kind_tag() {
        let entry = FileEntry {
            name: "notes.txt".to_string(),
            info: EntryInfo::Stat(FileStat {
                exists: true,
                is_directory: false,
                size: 42,
                modified: None,
            }),
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["info"]["kind"], "stat");
        assert_eq!(value["info"]["size"], 42);
        assert_eq!(value["info"]["is_directory"], false);
    }

    #[test]
    fn entry_info_error_round_trips() {
        let value = json!({
            "name": "locked.db",
            "info": { "kind": "error", "message": "permission denied" }
        });

        let entry: FileEntry = serde_json::from_value(value).unwrap();
        assert!(!entry.is_valid());
        assert!(entry.stat().is_none());
        match entry.info {
            EntryInfo::Error { message } => assert_eq!(message, "permission denied"),
            EntryInfo::Stat(_) => panic!("expected the error variant"),
        }
    }

    #[test]
    fn root_directories_lookup_by_kind() {
        let roots = RootDirectories {
            document: "/data/app".into(),
            cache: "/data/cache".into(),
            bundle: "/data/bundle".into(),
        };

        assert_eq!(roots.get(RootKind::Document), "/data/app");
        assert_eq!(roots.get(RootKind::Cache), "/data/cache");
        assert_eq!(roots.get(RootKind::Bundle), "/data/bundle");
    }
}

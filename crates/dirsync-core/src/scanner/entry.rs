//! Filesystem entries captured at scan time

use std::ffi::{OsStr, OsString};
use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;
use std::time::SystemTime;

/// Kind of filesystem object, read without following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Symbolic link (never followed)
    Symlink,
    /// Directory
    Directory,
    /// Device, FIFO, socket or anything else the engine does not sync
    Other,
}

impl EntryKind {
    /// Classify a `symlink_metadata` result
    #[must_use]
    pub fn of(metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// Unique identity of a filesystem object: device and inode number
///
/// Used only to recognise the same directory reached by different routes,
/// never to decide whether two files have the same content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    /// Device the object lives on
    pub dev: u64,
    /// Inode number on that device
    pub ino: u64,
}

impl From<&Metadata> for FileIdentity {
    fn from(metadata: &Metadata) -> Self {
        Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        }
    }
}

/// Metadata captured for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Object kind
    pub kind: EntryKind,
    /// Size in bytes
    pub len: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// Last access time
    pub accessed: SystemTime,
    /// Permission bits (`st_mode & 0o7777`)
    pub mode: u32,
    /// Filesystem identity, used by the cycle guard
    pub identity: FileIdentity,
}

impl From<&Metadata> for EntryMetadata {
    fn from(metadata: &Metadata) -> Self {
        Self {
            kind: EntryKind::of(metadata),
            len: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            accessed: metadata.accessed().unwrap_or(SystemTime::UNIX_EPOCH),
            mode: metadata.mode() & 0o7777,
            identity: FileIdentity::from(metadata),
        }
    }
}

/// One child of a directory as observed during a scan
///
/// Entries are immutable snapshots, not live views of the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: OsString,
    metadata: EntryMetadata,
}

impl Entry {
    /// Create an entry from a bare name (no path separators) and its metadata
    #[must_use]
    pub fn new(name: impl Into<OsString>, metadata: EntryMetadata) -> Self {
        Self {
            name: name.into(),
            metadata,
        }
    }

    /// Entry name relative to its directory
    #[must_use]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// Captured metadata
    #[must_use]
    pub const fn metadata(&self) -> &EntryMetadata {
        &self.metadata
    }

    /// Object kind
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.metadata.kind
    }

    /// Whether this entry is a symbolic link
    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.metadata.kind == EntryKind::Symlink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_kind_classification() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        let dir = tmp.path().join("dir");
        let link = tmp.path().join("link");
        fs::write(&file, "content").unwrap();
        fs::create_dir(&dir).unwrap();
        std::os::unix::fs::symlink(&dir, &link).unwrap();

        assert_eq!(EntryKind::of(&fs::symlink_metadata(&file).unwrap()), EntryKind::File);
        assert_eq!(EntryKind::of(&fs::symlink_metadata(&dir).unwrap()), EntryKind::Directory);
        // A symlink to a directory is still a symlink
        assert_eq!(EntryKind::of(&fs::symlink_metadata(&link).unwrap()), EntryKind::Symlink);
    }

    #[test]
    fn test_metadata_capture() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "hello").unwrap();

        let metadata = EntryMetadata::from(&fs::symlink_metadata(&file).unwrap());
        assert_eq!(metadata.kind, EntryKind::File);
        assert_eq!(metadata.len, 5);
        assert_eq!(metadata.mode & !0o7777, 0);

        let entry = Entry::new("file.txt", metadata);
        assert_eq!(entry.name(), "file.txt");
        assert!(!entry.is_symlink());
    }

    #[test]
    fn test_identity_matches_same_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("dir");
        fs::create_dir(&dir).unwrap();

        let direct = FileIdentity::from(&fs::metadata(&dir).unwrap());
        let via_dot = FileIdentity::from(&fs::metadata(dir.join(".")).unwrap());
        let parent = FileIdentity::from(&fs::metadata(dir.join("..")).unwrap());

        assert_eq!(direct, via_dot);
        assert_ne!(direct, parent);
    }
}

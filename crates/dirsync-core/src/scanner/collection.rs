//! Name-indexed, always-sorted collection of entries

use std::ffi::OsStr;

use super::entry::{Entry, EntryMetadata};

/// Smallest capacity allocated on first insertion
const MIN_CAPACITY: usize = 4;

/// Sorted set of [`Entry`] values, unique by name
///
/// After every insertion the entries are in ascending byte order of their
/// names and no two share a name, so [`find`](Self::find) is a binary search.
/// Storage is released when the collection is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryCollection {
    entries: Vec<Entry>,
}

impl EntryCollection {
    /// Create an empty collection
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert an entry, replacing any entry with the same name
    ///
    /// Storage doubles (minimum [`MIN_CAPACITY`]) when full, and the whole
    /// collection is re-sorted after the append. Directory listings are
    /// expected to be modest, so the per-insert sort is acceptable.
    pub fn insert(&mut self, name: impl AsRef<OsStr>, metadata: EntryMetadata) {
        let name = name.as_ref();
        if let Ok(idx) = self.position(name) {
            self.entries[idx] = Entry::new(name, metadata);
            return;
        }

        self.grow();
        self.entries.push(Entry::new(name, metadata));
        self.entries.sort_unstable_by(|a, b| a.name().cmp(b.name()));
    }

    /// Look up an entry by name
    #[must_use]
    pub fn find(&self, name: impl AsRef<OsStr>) -> Option<&Entry> {
        self.position(name.as_ref())
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// Whether an entry with this name is present
    #[must_use]
    pub fn contains(&self, name: impl AsRef<OsStr>) -> bool {
        self.find(name).is_some()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Currently reserved storage, in entries
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Iterate entries in name order
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    fn position(&self, name: &OsStr) -> Result<usize, usize> {
        self.entries.binary_search_by(|entry| entry.name().cmp(name))
    }

    fn grow(&mut self) {
        let capacity = self.entries.capacity();
        if self.entries.len() < capacity {
            return;
        }
        let target = (capacity * 2).max(MIN_CAPACITY);
        self.entries.reserve_exact(target - self.entries.len());
    }
}

impl<'a> IntoIterator for &'a EntryCollection {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

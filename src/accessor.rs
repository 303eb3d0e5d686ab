//! Remote Accessor
//!
//! The capability the tree builder and importer walk the store through. The
//! store exposes a slash-delimited namespace; listing a folder returns child
//! names, with sub-folders marked by a trailing separator.
//!
//! ## Implementations
//!
//! - [`crate::vault::VaultClient`]: the store's HTTP API
//! - [`MemoryAccessor`]: an in-process namespace

use crate::error::AccessError;
use crate::secret::{LeafPayload, LeafSecret};

mod memory;

pub use memory::MemoryAccessor;

/// Path separator of the store namespace
pub const SEPARATOR: char = '/';

/// One listing result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteEntry {
    /// A sub-folder; the name has no trailing separator
    Folder(String),
    /// A secret
    Leaf(String),
}

impl RemoteEntry {
    /// Classify a raw key as returned by a listing
    pub fn from_key(key: &str) -> Self {
        match key.strip_suffix(SEPARATOR) {
            Some(name) => RemoteEntry::Folder(name.replace(SEPARATOR, "")),
            None => RemoteEntry::Leaf(key.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RemoteEntry::Folder(name) | RemoteEntry::Leaf(name) => name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, RemoteEntry::Folder(_))
    }
}

/// List/read/write access to a remote secrets namespace
///
/// Folder paths passed to `list` are either empty (the root) or end with the
/// separator. Leaf paths never do.
pub trait RemoteAccessor {
    /// List the children of a folder.
    ///
    /// # Errors
    ///
    /// `NotFound` if the folder does not exist, `Transport` for API failures.
    fn list(&self, path: &str) -> Result<Vec<RemoteEntry>, AccessError>;

    /// Read a leaf.
    ///
    /// When `reveal` is false no sensitive read is performed and
    /// [`LeafSecret::Redacted`] is returned.
    fn read_leaf(&self, path: &str, reveal: bool) -> Result<LeafSecret, AccessError>;

    /// Write a leaf, replacing whatever is stored at `path`.
    fn write_leaf(&self, path: &str, payload: &LeafPayload) -> Result<(), AccessError>;
}

impl<T: RemoteAccessor + ?Sized> RemoteAccessor for &T {
    fn list(&self, path: &str) -> Result<Vec<RemoteEntry>, AccessError> {
        (**self).list(path)
    }

    fn read_leaf(&self, path: &str, reveal: bool) -> Result<LeafSecret, AccessError> {
        (**self).read_leaf(path, reveal)
    }

    fn write_leaf(&self, path: &str, payload: &LeafPayload) -> Result<(), AccessError> {
        (**self).write_leaf(path, payload)
    }
}

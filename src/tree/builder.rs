//! Tree builder for exporting a secrets namespace

use crate::accessor::{RemoteAccessor, RemoteEntry, SEPARATOR};
use crate::error::AccessError;
use crate::tree::folder::Folder;
use crate::tree::path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, trace};

/// Recursive namespace walker producing a [`Folder`] tree
pub struct TreeBuilder<'a, A: RemoteAccessor + ?Sized> {
    accessor: &'a A,
    reveal: bool,
}

impl<'a, A: RemoteAccessor + ?Sized> TreeBuilder<'a, A> {
    /// Create a builder over the given accessor. Secrets are redacted unless
    /// [`TreeBuilder::reveal`] is set.
    pub fn new(accessor: &'a A) -> Self {
        Self {
            accessor,
            reveal: false,
        }
    }

    /// Read real secret values instead of placeholders
    pub fn reveal(mut self, reveal: bool) -> Self {
        self.reveal = reveal;
        self
    }

    /// Build the tree rooted at `root`.
    ///
    /// The fetched subtree is nested under the segments of `root`, so the
    /// result always starts at the top of the namespace. The first list or
    /// read failure aborts the walk and is returned as is.
    #[instrument(skip(self), fields(reveal = self.reveal))]
    pub fn build(&self, root: &str) -> Result<Folder, AccessError> {
        let start = Instant::now();
        info!("Starting tree export");

        let segments = path::split_root(root);
        let list_path = path::folder_list_path(&segments);

        let subtree = match self.read_folder(&list_path) {
            Ok(folder) => folder,
            Err(e) => {
                error!(path = %e.path(), "Tree export failed: {}", e);
                return Err(e);
            }
        };

        let tree = Folder::wrap(&segments, subtree);
        info!(
            leaf_count = tree.leaf_count(),
            duration_ms = start.elapsed().as_millis(),
            "Tree export completed"
        );
        Ok(tree)
    }

    /// List a folder and recursively fetch everything below it
    fn read_folder(&self, path: &str) -> Result<Folder, AccessError> {
        let entries = self.accessor.list(path)?;
        debug!(path, entry_count = entries.len(), "Listed folder");

        let mut folder = Folder::new();
        for entry in entries {
            match entry {
                RemoteEntry::Folder(name) => {
                    let child_path = format!("{}{}{}", path, name, SEPARATOR);
                    let subtree = self.read_folder(&child_path)?;
                    folder.insert_folder(name, subtree);
                }
                RemoteEntry::Leaf(name) => {
                    let child_path = format!("{}{}", path, name);
                    trace!(path = %child_path, "Reading secret");
                    let secret = self.accessor.read_leaf(&child_path, self.reveal)?;
                    folder.insert_leaf(name, secret);
                }
            }
        }
        Ok(folder)
    }
}

/// Export the tree rooted at `root`; shorthand for [`TreeBuilder`]
pub fn build<A: RemoteAccessor + ?Sized>(
    accessor: &A,
    root: &str,
    reveal: bool,
) -> Result<Folder, AccessError> {
    TreeBuilder::new(accessor).reveal(reveal).build(root)
}

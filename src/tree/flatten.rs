//! Flatten a tree into per-leaf writes

use crate::accessor::SEPARATOR;
use crate::secret::LeafSecret;
use crate::tree::folder::{Folder, Node};
use crate::tree::path;

/// One leaf of a flattened tree
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry {
    /// Full store path of the leaf
    pub path: String,
    pub secret: LeafSecret,
}

/// Walk `folder` depth-first in key order and emit every leaf with its full
/// path below `base`.
///
/// A folder's attached secret is emitted at the folder's own path before its
/// children.
pub fn flatten(folder: &Folder, base: &str) -> Vec<FlatEntry> {
    let mut out = Vec::with_capacity(folder.leaf_count());
    walk(folder, &path::folder_prefix(base), &mut out);
    out
}

fn walk(folder: &Folder, prefix: &str, out: &mut Vec<FlatEntry>) {
    for (key, node) in folder.entries() {
        let leaf_path = format!("{}{}", prefix, key);
        match node {
            Node::Leaf(secret) => out.push(FlatEntry {
                path: leaf_path,
                secret: secret.clone(),
            }),
            Node::Folder(child) => {
                if let Some(secret) = child.attached_secret() {
                    out.push(FlatEntry {
                        path: leaf_path.clone(),
                        secret: secret.clone(),
                    });
                }
                let child_prefix = format!("{}{}", leaf_path, SEPARATOR);
                walk(child, &child_prefix, out);
            }
        }
    }
}

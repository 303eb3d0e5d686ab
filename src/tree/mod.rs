//! Secret Namespace Tree
//!
//! Mirrors a slash-delimited secrets namespace as a nested [`Folder`]. The
//! builder walks the store to produce a tree (export) and flatten turns a tree
//! back into per-leaf writes (import).

pub mod builder;
pub mod flatten;
pub mod folder;
pub mod path;

pub use builder::{build, TreeBuilder};
pub use flatten::{flatten, FlatEntry};
pub use folder::{Folder, Node};

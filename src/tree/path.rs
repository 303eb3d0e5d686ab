//! Namespace path normalization utilities

use crate::accessor::SEPARATOR;

/// Split a root path into its segments.
///
/// One trailing separator is dropped before splitting. A root that names the
/// top of the namespace (`""` or `"/"`) yields a single empty segment, the
/// sentinel the builder uses to return the fetched subtree unwrapped. A
/// leading separator and empty interior segments are ignored since store
/// paths are relative to the mount.
pub fn split_root(path: &str) -> Vec<String> {
    let trimmed = path.strip_suffix(SEPARATOR).unwrap_or(path);
    let trimmed = trimmed.strip_prefix(SEPARATOR).unwrap_or(trimmed);

    let segments: Vec<String> = trimmed
        .split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    if segments.is_empty() {
        vec![String::new()]
    } else {
        segments
    }
}

/// Folder path to list for the given segments: `a/b/`, or `""` for the root
pub fn folder_list_path(segments: &[String]) -> String {
    if is_root(segments) {
        return String::new();
    }
    let mut path = segments.join(&SEPARATOR.to_string());
    path.push(SEPARATOR);
    path
}

/// Whether the segments name the top of the namespace
pub fn is_root(segments: &[String]) -> bool {
    segments.iter().all(|segment| segment.is_empty())
}

/// Normalize a base path for flattening: empty, or ending with one separator
pub fn folder_prefix(base: &str) -> String {
    folder_list_path(&split_root(base))
}

//! Merge rules applied when layering config sources.

pub mod merge_policy;

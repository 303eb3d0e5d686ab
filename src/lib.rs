//! vaultwalk: Secret Tree Export and Import
//!
//! Walks a slash-delimited secrets namespace held in a Vault KV engine into a
//! nested folder tree, renders it as a YAML or JSON document, and writes such
//! documents back secret by secret.

pub mod accessor;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod secret;
pub mod tree;
pub mod vault;

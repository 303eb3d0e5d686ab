//! In-process namespace backed by a sorted map of leaf paths.

use super::{RemoteAccessor, RemoteEntry, SEPARATOR};
use crate::error::AccessError;
use crate::secret::{LeafPayload, LeafSecret};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Remote accessor keeping every secret in memory
///
/// Folders exist implicitly: a folder is present while at least one leaf
/// lives below it.
#[derive(Debug, Default)]
pub struct MemoryAccessor {
    secrets: RwLock<BTreeMap<String, LeafPayload>>,
    sensitive_reads: AtomicUsize,
}

impl MemoryAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accessor pre-populated with `(path, payload)` pairs
    pub fn with_secrets<I, P>(secrets: I) -> Self
    where
        I: IntoIterator<Item = (P, LeafPayload)>,
        P: Into<String>,
    {
        let accessor = Self::new();
        for (path, payload) in secrets {
            accessor.insert(path, payload);
        }
        accessor
    }

    pub fn insert(&self, path: impl Into<String>, payload: LeafPayload) {
        let path = path.into();
        let path = path.trim_matches(SEPARATOR).to_string();
        self.secrets.write().insert(path, payload);
    }

    pub fn get(&self, path: &str) -> Option<LeafPayload> {
        self.secrets.read().get(path.trim_matches(SEPARATOR)).cloned()
    }

    /// Copy of every stored `(path, payload)` pair
    pub fn snapshot(&self) -> BTreeMap<String, LeafPayload> {
        self.secrets.read().clone()
    }

    /// Number of reads that returned a real value
    pub fn sensitive_reads(&self) -> usize {
        self.sensitive_reads.load(Ordering::Relaxed)
    }
}

impl RemoteAccessor for MemoryAccessor {
    fn list(&self, path: &str) -> Result<Vec<RemoteEntry>, AccessError> {
        let secrets = self.secrets.read();
        let mut keys = BTreeSet::new();

        for stored in secrets.keys() {
            let Some(rest) = stored.strip_prefix(path) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            match rest.find(SEPARATOR) {
                Some(idx) => keys.insert(rest[..=idx].to_string()),
                None => keys.insert(rest.to_string()),
            };
        }

        if keys.is_empty() && !path.is_empty() {
            return Err(AccessError::NotFound {
                path: path.to_string(),
            });
        }

        Ok(keys.iter().map(|key| RemoteEntry::from_key(key)).collect())
    }

    fn read_leaf(&self, path: &str, reveal: bool) -> Result<LeafSecret, AccessError> {
        if !reveal {
            return Ok(LeafSecret::Redacted);
        }
        let payload = self.get(path).ok_or_else(|| AccessError::NotFound {
            path: path.to_string(),
        })?;
        self.sensitive_reads.fetch_add(1, Ordering::Relaxed);
        Ok(LeafSecret::Revealed(payload))
    }

    fn write_leaf(&self, path: &str, payload: &LeafPayload) -> Result<(), AccessError> {
        if path.trim_matches(SEPARATOR).is_empty() {
            return Err(AccessError::malformed(path, "cannot write a secret at the root"));
        }
        self.insert(path, payload.clone());
        Ok(())
    }
}

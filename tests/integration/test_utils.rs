//! Shared test utilities for integration tests
//!
//! Centralizes environment isolation and test doubles so that config-loading
//! tests do not race on process-wide environment variables.

use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Mutex;
use tempfile::TempDir;
use vaultwalk::accessor::{MemoryAccessor, RemoteAccessor, RemoteEntry};
use vaultwalk::error::AccessError;
use vaultwalk::secret::{LeafPayload, LeafSecret};

/// Global mutex serializing environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Variables the config loader reads, cleared for every isolated test
const ISOLATED_VARS: &[&str] = &[
    "HOME",
    "XDG_CONFIG_HOME",
    "XDG_DATA_HOME",
    "VAULT_ADDR",
    "VAULT_TOKEN",
    "VAULT_NAMESPACE",
    "VAULTWALK_ENV",
    "VAULTWALK__VAULT__MOUNT",
    "VAULTWALK__VAULT__TIMEOUT_SECS",
    "VAULTWALK__LOGGING__LEVEL",
];

/// Environment variable state to restore after test
struct EnvState {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            saved: ISOLATED_VARS
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.saved {
            match value {
                Some(orig) => std::env::set_var(name, orig),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with an isolated environment rooted at `test_dir`
///
/// - XDG_CONFIG_HOME points at `test_dir`, HOME at `test_dir/home`
/// - every store and vaultwalk variable the loader reads starts unset
/// - the original environment is restored afterwards
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();
    for name in ISOLATED_VARS {
        std::env::remove_var(name);
    }

    let test_home = test_dir.path().join("home");
    let test_data_home = test_dir.path().join("data");
    std::fs::create_dir_all(&test_home).unwrap();
    std::fs::create_dir_all(&test_data_home).unwrap();

    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_dir.path().to_str().unwrap());
    std::env::set_var("XDG_DATA_HOME", test_data_home.to_str().unwrap());

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

    env_state.restore();

    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Build a field-map payload from a JSON object literal
pub fn fields(value: Value) -> LeafPayload {
    match value {
        Value::Object(map) => LeafPayload::FieldMap(map),
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// In-memory store whose writes fail at chosen paths
pub struct FailingAccessor {
    pub inner: MemoryAccessor,
    failing: BTreeSet<String>,
}

impl FailingAccessor {
    pub fn failing_at<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: MemoryAccessor::new(),
            failing: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl RemoteAccessor for FailingAccessor {
    fn list(&self, path: &str) -> Result<Vec<RemoteEntry>, AccessError> {
        self.inner.list(path)
    }

    fn read_leaf(&self, path: &str, reveal: bool) -> Result<LeafSecret, AccessError> {
        self.inner.read_leaf(path, reveal)
    }

    fn write_leaf(&self, path: &str, payload: &LeafPayload) -> Result<(), AccessError> {
        if self.failing.contains(path) {
            return Err(AccessError::transport(
                path,
                "Request failed with status 500 Internal Server Error: storage unavailable",
            ));
        }
        self.inner.write_leaf(path, payload)
    }
}

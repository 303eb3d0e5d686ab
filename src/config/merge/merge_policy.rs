//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources replace earlier values key by key; tables are merged rather
//! than replaced.

use super::super::{DEFAULT_MOUNT, DEFAULT_TIMEOUT_SECS, DEFAULT_VAULT_ADDR};
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("vault.addr", DEFAULT_VAULT_ADDR)?
        .set_default("vault.mount", DEFAULT_MOUNT)?
        .set_default("vault.kv_version", "2")?
        .set_default("vault.timeout_secs", DEFAULT_TIMEOUT_SECS)?
        .set_default("vault.insecure_skip_tls", false)?
        .set_default("logging.level", "info")?
        .set_default("logging.output", "stderr")
}

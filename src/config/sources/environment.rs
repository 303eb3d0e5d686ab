//! Environment sources: `VAULTWALK__SECTION__KEY` variables, then the
//! conventional `VAULT_ADDR`, `VAULT_TOKEN` and `VAULT_NAMESPACE`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

pub const PREFIX: &str = "VAULTWALK";

/// Add environment sources and overrides to builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .add_source(Environment::with_prefix(PREFIX).separator("__"))
        .set_override_option("vault.addr", non_empty_var("VAULT_ADDR"))?
        .set_override_option("vault.token", non_empty_var("VAULT_TOKEN"))?
        .set_override_option("vault.namespace", non_empty_var("VAULT_NAMESPACE"))
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

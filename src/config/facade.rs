//! Config loading entry points.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::VaultwalkConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};

/// Loads [`VaultwalkConfig`] from layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence, lowest first: defaults, global config file, workspace
    /// `config/config.toml`, workspace `config/<VAULTWALK_ENV>.toml`,
    /// `VAULTWALK__*` variables, then `VAULT_ADDR`, `VAULT_TOKEN` and
    /// `VAULT_NAMESPACE`.
    pub fn load(workspace_root: &Path) -> Result<VaultwalkConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }

    /// Load configuration from a single file. Environment overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<VaultwalkConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }

    /// Location of the global config file, if one can be determined
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Defaults only, no files or environment
    pub fn defaults() -> Result<VaultwalkConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .build()?
            .try_deserialize::<VaultwalkConfig>()
    }
}


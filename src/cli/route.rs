//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::api;
use crate::config::{ConfigLoader, VaultwalkConfig};
use crate::error::ApiError;
use crate::tree::Folder;
use crate::vault::{KvVersion, VaultClient};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, info_span};

use crate::cli::help::{command_name, requires_client};
use crate::cli::parse::{AuthCommands, Commands, ConfigCommands, EngineCommands, UserCommands};
use crate::cli::presentation::{
    format_config_toml, format_export_document, format_health, format_import_report,
    format_user_provisioning,
};

/// Connection settings given on the command line; they win over every config source
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub addr: Option<String>,
    pub mount: Option<String>,
    pub kv_version: Option<KvVersion>,
}

impl ConnectionOverrides {
    fn apply(&self, config: &mut VaultwalkConfig) {
        if let Some(addr) = &self.addr {
            config.vault.addr = addr.clone();
        }
        if let Some(mount) = &self.mount {
            config.vault.mount = mount.clone();
        }
        if let Some(version) = self.kv_version {
            config.vault.kv_version = version;
        }
    }
}

/// Runtime context for CLI execution: workspace, config paths, and effective config.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    config: VaultwalkConfig,
    workspace_root: PathBuf,
    config_path: Option<PathBuf>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        overrides: ConnectionOverrides,
    ) -> Result<Self, ApiError> {
        let mut config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        overrides.apply(&mut config);

        Ok(Self {
            config,
            workspace_root,
            config_path,
        })
    }

    /// Effective configuration
    pub fn config(&self) -> &VaultwalkConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let name = command_name(command);
        let _span = info_span!("command", command = %name).entered();
        let started = Instant::now();

        let client = if requires_client(command) {
            Some(VaultClient::new(&self.config.vault)?)
        } else {
            None
        };
        let result = match client {
            Some(client) => self.execute_remote(command, &client),
            None => self.execute_local(command),
        };

        debug!(
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_remote(&self, command: &Commands, client: &VaultClient) -> Result<String, ApiError> {
        match command {
            Commands::Export {
                path,
                reveal,
                format,
                output,
            } => {
                let folder = api::export(client, path, *reveal)?;
                let document = format_export_document(&folder, format)?;
                match output {
                    Some(file) => {
                        std::fs::write(file, &document)?;
                        info!(file = %file.display(), "Export written");
                        Ok(format!(
                            "Exported {} secrets to {}",
                            folder.leaf_count(),
                            file.display()
                        ))
                    }
                    None => Ok(document.trim_end().to_string()),
                }
            }
            Commands::Import { file, base } => {
                let folder = read_document(file)?;
                let report = api::import(client, &folder, base)?;
                Ok(format_import_report(&report))
            }
            Commands::Engine {
                command: EngineCommands::Enable { mount, version },
            } => {
                client.enable_secrets_engine(mount, *version)?;
                Ok(format!(
                    "Enabled KV version {} secrets engine at {}/",
                    version,
                    mount.trim_matches('/')
                ))
            }
            Commands::Auth {
                command: AuthCommands::Enable { kind },
            } => {
                client.enable_auth_method(kind)?;
                Ok(format!("Enabled {} auth method", kind))
            }
            Commands::User {
                command:
                    UserCommands::Create {
                        name,
                        password,
                        policies,
                        format,
                    },
            } => {
                let result = client.create_user(name, password, policies)?;
                format_user_provisioning(&result, format)
            }
            Commands::Status { format } => {
                let health = client.health()?;
                format_health(&health, client.addr(), format)
            }
            Commands::Config { .. } => self.execute_local(command),
        }
    }

    fn execute_local(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Config {
                command: ConfigCommands::Show,
            } => format_config_toml(&self.config),
            Commands::Config {
                command: ConfigCommands::Validate,
            } => match self.config.validate() {
                Ok(()) => Ok(match &self.config_path {
                    Some(path) => format!("Configuration {} is valid", path.display()),
                    None => "Configuration is valid".to_string(),
                }),
                Err(errors) => {
                    let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                    Err(ApiError::ConfigError(format!(
                        "Configuration validation failed:\n{}",
                        error_msgs.join("\n")
                    )))
                }
            },
            other => Err(ApiError::ConfigError(format!(
                "Command '{}' needs a server connection",
                command_name(other)
            ))),
        }
    }
}

/// Read an export document. Files ending in `.json` are parsed as JSON,
/// everything else as YAML.
pub fn read_document(file: &Path) -> Result<Folder, ApiError> {
    let text = std::fs::read_to_string(file)?;
    let is_json = file
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        Ok(serde_json::from_str(&text)?)
    } else {
        Ok(serde_yaml::from_str(&text)?)
    }
}

//! CLI parse: clap types for vaultwalk. No behavior; definitions only.

use crate::vault::KvVersion;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vaultwalk - export and import KV secret trees
#[derive(Parser)]
#[command(name = "vaultwalk")]
#[command(about = "Export and import trees of secrets held in a Vault KV engine")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (where config/config.toml is looked up)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Server address (overrides config and VAULT_ADDR)
    #[arg(long)]
    pub addr: Option<String>,

    /// KV engine mount point
    #[arg(long)]
    pub mount: Option<String>,

    /// KV engine version (1 or 2)
    #[arg(long)]
    pub kv_version: Option<KvVersion>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export the secrets below a path as a nested document
    Export {
        /// Mount-relative path to export (empty or "/" for the whole mount)
        #[arg(default_value = "")]
        path: String,
        /// Read secret values; without it every leaf is exported as ""
        #[arg(long)]
        reveal: bool,
        /// Document format (yaml or json)
        #[arg(long, default_value = "yaml")]
        format: String,
        /// Write the document to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Write every secret of a document back to the store
    Import {
        /// YAML or JSON document (".json" files are read as JSON)
        file: PathBuf,
        /// Path prefix the document is written below
        #[arg(long, default_value = "")]
        base: String,
    },
    /// Secrets engine commands
    Engine {
        #[command(subcommand)]
        command: EngineCommands,
    },
    /// Auth method commands
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Userpass user commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Show server health
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Inspect the effective configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum EngineCommands {
    /// Mount a KV secrets engine
    Enable {
        /// Mount point
        mount: String,
        /// KV engine version (1 or 2)
        #[arg(long, default_value = "2")]
        version: KvVersion,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Enable an auth method at its default path
    Enable {
        /// Auth method type (e.g. userpass)
        kind: String,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a userpass user bound to an identity entity
    Create {
        /// User name
        name: String,
        /// Login password
        #[arg(long)]
        password: String,
        /// Policy attached to the user and its entity (repeatable)
        #[arg(long = "policy")]
        policies: Vec<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML (token redacted)
    Show,
    /// Validate the effective configuration
    Validate,
}

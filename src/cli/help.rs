//! CLI help and command-name contract used for logging and routing.

use crate::cli::parse::{AuthCommands, Commands, ConfigCommands, EngineCommands, UserCommands};

/// Command name string for log spans (e.g. "export", "engine.enable").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Export { .. } => "export".to_string(),
        Commands::Import { .. } => "import".to_string(),
        Commands::Engine { command } => format!("engine.{}", engine_command_name(command)),
        Commands::Auth { command } => format!("auth.{}", auth_command_name(command)),
        Commands::User { command } => format!("user.{}", user_command_name(command)),
        Commands::Status { .. } => "status".to_string(),
        Commands::Config { command } => format!("config.{}", config_command_name(command)),
    }
}

pub fn engine_command_name(command: &EngineCommands) -> &'static str {
    match command {
        EngineCommands::Enable { .. } => "enable",
    }
}

pub fn auth_command_name(command: &AuthCommands) -> &'static str {
    match command {
        AuthCommands::Enable { .. } => "enable",
    }
}

pub fn user_command_name(command: &UserCommands) -> &'static str {
    match command {
        UserCommands::Create { .. } => "create",
    }
}

pub fn config_command_name(command: &ConfigCommands) -> &'static str {
    match command {
        ConfigCommands::Show => "show",
        ConfigCommands::Validate => "validate",
    }
}

/// Whether the command talks to the server
pub fn requires_client(command: &Commands) -> bool {
    !matches!(command, Commands::Config { .. })
}

//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the API and client.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{AuthCommands, Cli, Commands, ConfigCommands, EngineCommands, UserCommands};
pub use presentation::{
    format_config_toml, format_export_document, format_health, format_import_report,
    format_user_provisioning,
};
pub use route::{read_document, ConnectionOverrides, RunContext};

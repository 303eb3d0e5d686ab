//! CLI presentation: text and json formatters per command family.

use crate::api::ImportReport;
use crate::config::VaultwalkConfig;
use crate::error::ApiError;
use crate::tree::Folder;
use crate::vault::{HealthStatus, UserProvisioning};
use owo_colors::OwoColorize;

const REDACTED_TOKEN: &str = "********";

/// Render an exported tree as a document in `format` (yaml or json)
pub fn format_export_document(folder: &Folder, format: &str) -> Result<String, ApiError> {
    match format {
        "yaml" | "yml" => Ok(serde_yaml::to_string(folder)?),
        "json" => Ok(serde_json::to_string_pretty(folder)?),
        other => Err(ApiError::ConfigError(format!(
            "Invalid export format: {} (must be 'yaml' or 'json')",
            other
        ))),
    }
}

pub fn format_import_report(report: &ImportReport) -> String {
    let mut s = format!("{}", "Import completed".bold());
    s.push_str(&format!("\n  Written: {}", report.written.len()));
    for path in &report.written {
        s.push_str(&format!("\n    {}", path));
    }
    if !report.skipped_redacted.is_empty() {
        s.push_str(&format!(
            "\n  {} {}",
            "Skipped (redacted):".yellow(),
            report.skipped_redacted.len()
        ));
        for path in &report.skipped_redacted {
            s.push_str(&format!("\n    {}", path));
        }
    }
    s
}

pub fn format_health(health: &HealthStatus, addr: &str, format: &str) -> Result<String, ApiError> {
    if format == "json" {
        return Ok(serde_json::to_string_pretty(health)?);
    }

    let sealed = if health.sealed {
        format!("{}", "yes".red())
    } else {
        format!("{}", "no".green())
    };
    let mut s = format!("{}", "Vault status".bold().underline());
    s.push_str(&format!("\n  Address:     {}", addr));
    s.push_str(&format!("\n  Version:     {}", health.version));
    s.push_str(&format!("\n  Initialized: {}", yes_no(health.initialized)));
    s.push_str(&format!("\n  Sealed:      {}", sealed));
    s.push_str(&format!("\n  Standby:     {}", yes_no(health.standby)));
    if let Some(cluster) = &health.cluster_name {
        s.push_str(&format!("\n  Cluster:     {}", cluster));
    }
    Ok(s)
}

pub fn format_user_provisioning(
    result: &UserProvisioning,
    format: &str,
) -> Result<String, ApiError> {
    if format == "json" {
        return Ok(serde_json::to_string_pretty(result)?);
    }
    let alias = if result.alias_created {
        "created"
    } else {
        "already present"
    };
    Ok(format!(
        "User '{}' provisioned\n  Entity ID: {}\n  Alias:     {}",
        result.username, result.entity_id, alias
    ))
}

/// Render the effective configuration as TOML with the token masked
pub fn format_config_toml(config: &VaultwalkConfig) -> Result<String, ApiError> {
    let mut shown = config.clone();
    if shown.vault.token.is_some() {
        shown.vault.token = Some(REDACTED_TOKEN.to_string());
    }
    toml::to_string_pretty(&shown).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

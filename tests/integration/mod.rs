//! Integration tests for vaultwalk export, import and provisioning

mod config_integration;
mod test_utils;
mod vault_client;

//! Layered configuration loading

use super::test_utils::with_isolated_env;
use tempfile::TempDir;
use vaultwalk::config::ConfigLoader;
use vaultwalk::vault::KvVersion;

fn write(path: &std::path::Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[test]
fn test_defaults_without_any_source() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    with_isolated_env(&test_dir, || {
        let config = ConfigLoader::load(workspace.path()).unwrap();
        assert_eq!(config.vault.addr, "http://127.0.0.1:8200");
        assert_eq!(config.vault.mount, "secret");
        assert_eq!(config.vault.kv_version, KvVersion::V2);
        assert!(config.vault.token.is_none());
        assert_eq!(config.logging.output, "stderr");
    });
}

#[test]
fn test_global_config_is_read_from_xdg_config_home() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    with_isolated_env(&test_dir, || {
        let global = test_dir.path().join("vaultwalk").join("config.toml");
        write(&global, "[vault]\nmount = \"global-kv\"\nkv_version = 1\n");

        assert_eq!(ConfigLoader::xdg_config_path(), Some(global));
        let config = ConfigLoader::load(workspace.path()).unwrap();
        assert_eq!(config.vault.mount, "global-kv");
        assert_eq!(config.vault.kv_version, KvVersion::V1);
    });
}

#[test]
fn test_workspace_and_env_files_override_global() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    with_isolated_env(&test_dir, || {
        write(
            &test_dir.path().join("vaultwalk").join("config.toml"),
            "[vault]\nmount = \"global-kv\"\ntimeout_secs = 90\n",
        );
        write(
            &workspace.path().join("config").join("config.toml"),
            "[vault]\nmount = \"workspace-kv\"\n",
        );
        write(
            &workspace.path().join("config").join("staging.toml"),
            "[vault]\naddr = \"https://staging.vault:8200\"\n",
        );
        std::env::set_var("VAULTWALK_ENV", "staging");

        let config = ConfigLoader::load(workspace.path()).unwrap();
        assert_eq!(config.vault.mount, "workspace-kv");
        assert_eq!(config.vault.addr, "https://staging.vault:8200");
        assert_eq!(config.vault.timeout_secs, 90);
    });
}

#[test]
fn test_environment_overrides_files() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    with_isolated_env(&test_dir, || {
        write(
            &workspace.path().join("config").join("config.toml"),
            "[vault]\naddr = \"https://file.vault:8200\"\nmount = \"file-kv\"\n",
        );
        std::env::set_var("VAULTWALK__VAULT__MOUNT", "env-kv");
        std::env::set_var("VAULTWALK__VAULT__TIMEOUT_SECS", "7");
        std::env::set_var("VAULT_ADDR", "https://env.vault:8200");
        std::env::set_var("VAULT_TOKEN", "s.from-env");
        std::env::set_var("VAULT_NAMESPACE", "ns1");

        let config = ConfigLoader::load(workspace.path()).unwrap();
        assert_eq!(config.vault.mount, "env-kv");
        assert_eq!(config.vault.timeout_secs, 7);
        assert_eq!(config.vault.addr, "https://env.vault:8200");
        assert_eq!(config.vault.token.as_deref(), Some("s.from-env"));
        assert_eq!(config.vault.namespace.as_deref(), Some("ns1"));
    });
}

#[test]
fn test_load_from_file_skips_workspace_files() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    with_isolated_env(&test_dir, || {
        write(
            &workspace.path().join("config").join("config.toml"),
            "[vault]\nmount = \"workspace-kv\"\n",
        );
        let explicit = workspace.path().join("explicit.toml");
        write(&explicit, "[vault]\nmount = \"explicit-kv\"\n");

        let config = ConfigLoader::load_from_file(&explicit).unwrap();
        assert_eq!(config.vault.mount, "explicit-kv");

        assert!(ConfigLoader::load_from_file(&workspace.path().join("absent.toml")).is_err());
    });
}

#[test]
fn test_invalid_kv_version_is_rejected() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    with_isolated_env(&test_dir, || {
        write(
            &workspace.path().join("config").join("config.toml"),
            "[vault]\nkv_version = 3\n",
        );
        assert!(ConfigLoader::load(workspace.path()).is_err());
    });
}

//! HTTP client behavior against a mock server
//!
//! The client is blocking, so it is created, used and dropped on a
//! blocking thread while the mock server runs on the test runtime.

use super::test_utils::fields;
use serde_json::json;
use vaultwalk::api;
use vaultwalk::config::VaultConfig;
use vaultwalk::error::{AccessError, ApiError};
use vaultwalk::secret::LeafPayload;
use vaultwalk::tree::Folder;
use vaultwalk::vault::{KvVersion, VaultClient};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "s.test-token";

fn config_for(server: &MockServer, mount: &str, kv_version: KvVersion) -> VaultConfig {
    VaultConfig {
        addr: server.uri(),
        token: Some(TOKEN.to_string()),
        mount: mount.to_string(),
        kv_version,
        timeout_secs: 5,
        ..VaultConfig::default()
    }
}

async fn with_client<F, R>(config: VaultConfig, f: F) -> R
where
    F: FnOnce(&VaultClient) -> R + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let client = VaultClient::new(&config).unwrap();
        f(&client)
    })
    .await
    .unwrap()
}

fn list_response(keys: &[&str]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": { "keys": keys } }))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_export_walks_kv2_mount() {
    let server = MockServer::start().await;
    Mock::given(method("LIST"))
        .and(path("/v1/secret/metadata/"))
        .and(header("X-Vault-Token", TOKEN))
        .respond_with(list_response(&["app/", "top"]))
        .mount(&server)
        .await;
    Mock::given(method("LIST"))
        .and(path("/v1/secret/metadata/app/"))
        .respond_with(list_response(&["db"]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/app/db"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "data": {"user": "u", "password": "p"},
                "metadata": {"version": 3}
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/top"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"data": {"nested": {"a": 1}}}
        })))
        .mount(&server)
        .await;

    let config = config_for(&server, "secret", KvVersion::V2);
    let tree = with_client(config, |client| api::export(client, "/", true))
        .await
        .unwrap();

    assert_eq!(
        tree.to_value(),
        json!({
            "app": {"db": {"user": "u", "password": "p"}},
            "top": {"json-object": r#"{"nested":{"a":1}}"#}
        })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_redacted_export_sends_no_reads() {
    let server = MockServer::start().await;
    Mock::given(method("LIST"))
        .and(path("/v1/kv/team/"))
        .respond_with(list_response(&["a", "b"]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_for(&server, "kv", KvVersion::V1);
    let tree = with_client(config, |client| api::export(client, "team", false))
        .await
        .unwrap();

    assert_eq!(tree.to_value(), json!({"team": {"a": "", "b": ""}}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_path_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("LIST"))
        .and(path("/v1/secret/metadata/missing/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errors": []})))
        .mount(&server)
        .await;

    let config = config_for(&server, "secret", KvVersion::V2);
    let err = with_client(config, |client| api::export(client, "missing", true))
        .await
        .unwrap_err();

    match err {
        ApiError::Access(AccessError::NotFound { path }) => assert_eq!(path, "missing/"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_kv1_import_writes_flat_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/kv/app/db"))
        .and(header("X-Vault-Token", TOKEN))
        .and(body_json(json!({"user": "u"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let tree = Folder::from_value(json!({"app": {"db": {"user": "u"}}})).unwrap();
    let config = config_for(&server, "kv", KvVersion::V1);
    let report = with_client(config, move |client| api::import(client, &tree, ""))
        .await
        .unwrap();

    assert_eq!(report.written, vec!["app/db"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_kv2_import_wraps_raw_object_under_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/restore/cfg"))
        .and(body_json(json!({"data": {"list": [1, 2]}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"version": 1}})))
        .expect(1)
        .mount(&server)
        .await;

    let tree = Folder::from_value(json!({"cfg": {"json-object": r#"{"list":[1,2]}"#}})).unwrap();
    let config = config_for(&server, "secret", KvVersion::V2);
    with_client(config, move |client| api::import(client, &tree, "restore"))
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_import_aggregates_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/a"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/b"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"errors": ["permission denied"]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/c"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let tree = Folder::from_value(json!({
        "a": {"k": "1"},
        "b": {"k": "2"},
        "c": {"k": "3"}
    }))
    .unwrap();
    let config = config_for(&server, "secret", KvVersion::V2);
    let err = with_client(config, move |client| api::import(client, &tree, ""))
        .await
        .unwrap_err();

    match err {
        ApiError::PartialWriteFailure {
            attempted,
            failures,
        } => {
            assert_eq!(attempted, 3);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].path, "b");
            assert!(failures[0].error.to_string().contains("permission denied"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_namespace_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/x"))
        .and(header("X-Vault-Namespace", "team-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"data": {"k": "v"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server, "secret", KvVersion::V2);
    config.namespace = Some("team-a".to_string());
    let secret = with_client(config, |client| {
        use vaultwalk::accessor::RemoteAccessor;
        client.read_leaf("x", true)
    })
    .await
    .unwrap();

    assert_eq!(secret.payload(), Some(&fields(json!({"k": "v"}))));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_enable_secrets_engine_and_auth_method() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/sys/mounts/team-kv"))
        .and(body_json(json!({"type": "kv", "options": {"version": "1"}})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/sys/auth/userpass"))
        .and(body_json(json!({"type": "userpass"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, "secret", KvVersion::V2);
    with_client(config, |client| {
        client.enable_secrets_engine("team-kv/", KvVersion::V1)?;
        client.enable_auth_method("userpass")
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_user_binds_entity_alias() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/userpass/users/alice"))
        .and(body_json(json!({"password": "pw", "token_policies": "dev,ops"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/identity/entity"))
        .and(body_json(json!({"name": "alice", "policies": ["dev", "ops"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "ent-1", "aliases": null}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/identity/entity/name/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "ent-1", "name": "alice", "aliases": []}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/sys/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"userpass/": {"type": "userpass", "accessor": "auth_userpass_42"}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/identity/entity-alias"))
        .and(body_json(json!({
            "name": "alice",
            "canonical_id": "ent-1",
            "mount_accessor": "auth_userpass_42"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "alias-1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, "secret", KvVersion::V2);
    let policies = vec!["dev".to_string(), "ops".to_string()];
    let result = with_client(config, move |client| client.create_user("alice", "pw", &policies))
        .await
        .unwrap();

    assert_eq!(result.entity_id, "ent-1");
    assert!(result.alias_created);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_user_reuses_existing_alias() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/userpass/users/bob"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/identity/entity"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/identity/entity/name/bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "ent-7",
                "aliases": [{"name": "bob", "mount_accessor": "auth_userpass_1"}]
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/sys/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userpass/": {"accessor": "auth_userpass_1"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/identity/entity-alias"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_for(&server, "secret", KvVersion::V2);
    let result = with_client(config, |client| client.create_user("bob", "pw", &[]))
        .await
        .unwrap();

    assert_eq!(result.entity_id, "ent-7");
    assert!(!result.alias_created);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_health_reports_seal_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/sys/health"))
        .and(query_param("standbyok", "true"))
        .and(query_param("sealedcode", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "initialized": true,
            "sealed": true,
            "standby": false,
            "version": "1.15.2",
            "cluster_name": "vault-cluster-1"
        })))
        .mount(&server)
        .await;

    let config = config_for(&server, "secret", KvVersion::V2);
    let health = with_client(config, |client| client.health()).await.unwrap();

    assert!(health.initialized);
    assert!(health.sealed);
    assert_eq!(health.version, "1.15.2");
}

#[test]
fn test_raw_payload_round_trips_through_document() {
    let payload = LeafPayload::RawObject(r#"{"a":[1]}"#.to_string());
    let tree = Folder::from_value(json!({"x": payload.to_value()})).unwrap();
    assert_eq!(tree.leaf("x").and_then(|s| s.payload()), Some(&payload));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_keys_with_url_characters_are_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("LIST"))
        .and(path("/v1/secret/metadata/"))
        .respond_with(list_response(&["odd?key#1"]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/odd%3Fkey%231"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"data": {"v": "1"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, "secret", KvVersion::V2);
    let tree = with_client(config, |client| api::export(client, "", true))
        .await
        .unwrap();

    assert_eq!(tree.to_value(), json!({"odd?key#1": {"v": "1"}}));
}

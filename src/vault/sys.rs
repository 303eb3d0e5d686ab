//! Engine, auth method and identity provisioning calls.
//!
//! One-shot API calls with no state of their own; each either succeeds or
//! returns the failing API path in its error.

use super::{decode_json, Body, KvVersion, VaultClient};
use crate::error::AccessError;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument};

const USERPASS_MOUNT: &str = "userpass";

/// Server health as reported by `sys/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub initialized: bool,
    pub sealed: bool,
    #[serde(default)]
    pub standby: bool,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub cluster_name: Option<String>,
}

/// Result of provisioning a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProvisioning {
    pub username: String,
    /// Identity entity id the user is bound to
    pub entity_id: String,
    /// False when the alias already existed
    pub alias_created: bool,
}

#[derive(Deserialize)]
struct EntityResponse {
    data: EntityData,
}

#[derive(Deserialize)]
struct EntityData {
    id: String,
    #[serde(default)]
    aliases: Option<Vec<EntityAlias>>,
}

#[derive(Deserialize)]
struct EntityAlias {
    name: String,
    mount_accessor: String,
}

impl VaultClient {
    /// Mount a KV secrets engine at `mount`
    #[instrument(skip(self))]
    pub fn enable_secrets_engine(&self, mount: &str, version: KvVersion) -> Result<(), AccessError> {
        let mount = mount.trim_matches('/');
        let body = json!({
            "type": "kv",
            "options": { "version": version.as_str() },
        });
        self.send(
            Method::POST,
            &format!("sys/mounts/{}", mount),
            mount,
            Some(Body::Json(body)),
        )?;
        info!(mount, version = %version, "Secrets engine enabled");
        Ok(())
    }

    /// Enable an auth method at its default path (`kind`)
    #[instrument(skip(self))]
    pub fn enable_auth_method(&self, kind: &str) -> Result<(), AccessError> {
        let kind = kind.trim_matches('/');
        self.send(
            Method::POST,
            &format!("sys/auth/{}", kind),
            kind,
            Some(Body::Json(json!({ "type": kind }))),
        )?;
        info!(kind, "Auth method enabled");
        Ok(())
    }

    /// Create a userpass user and bind it to an identity entity carrying the
    /// same policies. Returns the entity id.
    ///
    /// Re-running for an existing user updates its password and policies and
    /// reuses the entity and alias.
    #[instrument(skip(self, password))]
    pub fn create_user(
        &self,
        name: &str,
        password: &str,
        policies: &[String],
    ) -> Result<UserProvisioning, AccessError> {
        let user_path = format!("auth/{}/users/{}", USERPASS_MOUNT, name);
        self.send(
            Method::POST,
            &user_path,
            &user_path,
            Some(Body::Json(json!({
                "password": password,
                "token_policies": policies.join(","),
            }))),
        )?;
        info!(user = name, "Userpass user written");

        self.send(
            Method::POST,
            "identity/entity",
            "identity/entity",
            Some(Body::Json(json!({ "name": name, "policies": policies }))),
        )?;
        let entity_path = format!("identity/entity/name/{}", name);
        let entity: EntityResponse =
            self.send_json(Method::GET, &entity_path, &entity_path, None)?;
        let entity = entity.data;

        let accessor = self.auth_mount_accessor(USERPASS_MOUNT)?;
        let bound = entity
            .aliases
            .unwrap_or_default()
            .iter()
            .any(|alias| alias.name == name && alias.mount_accessor == accessor);

        if !bound {
            self.send(
                Method::POST,
                "identity/entity-alias",
                "identity/entity-alias",
                Some(Body::Json(json!({
                    "name": name,
                    "canonical_id": entity.id,
                    "mount_accessor": accessor,
                }))),
            )?;
        }
        info!(user = name, entity_id = %entity.id, alias_created = !bound, "User provisioned");

        Ok(UserProvisioning {
            username: name.to_string(),
            entity_id: entity.id,
            alias_created: !bound,
        })
    }

    /// Accessor of the auth mount at `path` (without trailing separator)
    fn auth_mount_accessor(&self, path: &str) -> Result<String, AccessError> {
        let response: Value = self.send_json(Method::GET, "sys/auth", "sys/auth", None)?;
        let key = format!("{}/", path);
        // Newer servers nest mounts under `data`, older ones list them at the top
        response
            .get("data")
            .and_then(|data| data.get(&key))
            .or_else(|| response.get(&key))
            .and_then(|mount| mount.get("accessor"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AccessError::NotFound {
                path: format!("sys/auth/{}", path),
            })
    }

    /// Query server health without failing on sealed or standby nodes
    pub fn health(&self) -> Result<HealthStatus, AccessError> {
        let mut url = self.url("sys/health", "sys/health")?;
        url.query_pairs_mut().extend_pairs([
            ("standbyok", "true"),
            ("sealedcode", "200"),
            ("uninitcode", "200"),
        ]);
        let response = self.send_url(Method::GET, url, "sys/health", None)?;
        decode_json("sys/health", response)
    }
}

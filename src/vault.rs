//! Vault HTTP Client
//!
//! Blocking client for the secrets store's HTTP API. Implements
//! [`RemoteAccessor`] over a KV engine mount and exposes the sys and identity
//! calls used for provisioning (see `sys`).

use crate::accessor::{RemoteAccessor, RemoteEntry};
use crate::config::VaultConfig;
use crate::error::{AccessError, ApiError};
use crate::secret::{FieldMap, LeafPayload, LeafSecret};
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub mod shape;
mod sys;

pub use shape::{shape_write, KvVersion, WriteRequest};
pub use sys::{HealthStatus, UserProvisioning};

const VAULT_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request body variants
pub(crate) enum Body {
    Json(Value),
    /// Pre-serialized JSON sent verbatim
    Raw(String),
}

/// Client bound to one server, token and KV mount
pub struct VaultClient {
    client: Client,
    addr: String,
    token: String,
    namespace: Option<String>,
    mount: String,
    kv_version: KvVersion,
}

impl VaultClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// `ConfigError` when no token is configured, the CA bundle cannot be
    /// read, or the HTTP client cannot be created.
    pub fn new(config: &VaultConfig) -> Result<Self, ApiError> {
        let token = config.token.clone().filter(|t| !t.is_empty()).ok_or_else(|| {
            ApiError::ConfigError(
                "No Vault token configured: set VAULT_TOKEN or vault.token".to_string(),
            )
        })?;

        let mut builder = Client::builder()
            .connect_timeout(VAULT_HTTP_CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(config.timeout_secs));
        if let Some(path) = &config.ca_bundle {
            let pem = std::fs::read(path).map_err(|e| {
                ApiError::ConfigError(format!("Failed to read CA bundle {:?}: {}", path, e))
            })?;
            let cert = reqwest::Certificate::from_pem(&pem)
                .or_else(|_| reqwest::Certificate::from_der(&pem))
                .map_err(|e| ApiError::ConfigError(format!("Invalid CA bundle: {}", e)))?;
            builder = builder.add_root_certificate(cert);
        }
        if config.insecure_skip_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            addr: config.addr.trim_end_matches('/').to_string(),
            token,
            namespace: config.namespace.clone().filter(|ns| !ns.is_empty()),
            mount: config.mount.trim_matches('/').to_string(),
            kv_version: config.kv_version,
        })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn kv_version(&self) -> KvVersion {
        self.kv_version
    }

    /// URL of `v1/<api_path>` on the server. Each path segment is
    /// percent-encoded, so store keys cannot alter the query or fragment.
    pub(crate) fn url(&self, api_path: &str, path: &str) -> Result<Url, AccessError> {
        let invalid = |detail: String| {
            AccessError::transport(path, format!("Invalid server address {}: {}", self.addr, detail))
        };
        let mut url = Url::parse(&self.addr).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base URL".to_string()))?
            .pop_if_empty()
            .push("v1")
            .extend(api_path.trim_start_matches('/').split('/'));
        Ok(url)
    }

    /// Send a request to `v1/<api_path>` and return the response when its
    /// status is a success. `path` is the store path reported in errors.
    pub(crate) fn send(
        &self,
        method: Method,
        api_path: &str,
        path: &str,
        body: Option<Body>,
    ) -> Result<Response, AccessError> {
        let url = self.url(api_path, path)?;
        self.send_url(method, url, path, body)
    }

    pub(crate) fn send_url(
        &self,
        method: Method,
        url: Url,
        path: &str,
        body: Option<Body>,
    ) -> Result<Response, AccessError> {
        debug!(method = %method, url = %url, "Vault request");

        let mut request = self
            .client
            .request(method, url)
            .header("X-Vault-Token", &self.token);
        if let Some(namespace) = &self.namespace {
            request = request.header("X-Vault-Namespace", namespace);
        }
        request = match body {
            Some(Body::Json(value)) => request.json(&value),
            Some(Body::Raw(raw)) => request.header(CONTENT_TYPE, "application/json").body(raw),
            None => request,
        };

        let response = request.send().map_err(|e| map_http_error(path, e))?;
        check_status(path, response)
    }

    /// Send a request and decode the JSON response
    pub(crate) fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        api_path: &str,
        path: &str,
        body: Option<Body>,
    ) -> Result<T, AccessError> {
        let response = self.send(method, api_path, path, body)?;
        decode_json(path, response)
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(
    path: &str,
    response: Response,
) -> Result<T, AccessError> {
    response
        .json()
        .map_err(|e| AccessError::malformed(path, format!("Failed to parse response: {}", e)))
}

impl RemoteAccessor for VaultClient {
    fn list(&self, path: &str) -> Result<Vec<RemoteEntry>, AccessError> {
        #[derive(Deserialize)]
        struct ListResponse {
            data: ListData,
        }
        #[derive(Deserialize)]
        struct ListData {
            #[serde(default)]
            keys: Vec<String>,
        }

        let api_path = shape::list_path(self.kv_version, &self.mount, path);
        let list_method = Method::from_bytes(b"LIST")
            .map_err(|e| AccessError::transport(path, e.to_string()))?;
        let response: ListResponse = self.send_json(list_method, &api_path, path, None)?;

        Ok(response
            .data
            .keys
            .iter()
            .map(|key| RemoteEntry::from_key(key))
            .collect())
    }

    fn read_leaf(&self, path: &str, reveal: bool) -> Result<LeafSecret, AccessError> {
        if !reveal {
            return Ok(LeafSecret::Redacted);
        }

        let api_path = shape::data_path(self.kv_version, &self.mount, path);
        let response: Value = self.send_json(Method::GET, &api_path, path, None)?;
        let data = match self.kv_version {
            KvVersion::V1 => response.get("data"),
            KvVersion::V2 => response.get("data").and_then(|d| d.get("data")),
        };

        match data {
            Some(Value::Object(fields)) => {
                Ok(LeafPayload::from_store_data(fields.clone()).into())
            }
            // Deleted or destroyed kv2 versions read back as null data
            Some(Value::Null) => Ok(LeafPayload::FieldMap(FieldMap::new()).into()),
            _ => Err(AccessError::malformed(path, "Response has no secret data")),
        }
    }

    fn write_leaf(&self, path: &str, payload: &LeafPayload) -> Result<(), AccessError> {
        let request = shape::shape_write(self.kv_version, &self.mount, path, payload);
        self.send(
            Method::POST,
            &request.api_path,
            path,
            Some(Body::Raw(request.body)),
        )?;
        Ok(())
    }
}

fn check_status(path: &str, response: Response) -> Result<Response, AccessError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(AccessError::NotFound {
            path: path.to_string(),
        });
    }
    let body = response
        .text()
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(AccessError::transport(
        path,
        format!("Request failed with status {}: {}", status, error_summary(&body)),
    ))
}

/// Pull the `errors` array out of a Vault error body when present
fn error_summary(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        errors: Vec<String>,
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed.errors.join("; "),
        _ => body.trim().to_string(),
    }
}

fn map_http_error(path: &str, error: reqwest::Error) -> AccessError {
    let message = if error.is_timeout() {
        format!("Request timeout: {}", error)
    } else if error.is_connect() {
        format!("Connection error: {}", error)
    } else {
        format!("HTTP error: {}", error)
    };
    AccessError::transport(path, message)
}

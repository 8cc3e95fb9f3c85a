//! Fastly Management API
//!
//! Implements CdnApi over Fastly's JSON/HTTP management API.
//!
//! See: https://developer.fastly.com/reference/api/

use crate::domain::entities::{BackendSpec, RemoteBackend, RemoteService};
use crate::domain::errors::ReconcileError;
use crate::domain::ports::{CdnApi, ClientFactory};
use crate::domain::value_objects::AuthContext;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "https://api.fastly.com";

const API_KEY_HEADER: &str = "fastly-key";

/// Service entry from `GET /service`.
#[derive(Debug, Deserialize)]
struct ServiceRecord {
    id: String,
    name: String,
    /// Latest version number
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    versions: Vec<VersionRecord>,
}

#[derive(Debug, Deserialize)]
struct VersionRecord {
    number: u32,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    detail: Option<String>,
}

impl ServiceRecord {
    /// `None` when the record carries neither `version` nor `versions`.
    fn into_service(self) -> Option<RemoteService> {
        let latest = self
            .version
            .or_else(|| self.versions.iter().map(|v| v.number).max())?;

        Some(RemoteService {
            id: self.id,
            name: self.name,
            latest_version: latest,
        })
    }
}

/// Configuration for the Fastly client.
#[derive(Debug, Clone)]
pub struct FastlyConfig {
    /// Base URL of the management API (e.g., "https://api.fastly.com")
    pub api_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FastlyConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Fastly API handle bound to one credential.
///
/// API keys travel in the `Fastly-Key` header, username/password as HTTP
/// basic auth. Construction performs no network I/O.
pub struct FastlyApi {
    base_url: String,
    client: reqwest::Client,
    auth: AuthContext,
}

impl FastlyApi {
    pub fn new(config: &FastlyConfig, auth: AuthContext) -> Result<Self, ReconcileError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let AuthContext::ApiKey(key) = &auth {
            let mut value = HeaderValue::from_str(key).map_err(|_| {
                ReconcileError::configuration("api_key contains characters not allowed in a header")
            })?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ReconcileError::configuration(format!("http client: {}", e)))?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client,
            auth,
        })
    }

    fn backends_path(service_id: &str, version: u32) -> String {
        format!(
            "/service/{}/version/{}/backend",
            urlencoding::encode(service_id),
            version
        )
    }

    fn backend_path(service_id: &str, version: u32, name: &str) -> String {
        format!(
            "{}/{}",
            Self::backends_path(service_id, version),
            urlencoding::encode(name)
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));

        match &self.auth {
            AuthContext::Credentials { username, password } => {
                builder.basic_auth(username, Some(password))
            }
            AuthContext::ApiKey(_) => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ReconcileError> {
        let response = request.send().await.map_err(|e| {
            ReconcileError::remote(e.status().map(|s| s.as_u16()), e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReconcileError::remote(
                Some(status.as_u16()),
                Self::error_message(status, &body),
            ));
        }

        response.json::<T>().await.map_err(|e| {
            ReconcileError::remote(Some(status.as_u16()), format!("invalid response body: {}", e))
        })
    }

    /// Best human-readable message for a failed call.
    fn error_message(status: StatusCode, body: &str) -> String {
        if let Ok(err) = serde_json::from_str::<ErrorBody>(body) {
            match (err.msg, err.detail) {
                (Some(msg), Some(detail)) if !detail.is_empty() => {
                    return format!("{}: {}", msg, detail)
                }
                (Some(msg), _) => return msg,
                (None, Some(detail)) => return detail,
                (None, None) => {}
            }
        }

        let trimmed = body.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }

        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    }
}

#[async_trait]
impl CdnApi for FastlyApi {
    async fn list_services(&self) -> Result<Vec<RemoteService>, ReconcileError> {
        let records: Vec<ServiceRecord> = self.send(self.request(Method::GET, "/service")).await?;

        let services = records
            .into_iter()
            .filter_map(|record| {
                let (id, name) = (record.id.clone(), record.name.clone());
                let service = record.into_service();
                if service.is_none() {
                    warn!("skipping service {} ({}): no version reported", name, id);
                }
                service
            })
            .collect();
        Ok(services)
    }

    async fn list_backends(
        &self,
        service_id: &str,
        version: u32,
    ) -> Result<Vec<RemoteBackend>, ReconcileError> {
        let path = Self::backends_path(service_id, version);
        self.send(self.request(Method::GET, &path)).await
    }

    async fn create_backend(
        &self,
        service_id: &str,
        version: u32,
        spec: &BackendSpec,
    ) -> Result<RemoteBackend, ReconcileError> {
        let path = Self::backends_path(service_id, version);
        self.send(self.request(Method::POST, &path).json(spec)).await
    }

    async fn update_backend(
        &self,
        service_id: &str,
        version: u32,
        backend_name: &str,
        spec: &BackendSpec,
    ) -> Result<RemoteBackend, ReconcileError> {
        let path = Self::backend_path(service_id, version, backend_name);
        self.send(self.request(Method::PUT, &path).json(spec)).await
    }
}

/// Builds [`FastlyApi`] handles from resolved credentials.
#[derive(Debug, Clone, Default)]
pub struct FastlyClientFactory {
    config: FastlyConfig,
}

impl FastlyClientFactory {
    pub fn new(config: FastlyConfig) -> Self {
        Self { config }
    }
}

impl ClientFactory for FastlyClientFactory {
    fn build(&self, auth: &AuthContext) -> Result<Arc<dyn CdnApi>, ReconcileError> {
        Ok(Arc::new(FastlyApi::new(&self.config, auth.clone())?))
    }
}

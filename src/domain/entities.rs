//! Domain Entities - Core business objects
//!
//! These entities describe the backend we want and the records the remote
//! CDN platform hands back. They carry no I/O and no remote client state.

use serde::{Deserialize, Serialize};

/// Something the remote platform identifies by name.
///
/// Services and backends are both looked up by exact name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Backend attributes that are forwarded verbatim to the remote platform.
///
/// Only `name` and `address` take part in identity; everything here is
/// opaque to reconciliation. Unknown keys survive in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_ssl: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_cert_hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_byte_timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub between_bytes_timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_conn: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_loadbalance: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shield: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Any other attribute, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Declarative description of one backend.
///
/// Built once per reconciliation from caller configuration and never
/// mutated while the reconciliation runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesiredBackend {
    /// Identity of the backend, also the default address
    pub name: String,
    /// Origin hostname or IP; falls back to `name` when unset
    pub address: Option<String>,
    /// Name of the remote CDN service that holds the backend
    pub service: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_key: Option<String>,
    /// Pass-through attributes
    #[serde(default)]
    pub attributes: BackendAttributes,
}

impl DesiredBackend {
    pub fn new(name: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            service: service.into(),
            ..Default::default()
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_attributes(mut self, attributes: BackendAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Address to push to the remote, defaulting to the backend name.
    pub fn effective_address(&self) -> &str {
        match self.address.as_deref() {
            Some(addr) if !addr.is_empty() => addr,
            _ => &self.name,
        }
    }

    /// Full attribute set sent on create and update.
    pub fn to_spec(&self) -> BackendSpec {
        BackendSpec {
            name: self.name.clone(),
            address: self.effective_address().to_string(),
            attributes: self.attributes.clone(),
        }
    }
}

/// Request body for backend create/update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSpec {
    pub name: String,
    pub address: String,
    #[serde(flatten)]
    pub attributes: BackendAttributes,
}

/// A CDN service as reported by the remote platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteService {
    pub id: String,
    pub name: String,
    /// Latest configuration version, advanced only by the remote platform
    pub latest_version: u32,
}

impl Named for RemoteService {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A backend as it exists on the remote platform at one service version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteBackend {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(flatten)]
    pub attributes: BackendAttributes,
}

impl RemoteBackend {
    /// Build the record the remote would hold after accepting `spec`.
    pub fn from_spec(spec: BackendSpec, service_id: &str, version: u32) -> Self {
        Self {
            name: spec.name,
            address: spec.address,
            service_id: Some(service_id.to_string()),
            version: Some(version),
            attributes: spec.attributes,
        }
    }
}

impl Named for RemoteBackend {
    fn name(&self) -> &str {
        &self.name
    }
}

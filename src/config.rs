//! Configuration
//!
//! Loads the reconciler settings and the desired backend from `CDN_*`
//! environment variables.

use crate::adapters::outbound::{FastlyConfig, DEFAULT_API_URL};
use crate::domain::entities::{BackendAttributes, DesiredBackend};
use anyhow::bail;
use std::str::FromStr;

/// What the binary does with the desired backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create or update the backend
    Reconcile,
    /// Only look it up
    Find,
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reconcile" => Ok(Self::Reconcile),
            "find" => Ok(Self::Find),
            _ => bail!("CDN_ACTION must be 'reconcile' or 'find', got '{}'", s),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Remote API settings
    pub api_url: String,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,

    // Desired backend
    pub service: Option<String>,
    pub backend_name: Option<String>,
    pub backend_address: Option<String>,
    pub backend_port: Option<u16>,
    pub backend_use_ssl: Option<bool>,
    pub backend_ssl_hostname: Option<String>,
    pub backend_weight: Option<u32>,
    pub backend_comment: Option<String>,

    pub action: Action,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            api_key: None,
            username: None,
            password: None,
            service: None,
            backend_name: None,
            backend_address: None,
            backend_port: None,
            backend_use_ssl: None,
            backend_ssl_hostname: None,
            backend_weight: None,
            backend_comment: None,
            action: Action::Reconcile,
            debug: false,
        }
    }
}

impl Config {
    pub fn fastly(&self) -> FastlyConfig {
        FastlyConfig {
            api_url: self.api_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Desired backend described by this configuration.
    ///
    /// Credentials are copied as given; whether they are usable is decided
    /// by the credential resolver.
    pub fn desired_backend(&self) -> anyhow::Result<DesiredBackend> {
        let Some(service) = self.service.clone().filter(|s| !s.is_empty()) else {
            bail!("CDN_SERVICE is required");
        };
        let Some(name) = self.backend_name.clone().filter(|s| !s.is_empty()) else {
            bail!("CDN_BACKEND_NAME is required");
        };

        let attributes = BackendAttributes {
            port: self.backend_port,
            use_ssl: self.backend_use_ssl,
            ssl_cert_hostname: self.backend_ssl_hostname.clone(),
            weight: self.backend_weight,
            comment: self.backend_comment.clone(),
            ..Default::default()
        };

        Ok(DesiredBackend {
            name,
            address: self.backend_address.clone(),
            service,
            username: self.username.clone(),
            password: self.password.clone(),
            api_key: self.api_key.clone(),
            attributes,
        })
    }
}

fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|v| v == "1" || v.to_lowercase() == "true")
}

pub fn load_config() -> anyhow::Result<Config> {
    let api_url = std::env::var("CDN_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

    let timeout_secs = std::env::var("CDN_TIMEOUT_SECS")
        .unwrap_or_else(|_| "30".to_string())
        .parse()
        .unwrap_or(30);

    let api_key = std::env::var("CDN_API_KEY").ok();
    let username = std::env::var("CDN_USERNAME").ok();
    let password = std::env::var("CDN_PASSWORD").ok();

    let service = std::env::var("CDN_SERVICE").ok();
    let backend_name = std::env::var("CDN_BACKEND_NAME").ok();
    let backend_address = std::env::var("CDN_BACKEND_ADDRESS").ok();

    let backend_port = std::env::var("CDN_BACKEND_PORT")
        .ok()
        .and_then(|v| v.parse().ok());

    let backend_use_ssl = env_flag("CDN_BACKEND_USE_SSL");
    let backend_ssl_hostname = std::env::var("CDN_BACKEND_SSL_HOSTNAME").ok();

    let backend_weight = std::env::var("CDN_BACKEND_WEIGHT")
        .ok()
        .and_then(|v| v.parse().ok());

    let backend_comment = std::env::var("CDN_BACKEND_COMMENT").ok();

    let action = match std::env::var("CDN_ACTION") {
        Ok(v) => v.parse()?,
        Err(_) => Action::Reconcile,
    };

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        api_url,
        timeout_secs,
        api_key,
        username,
        password,
        service,
        backend_name,
        backend_address,
        backend_port,
        backend_use_ssl,
        backend_ssl_hostname,
        backend_weight,
        backend_comment,
        action,
        debug,
    })
}

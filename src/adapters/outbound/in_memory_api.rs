//! In-Memory CDN API
//!
//! Implements CdnApi over process-local state, for tests and callers that
//! must not touch the real platform.

use crate::domain::entities::{BackendSpec, RemoteBackend, RemoteService};
use crate::domain::errors::ReconcileError;
use crate::domain::ports::{CdnApi, ClientFactory};
use crate::domain::value_objects::AuthContext;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Number of calls of each kind an [`InMemoryCdnApi`] has served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list_services: usize,
    pub list_backends: usize,
    pub create_backend: usize,
    pub update_backend: usize,
}

#[derive(Default)]
struct Counters {
    list_services: AtomicUsize,
    list_backends: AtomicUsize,
    create_backend: AtomicUsize,
    update_backend: AtomicUsize,
}

/// Process-local stand-in for the CDN management API.
///
/// Backends are kept per (service id, version) in insertion order, so
/// listings are stable and duplicate names can be seeded on purpose.
#[derive(Default)]
pub struct InMemoryCdnApi {
    services: RwLock<Vec<RemoteService>>,
    backends: RwLock<HashMap<(String, u32), Vec<RemoteBackend>>>,
    counters: Counters,
}

impl InMemoryCdnApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service with an empty backend list at its latest version.
    pub fn add_service(&self, id: &str, name: &str, latest_version: u32) {
        self.services.write().push(RemoteService {
            id: id.to_string(),
            name: name.to_string(),
            latest_version,
        });
        self.backends
            .write()
            .entry((id.to_string(), latest_version))
            .or_default();
    }

    /// Append a backend record as-is, bypassing validation.
    pub fn seed_backend(&self, service_id: &str, version: u32, backend: RemoteBackend) {
        self.backends
            .write()
            .entry((service_id.to_string(), version))
            .or_default()
            .push(backend);
    }

    /// Snapshot of the backends stored at a service version.
    pub fn backends_at(&self, service_id: &str, version: u32) -> Vec<RemoteBackend> {
        self.backends
            .read()
            .get(&(service_id.to_string(), version))
            .cloned()
            .unwrap_or_default()
    }

    pub fn call_counts(&self) -> CallCounts {
        CallCounts {
            list_services: self.counters.list_services.load(Ordering::SeqCst),
            list_backends: self.counters.list_backends.load(Ordering::SeqCst),
            create_backend: self.counters.create_backend.load(Ordering::SeqCst),
            update_backend: self.counters.update_backend.load(Ordering::SeqCst),
        }
    }

    fn missing_version(service_id: &str, version: u32) -> ReconcileError {
        ReconcileError::remote(
            Some(404),
            format!("service {} has no version {}", service_id, version),
        )
    }
}

#[async_trait]
impl CdnApi for InMemoryCdnApi {
    async fn list_services(&self) -> Result<Vec<RemoteService>, ReconcileError> {
        self.counters.list_services.fetch_add(1, Ordering::SeqCst);
        Ok(self.services.read().clone())
    }

    async fn list_backends(
        &self,
        service_id: &str,
        version: u32,
    ) -> Result<Vec<RemoteBackend>, ReconcileError> {
        self.counters.list_backends.fetch_add(1, Ordering::SeqCst);
        self.backends
            .read()
            .get(&(service_id.to_string(), version))
            .cloned()
            .ok_or_else(|| Self::missing_version(service_id, version))
    }

    async fn create_backend(
        &self,
        service_id: &str,
        version: u32,
        spec: &BackendSpec,
    ) -> Result<RemoteBackend, ReconcileError> {
        self.counters.create_backend.fetch_add(1, Ordering::SeqCst);

        let mut backends = self.backends.write();
        let list = backends
            .get_mut(&(service_id.to_string(), version))
            .ok_or_else(|| Self::missing_version(service_id, version))?;

        let created = RemoteBackend::from_spec(spec.clone(), service_id, version);
        list.push(created.clone());
        Ok(created)
    }

    async fn update_backend(
        &self,
        service_id: &str,
        version: u32,
        backend_name: &str,
        spec: &BackendSpec,
    ) -> Result<RemoteBackend, ReconcileError> {
        self.counters.update_backend.fetch_add(1, Ordering::SeqCst);

        let mut backends = self.backends.write();
        let list = backends
            .get_mut(&(service_id.to_string(), version))
            .ok_or_else(|| Self::missing_version(service_id, version))?;

        let slot = list
            .iter_mut()
            .find(|b| b.name == backend_name)
            .ok_or_else(|| {
                ReconcileError::remote(Some(404), format!("backend {} not found", backend_name))
            })?;

        *slot = RemoteBackend::from_spec(spec.clone(), service_id, version);
        Ok(slot.clone())
    }
}

/// Hands out the same shared [`InMemoryCdnApi`] for every credential.
#[derive(Clone)]
pub struct InMemoryClientFactory {
    api: Arc<InMemoryCdnApi>,
}

impl InMemoryClientFactory {
    pub fn new(api: Arc<InMemoryCdnApi>) -> Self {
        Self { api }
    }
}

impl ClientFactory for InMemoryClientFactory {
    fn build(&self, _auth: &AuthContext) -> Result<Arc<dyn CdnApi>, ReconcileError> {
        Ok(self.api.clone())
    }
}

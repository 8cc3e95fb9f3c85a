//! CDN Management API Port
//!
//! Defines the remote calls reconciliation needs from the CDN platform.
//! Implementations may talk HTTP to the real platform or keep state in memory.

use crate::domain::entities::{BackendSpec, RemoteBackend, RemoteService};
use crate::domain::errors::ReconcileError;
use async_trait::async_trait;

/// Remote management API of the CDN platform.
///
/// This is an outbound port. Every call is a single request/response and
/// is atomic from the caller's point of view. Failures come back as
/// `ReconcileError::RemoteApi` and are never retried here.
#[async_trait]
pub trait CdnApi: Send + Sync {
    /// List every service visible to the authenticated principal.
    async fn list_services(&self) -> Result<Vec<RemoteService>, ReconcileError>;

    /// List the backends of a service at one version.
    async fn list_backends(
        &self,
        service_id: &str,
        version: u32,
    ) -> Result<Vec<RemoteBackend>, ReconcileError>;

    /// Create a backend at the given service version.
    async fn create_backend(
        &self,
        service_id: &str,
        version: u32,
        spec: &BackendSpec,
    ) -> Result<RemoteBackend, ReconcileError>;

    /// Overwrite the backend called `backend_name` with `spec`.
    async fn update_backend(
        &self,
        service_id: &str,
        version: u32,
        backend_name: &str,
        spec: &BackendSpec,
    ) -> Result<RemoteBackend, ReconcileError>;
}

//! Backend Reconciler - Main application use case
//!
//! Converges one backend on the CDN platform to its desired description:
//! resolve credentials, build a client, locate the service, then create or
//! update the backend by name.

use crate::application::ServiceLocator;
use crate::domain::entities::{DesiredBackend, RemoteBackend, RemoteService};
use crate::domain::errors::ReconcileError;
use crate::domain::ports::{CdnApi, ClientFactory};
use crate::domain::services::{CredentialResolver, NameMatcher};
use crate::domain::value_objects::AuthContext;
use std::sync::Arc;

/// Backend reconciler - primary entry point for callers.
///
/// Every call runs strictly in order: resolve credentials, list services,
/// list backends, then at most one create or update. Nothing is cached
/// between calls and nothing is retried.
///
/// Two reconcilers racing on the same backend name may both see it as
/// absent and both create it. Callers must serialize per name.
pub struct BackendReconciler {
    factory: Arc<dyn ClientFactory>,
}

impl BackendReconciler {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self { factory }
    }

    /// Resolve the credential `desired` would authenticate with.
    ///
    /// Lets callers validate configuration before any network I/O.
    pub fn resolve_auth(&self, desired: &DesiredBackend) -> Result<AuthContext, ReconcileError> {
        CredentialResolver::resolve(desired)
    }

    /// Build a remote client for the credential in `desired`.
    pub fn client_for(&self, desired: &DesiredBackend) -> Result<Arc<dyn CdnApi>, ReconcileError> {
        let auth = self.resolve_auth(desired)?;
        tracing::debug!("building remote client with {} auth", auth.kind());
        self.factory.build(&auth)
    }

    /// Look up the backend named `desired.name` without writing anything.
    pub async fn find(
        &self,
        desired: &DesiredBackend,
    ) -> Result<Option<RemoteBackend>, ReconcileError> {
        let client = self.client_for(desired)?;
        let service = ServiceLocator::locate(client.as_ref(), &desired.service).await?;
        Self::find_in(client.as_ref(), &service, desired).await
    }

    /// Create the backend if absent, otherwise re-push the full desired
    /// attribute set onto it.
    pub async fn reconcile(&self, desired: &DesiredBackend) -> Result<RemoteBackend, ReconcileError> {
        let client = self.client_for(desired)?;
        let service = ServiceLocator::locate(client.as_ref(), &desired.service).await?;
        Self::reconcile_in(client.as_ref(), &service, desired).await
    }

    /// Find a backend by name within an already located service.
    ///
    /// The backend list is fetched fresh at the service's latest version.
    /// Address plays no part in the match.
    pub async fn find_in(
        client: &dyn CdnApi,
        service: &RemoteService,
        desired: &DesiredBackend,
    ) -> Result<Option<RemoteBackend>, ReconcileError> {
        let backends = client
            .list_backends(&service.id, service.latest_version)
            .await?;

        let duplicates = NameMatcher::count(&backends, &desired.name);
        if duplicates > 1 {
            tracing::warn!(
                "{} backends named {} in service {} v{}, using the first listed",
                duplicates,
                desired.name,
                service.id,
                service.latest_version
            );
        }

        let found = NameMatcher::first(&backends, &desired.name).cloned();
        tracing::debug!(
            "backend {} {} in service {} v{}",
            desired.name,
            if found.is_some() { "found" } else { "absent" },
            service.id,
            service.latest_version
        );

        Ok(found)
    }

    /// Create or update within an already located service.
    ///
    /// The update path always writes: attributes outside the identity may
    /// have drifted remotely and are re-asserted on every run.
    pub async fn reconcile_in(
        client: &dyn CdnApi,
        service: &RemoteService,
        desired: &DesiredBackend,
    ) -> Result<RemoteBackend, ReconcileError> {
        let spec = desired.to_spec();

        match Self::find_in(client, service, desired).await? {
            None => {
                let created = client
                    .create_backend(&service.id, service.latest_version, &spec)
                    .await?;
                tracing::info!(
                    "created backend {} -> {} in service {} v{}",
                    created.name,
                    created.address,
                    service.id,
                    service.latest_version
                );
                Ok(created)
            }
            Some(existing) => {
                let updated = client
                    .update_backend(&service.id, service.latest_version, &existing.name, &spec)
                    .await?;
                tracing::info!(
                    "updated backend {} -> {} in service {} v{} (was {})",
                    updated.name,
                    updated.address,
                    service.id,
                    service.latest_version,
                    existing.address
                );
                Ok(updated)
            }
        }
    }
}

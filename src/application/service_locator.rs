//! Service Locator
//!
//! Finds the remote service a backend lives in, and its latest version.

use crate::domain::entities::RemoteService;
use crate::domain::errors::ReconcileError;
use crate::domain::ports::CdnApi;
use crate::domain::services::NameMatcher;

/// Locates a service by exact name among all services visible to the
/// client's credential.
///
/// Issues exactly one read (list services) and never writes. The version
/// returned is whatever the remote platform reports as latest.
pub struct ServiceLocator;

impl ServiceLocator {
    pub async fn locate(
        client: &dyn CdnApi,
        service_name: &str,
    ) -> Result<RemoteService, ReconcileError> {
        let services = client.list_services().await?;

        let duplicates = NameMatcher::count(&services, service_name);
        if duplicates > 1 {
            tracing::warn!(
                "{} services named {}, using the first listed",
                duplicates,
                service_name
            );
        }

        let service = NameMatcher::first(&services, service_name)
            .cloned()
            .ok_or_else(|| ReconcileError::ServiceNotFound {
                service: service_name.to_string(),
            })?;

        tracing::debug!(
            "located service {} id={} latest_version={}",
            service.name,
            service.id,
            service.latest_version
        );

        Ok(service)
    }
}

//! CDN backend reconciler library
//!
//! Converges a CDN backend (an origin mapping inside a CDN service) to a
//! declarative description through the platform's management API.
//!
//! Exposed as a library so callers and integration tests can drive the
//! reconciler with their own client factories.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use adapters::outbound::{
    FastlyClientFactory, FastlyConfig, InMemoryCdnApi, InMemoryClientFactory,
};
pub use application::{BackendReconciler, ServiceLocator};
pub use config::load_config;
pub use domain::entities::{
    BackendAttributes, BackendSpec, DesiredBackend, RemoteBackend, RemoteService,
};
pub use domain::errors::ReconcileError;
pub use domain::ports::{CdnApi, ClientFactory};
pub use domain::services::CredentialResolver;
pub use domain::value_objects::AuthContext;

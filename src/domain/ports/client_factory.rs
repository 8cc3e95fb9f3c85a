//! Client Factory Port
//!
//! Turns resolved credentials into a remote API handle.

use crate::domain::errors::ReconcileError;
use crate::domain::ports::CdnApi;
use crate::domain::value_objects::AuthContext;
use std::sync::Arc;

/// Builds a [`CdnApi`] handle bound to one credential.
///
/// Building must not touch the network. The handle may be reused for
/// every call of a single reconciliation.
pub trait ClientFactory: Send + Sync {
    fn build(&self, auth: &AuthContext) -> Result<Arc<dyn CdnApi>, ReconcileError>;
}

//! Reconciliation errors.

/// Errors surfaced by reconciliation.
///
/// Nothing here is retried by the crate itself. Callers decide based on
/// [`ReconcileError::is_retryable`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// Desired state is incomplete or contradictory.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No service with this name is visible to the credential.
    #[error("service not found: {service}")]
    ServiceNotFound { service: String },

    /// The remote platform rejected the call or could not be reached.
    #[error("remote API error{}: {message}", status_suffix(.status))]
    RemoteApi {
        status: Option<u16>,
        message: String,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" (status {})", code))
        .unwrap_or_default()
}

impl ReconcileError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RemoteApi {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of a remote failure, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteApi { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether re-running the same call might succeed.
    ///
    /// True for transport failures, rate limiting and server errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RemoteApi { status: None, .. } => true,
            Self::RemoteApi {
                status: Some(code), ..
            } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}

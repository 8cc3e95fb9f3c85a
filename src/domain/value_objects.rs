//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use std::fmt;

/// Authentication resolved for one reconciliation.
///
/// Exactly one credential shape is in play per invocation. The remote
/// client is bound to it for its whole lifetime.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Account username and password
    Credentials { username: String, password: String },
    /// API token
    ApiKey(String),
}

impl AuthContext {
    pub fn credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// Short label for logs; never includes secret material.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Credentials { .. } => "username/password",
            Self::ApiKey(_) => "api_key",
        }
    }
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credentials { username, .. } => f
                .debug_struct("Credentials")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"<redacted>").finish(),
        }
    }
}

impl fmt::Display for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

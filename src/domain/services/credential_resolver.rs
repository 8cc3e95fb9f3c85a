//! Credential Resolver
//!
//! Pure domain logic turning a desired backend into an auth context.

use crate::domain::entities::DesiredBackend;
use crate::domain::errors::ReconcileError;
use crate::domain::value_objects::AuthContext;

/// Resolves which credential a reconciliation authenticates with.
///
/// Precedence:
/// 1. username + password, when both are non-empty (api_key is ignored)
/// 2. api_key, when non-empty
/// 3. otherwise a configuration error
pub struct CredentialResolver;

impl CredentialResolver {
    pub fn resolve(desired: &DesiredBackend) -> Result<AuthContext, ReconcileError> {
        if let (Some(username), Some(password)) = (
            non_empty(desired.username.as_deref()),
            non_empty(desired.password.as_deref()),
        ) {
            return Ok(AuthContext::credentials(username, password));
        }

        if let Some(api_key) = non_empty(desired.api_key.as_deref()) {
            return Ok(AuthContext::api_key(api_key));
        }

        Err(ReconcileError::configuration("no usable credential supplied"))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desired() -> DesiredBackend {
        DesiredBackend::new("backend.domain.name", "service_name")
    }

    #[test]
    fn test_username_and_password() {
        let d = desired().with_credentials("an_username", "an_password");
        assert_eq!(
            CredentialResolver::resolve(&d).unwrap(),
            AuthContext::credentials("an_username", "an_password")
        );
    }

    #[test]
    fn test_api_key_only() {
        let d = desired().with_api_key("an_api_key");
        assert_eq!(
            CredentialResolver::resolve(&d).unwrap(),
            AuthContext::api_key("an_api_key")
        );
    }

    #[test]
    fn test_credentials_take_precedence_over_api_key() {
        let d = desired()
            .with_api_key("an_api_key")
            .with_credentials("an_username", "an_password");
        assert_eq!(
            CredentialResolver::resolve(&d).unwrap(),
            AuthContext::credentials("an_username", "an_password")
        );
    }

    #[test]
    fn test_nothing_set_is_configuration_error() {
        let err = CredentialResolver::resolve(&desired()).unwrap_err();
        assert!(matches!(err, ReconcileError::Configuration(_)));
    }

    #[test]
    fn test_username_without_password_falls_back_to_api_key() {
        let mut d = desired().with_api_key("an_api_key");
        d.username = Some("an_username".to_string());
        assert_eq!(
            CredentialResolver::resolve(&d).unwrap(),
            AuthContext::api_key("an_api_key")
        );
    }

    #[test]
    fn test_half_credentials_without_api_key_is_error() {
        let mut d = desired();
        d.password = Some("an_password".to_string());
        assert!(matches!(
            CredentialResolver::resolve(&d),
            Err(ReconcileError::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_strings_count_as_unset() {
        let d = desired().with_credentials("", "").with_api_key("");
        assert!(CredentialResolver::resolve(&d).is_err());

        let d = desired().with_credentials("", "pw").with_api_key("key");
        assert_eq!(
            CredentialResolver::resolve(&d).unwrap(),
            AuthContext::api_key("key")
        );
    }
}

mod credential_resolver;
mod name_matcher;

pub use credential_resolver::CredentialResolver;
pub use name_matcher::NameMatcher;

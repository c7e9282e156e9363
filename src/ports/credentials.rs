//! Credential port for the registry access token.

/// Supplies the registry token. Read-only and side-effect free.
pub trait TokenProvider: Send + Sync {
    /// Returns the token, or `None` when no credential is configured.
    fn token(&self) -> Option<String>;

    /// Names where the token is expected to come from (e.g. an env var).
    fn source(&self) -> &str;
}

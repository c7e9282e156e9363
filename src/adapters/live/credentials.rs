//! Token providers: environment-backed for real runs, fixed for replay.

use std::env;

use crate::ports::credentials::TokenProvider;

/// Reads the registry token from an environment variable on every call.
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    /// Creates a provider reading `var`.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl TokenProvider for EnvTokenProvider {
    fn token(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|v| !v.trim().is_empty())
    }

    fn source(&self) -> &str {
        &self.var
    }
}

/// Hands out a fixed token, or none.
pub struct StaticTokenProvider {
    token: Option<String>,
    source: String,
}

impl StaticTokenProvider {
    /// Creates a provider returning `token` and reporting `source` as its origin.
    pub fn new(token: Option<String>, source: impl Into<String>) -> Self {
        Self { token, source: source.into() }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }

    fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_provider_treats_unset_as_missing() {
        let provider = EnvTokenProvider::new("PROPAUDIT_TEST_TOKEN_THAT_IS_NEVER_SET");
        assert_eq!(provider.token(), None);
        assert_eq!(provider.source(), "PROPAUDIT_TEST_TOKEN_THAT_IS_NEVER_SET");
    }

    #[test]
    fn static_provider_returns_fixed_token() {
        let provider = StaticTokenProvider::new(Some("t0k".into()), "fixture");
        assert_eq!(provider.token().as_deref(), Some("t0k"));
        assert_eq!(provider.source(), "fixture");
    }
}

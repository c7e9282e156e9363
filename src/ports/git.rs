//! Git repository port for version-control queries.

/// Provides read access to the revision the schema is generated from.
///
/// Abstracting git access allows deterministic replay and testing
/// without requiring a real repository.
pub trait GitRepo: Send + Sync {
    /// Returns the hash of the current HEAD commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository has no commits or is invalid.
    fn current_commit(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

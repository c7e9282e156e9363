//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the audit core and an external
//! system (time, version control, filesystem, design registry, credentials).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod credentials;
pub mod filesystem;
pub mod git;
pub mod registry;

pub use clock::Clock;
pub use credentials::TokenProvider;
pub use filesystem::FileSystem;
pub use git::GitRepo;
pub use registry::{FetchFuture, RemoteRegistry};

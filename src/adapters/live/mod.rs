//! Live adapters for real external interactions.

pub mod clock;
pub mod credentials;
pub mod filesystem;
pub mod git;
pub mod registry;

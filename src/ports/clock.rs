//! Clock port behind the `generatedAt` field of a canonical schema.

use chrono::{DateTime, Utc};

/// Source of the generation timestamp.
///
/// Only the stamp reads it, so canonical output stays comparable across runs
/// when a fixed or replayed clock is plugged in.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

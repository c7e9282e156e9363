//! Cassettes: recorded port interactions for offline replay.
//!
//! A cassette is a YAML file listing every call made through a port during a
//! run, in order. Recording wraps live adapters; replaying serves the
//! recorded outputs back so commands can be exercised without a network or a
//! git checkout.

pub mod format;
pub mod recorder;
pub mod replayer;

//! Fakes shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::error::FetchError;
use crate::ports::{Clock, FetchFuture, GitRepo, RemoteRegistry};
use crate::registry::RemoteComponent;

/// Always `2025-01-02T03:04:05Z`.
pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }
}

/// A working tree that is not a git repository.
pub struct FailingGit;

impl GitRepo for FailingGit {
    fn current_commit(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Err("fatal: not a git repository".into())
    }
}

/// Registry that must never be called.
pub struct UnusedRegistry;

impl RemoteRegistry for UnusedRegistry {
    fn fetch_component<'a>(
        &'a self,
        file_key: &'a str,
        node_id: &'a str,
        _token: &'a str,
    ) -> FetchFuture<'a> {
        panic!("unexpected registry fetch for {file_key}/{node_id}");
    }
}

/// Registry returning one canned response and counting calls.
pub struct CannedRegistry {
    response: Result<RemoteComponent, FetchError>,
    calls: Arc<AtomicUsize>,
}

impl CannedRegistry {
    pub fn ok(remote: serde_json::Value) -> Self {
        Self::new(Ok(serde_json::from_value(remote).unwrap()))
    }

    pub fn new(response: Result<RemoteComponent, FetchError>) -> Self {
        Self { response, calls: Arc::new(AtomicUsize::new(0)) }
    }

    /// Calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared counter, for when the registry is moved into a context.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl RemoteRegistry for CannedRegistry {
    fn fetch_component<'a>(
        &'a self,
        _file_key: &'a str,
        _node_id: &'a str,
        _token: &'a str,
    ) -> FetchFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self.response.clone();
        Box::pin(async move { response })
    }
}

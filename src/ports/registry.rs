//! Design-registry port: the remote fetch capability.

use std::future::Future;
use std::pin::Pin;

use crate::error::FetchError;
use crate::registry::RemoteComponent;

/// Boxed future type alias used by [`RemoteRegistry`] to keep the trait dyn-compatible.
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RemoteComponent, FetchError>> + Send + 'a>>;

/// Fetches property definitions and layer references for one node.
///
/// Implementations own any timeout or retry policy; callers treat a fetch as
/// a single attempt that yields data, an HTTP error, a parse error, or a
/// transport error.
pub trait RemoteRegistry: Send + Sync {
    /// Fetches the component at `node_id` in file `file_key`.
    fn fetch_component<'a>(
        &'a self,
        file_key: &'a str,
        node_id: &'a str,
        token: &'a str,
    ) -> FetchFuture<'a>;
}

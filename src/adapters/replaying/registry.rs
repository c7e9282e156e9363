//! Replaying adapter for the `RemoteRegistry` port.

use std::sync::Mutex;

use super::next_output;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::FetchError;
use crate::ports::registry::{FetchFuture, RemoteRegistry};
use crate::registry::RemoteComponent;

/// Replays recorded registry fetches in call order.
pub struct ReplayingRegistry {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingRegistry {
    /// Creates a new replaying registry from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

fn decode(output: &serde_json::Value) -> Result<RemoteComponent, FetchError> {
    if let Some(err) = output.get("Err") {
        return Err(serde_json::from_value(err.clone()).unwrap_or_else(|e| {
            FetchError::parse(format!("registry::fetch_component: unreadable recorded error: {e}"))
        }));
    }
    let value = output.get("Ok").unwrap_or(output);
    serde_json::from_value(value.clone()).map_err(|e| {
        FetchError::parse(format!("registry::fetch_component: failed to deserialize: {e}"))
    })
}

impl RemoteRegistry for ReplayingRegistry {
    fn fetch_component<'a>(
        &'a self,
        _file_key: &'a str,
        _node_id: &'a str,
        _token: &'a str,
    ) -> FetchFuture<'a> {
        let output = next_output(&self.replayer, "registry", "fetch_component");
        Box::pin(async move { decode(&output) })
    }
}

//! Replaying adapters that replay recorded interactions.

pub mod clock;
pub mod git;
pub mod registry;

pub use clock::ReplayingClock;
pub use git::ReplayingGitRepo;
pub use registry::ReplayingRegistry;

use std::sync::Mutex;

use crate::cassette::replayer::CassetteReplayer;

/// Pop the next recorded output for `port::method`.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_interaction(port, method).output.clone()
}

/// Turn an `{"Ok": v}` / `{"Err": msg}` output back into a `Result`.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err) = output.get("Err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("Ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}

//! Recording adapter for the `RemoteRegistry` port.
//!
//! The token is never written to the cassette.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_interaction;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::registry::{FetchFuture, RemoteRegistry};

/// Records registry fetches while delegating to an inner implementation.
pub struct RecordingRegistry {
    inner: Box<dyn RemoteRegistry>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingRegistry {
    /// Creates a new recording registry wrapping the given implementation.
    pub fn new(inner: Box<dyn RemoteRegistry>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct FetchInput<'a> {
    file_key: &'a str,
    node_id: &'a str,
}

impl RemoteRegistry for RecordingRegistry {
    fn fetch_component<'a>(
        &'a self,
        file_key: &'a str,
        node_id: &'a str,
        token: &'a str,
    ) -> FetchFuture<'a> {
        Box::pin(async move {
            let result = self.inner.fetch_component(file_key, node_id, token).await;

            // Errors keep their structure so replay can re-classify them.
            let output = match &result {
                Ok(remote) => serde_json::json!({ "Ok": remote }),
                Err(err) => serde_json::json!({ "Err": err }),
            };
            let input = FetchInput { file_key, node_id };
            record_interaction(&self.recorder, "registry", "fetch_component", &input, &output);

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::registry::RemoteComponent;

    struct Forbidden;

    impl RemoteRegistry for Forbidden {
        fn fetch_component<'a>(
            &'a self,
            _file_key: &'a str,
            _node_id: &'a str,
            _token: &'a str,
        ) -> FetchFuture<'a> {
            Box::pin(async { Err(FetchError::Http { status: 403, body: "Invalid token".into() }) })
        }
    }

    struct Empty;

    impl RemoteRegistry for Empty {
        fn fetch_component<'a>(
            &'a self,
            _file_key: &'a str,
            _node_id: &'a str,
            _token: &'a str,
        ) -> FetchFuture<'a> {
            Box::pin(async { Ok(RemoteComponent::default()) })
        }
    }

    #[tokio::test]
    async fn records_fetches_without_token() {
        let dir = std::env::temp_dir().join("propaudit_rec_registry_test");
        let path = dir.join("registry.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "test", "abc")));

        {
            let denied = RecordingRegistry::new(Box::new(Forbidden), Arc::clone(&recorder));
            let err = denied.fetch_component("FILE", "1:2", "s3cret-token").await.unwrap_err();
            assert!(matches!(err, FetchError::Http { status: 403, .. }));

            let empty = RecordingRegistry::new(Box::new(Empty), Arc::clone(&recorder));
            assert!(empty.fetch_component("FILE", "3:4", "s3cret-token").await.is_ok());
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("fetch_component"));
        assert!(content.contains("Invalid token"));
        assert!(content.contains("3:4"));
        assert!(!content.contains("s3cret-token"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}

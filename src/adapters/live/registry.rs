//! Live adapter for the `RemoteRegistry` port using the registry REST API.

use std::time::Duration;

use reqwest::Client;

use crate::error::FetchError;
use crate::ports::registry::{FetchFuture, RemoteRegistry};
use crate::registry::parse_nodes_response;

/// Header carrying the personal access token.
const TOKEN_HEADER: &str = "X-Figma-Token";

/// Live registry client calling `GET /v1/files/{file_key}/nodes?ids={node_id}`.
pub struct LiveRegistry {
    client: Client,
    api_base: String,
}

impl LiveRegistry {
    /// Creates a client against `api_base` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error string if the HTTP client cannot be built.
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self { client, api_base: api_base.into() })
    }

    fn nodes_url(&self, file_key: &str) -> String {
        format!("{}/v1/files/{file_key}/nodes", self.api_base.trim_end_matches('/'))
    }
}

impl RemoteRegistry for LiveRegistry {
    fn fetch_component<'a>(
        &'a self,
        file_key: &'a str,
        node_id: &'a str,
        token: &'a str,
    ) -> FetchFuture<'a> {
        Box::pin(async move {
            // The query serializer percent-encodes the `:` in node ids.
            let response = self
                .client
                .get(self.nodes_url(file_key))
                .header(TOKEN_HEADER, token)
                .query(&[("ids", node_id)])
                .send()
                .await
                .map_err(|e| FetchError::transport(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| FetchError::transport(format!("failed to read response body: {e}")))?;

            if !status.is_success() {
                return Err(FetchError::Http { status: status.as_u16(), body });
            }

            parse_nodes_response(&body, node_id)
        })
    }
}

//! Transport seam between a connection and the wire

use crate::{ClusterResult, ConnectionInfo, SearchRequest, SearchResponse};

/// Executes search requests against a cluster
///
/// Implementations block until the exchange completes. Endpoints are tried
/// in the order the connection lists them.
pub trait Transport: Send + Sync {
    /// Execute one search and return the parsed response
    fn execute(&self, connection: &ConnectionInfo, request: &SearchRequest)
        -> ClusterResult<SearchResponse>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Transport that never touches the network
///
/// Logs each rendered request and answers with an empty response.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunTransport;

impl Transport for DryRunTransport {
    fn execute(
        &self,
        connection: &ConnectionInfo,
        request: &SearchRequest,
    ) -> ClusterResult<SearchResponse> {
        log::info!(
            "dry run: {} /{}/_search {}",
            connection,
            request.target(),
            request.to_body()
        );
        Ok(SearchResponse::default())
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}

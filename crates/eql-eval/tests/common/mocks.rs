//! Mock transports for testing

use eql_cluster::{
    ClusterError, ClusterResult, ConnectionInfo, SearchRequest, SearchResponse, Transport,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// One `execute` call as the transport saw it
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub connection: ConnectionInfo,
    pub request: SearchRequest,
}

/// Transport that records requests and replies with a canned result
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    reply: Mutex<ClusterResult<SearchResponse>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            reply: Mutex::new(Ok(SearchResponse::default())),
        }
    }

    /// Answer every later call with `response`
    pub fn respond_with(&self, response: SearchResponse) {
        *self.reply.lock() = Ok(response);
    }

    /// Fail every later call with `error`
    pub fn fail_with(&self, error: ClusterError) {
        *self.reply.lock() = Err(error);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for RecordingTransport {
    fn execute(
        &self,
        connection: &ConnectionInfo,
        request: &SearchRequest,
    ) -> ClusterResult<SearchResponse> {
        self.calls.lock().push(RecordedCall {
            connection: connection.clone(),
            request: request.clone(),
        });
        self.reply.lock().clone()
    }

    fn name(&self) -> &str {
        "recording"
    }
}

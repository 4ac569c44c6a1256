//! Cluster connection handles

use crate::{
    ClusterError, ClusterResult, SearchRequest, SearchRequestBuilder, SearchResponse, Transport,
};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A transport endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HostPort {
    pub host: String,
    pub port: u16,
}

impl HostPort {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// What a transport needs to know about the connection it serves
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionInfo {
    /// Cluster the connection was configured for; not checked against the
    /// endpoints
    pub cluster_name: Option<String>,
    /// Endpoints in declaration order
    pub endpoints: Vec<HostPort>,
}

impl ConnectionInfo {
    pub fn new(cluster_name: Option<String>, endpoints: Vec<HostPort>) -> Self {
        Self {
            cluster_name,
            endpoints,
        }
    }
}

impl fmt::Display for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let endpoints: Vec<String> = self.endpoints.iter().map(ToString::to_string).collect();
        match &self.cluster_name {
            Some(name) => write!(f, "{} [{}]", name, endpoints.join(", ")),
            None => write!(f, "[{}]", endpoints.join(", ")),
        }
    }
}

/// Handle to a search cluster
///
/// Creating a connection performs no I/O; endpoints are only contacted when
/// a request is executed.
#[derive(Clone)]
pub struct ClusterConnection {
    info: ConnectionInfo,
    transport: Arc<dyn Transport>,
}

impl ClusterConnection {
    pub fn new(cluster_name: Option<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            info: ConnectionInfo::new(cluster_name, Vec::new()),
            transport,
        }
    }

    /// Append an endpoint after the existing ones
    pub fn add_endpoint(&mut self, endpoint: HostPort) {
        self.info.endpoints.push(endpoint);
    }

    pub fn cluster_name(&self) -> Option<&str> {
        self.info.cluster_name.as_deref()
    }

    pub fn endpoints(&self) -> &[HostPort] {
        &self.info.endpoints
    }

    pub fn info(&self) -> &ConnectionInfo {
        &self.info
    }

    /// Start a search scoped to `target`
    pub fn prepare_search(&self, target: impl Into<String>) -> SearchRequestBuilder {
        SearchRequestBuilder::new(target)
    }

    /// Send the request through the transport: one round trip, no retry
    pub fn execute(&self, request: &SearchRequest) -> ClusterResult<SearchResponse> {
        if self.info.endpoints.is_empty() {
            return Err(ClusterError::NoEndpoints);
        }
        log::info!(
            "Executing search on '{}' via {} ({})",
            request.target(),
            self.transport.name(),
            self.info
        );
        self.transport.execute(&self.info, request)
    }
}

impl fmt::Debug for ClusterConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterConnection")
            .field("info", &self.info)
            .field("transport", &self.transport.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DryRunTransport;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_endpoints_keep_insertion_order() {
        let mut conn = ClusterConnection::new(Some("logging".into()), Arc::new(DryRunTransport));
        conn.add_endpoint(HostPort::new("b", 9201));
        conn.add_endpoint(HostPort::new("a", 9200));

        assert_eq!(conn.cluster_name(), Some("logging"));
        assert_eq!(
            conn.endpoints(),
            &[HostPort::new("b", 9201), HostPort::new("a", 9200)]
        );
        assert_eq!(conn.info().to_string(), "logging [b:9201, a:9200]");
    }

    #[test]
    fn test_execute_without_endpoints_fails() {
        let conn = ClusterConnection::new(None, Arc::new(DryRunTransport));
        let request = conn.prepare_search("logs").build();
        assert!(matches!(
            conn.execute(&request),
            Err(ClusterError::NoEndpoints)
        ));
    }
}

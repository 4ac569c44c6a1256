//! HTTP transport for Elasticsearch-compatible clusters

use crate::{
    ClusterError, ClusterResult, ConnectionInfo, HostPort, SearchRequest, SearchResponse,
    Transport,
};
use reqwest::blocking::{Client, Response};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Https => write!(f, "https"),
        }
    }
}

impl FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(format!("unknown scheme '{other}', expected http or https")),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    pub scheme: Scheme,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

/// Blocking HTTP transport
///
/// Endpoints are tried in order. An endpoint that cannot be reached is
/// skipped; any other failure ends the request. Each attempt is a single
/// `POST` with no preliminary handshake.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    settings: ClientSettings,
}

impl HttpTransport {
    pub fn new(settings: ClientSettings) -> ClusterResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ClusterError::Client {
                message: e.to_string(),
            })?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn base_url(&self, endpoint: &HostPort) -> String {
        format!("{}://{}:{}", self.settings.scheme, endpoint.host, endpoint.port)
    }

    fn send_error(endpoint: &HostPort, error: reqwest::Error) -> ClusterError {
        if error.is_connect() {
            ClusterError::unreachable(endpoint.to_string(), error.to_string())
        } else {
            ClusterError::http(endpoint.to_string(), error.to_string())
        }
    }

    fn read_body(endpoint: &HostPort, response: Response) -> ClusterResult<String> {
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ClusterError::http(endpoint.to_string(), e.to_string()))?;
        if !status.is_success() {
            return Err(ClusterError::Status {
                status: status.as_u16(),
                reason: error_reason(&body),
            });
        }
        Ok(body)
    }

    fn search(&self, endpoint: &HostPort, request: &SearchRequest) -> ClusterResult<SearchResponse> {
        let url = format!("{}/{}/_search", self.base_url(endpoint), request.target());
        log::debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .json(&request.to_body())
            .send()
            .map_err(|e| Self::send_error(endpoint, e))?;
        let body = Self::read_body(endpoint, response)?;
        serde_json::from_str(&body).map_err(|e| ClusterError::invalid_response(e.to_string()))
    }
}

impl Transport for HttpTransport {
    fn execute(
        &self,
        connection: &ConnectionInfo,
        request: &SearchRequest,
    ) -> ClusterResult<SearchResponse> {
        let mut last_error = ClusterError::NoEndpoints;
        for endpoint in &connection.endpoints {
            match self.search(endpoint, request) {
                Err(e) if e.try_next_endpoint() => {
                    log::warn!("Skipping endpoint {endpoint}: {e}");
                    last_error = e;
                }
                other => return other,
            }
        }
        Err(last_error)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Pull `error.reason` out of an error body, falling back to the raw text
fn error_reason(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/reason")
                .and_then(|r| r.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

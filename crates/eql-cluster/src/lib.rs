//! Search cluster client for EQL
//!
//! This crate is the boundary between the EQL evaluator and an
//! Elasticsearch-compatible search cluster:
//!
//! - [`FilterNode`]: the boolean filter tree (Term / And / Or) a query compiles to
//! - [`SearchRequestBuilder`] / [`SearchRequest`]: a request scoped to one target,
//!   rendered to the query DSL with `serde_json`
//! - [`ClusterConnection`]: an optionally named handle with ordered endpoints
//! - [`Transport`]: the synchronous execute seam, with [`HttpTransport`] for
//!   real clusters and [`DryRunTransport`] for explaining requests offline

mod connection;
mod error;
mod filter;
mod http;
mod request;
mod response;
mod transport;

pub use connection::{ClusterConnection, ConnectionInfo, HostPort};
pub use error::{ClusterError, ClusterResult};
pub use filter::{FilterNode, TermValue};
pub use http::{ClientSettings, HttpTransport, Scheme};
pub use request::{SearchRequest, SearchRequestBuilder, SortKey, SortOrder};
pub use response::{Hit, Hits, SearchResponse, TotalHits};
pub use transport::{DryRunTransport, Transport};

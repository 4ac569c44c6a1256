//! Connect statements

use crate::{EvalError, EvalResult, EvaluationContext};
use eql_ast::HostPortNode;
use eql_cluster::{ClusterConnection, HostPort};

/// `host:port` leaf rule
///
/// The port must be a decimal number in 1..=65535.
pub fn host_port(node: &HostPortNode) -> EvalResult<HostPort> {
    let port = node
        .port
        .as_str()
        .parse::<u16>()
        .ok()
        .filter(|port| *port != 0)
        .ok_or_else(|| EvalError::malformed_literal(&node.port.text, "port in 1..=65535"))?;
    Ok(HostPort::new(node.host.text.clone(), port))
}

/// Open a connection and make it the active one
///
/// Every endpoint is added in the order given. Nothing is contacted here;
/// reachability surfaces on the first query.
pub fn evaluate_connect<'a>(
    ctx: &'a mut EvaluationContext,
    cluster_name: Option<&str>,
    hosts: &[HostPort],
) -> &'a ClusterConnection {
    let mut connection = ClusterConnection::new(cluster_name.map(str::to_string), ctx.transport());
    for host in hosts {
        connection.add_endpoint(host.clone());
    }
    log::info!("Connected to {}", connection.info());
    ctx.set_connection(connection)
}

//! Evaluation context for EQL execution

use crate::Attributes;
use eql_cluster::{ClusterConnection, DryRunTransport, Transport};
use std::sync::Arc;

/// State carried across the statements of a script
///
/// Holds the active cluster connection (at most one) and the per-node
/// attribute table. The transport is handed to every connection the
/// context creates.
pub struct EvaluationContext {
    connection: Option<ClusterConnection>,
    attributes: Attributes,
    transport: Arc<dyn Transport>,
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new(Arc::new(DryRunTransport))
    }
}

impl EvaluationContext {
    /// Create a context whose connections use `transport`
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            connection: None,
            attributes: Attributes::new(),
            transport,
        }
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// The active connection, if a connect statement has run
    pub fn connection(&self) -> Option<&ClusterConnection> {
        self.connection.as_ref()
    }

    /// Install a connection, dropping the previous one
    pub fn set_connection(&mut self, connection: ClusterConnection) -> &ClusterConnection {
        if let Some(previous) = self.connection.take() {
            log::debug!("Replacing connection {}", previous.info());
        }
        self.connection.insert(connection)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Forget node values from a previous parse tree; the connection stays
    pub fn reset_attributes(&mut self) {
        self.attributes.clear();
    }
}

impl std::fmt::Debug for EvaluationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("connection", &self.connection)
            .field("attributes", &self.attributes.len())
            .field("transport", &self.transport.name())
            .finish()
    }
}

//! CLI functionality for the EQL tool
//!
//! This module contains all CLI-related functionality including:
//! - Script execution
//! - Static checks
//! - REPL
//! - Output formatting

pub mod check;
pub mod output;
pub mod repl;
pub mod run;

use anyhow::{Context, Result};
use eql_cluster::{ClientSettings, DryRunTransport, HttpTransport, Scheme, Transport};
use std::sync::Arc;
use std::time::Duration;

/// How statements reach the cluster
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Log requests instead of sending them
    pub dry_run: bool,
    pub scheme: Scheme,
    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

impl TransportConfig {
    pub fn build(&self) -> Result<Arc<dyn Transport>> {
        if self.dry_run {
            return Ok(Arc::new(DryRunTransport));
        }
        let settings = ClientSettings {
            scheme: self.scheme,
            timeout: self.timeout.map(Duration::from_secs),
        };
        let transport = HttpTransport::new(settings).context("Failed to set up HTTP transport")?;
        Ok(Arc::new(transport))
    }
}

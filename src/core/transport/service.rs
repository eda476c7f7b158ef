//! Transport service - orchestrates different transport types.
//!
//! This service provides a unified interface for starting the MCP server
//! with different transport mechanisms.

use tracing::info;
#[cfg(all(feature = "stdio", feature = "http"))]
use tracing::warn;

use super::{TransportConfig, TransportResult};
use crate::core::McpServer;

#[cfg(feature = "stdio")]
use super::stdio::StdioTransport;

#[cfg(feature = "http")]
use super::http::HttpTransport;
#[cfg(feature = "http")]
use crate::core::security::ApiKeyGate;

/// Transport service - manages the transport layer for the MCP server.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Start the transport with the given MCP server.
    ///
    /// This method blocks until the transport is shut down. The HTTP
    /// transport takes its bearer key from the server's security config.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        info!("Starting transport: {}", self.config.description());

        match self.config {
            #[cfg(feature = "stdio")]
            TransportConfig::Stdio => StdioTransport::run(server).await,
            #[cfg(feature = "http")]
            TransportConfig::Http(cfg) => {
                let gate = ApiKeyGate::from_config(&server.config().security);
                HttpTransport::new(cfg, gate).run(server).await
            }
            #[cfg(all(feature = "stdio", feature = "http"))]
            TransportConfig::All(cfg) => {
                let gate = ApiKeyGate::from_config(&server.config().security);
                let stdio_server = server.clone();
                // The HTTP listener keeps serving after the STDIO client leaves
                tokio::spawn(async move {
                    if let Err(e) = StdioTransport::run(stdio_server).await {
                        warn!("STDIO transport stopped: {}", e);
                    }
                });
                HttpTransport::new(cfg, gate).run(server).await
            }
        }
    }
}

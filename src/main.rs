//! MCP Server Entry Point
//!
//! This is the main entry point for the MCP server. It initializes logging,
//! loads configuration, wires the Proxmox client and audit sinks, and starts
//! the server with the configured transport.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use proxmox_mcp_server::core::config::{AuditConfig, LoggingConfig};
use proxmox_mcp_server::core::{Config, McpServer, TransportService};
use proxmox_mcp_server::domains::proxmox::{
    AuditRotation, AuditSink, CompositeAuditSink, JsonFileAuditSink, ProxmoxClient,
    TracingAuditSink,
};
use proxmox_mcp_server::domains::tools::ToolDispatcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting {} v{}", config.server.name, config.server.version);

    if let Err(e) = config.proxmox.validate() {
        error!("{}", e);
        return Err(e.into());
    }
    if config.proxmox.insecure_tls {
        warn!("TLS certificate verification disabled for {}", config.proxmox.url);
    }
    if config.security.api_key.is_some() {
        info!("API key authentication enabled for the HTTP transport");
    }

    let audit = build_audit_sink(&config.audit)?;
    let client = ProxmoxClient::new(&config.proxmox, audit)
        .context("failed to create Proxmox client")?;
    info!("Proxmox API at {}", client.base_url());

    // Create the MCP server
    let server = McpServer::new(config.clone(), ToolDispatcher::new(Arc::new(client)));

    info!("Server initialized");

    // Create and run the transport service
    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Audit records always go to the log; the JSON file is optional.
fn build_audit_sink(config: &AuditConfig) -> Result<Arc<dyn AuditSink>> {
    let mut sink = CompositeAuditSink::new().with(Arc::new(TracingAuditSink));

    if config.file_enabled {
        let rotation =
            AuditRotation::new(config.max_size_mb, config.max_age_days, config.max_backups);
        let file = JsonFileAuditSink::open(&config.file, rotation).with_context(|| {
            format!("failed to open audit log {}", config.file.display())
        })?;
        info!(
            "Audit log file: {} (rotate at {} MB, keep {} for {} days)",
            config.file.display(),
            config.max_size_mb,
            config.max_backups,
            config.max_age_days
        );
        sink = sink.with(Arc::new(file));
    }

    Ok(Arc::new(sink))
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format. Output goes
/// to stderr so that stdout stays reserved for the stdio transport.
fn init_logging(config: &LoggingConfig) {
    let level = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if config.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}

//! Configuration management for the MCP server.
//!
//! Configuration is read from `MCP_`-prefixed environment variables, after
//! loading a `.env` file if one is present.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Proxmox VE connection settings.
    pub proxmox: ProxmoxConfig,

    /// Audit log settings.
    pub audit: AuditConfig,

    /// Front-door authentication for the HTTP transport.
    pub security: SecurityConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Proxmox VE API connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProxmoxConfig {
    /// Base URL, e.g. `https://pve.example.com:8006`.
    pub url: String,

    /// API token ID in `user@realm!tokenname` form.
    pub token_id: String,

    /// API token secret.
    #[serde(skip_serializing, default)]
    pub token_secret: String,

    /// Accept self-signed or otherwise invalid TLS certificates.
    pub insecure_tls: bool,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for ProxmoxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxmoxConfig")
            .field("url", &self.url)
            .field("token_id", &self.token_id)
            .field(
                "token_secret",
                &(!self.token_secret.is_empty()).then_some("[REDACTED]"),
            )
            .field("insecure_tls", &self.insecure_tls)
            .finish()
    }
}

impl ProxmoxConfig {
    /// Check that the connection settings are complete.
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(Error::config("MCP_PVE_URL is required"));
        }
        if self.token_id.is_empty() || self.token_secret.is_empty() {
            return Err(Error::config(
                "MCP_PVE_TOKEN_ID and MCP_PVE_TOKEN_SECRET are required",
            ));
        }
        Ok(())
    }
}

/// JSON-lines audit file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Append audit records to `file` in addition to the log.
    pub file_enabled: bool,

    /// Audit file location.
    pub file: PathBuf,

    /// Rotate the file once it grows past this size.
    pub max_size_mb: u64,

    /// Delete rotated files older than this.
    pub max_age_days: u64,

    /// Rotated files kept at most.
    pub max_backups: usize,
}

/// Front-door authentication settings.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Bearer key required on the HTTP JSON-RPC route. `None` leaves it open.
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for ProxmoxConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token_id: String::new(),
            token_secret: String::new(),
            // Proxmox installs ship with self-signed certificates
            insecure_tls: true,
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            file_enabled: false,
            file: PathBuf::from("logs/audit.log"),
            max_size_mb: 100,
            max_age_days: 30,
            max_backups: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "proxmox-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            proxmox: ProxmoxConfig::default(),
            audit: AuditConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// A positive integer from the environment. Zero or garbage keeps the default.
fn env_positive<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default,
{
    env_non_empty(name)
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v > T::default())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_PVE_URL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Some(name) = env_non_empty("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Some(level) = env_non_empty("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }
        config.logging.with_timestamps = env_flag("MCP_LOG_TIMESTAMPS", true);

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        // Proxmox connection
        if let Some(url) = env_non_empty("MCP_PVE_URL") {
            config.proxmox.url = url;
        }
        if let Some(token_id) = env_non_empty("MCP_PVE_TOKEN_ID") {
            config.proxmox.token_id = token_id;
        }
        if let Some(secret) = env_non_empty("MCP_PVE_TOKEN_SECRET") {
            config.proxmox.token_secret = secret;
        }
        config.proxmox.insecure_tls = env_flag("MCP_PVE_INSECURE_TLS", true);

        // Audit file
        config.audit.file_enabled = env_flag("MCP_AUDIT_LOG_ENABLED", false);
        if let Some(file) = env_non_empty("MCP_AUDIT_LOG_FILE") {
            config.audit.file = PathBuf::from(file);
        }
        config.audit.max_size_mb =
            env_positive("MCP_AUDIT_LOG_MAX_SIZE_MB", config.audit.max_size_mb);
        config.audit.max_age_days =
            env_positive("MCP_AUDIT_LOG_MAX_AGE_DAYS", config.audit.max_age_days);
        config.audit.max_backups =
            env_positive("MCP_AUDIT_LOG_MAX_BACKUPS", config.audit.max_backups);

        // Front-door key
        config.security.api_key = env_non_empty("MCP_API_KEY");

        config
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    pub(crate) static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "MCP_PVE_URL",
        "MCP_PVE_TOKEN_ID",
        "MCP_PVE_TOKEN_SECRET",
        "MCP_PVE_INSECURE_TLS",
        "MCP_AUDIT_LOG_ENABLED",
        "MCP_AUDIT_LOG_FILE",
        "MCP_AUDIT_LOG_MAX_SIZE_MB",
        "MCP_AUDIT_LOG_MAX_AGE_DAYS",
        "MCP_AUDIT_LOG_MAX_BACKUPS",
        "MCP_API_KEY",
        "MCP_LOG_TIMESTAMPS",
    ];

    fn clear_vars() {
        for var in VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_proxmox_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_vars();
        unsafe {
            std::env::set_var("MCP_PVE_URL", "https://pve.lab:8006");
            std::env::set_var("MCP_PVE_TOKEN_ID", "root@pam!mcp");
            std::env::set_var("MCP_PVE_TOKEN_SECRET", "abc-123");
            std::env::set_var("MCP_PVE_INSECURE_TLS", "false");
        }

        let config = Config::from_env();
        assert_eq!(config.proxmox.url, "https://pve.lab:8006");
        assert_eq!(config.proxmox.token_id, "root@pam!mcp");
        assert_eq!(config.proxmox.token_secret, "abc-123");
        assert!(!config.proxmox.insecure_tls);
        assert!(config.proxmox.validate().is_ok());

        clear_vars();
    }

    #[test]
    fn test_audit_and_api_key_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_vars();
        unsafe {
            std::env::set_var("MCP_AUDIT_LOG_ENABLED", "true");
            std::env::set_var("MCP_AUDIT_LOG_FILE", "/var/log/pve-mcp/audit.log");
            std::env::set_var("MCP_API_KEY", "front-door");
        }

        let config = Config::from_env();
        assert!(config.audit.file_enabled);
        assert_eq!(config.audit.file, PathBuf::from("/var/log/pve-mcp/audit.log"));
        assert_eq!(config.security.api_key.as_deref(), Some("front-door"));

        clear_vars();
    }

    #[test]
    fn test_defaults_without_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_vars();

        let config = Config::from_env();
        assert!(config.proxmox.insecure_tls);
        assert!(!config.audit.file_enabled);
        assert_eq!(config.audit.file, PathBuf::from("logs/audit.log"));
        assert_eq!(config.audit.max_size_mb, 100);
        assert_eq!(config.audit.max_age_days, 30);
        assert_eq!(config.audit.max_backups, 5);
        assert!(config.security.api_key.is_none());
    }

    #[test]
    fn test_log_timestamps_flag() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_vars();
        assert!(Config::from_env().logging.with_timestamps);

        unsafe {
            std::env::set_var("MCP_LOG_TIMESTAMPS", "false");
        }
        assert!(!Config::from_env().logging.with_timestamps);

        clear_vars();
    }

    #[test]
    fn test_audit_rotation_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_vars();
        unsafe {
            std::env::set_var("MCP_AUDIT_LOG_MAX_SIZE_MB", "20");
            std::env::set_var("MCP_AUDIT_LOG_MAX_AGE_DAYS", "0");
            std::env::set_var("MCP_AUDIT_LOG_MAX_BACKUPS", "many");
        }

        let config = Config::from_env();
        assert_eq!(config.audit.max_size_mb, 20);
        assert_eq!(config.audit.max_age_days, 30);
        assert_eq!(config.audit.max_backups, 5);

        clear_vars();
    }

    #[test]
    fn test_validate_requires_url_and_token() {
        let mut proxmox = ProxmoxConfig::default();
        let err = proxmox.validate().unwrap_err();
        assert!(err.to_string().contains("MCP_PVE_URL"));

        proxmox.url = "https://pve.lab:8006".to_string();
        proxmox.token_id = "root@pam!mcp".to_string();
        let err = proxmox.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("MCP_PVE_TOKEN_SECRET"));
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let proxmox = ProxmoxConfig {
            url: "https://pve.lab:8006".to_string(),
            token_id: "root@pam!mcp".to_string(),
            token_secret: "super_secret_token".to_string(),
            insecure_tls: true,
        };
        let debug_str = format!("{:?}", proxmox);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_token"));

        let security = SecurityConfig {
            api_key: Some("super_secret_key".to_string()),
        };
        let debug_str = format!("{:?}", security);
        assert!(!debug_str.contains("super_secret_key"));
    }

    #[test]
    fn test_default_server_name() {
        let config = Config::default();
        assert_eq!(config.server.name, "proxmox-mcp");
    }
}

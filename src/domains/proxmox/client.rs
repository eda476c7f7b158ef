//! Authenticated HTTP client for the Proxmox VE API.
//!
//! Each call is one request against `<base_url>/api2/json<path>`. The response
//! envelope is unwrapped and its payload formatted for display. One audit
//! record is emitted per call whatever the outcome.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use super::audit::{AuditSink, CallAudit};
use super::error::ClientError;
use super::format::{format_payload, unwrap_envelope};
use crate::core::config::ProxmoxConfig;

/// Fixed prefix of every API path.
pub const API_PREFIX: &str = "/api2/json";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP methods used against the Proxmox API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether a request body with this method is sent as form data.
    pub fn carries_form(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Proxmox API token (`user@realm!tokenname` plus its secret).
#[derive(Clone)]
pub struct ApiToken {
    id: String,
    secret: String,
}

impl ApiToken {
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
        }
    }

    /// Value of the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("PVEAPIToken={}={}", self.id, self.secret)
    }
}

/// Custom Debug implementation to redact the secret from logs.
impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiToken")
            .field("id", &self.id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Client for the Proxmox VE API.
///
/// Immutable after construction and meant to be shared behind an `Arc`.
pub struct ProxmoxClient {
    http: reqwest::Client,
    base_url: String,
    token: ApiToken,
    audit: Arc<dyn AuditSink>,
}

impl ProxmoxClient {
    /// Build a client from configuration.
    pub fn new(config: &ProxmoxConfig, audit: Arc<dyn AuditSink>) -> Result<Self, ClientError> {
        Self::from_parts(
            &config.url,
            ApiToken::new(&config.token_id, &config.token_secret),
            config.insecure_tls,
            audit,
        )
    }

    /// Build a client from its individual parts.
    ///
    /// With `insecure_tls` set, self-signed and otherwise invalid server
    /// certificates are accepted. Proxmox installs ship with self-signed
    /// certificates, so this is the default in configuration.
    pub fn from_parts(
        base_url: &str,
        token: ApiToken,
        insecure_tls: bool,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure_tls)
            .build()
            .map_err(|e| ClientError::build(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            audit,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str) -> Result<String, ClientError> {
        self.call(HttpMethod::Get, path, None).await
    }

    /// POST with form fields. An empty field list sends no body.
    pub async fn post(&self, path: &str, form: &[(String, String)]) -> Result<String, ClientError> {
        self.call(HttpMethod::Post, path, encode_form(form)?).await
    }

    pub async fn put(&self, path: &str, form: &[(String, String)]) -> Result<String, ClientError> {
        self.call(HttpMethod::Put, path, encode_form(form)?).await
    }

    /// DELETE with optional query parameters appended to the path.
    pub async fn delete(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<String, ClientError> {
        let target = with_query(path, query)?;
        self.call(HttpMethod::Delete, &target, None).await
    }

    /// Send one request and return the formatted `data` payload.
    pub async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<String, ClientError> {
        let audit = CallAudit::start(self.audit.as_ref(), method.as_str(), path);

        let (outcome, status, bytes) = self.send(method, path, body).await;
        audit.finish(status, bytes, outcome.as_ref().err().map(ToString::to_string));

        let raw = outcome?;
        Ok(format_payload(&raw))
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> (Result<String, ClientError>, u16, usize) {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, path);
        debug!("{} {}", method, url);

        let mut builder = self
            .http
            .request(method.into(), &url)
            .header(AUTHORIZATION, self.token.header_value());

        if let Some(body) = body {
            if method.carries_form() {
                builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE);
            }
            builder = builder.body(body);
        }

        let request = match builder.build() {
            Ok(request) => request,
            Err(e) => return (Err(ClientError::build(e.to_string())), 0, 0),
        };

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(e) => return (Err(ClientError::Network(e)), 0, 0),
        };

        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return (Err(ClientError::Read(e)), status, 0),
        };
        let len = body.len();

        if !(200..300).contains(&status) {
            let body = String::from_utf8_lossy(&body).into_owned();
            return (Err(ClientError::Status { status, body }), status, len);
        }

        (unwrap_envelope(&body), status, len)
    }
}

/// Form-encode fields, returning `None` when there is nothing to send.
pub fn encode_form(fields: &[(String, String)]) -> Result<Option<String>, ClientError> {
    if fields.is_empty() {
        return Ok(None);
    }
    serde_urlencoded::to_string(fields)
        .map(Some)
        .map_err(|e| ClientError::build(e.to_string()))
}

/// Append percent-encoded query parameters to a path.
pub fn with_query(path: &str, query: &[(String, String)]) -> Result<String, ClientError> {
    if query.is_empty() {
        return Ok(path.to_string());
    }
    let encoded =
        serde_urlencoded::to_string(query).map_err(|e| ClientError::build(e.to_string()))?;
    let sep = if path.contains('?') { '&' } else { '?' };
    Ok(format!("{path}{sep}{encoded}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::proxmox::audit::RecordingAuditSink;
    use crate::domains::proxmox::testing::MockProxmox;

    fn client_for(base_url: &str, sink: Arc<RecordingAuditSink>) -> ProxmoxClient {
        ProxmoxClient::from_parts(
            base_url,
            ApiToken::new("root@pam!mcp", "s3cret"),
            true,
            sink,
        )
        .unwrap()
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_token_header_value() {
        let token = ApiToken::new("root@pam!mcp", "abc-123");
        assert_eq!(token.header_value(), "PVEAPIToken=root@pam!mcp=abc-123");
    }

    #[test]
    fn test_token_redacted_in_debug() {
        let token = ApiToken::new("root@pam!mcp", "super_secret");
        let debug = format!("{:?}", token);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("super_secret"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = client_for("https://pve.example.com:8006/", Arc::default());
        assert_eq!(client.base_url(), "https://pve.example.com:8006");
    }

    #[test]
    fn test_with_query_encodes_values() {
        let path = with_query("/nodes/pve1/qemu/100", &pairs(&[("purge", "1 2")])).unwrap();
        assert_eq!(path, "/nodes/pve1/qemu/100?purge=1+2");

        let path = with_query("/cluster/resources?type=vm", &pairs(&[("a", "b")])).unwrap();
        assert_eq!(path, "/cluster/resources?type=vm&a=b");

        assert_eq!(with_query("/nodes", &[]).unwrap(), "/nodes");
    }

    #[test]
    fn test_encode_form_empty_is_none() {
        assert_eq!(encode_form(&[]).unwrap(), None);
        assert_eq!(
            encode_form(&pairs(&[("snapname", "pre upgrade")])).unwrap(),
            Some("snapname=pre+upgrade".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_unwraps_and_formats_payload() {
        let mock = MockProxmox::start(200, r#"{"data":{"a":1}}"#).await;
        let sink = Arc::new(RecordingAuditSink::new());
        let client = client_for(&mock.base_url, sink.clone());

        let result = client.get("/cluster/status").await.unwrap();
        assert_eq!(result, "{\n  \"a\": 1\n}");

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/api2/json/cluster/status");
        assert_eq!(
            requests[0].authorization.as_deref(),
            Some("PVEAPIToken=root@pam!mcp=s3cret")
        );
        assert_eq!(requests[0].content_type, None);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, 200);
        assert_eq!(records[0].path, "/cluster/status");
        assert!(records[0].success);
    }

    #[tokio::test]
    async fn test_get_string_payload_is_plain_text() {
        let mock = MockProxmox::start(200, r#"{"data":"plain"}"#).await;
        let client = client_for(&mock.base_url, Arc::default());

        assert_eq!(client.get("/version").await.unwrap(), "plain");
    }

    #[tokio::test]
    async fn test_post_sends_form_body() {
        let mock = MockProxmox::start(200, r#"{"data":"UPID:pve1:0001"}"#).await;
        let client = client_for(&mock.base_url, Arc::default());

        client
            .post("/nodes/pve1/qemu/100/snapshot", &pairs(&[("snapname", "s1")]))
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].body, "snapname=s1");
        assert_eq!(
            requests[0].content_type.as_deref(),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[tokio::test]
    async fn test_post_without_fields_sends_no_body() {
        let mock = MockProxmox::start(200, r#"{"data":null}"#).await;
        let client = client_for(&mock.base_url, Arc::default());

        client
            .post("/nodes/pve1/qemu/100/status/start", &[])
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].body, "");
        assert_eq!(requests[0].content_type, None);
    }

    #[tokio::test]
    async fn test_delete_puts_params_in_query() {
        let mock = MockProxmox::start(200, r#"{"data":null}"#).await;
        let sink = Arc::new(RecordingAuditSink::new());
        let client = client_for(&mock.base_url, sink.clone());

        client
            .delete("/nodes/pve1/lxc/200", &pairs(&[("purge", "1")]))
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].method, "DELETE");
        assert_eq!(requests[0].path, "/api2/json/nodes/pve1/lxc/200?purge=1");
        assert_eq!(requests[0].content_type, None);
        assert_eq!(sink.records()[0].path, "/nodes/pve1/lxc/200?purge=1");
    }

    #[tokio::test]
    async fn test_non_2xx_is_error_with_status_and_body() {
        let mock = MockProxmox::start(500, "\"boom\"").await;
        let sink = Arc::new(RecordingAuditSink::new());
        let client = client_for(&mock.base_url, sink.clone());

        let err = client.get("/nodes").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("boom"));

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, 500);
        assert_eq!(records[0].response_bytes, 6);
        assert!(!records[0].success);
        assert!(records[0].error.as_deref().unwrap().contains("boom"));
    }

    #[tokio::test]
    async fn test_invalid_envelope_is_parse_error() {
        let mock = MockProxmox::start(200, "<html>proxy</html>").await;
        let sink = Arc::new(RecordingAuditSink::new());
        let client = client_for(&mock.base_url, sink.clone());

        let err = client.get("/nodes").await.unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, 200);
        assert!(!records[0].success);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = Arc::new(RecordingAuditSink::new());
        let client = client_for(&format!("http://{addr}"), sink.clone());

        let err = client.get("/nodes").await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        assert!(err.to_string().starts_with("request failed:"));

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, 0);
        assert!(!records[0].success);
    }

    #[tokio::test]
    async fn test_invalid_token_is_build_error() {
        let sink = Arc::new(RecordingAuditSink::new());
        let client = ProxmoxClient::from_parts(
            "http://127.0.0.1:9",
            ApiToken::new("root@pam!mcp", "bad\nsecret"),
            true,
            sink.clone(),
        )
        .unwrap();

        let err = client.get("/nodes").await.unwrap_err();
        assert!(matches!(err, ClientError::Build(_)));
        assert_eq!(sink.records().len(), 1);
        assert_eq!(sink.records()[0].status, 0);
    }
}

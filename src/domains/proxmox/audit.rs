//! Audit trail for outbound Proxmox API calls.
//!
//! Every call made by [`ProxmoxClient`](super::ProxmoxClient) produces exactly one
//! [`AuditRecord`], handed to an [`AuditSink`]. Sinks are shared across concurrent
//! dispatches and must accept writes from many tasks at once.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

use file_rotate::compression::Compression;
use file_rotate::suffix::{AppendTimestamp, FileLimit};
use file_rotate::{ContentLimit, FileRotate};
use serde::Serialize;
use tracing::{error, info, warn};

/// Tracing target used for audit events.
pub const AUDIT_TARGET: &str = "audit";

const EVENT_CATEGORY: &str = "api";
const EVENT_ACTION: &str = "proxmox_api_call";

/// One outbound API call, as seen by the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    #[serde(rename = "event.category")]
    pub category: &'static str,

    #[serde(rename = "event.action")]
    pub action: &'static str,

    #[serde(rename = "http.method")]
    pub method: String,

    /// Request path below `/api2/json`, including any query string.
    #[serde(rename = "url.path")]
    pub path: String,

    /// HTTP status, 0 when the request never got a response.
    #[serde(rename = "http.status", skip_serializing_if = "is_zero_u16")]
    pub status: u16,

    #[serde(rename = "response.bytes", skip_serializing_if = "is_zero_usize")]
    pub response_bytes: usize,

    pub duration_ms: u64,

    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn is_zero_u16(v: &u16) -> bool {
    *v == 0
}

fn is_zero_usize(v: &usize) -> bool {
    *v == 0
}

impl AuditRecord {
    /// Build a record for a finished call.
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        status: u16,
        response_bytes: usize,
        duration: Duration,
        error: Option<String>,
    ) -> Self {
        Self {
            category: EVENT_CATEGORY,
            action: EVENT_ACTION,
            method: method.into(),
            path: path.into(),
            status,
            response_bytes,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            success: error.is_none(),
            error,
        }
    }
}

/// Destination for audit records.
pub trait AuditSink: Send + Sync {
    /// Record one completed (or abandoned) API call.
    fn record(&self, record: &AuditRecord);
}

/// Emits audit records as structured `tracing` events on the `audit` target.
///
/// The category and action tags are logged as `event_category` and
/// `event_action`; the remaining fields keep their dotted names.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: &AuditRecord) {
        let status = (record.status > 0).then_some(record.status);
        let bytes = (record.response_bytes > 0).then_some(record.response_bytes);

        match &record.error {
            Some(err) => error!(
                target: AUDIT_TARGET,
                event_category = record.category,
                event_action = record.action,
                http.method = %record.method,
                url.path = %record.path,
                http.status = status,
                response.bytes = bytes,
                duration_ms = record.duration_ms,
                error = %err,
                "Proxmox API call failed"
            ),
            None => info!(
                target: AUDIT_TARGET,
                event_category = record.category,
                event_action = record.action,
                http.method = %record.method,
                url.path = %record.path,
                http.status = status,
                response.bytes = bytes,
                duration_ms = record.duration_ms,
                "Proxmox API call completed"
            ),
        }
    }
}

/// Size, age and count limits for the audit file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditRotation {
    /// Rotate once the live file grows past this many bytes.
    pub max_bytes: usize,
    /// Rotated files older than this are deleted.
    pub max_age: Duration,
    /// Rotated files kept at most.
    pub max_backups: usize,
}

impl AuditRotation {
    pub fn new(max_size_mb: u64, max_age_days: u64, max_backups: usize) -> Self {
        let max_bytes = max_size_mb.saturating_mul(1024 * 1024);
        Self {
            max_bytes: usize::try_from(max_bytes).unwrap_or(usize::MAX),
            max_age: Duration::from_secs(max_age_days.saturating_mul(24 * 60 * 60)),
            max_backups,
        }
    }
}

impl Default for AuditRotation {
    fn default() -> Self {
        Self::new(100, 30, 5)
    }
}

/// Appends audit records to a file, one JSON object per line.
///
/// The file rotates by size. Rotated files get a timestamp suffix, are
/// gzip-compressed, and are pruned by count and by age.
pub struct JsonFileAuditSink {
    file: Mutex<RotatingFile>,
}

struct RotatingFile {
    path: PathBuf,
    rotation: AuditRotation,
    writer: FileRotate<AppendTimestamp>,
    backups: Vec<PathBuf>,
}

impl RotatingFile {
    fn open(path: PathBuf, rotation: AuditRotation) -> std::io::Result<Self> {
        prune_expired(&path, rotation.max_age)?;
        let mut writer = rotating_writer(&path, &rotation);
        let backups = writer.log_paths();
        Ok(Self {
            path,
            rotation,
            writer,
            backups,
        })
    }

    fn write_line(&mut self, line: &[u8]) -> std::io::Result<()> {
        self.writer.write_all(line)?;
        self.writer.flush()?;

        // A new backup means the file just rotated
        let backups = self.writer.log_paths();
        if backups != self.backups {
            prune_expired(&self.path, self.rotation.max_age)?;
            self.writer = rotating_writer(&self.path, &self.rotation);
            self.backups = self.writer.log_paths();
        }
        Ok(())
    }
}

fn rotating_writer(path: &Path, rotation: &AuditRotation) -> FileRotate<AppendTimestamp> {
    FileRotate::new(
        path,
        AppendTimestamp::default(FileLimit::MaxFiles(rotation.max_backups)),
        ContentLimit::BytesSurpassed(rotation.max_bytes),
        Compression::OnRotate(0),
        #[cfg(unix)]
        Some(0o640),
    )
}

/// Delete rotated siblings of `path` last modified more than `max_age` ago.
fn prune_expired(path: &Path, max_age: Duration) -> std::io::Result<()> {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(());
    };
    let prefix = format!("{name}.");
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => dir,
        None => Path::new("."),
    };
    let now = SystemTime::now();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        if !file_name.to_string_lossy().starts_with(&prefix) {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        let expired = now
            .duration_since(modified)
            .is_ok_and(|age| age > max_age);
        if expired {
            if let Err(e) = std::fs::remove_file(entry.path()) {
                warn!("Failed to remove expired audit file {}: {}", entry.path().display(), e);
            }
        }
    }
    Ok(())
}

impl JsonFileAuditSink {
    /// Open (or create) the audit file in append mode, creating parent directories.
    pub fn open(path: impl AsRef<Path>, rotation: AuditRotation) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = RotatingFile::open(path.to_path_buf(), rotation)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

/// A file line: the record plus the time it was written.
#[derive(Serialize)]
struct TimestampedRecord<'a> {
    #[serde(rename = "@timestamp")]
    timestamp: String,
    #[serde(flatten)]
    record: &'a AuditRecord,
}

impl AuditSink for JsonFileAuditSink {
    fn record(&self, record: &AuditRecord) {
        let entry = TimestampedRecord {
            timestamp: chrono::Utc::now().to_rfc3339(),
            record,
        };
        let mut line = match serde_json::to_vec(&entry) {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to serialize audit record: {}", e);
                return;
            }
        };
        line.push(b'\n');

        let Ok(mut file) = self.file.lock() else {
            warn!("Audit file lock poisoned, dropping record");
            return;
        };
        if let Err(e) = file.write_line(&line) {
            warn!("Failed to write audit record: {}", e);
        }
    }
}

/// Fans a record out to several sinks.
#[derive(Default, Clone)]
pub struct CompositeAuditSink {
    sinks: Vec<Arc<dyn AuditSink>>,
}

impl CompositeAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl AuditSink for CompositeAuditSink {
    fn record(&self, record: &AuditRecord) {
        for sink in &self.sinks {
            sink.record(record);
        }
    }
}

/// Keeps records in memory. Useful for tests and for embedding the dispatcher.
#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for RecordingAuditSink {
    fn record(&self, record: &AuditRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
    }
}

/// Guard covering one outbound call.
///
/// Calling [`finish`](Self::finish) emits the record. If the guard is dropped
/// first (the call future was cancelled), a failure record is emitted instead,
/// so each call yields exactly one record.
pub(crate) struct CallAudit<'a> {
    sink: &'a dyn AuditSink,
    method: &'static str,
    path: &'a str,
    started: Instant,
    done: bool,
}

impl<'a> CallAudit<'a> {
    pub(crate) fn start(sink: &'a dyn AuditSink, method: &'static str, path: &'a str) -> Self {
        Self {
            sink,
            method,
            path,
            started: Instant::now(),
            done: false,
        }
    }

    pub(crate) fn finish(mut self, status: u16, response_bytes: usize, error: Option<String>) {
        self.emit(status, response_bytes, error);
    }

    fn emit(&mut self, status: u16, response_bytes: usize, error: Option<String>) {
        if self.done {
            return;
        }
        self.done = true;
        let record = AuditRecord::new(
            self.method,
            self.path,
            status,
            response_bytes,
            self.started.elapsed(),
            error,
        );
        self.sink.record(&record);
    }
}

impl Drop for CallAudit<'_> {
    fn drop(&mut self) {
        self.emit(0, 0, Some("request cancelled".to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(error: Option<&str>) -> AuditRecord {
        AuditRecord::new(
            "GET",
            "/nodes",
            if error.is_some() { 0 } else { 200 },
            if error.is_some() { 0 } else { 42 },
            Duration::from_millis(7),
            error.map(str::to_string),
        )
    }

    #[test]
    fn test_record_success_flag_follows_error() {
        assert!(sample(None).success);
        assert!(!sample(Some("boom")).success);
    }

    #[test]
    fn test_record_serialization_omits_zero_fields() {
        let json = serde_json::to_value(sample(Some("request failed: refused"))).unwrap();
        assert_eq!(json["event.category"], "api");
        assert_eq!(json["event.action"], "proxmox_api_call");
        assert_eq!(json["http.method"], "GET");
        assert_eq!(json["url.path"], "/nodes");
        assert_eq!(json["duration_ms"], 7);
        assert!(json.get("http.status").is_none());
        assert!(json.get("response.bytes").is_none());
        assert_eq!(json["error"], "request failed: refused");
    }

    #[test]
    fn test_record_serialization_keeps_status_and_bytes() {
        let json = serde_json::to_value(sample(None)).unwrap();
        assert_eq!(json["http.status"], 200);
        assert_eq!(json["response.bytes"], 42);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_json_file_sink_appends_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("audit.log");

        let sink = JsonFileAuditSink::open(&path, AuditRotation::default()).unwrap();
        sink.record(&sample(None));
        sink.record(&sample(Some("boom")));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["success"], false);
        assert_eq!(second["event.action"], "proxmox_api_call");
        assert!(second["@timestamp"].as_str().is_some());
    }

    fn backups_in(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .unwrap()
                    .to_string_lossy()
                    .starts_with("audit.log.")
            })
            .collect()
    }

    #[test]
    fn test_rotation_defaults() {
        let rotation = AuditRotation::default();
        assert_eq!(rotation.max_bytes, 100 * 1024 * 1024);
        assert_eq!(rotation.max_age, Duration::from_secs(30 * 24 * 60 * 60));
        assert_eq!(rotation.max_backups, 5);
    }

    #[test]
    fn test_json_file_sink_rotates_by_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.log");
        let rotation = AuditRotation {
            max_bytes: 300,
            max_age: Duration::from_secs(3600),
            max_backups: 2,
        };

        let sink = JsonFileAuditSink::open(&path, rotation).unwrap();
        for _ in 0..12 {
            sink.record(&sample(None));
        }

        let backups = backups_in(dir.path());
        assert!(!backups.is_empty());
        assert!(backups.len() <= 2);

        // Lines are never split across files
        let content = std::fs::read_to_string(&path).unwrap();
        for line in content.lines() {
            let entry: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(entry["event.action"], "proxmox_api_call");
        }
    }

    #[test]
    fn test_expired_backups_pruned_on_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.log");
        let stale = dir.path().join("audit.log.20200101T000000.gz");
        let fresh = dir.path().join("audit.log.20991231T000000.gz");
        let unrelated = dir.path().join("other.log.20200101T000000");
        for file in [&stale, &fresh, &unrelated] {
            std::fs::write(file, b"old").unwrap();
        }
        let two_days_ago = SystemTime::now() - Duration::from_secs(2 * 24 * 60 * 60);
        for file in [&stale, &unrelated] {
            std::fs::File::options()
                .write(true)
                .open(file)
                .unwrap()
                .set_modified(two_days_ago)
                .unwrap();
        }

        let rotation = AuditRotation::new(1, 1, 5);
        let _sink = JsonFileAuditSink::open(&path, rotation).unwrap();

        assert!(!stale.exists());
        assert!(fresh.exists());
        assert!(unrelated.exists());
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_tracing(record: &AuditRecord) -> String {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || TracingAuditSink.record(record));
        let bytes = log.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_tracing_sink_success_fields() {
        let line = capture_tracing(&sample(None));
        assert!(line.contains("INFO"));
        assert!(line.contains("audit"));
        assert!(line.contains("Proxmox API call completed"));
        assert!(line.contains("event_category=\"api\""));
        assert!(line.contains("event_action=\"proxmox_api_call\""));
        assert!(line.contains("http.method=GET"));
        assert!(line.contains("url.path=/nodes"));
        assert!(line.contains("http.status=200"));
        assert!(line.contains("response.bytes=42"));
        assert!(line.contains("duration_ms=7"));
        assert!(!line.contains("error="));
    }

    #[test]
    fn test_tracing_sink_failure_fields() {
        let line = capture_tracing(&sample(Some("request failed: refused")));
        assert!(line.contains("ERROR"));
        assert!(line.contains("Proxmox API call failed"));
        assert!(line.contains("event_action=\"proxmox_api_call\""));
        assert!(line.contains("error=request failed: refused"));
        assert!(!line.contains("http.status"));
        assert!(!line.contains("response.bytes"));
    }

    #[test]
    fn test_composite_sink_fans_out() {
        let a = Arc::new(RecordingAuditSink::new());
        let b = Arc::new(RecordingAuditSink::new());
        let sink = CompositeAuditSink::new().with(a.clone()).with(b.clone());

        sink.record(&sample(None));

        assert_eq!(a.records().len(), 1);
        assert_eq!(b.records().len(), 1);
    }

    #[test]
    fn test_call_audit_emits_once_on_finish() {
        let sink = RecordingAuditSink::new();
        let audit = CallAudit::start(&sink, "POST", "/nodes/pve1/qemu");
        audit.finish(200, 10, None);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, 200);
        assert!(records[0].success);
    }

    #[test]
    fn test_call_audit_emits_on_drop() {
        let sink = RecordingAuditSink::new();
        {
            let _audit = CallAudit::start(&sink, "GET", "/cluster/status");
        }

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, 0);
        assert_eq!(records[0].error.as_deref(), Some("request cancelled"));
    }
}

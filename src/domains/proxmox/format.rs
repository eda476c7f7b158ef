//! Response envelope unwrapping and payload formatting.

use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::value::RawValue;

use super::error::ClientError;

/// The `{"data": ...}` wrapper around every Proxmox API response.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    data: Option<Box<RawValue>>,
}

/// Extract the raw `data` payload from a response body.
///
/// A missing or `null` data field yields an empty payload.
pub fn unwrap_envelope(body: &[u8]) -> Result<String, ClientError> {
    let envelope: ApiEnvelope = serde_json::from_slice(body).map_err(ClientError::Parse)?;
    Ok(envelope
        .data
        .map(|raw| raw.get().to_string())
        .unwrap_or_default())
}

/// Render a payload for a tool result.
///
/// Structured data is re-emitted with two-space indentation, a JSON string is
/// returned as its text, and anything that does not parse is passed through.
/// Only whitespace changes: key order and number text are kept as received.
/// Applying this to its own output for structured data is a no-op.
pub fn format_payload(raw: &str) -> String {
    if let Ok(text) = serde_json::from_str::<String>(raw) {
        return text;
    }
    match serde_json::from_str::<IgnoredAny>(raw) {
        Ok(_) => reindent(raw),
        Err(_) => raw.to_string(),
    }
}

/// Re-indent valid JSON text without parsing its values.
fn reindent(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' | '[' => {
                out.push(c);
                while chars.next_if(char::is_ascii_whitespace).is_some() {}
                // empty containers stay on one line
                if let Some(close) = chars.next_if(|&c| matches!(c, '}' | ']')) {
                    out.push(close);
                } else {
                    depth += 1;
                    newline(&mut out, depth);
                }
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                newline(&mut out, depth);
                out.push(c);
            }
            ',' => {
                out.push(c);
                newline(&mut out, depth);
            }
            ':' => out.push_str(": "),
            c if c.is_ascii_whitespace() => {}
            c => out.push(c),
        }
    }
    out
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str("  ");
    }
}

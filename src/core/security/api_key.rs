use subtle::ConstantTimeEq;

use crate::core::config::SecurityConfig;

/// Longest `Authorization` header we are willing to inspect.
const MAX_AUTH_HEADER_BYTES: usize = 8 * 1024;

/// Errors returned by the bearer key gate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing or invalid authorization header")]
    MissingHeader,

    #[error("invalid api key")]
    InvalidKey,
}

/// Static bearer key check for the HTTP front door.
///
/// With no key configured every request is let through.
#[derive(Clone, Default)]
pub struct ApiKeyGate {
    key: Option<String>,
}

impl ApiKeyGate {
    pub fn new(key: Option<String>) -> Self {
        Self {
            key: key.filter(|k| !k.is_empty()),
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(config.api_key.clone())
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    /// Check the raw `Authorization` header value of a request.
    pub fn check(&self, auth_header: Option<&str>) -> Result<(), AuthError> {
        let Some(expected) = self.key.as_deref() else {
            return Ok(());
        };
        let token = parse_bearer_token(auth_header)?;
        if constant_time_eq(token.as_bytes(), expected.as_bytes()) {
            Ok(())
        } else {
            Err(AuthError::InvalidKey)
        }
    }
}

impl std::fmt::Debug for ApiKeyGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyGate")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

fn parse_bearer_token(auth_header: Option<&str>) -> Result<&str, AuthError> {
    let header = auth_header.ok_or(AuthError::MissingHeader)?;
    if header.len() > MAX_AUTH_HEADER_BYTES {
        return Err(AuthError::MissingHeader);
    }
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default().trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MissingHeader);
    }
    Ok(token)
}

/// Compares two byte slices in constant time.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

// Security module for front-door access control
//
// The HTTP transport checks a static bearer key before handing requests to
// the MCP layer. The stdio transport is trusted by construction.

pub mod api_key;

pub use api_key::{ApiKeyGate, AuthError};

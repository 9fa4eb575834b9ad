// ── Core error types ──
//
// Domain errors from nvrcheck-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the `From<nvrcheck_api::Error>`
// impl translates transport-layer errors into domain variants.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot register NVR at {endpoint}: {reason}")]
    Registration { endpoint: SocketAddr, reason: String },

    #[error("Cannot connect to NVR at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("SDK initialization failed: {message}")]
    Sdk { message: String },

    // ── Snapshot errors ──────────────────────────────────────────────
    #[error("Device {device_id} has no logical id on its first entity")]
    DeviceUnkeyed { device_id: String },

    #[error("Failed to write snapshot {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render snapshot XML: {message}")]
    Xml { message: String },

    #[error("Cannot resolve output directory: {reason}")]
    OutputDir { reason: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// The NVR's machine-readable error code, if any.
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for errors the device poll should ride out.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. })
            || matches!(self, Self::Api { status: Some(s), .. } if *s >= 500)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nvrcheck_api::Error> for CoreError {
    fn from(err: nvrcheck_api::Error) -> Self {
        match err {
            nvrcheck_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            nvrcheck_api::Error::NotLoggedIn => CoreError::AuthenticationFailed {
                message: "not logged in".into(),
            },
            nvrcheck_api::Error::Transport(ref e) => {
                if e.is_timeout() || e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), |u| u.origin().ascii_serialization()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            nvrcheck_api::Error::InvalidUrl(e) => CoreError::Internal(format!("Invalid URL: {e}")),
            nvrcheck_api::Error::Tls(msg) => CoreError::Sdk {
                message: format!("TLS error: {msg}"),
            },
            nvrcheck_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            nvrcheck_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

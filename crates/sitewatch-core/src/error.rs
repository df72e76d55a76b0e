// ── Core error types ──
//
// User-facing errors from sitewatch-core. Consumers never see raw
// reqwest or serde failures; the `From<sitewatch_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach status endpoint at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Status endpoint timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Endpoint errors ──────────────────────────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Status payload could not be read: {message}")]
    InvalidPayload { message: String },

    // ── Board errors ─────────────────────────────────────────────────
    #[error("Page {requested} is out of range (1..={total_pages})")]
    PageOutOfRange { requested: usize, total_pages: usize },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sitewatch_api::Error> for CoreError {
    fn from(err: sitewatch_api::Error) -> Self {
        match err {
            sitewatch_api::Error::Transport(ref e) => {
                if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            sitewatch_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            sitewatch_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            sitewatch_api::Error::Http { status, message } => CoreError::Api {
                message: format!("HTTP error! status: {status} ({message})"),
                status: Some(status),
            },
            sitewatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidPayload { message }
            }
        }
    }
}

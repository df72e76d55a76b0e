//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use sitewatch_config::ConfigError;
use sitewatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach status endpoint at {url}")]
    #[diagnostic(
        code(sitewatch::connection_failed),
        help(
            "Check that the status service is running and reachable.\n\
             Self-signed certificates need --insecure (-k) or ca_cert in the profile."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(sitewatch::timeout),
        help("Increase timeout with --timeout or check the status service.")
    )]
    Timeout { seconds: u64 },

    // ── Endpoint ─────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(sitewatch::api_error))]
    ApiError { message: String, status: Option<u16> },

    #[error("Status endpoint returned an unreadable payload: {message}")]
    #[diagnostic(
        code(sitewatch::invalid_payload),
        help("The endpoint must return a JSON array of site status records.")
    )]
    InvalidPayload { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(sitewatch::not_found),
        help("Run: sitewatch {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sitewatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sitewatch::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: sitewatch config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No status endpoint configured")]
    #[diagnostic(
        code(sitewatch::no_config),
        help(
            "Pass --endpoint, set SITEWATCH_ENDPOINT, or create a profile with: sitewatch config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(sitewatch::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(sitewatch::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. }
            | Self::ProfileNotFound { .. }
            | Self::ApiError {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => Self::Config(Box::new(other)),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Api { message, status } => CliError::ApiError { message, status },

            CoreError::InvalidPayload { message } => CliError::InvalidPayload { message },

            CoreError::PageOutOfRange {
                requested,
                total_pages,
            } => CliError::Validation {
                field: "page".into(),
                reason: format!("{requested} is outside 1..={total_pages}"),
            },
        }
    }
}

// ── Runtime monitor configuration ──
//
// These types describe *where* the status endpoint lives and how often
// to poll it. They never touch disk; the CLI constructs a
// `MonitorConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use chrono::FixedOffset;
use url::Url;

use crate::timefmt;

/// Endpoint of the reference deployment.
pub const DEFAULT_ENDPOINT: &str = "https://localhost:44325/api/Sites/SiteIPStatus";

/// Poll period of the refresh driver.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs). Default for local endpoints.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for polling a single status endpoint.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Full URL of the status resource.
    pub endpoint: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// How often the refresh driver polls. Zero disables periodic polling.
    pub refresh_interval: Duration,
    /// Offset used when rendering timestamps.
    pub display_offset: FixedOffset,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT
                .parse()
                .expect("default endpoint is a valid URL"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            display_offset: timefmt::default_display_offset(),
        }
    }
}

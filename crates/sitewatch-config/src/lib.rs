//! Shared configuration for sitewatch.
//!
//! TOML profiles layered under environment overrides, and translation
//! to `sitewatch_core::MonitorConfig`. The CLI adds flag-aware
//! wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sitewatch_core::config::DEFAULT_ENDPOINT;
use sitewatch_core::{MonitorConfig, TlsVerification, timefmt};

/// Prefix of environment overrides, e.g. `SITEWATCH_DEFAULTS__TIMEOUT=10`.
pub const ENV_PREFIX: &str = "SITEWATCH_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' is not defined")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named endpoint profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Poll period of `watch` in seconds.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// UTC offset used to render timestamps, e.g. "+05:30".
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            refresh_interval: default_refresh_interval(),
            timezone: default_timezone(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_refresh_interval() -> u64 {
    30
}
fn default_timezone() -> String {
    "+05:30".into()
}

/// A named status endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Full URL of the site status resource.
    pub endpoint: String,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override poll period.
    pub refresh_interval: Option<u64>,

    /// Override display offset.
    pub timezone: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            refresh_interval: None,
            timezone: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "sitewatch", "sitewatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sitewatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// Nested keys use a double underscore in the environment:
/// `SITEWATCH_DEFAULTS__REFRESH_INTERVAL=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `MonitorConfig` from a profile, falling back to `defaults`
/// for every unset override.
pub fn profile_to_monitor_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<MonitorConfig, ConfigError> {
    let endpoint: url::Url = profile
        .endpoint
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("invalid URL: {}", profile.endpoint),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else if profile.insecure == Some(false) {
        TlsVerification::SystemDefaults
    } else {
        TlsVerification::DangerAcceptInvalid // local endpoints typically self-signed
    };

    let refresh_secs = profile.refresh_interval.unwrap_or(defaults.refresh_interval);
    if refresh_secs == 0 {
        return Err(ConfigError::Validation {
            field: "refresh_interval".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let timezone = profile.timezone.as_deref().unwrap_or(&defaults.timezone);
    let display_offset =
        timefmt::parse_offset(timezone).ok_or_else(|| ConfigError::Validation {
            field: "timezone".into(),
            reason: format!("expected a UTC offset like +05:30, got '{timezone}'"),
        })?;

    Ok(MonitorConfig {
        endpoint,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        refresh_interval: Duration::from_secs(refresh_secs),
        display_offset,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                endpoint: "https://status.example.net/api/Sites/SiteIPStatus".into(),
                timeout: Some(5),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults.refresh_interval, 30);
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = sample();

        save_config_to(&path, &cfg).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn partial_file_keeps_field_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[defaults]\ntimezone = \"UTC\"\n\n[profiles.lab]\nendpoint = \"https://10.0.0.5/status\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.timezone, "UTC");
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.profiles["lab"].endpoint, "https://10.0.0.5/status");
    }

    #[test]
    fn profile_lookup_uses_default_name() {
        let cfg = sample();
        let (name, profile) = cfg.profile(None).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile.timeout, Some(5));
        assert!(matches!(
            cfg.profile(Some("missing")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn monitor_config_merges_defaults() {
        let cfg = sample();
        let (_, profile) = cfg.profile(None).unwrap();
        let monitor = profile_to_monitor_config(profile, &cfg.defaults).unwrap();

        assert_eq!(monitor.timeout, Duration::from_secs(5));
        assert_eq!(monitor.refresh_interval, Duration::from_secs(30));
        assert_eq!(monitor.display_offset.local_minus_utc(), 5 * 3600 + 30 * 60);
        assert_eq!(monitor.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn tls_selection() {
        let defaults = Defaults::default();
        let strict = Profile {
            insecure: Some(false),
            ..Profile::default()
        };
        assert_eq!(
            profile_to_monitor_config(&strict, &defaults).unwrap().tls,
            TlsVerification::SystemDefaults
        );

        let ca = Profile {
            ca_cert: Some("/etc/ssl/site-ca.pem".into()),
            ..Profile::default()
        };
        assert_eq!(
            profile_to_monitor_config(&ca, &defaults).unwrap().tls,
            TlsVerification::CustomCa("/etc/ssl/site-ca.pem".into())
        );
    }

    #[test]
    fn rejects_invalid_values() {
        let defaults = Defaults::default();
        let cases = [
            (
                Profile {
                    endpoint: "not a url".into(),
                    ..Profile::default()
                },
                "endpoint",
            ),
            (
                Profile {
                    refresh_interval: Some(0),
                    ..Profile::default()
                },
                "refresh_interval",
            ),
            (
                Profile {
                    timezone: Some("Mars/Olympus".into()),
                    ..Profile::default()
                },
                "timezone",
            ),
        ];

        for (profile, expected) in cases {
            match profile_to_monitor_config(&profile, &defaults) {
                Err(ConfigError::Validation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected validation error for {expected}, got {other:?}"),
            }
        }
    }
}

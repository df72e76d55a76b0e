//! CLI configuration: thin wrapper around `sitewatch_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--endpoint, --insecure, --timeout).

use std::time::Duration;

use clap::ValueEnum;
use tracing::warn;

use sitewatch_core::{MonitorConfig, TlsVerification};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use sitewatch_config::{
    Config, Defaults, Profile, config_path, load_config, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Fill `--output` / `--color` from `[defaults]` when neither the flag
/// nor its env var was given.
pub fn apply_display_defaults(global: &mut GlobalOpts, defaults: &Defaults) {
    if global.output.is_none() {
        global.output = OutputFormat::from_str(&defaults.output, true)
            .inspect_err(|e| warn!(value = %defaults.output, error = %e, "ignoring defaults.output"))
            .ok();
    }
    if global.color.is_none() {
        global.color = ColorMode::from_str(&defaults.color, true)
            .inspect_err(|e| warn!(value = %defaults.color, error = %e, "ignoring defaults.color"))
            .ok();
    }
}

/// Build a `MonitorConfig` from the config file, profile and flags.
///
/// Flag overrides take priority over profile values, profile values
/// over `[defaults]`.
pub fn resolve_monitor_config(global: &GlobalOpts) -> Result<MonitorConfig, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let profile = match (cfg.profiles.get(&profile_name), &global.endpoint) {
        (Some(profile), _) => profile.clone(),
        // No profile -- a bare --endpoint is enough
        (None, Some(endpoint)) if global.profile.is_none() => Profile {
            endpoint: endpoint.clone(),
            ..Profile::default()
        },
        (None, _) if global.profile.is_some() => {
            let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        (None, _) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    apply_overrides(profile, &cfg.defaults, global)
}

fn apply_overrides(
    mut profile: Profile,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<MonitorConfig, CliError> {
    // Endpoint (flag > env > profile)
    if let Some(ref endpoint) = global.endpoint {
        profile.endpoint.clone_from(endpoint);
    }

    let mut monitor = sitewatch_config::profile_to_monitor_config(&profile, defaults)?;

    if global.insecure {
        monitor.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        monitor.timeout = Duration::from_secs(secs);
    }

    Ok(monitor)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["sitewatch"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "path"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_profile() {
        let profile = Profile {
            endpoint: "https://10.1.1.1/api/Sites/SiteIPStatus".into(),
            insecure: Some(false),
            timeout: Some(60),
            ..Profile::default()
        };
        let opts = global(&["--endpoint", "https://10.2.2.2/status", "-k", "--timeout", "5"]);

        let monitor = apply_overrides(profile, &Defaults::default(), &opts).unwrap();
        assert_eq!(monitor.endpoint.as_str(), "https://10.2.2.2/status");
        assert_eq!(monitor.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(monitor.timeout, Duration::from_secs(5));
    }

    #[test]
    fn profile_values_apply_without_flags() {
        let profile = Profile {
            insecure: Some(false),
            timeout: Some(60),
            ..Profile::default()
        };
        let monitor = apply_overrides(profile, &Defaults::default(), &global(&[])).unwrap();
        assert_eq!(monitor.tls, TlsVerification::SystemDefaults);
        assert_eq!(monitor.timeout, Duration::from_secs(60));
    }

    #[test]
    fn invalid_endpoint_flag_is_a_usage_error() {
        let err = apply_overrides(
            Profile::default(),
            &Defaults::default(),
            &global(&["--endpoint", "::nope::"]),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "endpoint"));
    }

    #[test]
    fn display_defaults_fill_missing_flags() {
        let defaults = Defaults {
            output: "json-compact".into(),
            color: "never".into(),
            ..Defaults::default()
        };

        let mut opts = global(&[]);
        apply_display_defaults(&mut opts, &defaults);
        assert!(matches!(opts.output_format(), OutputFormat::JsonCompact));
        assert!(matches!(opts.color_mode(), ColorMode::Never));

        let mut opts = global(&["-o", "yaml", "--color", "always"]);
        apply_display_defaults(&mut opts, &defaults);
        assert!(matches!(opts.output_format(), OutputFormat::Yaml));
        assert!(matches!(opts.color_mode(), ColorMode::Always));
    }

    #[test]
    fn unknown_display_defaults_fall_back() {
        let defaults = Defaults {
            output: "csv".into(),
            ..Defaults::default()
        };
        let mut opts = global(&[]);
        apply_display_defaults(&mut opts, &defaults);
        assert!(matches!(opts.output_format(), OutputFormat::Table));
        assert!(matches!(opts.color_mode(), ColorMode::Auto));
    }
}

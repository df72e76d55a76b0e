//! Config subcommand handlers.

use dialoguer::{Confirm, Input};

use sitewatch_core::config::DEFAULT_ENDPOINT;
use sitewatch_core::timefmt;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config as TOML-like text with profiles in name order.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "refresh_interval = {}", cfg.defaults.refresh_interval);
    let _ = writeln!(out, "timezone = \"{}\"", cfg.defaults.timezone);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "endpoint = \"{}\"", p.endpoint);
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(interval) = p.refresh_interval {
            let _ = writeln!(out, "refresh_interval = {interval}");
        }
        if let Some(ref tz) = p.timezone {
            let _ = writeln!(out, "timezone = \"{tz}\"");
        }
    }

    out.trim_end().to_owned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            if config_path.exists()
                && !util::confirm(
                    &format!("Overwrite profiles in {}?", config_path.display()),
                    global.yes,
                )?
            {
                return Ok(());
            }

            eprintln!("sitewatch configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Endpoint
            let endpoint: String = Input::new()
                .with_prompt("Status endpoint URL")
                .default(global.endpoint.clone().unwrap_or_else(|| DEFAULT_ENDPOINT.into()))
                .validate_with(|input: &String| -> Result<(), String> {
                    url::Url::parse(input)
                        .map(|_| ())
                        .map_err(|e| format!("invalid URL: {e}"))
                })
                .interact_text()
                .map_err(prompt_err)?;

            // 3. TLS
            let insecure = Confirm::new()
                .with_prompt("Accept self-signed certificates?")
                .default(true)
                .interact()
                .map_err(prompt_err)?;

            // 4. Poll period
            let refresh_interval: u64 = Input::new()
                .with_prompt("Refresh interval (seconds)")
                .default(30)
                .validate_with(|secs: &u64| -> Result<(), &str> {
                    if *secs == 0 {
                        Err("must be at least 1 second")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()
                .map_err(prompt_err)?;

            // 5. Display offset
            let timezone: String = Input::new()
                .with_prompt("Display UTC offset")
                .default("+05:30".into())
                .validate_with(|input: &String| -> Result<(), &str> {
                    timefmt::parse_offset(input)
                        .map(|_| ())
                        .ok_or("expected an offset like +05:30 or UTC")
                })
                .interact_text()
                .map_err(prompt_err)?;

            let profile = Profile {
                endpoint,
                insecure: Some(insecure),
                refresh_interval: Some(refresh_interval),
                timezone: Some(timezone),
                ..Profile::default()
            };

            // 6. Merge into the existing config and write
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: sitewatch sites list");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output_format(), &cfg, format_config, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

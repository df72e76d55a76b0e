mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::path::PathBuf;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let guard = init_tracing(&cli);
    let result = run(cli).await;
    drop(guard);

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Stderr logging for one-shot commands. `watch` owns the terminal, so
/// its logs go to a file; the returned guard flushes it on drop.
fn init_tracing(cli: &Cli) -> Option<WorkerGuard> {
    let level = match cli.global.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Command::Watch(args) = &cli.command {
        let path = args
            .log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("sitewatch.log"));
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), PathBuf::from);
        let file_name = path
            .file_name()
            .unwrap_or(std::ffi::OsStr::new("sitewatch.log"));

        let file_appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .init();
        return Some(guard);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    None
}

async fn run(mut cli: Cli) -> Result<(), CliError> {
    config::apply_display_defaults(&mut cli.global, &config::load_config_or_default().defaults);

    match cli.command {
        // Config commands don't need an endpoint
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "sitewatch", &mut std::io::stdout());
            Ok(())
        }

        // Everything else polls the status endpoint
        cmd => {
            let monitor = config::resolve_monitor_config(&cli.global)?;

            tracing::debug!(command = ?cmd, endpoint = %monitor.endpoint, "dispatching command");
            commands::dispatch(cmd, monitor, &cli.global).await
        }
    }
}

use std::fs;
use std::io;
use std::path::Path;

use clap::{CommandFactory, ValueEnum};
use clap_complete::Shell;

// The clap tree has no crate-internal imports, so the build script can
// compile it on its own.
#[path = "src/cli.rs"]
mod cli;

fn main() -> io::Result<()> {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let Some(out_dir) = std::env::var_os("OUT_DIR") else {
        return Err(io::Error::other("OUT_DIR is not set"));
    };
    let out_dir = Path::new(&out_dir);

    let mut cmd = cli::Cli::command();
    cmd.build();

    // $OUT_DIR/man/sitewatch.1, sitewatch-sites.1, sitewatch-sites-list.1, ...
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;
    write_manpages(&cmd, &cmd.get_name().to_owned(), &man_dir)?;

    // $OUT_DIR/completions/{sitewatch.bash,_sitewatch,sitewatch.fish,...}
    let completion_dir = out_dir.join("completions");
    fs::create_dir_all(&completion_dir)?;
    for &shell in Shell::value_variants() {
        clap_complete::generate_to(shell, &mut cmd, "sitewatch", &completion_dir)?;
    }

    Ok(())
}

/// Render `cmd` as `<page>.1`, then every visible subcommand beneath it
/// as `<page>-<sub>.1`.
fn write_manpages(cmd: &clap::Command, page: &str, dir: &Path) -> io::Result<()> {
    let mut roff = Vec::new();
    clap_mangen::Man::new(cmd.clone().name(page.to_owned())).render(&mut roff)?;
    fs::write(dir.join(format!("{page}.1")), roff)?;

    for sub in cmd.get_subcommands().filter(|sub| !sub.is_hide_set()) {
        write_manpages(sub, &format!("{page}-{}", sub.get_name()), dir)?;
    }
    Ok(())
}

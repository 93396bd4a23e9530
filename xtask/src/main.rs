use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use xshell::Shell;

mod commands;

/// Developer tasks for the tripod workspace
#[derive(Parser)]
#[command(name = "xtask")]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;
    // Commands assume they run from the workspace root.
    sh.change_dir(workspace_root()?);

    cli.command.run(&sh)
}

fn workspace_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask manifest has no parent directory")
}

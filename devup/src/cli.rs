use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// devup — bootstrap a local dev environment and run the web app
#[derive(Parser, Debug)]
#[command(name = "devup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Defaults to `up` when no subcommand is given.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision the environment, install dependencies, launch the app (default)
    Up(UpArgs),

    /// Preflight: interpreter, environment and manifest, without launching
    Check(CheckArgs),

    /// Remove the environment directory
    Clean(CleanArgs),
}

#[derive(Args, Debug, Default)]
pub struct UpArgs {
    /// Virtual environment directory (default: venv)
    #[arg(long, value_name = "DIR")]
    pub env_dir: Option<PathBuf>,

    /// Dependency manifest (default: requirements.txt)
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Application spec, module:attribute (default: main:app)
    #[arg(long, value_name = "MOD:ATTR")]
    pub app: Option<String>,

    /// Bind address (default: 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (default: 8000)
    #[arg(long)]
    pub port: Option<u16>,

    /// Combined-output log file (default: server.log)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Disable auto-reload
    #[arg(long, default_value = "false")]
    pub no_reload: bool,

    /// Reinstall dependencies even when the manifest is unchanged
    #[arg(long, default_value = "false")]
    pub force_install: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Virtual environment directory (default: venv)
    #[arg(long, value_name = "DIR")]
    pub env_dir: Option<PathBuf>,

    /// Dependency manifest (default: requirements.txt)
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Virtual environment directory (default: venv)
    #[arg(long, value_name = "DIR")]
    pub env_dir: Option<PathBuf>,

    /// List what would be removed without removing anything
    #[arg(long, default_value = "false")]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(long, default_value = "false")]
    pub force: bool,
}

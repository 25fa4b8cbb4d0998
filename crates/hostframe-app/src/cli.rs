use std::path::PathBuf;

use clap::Parser;

/// Hostframe: run sandboxed web applications bridged to a native host.
#[derive(Parser, Debug)]
#[command(name = "hostframe", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive (e.g. `debug` or `hostframe_bridge=trace`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Application to launch instead of `[app] launch`.
    #[arg(long)]
    pub app: Option<String>,

    /// Print registered applications and exit.
    #[arg(long)]
    pub list_apps: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// Scrivener dictation backend
#[derive(Debug, Parser)]
#[command(name = "scrivener", about = "Voice dictation backend: transcription and template merge")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "scrivener.toml", env = "SCRIVENER_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "SCRIVENER_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter directives
    #[arg(long, default_value = "info", env = "SCRIVENER_LOG")]
    pub log_filter: String,
}

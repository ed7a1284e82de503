//! Command line definition of `keymapper-control`

use clap::Parser;
use keymapper_common::ipc_client::{DEFAULT_SOCKET_PATH, DEFAULT_TIMEOUT_MS};
use std::path::PathBuf;

/// Control the key-mapper daemon: start, stop or autoload device mappings
#[derive(Parser, Debug, Clone)]
#[command(name = "keymapper-control", version)]
pub struct Cli {
    /// One of autoload, start, stop, stop-all, hello
    #[arg(long, value_name = "NAME")]
    pub command: Option<String>,

    /// Use this configuration directory, it must contain config.json
    #[arg(long, value_name = "PATH")]
    pub config_dir: Option<PathBuf>,

    /// Preset to inject, required by start
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Device to operate on, required by start and stop
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,

    /// List available input devices and exit
    #[arg(long)]
    pub list_devices: bool,

    /// Print all available names for the mapping and exit
    #[arg(short = 'n', long)]
    pub key_names: bool,

    /// Daemon socket
    #[arg(long, env = "KEYMAPPER_SOCKET", value_name = "PATH", default_value = DEFAULT_SOCKET_PATH)]
    pub socket: PathBuf,

    /// Timeout of each daemon operation in milliseconds
    #[arg(long, env = "KEYMAPPER_TIMEOUT_MS", value_name = "MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout: u64,

    /// Display debug messages
    #[arg(short, long)]
    pub debug: bool,
}

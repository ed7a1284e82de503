//! Key-mapper Control - Main Entry Point
//!
//! Tells the key-mapper daemon to start, stop or autoload device mappings,
//! and lists devices and key names without needing the daemon.

use clap::Parser;
use keymapper_control::{logging, Cli, Outcome};
use std::io;
use std::process::ExitCode;
use tracing::{debug, error};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    logging::init(cli.debug);

    // Query output goes to stdout, logs go to stderr
    let mut stdout = io::stdout().lock();
    match keymapper_control::run(cli, &mut stdout).await {
        Ok(Outcome::Succeeded) => ExitCode::SUCCESS,
        Ok(outcome @ Outcome::DaemonUnreachable) => {
            debug!("Nothing to do without a daemon");
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

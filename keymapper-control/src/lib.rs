//! Key-mapper control library
//!
//! Everything `keymapper-control` does for one invocation:
//! - Resolving the authoritative configuration directory
//! - Device and key name listings that work without a daemon
//! - Validating the requested command and its parameters
//! - Acquiring a daemon handle and dispatching the command to it

pub mod cli;
pub mod command;
pub mod config;
pub mod daemon;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod query;

pub use cli::Cli;
pub use command::{Command, CommandName};
pub use config::ControlConfig;
pub use daemon::{DaemonProxy, IpcDaemon};
pub use dispatch::{Caller, Outcome};
pub use error::ControlError;

use keymapper_common::ipc_client::IpcClient;
use std::io::Write;

/// Run one invocation as the current user
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> Result<Outcome, ControlError> {
    run_as(cli, out, Caller::current()).await
}

/// Run one invocation on behalf of `caller`
///
/// Input errors are reported before the daemon is contacted. An unreachable
/// daemon is not an error: the command becomes a no-op and
/// [`Outcome::DaemonUnreachable`] is returned.
pub async fn run_as<W: Write>(
    cli: Cli,
    out: &mut W,
    caller: Caller,
) -> Result<Outcome, ControlError> {
    // Resolve the configuration first, a bad override fails every invocation
    let config = ControlConfig::resolve(cli.config_dir.as_deref())?;

    // Queries that never need the daemon
    if cli.list_devices {
        query::list_devices(out)?;
        return Ok(Outcome::Succeeded);
    }

    if cli.key_names {
        query::list_key_names(out)?;
        return Ok(Outcome::Succeeded);
    }

    // Validate the command before any daemon contact
    let command = Command::parse(cli.command.as_deref(), cli.device, cli.preset)?;

    // Acquire the daemon, its absence turns the command into a no-op
    let client = IpcClient::with_socket_path(&cli.socket).with_timeout(cli.timeout);
    let daemon = match daemon::acquire(client, false).await {
        Ok(Some(daemon)) => daemon,
        Ok(None) | Err(ControlError::DaemonUnreachable(_)) => {
            return Ok(Outcome::DaemonUnreachable);
        }
        Err(e) => return Err(e),
    };

    // Dispatch
    dispatch::dispatch(&daemon, &command, &config, caller).await
}

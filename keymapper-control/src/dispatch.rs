//! Dispatch of one validated command onto a daemon handle

use crate::command::Command;
use crate::config::ControlConfig;
use crate::daemon::DaemonProxy;
use crate::error::ControlError;
use tracing::{debug, info};

/// Payload round-tripped by the `hello` command
pub const HELLO_PAYLOAD: &str = "hello";

/// How an invocation ended, when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The daemon carried out the command
    Succeeded,
    /// No daemon was reachable, nothing was done
    DaemonUnreachable,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        0
    }
}

/// Who is running the invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// A regular user session
    User,
    /// The privileged system account, typically udev or systemd automation
    Privileged,
}

impl Caller {
    /// Determine the caller from the real uid of this process
    pub fn current() -> Self {
        if nix::unistd::getuid().is_root() {
            Caller::Privileged
        } else {
            Caller::User
        }
    }
}

/// Run `command` against `daemon`
///
/// Unless the caller is privileged, the daemon is first told which
/// configuration directory is authoritative. That push happens once, whatever
/// the command.
pub async fn dispatch<D>(
    daemon: &D,
    command: &Command,
    config: &ControlConfig,
    caller: Caller,
) -> Result<Outcome, ControlError>
where
    D: DaemonProxy + ?Sized,
{
    if caller == Caller::User {
        debug!("Telling the daemon to use {}", config.config_dir().display());
        daemon.set_config_dir(config.config_dir()).await?;
    }

    match command {
        Command::Autoload { device: None } => {
            info!("Autoloading all devices");
            daemon.autoload().await?;
        }
        Command::Autoload { device: Some(device) } => {
            info!("Autoloading \"{}\"", device);
            daemon.autoload_single(device).await?;
        }
        Command::Start { device, preset } => {
            info!("Starting injection: \"{}\", \"{}\"", device, preset);
            daemon.start_injecting(device, preset).await?;
        }
        Command::Stop { device } => {
            info!("Stopping injection for \"{}\"", device);
            daemon.stop_injecting(device).await?;
        }
        Command::StopAll => {
            info!("Stopping all injections");
            daemon.stop_all().await?;
        }
        Command::Hello => {
            let response = daemon.hello(HELLO_PAYLOAD).await?;
            info!("Daemon answered with \"{}\"", response);
        }
    }

    Ok(Outcome::Succeeded)
}

use keymapper_common::IpcError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a control invocation
#[derive(Error, Debug)]
pub enum ControlError {
    #[error("\"{}\" does not exist", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("configuration directory \"{}\" is not valid UTF-8 and cannot be sent to the daemon", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("--{0} is required for this command")]
    MissingParameter(&'static str),

    #[error("unknown command \"{0}\", expected one of: autoload, start, stop, stop-all, hello")]
    UnknownCommand(String),

    #[error("no command given, use --command, --list-devices or --key-names")]
    NoCommand,

    #[error("daemon not reachable at {0}")]
    DaemonUnreachable(String),

    #[error("communication with the daemon failed: {0}")]
    Transport(#[source] IpcError),

    #[error("daemon rejected the request: {0}")]
    DaemonRejected(String),

    #[error("unexpected response from the daemon to {0}")]
    UnexpectedResponse(&'static str),

    #[error("failed to scan input devices: {0}")]
    DeviceScan(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ControlError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            // soft no-op, the invocation may come from an automatic trigger
            ControlError::DaemonUnreachable(_) => 0,
            _ => 1,
        }
    }
}

impl From<IpcError> for ControlError {
    fn from(err: IpcError) -> Self {
        ControlError::Transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_fatal() {
        assert_eq!(ControlError::ConfigNotFound(PathBuf::from("/nope/config.json")).exit_code(), 1);
        assert_eq!(ControlError::MissingParameter("device").exit_code(), 1);
        assert_eq!(ControlError::UnknownCommand("reboot".to_string()).exit_code(), 1);
        assert_eq!(ControlError::NoCommand.exit_code(), 1);
        assert_eq!(ControlError::NonUtf8Path(PathBuf::from("/a")).exit_code(), 1);
    }

    #[test]
    fn test_transport_failures_are_fatal() {
        let err = ControlError::from(IpcError::OperationTimeout(5000));
        assert!(matches!(err, ControlError::Transport(_)));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(ControlError::DaemonRejected("busy".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_daemon_vanishing_mid_invocation_is_a_transport_error() {
        let err = ControlError::from(IpcError::DaemonNotRunning("/run/x.sock".to_string()));
        assert!(matches!(err, ControlError::Transport(_)));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(ControlError::DaemonUnreachable("/run/x.sock".to_string()).exit_code(), 0);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ControlError::MissingParameter("preset").to_string(),
            "--preset is required for this command"
        );
        assert_eq!(
            ControlError::ConfigNotFound(PathBuf::from("/a/config.json")).to_string(),
            "\"/a/config.json\" does not exist"
        );
    }
}

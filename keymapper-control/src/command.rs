use crate::error::ControlError;
use std::str::FromStr;

/// The closed set of commands the daemon can be given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    Autoload,
    Start,
    Stop,
    StopAll,
    Hello,
}

impl CommandName {
    pub const ALL: [CommandName; 5] = [
        CommandName::Autoload,
        CommandName::Start,
        CommandName::Stop,
        CommandName::StopAll,
        CommandName::Hello,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandName::Autoload => "autoload",
            CommandName::Start => "start",
            CommandName::Stop => "stop",
            CommandName::StopAll => "stop-all",
            CommandName::Hello => "hello",
        }
    }
}

impl FromStr for CommandName {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ControlError::UnknownCommand(s.to_string()))
    }
}

/// A command together with the parameters it needs, validated before any
/// daemon contact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Autoload every known device, or only `device` when given
    Autoload { device: Option<String> },
    Start { device: String, preset: String },
    Stop { device: String },
    StopAll,
    Hello,
}

impl Command {
    /// Build a command from its name and the optional `--device`/`--preset`
    ///
    /// `--device` is checked before `--preset`.
    pub fn new(
        name: CommandName,
        device: Option<String>,
        preset: Option<String>,
    ) -> Result<Self, ControlError> {
        let command = match name {
            CommandName::Autoload => Command::Autoload { device },
            CommandName::Start => Command::Start {
                device: device.ok_or(ControlError::MissingParameter("device"))?,
                preset: preset.ok_or(ControlError::MissingParameter("preset"))?,
            },
            CommandName::Stop => Command::Stop {
                device: device.ok_or(ControlError::MissingParameter("device"))?,
            },
            CommandName::StopAll => Command::StopAll,
            CommandName::Hello => Command::Hello,
        };

        Ok(command)
    }

    /// Parse the raw `--command` value and validate its parameters
    pub fn parse(
        raw: Option<&str>,
        device: Option<String>,
        preset: Option<String>,
    ) -> Result<Self, ControlError> {
        let name: CommandName = raw.ok_or(ControlError::NoCommand)?.parse()?;
        Self::new(name, device, preset)
    }
}

//! Inbound admin commands.
//!
//! The command channel delivers JSON messages like
//! `{"Type": "admin", "command": "get_update", "module": "fx.py",
//! "file_url": "https://…"}`. Parsing turns them into one enumerated
//! [`Command`] so dispatch is a single exhaustive match — every command is
//! provably handled at compile time.
//!
//! Light-control messages (`Type` other than `admin`) belong to the LED
//! subsystem and are reported as unrouted here.

use core::fmt;

use serde_json::Value;

/// Commands the update engine accepts from the command channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch a module from `url` and install it if its content differs.
    UpdateModule { module: String, url: String },
    /// Liveness probe; answered with `alive`.
    Echo,
    /// Report the running firmware version.
    GetVersion,
    /// Restart the device.
    Reboot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Message was not valid JSON or not a mapping.
    Malformed,
    /// `Type` is missing or addressed to another subsystem.
    Unrouted,
    /// `command` is missing or not recognised.
    UnknownCommand,
    /// A required field for the command was missing or mistyped.
    MissingField(&'static str),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed message"),
            Self::Unrouted => write!(f, "message not addressed to the update engine"),
            Self::UnknownCommand => write!(f, "command not found"),
            Self::MissingField(field) => write!(f, "missing field '{field}'"),
        }
    }
}

impl Command {
    /// Parse one raw command message.
    pub fn parse(raw: &str) -> Result<Self, CommandError> {
        let message: Value = serde_json::from_str(raw).map_err(|_| CommandError::Malformed)?;
        let Some(message) = message.as_object() else {
            return Err(CommandError::Malformed);
        };

        if message.get("Type").and_then(Value::as_str) != Some("admin") {
            return Err(CommandError::Unrouted);
        }

        match message.get("command").and_then(Value::as_str) {
            Some("get_update") => {
                let module = message
                    .get("module")
                    .and_then(Value::as_str)
                    .unwrap_or(crate::config::ENTRY_MODULE)
                    .to_owned();
                let url = message
                    .get("file_url")
                    .and_then(Value::as_str)
                    .ok_or(CommandError::MissingField("file_url"))?
                    .to_owned();
                Ok(Self::UpdateModule { module, url })
            }
            Some("echo") => Ok(Self::Echo),
            Some("get_version") => Ok(Self::GetVersion),
            Some("reboot") => Ok(Self::Reboot),
            _ => Err(CommandError::UnknownCommand),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────

//! Structured command replies.
//!
//! Every handled message produces one [`CommandReply`]; the surrounding
//! pub/sub transport serialises it onto the status topic. The engine never
//! formats human-readable strings deep inside a walk — callers build them
//! from these values.

use serde::Serialize;

use crate::update::UpdateStatus;

/// Reply sent back over the command channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reply")]
pub enum CommandReply {
    /// Answer to `echo`.
    Alive,
    /// Answer to `get_version`.
    Version { version: String },
    /// Outcome of a module update request.
    Update { module: String, status: UpdateStatus },
    /// A restart was accepted and will fire once this reply drains.
    Restarting,
    /// The message could not be interpreted; `reason` is caller-visible.
    Rejected { reason: String },
}

//! Port traits — the hexagonal boundary between the update engine and the
//! outside world.
//!
//! Driven adapters (HTTP client, reset line) implement these traits; the
//! [`AppService`](super::service::AppService) and
//! [`ModuleUpdater`](crate::update::ModuleUpdater) consume them via
//! generics, so the core never touches the network or the reset hardware
//! directly.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Fetch port (driven adapter: domain → network)
// ───────────────────────────────────────────────────────────────

/// One whole-body HTTP GET. Implementations must bound the request with a
/// timeout — an expired timeout surfaces as [`FetchError::Timeout`], never
/// as a hang.
pub trait FetchPort {
    fn fetch(&mut self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// Status code plus complete payload. The engine only ever checks
/// `status == 200`; headers are not exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchError {
    /// No complete response within the adapter's timeout.
    Timeout,
    /// Connection could not be established or broke mid-transfer.
    Connection,
    /// The URL was not something the adapter could request.
    BadUrl,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Connection => write!(f, "connection failed"),
            Self::BadUrl => write!(f, "bad URL"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Command channel port (driven adapter: domain ↔ pub/sub transport)
// ───────────────────────────────────────────────────────────────

/// The messaging collaborator: delivers raw inbound command messages and
/// carries structured replies back to the status topic. The transport
/// (MQTT in production) lives outside this crate; the engine only accepts
/// a request and returns a status value.
pub trait CommandChannelPort {
    /// Non-blocking poll for the next inbound message, if any.
    fn poll_message(&mut self) -> Option<String>;

    /// Publish a reply. Delivery guarantees are the transport's problem;
    /// failures here never affect the engine's filesystem state.
    fn publish_reply(&mut self, reply: &crate::app::events::CommandReply);
}

// ───────────────────────────────────────────────────────────────
// Restart port (driven adapter: domain → reset line)
// ───────────────────────────────────────────────────────────────

/// Pulls the reset line. On real hardware this does not return. The
/// service invokes it at most once per process lifetime, only after
/// persistence is confirmed durable and the triggering command's reply has
/// been published.
pub trait RestartPort {
    fn request_restart(&mut self);
}

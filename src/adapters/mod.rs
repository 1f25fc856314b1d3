//! Driven adapters implementing the `app::ports` traits.
//!
//! ESP-IDF backends are compiled only for the device; the host keeps the
//! simulation restart adapter for tests and tooling.

pub mod channel;
pub mod restart;

#[cfg(target_os = "espidf")]
pub mod http;

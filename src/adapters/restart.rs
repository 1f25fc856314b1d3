//! Restart adapters.
//!
//! On the device this pulls the reset line through ESP-IDF; restart is an
//! unconditional, non-cancellable terminal action, so the service only
//! invokes it after persistence is confirmed durable. The simulation
//! adapter records the request instead of resetting the host.

use log::info;

use crate::app::ports::RestartPort;

#[cfg(target_os = "espidf")]
pub struct EspRestart;

#[cfg(target_os = "espidf")]
impl RestartPort for EspRestart {
    fn request_restart(&mut self) {
        info!("RESET | restarting device");
        // SAFETY: esp_restart performs a clean soft reset and does not
        // return; all commits are already durable when we get here.
        unsafe { esp_idf_svc::sys::esp_restart() };
    }
}

/// Host-side stand-in: records that a restart was requested.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct SimRestart {
    pub requested: bool,
}

#[cfg(not(target_os = "espidf"))]
impl SimRestart {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(not(target_os = "espidf"))]
impl RestartPort for SimRestart {
    fn request_restart(&mut self) {
        info!("RESET | restart requested (simulation)");
        self.requested = true;
    }
}

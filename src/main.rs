//! LedLink firmware — device entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │   EspHttpFetch        EspRestart        MQTT transport   │
//! │   (FetchPort)         (RestartPort)     (CommandChannel) │
//! │                                                          │
//! │  ───────────────── Port Trait Boundary ───────────────   │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │            AppService (pure logic)                 │  │
//! │  │  Migrator · ModuleUpdater · command dispatch       │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Boot order matters: the configuration migration runs to completion
//! before WiFi/MQTT come up, so the migrator never races network traffic.

use std::time::Duration;

use anyhow::Result;
use log::{info, warn};

use ledlink::adapters::http::EspHttpFetch;
use ledlink::adapters::restart::EspRestart;
use ledlink::app::service::AppService;
use ledlink::config;
use ledlink::migrate::Migrator;
use ledlink::update::ModuleUpdater;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("LedLink v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration migration (before any network I/O) ──
    let migrator = Migrator::new(config::CONFIG_PATH, config::schema_diff())
        .with_target_version(config::TARGET_SCHEMA_VERSION);
    let updater = ModuleUpdater::new(config::MODULE_DIR, config::ENTRY_MODULE);
    let mut service = AppService::new(migrator, updater);

    match service.boot() {
        Ok(outcome) => info!("config migration: {outcome:?}"),
        // Not fatal: keep running on the previous configuration.
        Err(e) => warn!("config migration failed: {e}"),
    }

    // ── 3. Command loop ───────────────────────────────────────
    //
    // The WiFi/MQTT transport task owns the socket; it feeds inbound admin
    // messages through the `TransportHandle` and publishes the replies it
    // drains from it. Each pass here pumps at most one message.
    let (mut channel, transport) = ledlink::adapters::channel::queue_channel();
    spawn_transport_task(transport);
    let mut fetch = EspHttpFetch::new(FETCH_TIMEOUT);
    let mut restart = EspRestart;

    loop {
        if !service.poll_channel(&mut channel, &mut fetch, &mut restart) {
            esp_idf_hal::delay::FreeRtos::delay_ms(100);
        }
    }
}

/// Hand the queue endpoints to the comms component (WiFi association +
/// MQTT client, provisioned outside this crate). Until that component is
/// linked into the image, the handle is dropped and the dispatch loop
/// simply idles.
fn spawn_transport_task(handle: ledlink::adapters::channel::TransportHandle) {
    drop(handle);
}

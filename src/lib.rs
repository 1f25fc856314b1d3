//! LedLink firmware library.
//!
//! Safe configuration & module update engine for a WiFi/MQTT LED
//! controller: an additive schema-diff migrator for the persisted
//! `config.json`, an atomic file-commit primitive, and the remote module
//! update flow. LED rendering, WiFi association and the MQTT transport are
//! external collaborators behind the `app::ports` traits.
//!
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module; the crate builds and tests on the host unchanged.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod migrate;
pub mod storage;
pub mod update;

pub mod adapters;

//! Application core: commands in, replies out, ports at the boundary.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;

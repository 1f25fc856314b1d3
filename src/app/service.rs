//! Application service — the hexagonal core of the update engine.
//!
//! [`AppService`] owns the migrator and the module updater. The boot path
//! runs the configuration migration before any network activity; the
//! dispatch path turns one command message into one structured reply. All
//! I/O beyond the filesystem flows through port traits injected at call
//! sites, making the whole service testable with mock adapters.
//!
//! The command channel is single-threaded by construction: a message is
//! dispatched and this service runs to completion before the next one, so
//! at most one update is in flight at a time. A restart never executes
//! mid-dispatch — commands only schedule it, and [`AppService::poll_channel`]
//! pulls the reset line after the reply has been handed to the transport.

use log::{info, warn};

use crate::error::{Error, Result};
use crate::migrate::{MigrationOutcome, Migrator};
use crate::update::{ModuleUpdater, UpdateStatus};

use super::commands::Command;
use super::events::CommandReply;
use super::ports::{CommandChannelPort, FetchPort, RestartPort};

/// Orchestrates migration at boot and update commands at runtime.
pub struct AppService {
    migrator: Migrator,
    updater: ModuleUpdater,
    restart_requested: bool,
    restart_fired: bool,
}

impl AppService {
    pub fn new(migrator: Migrator, updater: ModuleUpdater) -> Self {
        Self {
            migrator,
            updater,
            restart_requested: false,
            restart_fired: false,
        }
    }

    // ── Boot ──────────────────────────────────────────────────

    /// Run the configuration migration. Call before the network comes up.
    ///
    /// A storage failure is surfaced to the caller but is not fatal to the
    /// process — the device keeps running on the previous configuration.
    pub fn boot(&self) -> Result<MigrationOutcome> {
        let outcome = self.migrator.run()?;
        info!("BOOT | migration outcome: {outcome:?}");
        Ok(outcome)
    }

    // ── Command handling ──────────────────────────────────────

    /// Handle one raw message from the command channel.
    ///
    /// Never touches the reset line: a restart requested by the command is
    /// only scheduled here and fires in [`Self::poll_channel`] once the
    /// reply is out.
    pub fn handle_message(&mut self, raw: &str, fetch: &mut impl FetchPort) -> CommandReply {
        match Command::parse(raw) {
            Ok(cmd) => self.handle_command(cmd, fetch),
            Err(e) => {
                let err = Error::from(e);
                warn!("CMD | rejected message: {err}");
                CommandReply::Rejected {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Dispatch one parsed command. Exhaustive by construction — adding a
    /// command variant without handling it here fails to compile.
    pub fn handle_command(&mut self, cmd: Command, fetch: &mut impl FetchPort) -> CommandReply {
        match cmd {
            Command::Echo => CommandReply::Alive,
            Command::GetVersion => CommandReply::Version {
                version: env!("CARGO_PKG_VERSION").to_owned(),
            },
            Command::Reboot => {
                info!("CMD | reboot requested");
                self.schedule_restart();
                CommandReply::Restarting
            }
            Command::UpdateModule { module, url } => {
                let status = self.updater.update_module(fetch, &module, &url);
                if let UpdateStatus::Updated {
                    restart_required: true,
                } = status
                {
                    // Persistence is durable at this point; the restart
                    // waits until the reply has been published.
                    self.schedule_restart();
                }
                CommandReply::Update { module, status }
            }
        }
    }

    /// Pump at most one message from the command channel through the
    /// engine. The reply is published first; only then does a scheduled
    /// restart fire — on real hardware the reset does not return, so
    /// anything not yet handed to the transport at that point would be
    /// lost. Returns `true` when a message was handled — the caller's loop
    /// can back off when idle.
    pub fn poll_channel(
        &mut self,
        channel: &mut impl CommandChannelPort,
        fetch: &mut impl FetchPort,
        restart: &mut impl RestartPort,
    ) -> bool {
        let Some(raw) = channel.poll_message() else {
            return false;
        };
        let reply = self.handle_message(&raw, fetch);
        channel.publish_reply(&reply);
        self.fire_restart(restart);
        true
    }

    /// Whether a restart has been scheduled this process lifetime.
    pub fn restart_requested(&self) -> bool {
        self.restart_requested
    }

    // ── Internal ──────────────────────────────────────────────

    fn schedule_restart(&mut self) {
        if self.restart_requested {
            warn!("CMD | restart already scheduled, ignoring");
            return;
        }
        self.restart_requested = true;
    }

    // Restart is a terminal action; the port is invoked at most once, and
    // only with the triggering reply already published.
    fn fire_restart(&mut self, restart: &mut impl RestartPort) {
        if self.restart_requested && !self.restart_fired {
            self.restart_fired = true;
            restart.request_restart();
        }
    }
}

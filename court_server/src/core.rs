// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::content::Catalog;
use crate::health::Health;
use crate::repo::Repo;
use actix::prelude::*;
use court_protocol::UnixTime;
use log::{error, info};
use std::process;
use std::time::Duration;

/// Tunables shared by every game operation.
pub struct Settings {
    /// Fewest players required to close recruitment.
    pub min_players: u32,
    /// Idle time in milliseconds after which the reaper deletes a session.
    pub game_timeout: UnixTime,
    pub catalog: Catalog,
}

/// The core actor owns all game state. Assume these fields are synchronized
/// via actor, so Mutex is not required.
pub struct Core {
    pub repo: Repo,
    pub settings: Settings,
    sweep_interval: Duration,
    pub health: Health,
}

impl Core {
    pub fn new(settings: Settings, sweep_interval: Duration) -> Self {
        Self {
            repo: Repo::new(),
            settings,
            sweep_interval,
            health: Health::default(),
        }
    }

    fn start_timers(&self, ctx: &mut <Self as Actor>::Context) {
        ctx.run_interval(self.sweep_interval, |act, _ctx| {
            let pruned = act.repo.prune_sessions(act.settings.game_timeout);
            if !pruned.is_empty() {
                info!("reaped {} idle game(s)", pruned.len());
            }
        });
    }
}

impl Actor for Core {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("core started");

        // Keeps the gateway from overwhelming the game loop.
        ctx.set_mailbox_capacity(256);

        self.start_timers(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        error!("core stopped");

        // The whole process is useless without the core.
        process::exit(1);
    }
}

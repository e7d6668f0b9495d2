// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::time::{Duration, Instant};
use sysinfo::{ProcessorExt, RefreshKind, System, SystemExt};

/// Tracks whether this process is in a fit state to host games, based on
/// host cpu and ram pressure. Probing is expensive, so readings are cached.
pub struct Health {
    system: System,
    probed: Instant,
    /// Worst of cpu and ram usage, from 0 to 1.
    load: f32,
}

impl Health {
    const CACHE: Duration = Duration::from_secs(30);

    /// Load above which the server reports itself unhealthy.
    const LIMIT: f32 = 0.8;

    /// False if the server is overloaded and should be replaced.
    pub fn healthy(&mut self) -> bool {
        self.probe_if_stale();
        self.load <= Self::LIMIT
    }

    fn probe_if_stale(&mut self) {
        if self.probed.elapsed() <= Self::CACHE {
            return;
        }
        self.probed = Instant::now();
        self.system.refresh_cpu();
        self.system.refresh_memory();
        let ram = self.system.used_memory() as f32 / self.system.total_memory() as f32;
        let processors = self.system.processors();
        let cpu = processors
            .iter()
            .map(|processor| processor.cpu_usage())
            .sum::<f32>()
            * 0.01
            / processors.len().max(1) as f32;
        self.load = cpu.max(ram);
    }
}

impl Default for Health {
    fn default() -> Self {
        Self {
            system: System::new_with_specifics(RefreshKind::new().with_cpu().with_memory()),
            // Force a probe on first use.
            probed: Instant::now() - Self::CACHE * 2,
            load: 0.0,
        }
    }
}

// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;
use structopt::StructOpt;

/// Server options, for consumption by structopt.
#[derive(Debug, StructOpt)]
pub struct Options {
    /// Fewest players required to close recruitment.
    #[structopt(long, default_value = "3")]
    pub min_players: u32,
    /// Directory holding situations.json, witnesses.json and conclusions.json.
    #[structopt(long, default_value = "data", parse(from_os_str))]
    pub content_dir: PathBuf,
    /// Seconds of inactivity after which a game is reaped.
    #[structopt(long, default_value = "3600")]
    pub game_timeout_secs: u64,
    /// Seconds between reaper passes.
    #[structopt(long, default_value = "300")]
    pub sweep_interval_secs: u64,
    #[structopt(long, default_value = "8192")]
    pub http_port: u16,
}

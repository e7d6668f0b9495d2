// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use court_protocol::dto::{ConclusionDto, ScenarioDto, WitnessDto};
use log::{info, warn};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// All static game content, loaded once at startup and shared immutably with
/// every session. Empty lists are tolerated; draws against them simply yield
/// the unavailable result.
#[derive(Clone)]
pub struct Catalog {
    pub scenarios: Arc<[ScenarioDto]>,
    pub witnesses: Arc<[WitnessDto]>,
    pub conclusions: Arc<[ConclusionDto]>,
}

impl Catalog {
    /// Loads `situations.json`, `witnesses.json` and `conclusions.json` from
    /// `dir`. A missing file yields an empty list; a malformed file is an
    /// error, since it means content was authored but unusable.
    pub fn load(dir: &Path) -> Result<Self, String> {
        Ok(Self {
            scenarios: load_list(&dir.join("situations.json"))?,
            witnesses: load_list(&dir.join("witnesses.json"))?,
            conclusions: load_list(&dir.join("conclusions.json"))?,
        })
    }

    /// No content at all. Useful for tests and for running without a data dir.
    pub fn empty() -> Self {
        Self {
            scenarios: Vec::new().into(),
            witnesses: Vec::new().into(),
            conclusions: Vec::new().into(),
        }
    }
}

fn load_list<T: DeserializeOwned>(path: &Path) -> Result<Arc<[T]>, String> {
    if !path.exists() {
        warn!("{} not found, using empty list", path.display());
        return Ok(Vec::new().into());
    }
    let data =
        fs::read_to_string(path).map_err(|e| format!("could not read {}: {}", path.display(), e))?;
    let items: Vec<T> = serde_json::from_str(&data)
        .map_err(|e| format!("could not parse {}: {}", path.display(), e))?;
    info!("loaded {} items from {}", items.len(), path.display());
    Ok(items.into())
}

// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::id::UserId;
use crate::name::PlayerAlias;
use crate::role::Role;
use serde::{Deserialize, Serialize};

/// The Scenario Data Transfer Object (DTO) is one court case to role-play.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct ScenarioDto {
    pub title: String,
    pub text: String,
    /// Rule/statute citation displayed alongside the case.
    #[serde(default)]
    pub article: String,
    /// What is at stake if convicted.
    #[serde(default)]
    pub consequence: String,
}

/// The Witness Data Transfer Object (DTO) is one witness card, whispered to
/// the player that drew it.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct WitnessDto {
    pub title: String,
    pub text: String,
}

/// Drawn when the judge calls for a verdict. Currently never surfaced to
/// players; the field set is deliberately loose.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct ConclusionDto {
    #[serde(default)]
    pub text: String,
}

/// The Player Data Transfer Object (DTO) is one roster line.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct PlayerDto {
    pub user_id: UserId,
    pub alias: PlayerAlias,
    /// None until roles are assigned.
    pub role: Option<Role>,
}

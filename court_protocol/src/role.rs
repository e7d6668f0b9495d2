// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

/// A courtroom role. The first four are distinguished (assigned at most once
/// per game); `Witness` is the fallback for everyone else.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Role {
    Judge,
    Prosecutor,
    Defense,
    Defendant,
    Witness,
}

impl Role {
    /// Assignment order of the distinguished roles. The order determines who
    /// becomes judge/defendant after the roster permutation; it is not a
    /// fairness mechanism.
    pub const PRIORITY: [Role; 4] = [Role::Judge, Role::Prosecutor, Role::Defense, Role::Defendant];

    pub fn is_distinguished(self) -> bool {
        !matches!(self, Role::Witness)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Judge => "Judge",
            Role::Prosecutor => "Prosecutor",
            Role::Defense => "Defense",
            Role::Defendant => "Defendant",
            Role::Witness => "Witness",
        }
    }
}

// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use arrayvec::ArrayString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A player's display name as reported by the messaging transport, e.g. "mrbig".
/// Bounded so that sessions cannot be bloated by adversarial names.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PlayerAlias(ArrayString<24>);

impl PlayerAlias {
    /// Converts the string into a valid alias, truncating on a character
    /// boundary if it exceeds the capacity. Never empty.
    pub fn new(str: &str) -> Self {
        let trimmed = str.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        Self(slice_up_to_array_string(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn capacity() -> usize {
        Self(ArrayString::new()).0.capacity()
    }
}

impl Default for PlayerAlias {
    fn default() -> Self {
        Self(ArrayString::from("Citizen").unwrap())
    }
}

impl Display for PlayerAlias {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn slice_up_to<const CAPACITY: usize>(s: &str) -> &str {
    let mut idx = CAPACITY.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    &s[..idx]
}

fn slice_up_to_array_string<const CAPACITY: usize>(s: &str) -> ArrayString<CAPACITY> {
    ArrayString::from(slice_up_to::<CAPACITY>(s)).unwrap()
}

// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use rand::seq::SliceRandom;
use rand::thread_rng;
use std::collections::HashSet;
use std::sync::Arc;

/// A no-repeat-until-exhausted random selector over a fixed content list.
/// Behaves like a shuffled deck that is reshuffled only once every card has
/// been dealt. The content list is shared and never mutated; only the
/// used-index set changes.
pub struct DrawPool<T: Clone> {
    items: Arc<[T]>,
    used: HashSet<usize>,
}

impl<T: Clone> DrawPool<T> {
    pub fn new(items: Arc<[T]>) -> Self {
        Self {
            items,
            used: HashSet::new(),
        }
    }

    /// Returns `None` only if the pool has no items at all. An exhausted pool
    /// resets itself and keeps dealing; within any run between two resets,
    /// each item appears at most once.
    pub fn draw(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let mut available: Vec<usize> = (0..self.items.len())
            .filter(|index| !self.used.contains(index))
            .collect();
        if available.is_empty() {
            self.used.clear();
            available = (0..self.items.len()).collect();
        }
        let index = *available.choose(&mut thread_rng()).unwrap();
        self.used.insert(index);
        Some(self.items[index].clone())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::content::Catalog;
use crate::session::Session;
use court_protocol::get_unix_time_now;
use court_protocol::id::ChatId;
use court_protocol::UnixTime;
use log::{debug, info};
use std::collections::HashMap;

/// All game sessions, keyed by chat. Assume this is synchronized via an actor
/// mailbox, so a Mutex is not required.
pub struct Repo {
    pub sessions: HashMap<ChatId, Session>,
}

impl Repo {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Creates a fresh session for the chat, replacing any existing one.
    pub fn create_session(&mut self, chat_id: ChatId, catalog: &Catalog) -> &mut Session {
        debug!("create_session(chat_id={:?})", chat_id);
        self.sessions.insert(chat_id, Session::new(catalog));
        self.sessions.get_mut(&chat_id).unwrap()
    }

    pub fn get_mut(&mut self, chat_id: ChatId) -> Option<&mut Session> {
        self.sessions.get_mut(&chat_id)
    }

    /// Removes the chat's session. Returns false if there was none.
    pub fn end_session(&mut self, chat_id: ChatId) -> bool {
        debug!("end_session(chat_id={:?})", chat_id);
        self.sessions.remove(&chat_id).is_some()
    }

    /// Deletes sessions idle longer than `timeout` milliseconds, returning the
    /// affected chats.
    pub fn prune_sessions(&mut self, timeout: UnixTime) -> Vec<ChatId> {
        let now = get_unix_time_now();
        let mut pruned = Vec::new();
        self.sessions.retain(|&chat_id, session| {
            if now.saturating_sub(session.last_activity) > timeout {
                pruned.push(chat_id);
                false
            } else {
                true
            }
        });
        if !pruned.is_empty() {
            info!("prune_sessions() removed {:?}", pruned);
        }
        pruned
    }
}

impl Default for Repo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::content::Catalog;
    use crate::repo::Repo;
    use court_protocol::id::{ChatId, UserId};
    use court_protocol::name::PlayerAlias;
    use std::num::NonZeroU64;

    fn uid(n: u64) -> UserId {
        UserId(NonZeroU64::new(n).unwrap())
    }

    #[test]
    fn test_sessions_are_isolated_per_chat() {
        let mut repo = Repo::new();
        let catalog = Catalog::empty();
        repo.create_session(ChatId(-100), &catalog);
        repo.create_session(ChatId(7), &catalog);

        repo.get_mut(ChatId(-100))
            .unwrap()
            .join(uid(1), PlayerAlias::new("a"))
            .unwrap();

        assert_eq!(repo.get_mut(ChatId(-100)).unwrap().players.len(), 1);
        assert_eq!(repo.get_mut(ChatId(7)).unwrap().players.len(), 0);
        assert!(repo.get_mut(ChatId(8)).is_none());
    }

    #[test]
    fn test_create_session_replaces_existing() {
        let mut repo = Repo::new();
        let catalog = Catalog::empty();
        repo.create_session(ChatId(1), &catalog)
            .join(uid(1), PlayerAlias::new("a"))
            .unwrap();
        repo.create_session(ChatId(1), &catalog);
        assert_eq!(repo.get_mut(ChatId(1)).unwrap().players.len(), 0);
        assert_eq!(repo.sessions.len(), 1);
    }

    #[test]
    fn test_end_session_is_idempotent() {
        let mut repo = Repo::new();
        repo.create_session(ChatId(1), &Catalog::empty());
        assert!(repo.end_session(ChatId(1)));
        assert!(!repo.end_session(ChatId(1)));
    }

    #[test]
    fn test_prune_sessions_removes_only_idle() {
        let mut repo = Repo::new();
        let catalog = Catalog::empty();
        repo.create_session(ChatId(1), &catalog);
        repo.create_session(ChatId(2), &catalog);
        repo.get_mut(ChatId(1)).unwrap().last_activity = 0;

        let pruned = repo.prune_sessions(60_000);
        assert_eq!(pruned, vec![ChatId(1)]);
        assert!(repo.get_mut(ChatId(1)).is_none());
        assert!(repo.get_mut(ChatId(2)).is_some());

        // Second sweep finds nothing.
        assert!(repo.prune_sessions(60_000).is_empty());
    }

    #[test]
    fn test_prune_timeout_is_exclusive() {
        let mut repo = Repo::new();
        repo.create_session(ChatId(1), &Catalog::empty());
        // Exactly at the timeout boundary is not yet idle.
        assert!(repo.prune_sessions(u64::MAX).is_empty());
    }
}

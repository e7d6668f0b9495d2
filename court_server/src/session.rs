// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::content::Catalog;
use crate::deck::DrawPool;
use crate::role;
use court_protocol::dto::{ConclusionDto, PlayerDto, ScenarioDto, WitnessDto};
use court_protocol::get_unix_time_now;
use court_protocol::id::UserId;
use court_protocol::name::PlayerAlias;
use court_protocol::role::Role;
use court_protocol::rpc::{GameError, StageId, Verdict};
use court_protocol::UnixTime;
use log::debug;
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::collections::HashMap;
use std::sync::Arc;

/// One roster entry.
pub struct Player {
    pub alias: PlayerAlias,
    /// None until roles are assigned.
    pub role: Option<Role>,
}

/// Quick references established by role assignment.
pub struct Cast {
    /// Unset only if roles were assigned to an empty roster.
    pub judge_id: Option<UserId>,
    /// Unset if fewer than four players were present at assignment.
    pub defendant_id: Option<UserId>,
}

/// The phase of a game. Round phases carry the active scenario, so a round
/// without a scenario is unrepresentable; the scenario persists through
/// `Finished` until the next round draw replaces it.
pub enum Stage {
    Joining,
    RolesAssigned,
    Situation(Arc<ScenarioDto>),
    Debate(Arc<ScenarioDto>),
    Verdict(Arc<ScenarioDto>),
    Finished(Arc<ScenarioDto>),
}

impl Stage {
    pub fn scenario(&self) -> Option<&Arc<ScenarioDto>> {
        match self {
            Self::Joining | Self::RolesAssigned => None,
            Self::Situation(scenario)
            | Self::Debate(scenario)
            | Self::Verdict(scenario)
            | Self::Finished(scenario) => Some(scenario),
        }
    }

    pub fn id(&self) -> StageId {
        match self {
            Self::Joining => StageId::Joining,
            Self::RolesAssigned => StageId::RolesAssigned,
            Self::Situation(_) => StageId::Situation,
            Self::Debate(_) => StageId::Debate,
            Self::Verdict(_) => StageId::Verdict,
            Self::Finished(_) => StageId::Finished,
        }
    }
}

/// One game, scoped to a single chat. Owned exclusively by the registry;
/// mutated only while the owning actor is handling a message.
pub struct Session {
    /// Everyone who pressed join, keyed by transport user id.
    pub players: HashMap<UserId, Player>,

    /// Join order. Always the same length as `players`.
    pub order: Vec<UserId>,

    pub stage: Stage,

    /// Some once roles have been assigned at least once.
    pub cast: Option<Cast>,

    /// Scenario deck for this game. Never shared with another session.
    pub scenario_deck: DrawPool<ScenarioDto>,

    /// Witness card deck for this game.
    pub witness_deck: DrawPool<WitnessDto>,

    /// Drawn (and discarded) when the judge calls for a verdict.
    pub conclusions: Arc<[ConclusionDto]>,

    /// Who drew which witness card this round. Cleared on every round start.
    pub witness_draws: HashMap<UserId, WitnessDto>,

    /// When this session was created.
    pub date_created: UnixTime,

    /// Refreshed by every mutating operation; the reaper deletes sessions
    /// idle past the configured timeout.
    pub last_activity: UnixTime,
}

impl Session {
    pub fn new(catalog: &Catalog) -> Self {
        let date_created = get_unix_time_now();
        Self {
            players: HashMap::new(),
            order: Vec::new(),
            stage: Stage::Joining,
            cast: None,
            scenario_deck: DrawPool::new(Arc::clone(&catalog.scenarios)),
            witness_deck: DrawPool::new(Arc::clone(&catalog.witnesses)),
            conclusions: Arc::clone(&catalog.conclusions),
            witness_draws: HashMap::new(),
            date_created,
            last_activity: date_created,
        }
    }

    fn touch(&mut self) {
        self.last_activity = get_unix_time_now();
    }

    pub fn roles_assigned(&self) -> bool {
        self.cast.is_some()
    }

    pub fn current_scenario(&self) -> Option<&Arc<ScenarioDto>> {
        self.stage.scenario()
    }

    pub fn judge_id(&self) -> Option<UserId> {
        self.cast.as_ref().and_then(|cast| cast.judge_id)
    }

    /// Roster snapshot in join order, suitable for handing to the gateway
    /// after the lock is released.
    pub fn roster(&self) -> Arc<[PlayerDto]> {
        self.order
            .iter()
            .filter_map(|user_id| {
                self.players.get(user_id).map(|player| PlayerDto {
                    user_id: *user_id,
                    alias: player.alias,
                    role: player.role,
                })
            })
            .collect()
    }

    /// Adds a player to the roster. Joining is not stage-gated; latecomers
    /// may join mid-game and pick up a role at the next assignment.
    pub fn join(&mut self, user_id: UserId, alias: PlayerAlias) -> Result<(), GameError> {
        debug!("join(user={:?}, alias={:?})", user_id, alias);
        if self.players.contains_key(&user_id) {
            return Err(GameError::AlreadyJoined);
        }
        self.players.insert(user_id, Player { alias, role: None });
        self.order.push(user_id);
        self.touch();
        Ok(())
    }

    /// Closes recruitment, returning the roster for announcement. Rejected
    /// below the configured minimum, leaving stage and roster untouched.
    pub fn close_join(&mut self, min_players: u32) -> Result<Arc<[PlayerDto]>, GameError> {
        let player_count = self.players.len() as u32;
        if player_count < min_players {
            return Err(GameError::BelowMinimum {
                player_count,
                min_players,
            });
        }
        self.touch();
        Ok(self.roster())
    }

    /// (Re)assigns roles to the roster present right now. Always succeeds;
    /// an active round keeps its scenario.
    pub fn assign_roles(&mut self) -> (Arc<[PlayerDto]>, Option<UserId>, Option<UserId>) {
        let assignment = role::assign_roles(&self.order);
        for (user_id, role) in &assignment.roles {
            if let Some(player) = self.players.get_mut(user_id) {
                player.role = Some(*role);
            }
        }
        debug!(
            "assign_roles() => judge={:?}, defendant={:?}",
            assignment.judge_id, assignment.defendant_id
        );
        self.cast = Some(Cast {
            judge_id: assignment.judge_id,
            defendant_id: assignment.defendant_id,
        });
        if let Stage::Joining = self.stage {
            self.stage = Stage::RolesAssigned;
        }
        self.touch();
        (self.roster(), assignment.judge_id, assignment.defendant_id)
    }

    /// Draws the next scenario and enters the situation phase, clearing the
    /// previous round's witness draws. Repeatable from `Verdict`/`Finished`
    /// indefinitely.
    pub fn start_round(&mut self) -> Result<Arc<ScenarioDto>, GameError> {
        if !self.roles_assigned() {
            return Err(GameError::RolesNotAssigned);
        }
        let scenario = Arc::new(self.scenario_deck.draw().ok_or(GameError::OutOfScenarios)?);
        self.witness_draws.clear();
        self.stage = Stage::Situation(Arc::clone(&scenario));
        self.touch();
        Ok(scenario)
    }

    /// Deals one witness card, at most one per player per round.
    pub fn draw_witness(&mut self, user_id: UserId) -> Result<WitnessDto, GameError> {
        if self.current_scenario().is_none() {
            return Err(GameError::NoActiveRound);
        }
        if !self.players.contains_key(&user_id) {
            return Err(GameError::NotInGame);
        }
        if self.witness_draws.contains_key(&user_id) {
            return Err(GameError::AlreadyDrawn);
        }
        let card = self.witness_deck.draw().ok_or(GameError::OutOfWitnesses)?;
        self.witness_draws.insert(user_id, card.clone());
        self.touch();
        Ok(card)
    }

    pub fn start_debate(&mut self) -> Result<(), GameError> {
        let scenario = self
            .current_scenario()
            .cloned()
            .ok_or(GameError::NoActiveRound)?;
        self.stage = Stage::Debate(scenario);
        self.touch();
        Ok(())
    }

    /// Judge-only. Moves the round to the verdict phase.
    pub fn call_verdict(&mut self, caller: UserId) -> Result<UserId, GameError> {
        let scenario = self
            .current_scenario()
            .cloned()
            .ok_or(GameError::NoActiveRound)?;
        let judge_id = self.judge_id().ok_or(GameError::NoJudge)?;
        if caller != judge_id {
            return Err(GameError::NotJudge);
        }
        // A conclusion is drawn here but never surfaced to players.
        let _conclusion = self.conclusions.choose(&mut thread_rng());
        self.stage = Stage::Verdict(scenario);
        self.touch();
        Ok(judge_id)
    }

    /// Judge-only. Records the chosen outcome by finishing the round; the
    /// choice itself is only echoed in the announcement, never stored.
    pub fn confirm_verdict(&mut self, caller: UserId, verdict: Verdict) -> Result<Verdict, GameError> {
        let judge_id = self.judge_id().ok_or(GameError::NoJudge)?;
        if caller != judge_id {
            return Err(GameError::NotJudge);
        }
        let scenario = self
            .current_scenario()
            .cloned()
            .ok_or(GameError::NoActiveRound)?;
        self.stage = Stage::Finished(scenario);
        self.touch();
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use crate::content::Catalog;
    use crate::session::{Session, Stage};
    use court_protocol::dto::{ScenarioDto, WitnessDto};
    use court_protocol::id::UserId;
    use court_protocol::name::PlayerAlias;
    use court_protocol::rpc::{GameError, StageId, Verdict};
    use std::num::NonZeroU64;

    fn uid(n: u64) -> UserId {
        UserId(NonZeroU64::new(n).unwrap())
    }

    fn alias(name: &str) -> PlayerAlias {
        PlayerAlias::new(name)
    }

    fn catalog(scenarios: usize, witnesses: usize) -> Catalog {
        Catalog {
            scenarios: (0..scenarios)
                .map(|i| ScenarioDto {
                    title: format!("case {}", i),
                    text: format!("facts {}", i),
                    article: String::new(),
                    consequence: String::new(),
                })
                .collect::<Vec<_>>()
                .into(),
            witnesses: (0..witnesses)
                .map(|i| WitnessDto {
                    title: format!("witness {}", i),
                    text: format!("testimony {}", i),
                })
                .collect::<Vec<_>>()
                .into(),
            conclusions: Vec::new().into(),
        }
    }

    /// A session with `n` players joined, in order u1..un.
    fn joined(n: u64) -> Session {
        let mut session = Session::new(&catalog(4, 8));
        for i in 1..=n {
            session.join(uid(i), alias(&format!("u{}", i))).unwrap();
        }
        session
    }

    #[test]
    fn test_duplicate_join_is_rejected() {
        let mut session = joined(2);
        assert_eq!(
            session.join(uid(1), alias("u1 again")),
            Err(GameError::AlreadyJoined)
        );
        assert_eq!(session.players.len(), 2);
        assert_eq!(session.order.len(), 2);
    }

    #[test]
    fn test_close_join_enforces_minimum() {
        let mut session = joined(2);
        assert_eq!(
            session.close_join(3),
            Err(GameError::BelowMinimum {
                player_count: 2,
                min_players: 3
            })
        );
        assert_eq!(session.stage.id(), StageId::Joining);
        assert_eq!(session.players.len(), 2);

        session.join(uid(3), alias("u3")).unwrap();
        let roster = session.close_join(3).unwrap();
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn test_start_round_requires_roles() {
        let mut session = joined(4);
        assert_eq!(session.start_round().err(), Some(GameError::RolesNotAssigned));
        session.assign_roles();
        let scenario = session.start_round().unwrap();
        assert_eq!(session.current_scenario(), Some(&scenario));
        assert_eq!(session.stage.id(), StageId::Situation);
    }

    #[test]
    fn test_start_round_with_no_scenarios_is_recoverable() {
        let mut session = Session::new(&catalog(0, 0));
        session.join(uid(1), alias("u1")).unwrap();
        session.assign_roles();
        assert_eq!(session.start_round().err(), Some(GameError::OutOfScenarios));
        // Session is untouched and usable; stage never entered a round.
        assert_eq!(session.stage.id(), StageId::RolesAssigned);
    }

    #[test]
    fn test_draw_witness_once_per_round() {
        let mut session = joined(5);
        session.assign_roles();
        session.start_round().unwrap();

        session.draw_witness(uid(2)).unwrap();
        assert_eq!(session.witness_draws.len(), 1);
        assert_eq!(session.draw_witness(uid(2)), Err(GameError::AlreadyDrawn));
        assert_eq!(session.witness_draws.len(), 1);

        session.draw_witness(uid(3)).unwrap();
        assert_eq!(session.witness_draws.len(), 2);
    }

    #[test]
    fn test_draw_witness_guards() {
        let mut session = joined(3);
        session.assign_roles();
        assert_eq!(session.draw_witness(uid(1)), Err(GameError::NoActiveRound));
        session.start_round().unwrap();
        assert_eq!(session.draw_witness(uid(9)), Err(GameError::NotInGame));
    }

    #[test]
    fn test_judge_only_verdict() {
        let mut session = joined(5);
        let (_, judge_id, _) = session.assign_roles();
        let judge = judge_id.unwrap();
        let intruder = session.order.iter().copied().find(|&u| u != judge).unwrap();
        session.start_round().unwrap();

        assert_eq!(session.call_verdict(intruder), Err(GameError::NotJudge));
        assert_eq!(session.stage.id(), StageId::Situation);

        assert_eq!(session.call_verdict(judge), Ok(judge));
        assert_eq!(session.stage.id(), StageId::Verdict);

        assert_eq!(
            session.confirm_verdict(intruder, Verdict::Acquit),
            Err(GameError::NotJudge)
        );
        assert_eq!(session.stage.id(), StageId::Verdict);

        assert_eq!(
            session.confirm_verdict(judge, Verdict::Convict),
            Ok(Verdict::Convict)
        );
        assert_eq!(session.stage.id(), StageId::Finished);
    }

    #[test]
    fn test_rounds_repeat_with_fresh_witness_draws() {
        let mut session = joined(5);
        let (_, judge_id, _) = session.assign_roles();
        let judge = judge_id.unwrap();

        session.start_round().unwrap();
        session.draw_witness(uid(2)).unwrap();
        session.start_debate().unwrap();
        session.call_verdict(judge).unwrap();
        session.confirm_verdict(judge, Verdict::Acquit).unwrap();

        // Scenario persists through Finished until the next draw.
        assert!(session.current_scenario().is_some());

        session.start_round().unwrap();
        assert_eq!(session.stage.id(), StageId::Situation);
        assert!(session.witness_draws.is_empty());
        // The same player may draw again in the new round.
        session.draw_witness(uid(2)).unwrap();
    }

    #[test]
    fn test_five_player_game_roster_shape() {
        let mut session = joined(5);
        let (players, judge_id, defendant_id) = session.assign_roles();
        assert_eq!(players.len(), 5);
        assert!(players.iter().all(|p| p.role.is_some()));
        let judge = judge_id.unwrap();
        let defendant = defendant_id.unwrap();
        assert_ne!(judge, defendant);
        let fallbacks = players
            .iter()
            .filter(|p| !p.role.unwrap().is_distinguished())
            .count();
        assert_eq!(fallbacks, 1);
    }

    #[test]
    fn test_assign_roles_keeps_active_round() {
        let mut session = joined(4);
        session.assign_roles();
        let scenario = session.start_round().unwrap();
        // A latecomer joins and roles are redealt mid-round.
        session.join(uid(9), alias("late")).unwrap();
        let (players, _, _) = session.assign_roles();
        assert_eq!(players.len(), 5);
        assert_eq!(session.current_scenario(), Some(&scenario));
    }

    #[test]
    fn test_mutations_refresh_activity() {
        let mut session = joined(1);
        session.last_activity = 0;
        session.join(uid(2), alias("u2")).unwrap();
        assert_ne!(session.last_activity, 0);
    }

    #[test]
    fn test_stage_scenario_accessor() {
        let session = joined(1);
        assert!(matches!(session.stage, Stage::Joining));
        assert!(session.stage.scenario().is_none());
    }
}

// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::dto::{PlayerDto, ScenarioDto, WitnessDto};
use crate::id::{ChatId, UserId};
use crate::name::PlayerAlias;
use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// See https://docs.rs/actix/latest/actix/dev/trait.MessageResponse.html
macro_rules! actix_response {
    ($typ: ty) => {
        #[cfg(feature = "server")]
        impl<A, M> actix::dev::MessageResponse<A, M> for $typ
        where
            A: actix::Actor,
            M: actix::Message<Result = $typ>,
        {
            fn handle(
                self,
                _ctx: &mut A::Context,
                tx: Option<actix::dev::OneshotSender<M::Result>>,
            ) {
                if let Some(tx) = tx {
                    let _ = tx.send(self);
                }
            }
        }
    };
}

/// Whether the inbound action originated in a group conversation or a direct
/// message. Games may only be created in groups.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ChatKind {
    Group,
    Private,
}

/// Everything the gateway knows about an inbound action's origin.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct ChatContext {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub alias: PlayerAlias,
    pub chat_kind: ChatKind,
}

/// The judge's decision.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    Acquit,
    Convict,
}

/// An inbound action, e.g. a button press relayed by the gateway.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum GameRequest {
    /// Create (or replace) the game for this chat.
    NewGame,
    Join,
    StopJoin,
    AssignRoles,
    StartRound,
    DrawWitness,
    StartDebate,
    CallVerdict,
    ConfirmVerdict { verdict: Verdict },
    EndGame,
    /// Roster and stage snapshot.
    Status,
    /// Manually reap idle games (normally the reaper's job).
    Sweep,
}

/// Serializable tag of the session stage, for status snapshots.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum StageId {
    Joining,
    RolesAssigned,
    Situation,
    Debate,
    Verdict,
    Finished,
}

/// What the gateway should announce to the chat. Phrasing is the gateway's
/// responsibility; this is structured data only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum GameUpdate {
    GameCreated {
        min_players: u32,
    },
    Joined {
        alias: PlayerAlias,
    },
    JoinClosed {
        players: Arc<[PlayerDto]>,
    },
    RolesAssigned {
        players: Arc<[PlayerDto]>,
        judge_id: Option<UserId>,
        defendant_id: Option<UserId>,
    },
    RoundStarted {
        scenario: Arc<ScenarioDto>,
    },
    /// The card itself goes out as a whisper, not a chat announcement.
    WitnessDrawn {
        alias: PlayerAlias,
    },
    DebateStarted,
    VerdictCalled {
        judge: PlayerAlias,
    },
    VerdictConfirmed {
        verdict: Verdict,
    },
    GameEnded,
    Status {
        stage: StageId,
        players: Arc<[PlayerDto]>,
    },
    Swept {
        chat_ids: Vec<ChatId>,
    },
}

/// A private message for the gateway to deliver to a single user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum WhisperNotice {
    RoleCard(Role),
    WitnessCard(WitnessDto),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Whisper {
    pub user_id: UserId,
    pub alias: PlayerAlias,
    pub notice: WhisperNotice,
}

/// Result of a successful game operation: the chat announcement plus any
/// private deliveries still to perform. All state changes are already applied
/// by the time this exists; whisper failures must not mutate the session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameResponse {
    pub update: GameUpdate,
    pub whispers: Vec<Whisper>,
}

impl GameResponse {
    /// An update with nothing to whisper.
    pub fn announce(update: GameUpdate) -> Self {
        Self {
            update,
            whispers: Vec::new(),
        }
    }
}

/// A [`GameResponse`] after private delivery was attempted: the aliases in
/// `undelivered` could not be reached and should be called out in the chat.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameOutcome {
    pub update: GameUpdate,
    pub undelivered: Vec<PlayerAlias>,
}

/// Coarse classification of [`GameError`], for gateways that phrase errors
/// per kind rather than per variant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    PermissionDenied,
    PreconditionFailed,
    Unavailable,
}

/// Why a game operation was rejected. Every variant is fully recovered; the
/// session is left exactly as it was.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum GameError {
    /// No game exists for this chat.
    NoSession,
    /// Games can only be created in group chats.
    NotGroupChat,
    AlreadyJoined,
    BelowMinimum {
        player_count: u32,
        min_players: u32,
    },
    /// Caller is not on the roster.
    NotInGame,
    RolesNotAssigned,
    /// No scenario is active (round not started).
    NoActiveRound,
    NoJudge,
    /// Judge-only action attempted by someone else.
    NotJudge,
    /// Caller already drew a witness card this round.
    AlreadyDrawn,
    /// The scenario list is empty.
    OutOfScenarios,
    /// The witness card list is empty.
    OutOfWitnesses,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoSession => ErrorKind::NotFound,
            Self::AlreadyJoined | Self::AlreadyDrawn => ErrorKind::AlreadyExists,
            Self::NotJudge => ErrorKind::PermissionDenied,
            Self::NotGroupChat
            | Self::BelowMinimum { .. }
            | Self::NotInGame
            | Self::RolesNotAssigned
            | Self::NoActiveRound
            | Self::NoJudge => ErrorKind::PreconditionFailed,
            Self::OutOfScenarios | Self::OutOfWitnesses => ErrorKind::Unavailable,
        }
    }
}

/// Fallback phrasing only; gateways are expected to word errors themselves.
impl Display for GameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSession => write!(f, "no game in this chat"),
            Self::NotGroupChat => write!(f, "games can only be started in a group chat"),
            Self::AlreadyJoined => write!(f, "already joined"),
            Self::BelowMinimum {
                player_count,
                min_players,
            } => write!(f, "{} of {} required players", player_count, min_players),
            Self::NotInGame => write!(f, "not a player in this game"),
            Self::RolesNotAssigned => write!(f, "roles have not been assigned"),
            Self::NoActiveRound => write!(f, "no active round"),
            Self::NoJudge => write!(f, "no judge has been assigned"),
            Self::NotJudge => write!(f, "only the judge may do that"),
            Self::AlreadyDrawn => write!(f, "already drew a witness card this round"),
            Self::OutOfScenarios => write!(f, "no scenarios available"),
            Self::OutOfWitnesses => write!(f, "no witness cards available"),
        }
    }
}

impl std::error::Error for GameError {}

/// Liveness snapshot, served over HTTP for the process supervisor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// If false, this server cannot be relied on and should be replaced.
    pub healthy: bool,
    /// Number of live game sessions.
    pub sessions: u32,
}

actix_response!(StatusResponse);

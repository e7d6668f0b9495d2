// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::core::Settings;
use crate::repo::Repo;
use async_trait::async_trait;
use court_protocol::id::UserId;
use court_protocol::name::PlayerAlias;
use court_protocol::rpc::{
    ChatContext, ChatKind, GameError, GameOutcome, GameRequest, GameResponse, GameUpdate, Whisper,
    WhisperNotice,
};
use log::{debug, info, warn};
use std::fmt;
use std::fmt::{Display, Formatter};

impl Repo {
    /// Applies one inbound action to the chat's session. Everything here runs
    /// under the actor mailbox; the returned whispers are delivered afterwards,
    /// outside the lock.
    pub fn handle_game(
        &mut self,
        settings: &Settings,
        context: &ChatContext,
        request: GameRequest,
    ) -> Result<GameResponse, GameError> {
        debug!(
            "handle_game(chat_id={:?}, user_id={:?}, request={:?})",
            context.chat_id, context.user_id, request
        );

        match request {
            GameRequest::NewGame => {
                if context.chat_kind != ChatKind::Group {
                    return Err(GameError::NotGroupChat);
                }
                self.create_session(context.chat_id, &settings.catalog);
                Ok(GameResponse::announce(GameUpdate::GameCreated {
                    min_players: settings.min_players,
                }))
            }
            GameRequest::EndGame => {
                // Idempotent; ending a missing game is not an error.
                self.end_session(context.chat_id);
                Ok(GameResponse::announce(GameUpdate::GameEnded))
            }
            GameRequest::Sweep => {
                let chat_ids = self.prune_sessions(settings.game_timeout);
                Ok(GameResponse::announce(GameUpdate::Swept { chat_ids }))
            }
            request => {
                let session = self.get_mut(context.chat_id).ok_or(GameError::NoSession)?;
                match request {
                    GameRequest::Join => {
                        session.join(context.user_id, context.alias)?;
                        Ok(GameResponse::announce(GameUpdate::Joined {
                            alias: context.alias,
                        }))
                    }
                    GameRequest::StopJoin => {
                        let players = session.close_join(settings.min_players)?;
                        Ok(GameResponse::announce(GameUpdate::JoinClosed { players }))
                    }
                    GameRequest::AssignRoles => {
                        let (players, judge_id, defendant_id) = session.assign_roles();
                        let whispers = players
                            .iter()
                            .filter_map(|player| {
                                player.role.map(|role| Whisper {
                                    user_id: player.user_id,
                                    alias: player.alias,
                                    notice: WhisperNotice::RoleCard(role),
                                })
                            })
                            .collect();
                        Ok(GameResponse {
                            update: GameUpdate::RolesAssigned {
                                players,
                                judge_id,
                                defendant_id,
                            },
                            whispers,
                        })
                    }
                    GameRequest::StartRound => {
                        let scenario = session.start_round()?;
                        Ok(GameResponse::announce(GameUpdate::RoundStarted { scenario }))
                    }
                    GameRequest::DrawWitness => {
                        let card = session.draw_witness(context.user_id)?;
                        Ok(GameResponse {
                            update: GameUpdate::WitnessDrawn {
                                alias: context.alias,
                            },
                            whispers: vec![Whisper {
                                user_id: context.user_id,
                                alias: context.alias,
                                notice: WhisperNotice::WitnessCard(card),
                            }],
                        })
                    }
                    GameRequest::StartDebate => {
                        session.start_debate()?;
                        Ok(GameResponse::announce(GameUpdate::DebateStarted))
                    }
                    GameRequest::CallVerdict => {
                        let judge_id = session.call_verdict(context.user_id)?;
                        let judge = session
                            .players
                            .get(&judge_id)
                            .map(|player| player.alias)
                            .unwrap_or_default();
                        Ok(GameResponse::announce(GameUpdate::VerdictCalled { judge }))
                    }
                    GameRequest::ConfirmVerdict { verdict } => {
                        let verdict = session.confirm_verdict(context.user_id, verdict)?;
                        Ok(GameResponse::announce(GameUpdate::VerdictConfirmed {
                            verdict,
                        }))
                    }
                    GameRequest::Status => {
                        // Read-only; deliberately does not refresh last_activity.
                        Ok(GameResponse::announce(GameUpdate::Status {
                            stage: session.stage.id(),
                            players: session.roster(),
                        }))
                    }
                    GameRequest::NewGame | GameRequest::EndGame | GameRequest::Sweep => {
                        unreachable!()
                    }
                }
            }
        }
    }
}

/// A whisper could not reach its recipient, e.g. because they never opened a
/// direct conversation with the bot.
#[derive(Debug)]
pub struct DeliveryError(pub String);

impl Display for DeliveryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for DeliveryError {}

/// Delivers private notices to individual users. Implemented by the chat
/// transport; the game logic never blocks on it.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn whisper(&self, user_id: UserId, notice: &WhisperNotice) -> Result<(), DeliveryError>;
}

/// Gateway that only logs. Stands in when no chat transport is wired up.
pub struct LogGateway;

#[async_trait]
impl Gateway for LogGateway {
    async fn whisper(&self, user_id: UserId, notice: &WhisperNotice) -> Result<(), DeliveryError> {
        info!("whisper(user_id={:?}, notice={:?})", user_id, notice);
        Ok(())
    }
}

/// Attempts every whisper, returning the aliases that could not be reached.
/// Failures are independent; one unreachable user never blocks the rest.
pub async fn deliver_whispers(gateway: &dyn Gateway, whispers: Vec<Whisper>) -> Vec<PlayerAlias> {
    let mut undelivered = Vec::new();
    for whisper in whispers {
        if let Err(e) = gateway.whisper(whisper.user_id, &whisper.notice).await {
            warn!(
                "deliver_whispers(user_id={:?}) failed: {}",
                whisper.user_id, e
            );
            undelivered.push(whisper.alias);
        }
    }
    undelivered
}

/// Completes a game response by delivering its whispers.
pub async fn finish(gateway: &dyn Gateway, response: GameResponse) -> GameOutcome {
    let GameResponse { update, whispers } = response;
    let undelivered = deliver_whispers(gateway, whispers).await;
    GameOutcome {
        update,
        undelivered,
    }
}

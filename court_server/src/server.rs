// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::core::Core;
use actix::prelude::*;
use court_protocol::rpc::{ChatContext, GameError, GameRequest, GameResponse, StatusResponse};
use serde::{Deserialize, Serialize};

/// A game request bundled with its chat context, as relayed by the gateway.
#[derive(Message, Serialize, Deserialize)]
#[rtype(result = "Result<GameResponse, GameError>")]
pub struct ParametrizedGameRequest {
    pub params: ChatContext,
    pub request: GameRequest,
}

#[derive(Message)]
#[rtype(result = "StatusResponse")]
pub struct StatusRequest;

impl Handler<ParametrizedGameRequest> for Core {
    type Result = Result<GameResponse, GameError>;

    fn handle(&mut self, msg: ParametrizedGameRequest, _ctx: &mut Self::Context) -> Self::Result {
        self.repo.handle_game(&self.settings, &msg.params, msg.request)
    }
}

impl Handler<StatusRequest> for Core {
    type Result = StatusResponse;

    fn handle(&mut self, _msg: StatusRequest, _ctx: &mut Self::Context) -> Self::Result {
        StatusResponse {
            healthy: self.health.healthy(),
            sessions: self.repo.sessions.len() as u32,
        }
    }
}

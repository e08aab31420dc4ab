//! Transfer history of teams and players.

use serde_json::Value;

use super::types::TransfersRequest;
use crate::endpoint::Endpoint;
use crate::params::{Operator, ParameterMapping};
use crate::{Client, Result};

fn transfers(limit: u32) -> ParameterMapping {
    ParameterMapping::new()
        .param("join", "teams_deep")
        .page(0, limit)
        .sort("-action_date")
        .embed("teams,player")
}

impl Client {
    /// Players who joined or left the team, most recent first.
    pub async fn team_transfers(&self, request: &TransfersRequest) -> Result<Value> {
        // Either side of the transfer may be the team
        let params = transfers(request.limit).filter(
            "team_to.id,team_from.id",
            Operator::Or,
            vec![request.id, request.id],
        );

        self.get(Endpoint::Transfers, params).await
    }

    /// A player's moves between teams as a player (coaching stints excluded),
    /// most recent first.
    pub async fn player_transfers(&self, request: &TransfersRequest) -> Result<Value> {
        let params = transfers(request.limit)
            .filter("player_id", Operator::Eq, request.id)
            .filter("is_coach", Operator::Eq, false);

        self.get(Endpoint::Transfers, params).await
    }
}

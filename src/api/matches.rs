//! Match listings and single-match lookups.

use serde_json::Value;

use super::types::{TeamMatchesRequest, UpcomingMatchesRequest};
use super::{DateWindow, MATCH_RELATIONS, day_end, day_start};
use crate::dispatch::Request;
use crate::endpoint::{Endpoint, Slug};
use crate::params::{Operator, ParameterMapping};
use crate::{CS2_DISCIPLINE_ID, Client, Result};

const DEFAULT_MATCH_LIMIT: u32 = 100;

/// Statuses covering a player's whole match history.
const ALL_STATUSES: [&str; 4] = ["finished", "defwin", "upcoming", "current"];

/// The listing shared by the live, finished and today's match queries.
fn widget_matches(status: &str) -> ParameterMapping {
    ParameterMapping::new()
        .scope("widget-matches")
        .page(0, DEFAULT_MATCH_LIMIT)
        .sort("tier_rank,-start_date")
        .filter("matches.status", Operator::In, status)
        .filter("matches.discipline_id", Operator::Eq, CS2_DISCIPLINE_ID)
        .embed(MATCH_RELATIONS)
}

impl Client {
    /// Matches being played right now, with teams, tournament, predictions, games
    /// and streams embedded.
    ///
    /// First 100 results, ordered by `tier_rank` then newest start date.
    pub async fn live_matches(&self) -> Result<Value> {
        self.send(&Request::get(Endpoint::Matches, widget_matches("current")))
            .await
    }

    /// Finished matches, paged and ordered like [`Self::live_matches`].
    pub async fn finished_matches(&self) -> Result<Value> {
        self.send(&Request::get(Endpoint::Matches, widget_matches("finished")))
            .await
    }

    /// Upcoming matches starting today (UTC), between `00:00` and `23:59`.
    pub async fn todays_matches(&self) -> Result<Value> {
        let today = self.today();
        let params = widget_matches("upcoming")
            .filter("matches.start_date", Operator::Lt, day_end(today))
            .filter("matches.start_date", Operator::Gt, day_start(today));

        self.send(&Request::get(Endpoint::Matches, params)).await
    }

    /// The latest live snapshot (score, round, economy) of a running match.
    pub async fn live_match_snapshot(&self, match_id: u64) -> Result<Value> {
        self.get(Endpoint::LiveSnapshot(match_id), ParameterMapping::new())
            .await
    }

    /// Full details of one match: games, streams, teams, tournament, stage and
    /// predictions.
    pub async fn match_details(&self, slug: &str) -> Result<Value> {
        let params = ParameterMapping::new()
            .scope("show-match")
            .embed("games,streams,teams,tournament_deep,stage,ai_predictions");

        self.get(Endpoint::Match(Slug::new(slug)?), params).await
    }

    /// Every match a player took part in, newest first, first 100 results.
    pub async fn player_matches(&self, player_id: u64) -> Result<Value> {
        let params = ParameterMapping::new()
            .scope("widget-matches")
            .page(0, DEFAULT_MATCH_LIMIT)
            .sort("-start_date")
            .filter("matches.status", Operator::In, ALL_STATUSES.to_vec())
            .filter("matches.player_ids", Operator::Overlap, player_id)
            .filter("matches.discipline_id", Operator::Eq, CS2_DISCIPLINE_ID)
            .embed(MATCH_RELATIONS);

        self.get(Endpoint::Matches, params).await
    }

    /// Finished matches of a team that started inside
    /// `(today - days, end_date)`, newest first, with map picks embedded.
    pub async fn team_matches(&self, request: &TeamMatchesRequest) -> Result<Value> {
        let window = DateWindow::last_days(self.today(), request.days);
        let end_date = request.end_date.unwrap_or(window.to);

        let params = ParameterMapping::new()
            .scope("widget-map-pool")
            .page(0, request.limit)
            .sort("-start_date")
            .filter("matches.status", Operator::In, "finished")
            .filter("matches.team_ids", Operator::Overlap, request.team_id)
            .filter("matches.start_date", Operator::Lt, end_date)
            .filter("matches.start_date", Operator::Gt, window.from)
            .filter("matches.discipline_id", Operator::Eq, CS2_DISCIPLINE_ID)
            .embed("teams,tournament,ai_predictions,games,match_maps");

        self.get(Endpoint::Matches, params).await
    }

    /// Upcoming and live matches of a team, newest first.
    pub async fn team_upcoming_matches(&self, request: &UpcomingMatchesRequest) -> Result<Value> {
        let params = ParameterMapping::new()
            .scope("widget-matches")
            .page(0, request.limit)
            .sort("-start_date")
            .filter("matches.status", Operator::In, vec!["upcoming", "current"])
            .filter("matches.team_ids", Operator::Overlap, request.team_id)
            .filter("matches.discipline_id", Operator::Eq, CS2_DISCIPLINE_ID)
            .embed(MATCH_RELATIONS);

        self.get(Endpoint::Matches, params).await
    }
}

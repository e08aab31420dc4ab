//! Player search, profiles and stats.

use serde_json::Value;

use super::DateWindow;
use super::types::{PlayerStats, SearchRequest, StatsRequest};
use crate::dispatch::Request;
use crate::endpoint::{Endpoint, Slug};
use crate::params::{Operator, ParameterMapping};
use crate::{CS2_DISCIPLINE_ID, Client, Result};

impl Client {
    /// Players whose nickname matches `query`, with country embedded.
    pub async fn search_players(&self, request: &SearchRequest) -> Result<Value> {
        let params = ParameterMapping::new()
            .page(0, request.limit)
            .filter("discipline_id", Operator::Eq, CS2_DISCIPLINE_ID)
            .embed("country")
            .param("search_text", &request.query);

        self.get(Endpoint::PlayerSearch, params).await
    }

    /// A player's profile, in English.
    pub async fn player_details(&self, slug: &str) -> Result<Value> {
        let params = ParameterMapping::new().param("prefer_locale", "en");

        self.get(Endpoint::Player(Slug::new(slug)?), params).await
    }

    /// General, per-map and accuracy stats of a player over the last `days` days.
    ///
    /// The three requests run concurrently; if any fails the whole call fails and
    /// the others are cancelled.
    pub async fn player_stats(&self, request: &StatsRequest) -> Result<PlayerStats> {
        let slug = Slug::new(request.slug.as_str())?;
        let window = DateWindow::last_days(self.today(), request.days);

        let general = Request::get(
            Endpoint::PlayerGeneralStats(slug.clone()),
            window.stats_filter("start_date"),
        );
        let maps = Request::get(
            Endpoint::PlayerMapStats(slug.clone()),
            window.stats_filter("begin_at"),
        );
        let accuracy = Request::get(
            Endpoint::PlayerAccuracyStats(slug),
            window.stats_filter("begin_at"),
        );

        let (general_stats, map_stats, accuracy_stats) = futures::try_join!(
            self.send(&general),
            self.send(&maps),
            self.send(&accuracy)
        )?;

        Ok(PlayerStats {
            general_stats,
            map_stats,
            accuracy_stats,
        })
    }
}

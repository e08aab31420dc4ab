//! Team search, profiles, news and stats.

use serde_json::Value;

use super::DateWindow;
use super::types::{SearchRequest, StatsRequest, TeamNewsRequest, TeamRequest, TeamStats};
use crate::dispatch::Request;
use crate::endpoint::{Endpoint, Slug};
use crate::params::{Operator, ParameterMapping};
use crate::{CS2_DISCIPLINE_ID, Client, Result};

impl Client {
    /// Teams whose name matches `query`.
    pub async fn search_teams(&self, request: &SearchRequest) -> Result<Value> {
        let params = ParameterMapping::new()
            .page(0, request.limit)
            .filter("teams.discipline_id", Operator::Eq, CS2_DISCIPLINE_ID)
            .param("search_text", &request.query);

        self.get(Endpoint::TeamSearch, params).await
    }

    /// A team's profile, localized where upstream has translations.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cs2api::Client;
    /// use cs2api::api::types::TeamRequest;
    ///
    /// # async fn example(client: Client) -> Result<(), Box<dyn std::error::Error>> {
    /// let request = TeamRequest::builder().slug("natus-vincere").build();
    /// let team = client.team_data(&request).await?;
    /// println!("{}", team["name"]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn team_data(&self, request: &TeamRequest) -> Result<Value> {
        let params = ParameterMapping::new().param("prefer_locale", &request.locale);

        self.get(Endpoint::Team(Slug::new(request.slug.as_str())?), params)
            .await
    }

    /// Recent English news tagged with the team, newest first.
    pub async fn team_news(&self, request: &TeamNewsRequest) -> Result<Value> {
        let slug = Slug::new(request.slug.as_str())?;
        let params = ParameterMapping::new()
            .page(0, request.limit)
            .sort("-published_at")
            .filter("news.rank", Operator::In, vec![0_u32, 1, 2])
            .filter("tags.slug", Operator::In, slug.as_str())
            .filter("news.locale", Operator::Eq, "en")
            .filter("base_news.discipline_id", Operator::In, CS2_DISCIPLINE_ID)
            .filter("base_news.section", Operator::In, 1_u32);

        self.get(Endpoint::News, params).await
    }

    /// General and advanced stats of a team over the last `days` days.
    ///
    /// Both requests run concurrently; if either fails the whole call fails.
    pub async fn team_stats(&self, request: &StatsRequest) -> Result<TeamStats> {
        let slug = Slug::new(request.slug.as_str())?;
        let window = DateWindow::last_days(self.today(), request.days);

        let general = Request::get(
            Endpoint::TeamGeneralStats(slug.clone()),
            window.stats_filter("start_date"),
        );
        let advanced = Request::get(
            Endpoint::TeamAdvancedStats(slug),
            window.stats_filter("begin_at"),
        );

        let (general_stats, advanced_stats) =
            futures::try_join!(self.send(&general), self.send(&advanced))?;

        Ok(TeamStats {
            general_stats,
            advanced_stats,
        })
    }
}

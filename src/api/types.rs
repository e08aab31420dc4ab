#![allow(
    clippy::module_name_repetitions,
    reason = "Request suffix is intentional for clarity"
)]

use bon::Builder;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DEFAULT_WINDOW_DAYS;

/// Free-text search over teams or players.
#[derive(Debug, Clone, Builder)]
#[non_exhaustive]
pub struct SearchRequest {
    #[builder(into)]
    pub query: String,
    /// Maximum number of results. Defaults to 4.
    #[builder(default = 4)]
    pub limit: u32,
}

/// Finished matches of one team inside a date window.
#[derive(Debug, Clone, Builder)]
#[non_exhaustive]
pub struct TeamMatchesRequest {
    pub team_id: u64,
    /// Defaults to 50.
    #[builder(default = 50)]
    pub limit: u32,
    /// How far back the window starts. Defaults to 180 days.
    #[builder(default = DEFAULT_WINDOW_DAYS)]
    pub days: u32,
    /// Upper bound of the window. Defaults to today.
    pub end_date: Option<NaiveDate>,
}

/// Upcoming and live matches of one team.
#[derive(Debug, Clone, Builder)]
#[non_exhaustive]
pub struct UpcomingMatchesRequest {
    pub team_id: u64,
    /// Defaults to 100.
    #[builder(default = 100)]
    pub limit: u32,
}

/// A team profile.
#[derive(Debug, Clone, Builder)]
#[non_exhaustive]
pub struct TeamRequest {
    #[builder(into)]
    pub slug: String,
    /// Preferred language, e.g. `en` or `ru`. Defaults to `en`.
    #[builder(into, default = "en".to_owned())]
    pub locale: String,
}

/// English news tagged with a team.
#[derive(Debug, Clone, Builder)]
#[non_exhaustive]
pub struct TeamNewsRequest {
    #[builder(into)]
    pub slug: String,
    /// Defaults to 5.
    #[builder(default = 5)]
    pub limit: u32,
}

/// Aggregated team or player stats over the last `days` days.
#[derive(Debug, Clone, Builder)]
#[non_exhaustive]
pub struct StatsRequest {
    #[builder(into)]
    pub slug: String,
    /// Defaults to 180.
    #[builder(default = DEFAULT_WINDOW_DAYS)]
    pub days: u32,
}

/// Transfer history of one team or player, newest first.
#[derive(Debug, Clone, Builder)]
#[non_exhaustive]
pub struct TransfersRequest {
    pub id: u64,
    /// Defaults to 10.
    #[builder(default = 10)]
    pub limit: u32,
}

/// Result of [`crate::Client::team_stats`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub general_stats: Value,
    pub advanced_stats: Value,
}

/// Result of [`crate::Client::player_stats`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub general_stats: Value,
    pub map_stats: Value,
    pub accuracy_stats: Value,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builders_apply_documented_defaults() {
        let search = SearchRequest::builder().query("navi").build();
        let matches = TeamMatchesRequest::builder().team_id(1).build();
        let team = TeamRequest::builder().slug("natus-vincere").build();
        let transfers = TransfersRequest::builder().id(7).build();

        assert_eq!(search.limit, 4);
        assert_eq!(matches.limit, 50);
        assert_eq!(matches.days, 180);
        assert!(matches.end_date.is_none());
        assert_eq!(team.locale, "en");
        assert_eq!(transfers.limit, 10);
        assert_eq!(UpcomingMatchesRequest::builder().team_id(1).build().limit, 100);
        assert_eq!(TeamNewsRequest::builder().slug("g2").build().limit, 5);
        assert_eq!(StatsRequest::builder().slug("g2").build().days, 180);
    }

    #[test]
    fn composite_serializes_with_labels() {
        let stats = PlayerStats {
            general_stats: json!({ "rating": 1.2 }),
            map_stats: json!([]),
            accuracy_stats: json!({}),
        };

        assert_eq!(
            serde_json::to_value(&stats).expect("serializable"),
            json!({
                "general_stats": { "rating": 1.2 },
                "map_stats": [],
                "accuracy_stats": {}
            })
        );
    }
}

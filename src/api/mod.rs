//! Domain queries against the BO3.gg Counter-Strike 2 API.
//!
//! Every query builds one or more [`crate::dispatch::Request`]s and returns the
//! upstream JSON unmodified. Paging and sort defaults are part of each method's
//! contract since they decide which records come back.
//!
//! ## Available Queries
//!
//! | Method | Endpoint |
//! |--------|----------|
//! | [`Client::live_matches`] | `/matches` (status `current`) |
//! | [`Client::finished_matches`] | `/matches` (status `finished`) |
//! | [`Client::todays_matches`] | `/matches` (status `upcoming`, today only) |
//! | [`Client::live_match_snapshot`] | `/live/matches/{id}/last_snapshot` |
//! | [`Client::match_details`] | `/matches/{slug}` |
//! | [`Client::player_matches`] | `/matches` (by player) |
//! | [`Client::team_matches`] | `/matches` (finished, by team, date window) |
//! | [`Client::team_upcoming_matches`] | `/matches` (upcoming and current, by team) |
//! | [`Client::search_teams`] | `/filters/teams` |
//! | [`Client::team_data`] | `/teams/{slug}` |
//! | [`Client::team_news`] | `/base_news` |
//! | [`Client::team_stats`] | `/teams/{slug}/general_stats` + `/advanced_stats` |
//! | [`Client::search_players`] | `/filters/players` |
//! | [`Client::player_details`] | `/players/{slug}` |
//! | [`Client::player_stats`] | `/players/{slug}/general_stats` + `/map_stats` + `/accuracy_stats` |
//! | [`Client::team_transfers`] | `/player_transfers` (by team) |
//! | [`Client::player_transfers`] | `/player_transfers` (by player) |
//!
//! # Dates
//!
//! All date windows use UTC day boundaries, taken from
//! [`crate::Config`]'s `today` source.
//!
//! # Composite queries
//!
//! [`Client::team_stats`] and [`Client::player_stats`] issue their requests
//! concurrently. The first failure fails the whole query and cancels the
//! requests still pending; partial stats are never returned.

pub mod matches;
pub mod players;
pub mod teams;
pub mod transfers;
pub mod types;

use chrono::{Days, NaiveDate};

#[cfg(doc)]
use crate::Client;
use crate::params::{DATE_FORMAT, ParameterMapping};

/// Relations embedded in match listings.
pub(crate) const MATCH_RELATIONS: &str = "teams,tournament,ai_predictions,games,streams";

/// Default look-back for date-windowed queries.
pub const DEFAULT_WINDOW_DAYS: u32 = 180;

/// An inclusive `[from, to]` range of UTC days.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    /// `[today - days, today]`.
    #[must_use]
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let from = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self { from, to: today }
    }

    /// `filter[<field>_from]` and `filter[<field>_to]`, as the stats endpoints expect.
    pub(crate) fn stats_filter(&self, field: &str) -> ParameterMapping {
        ParameterMapping::new()
            .filter_key(&format!("{field}_to"), self.to)
            .filter_key(&format!("{field}_from"), self.from)
    }
}

/// `YYYY-MM-DD 00:00`, the first minute of `day`.
pub(crate) fn day_start(day: NaiveDate) -> String {
    format!("{} 00:00", day.format(DATE_FORMAT))
}

/// `YYYY-MM-DD 23:59`, the last minute of `day`.
pub(crate) fn day_end(day: NaiveDate) -> String {
    format!("{} 23:59", day.format(DATE_FORMAT))
}

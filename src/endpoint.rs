//! Upstream path templates.
//!
//! Paths are modelled as data instead of interpolated strings: every path
//! segment that comes from a caller is either an integer ID or a validated
//! [`Slug`], so a malformed value is rejected before a URL is ever built.

use std::fmt;
use std::str::FromStr;

use crate::Result;
use crate::error::Error;

/// A URL-safe resource identifier such as `natus-vincere` or `s1mple`.
///
/// Accepts ASCII letters, digits, `-`, `_` and `.`; anything else (including
/// `/`, `?`, `#` and whitespace) is a [`crate::error::Kind::Validation`] error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    pub fn new<S: Into<String>>(slug: S) -> Result<Self> {
        let slug = slug.into();

        if slug.is_empty() {
            return Err(Error::validation("slug must not be empty"));
        }
        if slug == "." || slug == ".." {
            return Err(Error::validation(format!("`{slug}` is not a valid slug")));
        }
        if let Some(c) = slug
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(Error::validation(format!(
                "slug `{slug}` contains invalid character {c:?}"
            )));
        }

        Ok(Self(slug))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Slug {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Slug {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<String> for Slug {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every upstream resource path this crate talks to, relative to the base URL.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `matches`
    Matches,
    /// `matches/{slug}`
    Match(Slug),
    /// `live/matches/{id}/last_snapshot`
    LiveSnapshot(u64),
    /// `filters/teams`
    TeamSearch,
    /// `filters/players`
    PlayerSearch,
    /// `teams/{slug}`
    Team(Slug),
    /// `teams/{slug}/general_stats`
    TeamGeneralStats(Slug),
    /// `teams/{slug}/advanced_stats`
    TeamAdvancedStats(Slug),
    /// `players/{slug}`
    Player(Slug),
    /// `players/{slug}/general_stats`
    PlayerGeneralStats(Slug),
    /// `players/{slug}/map_stats`
    PlayerMapStats(Slug),
    /// `players/{slug}/accuracy_stats`
    PlayerAccuracyStats(Slug),
    /// `base_news`
    News,
    /// `player_transfers`
    Transfers,
}

impl Endpoint {
    /// The path relative to the base URL, without a leading `/`.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Matches => "matches".to_owned(),
            Self::Match(slug) => format!("matches/{slug}"),
            Self::LiveSnapshot(id) => format!("live/matches/{id}/last_snapshot"),
            Self::TeamSearch => "filters/teams".to_owned(),
            Self::PlayerSearch => "filters/players".to_owned(),
            Self::Team(slug) => format!("teams/{slug}"),
            Self::TeamGeneralStats(slug) => format!("teams/{slug}/general_stats"),
            Self::TeamAdvancedStats(slug) => format!("teams/{slug}/advanced_stats"),
            Self::Player(slug) => format!("players/{slug}"),
            Self::PlayerGeneralStats(slug) => format!("players/{slug}/general_stats"),
            Self::PlayerMapStats(slug) => format!("players/{slug}/map_stats"),
            Self::PlayerAccuracyStats(slug) => format!("players/{slug}/accuracy_stats"),
            Self::News => "base_news".to_owned(),
            Self::Transfers => "player_transfers".to_owned(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    #[test]
    fn slug_accepts_url_safe_identifiers() {
        for slug in ["natus-vincere", "s1mple", "team_liquid", "g2.esports"] {
            assert_eq!(Slug::new(slug).expect("valid slug").as_str(), slug);
        }
    }

    #[test]
    fn slug_rejects_path_and_query_characters() {
        for slug in ["", "a/b", "navi?x=1", "navi#top", "na vi", "..", "navi%2F"] {
            let err = Slug::new(slug).expect_err("slug should be rejected");
            assert_eq!(err.kind(), Kind::Validation, "slug {slug:?}");
        }
    }

    #[test]
    fn paths_render_from_templates() {
        let slug: Slug = "natus-vincere".parse().expect("valid slug");

        assert_eq!(Endpoint::Matches.path(), "matches");
        assert_eq!(
            Endpoint::LiveSnapshot(42).path(),
            "live/matches/42/last_snapshot"
        );
        assert_eq!(
            Endpoint::TeamAdvancedStats(slug.clone()).path(),
            "teams/natus-vincere/advanced_stats"
        );
        assert_eq!(
            Endpoint::PlayerAccuracyStats(slug).to_string(),
            "players/natus-vincere/accuracy_stats"
        );
    }
}

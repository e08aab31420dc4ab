//! Team and player lookups: search, profile, stats, news, matches and transfers.
//!
//! Run with tracing enabled:
//! ```sh
//! RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example stats --features tracing
//! ```
//!
//! The team and player can be overridden:
//! ```sh
//! TEAM=vitality PLAYER=zywoo cargo run --example stats --features tracing
//! ```

use cs2api::api::types::{
    SearchRequest, StatsRequest, TeamMatchesRequest, TeamNewsRequest, TeamRequest,
    TransfersRequest, UpcomingMatchesRequest,
};
use cs2api::{Client, Config, DEFAULT_HOST};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let team = std::env::var("TEAM").unwrap_or_else(|_| "natus-vincere".to_owned());
    let player = std::env::var("PLAYER").unwrap_or_else(|_| "s1mple".to_owned());

    let client = Client::connect(DEFAULT_HOST, Config::default()).await?;

    match client
        .search_teams(&SearchRequest::builder().query(team.as_str()).build())
        .await
    {
        Ok(response) => info!(endpoint = "search_teams", response = %response),
        Err(e) => debug!(endpoint = "search_teams", error = %e),
    }

    let team_id = match client
        .team_data(&TeamRequest::builder().slug(team.as_str()).build())
        .await
    {
        Ok(response) => {
            info!(endpoint = "team_data", name = %response["name"], rank = %response["rank"]);
            response["id"].as_u64()
        }
        Err(e) => {
            debug!(endpoint = "team_data", error = %e);
            None
        }
    };

    match client
        .team_stats(&StatsRequest::builder().slug(team.as_str()).build())
        .await
    {
        Ok(stats) => info!(
            endpoint = "team_stats",
            general = %stats.general_stats,
            advanced = %stats.advanced_stats
        ),
        Err(e) => debug!(endpoint = "team_stats", error = %e),
    }

    match client
        .team_news(&TeamNewsRequest::builder().slug(team.as_str()).build())
        .await
    {
        Ok(response) => {
            let count = response["results"].as_array().map_or(0, Vec::len);
            info!(endpoint = "team_news", count);
        }
        Err(e) => debug!(endpoint = "team_news", error = %e),
    }

    if let Some(team_id) = team_id {
        match client
            .team_matches(&TeamMatchesRequest::builder().team_id(team_id).build())
            .await
        {
            Ok(response) => info!(endpoint = "team_matches", total = %response["total"]),
            Err(e) => debug!(endpoint = "team_matches", error = %e),
        }

        match client
            .team_upcoming_matches(&UpcomingMatchesRequest::builder().team_id(team_id).build())
            .await
        {
            Ok(response) => info!(endpoint = "team_upcoming_matches", total = %response["total"]),
            Err(e) => debug!(endpoint = "team_upcoming_matches", error = %e),
        }

        match client
            .team_transfers(&TransfersRequest::builder().id(team_id).build())
            .await
        {
            Ok(response) => info!(endpoint = "team_transfers", response = %response),
            Err(e) => debug!(endpoint = "team_transfers", error = %e),
        }
    }

    match client
        .search_players(&SearchRequest::builder().query(player.as_str()).build())
        .await
    {
        Ok(response) => info!(endpoint = "search_players", response = %response),
        Err(e) => debug!(endpoint = "search_players", error = %e),
    }

    let player_id = match client.player_details(&player).await {
        Ok(response) => {
            info!(endpoint = "player_details", nickname = %response["nickname"]);
            response["id"].as_u64()
        }
        Err(e) => {
            debug!(endpoint = "player_details", error = %e);
            None
        }
    };

    match client
        .player_stats(&StatsRequest::builder().slug(player.as_str()).days(90).build())
        .await
    {
        Ok(stats) => info!(
            endpoint = "player_stats",
            general = %stats.general_stats,
            maps = %stats.map_stats,
            accuracy = %stats.accuracy_stats
        ),
        Err(e) => debug!(endpoint = "player_stats", error = %e),
    }

    if let Some(player_id) = player_id {
        match client.player_matches(player_id).await {
            Ok(response) => info!(endpoint = "player_matches", total = %response["total"]),
            Err(e) => debug!(endpoint = "player_matches", error = %e),
        }

        match client
            .player_transfers(&TransfersRequest::builder().id(player_id).build())
            .await
        {
            Ok(response) => info!(endpoint = "player_transfers", response = %response),
            Err(e) => debug!(endpoint = "player_transfers", error = %e),
        }
    }

    client.close()?;

    Ok(())
}

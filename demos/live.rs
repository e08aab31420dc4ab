//! Live and upcoming match listings, plus the latest snapshot of each live match.
//!
//! Run with tracing enabled:
//! ```sh
//! RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example live --features tracing
//! ```
//!
//! Optionally log to a file:
//! ```sh
//! LOG_FILE=live.log RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example live --features tracing
//! ```

use std::fs::File;

use cs2api::{Client, Config, DEFAULT_HOST};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = File::create(path)?;
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let client = Client::connect(DEFAULT_HOST, Config::default()).await?;

    match client.live_matches().await {
        Ok(response) => {
            let matches = response["results"].as_array().cloned().unwrap_or_default();
            info!(endpoint = "live_matches", count = matches.len());

            for live in &matches {
                info!(
                    endpoint = "live_matches",
                    slug = %live["slug"],
                    team_1 = %live["team1"]["name"],
                    team_2 = %live["team2"]["name"],
                );

                let Some(id) = live["id"].as_u64() else {
                    continue;
                };
                match client.live_match_snapshot(id).await {
                    Ok(snapshot) => info!(endpoint = "live_match_snapshot", id, snapshot = %snapshot),
                    Err(e) => debug!(endpoint = "live_match_snapshot", id, error = %e),
                }
            }
        }
        Err(e) => debug!(endpoint = "live_matches", error = %e),
    }

    match client.todays_matches().await {
        Ok(response) => {
            let count = response["results"].as_array().map_or(0, Vec::len);
            info!(endpoint = "todays_matches", count);
        }
        Err(e) => debug!(endpoint = "todays_matches", error = %e),
    }

    match client.finished_matches().await {
        Ok(response) => {
            let count = response["results"].as_array().map_or(0, Vec::len);
            info!(endpoint = "finished_matches", count);
        }
        Err(e) => debug!(endpoint = "finished_matches", error = %e),
    }

    client.close()?;

    Ok(())
}

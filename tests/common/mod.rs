#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests, and https://github.com/rust-lang/rust-clippy/issues/13981"
)]
#![allow(
    unused,
    reason = "Not every test binary uses every helper"
)]

use std::time::Duration;

use cs2api::dispatch::RetryConfig;
use cs2api::types::NaiveDate;
use cs2api::{Client, Config};
use httpmock::MockServer;

/// The date every pinned client treats as "today".
pub const TODAY: &str = "2024-05-01";

#[must_use]
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

#[must_use]
pub fn pinned_config() -> Config {
    Config::builder()
        .today(today)
        .timeout(Duration::from_secs(5))
        .build()
}

pub async fn connect(server: &MockServer) -> anyhow::Result<Client> {
    Ok(Client::connect(&server.base_url(), pinned_config()).await?)
}

pub async fn connect_with_retries(server: &MockServer, retries: u32) -> anyhow::Result<Client> {
    let mut retry = RetryConfig::with_max_retries(retries);
    retry.initial_backoff = Duration::from_millis(10);
    retry.max_backoff = Duration::from_millis(20);

    let config = Config::builder().today(today).retry(retry).build();
    Ok(Client::connect(&server.base_url(), config).await?)
}

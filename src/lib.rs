#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod api;
pub mod client;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod params;
pub(crate) mod serde_helpers;
pub mod session;
pub mod types;

use reqwest::Request;
use serde::de::DeserializeOwned;

pub use crate::client::{Client, Config};
use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Base URL of the BO3.gg public API.
pub const DEFAULT_HOST: &str = "https://api.bo3.gg/api/v1/";

/// BO3.gg discipline id for Counter-Strike 2.
pub const CS2_DISCIPLINE_ID: u32 = 1;

#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip(client, request),
        fields(
            method = %request.method(),
            path = request.url().path(),
            status_code
        )
    )
)]
async fn request<Response: DeserializeOwned>(
    client: &reqwest::Client,
    request: Request,
) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    let response = client.execute(request).await?;
    let status_code = response.status();

    #[cfg(feature = "tracing")]
    tracing::Span::current().record("status_code", status_code.as_u16());

    // Read the body to the end so the connection goes back to the pool
    let body = response.bytes().await?;

    if !status_code.is_success() {
        let message = String::from_utf8_lossy(&body).into_owned();
        let error_body = serde_json::from_slice::<serde_json::Value>(&body).ok();

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "API request failed"
        );

        return Err(Error::status(status_code, method, path, error_body, message));
    }

    serde_helpers::decode(&path, &body)
}

//! Turns a [`Request`] into a decoded payload or a structured [`Error`](crate::error::Error).

use std::time::Duration;

use backoff::backoff::Backoff as _;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::Result;
use crate::endpoint::Endpoint;
use crate::params::ParameterMapping;
use crate::session::Session;

const DEFAULT_INITIAL_BACKOFF_DURATION: Duration = Duration::from_millis(250);
const DEFAULT_MAX_BACKOFF_DURATION: Duration = Duration::from_secs(4);
const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// One upstream call: a method, an endpoint and its query parameters.
///
/// Immutable once built. Every dispatch of a `Request` is exactly one HTTP call
/// (plus any retries the [`RetryConfig`] allows).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    endpoint: Endpoint,
    params: ParameterMapping,
}

impl Request {
    #[must_use]
    pub fn get(endpoint: Endpoint, params: ParameterMapping) -> Self {
        Self {
            method: Method::GET,
            endpoint,
            params,
        }
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    #[must_use]
    pub fn params(&self) -> &ParameterMapping {
        &self.params
    }
}

/// Bounded retry for idempotent requests.
///
/// Disabled by default. When enabled, only transport failures and 5xx responses
/// are retried; 4xx responses, decode failures and session misuse never are.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Additional attempts after the first one. `0` disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Upper bound for any single delay
    pub max_backoff: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// A policy allowing up to `max_retries` retries with the default backoff.
    #[must_use]
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: DEFAULT_INITIAL_BACKOFF_DURATION,
            max_backoff: DEFAULT_MAX_BACKOFF_DURATION,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl From<RetryConfig> for ExponentialBackoff {
    fn from(config: RetryConfig) -> Self {
        ExponentialBackoffBuilder::default()
            .with_initial_interval(config.initial_backoff)
            .with_max_interval(config.max_backoff)
            .with_multiplier(config.backoff_multiplier)
            .with_max_elapsed_time(None) // Attempts are capped by max_retries instead
            .build()
    }
}

/// Encodes, sends and decodes requests over the injected [`Session`].
#[derive(Debug)]
pub struct Dispatcher {
    host: Url,
    session: Session,
    retry: RetryConfig,
}

impl Dispatcher {
    pub(crate) fn new(host: Url, session: Session, retry: RetryConfig) -> Self {
        Self {
            host,
            session,
            retry,
        }
    }

    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The full URL `request` is sent to.
    pub fn url(&self, request: &Request) -> Result<Url> {
        let query = request.params.query_string()?;
        Ok(Url::parse(&format!(
            "{}{}{query}",
            self.host,
            request.endpoint.path()
        ))?)
    }

    /// Sends `request` and returns the decoded JSON tree.
    pub async fn send(&self, request: &Request) -> Result<Value> {
        self.send_as(request).await
    }

    /// Sends `request` and decodes the body into `T`.
    pub async fn send_as<T: DeserializeOwned>(&self, request: &Request) -> Result<T> {
        let url = self.url(request)?;
        let mut backoff: Option<ExponentialBackoff> = None;
        let mut retries = 0;

        loop {
            match self.attempt(&request.method, &url).await {
                Err(e) if retries < self.retry.max_retries && e.is_transient() => {
                    retries += 1;
                    let delay = backoff
                        .get_or_insert_with(|| self.retry.clone().into())
                        .next_backoff()
                        .unwrap_or(self.retry.max_backoff)
                        .min(self.retry.max_backoff);

                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        retry = retries,
                        delay = ?delay,
                        path = url.path(),
                        error = %e,
                        "retrying request"
                    );

                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    async fn attempt<T: DeserializeOwned>(&self, method: &Method, url: &Url) -> Result<T> {
        let lease = self.session.lease().await?;
        let request = lease
            .client()
            .request(method.clone(), url.clone())
            .build()?;

        crate::request(lease.client(), request).await
    }
}

//! The [`Client`] handle and its [`Config`].

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use bon::Builder;
use chrono::{NaiveDate, Utc};
use futures::FutureExt as _;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::dispatch::{Dispatcher, Request, RetryConfig};
use crate::endpoint::Endpoint;
use crate::params::ParameterMapping;
use crate::session::{Session, Settings};
use crate::{DEFAULT_HOST, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 8;
const DEFAULT_USER_AGENT: &str = concat!("cs2api/", env!("CARGO_PKG_VERSION"));

/// Today's date at the UTC day boundary.
#[must_use]
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Configuration for [`Client`]
#[derive(Clone, Debug, Builder)]
pub struct Config {
    /// Per-request timeout, covering connect, send and reading the whole body.
    /// The default is thirty (30) seconds.
    #[builder(default = DEFAULT_TIMEOUT)]
    timeout: Duration,
    /// Timeout for establishing a connection. The default is ten (10) seconds.
    #[builder(default = DEFAULT_CONNECT_TIMEOUT)]
    connect_timeout: Duration,
    #[builder(into, default = DEFAULT_USER_AGENT.to_owned())]
    user_agent: String,
    /// Idle connections kept per host once requests complete.
    #[builder(default = DEFAULT_POOL_MAX_IDLE_PER_HOST)]
    pool_max_idle_per_host: usize,
    /// Retry policy for transient failures. Retrying is off by default.
    #[builder(default)]
    retry: RetryConfig,
    /// Source of "today" for date windows. Defaults to [`utc_today`]; override it
    /// to pin dates in tests.
    #[builder(default = utc_today as fn() -> NaiveDate)]
    today: fn() -> NaiveDate,
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}

impl Config {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }
}

/// Async client for the BO3.gg Counter-Strike 2 API.
///
/// A client owns exactly one [`Session`]. It starts closed: call [`Client::open`]
/// (or build it with [`Client::connect`]) before issuing queries, and
/// [`Client::close`] when done, or let [`Client::scope`] do both. Clones share
/// the same session and may issue requests concurrently.
///
/// # Example
///
/// ```no_run
/// use cs2api::{Client, Config, DEFAULT_HOST};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::connect(DEFAULT_HOST, Config::default()).await?;
///
/// let live = client.live_matches().await?;
/// println!("{live}");
///
/// client.close()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    config: Config,
    dispatcher: Dispatcher,
}

impl Default for Client {
    fn default() -> Self {
        Client::new(DEFAULT_HOST, Config::default())
            .expect("Client with default endpoint should succeed")
    }
}

impl Client {
    /// Creates a closed client for `host`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the user agent is not a valid header value.
    pub fn new(host: &str, config: Config) -> Result<Client> {
        let mut host = Url::parse(host)?;
        if !host.path().ends_with('/') {
            let path = format!("{}/", host.path());
            host.set_path(&path);
        }

        let settings = Settings::new(
            &config.user_agent,
            config.timeout,
            config.connect_timeout,
            config.pool_max_idle_per_host,
        )?;
        let dispatcher = Dispatcher::new(host, Session::new(settings), config.retry.clone());

        Ok(Self {
            inner: Arc::new(ClientInner { config, dispatcher }),
        })
    }

    /// Creates a client for `host` and opens its session.
    pub async fn connect(host: &str, config: Config) -> Result<Client> {
        let client = Client::new(host, config)?;
        client.open().await?;
        Ok(client)
    }

    /// Returns the base URL of the API.
    #[must_use]
    pub fn host(&self) -> &Url {
        self.inner.dispatcher.host()
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        self.inner.dispatcher.session()
    }

    /// Opens the session. Fails if it is already open.
    pub async fn open(&self) -> Result<()> {
        self.session().open().await
    }

    /// Closes the session. A no-op when already closed; fails while requests are in flight.
    pub fn close(&self) -> Result<()> {
        self.session().close()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session().is_open()
    }

    /// Number of requests currently holding the session.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.session().in_flight()
    }

    /// Opens the session, runs `f`, and closes the session again whether `f`
    /// succeeds, fails or panics, or the returned future is dropped before
    /// completing. A panic is resumed after the session is closed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cs2api::Client;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::default();
    /// let details = client
    ///     .scope(|client| async move { client.player_details("s1mple").await })
    ///     .await?;
    /// assert!(!client.is_open());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scope<F, Fut, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(Client) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.open().await?;
        let guard = ScopeGuard {
            session: Some(self.session()),
        };

        let outcome = AssertUnwindSafe(f(self.clone())).catch_unwind().await;
        let closed = guard.close();

        match outcome {
            Ok(result) => {
                let value = result?;
                closed?;
                Ok(value)
            }
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    /// Sends a prepared [`Request`].
    pub async fn send(&self, request: &Request) -> Result<Value> {
        self.inner.dispatcher.send(request).await
    }

    /// Sends a prepared [`Request`] and decodes the body into `T`.
    pub async fn send_as<T: DeserializeOwned>(&self, request: &Request) -> Result<T> {
        self.inner.dispatcher.send_as(request).await
    }

    /// GETs any [`Endpoint`] with caller-built parameters.
    pub async fn get(&self, endpoint: Endpoint, params: ParameterMapping) -> Result<Value> {
        self.send(&Request::get(endpoint, params)).await
    }

    /// Like [`Self::get`], decoding into `T`.
    pub async fn get_as<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: ParameterMapping,
    ) -> Result<T> {
        self.send_as(&Request::get(endpoint, params)).await
    }

    pub(crate) fn today(&self) -> NaiveDate {
        (self.inner.config.today)()
    }
}

/// Closes the session of a [`Client::scope`] on every exit path.
///
/// Dropped after the scoped future, so no lease of that future is alive any more.
struct ScopeGuard<'client> {
    session: Option<&'client Session>,
}

impl ScopeGuard<'_> {
    fn close(mut self) -> Result<()> {
        self.session.take().map_or(Ok(()), Session::close)
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        if let Err(e) = session.close() {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %e, "cancelled scope left the session open");
            #[cfg(not(feature = "tracing"))]
            let _: crate::error::Error = e;
        }
    }
}

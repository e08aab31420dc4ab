//! The pooled network context shared by every request of one [`crate::Client`].
//!
//! A [`Session`] is explicitly opened and closed. While closed, every dispatch
//! fails fast with [`SessionMisuse::Closed`]; nothing reopens it behind the
//! caller's back. Each in-flight request holds a [`Lease`] for its whole
//! lifetime, which is what lets [`Session::close`] refuse to tear the pool down
//! underneath a request. Dropping the session (or the last client handle) drops
//! the pool and releases every socket.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use reqwest::Client as ReqwestClient;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::Result;
use crate::error::SessionMisuse;

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub headers: HeaderMap,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_max_idle_per_host: usize,
}

impl Settings {
    pub(crate) fn new(
        user_agent: &str,
        timeout: Duration,
        connect_timeout: Duration,
        pool_max_idle_per_host: usize,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("Connection", HeaderValue::from_static("keep-alive"));

        Ok(Self {
            headers,
            timeout,
            connect_timeout,
            pool_max_idle_per_host,
        })
    }
}

#[derive(Debug)]
pub struct Session {
    settings: Settings,
    /// `Some` while open. Leases hold the read side, open/close take the write side.
    client: RwLock<Option<ReqwestClient>>,
    open: AtomicBool,
    in_flight: AtomicUsize,
}

impl Session {
    pub(crate) fn new(settings: Settings) -> Self {
        Self {
            settings,
            client: RwLock::new(None),
            open: AtomicBool::new(false),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Builds the connection pool.
    ///
    /// Fails with [`SessionMisuse::AlreadyOpen`] if the session is already open.
    pub async fn open(&self) -> Result<()> {
        // Fail before queueing for the write lock behind in-flight leases
        if self.is_open() {
            return Err(SessionMisuse::AlreadyOpen.into());
        }

        let mut guard = self.client.write().await;
        if guard.is_some() {
            return Err(SessionMisuse::AlreadyOpen.into());
        }

        let client = ReqwestClient::builder()
            .default_headers(self.settings.headers.clone())
            .timeout(self.settings.timeout)
            .connect_timeout(self.settings.connect_timeout)
            .pool_max_idle_per_host(self.settings.pool_max_idle_per_host)
            .build()?;

        *guard = Some(client);
        self.open.store(true, Ordering::Release);

        #[cfg(feature = "tracing")]
        tracing::debug!(timeout = ?self.settings.timeout, "session opened");

        Ok(())
    }

    /// Releases the connection pool.
    ///
    /// A no-op on a closed session. Fails with [`SessionMisuse::InUse`], leaving
    /// the session open, while any request is in flight.
    pub fn close(&self) -> Result<()> {
        let Ok(mut guard) = self.client.try_write() else {
            return Err(SessionMisuse::InUse {
                in_flight: self.in_flight(),
            }
            .into());
        };

        if guard.take().is_some() {
            self.open.store(false, Ordering::Release);

            #[cfg(feature = "tracing")]
            tracing::debug!("session closed");
        }

        Ok(())
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Number of requests currently holding the session.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Borrows the pool for one request.
    pub(crate) async fn lease(&self) -> Result<Lease<'_>> {
        let guard = self.client.read().await;
        let client = RwLockReadGuard::try_map(guard, Option::as_ref)
            .map_err(|_closed| SessionMisuse::Closed)?;

        self.in_flight.fetch_add(1, Ordering::AcqRel);

        Ok(Lease {
            client,
            in_flight: &self.in_flight,
        })
    }
}

/// Shared access to an open pool for the duration of one request.
///
/// Released on drop, including when the request future is cancelled.
#[derive(Debug)]
pub(crate) struct Lease<'session> {
    client: RwLockReadGuard<'session, ReqwestClient>,
    in_flight: &'session AtomicUsize,
}

impl Lease<'_> {
    pub(crate) fn client(&self) -> &ReqwestClient {
        &self.client
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

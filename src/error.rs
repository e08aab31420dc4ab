use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

/// Re-exported so callers can match on [`Status::method`].
pub use reqwest::Method;
/// Re-exported so callers can match on [`Status::status_code`].
pub use reqwest::StatusCode;
use reqwest::header;
use serde_json::Value;

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// The session was used while closed, opened twice, or closed while in use
    Session,
    /// DNS, connection or timeout failure before any HTTP response was received
    Transport,
    /// Error related to non-successful HTTP call
    Status,
    /// A response body could not be parsed as JSON or as the requested type
    Decode,
    /// Error related to invalid input, caught before a request is built
    Validation,
    /// Internal error from dependencies
    Internal,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    /// The HTTP status code, when this error came from a non-2xx response.
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        self.downcast_ref::<Status>().map(|s| s.status_code)
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Validation {
            reason: message.into(),
        }
        .into()
    }

    pub fn status<S: Into<String>>(
        status_code: StatusCode,
        method: Method,
        path: String,
        body: Option<Value>,
        message: S,
    ) -> Self {
        Status {
            status_code,
            method,
            path,
            body,
            message: message.into(),
        }
        .into()
    }

    #[must_use]
    pub fn session(misuse: SessionMisuse) -> Self {
        misuse.into()
    }

    pub(crate) fn decode(path: String, source: serde_json::Error) -> Self {
        Decode {
            path,
            json_path: None,
            source,
        }
        .into()
    }

    pub(crate) fn decode_at(path: String, json_path: String, source: serde_json::Error) -> Self {
        Decode {
            path,
            json_path: Some(json_path),
            source,
        }
        .into()
    }

    /// Whether a retry policy may re-issue the request that produced this error.
    ///
    /// Only transport failures and 5xx responses qualify.
    pub(crate) fn is_transient(&self) -> bool {
        match self.kind {
            Kind::Transport => true,
            Kind::Status => self
                .downcast_ref::<Status>()
                .is_some_and(Status::is_server_error),
            _ => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Ways a [`crate::session::Session`] can be misused.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMisuse {
    /// A request was dispatched while the session was closed
    Closed,
    /// `open` was called on a session that is already open
    AlreadyOpen,
    /// `close` was called while requests were still in flight
    InUse {
        /// Number of requests holding the session at the time of the call
        in_flight: usize,
    },
}

impl fmt::Display for SessionMisuse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "session is closed, call `open` first"),
            Self::AlreadyOpen => write!(f, "session is already open"),
            Self::InUse { in_flight } => {
                write!(f, "session closed with {in_flight} request(s) in flight")
            }
        }
    }
}

impl StdError for SessionMisuse {}

/// What kind of transport failure occurred.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCause {
    /// The request or the connect phase exceeded its timeout
    Timeout,
    /// The connection could not be established (DNS, refused, TLS)
    Connect,
    /// Any other failure while sending the request or reading the body
    Other,
}

impl TransportCause {
    fn classify(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect
        } else {
            Self::Other
        }
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Transport {
    pub cause: TransportCause,
    pub source: reqwest::Error,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport failure ({:?}): {}", self.cause, self.source)
    }
}

impl StdError for Transport {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.source)
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Status {
    pub status_code: StatusCode,
    pub method: Method,
    pub path: String,
    /// The error body, when upstream sent one that parses as JSON
    pub body: Option<Value>,
    /// The raw error body
    pub message: String,
}

impl Status {
    /// 4xx: the request itself was at fault. Never retried.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code.is_client_error()
    }

    /// 5xx: possibly transient.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code.is_server_error()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} returned {}: {}",
            self.method, self.path, self.status_code, self.message
        )
    }
}

impl StdError for Status {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Decode {
    /// Request path whose response failed to decode
    pub path: String,
    /// Location inside the JSON document, for typed decoding
    pub json_path: Option<String>,
    pub source: serde_json::Error,
}

impl fmt::Display for Decode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.json_path {
            Some(at) => write!(
                f,
                "unable to decode response from {} at `{at}`: {}",
                self.path, self.source
            ),
            None => write!(
                f,
                "unable to decode response from {}: {}",
                self.path, self.source
            ),
        }
    }
}

impl StdError for Decode {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.source)
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            return Error::with_source(Kind::Internal, e);
        }

        Transport {
            cause: TransportCause::classify(&e),
            source: e,
        }
        .into()
    }
}

impl From<header::InvalidHeaderValue> for Error {
    fn from(e: header::InvalidHeaderValue) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<serde_html_form::ser::Error> for Error {
    fn from(e: serde_html_form::ser::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<SessionMisuse> for Error {
    fn from(err: SessionMisuse) -> Self {
        Error::with_source(Kind::Session, err)
    }
}

impl From<Transport> for Error {
    fn from(err: Transport) -> Self {
        Error::with_source(Kind::Transport, err)
    }
}

impl From<Status> for Error {
    fn from(err: Status) -> Self {
        Error::with_source(Kind::Status, err)
    }
}

impl From<Decode> for Error {
    fn from(err: Decode) -> Self {
        Error::with_source(Kind::Decode, err)
    }
}

impl From<Validation> for Error {
    fn from(err: Validation) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn session_misuse_display_should_succeed() {
        assert_eq!(
            SessionMisuse::InUse { in_flight: 2 }.to_string(),
            "session closed with 2 request(s) in flight"
        );
        assert_eq!(
            SessionMisuse::Closed.to_string(),
            "session is closed, call `open` first"
        );
    }

    #[test]
    fn session_misuse_into_error_should_succeed() {
        let error: Error = SessionMisuse::AlreadyOpen.into();

        assert_eq!(error.kind(), Kind::Session);
        assert_eq!(
            error.downcast_ref::<SessionMisuse>(),
            Some(&SessionMisuse::AlreadyOpen)
        );
    }

    #[test]
    fn status_exposes_code_and_body() {
        let error = Error::status(
            StatusCode::NOT_FOUND,
            Method::GET,
            "/matches/nope".to_owned(),
            Some(json!({ "error": "not found" })),
            r#"{"error":"not found"}"#,
        );

        assert_eq!(error.kind(), Kind::Status);
        assert_eq!(error.status_code(), Some(StatusCode::NOT_FOUND));

        let status = error.downcast_ref::<Status>().expect("status payload");
        assert!(status.is_client_error());
        assert!(!status.is_server_error());
        assert_eq!(status.body, Some(json!({ "error": "not found" })));
    }

    #[test]
    fn only_server_errors_are_transient() {
        let not_found = Error::status(
            StatusCode::NOT_FOUND,
            Method::GET,
            "/".to_owned(),
            None,
            "",
        );
        let unavailable = Error::status(
            StatusCode::SERVICE_UNAVAILABLE,
            Method::GET,
            "/".to_owned(),
            None,
            "",
        );

        assert!(!not_found.is_transient());
        assert!(unavailable.is_transient());
        assert!(!Error::validation("bad slug").is_transient());
        assert!(!Error::session(SessionMisuse::Closed).is_transient());
    }

    #[test]
    fn decode_display_includes_json_path() {
        let source = serde_json::from_str::<u32>("\"x\"").expect_err("string is not a u32");
        let error = Error::decode_at("/teams/navi".to_owned(), "data.id".to_owned(), source);

        assert_eq!(error.kind(), Kind::Decode);
        assert!(error.to_string().contains("at `data.id`"));
    }
}

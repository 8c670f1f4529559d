//! Error types for the Scryfall API client.
//!
//! Remote failures, transport failures, and local usage mistakes are all
//! variants of one [`Error`] enum. Nothing in this crate retries or swallows
//! an error; callers decide what to do with each kind.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for Scryfall operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by a [`Transport`](crate::client::Transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for all Scryfall API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No response reached us (DNS, connection, TLS, timeout)
    #[error("Transport error calling {url}: {source}")]
    Transport {
        /// URL that was being requested
        url: String,
        /// Underlying transport failure
        #[source]
        source: BoxError,
    },

    /// The API answered with a non-success status
    #[error("API error: status={status}, code={code}, details={details}")]
    RemoteApi {
        /// HTTP status code
        status: u16,
        /// Error code from the payload (e.g. `not_found`)
        code: String,
        /// Human-readable details from the payload
        details: String,
        /// Raw response body for debugging
        body: Value,
    },

    /// The same parameter was supplied positionally and by keyword
    #[error("Parameter '{param}' of endpoint '{endpoint}' was given more than once")]
    AmbiguousParameter {
        /// Endpoint key, e.g. `sets.code`
        endpoint: String,
        /// Parameter given twice
        param: String,
    },

    /// A record lookup found neither a payload field nor an attribute
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Indexed access past the end of a fully fetched sequence
    #[error("Index {index} out of range for sequence of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Length after every available page was fetched
        len: usize,
    },

    /// No endpoint with that name under the current node
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// A path parameter was never supplied
    #[error("Endpoint '{endpoint}' requires path parameter '{param}'")]
    MissingPathParameter {
        /// Endpoint key
        endpoint: String,
        /// Missing parameter name
        param: String,
    },

    /// More positional arguments than the endpoint declares
    #[error("Endpoint '{endpoint}' accepts {expected} positional argument(s), {given} given")]
    TooManyArguments {
        /// Endpoint key
        endpoint: String,
        /// Number of positional slots left to fill
        expected: usize,
        /// Number of positional arguments supplied
        given: usize,
    },

    /// A keyword that is neither a path parameter nor allowed as a query
    /// parameter in this position
    #[error("Endpoint '{endpoint}' does not take parameter '{param}' here")]
    UnexpectedParameter {
        /// Endpoint key
        endpoint: String,
        /// Offending parameter
        param: String,
    },

    /// A card collection request without identifiers
    #[error("A non-empty list of identifiers is needed")]
    TooFewIdentifiers,

    /// A card collection request over the API limit
    #[error("A maximum of {max} identifiers are allowed, {given} provided")]
    TooManyIdentifiers {
        /// API limit
        max: usize,
        /// Number supplied
        given: usize,
    },

    /// An identifier the collection endpoint cannot accept
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Header name or value that cannot be sent
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing a download to its sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` for mistakes in how the library was called, raised
    /// before any request went out.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Error::AmbiguousParameter { .. }
                | Error::KeyNotFound(_)
                | Error::IndexOutOfRange { .. }
                | Error::UnknownEndpoint(_)
                | Error::MissingPathParameter { .. }
                | Error::TooManyArguments { .. }
                | Error::UnexpectedParameter { .. }
                | Error::TooFewIdentifiers
                | Error::TooManyIdentifiers { .. }
                | Error::InvalidIdentifier(_)
                | Error::InvalidHeader(_)
        )
    }

    /// Returns `true` if the API rejected the request as a client error.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::RemoteApi { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::RemoteApi { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Build a remote error from a status and the raw response body.
    ///
    /// Scryfall error objects carry `code` and `details`; bodies that are not
    /// JSON keep their text as the details.
    pub(crate) fn from_api_response(status: u16, raw: &[u8]) -> Self {
        let body: Value = serde_json::from_slice(raw).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(raw).into_owned())
        });

        let code = body
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        let details = match &body {
            Value::String(text) if !text.is_empty() => text.clone(),
            other => other
                .get("details")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| {
                    reqwest::StatusCode::from_u16(status)
                        .ok()
                        .and_then(|s| s.canonical_reason())
                        .unwrap_or("Error in calling Scryfall API")
                        .to_string()
                }),
        };

        Error::RemoteApi {
            status,
            code,
            details,
            body,
        }
    }
}

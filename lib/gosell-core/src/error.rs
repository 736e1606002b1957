//! Error taxonomy for the payment API client.
//!
//! Every recoverable failure of a request ends up as one of four [`Error`]
//! variants, tagged by [`ErrorKind`]:
//!
//! | Kind | Meaning |
//! |------|---------|
//! | `Network` | the round trip did not complete (connection, timeout, TLS, DNS) |
//! | `Serialization` | a body could not be encoded, or decoded against its schema |
//! | `Api` | the server answered outside 2xx with a structured error payload |
//! | `Unknown` | no transport error, but no usable response either |
//!
//! Misconfiguration (missing secret key, missing bundle identifier) is not
//! part of this taxonomy: it is reported once, at construction time, as a
//! [`ConfigError`].

use derive_more::{Display, Error};

use crate::{ApiError, Response};

// ============================================================================
// Error Kind
// ============================================================================

/// Stable tag for programmatic matching on [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// Transport-level failure.
    #[display("network")]
    Network,
    /// Encoding or decoding failure.
    #[display("serialization")]
    Serialization,
    /// Structured error reported by the API.
    #[display("api")]
    Api,
    /// Anything else.
    #[display("unknown")]
    Unknown,
}

// ============================================================================
// Transport Error
// ============================================================================

/// Failure reported by the transport before a usable response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum TransportError {
    /// Network/connection errors (including DNS resolution).
    #[display("connection error: {_0}")]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    Timeout,

    /// The request could not be turned into a wire request.
    #[display("invalid request: {_0}")]
    InvalidRequest(#[error(not(source))] String),

    /// The response body could not be read to completion.
    #[display("failed to read response body: {_0}")]
    Body(#[error(not(source))] String),
}

impl TransportError {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

// ============================================================================
// Serialization Error
// ============================================================================

/// JSON encoding or decoding failure, with the path where it happened.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("JSON error at '{path}': {message}")]
pub struct SerializationError {
    path: String,
    message: String,
}

impl SerializationError {
    /// Create a serialization error.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// JSON path to the offending value (e.g. `card.exp_month`), `.` for the root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Underlying message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Typed failure of a request.
///
/// Created only by the encoder, the response decoder and the dispatcher, and
/// immutable afterwards. Variants keep the response head (status and headers)
/// whenever the server actually answered.
#[derive(Debug, Clone, Display, Error)]
pub enum Error {
    /// The transport failed to complete the round trip.
    #[display("network error: {cause}")]
    Network {
        /// Transport failure.
        #[error(source)]
        cause: TransportError,
        /// Response head, when one was received before the failure.
        response: Option<Response<()>>,
    },

    /// A request body could not be encoded or a response body could not be decoded.
    #[display("serialization error: {cause}")]
    Serialization {
        /// Encoding/decoding failure.
        #[error(source)]
        cause: SerializationError,
        /// Response head, absent when encoding the request failed.
        response: Option<Response<()>>,
    },

    /// The server answered outside the success range with a structured error.
    #[display("API error {} ({}): {}", response.status(), error.code, error.message)]
    Api {
        /// Decoded error payload.
        error: ApiError,
        /// Response head.
        response: Response<()>,
    },

    /// No transport error, and no structured response could be obtained.
    #[display("unexpected response")]
    Unknown {
        /// Response head, if the transport exposed one.
        #[error(not(source))]
        response: Option<Response<()>>,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Create a network error.
    #[must_use]
    pub fn network(cause: TransportError, response: Option<Response<()>>) -> Self {
        Self::Network { cause, response }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(cause: SerializationError, response: Option<Response<()>>) -> Self {
        Self::Serialization { cause, response }
    }

    /// Create an API error.
    #[must_use]
    pub fn api(error: ApiError, response: Response<()>) -> Self {
        Self::Api { error, response }
    }

    /// Create an unknown error.
    #[must_use]
    pub fn unknown(response: Option<Response<()>>) -> Self {
        Self::Unknown { response }
    }

    /// Kind tag of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Serialization { .. } => ErrorKind::Serialization,
            Self::Api { .. } => ErrorKind::Api,
            Self::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Response head the error originated from, if any.
    #[must_use]
    pub const fn response(&self) -> Option<&Response<()>> {
        match self {
            Self::Network { response, .. }
            | Self::Serialization { response, .. }
            | Self::Unknown { response } => response.as_ref(),
            Self::Api { response, .. } => Some(response),
        }
    }

    /// HTTP status code of the originating response, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response().map(Response::status)
    }

    /// Decoded API error payload, for [`Error::Api`].
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Returns `true` if this is a network error.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Returns `true` if the transport gave up waiting.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Network {
                cause: TransportError::Timeout,
                ..
            }
        )
    }
}

// ============================================================================
// Configuration Error
// ============================================================================

/// Integration defect detected while configuring the client.
///
/// These are not request failures: they mean the SDK is being used before it
/// was configured, and should be caught before release.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ConfigError {
    /// The secret key is empty.
    #[display("secret key must be set in order to use goSell")]
    EmptySecretKey,

    /// The application bundle identifier is empty.
    #[display("application must have a bundle identifier in order to use goSell")]
    EmptyApplicationId,

    /// The base URL could not be parsed.
    #[display("invalid base URL: {_0}")]
    InvalidBaseUrl(url::ParseError),

    /// A request path does not resolve under the base URL (absolute URL,
    /// `..` segments leaving the base path, or unparseable).
    #[display("request path '{path}' does not resolve under the base URL")]
    InvalidPath {
        /// The rejected path.
        path: String,
    },

    /// No tokio runtime was available to run requests on.
    #[display("no tokio runtime available to run requests on")]
    NoRuntime,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn head(status: u16) -> Response<()> {
        Response::new(status, HashMap::new(), ())
    }

    fn api_error() -> ApiError {
        ApiError {
            code: "1001".to_string(),
            message: "invalid card".to_string(),
            description: None,
        }
    }

    #[test]
    fn error_display() {
        let err = Error::network(TransportError::Timeout, None);
        assert_eq!(err.to_string(), "network error: request timeout");

        let err = Error::serialization(SerializationError::new("card.exp_month", "invalid type"), None);
        assert_eq!(
            err.to_string(),
            "serialization error: JSON error at 'card.exp_month': invalid type"
        );

        let err = Error::api(api_error(), head(400));
        assert_eq!(err.to_string(), "API error 400 (1001): invalid card");

        assert_eq!(Error::unknown(None).to_string(), "unexpected response");
    }

    #[test]
    fn error_kind() {
        assert_eq!(
            Error::network(TransportError::connection("refused"), None).kind(),
            ErrorKind::Network
        );
        assert_eq!(
            Error::serialization(SerializationError::new(".", "eof"), Some(head(200))).kind(),
            ErrorKind::Serialization
        );
        assert_eq!(Error::api(api_error(), head(402)).kind(), ErrorKind::Api);
        assert_eq!(Error::unknown(None).kind(), ErrorKind::Unknown);
        assert_eq!(ErrorKind::Serialization.to_string(), "serialization");
    }

    #[test]
    fn error_response_and_status() {
        assert_eq!(Error::api(api_error(), head(404)).status(), Some(404));
        assert_eq!(
            Error::network(TransportError::Timeout, Some(head(200))).status(),
            Some(200)
        );
        assert_eq!(Error::unknown(None).status(), None);
        assert!(Error::unknown(None).response().is_none());
    }

    #[test]
    fn error_api_payload() {
        let err = Error::api(api_error(), head(400));
        assert_eq!(err.api_error().map(|e| e.message.as_str()), Some("invalid card"));
        assert!(Error::unknown(None).api_error().is_none());
    }

    #[test]
    fn error_is_timeout() {
        assert!(Error::network(TransportError::Timeout, None).is_timeout());
        assert!(Error::network(TransportError::Timeout, None).is_network());
        assert!(!Error::network(TransportError::tls("bad cert"), None).is_timeout());
        assert!(!Error::unknown(None).is_network());
    }

    #[test]
    fn network_error_exposes_source() {
        use std::error::Error as _;

        let err = Error::network(TransportError::connection("refused"), None);
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("connection error: refused"));
    }

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError::EmptySecretKey.to_string(),
            "secret key must be set in order to use goSell"
        );
        assert_eq!(
            ConfigError::EmptyApplicationId.to_string(),
            "application must have a bundle identifier in order to use goSell"
        );
    }
}

//! Transport contract.
//!
//! A [`Transport`] performs the network round trip and reports what happened
//! as a [`RawResult`]: a transport error, or a task whose response head is
//! authoritative for status and headers, paired with the parsed body.
//! Interpreting that result is the job of [`crate::decode`].

use std::future::Future;

use bytes::Bytes;
use derive_more::{Display, Error};
use serde_json::Value;

use crate::{Request, Response, TransportError};

/// Handle on a finished transport task.
#[derive(Debug, Clone, Default)]
pub struct DataTask {
    /// Response head received from the server.
    pub response: Option<Response<()>>,
    /// Failure the task recorded after it started (e.g. interrupted body).
    pub error: Option<TransportError>,
}

/// Everything the transport knows about a finished request.
#[derive(Debug, Clone, Default)]
pub struct RawResult {
    /// Task that carried the request, if one was started.
    pub task: Option<DataTask>,
    /// Parsed JSON body, if any.
    pub body: Option<Value>,
    /// Transport failure (connectivity, timeout, TLS).
    pub error: Option<TransportError>,
}

impl RawResult {
    /// A completed exchange with a response head and an optional JSON body.
    #[must_use]
    pub fn completed(response: Response<()>, body: Option<Value>) -> Self {
        Self {
            task: Some(DataTask {
                response: Some(response),
                error: None,
            }),
            body,
            error: None,
        }
    }

    /// A buffered response: the body is parsed as JSON when possible.
    #[must_use]
    pub fn from_response(response: &Response<Bytes>) -> Self {
        Self::completed(response.head(), crate::parse_body(response.body()))
    }

    /// The round trip did not complete.
    #[must_use]
    pub fn failed(error: TransportError) -> Self {
        Self {
            task: None,
            body: None,
            error: Some(error),
        }
    }

    /// The task received a response head, then failed.
    #[must_use]
    pub fn interrupted(response: Response<()>, error: TransportError) -> Self {
        Self {
            task: Some(DataTask {
                response: Some(response),
                error: Some(error),
            }),
            body: None,
            error: None,
        }
    }
}

/// A failed round trip, with the response head when it arrived before the
/// failure (e.g. the connection dropped while the body was streaming).
#[derive(Debug, Clone, Display, Error)]
#[display("{cause}")]
pub struct TransportFailure {
    /// What went wrong.
    #[error(source)]
    pub cause: TransportError,
    /// Response head received before the failure.
    pub response: Option<Response<()>>,
}

impl TransportFailure {
    /// The failure happened after the response head was received.
    #[must_use]
    pub fn after_head(cause: TransportError, response: Response<()>) -> Self {
        Self {
            cause,
            response: Some(response),
        }
    }
}

impl From<TransportError> for TransportFailure {
    fn from(cause: TransportError) -> Self {
        Self {
            cause,
            response: None,
        }
    }
}

impl From<TransportFailure> for RawResult {
    fn from(failure: TransportFailure) -> Self {
        match failure.response {
            Some(head) => Self::interrupted(head, failure.cause),
            None => Self::failed(failure.cause),
        }
    }
}

/// Performs the network round trip for a request.
///
/// Implementations must tolerate concurrent calls to [`Transport::submit`]
/// from independent requests; the dispatcher does no locking of its own.
pub trait Transport: Send + Sync + 'static {
    /// Submit a request once and report the outcome.
    fn submit(&self, request: Request<Bytes>) -> impl Future<Output = RawResult> + Send;
}

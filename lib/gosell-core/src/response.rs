//! HTTP responses.
//!
//! [`Response`] holds status, headers and body. Errors keep only the head of a
//! response, as a `Response<()>` obtained with [`Response::head`].

use std::collections::HashMap;
use std::ops::RangeInclusive;

/// Status codes the API uses for success.
pub const SUCCESS_STATUS_CODES: RangeInclusive<u16> = 200..=299;

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<B = bytes::Bytes> {
    status: u16,
    headers: HashMap<String, String>,
    body: B,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Status and headers, without the body.
    #[must_use]
    pub fn head(&self) -> Response<()> {
        Response {
            status: self.status,
            headers: self.headers.clone(),
            body: (),
        }
    }

    /// Status is within [`SUCCESS_STATUS_CODES`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        SUCCESS_STATUS_CODES.contains(&self.status)
    }
}

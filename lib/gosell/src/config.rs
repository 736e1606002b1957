//! Settings of the HTTP transport.
//!
//! The API is only reachable over HTTPS and every request carries the merchant
//! secret key, so plain `http://` URLs are refused unless
//! [`TransportConfig::allow_http`] is set (local mock servers, tests).

use std::time::Duration;

/// Settings of a [`crate::HyperTransport`], set through
/// [`crate::HyperTransportBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Budget for one round trip, from submission to the last body byte.
    pub timeout: Duration,
    /// Budget for establishing the TCP connection.
    pub connect_timeout: Duration,
    /// Idle connections kept per host.
    pub pool_max_idle_per_host: usize,
    /// How long an idle connection stays in the pool.
    pub pool_idle_timeout: Duration,
    /// Accept plain `http://` URLs.
    pub allow_http: bool,
}

impl TransportConfig {
    /// Default round trip budget.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default connection budget.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Returns `true` if requests may be sent to a URL with this scheme.
    #[must_use]
    pub fn permits_scheme(&self, scheme: &str) -> bool {
        scheme.eq_ignore_ascii_case("https")
            || (self.allow_http && scheme.eq_ignore_ascii_case("http"))
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            pool_max_idle_per_host: 8,
            pool_idle_timeout: Duration::from_secs(90),
            allow_http: false,
        }
    }
}

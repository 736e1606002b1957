//! Tower middleware layers for [`crate::HyperTransport`].
//!
//! - [`LoggingLayer`] - logs every round trip using `tracing`
//!
//! Layers are added with [`crate::HyperTransportBuilder::layer`]; any tower
//! layer whose service maps `Request<Bytes>` to `Response<Bytes>` with a
//! [`gosell_core::TransportError`] fits.

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};

//! Typed client for the goSell payment API.
//!
//! Every authenticated call goes through [`ApiClient`]: it waits for SDK
//! initialization, adds the `Authorization` and `application` headers, submits
//! the request once and decodes the response into a model or a typed
//! [`Error`].
//!
//! # Example
//!
//! ```ignore
//! use gosell::prelude::*;
//!
//! let credentials = Credentials::new("sk_test_XKokBfNWv6FIYuTMg5sLPjhJ", "com.example.shop")?;
//! let client = ApiClient::builder(credentials)
//!     .transport(HyperTransport::builder().with_logging().build())
//!     .build()?;
//!
//! let request = client.request(Method::Get, "tokens/tok_123")?.build();
//! let token: Token = client.perform_request(request, true).await?;
//! ```
//!
//! Callers that need their completion on a specific thread use
//! [`ApiClient::perform_request_with`] together with a [`ForegroundQueue`].

mod api_client;
mod config;
mod foreground;
pub mod middleware;
pub mod prelude;
mod transport;

pub use api_client::{ApiClient, ApiClientBuilder, DEFAULT_BASE_URL, convert_model_to_dictionary};
pub use config::TransportConfig;
pub use foreground::{Foreground, ForegroundQueue};
pub use transport::{BoxedService, HyperTransport, HyperTransportBuilder, ServiceFuture};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use gosell_core::{
    APPLICATION_HEADER, AUTHORIZATION_HEADER, AlwaysReady, ApiError, ConfigError,
    CredentialProvider, Credentials, DataTask, Dictionary, Error, ErrorKind, InitializationGate,
    InitializationState, InitializationStatus, Method, RawResult, Request, RequestBuilder,
    Response, Result, SUCCESS_STATUS_CODES, SerializationError, SharedCredentials, StaticHeaders,
    Token, TokenCard, Transport, TransportError, TransportFailure, decode, from_dictionary,
    to_dictionary, to_json,
};

pub use url;

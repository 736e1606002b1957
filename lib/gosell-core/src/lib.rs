//! Core types for the goSell payment API client.
//!
//! This crate holds everything that does not depend on a concrete HTTP stack:
//! - [`Method`], [`Request`] and [`RequestBuilder`] - outbound request operations
//! - [`Response`] - response status, headers and body
//! - [`Error`], [`ErrorKind`] and [`Result`] - the request failure taxonomy
//! - [`Transport`] and [`RawResult`] - the contract with the network layer
//! - [`decode`] - raw transport result to typed model or typed error
//! - [`Credentials`] and [`StaticHeaders`] - authentication headers
//! - [`InitializationGate`] - readiness check before authenticated requests
//! - [`Token`], [`TokenCard`] and [`ApiError`] - API models

mod body;
mod credentials;
mod decode;
mod error;
mod gate;
mod method;
mod models;
pub mod prelude;
mod request;
mod response;
mod transport;

pub use body::{
    Dictionary, dictionary_to_bytes, from_dictionary, parse_body, to_dictionary, to_json,
};
pub use credentials::{
    APPLICATION_HEADER, AUTHORIZATION_HEADER, CredentialProvider, Credentials, SharedCredentials,
    StaticHeaders,
};
pub use decode::decode;
pub use error::{ConfigError, Error, ErrorKind, Result, SerializationError, TransportError};
pub use gate::{AlwaysReady, InitializationGate, InitializationState, InitializationStatus};
pub use method::Method;
pub use models::{ApiError, Token, TokenCard};
pub use request::{Request, RequestBuilder};
pub use response::{Response, SUCCESS_STATUS_CODES};
pub use transport::{DataTask, RawResult, Transport, TransportFailure};

//! Prelude module for convenient imports.
//!
//! ```ignore
//! use gosell_core::prelude::*;
//! ```

pub use crate::{
    ApiError, Credentials, Error, ErrorKind, InitializationGate, Method, Request, RequestBuilder,
    Response, Result, Token, Transport, decode, to_dictionary,
};

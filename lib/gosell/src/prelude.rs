//! Prelude module for convenient imports.
//!
//! ```ignore
//! use gosell::prelude::*;
//! ```

pub use crate::{
    ApiClient, Credentials, Error, ErrorKind, Foreground, ForegroundQueue, HyperTransport,
    InitializationGate, InitializationStatus, Method, Request, RequestBuilder, Result, Token,
    Transport,
};
pub use serde::{Deserialize, Serialize};

//! Request dispatcher for the payment API.
//!
//! [`ApiClient`] owns the collaborators every authenticated request needs:
//! credentials, an initialization gate, a transport and the background runtime
//! the request pipeline runs on. One call is one pipeline:
//!
//! 1. wait for the initialization gate (unless the caller opts out),
//! 2. merge the static authentication headers into the request,
//! 3. submit it to the transport exactly once,
//! 4. decode the raw result into the expected model or a typed [`Error`].
//!
//! The outcome is delivered exactly once: awaited by the caller with
//! [`ApiClient::perform_request`], or posted to a [`Foreground`] queue with
//! [`ApiClient::perform_request_with`].

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use gosell_core::{
    AlwaysReady, ConfigError, CredentialProvider, Dictionary, Error, InitializationGate, Method,
    Request, RequestBuilder, Result, StaticHeaders, Transport, TransportError, decode,
    to_dictionary,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tracing::{Instrument, debug, debug_span, warn};
use url::Url;

use crate::HyperTransport;
use crate::foreground::Foreground;

/// Base URL of the production API.
pub const DEFAULT_BASE_URL: &str = "https://api.tap.company/v1/";

/// Dispatcher for authenticated API requests.
///
/// Cheap to clone; clones share the transport, gate and credentials.
///
/// # Example
///
/// ```ignore
/// use gosell::{ApiClient, Credentials, Method, Token};
///
/// let credentials = Credentials::new("sk_test_XKokBfNWv6FIYuTMg5sLPjhJ", "com.example.shop")?;
/// let client = ApiClient::builder(credentials).build()?;
///
/// let request = client
///     .request(Method::Post, "tokens")?
///     .json(&card)?
///     .build();
/// let token: Token = client.perform_request(request, true).await?;
/// ```
pub struct ApiClient<T = HyperTransport, G = AlwaysReady> {
    inner: Arc<Inner<T, G>>,
}

struct Inner<T, G> {
    transport: T,
    gate: G,
    credentials: Arc<dyn CredentialProvider>,
    base_url: Url,
    runtime: Handle,
}

impl<T, G> Clone for ApiClient<T, G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug, G: fmt::Debug> fmt::Debug for ApiClient<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("transport", &self.inner.transport)
            .field("gate", &self.inner.gate)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Start configuring a client for the given credentials.
    ///
    /// Accepts [`gosell_core::Credentials`] or any other
    /// [`CredentialProvider`], such as [`gosell_core::SharedCredentials`].
    #[must_use]
    pub fn builder(credentials: impl CredentialProvider) -> ApiClientBuilder {
        ApiClientBuilder {
            credentials: Arc::new(credentials),
            base_url: None,
            transport: HyperTransport::new(),
            gate: AlwaysReady,
            runtime: None,
        }
    }
}

impl<T, G> ApiClient<T, G> {
    /// Base URL request paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The transport requests are submitted to.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// The initialization gate.
    #[must_use]
    pub fn gate(&self) -> &G {
        &self.inner.gate
    }

    /// Authentication headers computed from the current credentials.
    #[must_use]
    pub fn static_headers(&self) -> StaticHeaders {
        self.inner.credentials.credentials().static_headers()
    }

    /// Start a request for `path`, resolved against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] if `path` does not resolve to a
    /// URL under the base URL: absolute URLs and `..` segments climbing out
    /// of the base path are refused, since the request will carry the
    /// secret key.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder<Bytes>, ConfigError> {
        let invalid = || ConfigError::InvalidPath {
            path: path.to_string(),
        };

        let url = self
            .inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|_| invalid())?;
        if !self.is_under_base_url(&url) {
            return Err(invalid());
        }

        Ok(Request::builder(method, url))
    }

    fn is_under_base_url(&self, url: &Url) -> bool {
        let base = &self.inner.base_url;
        url.origin() == base.origin() && url.path().starts_with(base.path())
    }

    fn authorize(&self, operation: Request<Bytes>) -> Request<Bytes> {
        let (method, url, mut headers, body) = operation.into_parts();
        self.static_headers().apply(&mut headers);
        Request::from_parts(method, url, headers, body)
    }
}

impl<T, G> ApiClient<T, G>
where
    T: Transport,
    G: InitializationGate,
{
    /// Run `operation` on the background runtime and decode the response.
    ///
    /// With `check_initialization`, the request waits for the initialization
    /// gate first; a failed gate short-circuits and the transport is never
    /// called. The request is submitted once, never retried.
    ///
    /// # Errors
    ///
    /// - [`Error::Network`] if the transport failed.
    /// - [`Error::Api`] if the API answered outside the success range.
    /// - [`Error::Serialization`] if the body does not match `R` (or
    ///   [`gosell_core::ApiError`] for failures).
    /// - [`Error::Unknown`] if the body or status is missing, or the
    ///   background task panicked.
    /// - The gate's error if initialization failed.
    pub async fn perform_request<R>(
        &self,
        operation: Request<Bytes>,
        check_initialization: bool,
    ) -> Result<R>
    where
        R: DeserializeOwned + Send + 'static,
    {
        let span = debug_span!(
            "gosell_request",
            method = %operation.method(),
            url = %operation.url(),
        );

        let client = self.clone();
        let task = self.inner.runtime.spawn(
            async move { client.run_pipeline(operation, check_initialization).await }
                .instrument(span),
        );

        match task.await {
            Ok(result) => result,
            Err(error) => {
                warn!(%error, "request task did not complete");
                Err(Error::unknown(None))
            }
        }
    }

    /// Callback form of [`perform_request`](Self::perform_request).
    ///
    /// `completion` is posted to `foreground` exactly once, whatever the
    /// outcome. Returns immediately.
    pub fn perform_request_with<R, F>(
        &self,
        operation: Request<Bytes>,
        check_initialization: bool,
        foreground: &Foreground,
        completion: F,
    ) where
        R: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<R>) + Send + 'static,
    {
        let client = self.clone();
        let foreground = foreground.clone();
        self.inner.runtime.spawn(async move {
            let result = client.perform_request(operation, check_initialization).await;
            foreground.dispatch(move || completion(result));
        });
    }

    async fn run_pipeline<R: DeserializeOwned>(
        &self,
        operation: Request<Bytes>,
        check_initialization: bool,
    ) -> Result<R> {
        if check_initialization
            && let Err(error) = self.inner.gate.check_initialization_status().await
        {
            debug!(%error, "initialization gate failed, request not sent");
            return Err(error);
        }

        if !self.is_under_base_url(operation.url()) {
            warn!(url = %operation.url(), "request outside the base URL, not sent");
            return Err(Error::network(
                TransportError::invalid_request("request URL is outside the API base URL"),
                None,
            ));
        }

        let request = self.authorize(operation);
        let raw = self.inner.transport.submit(request).await;
        decode(raw)
    }
}

/// Encode `model` as a JSON object for a request body.
///
/// On failure `completion` is called synchronously with
/// [`Error::Serialization`] and `None` is returned; the caller should then
/// stop. Models that do not encode to a JSON object (a bare string, a
/// number) are failures too.
pub fn convert_model_to_dictionary<M, R, F>(model: &M, completion: F) -> Option<Dictionary>
where
    M: Serialize + ?Sized,
    F: FnOnce(Result<R>),
{
    match to_dictionary(model) {
        Ok(map) => Some(map),
        Err(cause) => {
            completion(Err(Error::serialization(cause, None)));
            None
        }
    }
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder<T = HyperTransport, G = AlwaysReady> {
    credentials: Arc<dyn CredentialProvider>,
    base_url: Option<String>,
    transport: T,
    gate: G,
    runtime: Option<Handle>,
}

impl<T: fmt::Debug, G: fmt::Debug> fmt::Debug for ApiClientBuilder<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClientBuilder")
            .field("base_url", &self.base_url)
            .field("transport", &self.transport)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl<T, G> ApiClientBuilder<T, G> {
    /// Override the base URL (defaults to [`DEFAULT_BASE_URL`]).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Use a different transport.
    #[must_use]
    pub fn transport<T2: Transport>(self, transport: T2) -> ApiClientBuilder<T2, G> {
        ApiClientBuilder {
            credentials: self.credentials,
            base_url: self.base_url,
            transport,
            gate: self.gate,
            runtime: self.runtime,
        }
    }

    /// Gate requests on SDK initialization.
    #[must_use]
    pub fn gate<G2: InitializationGate>(self, gate: G2) -> ApiClientBuilder<T, G2> {
        ApiClientBuilder {
            credentials: self.credentials,
            base_url: self.base_url,
            transport: self.transport,
            gate,
            runtime: self.runtime,
        }
    }

    /// Run request pipelines on this runtime (defaults to the current one).
    #[must_use]
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidBaseUrl`] if the base URL cannot be parsed.
    /// - [`ConfigError::NoRuntime`] if no runtime was given and none is
    ///   current.
    pub fn build(self) -> Result<ApiClient<T, G>, ConfigError> {
        let mut base_url = Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
            .map_err(ConfigError::InvalidBaseUrl)?;
        // Paths are joined below the base path, which must be a directory.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| ConfigError::NoRuntime)?,
        };

        Ok(ApiClient {
            inner: Arc::new(Inner {
                transport: self.transport,
                gate: self.gate,
                credentials: self.credentials,
                base_url,
                runtime,
            }),
        })
    }
}

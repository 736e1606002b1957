//! Merchant credentials and the static headers derived from them.
//!
//! [`Credentials`] can only be built from a non-empty secret key and a
//! non-empty application identifier, so an authenticated request can never be
//! sent with a blank `Authorization` header. Headers are recomputed from the
//! current credentials for every request: swapping the value held by
//! [`SharedCredentials`] takes effect on the next call.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::ConfigError;

/// Name of the bearer token header.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Name of the header carrying the host application's bundle identifier.
pub const APPLICATION_HEADER: &str = "application";

/// Secret key and application identifier, both guaranteed non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    secret_key: Arc<str>,
    application_id: Arc<str>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_key", &"<redacted>")
            .field("application_id", &self.application_id)
            .finish()
    }
}

impl Credentials {
    /// Validate and build credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySecretKey`] or
    /// [`ConfigError::EmptyApplicationId`] when a value is empty or blank.
    pub fn new(
        secret_key: impl Into<String>,
        application_id: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let secret_key = secret_key.into();
        if secret_key.trim().is_empty() {
            return Err(ConfigError::EmptySecretKey);
        }

        let application_id = application_id.into();
        if application_id.trim().is_empty() {
            return Err(ConfigError::EmptyApplicationId);
        }

        Ok(Self {
            secret_key: Arc::from(secret_key),
            application_id: Arc::from(application_id),
        })
    }

    /// Merchant secret key.
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Host application (bundle) identifier.
    #[must_use]
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// Headers every authenticated request carries.
    #[must_use]
    pub fn static_headers(&self) -> StaticHeaders {
        StaticHeaders {
            authorization: format!("Bearer {}", self.secret_key),
            application: self.application_id.to_string(),
        }
    }
}

/// The authentication headers derived from [`Credentials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticHeaders {
    authorization: String,
    application: String,
}

impl StaticHeaders {
    /// Value of the `Authorization` header.
    #[must_use]
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// Value of the `application` header.
    #[must_use]
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Insert the headers into `headers`, replacing same-named entries.
    pub fn apply(self, headers: &mut HashMap<String, String>) {
        headers.retain(|name, _| {
            !name.eq_ignore_ascii_case(AUTHORIZATION_HEADER)
                && !name.eq_ignore_ascii_case(APPLICATION_HEADER)
        });
        headers.insert(AUTHORIZATION_HEADER.to_string(), self.authorization);
        headers.insert(APPLICATION_HEADER.to_string(), self.application);
    }
}

/// Source of the current credentials.
pub trait CredentialProvider: Send + Sync + 'static {
    /// Current credentials.
    fn credentials(&self) -> Credentials;
}

impl CredentialProvider for Credentials {
    fn credentials(&self) -> Credentials {
        self.clone()
    }
}

/// Credentials shared across clones, replaceable at runtime.
#[derive(Debug, Clone)]
pub struct SharedCredentials {
    inner: Arc<RwLock<Credentials>>,
}

impl SharedCredentials {
    /// Share the given credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            inner: Arc::new(RwLock::new(credentials)),
        }
    }

    /// Replace the credentials for subsequent requests.
    pub fn set(&self, credentials: Credentials) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = credentials;
    }
}

impl From<Credentials> for SharedCredentials {
    fn from(credentials: Credentials) -> Self {
        Self::new(credentials)
    }
}

impl CredentialProvider for SharedCredentials {
    fn credentials(&self) -> Credentials {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_values() {
        assert_eq!(
            Credentials::new("", "com.example.shop"),
            Err(ConfigError::EmptySecretKey)
        );
        assert_eq!(
            Credentials::new("sk_test_1", "  "),
            Err(ConfigError::EmptyApplicationId)
        );
    }

    #[test]
    fn static_headers_from_credentials() {
        let credentials = Credentials::new("sk_test_1", "com.example.shop").expect("valid");
        let headers = credentials.static_headers();

        assert_eq!(headers.authorization(), "Bearer sk_test_1");
        assert_eq!(headers.application(), "com.example.shop");
    }

    #[test]
    fn apply_replaces_existing_entries() {
        let credentials = Credentials::new("sk_test_1", "com.example.shop").expect("valid");
        let mut headers = HashMap::new();
        headers.insert("authorization".to_string(), "Bearer stale".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());

        credentials.static_headers().apply(&mut headers);

        assert_eq!(headers.len(), 3);
        assert_eq!(
            headers.get(AUTHORIZATION_HEADER).map(String::as_str),
            Some("Bearer sk_test_1")
        );
        assert_eq!(
            headers.get(APPLICATION_HEADER).map(String::as_str),
            Some("com.example.shop")
        );
    }

    #[test]
    fn shared_credentials_follow_updates() {
        let shared =
            SharedCredentials::new(Credentials::new("sk_old", "com.example.shop").expect("valid"));
        let clone = shared.clone();

        shared.set(Credentials::new("sk_new", "com.example.shop").expect("valid"));

        assert_eq!(
            clone.credentials().static_headers().authorization(),
            "Bearer sk_new"
        );
    }

    #[test]
    fn debug_redacts_secret() {
        let credentials = Credentials::new("sk_live_secret", "com.example.shop").expect("valid");
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("sk_live_secret"));
        assert!(debug.contains("com.example.shop"));
    }
}

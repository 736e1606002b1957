//! Response decoding.
//!
//! [`decode`] turns a [`RawResult`] into either the expected model or a typed
//! [`Error`]. The checks run in a fixed order and each branch attempts exactly
//! one decode: the status code alone selects whether the body is read as the
//! success schema or as an [`ApiError`]. There is no fallback between the two.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{ApiError, Error, RawResult, Result, from_dictionary};

/// Decode a transport result against the success schema `T`.
///
/// 1. transport error → [`Error::Network`], body ignored;
/// 2. task recorded an error → [`Error::Network`];
/// 3. no JSON object body, or no response head → [`Error::Unknown`];
/// 4. 2xx → decode `T`, or [`Error::Serialization`];
/// 5. otherwise → decode [`ApiError`] into [`Error::Api`], or [`Error::Serialization`].
///
/// # Errors
///
/// Returns the typed error selected by the steps above.
pub fn decode<T: DeserializeOwned>(raw: RawResult) -> Result<T> {
    let RawResult { task, body, error } = raw;
    let task = task.unwrap_or_default();

    if let Some(cause) = error {
        debug!(%cause, "transport failed");
        return Err(Error::network(cause, task.response));
    }

    if let Some(cause) = task.error {
        debug!(%cause, "transport task recorded an error");
        return Err(Error::network(cause, task.response));
    }

    let (Some(Value::Object(map)), Some(response)) = (body, task.response.clone()) else {
        debug!("response carries no JSON object or no status code");
        return Err(Error::unknown(task.response));
    };

    let status = response.status();
    if response.is_success() {
        from_dictionary(map).map_err(|cause| {
            debug!(status, %cause, "success body does not match the expected schema");
            Error::serialization(cause, Some(response))
        })
    } else {
        match from_dictionary::<ApiError>(map) {
            Ok(api_error) => {
                debug!(status, code = %api_error.code, "API reported an error");
                Err(Error::api(api_error, response))
            }
            Err(cause) => {
                debug!(status, %cause, "error body does not match the API error schema");
                Err(Error::serialization(cause, Some(response)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert2::{check, let_assert};
    use serde_json::json;

    use super::*;
    use crate::{ErrorKind, Response, Token, TransportError};

    fn head(status: u16) -> Response<()> {
        Response::new(status, HashMap::new(), ())
    }

    #[test]
    fn success_body_decodes_to_model() {
        let raw = RawResult::completed(head(200), Some(json!({"id": "tok_123", "object": "token"})));

        let token: Token = decode(raw).expect("token");
        check!(token.identifier == "tok_123");
    }

    #[test]
    fn whole_success_range_uses_success_schema() {
        for status in [200, 201, 250, 299] {
            let raw = RawResult::completed(head(status), Some(json!({"id": "tok_1", "object": "token"})));
            check!(decode::<Token>(raw).is_ok(), "status {status}");
        }
    }

    #[test]
    fn error_status_decodes_api_error() {
        let raw = RawResult::completed(
            head(400),
            Some(json!({"code": "1001", "message": "invalid card"})),
        );

        let err = decode::<Token>(raw).expect_err("api error");
        let_assert!(Error::Api { error, response } = err);
        check!(error.message == "invalid card");
        check!(error.code == "1001");
        check!(response.status() == 400);
    }

    #[test]
    fn error_status_never_yields_success_even_with_success_shape() {
        for status in [199, 300, 401, 404, 500] {
            let raw = RawResult::completed(head(status), Some(json!({"id": "tok_1", "object": "token"})));
            let err = decode::<Token>(raw).expect_err("not a success");
            check!(err.kind() == ErrorKind::Serialization, "status {status}");
        }
    }

    #[test]
    fn transport_error_wins_over_body() {
        let raw = RawResult {
            task: Some(crate::DataTask {
                response: Some(head(200)),
                error: None,
            }),
            body: Some(json!({"id": "tok_1", "object": "token"})),
            error: Some(TransportError::connection("connection refused")),
        };

        let err = decode::<Token>(raw).expect_err("network");
        let_assert!(Error::Network { cause, response } = err);
        check!(cause == TransportError::connection("connection refused"));
        check!(response.map(|r| r.status()) == Some(200));
    }

    #[test]
    fn task_error_is_network() {
        let raw = RawResult::interrupted(head(200), TransportError::Body("reset".to_string()));

        let err = decode::<Token>(raw).expect_err("network");
        check!(err.kind() == ErrorKind::Network);
        check!(err.status() == Some(200));
    }

    #[test]
    fn non_object_body_is_unknown() {
        for body in [json!([1, 2]), json!("ok"), json!(null), json!(3)] {
            let raw = RawResult::completed(head(200), Some(body));
            let err = decode::<Token>(raw).expect_err("unknown");
            check!(err.kind() == ErrorKind::Unknown);
            check!(err.status() == Some(200));
        }
    }

    #[test]
    fn missing_body_is_unknown() {
        let raw = RawResult::completed(head(204), None);
        check!(decode::<Token>(raw).expect_err("unknown").kind() == ErrorKind::Unknown);
    }

    #[test]
    fn missing_status_is_unknown() {
        let raw = RawResult {
            task: Some(crate::DataTask::default()),
            body: Some(json!({"id": "tok_1", "object": "token"})),
            error: None,
        };
        let err = decode::<Token>(raw).expect_err("unknown");
        check!(err.kind() == ErrorKind::Unknown);
        check!(err.response().is_none());

        let err = decode::<Token>(RawResult::default()).expect_err("unknown");
        check!(err.kind() == ErrorKind::Unknown);
    }

    #[test]
    fn success_schema_mismatch_is_serialization() {
        let raw = RawResult::completed(head(200), Some(json!({"unexpected": true})));

        let err = decode::<Token>(raw).expect_err("serialization");
        let_assert!(Error::Serialization { cause, response } = err);
        check!(cause.message().contains("missing field"));
        check!(response.map(|r| r.status()) == Some(200));
    }

    #[test]
    fn error_schema_mismatch_is_serialization() {
        let raw = RawResult::completed(head(500), Some(json!({"error": "boom"})));

        let err = decode::<Token>(raw).expect_err("serialization");
        check!(err.kind() == ErrorKind::Serialization);
        check!(err.status() == Some(500));
    }
}

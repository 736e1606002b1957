//! JSON body encoding and decoding.
//!
//! The API exchanges JSON objects only. Encoding helpers reject values that
//! do not serialize to an object; decoding goes through `serde_path_to_error`
//! so failures name the offending field.

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::SerializationError;

/// A JSON object, the only body shape the API accepts and returns.
pub type Dictionary = Map<String, Value>;

/// Encode a model into its keyed-mapping representation.
///
/// # Errors
///
/// Returns an error if serialization fails or if the model does not encode to
/// a JSON object.
///
/// # Example
///
/// ```
/// use gosell_core::to_dictionary;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Customer { email: String }
///
/// let customer = Customer { email: "jane@example.com".to_string() };
/// let map = to_dictionary(&customer).expect("encode");
/// assert_eq!(map["email"], "jane@example.com");
/// ```
pub fn to_dictionary<T: Serialize + ?Sized>(value: &T) -> Result<Dictionary, SerializationError> {
    let value = serde_path_to_error::serialize(value, serde_json::value::Serializer)
        .map_err(|err| SerializationError::new(err.path().to_string(), err.inner().to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(SerializationError::new(
            ".",
            format!("expected a JSON object, found {}", json_type(&other)),
        )),
    }
}

/// Encode a model into JSON object bytes.
///
/// # Errors
///
/// Same as [`to_dictionary`].
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, SerializationError> {
    to_dictionary(value).map(dictionary_to_bytes)
}

/// Render an already encoded dictionary as JSON bytes.
#[must_use]
pub fn dictionary_to_bytes(map: Dictionary) -> Bytes {
    Bytes::from(Value::Object(map).to_string())
}

/// Decode a keyed mapping against the schema of `T`.
///
/// # Errors
///
/// Returns an error carrying the JSON path if the mapping does not match `T`.
pub fn from_dictionary<T: DeserializeOwned>(map: Dictionary) -> Result<T, SerializationError> {
    serde_path_to_error::deserialize(Value::Object(map))
        .map_err(|err| SerializationError::new(err.path().to_string(), err.inner().to_string()))
}

/// Parse raw response bytes into a JSON value.
///
/// Empty or malformed bodies yield `None`: the decoder reports them as an
/// unexpected response rather than a schema mismatch.
#[must_use]
pub fn parse_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    serde_json::from_slice(bytes).ok()
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

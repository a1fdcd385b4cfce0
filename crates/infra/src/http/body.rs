//! Centralized response-body decoding
//!
//! Every endpoint decodes through one of these two functions, so a body
//! that does not match the expected shape always surfaces as
//! [`MantleError::Decode`] with serde's context instead of failing somewhere
//! downstream.

use mantle_domain::{MantleError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a body into the endpoint's wire type, requiring every mandatory
/// field to be present and correctly shaped.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|err| MantleError::Decode(format!("unexpected response body: {err}")))
}

/// Normalize a JSON document into a single object shape: objects pass
/// through, arrays are wrapped as `{"results": [...]}`. Some endpoints
/// answer with a bare array; callers get one uniform structure either way.
pub fn normalize(bytes: &[u8]) -> Result<Value> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(Value::Object(map)),
        Ok(Value::Array(items)) => Ok(serde_json::json!({ "results": items })),
        Ok(other) => Err(MantleError::Decode(format!(
            "expected a JSON object or array, got {other}"
        ))),
        Err(err) => Err(MantleError::Decode(format!("response body is not JSON: {err}"))),
    }
}

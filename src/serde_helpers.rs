//! Response body decoding.
//!
//! Bodies are first parsed as a JSON tree, so malformed JSON is reported as
//! such, then converted into the caller's type with the failing JSON path
//! attached. When the `tracing` feature is enabled, fields the target type does
//! not capture are logged as warnings, which helps detect upstream API changes.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Result;
use crate::error::Error;

/// Decode a 2xx response body read from `path`.
///
/// An empty or malformed body is a [`crate::error::Kind::Decode`] error, never an
/// empty payload.
pub(crate) fn decode<T: DeserializeOwned>(path: &str, body: &[u8]) -> Result<T> {
    let value = serde_json::from_slice::<Value>(body).map_err(|e| {
        #[cfg(feature = "tracing")]
        tracing::error!(path = %path, error = %e, "response body is not valid JSON");

        Error::decode(path.to_owned(), e)
    })?;

    deserialize_with_warnings(path, value)
}

/// Deserialize JSON with unknown field warnings.
///
/// Unknown fields trigger warnings but do not cause deserialization to fail.
#[cfg(feature = "tracing")]
pub(crate) fn deserialize_with_warnings<T: DeserializeOwned>(path: &str, value: Value) -> Result<T> {
    use std::any::type_name;

    tracing::trace!(
        type_name = %type_name::<T>(),
        json = %value,
        "deserializing JSON"
    );

    // Clone the value so we can look up unknown field values later
    let original = value.clone();
    let mut unknown_paths: Vec<String> = Vec::new();

    let result = serde_ignored::deserialize(value, |p| {
        unknown_paths.push(p.to_string());
    });

    let result: T = match result {
        Ok(result) => result,
        // Re-deserialize with serde_path_to_error to locate the failure
        Err(e) => return Err(located_error::<T>(path, original, e)),
    };

    for field in unknown_paths {
        tracing::warn!(
            type_name = %type_name::<T>(),
            field = %field,
            value = %format_value(lookup_value(&original, &field)),
            "unknown field in API response"
        );
    }

    Ok(result)
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn deserialize_with_warnings<T: DeserializeOwned>(path: &str, value: Value) -> Result<T> {
    serde_path_to_error::deserialize::<_, T>(value)
        .map_err(|e| Error::decode_at(path.to_owned(), e.path().to_string(), e.into_inner()))
}

#[cfg(feature = "tracing")]
fn located_error<T: DeserializeOwned>(path: &str, value: Value, error: serde_json::Error) -> Error {
    let original = value.clone();
    match serde_path_to_error::deserialize::<_, T>(value) {
        Ok(_) => Error::decode(path.to_owned(), error),
        Err(e) => {
            let json_path = e.path().to_string();
            tracing::error!(
                path = %path,
                json_path = %json_path,
                value = %format_value(lookup_value(&original, &json_path)),
                error = %e.inner(),
                "deserialization failed"
            );
            Error::decode_at(path.to_owned(), json_path, e.into_inner())
        }
    }
}

/// Look up a value in a JSON structure by a dotted path such as `data.0.name`.
///
/// `?` segments (Option wrappers) are skipped. Returns `None` if the path doesn't
/// exist or traverses a non-container value.
#[cfg(feature = "tracing")]
fn lookup_value<'value>(value: &'value Value, path: &str) -> Option<&'value Value> {
    let mut current = value;

    for segment in path
        .split(['.', '[', ']'])
        .filter(|s| !s.is_empty() && *s != "?")
    {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(arr) => arr.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

#[cfg(feature = "tracing")]
fn format_value(value: Option<&Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "<unable to retrieve>".to_owned(),
    }
}

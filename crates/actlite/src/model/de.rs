//! Lenient decoding of satellite fields.
//!
//! Storage keeps several structured fields as JSON-encoded strings. Such a
//! field is accepted either inline or encoded; anything that fails to decode
//! falls back to the field's default instead of rejecting the whole act.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(from_value_lenient(value))
}

pub(crate) fn from_value_lenient<T: DeserializeOwned + Default>(value: Value) -> T {
    if value.is_null() {
        return T::default();
    }

    let decoded = match value {
        Value::String(text) => {
            if text.trim().is_empty() {
                return T::default();
            }
            serde_json::from_str::<T>(&text)
                .or_else(|_| serde_json::from_value(Value::String(text)))
        }
        other => serde_json::from_value(other),
    };

    decoded.unwrap_or_else(|err| {
        log::warn!("malformed act field, falling back to default: {err}");
        T::default()
    })
}

/// Decodes a plain field, taking its default for `null` or a value of the
/// wrong shape.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_or(value, T::default))
}

/// Like [`or_default`] for spans, which default to 1.
pub(crate) fn span_or_one<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_or(value, || 1))
}

/// Like [`or_default`] for flags that are set unless stated otherwise.
pub(crate) fn flag_or_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_or(value, || true))
}

pub(crate) fn decode_or<T: DeserializeOwned>(value: Value, fallback: impl FnOnce() -> T) -> T {
    if value.is_null() {
        return fallback();
    }
    serde_json::from_value(value).unwrap_or_else(|err| {
        log::warn!("malformed act field, falling back to default: {err}");
        fallback()
    })
}

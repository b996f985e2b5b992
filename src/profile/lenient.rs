//! Field deserializers that absorb wrong shapes instead of failing the record

use super::{PersonalityTraits, Profile};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(super) fn default_active() -> bool {
    true
}

/// Only a literal `false` deactivates a record
pub(super) fn active_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(!matches!(value, Value::Bool(false)))
}

pub(super) fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Keeps the string items of an array; anything else is empty
pub(super) fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// A 0-10 score from an integer, a float, or a numeric string
pub(super) fn score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(score_from_value(&Value::deserialize(deserializer)?))
}

pub(crate) fn score_from_value(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(0.0, 10.0) as u8)
}

pub(super) fn traits<'de, D>(deserializer: D) -> Result<Option<PersonalityTraits>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(PersonalityTraits::deserialize(value).ok()),
        _ => Ok(None),
    }
}

pub(super) fn profile<'de, D>(deserializer: D) -> Result<Option<Profile>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(Profile::deserialize(value).ok()),
        _ => Ok(None),
    }
}

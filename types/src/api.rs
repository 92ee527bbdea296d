//! Wire shapes for the HTTP API.

use serde::{de, Deserialize, Deserializer, Serialize};

/// Body of `POST /api/roll`.
///
/// Every field is optional on the wire; defaults and validation are applied when it is
/// converted into a [`crate::RollCommand`]. Numeric fields also accept integral floats and
/// numeric strings (`2.0`, `"2"`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRequest {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "deserialize_integer")]
    pub number_of_dice: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_integer")]
    pub player: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Integer {
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<Integer>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let value = match raw {
        Integer::Int(value) => value,
        Integer::Float(value)
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
        {
            value as i64
        }
        Integer::Float(value) => {
            return Err(de::Error::custom(format!("expected an integer, got {value}")))
        }
        Integer::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected an integer, got {text:?}")))?,
    };
    Ok(Some(value))
}

/// Body returned for rejected requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Body returned by `POST /api/save`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub saved: bool,
    pub path: String,
}

pub use crate::game::RollOutcome as RollResponse;

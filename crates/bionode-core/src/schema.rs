//! Serde helpers for schema edges that plain derives do not express.

use serde::{de, Deserialize, Deserializer};

/// Required-but-nullable field: the key must be present, its value may be
/// `null`. Use as `#[serde(deserialize_with = "nullable")]` on an `Option<T>`
/// without `#[serde(default)]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Numeric encodings seen in upstream payloads: plain numbers and decimal
/// strings (`"6.52"`).
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Number(f64),
    Text(String),
}

impl NumberRepr {
    fn into_f64<E: de::Error>(self) -> Result<f64, E> {
        match self {
            NumberRepr::Number(n) => Ok(n),
            NumberRepr::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("expected a number, found {:?}", s))),
        }
    }
}

/// 0/1 indicators, which some services send as booleans.
#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Flag(bool),
    Number(NumberRepr),
}

impl FlagRepr {
    fn into_f64<E: de::Error>(self) -> Result<f64, E> {
        match self {
            FlagRepr::Flag(b) => Ok(if b { 1.0 } else { 0.0 }),
            FlagRepr::Number(n) => n.into_f64(),
        }
    }
}

/// Required number that may arrive as a decimal string. Booleans are rejected.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberRepr::deserialize(deserializer)?.into_f64()
}

/// Required-but-nullable number that may arrive as a decimal string.
pub fn nullable_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberRepr>::deserialize(deserializer)? {
        Some(repr) => repr.into_f64().map(Some),
        None => Ok(None),
    }
}

/// Required-but-nullable 0/1 indicator; `true`/`false` read as 1/0.
pub fn nullable_flag<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FlagRepr>::deserialize(deserializer)? {
        Some(repr) => repr.into_f64().map(Some),
        None => Ok(None),
    }
}

/// Rejects an empty identifier list before any request is built.
pub fn require_non_empty<'a>(node: &str, ids: &'a [String]) -> bionode_common::Result<&'a [String]> {
    if ids.iter().all(|s| s.trim().is_empty()) {
        return Err(bionode_common::BionodeError::InvalidInput(format!(
            "{} needs at least one identifier",
            node
        )));
    }
    Ok(ids)
}

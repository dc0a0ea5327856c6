//! Serde helpers for quirks of the Referoo wire format.

use serde::{Deserialize, Deserializer, Serializer};

/// Serialize `Option<String>` with `None` written as `""`.
///
/// The service rejects or nulls out fields that are missing or `null`
/// in create/update payloads; it only accepts empty strings for "unset".
pub mod none_as_empty {
    use super::*;

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    /// Accepts `null`, a missing field or `""` as `None`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.is_empty()))
    }
}

/// `bool` on our side, `0`/`1` on the wire.
pub mod bool_as_int {
    use super::*;

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Int(i64),
            Bool(bool),
            Str(String),
        }

        Ok(match Option::<Flag>::deserialize(deserializer)? {
            Some(Flag::Int(n)) => n != 0,
            Some(Flag::Bool(b)) => b,
            Some(Flag::Str(s)) => !matches!(s.trim(), "" | "0" | "false"),
            None => false,
        })
    }
}

/// Accept a JSON string or number for a field we keep as text.
///
/// `questionnairesNum` is a string in requests but some responses return
/// it as a number.
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Str(s)) if s.is_empty() => None,
        Some(Raw::Str(s)) => Some(s),
        Some(Raw::Num(n)) => Some(n.to_string()),
        None => None,
    })
}

/// Accept a single object, an array of objects or `null` as a `Vec`.
///
/// Single-record lookups return `data` as a bare object.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
        None => Vec::new(),
    })
}

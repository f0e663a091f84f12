//! JSON codec with ISO-8601 date revival.
//!
//! # Responsibility
//! - Turn domain values and collections into JSON strings and back.
//! - Revive date strings into `DateTime<Utc>` while parsing, at any depth.
//!
//! # Invariants
//! - Dates are written as `YYYY-MM-DDTHH:mm:ss.sssZ` (UTC, milliseconds).
//! - Only strings matching exactly that shape are revived.
//! - Malformed JSON is reported as `InvalidJson`, never as a partial value.

use crate::collection::EntityCollection;
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, DeserializeOwned, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::error::Category;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const ISO_MILLIS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

static ISO_MILLIS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z$").expect("valid iso date regex")
});

pub type SerializerResult<T> = Result<T, SerializerError>;

#[derive(Debug)]
pub enum SerializerError {
    /// Input is not syntactically valid JSON.
    InvalidJson(serde_json::Error),
    /// Input is valid JSON but does not describe the requested type.
    InvalidData(serde_json::Error),
    /// Value could not be encoded.
    Encode(serde_json::Error),
}

impl Display for SerializerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(err) => write!(f, "invalid JSON: {err}"),
            Self::InvalidData(err) => write!(f, "invalid data: {err}"),
            Self::Encode(err) => write!(f, "failed to encode JSON: {err}"),
        }
    }
}

impl Error for SerializerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidJson(err) | Self::InvalidData(err) | Self::Encode(err) => Some(err),
        }
    }
}

fn decode_error(err: serde_json::Error) -> SerializerError {
    match err.classify() {
        Category::Syntax | Category::Eof | Category::Io => SerializerError::InvalidJson(err),
        Category::Data => SerializerError::InvalidData(err),
    }
}

/// Drops sub-millisecond precision so values survive a JSON round trip.
pub fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    value.trunc_subsecs(3)
}

pub fn format_date(value: DateTime<Utc>) -> String {
    value.format(ISO_MILLIS_FORMAT).to_string()
}

/// Parses a string of the exact `YYYY-MM-DDTHH:mm:ss.sssZ` shape.
///
/// Returns `None` for any other shape or for impossible calendar values.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if !ISO_MILLIS_RE.is_match(raw) {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, ISO_MILLIS_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Serde adapter for `DateTime<Utc>` fields using the millisecond format.
pub mod iso_millis {
    use super::{format_date, parse_date};
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_date(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).ok_or_else(|| {
            de::Error::custom(format!(
                "expected date formatted as YYYY-MM-DDTHH:mm:ss.sssZ, got `{raw}`"
            ))
        })
    }
}

/// Untyped JSON tree with dates revived during parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum RevivedValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<RevivedValue>),
    Object(BTreeMap<String, RevivedValue>),
}

impl RevivedValue {
    pub fn get(&self, key: &str) -> Option<&RevivedValue> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[RevivedValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl Serialize for RevivedValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Number(value) => value.serialize(serializer),
            Self::String(value) => serializer.serialize_str(value),
            Self::Date(value) => serializer.serialize_str(&format_date(*value)),
            Self::Array(items) => items.serialize(serializer),
            Self::Object(map) => map.serialize(serializer),
        }
    }
}

struct RevivingVisitor;

impl<'de> Visitor<'de> for RevivingVisitor {
    type Value = RevivedValue;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(RevivedValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(RevivedValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(RevivedValue::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(RevivedValue::Number(value.into()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(RevivedValue::Number(value.into()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        serde_json::Number::from_f64(value)
            .map(RevivedValue::Number)
            .ok_or_else(|| E::custom("non-finite number"))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(match parse_date(value) {
            Some(date) => RevivedValue::Date(date),
            None => RevivedValue::String(value.to_string()),
        })
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(match parse_date(&value) {
            Some(date) => RevivedValue::Date(date),
            None => RevivedValue::String(value),
        })
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(RevivedValue::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<String, RevivedValue>()? {
            entries.insert(key, value);
        }
        Ok(RevivedValue::Object(entries))
    }
}

impl<'de> Deserialize<'de> for RevivedValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RevivingVisitor)
    }
}

pub fn serialize<T>(value: &T) -> SerializerResult<String>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(SerializerError::Encode)
}

pub fn serialize_pretty<T>(value: &T) -> SerializerResult<String>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string_pretty(value).map_err(SerializerError::Encode)
}

/// Decodes a typed value. Date fields are revived by their serde adapters.
pub fn deserialize<T>(json: &str) -> SerializerResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(json).map_err(decode_error)
}

/// Decodes into an untyped tree, reviving every date-shaped string.
pub fn deserialize_value(json: &str) -> SerializerResult<RevivedValue> {
    serde_json::from_str(json).map_err(decode_error)
}

pub fn serialize_collection<C>(collection: &C) -> SerializerResult<String>
where
    C: EntityCollection,
    C::Item: Serialize,
{
    serialize(collection.items())
}

pub fn deserialize_collection<C>(json: &str) -> SerializerResult<C>
where
    C: EntityCollection,
    C::Item: DeserializeOwned,
{
    deserialize::<Vec<C::Item>>(json).map(C::from_items)
}

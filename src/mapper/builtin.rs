//! Built-in mapper entries for the conventional schema types: `ObjectId`,
//! `Date` and `DateTime`.
//!
//! These cover the wire conventions most APIs declare: an `ObjectId` field is
//! a 24-character hex string wrapped in an explicit ID type, a `Date` field
//! is a `YYYY-MM-DD` calendar date, and a `DateTime` field is a full ISO-8601
//! timestamp. Callers register them by name, or supply their own entries with
//! the same shape.

use super::entry::{MapperEntry, MapperError};
use super::value::DomainObject;
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

#[allow(clippy::expect_used)]
static OBJECT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[0-9a-fA-F]{24}$").expect("object id regex is valid"));

/// A 24-character hex identifier with explicit construction validation and an
/// explicit wire conversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId {
    id: String,
}

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Result<Self, MapperError> {
        let id = id.into();
        if OBJECT_ID_RE.is_match(&id) {
            Ok(ObjectId { id })
        } else {
            Err(MapperError::with_code(
                format!("\"{id}\" is not a valid 24-character hex object id"),
                400,
            ))
        }
    }

    pub fn to_wire(&self) -> String {
        self.id.clone()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

fn expect_string(value: &Value, annotation: &str) -> Result<String, MapperError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| MapperError::new(format!("{annotation} mapper expects a string wire value")))
}

fn parse_timestamp(raw: &str, annotation: &str) -> Result<DateTime<Utc>, MapperError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    // Calendar dates deserialize to midnight UTC, mirroring `new Date("YYYY-MM-DD")`.
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }
    Err(MapperError::new(format!(
        "{annotation} mapper could not parse \"{raw}\" as a timestamp"
    )))
}

fn expect_timestamp(object: &DomainObject, annotation: &str) -> Result<DateTime<Utc>, MapperError> {
    object.downcast_ref::<DateTime<Utc>>().copied().ok_or_else(|| {
        MapperError::new(format!(
            "{annotation} mapper expects a DateTime<Utc> domain value, got {}",
            object.type_name()
        ))
    })
}

/// `ObjectId`: 24-character hex string ⇄ [`ObjectId`].
pub fn object_id() -> MapperEntry {
    MapperEntry::new(
        |value| {
            let raw = expect_string(value, "ObjectId")?;
            ObjectId::new(raw).map(DomainObject::new)
        },
        |object| {
            object
                .downcast_ref::<ObjectId>()
                .map(|id| Value::String(id.to_wire()))
                .ok_or_else(|| {
                    MapperError::new(format!(
                        "ObjectId mapper expects an ObjectId domain value, got {}",
                        object.type_name()
                    ))
                })
        },
    )
}

/// `Date`: `YYYY-MM-DD` calendar date ⇄ `DateTime<Utc>`.
///
/// The domain type is a full timestamp so a handler can put the same instant
/// into both a `Date` and a `DateTime` field; serialization keeps only the
/// calendar date.
pub fn date() -> MapperEntry {
    MapperEntry::new(
        |value| {
            let raw = expect_string(value, "Date")?;
            parse_timestamp(&raw, "Date").map(DomainObject::new)
        },
        |object| {
            let ts = expect_timestamp(object, "Date")?;
            Ok(Value::String(ts.format("%Y-%m-%d").to_string()))
        },
    )
}

/// `DateTime`: ISO-8601 timestamp with millisecond precision ⇄ `DateTime<Utc>`.
pub fn date_time() -> MapperEntry {
    MapperEntry::new(
        |value| {
            let raw = expect_string(value, "DateTime")?;
            parse_timestamp(&raw, "DateTime").map(DomainObject::new)
        },
        |object| {
            let ts = expect_timestamp(object, "DateTime")?;
            Ok(Value::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true)))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_id_rejects_short_hex() {
        let err = ObjectId::new("1234").unwrap_err();
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_object_id_round_trip() {
        let entry = object_id();
        let wire = json!("5fdefd13a6640bb5fb5fa925");
        let domain = entry.deserialize(&wire).expect("valid id");
        assert_eq!(
            domain.downcast_ref::<ObjectId>().map(ObjectId::to_wire),
            Some("5fdefd13a6640bb5fb5fa925".to_string())
        );
        assert_eq!(entry.serialize(&domain).expect("serializes"), wire);
    }

    #[test]
    fn test_date_serializes_calendar_date() {
        let entry = date();
        let domain = entry
            .deserialize(&json!("2020-12-20T07:28:19.213Z"))
            .expect("timestamp parses");
        assert_eq!(entry.serialize(&domain).expect("serializes"), json!("2020-12-20"));
    }

    #[test]
    fn test_date_round_trip() {
        let entry = date();
        let domain = entry.deserialize(&json!("2020-12-20")).expect("date parses");
        assert_eq!(entry.serialize(&domain).expect("serializes"), json!("2020-12-20"));
    }

    #[test]
    fn test_date_time_round_trip() {
        let entry = date_time();
        let wire = json!("2020-12-20T07:28:19.213Z");
        let domain = entry.deserialize(&wire).expect("timestamp parses");
        assert_eq!(entry.serialize(&domain).expect("serializes"), wire);
    }

    #[test]
    fn test_date_time_rejects_garbage() {
        let entry = date_time();
        assert!(entry.deserialize(&json!("not-a-date")).is_err());
        assert!(entry.deserialize(&json!(42)).is_err());
    }
}

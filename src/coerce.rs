//! Column-type-aware coercion of raw path values.
//!
//! Declared types are normalized into a closed set of categories first, then the raw
//! string is parsed according to the category. Normalization is an ordered priority
//! list: `tinyint(1)` must be recognized as boolean before the generic integer rule.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCategory {
    Boolean,
    Integer,
    Text,
    Temporal,
    Unknown,
}

/// First match wins.
const PRIORITY: &[(TypeCategory, &[&str])] = &[
    (TypeCategory::Boolean, &["tinyint(1)"]),
    (TypeCategory::Integer, &["int", "smallint", "tinyint"]),
    (TypeCategory::Text, &["varchar", "text", "char"]),
    (TypeCategory::Temporal, &["timestamp", "date"]),
];

impl TypeCategory {
    /// Map a raw declared type (e.g. `varchar(255)`, `int(11) unsigned`) to its category.
    pub fn from_declared(declared_type: &str) -> Self {
        let declared = declared_type.to_ascii_lowercase();
        PRIORITY
            .iter()
            .find(|(_, needles)| needles.iter().any(|n| declared.contains(n)))
            .map(|(category, _)| *category)
            .unwrap_or(TypeCategory::Unknown)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("not a valid number")]
    NotANumber,
    #[error("not a valid date")]
    NotADate,
}

/// A raw value converted to the semantic type of its target column.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CoercedValue {
    Boolean(bool),
    Integer(i64),
    Text(String),
    Date(DateTime<Utc>),
}

impl fmt::Display for CoercedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercedValue::Boolean(b) => write!(f, "{}", b),
            CoercedValue::Integer(n) => write!(f, "{}", n),
            CoercedValue::Text(s) => f.write_str(s),
            CoercedValue::Date(d) => f.write_str(&d.to_rfc3339()),
        }
    }
}

/// Coerce `raw` according to the column's declared type.
pub fn coerce(declared_type: &str, raw: &str) -> Result<CoercedValue, CoercionError> {
    coerce_category(TypeCategory::from_declared(declared_type), raw)
}

pub fn coerce_category(category: TypeCategory, raw: &str) -> Result<CoercedValue, CoercionError> {
    Ok(match category {
        TypeCategory::Boolean => CoercedValue::Boolean(raw == "1"),
        TypeCategory::Integer => {
            CoercedValue::Integer(parse_int_prefix(raw).ok_or(CoercionError::NotANumber)?)
        }
        TypeCategory::Temporal => {
            CoercedValue::Date(parse_datetime(raw).ok_or(CoercionError::NotADate)?)
        }
        TypeCategory::Text | TypeCategory::Unknown => CoercedValue::Text(raw.to_string()),
    })
}

/// Base-10 integer from the leading digits: optional whitespace and sign, then the longest
/// run of ASCII digits. Trailing text is ignored (`"12abc"` is 12, `"1.5"` is 1).
/// `None` when there are no digits or the value does not fit in an i64.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => ("-", &s[1..]),
        Some(b'+') => ("", &s[1..]),
        _ => ("", s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    format!("{}{}", sign, &rest[..digits]).parse().ok()
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a calendar date or date/time. Strings without an offset are taken as UTC.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

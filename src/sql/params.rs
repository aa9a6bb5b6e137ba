//! Bind coerced values to sqlx MySQL queries.

use crate::coerce::CoercedValue;
use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::{Query, QueryAs};

/// Bind one value with the Rust type matching its variant, so MySQL compares with column semantics.
pub fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &'q CoercedValue,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        CoercedValue::Boolean(b) => query.bind(*b),
        CoercedValue::Integer(n) => query.bind(*n),
        CoercedValue::Text(s) => query.bind(s.as_str()),
        CoercedValue::Date(d) => query.bind(*d),
    }
}

pub fn bind_all<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [CoercedValue],
) -> Query<'q, MySql, MySqlArguments> {
    for p in params {
        query = bind_value(query, p);
    }
    query
}

pub fn bind_all_as<'q, O>(
    mut query: QueryAs<'q, MySql, O, MySqlArguments>,
    params: &'q [CoercedValue],
) -> QueryAs<'q, MySql, O, MySqlArguments> {
    for p in params {
        query = match p {
            CoercedValue::Boolean(b) => query.bind(*b),
            CoercedValue::Integer(n) => query.bind(*n),
            CoercedValue::Text(s) => query.bind(s.as_str()),
            CoercedValue::Date(d) => query.bind(*d),
        };
    }
    query
}

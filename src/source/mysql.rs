//! MySQL-backed entity source.

use super::{EntitySource, FieldDescriptor, Record};
use crate::coerce::{CoercedValue, TypeCategory};
use crate::config::{EntityDef, Settings};
use crate::error::AppError;
use crate::sql::{bind_all, bind_all_as, describe_table, select_all, select_by_field, QueryBuf};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row, ValueRef};

#[derive(Clone)]
pub struct MySqlSource {
    pool: MySqlPool,
}

impl MySqlSource {
    /// Open the pool. Every connection runs in UTC so naive date values compare as UTC.
    pub async fn connect(settings: &Settings) -> Result<Self, AppError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("SET time_zone = '+00:00'").execute(&mut *conn).await?;
                    Ok(())
                })
            })
            .connect(&settings.database_url)
            .await?;
        Ok(MySqlSource { pool })
    }

    /// Wait for checked-out connections to return, then close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn query_many(&self, q: &QueryBuf, columns: &[FieldDescriptor]) -> Result<Vec<Record>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_all(sqlx::query(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|r| row_to_record(r, columns)).collect())
    }
}

#[async_trait]
impl EntitySource for MySqlSource {
    async fn describe(&self, entity: &EntityDef) -> Result<Vec<FieldDescriptor>, AppError> {
        let q = describe_table(&entity.table);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows: Vec<(String, String)> = bind_all_as(sqlx::query_as(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(name, declared_type)| FieldDescriptor { name, declared_type })
            .collect())
    }

    async fn find_all(
        &self,
        entity: &EntityDef,
        columns: &[FieldDescriptor],
    ) -> Result<Vec<Record>, AppError> {
        let q = select_all(&entity.table, columns);
        self.query_many(&q, columns).await
    }

    async fn find_by_field(
        &self,
        entity: &EntityDef,
        columns: &[FieldDescriptor],
        field: &FieldDescriptor,
        value: &CoercedValue,
    ) -> Result<Vec<Record>, AppError> {
        let q = select_by_field(&entity.table, columns, field, value);
        self.query_many(&q, columns).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

fn row_to_record(row: &MySqlRow, columns: &[FieldDescriptor]) -> Record {
    let mut map = Record::new();
    for col in row.columns() {
        let name = col.name();
        let category = columns
            .iter()
            .find(|c| c.name == name)
            .map(FieldDescriptor::category)
            .unwrap_or(TypeCategory::Unknown);
        map.insert(name.to_string(), cell_to_value(row, name, category));
    }
    map
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Decoder {
    Bool,
    Int,
    Float,
    Str,
    Temporal,
    Json,
}

/// Decoders tried for a cell, declared category first so `tinyint(1)` reads as bool
/// and an integer column never turns into a float.
fn decode_order(category: TypeCategory) -> &'static [Decoder] {
    use Decoder::*;
    match category {
        TypeCategory::Boolean => &[Bool, Int, Float, Str, Temporal, Json],
        TypeCategory::Integer => &[Int, Float, Str, Temporal, Json],
        TypeCategory::Text => &[Str, Float, Int, Temporal, Json],
        TypeCategory::Temporal => &[Temporal, Float, Int, Str, Json],
        TypeCategory::Unknown => &[Float, Int, Str, Temporal, Json],
    }
}

fn cell_to_value(row: &MySqlRow, name: &str, category: TypeCategory) -> Value {
    match row.try_get_raw(name) {
        Ok(raw) if !raw.is_null() => {}
        _ => return Value::Null,
    }
    decode_order(category)
        .iter()
        .find_map(|decoder| match decoder {
            Decoder::Bool => decode_bool(row, name),
            Decoder::Int => decode_int(row, name),
            Decoder::Float => decode_float(row, name),
            Decoder::Str => decode_string(row, name),
            Decoder::Temporal => decode_temporal(row, name),
            Decoder::Json => row.try_get::<Value, _>(name).ok(),
        })
        .unwrap_or(Value::Null)
}

fn decode_bool(row: &MySqlRow, name: &str) -> Option<Value> {
    row.try_get::<bool, _>(name).ok().map(Value::Bool)
}

fn decode_int(row: &MySqlRow, name: &str) -> Option<Value> {
    if let Ok(n) = row.try_get::<i64, _>(name) {
        return Some(Value::Number(n.into()));
    }
    row.try_get::<u64, _>(name).ok().map(|n| Value::Number(n.into()))
}

fn decode_float(row: &MySqlRow, name: &str) -> Option<Value> {
    let f = row
        .try_get::<f64, _>(name)
        .or_else(|_| row.try_get::<f32, _>(name).map(f64::from))
        .ok()?;
    serde_json::Number::from_f64(f).map(Value::Number)
}

fn decode_string(row: &MySqlRow, name: &str) -> Option<Value> {
    row.try_get::<String, _>(name).ok().map(Value::String)
}

fn decode_temporal(row: &MySqlRow, name: &str) -> Option<Value> {
    if let Ok(d) = row.try_get::<chrono::DateTime<chrono::Utc>, _>(name) {
        return Some(Value::String(d.to_rfc3339()));
    }
    if let Ok(d) = row.try_get::<chrono::NaiveDate, _>(name) {
        return Some(Value::String(d.format("%Y-%m-%d").to_string()));
    }
    row.try_get::<chrono::NaiveTime, _>(name)
        .ok()
        .map(|t| Value::String(t.format("%H:%M:%S").to_string()))
}

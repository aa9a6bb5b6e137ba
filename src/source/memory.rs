//! In-process entity source: tables with declared column types and JSON rows.
//! Backs the test suite and local demos without a database.

use super::{EntitySource, FieldDescriptor, Record};
use crate::coerce::{parse_datetime, CoercedValue};
use crate::config::EntityDef;
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Debug, Default)]
pub struct MemoryTable {
    pub columns: Vec<FieldDescriptor>,
    pub rows: Vec<Record>,
}

#[derive(Debug, Default)]
pub struct MemorySource {
    tables: HashMap<String, MemoryTable>,
    unavailable: AtomicBool,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table from `(name, declared_type)` pairs and JSON object rows. Non-object rows are skipped.
    pub fn with_table(mut self, table: &str, columns: &[(&str, &str)], rows: Vec<Value>) -> Self {
        let columns = columns
            .iter()
            .map(|(name, ty)| FieldDescriptor::new(*name, *ty))
            .collect();
        let rows = rows
            .into_iter()
            .filter_map(|r| match r {
                Value::Object(m) => Some(m),
                _ => None,
            })
            .collect();
        self.tables.insert(table.to_string(), MemoryTable { columns, rows });
        self
    }

    /// Simulate a lost connection: every call fails until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::QueryFailure(sqlx::Error::PoolClosed));
        }
        Ok(())
    }

    fn table(&self, entity: &EntityDef) -> Result<&MemoryTable, AppError> {
        self.tables
            .get(&entity.table)
            .ok_or_else(|| AppError::QueryFailure(sqlx::Error::RowNotFound))
    }
}

/// Equality the way MySQL compares a bound parameter with a stored column value.
fn value_matches(stored: &Value, value: &CoercedValue) -> bool {
    match (value, stored) {
        (CoercedValue::Boolean(b), Value::Bool(s)) => b == s,
        (CoercedValue::Boolean(b), Value::Number(n)) => n.as_i64() == Some(i64::from(*b)),
        (CoercedValue::Integer(i), Value::Number(n)) => {
            n.as_i64() == Some(*i) || n.as_f64() == Some(*i as f64)
        }
        (CoercedValue::Integer(i), Value::Bool(b)) => *i == i64::from(*b),
        (CoercedValue::Text(s), Value::String(t)) => s == t,
        (CoercedValue::Text(s), Value::Number(n)) => n.to_string() == *s,
        (CoercedValue::Date(d), Value::String(t)) => parse_datetime(t) == Some(*d),
        _ => false,
    }
}

#[async_trait]
impl EntitySource for MemorySource {
    async fn describe(&self, entity: &EntityDef) -> Result<Vec<FieldDescriptor>, AppError> {
        self.check_available()?;
        Ok(self
            .tables
            .get(&entity.table)
            .map(|t| t.columns.clone())
            .unwrap_or_default())
    }

    async fn find_all(
        &self,
        entity: &EntityDef,
        _columns: &[FieldDescriptor],
    ) -> Result<Vec<Record>, AppError> {
        self.check_available()?;
        Ok(self.table(entity)?.rows.clone())
    }

    async fn find_by_field(
        &self,
        entity: &EntityDef,
        _columns: &[FieldDescriptor],
        field: &FieldDescriptor,
        value: &CoercedValue,
    ) -> Result<Vec<Record>, AppError> {
        self.check_available()?;
        tracing::debug!(table = %entity.table, field = %field.name, value = ?value, "memory query");
        Ok(self
            .table(entity)?
            .rows
            .iter()
            .filter(|r| r.get(&field.name).is_some_and(|v| value_matches(v, value)))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn mesas() -> (MemorySource, EntityDef) {
        let source = MemorySource::new().with_table(
            "mesas",
            &[("id", "int(11)"), ("status", "tinyint(1)"), ("atualizado_em", "timestamp")],
            vec![
                json!({"id": 1, "status": true, "atualizado_em": "2024-12-26 10:00:00"}),
                json!({"id": 2, "status": 0, "atualizado_em": "2024-12-27T10:00:00Z"}),
                json!("not an object"),
            ],
        );
        let entity = EntityDef { name: "mesas".into(), table: "mesas".into() };
        (source, entity)
    }

    #[tokio::test]
    async fn describe_unknown_table_is_empty() {
        let (source, _) = mesas();
        let other = EntityDef { name: "x".into(), table: "x".into() };
        assert!(source.describe(&other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_object_rows_are_skipped() {
        let (source, entity) = mesas();
        assert_eq!(source.find_all(&entity, &[]).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn filters_with_column_semantics() {
        let (source, entity) = mesas();
        let status = FieldDescriptor::new("status", "tinyint(1)");
        let free = source
            .find_by_field(&entity, &[], &status, &CoercedValue::Boolean(false))
            .await
            .unwrap();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0]["id"], json!(2));

        let ts = FieldDescriptor::new("atualizado_em", "timestamp");
        let at = Utc.with_ymd_and_hms(2024, 12, 27, 10, 0, 0).unwrap();
        let rows = source
            .find_by_field(&entity, &[], &ts, &CoercedValue::Date(at))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!(2));

        let id = FieldDescriptor::new("id", "int(11)");
        let none = source
            .find_by_field(&entity, &[], &id, &CoercedValue::Integer(99))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn unavailable_source_fails() {
        let (source, entity) = mesas();
        source.set_unavailable(true);
        assert!(matches!(source.ping().await, Err(AppError::QueryFailure(_))));
        assert!(source.describe(&entity).await.is_err());
        source.set_unavailable(false);
        assert!(source.ping().await.is_ok());
    }
}

//! Data sources the query routes read from. Handlers only see the `EntitySource` trait.

mod memory;
mod mysql;

pub use memory::{MemorySource, MemoryTable};
pub use mysql::MySqlSource;

use crate::coerce::{CoercedValue, TypeCategory};
use crate::config::EntityDef;
use crate::error::AppError;
use async_trait::async_trait;
use serde::Serialize;

/// A row as a JSON object keyed by column name.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Name and raw declared type of one column, as reported by the live schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub declared_type: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            declared_type: declared_type.into(),
        }
    }

    pub fn category(&self) -> TypeCategory {
        TypeCategory::from_declared(&self.declared_type)
    }
}

#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Live column list of the entity's table. Empty when the table does not exist.
    async fn describe(&self, entity: &EntityDef) -> Result<Vec<FieldDescriptor>, AppError>;

    async fn find_all(
        &self,
        entity: &EntityDef,
        columns: &[FieldDescriptor],
    ) -> Result<Vec<Record>, AppError>;

    /// Rows whose `field` equals `value`. No match is an empty vec.
    async fn find_by_field(
        &self,
        entity: &EntityDef,
        columns: &[FieldDescriptor],
        field: &FieldDescriptor,
        value: &CoercedValue,
    ) -> Result<Vec<Record>, AppError>;

    /// Cheap connectivity check for readiness.
    async fn ping(&self) -> Result<(), AppError>;
}

//! Equality-filtered reads over an allowed entity.

use crate::coerce::CoercedValue;
use crate::error::AppError;
use crate::service::EntitySchema;
use crate::source::{EntitySource, FieldDescriptor, Record};

pub struct QueryExecutor;

impl QueryExecutor {
    pub async fn find_all(source: &dyn EntitySource, schema: &EntitySchema) -> Result<Vec<Record>, AppError> {
        source.find_all(&schema.entity, &schema.fields).await
    }

    /// All rows where `field == value`. An empty vec is a valid result.
    /// `field` must come from `schema`, which keeps unchecked names out of the SQL.
    pub async fn find_by_field(
        source: &dyn EntitySource,
        schema: &EntitySchema,
        field: &FieldDescriptor,
        value: &CoercedValue,
    ) -> Result<Vec<Record>, AppError> {
        if schema.field(&field.name).is_none() {
            return Err(AppError::FieldNotFound {
                field: field.name.clone(),
                entity: schema.entity.name.clone(),
            });
        }
        source
            .find_by_field(&schema.entity, &schema.fields, field, value)
            .await
    }
}

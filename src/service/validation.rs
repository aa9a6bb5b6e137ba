//! Field existence checks against the live schema.

use crate::config::Catalog;
use crate::error::AppError;
use crate::service::{EntitySchema, SchemaIntrospector};
use crate::source::{EntitySource, FieldDescriptor};

pub struct FieldValidator;

impl FieldValidator {
    /// Describe the entity and return the descriptor of `field` (exact, case-sensitive).
    pub async fn validate_field(
        source: &dyn EntitySource,
        catalog: &Catalog,
        entity: &str,
        field: &str,
    ) -> Result<FieldDescriptor, AppError> {
        let schema = SchemaIntrospector::describe_entity(source, catalog, entity).await?;
        Self::find_field(&schema, field).cloned()
    }

    pub fn find_field<'a>(schema: &'a EntitySchema, field: &str) -> Result<&'a FieldDescriptor, AppError> {
        schema.field(field).ok_or_else(|| AppError::FieldNotFound {
            field: field.to_string(),
            entity: schema.entity.name.clone(),
        })
    }
}

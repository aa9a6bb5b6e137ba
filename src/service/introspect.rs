//! Live schema lookup behind the entity allow-list. Never cached.

use crate::config::{Catalog, EntityDef};
use crate::error::AppError;
use crate::source::{EntitySource, FieldDescriptor};

/// An allowed entity together with its current column list.
#[derive(Clone, Debug)]
pub struct EntitySchema {
    pub entity: EntityDef,
    pub fields: Vec<FieldDescriptor>,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

pub struct SchemaIntrospector;

impl SchemaIntrospector {
    /// Allow-list check. Runs before any storage access.
    pub fn resolve<'a>(catalog: &'a Catalog, entity: &str) -> Result<&'a EntityDef, AppError> {
        catalog.get(entity).ok_or_else(|| {
            tracing::warn!(entity = %entity, "entity not in allow-list");
            AppError::EntityNotFound(entity.to_string())
        })
    }

    /// Columns of `entity` as the database reports them right now.
    pub async fn describe_entity(
        source: &dyn EntitySource,
        catalog: &Catalog,
        entity: &str,
    ) -> Result<EntitySchema, AppError> {
        let def = Self::resolve(catalog, entity)?;
        let fields = source.describe(def).await?;
        if fields.is_empty() {
            return Err(AppError::EntityNotFound(entity.to_string()));
        }
        Ok(EntitySchema {
            entity: def.clone(),
            fields,
        })
    }
}

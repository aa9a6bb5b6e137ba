//! Pastelaria back-office API: runtime entity lookup with column-type-aware coercion.

pub mod coerce;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod service;
pub mod source;
pub mod sql;
pub mod state;

pub use coerce::{coerce, CoercedValue, CoercionError, TypeCategory};
pub use config::{Catalog, EntityConfig, EntityDef, Settings};
pub use error::{AppError, ConfigError};
pub use routes::{app, common_routes_with_ready, entity_routes, with_layers};
pub use service::{EntitySchema, FieldValidator, QueryExecutor, SchemaIntrospector};
pub use source::{EntitySource, FieldDescriptor, MemorySource, MySqlSource, Record};
pub use state::AppState;

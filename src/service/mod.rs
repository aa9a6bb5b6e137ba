//! Dynamic entity services: schema introspection, field validation, filtered reads.

mod introspect;
mod query;
mod validation;
pub use introspect::{EntitySchema, SchemaIntrospector};
pub use query::QueryExecutor;
pub use validation::FieldValidator;

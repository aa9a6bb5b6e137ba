//! Dynamic entity handlers: list, filtered search, column listing, field type lookup.

use crate::coerce::coerce;
use crate::error::AppError;
use crate::response::{success_many, success_one};
use crate::service::{FieldValidator, QueryExecutor, SchemaIntrospector};
use crate::state::AppState;
use axum::extract::{Path, State};
use serde::Serialize;

/// One column as listed by `GET /getentidade/:entidade`.
#[derive(Serialize)]
pub struct ColumnSummary {
    pub nome: String,
    pub tipo: String,
}

/// GET /search/:entidade — every record of the entity.
pub async fn search_all(
    State(state): State<AppState>,
    Path(entidade): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let schema = SchemaIntrospector::describe_entity(state.source.as_ref(), &state.catalog, &entidade).await?;
    let rows = QueryExecutor::find_all(state.source.as_ref(), &schema).await?;
    Ok(success_many(rows))
}

/// GET /search/:entidade/:campo/:valor — records where `campo` equals `valor` coerced to the column type.
pub async fn search_by_field(
    State(state): State<AppState>,
    Path((entidade, campo, valor)): Path<(String, String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let source = state.source.as_ref();
    let schema = SchemaIntrospector::describe_entity(source, &state.catalog, &entidade).await?;
    let field = FieldValidator::find_field(&schema, &campo)?;
    let value = coerce(&field.declared_type, &valor).map_err(|reason| AppError::InvalidValue {
        field: campo.clone(),
        source: reason,
    })?;
    tracing::debug!(entity = %entidade, field = %campo, declared_type = %field.declared_type, value = ?value, "search");

    let rows = QueryExecutor::find_by_field(source, &schema, field, &value).await?;
    if rows.is_empty() {
        return Err(AppError::NotFound(format!(
            "no records found for field \"{}\" with value \"{}\"",
            campo, value
        )));
    }
    Ok(success_many(rows))
}

/// GET /getentidade/:entidade — `{nome, tipo}` per column.
pub async fn get_entidade(
    State(state): State<AppState>,
    Path(entidade): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let schema = SchemaIntrospector::describe_entity(state.source.as_ref(), &state.catalog, &entidade).await?;
    let columns: Vec<ColumnSummary> = schema
        .fields
        .into_iter()
        .map(|f| ColumnSummary {
            nome: f.name,
            tipo: f.declared_type,
        })
        .collect();
    Ok(success_many(columns))
}

/// GET /valida/:entidade/:campo — declared type of one column as a JSON string.
pub async fn valida_campo(
    State(state): State<AppState>,
    Path((entidade, campo)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let field = FieldValidator::validate_field(state.source.as_ref(), &state.catalog, &entidade, &campo).await?;
    Ok(success_one(field.declared_type))
}

//! Typed errors and HTTP mapping.

use crate::coerce::CoercionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned to clients for failures whose detail is only logged.
pub const GENERIC_FAILURE_MESSAGE: &str = "failed to fetch data, try again later";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {kind} identifier: '{value}'")]
    InvalidIdentifier { kind: &'static str, value: String },
    #[error("duplicate entity: {0}")]
    DuplicateEntity(String),
    #[error("invalid setting {key}: {message}")]
    InvalidSetting { key: &'static str, message: String },
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("entity \"{0}\" not found")]
    EntityNotFound(String),
    #[error("field \"{field}\" not found in entity \"{entity}\"")]
    FieldNotFound { field: String, entity: String },
    #[error("field \"{field}\" is {source}")]
    InvalidValue {
        field: String,
        #[source]
        source: CoercionError,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("database: {0}")]
    QueryFailure(#[from] sqlx::Error),
    #[error("unexpected failure: {0}")]
    Unknown(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::EntityNotFound(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::FieldNotFound { .. } | AppError::InvalidValue { .. } => StatusCode::BAD_REQUEST,
            AppError::QueryFailure(_) | AppError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
            self.to_string()
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_not_found_names_field_and_entity() {
        let err = AppError::FieldNotFound {
            field: "nomeInexistente".into(),
            entity: "cargos".into(),
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let msg = err.to_string();
        assert!(msg.contains("nomeInexistente"));
        assert!(msg.contains("cargos"));
    }

    #[test]
    fn invalid_value_message_carries_reason() {
        let err = AppError::InvalidValue {
            field: "salarioBase".into(),
            source: CoercionError::NotANumber,
        };
        assert_eq!(err.to_string(), "field \"salarioBase\" is not a valid number");
    }

    #[test]
    fn data_source_errors_are_server_errors() {
        assert_eq!(
            AppError::QueryFailure(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::Unknown("boom".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::EntityNotFound("x".into()).status(), StatusCode::NOT_FOUND);
    }
}

//! Dynamic entity routes. Path segments are resolved through the allow-list in the handlers.

use crate::handlers::entity::{get_entidade, search_all, search_by_field, valida_campo};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn entity_routes(state: AppState) -> Router {
    Router::new()
        .route("/search/:entidade", get(search_all))
        .route("/search/:entidade/:campo/:valor", get(search_by_field))
        .route("/getentidade/:entidade", get(get_entidade))
        .route("/valida/:entidade/:campo", get(valida_campo))
        .with_state(state)
}

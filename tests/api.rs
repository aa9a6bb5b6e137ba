//! HTTP-level tests for the dynamic entity routes against an in-memory source.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::routing::get as get_route;
use axum::Router;
use pastelaria_api::{app, with_layers, AppState, Catalog, MemorySource};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn source() -> MemorySource {
    MemorySource::new()
        .with_table(
            "cargos",
            &[
                ("id", "int(11)"),
                ("nome", "varchar(25)"),
                ("descricao", "text"),
                ("salarioBase", "int(11)"),
                ("status", "varchar(255)"),
            ],
            vec![
                json!({"id": 1, "nome": "Gerente", "descricao": "Gerencia a loja", "salarioBase": 4500, "status": "ativo"}),
                json!({"id": 2, "nome": "Pasteleiro", "descricao": "Prepara os pasteis", "salarioBase": 2500, "status": "ativo"}),
                json!({"id": 3, "nome": "Caixa", "descricao": "Atende o caixa", "salarioBase": 2000, "status": "inativo"}),
            ],
        )
        .with_table(
            "mesas",
            &[
                ("id", "int(11)"),
                ("numero", "smallint"),
                ("capacidade", "smallint"),
                ("status", "tinyint(1)"),
                ("descricao", "text"),
                ("atualizado_em", "timestamp"),
            ],
            vec![
                json!({"id": 1, "numero": 1, "capacidade": 4, "status": true, "descricao": "Janela", "atualizado_em": "2024-12-26 10:00:00"}),
                json!({"id": 2, "numero": 2, "capacidade": 2, "status": false, "descricao": "Balcao", "atualizado_em": "2024-12-26 11:00:00"}),
                json!({"id": 3, "numero": 3, "capacidade": 6, "status": true, "descricao": "Varanda", "atualizado_em": "2024-12-27 09:30:00"}),
            ],
        )
}

fn router_with(source: Arc<MemorySource>) -> Router {
    let catalog = Catalog::from_names(["cargos", "categorias", "fornecedores", "mesas"]).unwrap();
    app(AppState::new(source, catalog))
}

fn router() -> Router {
    router_with(Arc::new(source()))
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn search_all_lists_every_record() {
    let (status, body) = get(router(), "/search/cargos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2, 3]);
}

#[tokio::test]
async fn search_by_text_field() {
    let (status, body) = get(router(), "/search/cargos/status/ativo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2]);
    assert!(body.as_array().unwrap().iter().all(|r| r["status"] == "ativo"));
}

#[tokio::test]
async fn search_by_boolean_field() {
    let (status, body) = get(router(), "/search/mesas/status/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 3]);

    let (status, body) = get(router(), "/search/mesas/status/0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![2]);
}

#[tokio::test]
async fn search_by_integer_field() {
    let (status, body) = get(router(), "/search/mesas/capacidade/6").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![3]);
}

#[tokio::test]
async fn integer_value_uses_leading_digits() {
    let (status, body) = get(router(), "/search/mesas/capacidade/6abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![3]);

    let (status, body) = get(router(), "/search/mesas/capacidade/2.9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![2]);
}

#[tokio::test]
async fn search_by_timestamp_field() {
    let (status, body) = get(router(), "/search/mesas/atualizado_em/2024-12-26T11:00:00Z").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![2]);
}

#[tokio::test]
async fn invalid_number_is_bad_request() {
    let (status, body) = get(router(), "/search/cargos/salarioBase/not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "field \"salarioBase\" is not a valid number"}));
}

#[tokio::test]
async fn invalid_date_is_bad_request() {
    let (status, body) = get(router(), "/search/mesas/atualizado_em/not-a-date").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "field \"atualizado_em\" is not a valid date");
}

#[tokio::test]
async fn unknown_field_names_field_and_entity() {
    let (status, body) = get(router(), "/search/cargos/nomeInexistente/x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let msg = body["error"].as_str().unwrap();
    assert!(msg.contains("nomeInexistente"));
    assert!(msg.contains("cargos"));
}

#[tokio::test]
async fn empty_result_is_not_found() {
    let (status, body) = get(router(), "/search/cargos/status/ferias").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        "no records found for field \"status\" with value \"ferias\""
    );
}

#[tokio::test]
async fn entity_outside_allow_list_is_rejected() {
    for uri in [
        "/search/usuarios",
        "/search/usuarios/id/1",
        "/getentidade/usuarios",
        "/valida/usuarios/id",
    ] {
        let (status, body) = get(router(), uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["error"], "entity \"usuarios\" not found");
    }
}

#[tokio::test]
async fn allowed_entity_missing_from_database_is_not_found() {
    let (status, _) = get(router(), "/getentidade/categorias").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_entidade_lists_columns() {
    let (status, body) = get(router(), "/getentidade/mesas").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0], json!({"nome": "id", "tipo": "int(11)"}));
    assert_eq!(body[3], json!({"nome": "status", "tipo": "tinyint(1)"}));
    assert_eq!(body.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn valida_returns_declared_type() {
    let (status, body) = get(router(), "/valida/mesas/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("tinyint(1)"));

    let (status, body) = get(router(), "/valida/mesas/cor").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "field \"cor\" not found in entity \"mesas\"");
}

#[tokio::test]
async fn data_source_failure_is_generic_server_error() {
    let source = Arc::new(source());
    source.set_unavailable(true);
    let (status, body) = get(router_with(source.clone()), "/search/cargos/status/ativo").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "failed to fetch data, try again later"}));

    let (status, body) = get(router_with(source), "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn operational_routes() {
    let (status, body) = get(router(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = get(router(), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");

    let (status, body) = get(router(), "/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "pastelaria-api");

    let (status, body) = get(router(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String(pastelaria_api::routes::WELCOME_MESSAGE.into()));

    let (status, body) = get(router(), "/nope/a/b/c/d").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "route not found");
}

#[tokio::test]
async fn panicking_handler_is_generic_server_error() {
    async fn explode() -> &'static str {
        panic!("boom")
    }
    let router = with_layers(Router::new().route("/explode", get_route(explode)));
    let (status, body) = get(router, "/explode").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "failed to fetch data, try again later"}));
}

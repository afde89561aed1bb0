use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["service"], "import-quotes");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_compare_rejects_more_than_five_vehicles() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "/vehicles/compare",
            json!({ "vehicle_ids": [1, 2, 3, 4, 5, 6] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_compare_accepts_five_distinct_vehicles() {
    let app = create_test_app();

    // los duplicados se deduplican antes de aplicar el tope
    let response = app
        .oneshot(json_request(
            "/vehicles/compare",
            json!({ "vehicle_ids": [1, 2, 3, 4, 5, 5, 1] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert!(body["vehicles"].is_array());
}

#[tokio::test]
async fn test_search_quotes_requires_at_least_one_filter() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request("/vehicles/search-quotes", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "At least one filter is required");
}

// Función helper para crear la app de test: réplica mínima de la capa de
// validación de la API, sin base de datos ni Redis
fn create_test_app() -> Router {
    Router::new()
        .route("/health", get(health_stub))
        .route("/vehicles/compare", post(compare_stub))
        .route("/vehicles/search-quotes", post(search_stub))
}

async fn health_stub() -> Json<Value> {
    Json(json!({
        "service": "import-quotes",
        "status": "healthy",
    }))
}

async fn compare_stub(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let ids: Vec<i64> = body["vehicle_ids"]
        .as_array()
        .map(|values| values.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default();

    let mut seen = std::collections::HashSet::new();
    let distinct: Vec<i64> = ids.into_iter().filter(|id| seen.insert(*id)).collect();

    if distinct.is_empty() || distinct.len() > 5 {
        return validation_error("A maximum of 5 vehicles can be compared");
    }

    (StatusCode::OK, Json(json!({ "vehicles": [] })))
}

async fn search_stub(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let filter_fields = [
        "make",
        "model",
        "year_from",
        "year_to",
        "price_from",
        "price_to",
        "mileage_from",
        "mileage_to",
        "fuel_type",
        "category",
        "drive",
    ];
    let has_any = filter_fields.iter().any(|field| !body[*field].is_null());

    if !has_any {
        return validation_error("At least one filter is required");
    }

    (
        StatusCode::OK,
        Json(json!({ "results": [], "total": 0 })),
    )
}

fn validation_error(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "Validation Error",
            "message": message,
            "code": "VALIDATION_ERROR",
        })),
    )
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

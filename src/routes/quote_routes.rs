use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};

use crate::controllers::quote_controller::QuoteController;
use crate::dto::quote_dto::{
    AdminQuoteResponse, ApiResponse, CalculateQuotesRequest, CheapestQuotesQuery,
    CheapestQuotesResponse, CompareVehiclesRequest, CompareVehiclesResponse,
    CreateQuoteAdminRequest, PaginationParams, PersistedQuotesResponse, QuoteQueryParams,
    SearchQuotesRequest, SearchQuotesResponse, VehicleQuotesResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_quote_router() -> Router<AppState> {
    Router::new()
        .route("/:vehicle_id/calculate-quotes", post(calculate_quotes))
        .route("/:vehicle_id/cheapest-quotes", get(cheapest_quotes))
        .route("/search-quotes", post(search_quotes))
        .route("/compare", post(compare_vehicles))
        .route("/:vehicle_id/quotes", get(vehicle_quote_history))
}

pub fn create_company_quote_router() -> Router<AppState> {
    Router::new().route("/:company_id/quotes", get(company_quote_history))
}

pub fn create_admin_quote_router() -> Router<AppState> {
    Router::new()
        .route("/quotes", post(create_quote_admin))
        .route("/quotes/:quote_id", delete(delete_quote_admin))
}

async fn calculate_quotes(
    State(state): State<AppState>,
    Path(vehicle_id): Path<i64>,
    Query(params): Query<QuoteQueryParams>,
    Json(body): Json<CalculateQuotesRequest>,
) -> Result<Json<VehicleQuotesResponse>, AppError> {
    let controller = QuoteController::new(&state);
    let response = controller
        .calculate_quotes_for_vehicle(vehicle_id, params, body)
        .await?;
    Ok(Json(response))
}

async fn cheapest_quotes(
    State(state): State<AppState>,
    Path(vehicle_id): Path<i64>,
    Query(query): Query<CheapestQuotesQuery>,
) -> Result<Json<CheapestQuotesResponse>, AppError> {
    let controller = QuoteController::new(&state);
    let response = controller.cheapest_quotes(vehicle_id, query).await?;
    Ok(Json(response))
}

async fn search_quotes(
    State(state): State<AppState>,
    Json(body): Json<SearchQuotesRequest>,
) -> Result<Json<SearchQuotesResponse>, AppError> {
    let controller = QuoteController::new(&state);
    let response = controller.search_quotes_for_vehicles(body).await?;
    Ok(Json(response))
}

async fn compare_vehicles(
    State(state): State<AppState>,
    Json(body): Json<CompareVehiclesRequest>,
) -> Result<Json<CompareVehiclesResponse>, AppError> {
    let controller = QuoteController::new(&state);
    let response = controller.compare_vehicles(body).await?;
    Ok(Json(response))
}

async fn vehicle_quote_history(
    State(state): State<AppState>,
    Path(vehicle_id): Path<i64>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PersistedQuotesResponse>, AppError> {
    let controller = QuoteController::new(&state);
    let response = controller.quotes_by_vehicle(vehicle_id, params).await?;
    Ok(Json(response))
}

async fn company_quote_history(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PersistedQuotesResponse>, AppError> {
    let controller = QuoteController::new(&state);
    let response = controller.quotes_by_company(company_id, params).await?;
    Ok(Json(response))
}

async fn create_quote_admin(
    State(state): State<AppState>,
    Json(body): Json<CreateQuoteAdminRequest>,
) -> Result<Json<ApiResponse<AdminQuoteResponse>>, AppError> {
    let controller = QuoteController::new(&state);
    let response = controller.create_quote_admin(body).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Quote computed on demand; nothing was persisted".to_string(),
    )))
}

async fn delete_quote_admin(
    State(state): State<AppState>,
    Path(quote_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = QuoteController::new(&state);
    controller.delete_quote_admin(quote_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Quote deleted"
    })))
}

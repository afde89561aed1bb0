//! Rutas internas de administración del cache
//!
//! El colaborador de gestión de empresas llama al endpoint de
//! invalidación tras cualquier mutación (alta, baja, cambio de tarifas o
//! de logo): un solo incremento del contador invalida en bloque todos los
//! resultados de cotización cacheados.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::cache::versioned_cache::VersionedCache;
use crate::controllers::quote_controller::CACHE_NS_COMPANIES;
use crate::dto::quote_dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_cache_router() -> Router<AppState> {
    Router::new()
        .route("/companies/invalidate", post(invalidate_companies))
        .route("/stats", get(cache_stats))
}

async fn invalidate_companies(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let cache = VersionedCache::new(state.redis.clone());
    let version = cache.increment_version(CACHE_NS_COMPANIES).await?;

    Ok(Json(ApiResponse::success_with_message(
        serde_json::json!({ "namespace": CACHE_NS_COMPANIES, "version": version }),
        "Cached quote results invalidated".to_string(),
    )))
}

async fn cache_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let stats = state
        .redis
        .get_stats()
        .await
        .map_err(|e| AppError::Internal(format!("Cache stats unavailable: {}", e)))?;

    Ok(Json(ApiResponse::success(serde_json::json!({
        "connected": state.redis.is_connected().await,
        "stats": stats,
    }))))
}

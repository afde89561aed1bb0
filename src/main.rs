mod cache;
mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

use cache::redis_client::RedisClient;
use config::environment::EnvironmentConfig;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚢 Vehicle Import Marketplace - API de cotización de envíos");
    info!("===========================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match database::connection::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Inicializar Redis y cache
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

    let redis_config = cache::CacheConfig {
        redis_url,
        default_ttl: 3600,
        max_connections: 10,
    };

    let redis_client = match RedisClient::new(redis_config).await {
        Ok(client) => client,
        Err(e) => {
            error!("❌ Error conectando a Redis: {}", e);
            return Err(anyhow::anyhow!("Error de Redis: {}", e));
        }
    };

    // CORS: permisivo en desarrollo, lista de orígenes en producción
    let cors = if config.is_production() {
        cors_middleware_with_origins(config.cors_origins.clone())
    } else {
        if config.is_development() {
            info!("🔧 Modo desarrollo: CORS permisivo");
        }
        cors_middleware()
    };

    // Crear router de la API
    let app_state = AppState::new(pool, config.clone(), redis_client);

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/vehicles", routes::quote_routes::create_vehicle_quote_router())
        .nest("/companies", routes::quote_routes::create_company_quote_router())
        .nest("/admin", routes::quote_routes::create_admin_quote_router())
        .nest("/internal/cache", routes::cache_routes::create_cache_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚗 Endpoints de cotización:");
    info!("   POST /vehicles/:id/calculate-quotes - Cotización en vivo (calculadora externa)");
    info!("   GET  /vehicles/:id/cheapest-quotes - Top-N de quotes más baratos");
    info!("   POST /vehicles/search-quotes - Búsqueda de vehículos con quotes");
    info!("   POST /vehicles/compare - Comparación de hasta 5 vehículos");
    info!("📜 Endpoints legacy (quotes persistidos):");
    info!("   GET  /vehicles/:id/quotes - Histórico por vehículo");
    info!("   GET  /companies/:id/quotes - Histórico por empresa");
    info!("   POST /admin/quotes - Cálculo bajo demanda (compatibilidad)");
    info!("   DELETE /admin/quotes/:id - Borrado administrativo");
    info!("🧹 Endpoints internos de cache:");
    info!("   POST /internal/cache/companies/invalidate - Invalidación en bloque");
    info!("   GET  /internal/cache/stats - Estadísticas de Redis");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "import-quotes",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}

//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Número de empresas consideradas por cotización si no se configura otro valor
const DEFAULT_COMPANIES_LIMIT: i64 = 10;

/// Tope duro de empresas por cotización para acotar el coste de cómputo
const MAX_COMPANIES_LIMIT: i64 = 1000;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    // Calculadora externa de precios
    pub calculator_api_url: String,
    pub calculator_timeout_secs: u64,
    // Fuente externa de tasa USD→GEL
    pub fx_rate_api_url: String,
    // Política de cotización
    pub quote_companies_limit: i64,
    pub quote_cache_ttl: u64,
    pub search_cache_ttl: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl EnvironmentConfig {
    /// Leer la configuración del entorno con valores por defecto seguros
    pub fn from_env() -> Self {
        Self {
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            calculator_api_url: env::var("CALCULATOR_API_URL")
                .unwrap_or_else(|_| "http://localhost:8081/api/calculate".to_string()),
            calculator_timeout_secs: env::var("CALCULATOR_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("CALCULATOR_TIMEOUT_SECS must be a valid number"),
            fx_rate_api_url: env::var("FX_RATE_API_URL").unwrap_or_else(|_| {
                "https://nbg.gov.ge/gw/api/ct/monetarypolicy/currencies/en/json".to_string()
            }),
            quote_companies_limit: env::var("QUOTE_COMPANIES_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_COMPANIES_LIMIT)
                .clamp(1, MAX_COMPANIES_LIMIT),
            quote_cache_ttl: env::var("QUOTE_CACHE_TTL")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .expect("QUOTE_CACHE_TTL must be a valid number"),
            search_cache_ttl: env::var("SEARCH_CACHE_TTL")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .expect("SEARCH_CACHE_TTL must be a valid number"),
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

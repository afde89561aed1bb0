//! Modelo de Company
//!
//! Empresas de importación/transporte. La gestión de empresas es de un
//! colaborador externo: aquí solo se leen los campos de tarifas y el
//! flag de activación.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Override estructurado de la fórmula de precios de una empresa.
/// Cada campo presente reemplaza la columna correspondiente de la tabla.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinalFormula {
    pub base_price: Option<f64>,
    pub price_per_mile: Option<f64>,
    pub customs_fee: Option<f64>,
    pub service_fee: Option<f64>,
    pub broker_fee: Option<f64>,
    pub insurance_fee: Option<f64>,
    pub delivery_days: Option<i32>,
}

/// Company principal - mapea exactamente a la tabla companies
#[derive(Debug, Clone, FromRow)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub rating: Option<f64>,
    pub review_count: i64,
    pub base_price: f64,
    pub price_per_mile: f64,
    pub customs_fee: f64,
    pub service_fee: f64,
    pub broker_fee: f64,
    pub final_formula: Option<sqlx::types::Json<FinalFormula>>,
    pub avg_delivery_days: Option<i32>,
    pub active: bool,
}

impl Company {
    /// Acceso cómodo al override de fórmula, si existe
    pub fn formula(&self) -> Option<&FinalFormula> {
        self.final_formula.as_ref().map(|json| &json.0)
    }
}

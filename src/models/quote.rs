//! Modelo de Quote
//!
//! Este módulo contiene el valor calculado por empresa (Quote), su
//! desglose de costes cerrado y la moneda soportada. El desglose es un
//! struct con campos nombrados: la suma de sus componentes debe coincidir
//! siempre con `total_price`, también después de una conversión de moneda.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::utils::errors::AppError;

/// Moneda soportada por la API. USD es la moneda canónica de cálculo;
/// GEL se obtiene en tiempo de respuesta con una tasa externa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "GEL")]
    Gel,
}

impl Currency {
    /// Interpretar el parámetro `currency` de un request (por defecto USD)
    pub fn parse(value: Option<&str>) -> Result<Self, AppError> {
        match value {
            None => Ok(Currency::Usd),
            Some(raw) => match raw.trim().to_uppercase().as_str() {
                "" | "USD" => Ok(Currency::Usd),
                "GEL" => Ok(Currency::Gel),
                other => Err(AppError::ValidationError(format!(
                    "Unsupported currency '{}'",
                    other
                ))),
            },
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
            Currency::Gel => write!(f, "GEL"),
        }
    }
}

/// Desglose cerrado de costes de un quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBreakdown {
    pub shipping_total: f64,
    pub customs_fee: f64,
    pub service_fee: f64,
    pub broker_fee: f64,
    pub insurance_fee: f64,
    pub total_price: f64,
}

impl QuoteBreakdown {
    /// Suma de los componentes individuales del desglose
    pub fn component_sum(&self) -> f64 {
        self.shipping_total + self.customs_fee + self.service_fee + self.broker_fee
            + self.insurance_fee
    }

    /// Construir un desglose nuevo aplicando una tasa de cambio.
    /// Se reconstruye el valor completo en lugar de mutarlo in situ.
    pub fn converted(&self, rate: f64) -> Self {
        Self {
            shipping_total: self.shipping_total * rate,
            customs_fee: self.customs_fee * rate,
            service_fee: self.service_fee * rate,
            broker_fee: self.broker_fee * rate,
            insurance_fee: self.insurance_fee * rate,
            total_price: self.total_price * rate,
        }
    }
}

/// Quote calculado para un par (vehículo, empresa). Valor transitorio:
/// en el diseño actual nunca se persiste, solo se cachea con TTL corto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub company_id: i64,
    pub company_name: String,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub total_price: f64,
    pub currency: Currency,
    pub delivery_time_days: Option<i32>,
    pub breakdown: QuoteBreakdown,
    pub company_rating: Option<f64>,
    pub company_review_count: i64,
}

/// Fila histórica de quote persistido (superficie legacy, solo lectura
/// y borrado administrativo; no se crean filas nuevas).
#[derive(Debug, Clone, FromRow)]
pub struct QuoteRecord {
    pub id: i64,
    pub company_id: i64,
    pub vehicle_id: i64,
    pub total_price: f64,
    pub currency: String,
    pub delivery_time_days: Option<i32>,
    pub breakdown: sqlx::types::Json<QuoteBreakdown>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse() {
        assert_eq!(Currency::parse(None).unwrap(), Currency::Usd);
        assert_eq!(Currency::parse(Some("usd")).unwrap(), Currency::Usd);
        assert_eq!(Currency::parse(Some("GEL")).unwrap(), Currency::Gel);
        assert_eq!(Currency::parse(Some(" gel ")).unwrap(), Currency::Gel);
        assert!(Currency::parse(Some("EUR")).is_err());
    }

    #[test]
    fn test_breakdown_component_sum() {
        let breakdown = QuoteBreakdown {
            shipping_total: 900.0,
            customs_fee: 200.0,
            service_fee: 100.0,
            broker_fee: 50.0,
            insurance_fee: 0.0,
            total_price: 1250.0,
        };
        assert_eq!(breakdown.component_sum(), breakdown.total_price);
    }

    #[test]
    fn test_breakdown_converted_keeps_total() {
        let breakdown = QuoteBreakdown {
            shipping_total: 900.0,
            customs_fee: 200.0,
            service_fee: 100.0,
            broker_fee: 50.0,
            insurance_fee: 0.0,
            total_price: 1250.0,
        };
        let converted = breakdown.converted(2.7);
        assert_eq!(converted.total_price, 1250.0 * 2.7);
        // el original no cambia
        assert_eq!(breakdown.total_price, 1250.0);
    }
}

//! Modelo de Vehicle
//!
//! Vehículos subastados, propiedad del colaborador de ingesta: este
//! subsistema solo los lee para cotizar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: Option<i32>,
    pub yard_name: Option<String>,
    pub source: String,
    pub fuel_type: Option<String>,
    pub category: Option<String>,
    pub drive: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Filtros para búsqueda de vehículos. Los rangos de precio se aplican
/// sobre los totales cotizados, no sobre columnas del vehículo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleFilters {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub price_from: Option<f64>,
    pub price_to: Option<f64>,
    pub mileage_from: Option<i32>,
    pub mileage_to: Option<i32>,
    pub fuel_type: Option<String>,
    pub category: Option<String>,
    pub drive: Option<String>,
}

impl VehicleFilters {
    /// Verificar si el cliente envió al menos un filtro
    pub fn has_any(&self) -> bool {
        self.make.is_some()
            || self.model.is_some()
            || self.year_from.is_some()
            || self.year_to.is_some()
            || self.price_from.is_some()
            || self.price_to.is_some()
            || self.mileage_from.is_some()
            || self.mileage_to.is_some()
            || self.fuel_type.is_some()
            || self.category.is_some()
            || self.drive.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_has_any() {
        assert!(!VehicleFilters::default().has_any());

        let filters = VehicleFilters {
            make: Some("Toyota".to_string()),
            ..Default::default()
        };
        assert!(filters.has_any());

        let filters = VehicleFilters {
            price_to: Some(3000.0),
            ..Default::default()
        };
        assert!(filters.has_any());
    }
}

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::quote::{Currency, Quote, QuoteBreakdown, QuoteRecord};
use crate::models::vehicle::{Vehicle, VehicleFilters};

// Request para calcular quotes en vivo de un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CalculateQuotesRequest {
    #[validate(length(min = 1, max = 100))]
    pub auction: String,

    #[validate(length(min = 1, max = 100))]
    pub usacity: String,

    #[validate(length(max = 100))]
    pub vehiclecategory: Option<String>,
}

// Query params de cálculo de quotes
#[derive(Debug, Default, Deserialize)]
pub struct QuoteQueryParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub currency: Option<String>,
    #[serde(rename = "minRating")]
    pub min_rating: Option<f64>,
}

// Query params del top-N de quotes más baratos
#[derive(Debug, Default, Deserialize)]
pub struct CheapestQuotesQuery {
    pub limit: Option<i64>,
    pub currency: Option<String>,
}

// Query params de paginación simple (superficie legacy)
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Respuesta de cálculo de quotes de un vehículo
#[derive(Debug, Serialize)]
pub struct VehicleQuotesResponse {
    pub vehicle_id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: Option<i32>,
    pub yard_name: Option<String>,
    pub source: String,
    pub distance_miles: f64,
    pub quotes: Vec<Quote>,
    pub price_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmatched_auction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmatched_city: Option<String>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

/// Entrada de un vehículo con sus quotes (búsqueda y comparación)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleQuotesEntry {
    pub vehicle_id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub distance_miles: f64,
    pub quotes: Vec<Quote>,
}

impl VehicleQuotesEntry {
    pub fn new(vehicle: &Vehicle, distance_miles: f64, quotes: Vec<Quote>) -> Self {
        Self {
            vehicle_id: vehicle.id,
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            distance_miles,
            quotes,
        }
    }
}

// Request de búsqueda de vehículos con quotes
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SearchQuotesRequest {
    #[validate(length(min = 1, max = 100))]
    pub make: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year_from: Option<i32>,
    #[validate(range(min = 1900, max = 2100))]
    pub year_to: Option<i32>,
    #[validate(range(min = 0.0))]
    pub price_from: Option<f64>,
    #[validate(range(min = 0.0))]
    pub price_to: Option<f64>,
    #[validate(range(min = 0))]
    pub mileage_from: Option<i32>,
    #[validate(range(min = 0))]
    pub mileage_to: Option<i32>,
    pub fuel_type: Option<String>,
    pub category: Option<String>,
    pub drive: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub currency: Option<String>,
}

impl SearchQuotesRequest {
    /// Extraer los filtros de vehículo del cuerpo del request
    pub fn filters(&self) -> VehicleFilters {
        VehicleFilters {
            make: self.make.clone(),
            model: self.model.clone(),
            year_from: self.year_from,
            year_to: self.year_to,
            price_from: self.price_from,
            price_to: self.price_to,
            mileage_from: self.mileage_from,
            mileage_to: self.mileage_to,
            fuel_type: self.fuel_type.clone(),
            category: self.category.clone(),
            drive: self.drive.clone(),
        }
    }
}

/// Respuesta de búsqueda de vehículos con quotes
#[derive(Debug, Serialize)]
pub struct SearchQuotesResponse {
    pub results: Vec<VehicleQuotesEntry>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

// Request de comparación de vehículos
#[derive(Debug, Deserialize)]
pub struct CompareVehiclesRequest {
    pub vehicle_ids: Vec<i64>,
    pub quotes_per_vehicle: Option<i64>,
    pub currency: Option<String>,
}

/// Respuesta de comparación de vehículos
#[derive(Debug, Serialize)]
pub struct CompareVehiclesResponse {
    pub vehicles: Vec<VehicleQuotesEntry>,
}

/// Respuesta del top-N de quotes más baratos
#[derive(Debug, Serialize)]
pub struct CheapestQuotesResponse {
    pub vehicle_id: i64,
    pub distance_miles: f64,
    pub currency: Currency,
    pub quotes: Vec<Quote>,
}

/// Quote persistido expuesto por la superficie legacy
#[derive(Debug, Serialize)]
pub struct QuoteRecordResponse {
    pub id: i64,
    pub company_id: i64,
    pub vehicle_id: i64,
    pub total_price: f64,
    pub currency: String,
    pub delivery_time_days: Option<i32>,
    pub breakdown: QuoteBreakdown,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<QuoteRecord> for QuoteRecordResponse {
    fn from(record: QuoteRecord) -> Self {
        Self {
            id: record.id,
            company_id: record.company_id,
            vehicle_id: record.vehicle_id,
            total_price: record.total_price,
            currency: record.currency,
            delivery_time_days: record.delivery_time_days,
            breakdown: record.breakdown.0,
            created_at: record.created_at,
        }
    }
}

/// Listado paginado de quotes persistidos
#[derive(Debug, Serialize)]
pub struct PersistedQuotesResponse {
    pub quotes: Vec<QuoteRecordResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

// Request del shim administrativo de creación de quotes (obsoleto)
#[derive(Debug, Deserialize)]
pub struct CreateQuoteAdminRequest {
    pub vehicle_id: i64,
    pub company_id: i64,
    pub currency: Option<String>,
}

/// Registro efímero devuelto por el shim administrativo: se calcula bajo
/// demanda y no se persiste, por eso id = 0
#[derive(Debug, Serialize)]
pub struct AdminQuoteResponse {
    pub id: i64,
    pub vehicle_id: i64,
    pub company_id: i64,
    pub company_name: String,
    pub total_price: f64,
    pub currency: Currency,
    pub delivery_time_days: Option<i32>,
    pub breakdown: QuoteBreakdown,
}

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

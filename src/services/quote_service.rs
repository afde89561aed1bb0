//! Servicio de cotización por vehículo
//!
//! Orquestación pura por petición: resuelve la distancia una sola vez por
//! vehículo y evalúa la tarifa de cada empresa. El fallo de una empresa
//! no aborta el lote: se omite esa empresa, se registra y se devuelven
//! los quotes restantes.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::company::Company;
use crate::models::quote::{Currency, Quote};
use crate::models::vehicle::Vehicle;
use crate::services::distance_service::DistanceResolver;
use crate::services::pricing_service::{PricingEvaluator, PricingOutcome};

/// Resultado de cotizar un vehículo contra un conjunto de empresas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteComputation {
    pub distance_miles: f64,
    pub quotes: Vec<Quote>,
}

pub struct ShippingQuoteService;

impl ShippingQuoteService {
    /// Calcular los quotes de todas las empresas para un vehículo.
    /// La lista resultante no está ordenada; el llamador decide el orden.
    pub fn compute_quotes_for_vehicle(
        vehicle: &Vehicle,
        companies: &[Company],
    ) -> QuoteComputation {
        let distance_miles =
            DistanceResolver::resolve(vehicle.yard_name.as_deref().unwrap_or_default());

        let mut quotes = Vec::with_capacity(companies.len());
        for company in companies {
            match PricingEvaluator::evaluate(company, distance_miles) {
                Ok(outcome) => quotes.push(Self::build_quote(company, outcome)),
                Err(e) => {
                    warn!(
                        "⚠️ Empresa '{}' omitida al cotizar vehículo {}: {}",
                        company.name, vehicle.id, e
                    );
                }
            }
        }

        QuoteComputation {
            distance_miles,
            quotes,
        }
    }

    fn build_quote(company: &Company, outcome: PricingOutcome) -> Quote {
        Quote {
            company_id: company.id,
            company_name: company.name.clone(),
            website: company.website.clone(),
            logo_url: company.logo_url.clone(),
            total_price: outcome.total_price,
            currency: Currency::Usd,
            delivery_time_days: outcome.delivery_time_days,
            breakdown: outcome.breakdown,
            company_rating: company.rating,
            company_review_count: company.review_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn vehicle_in_atlanta() -> Vehicle {
        Vehicle {
            id: 1,
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: 2018,
            mileage: Some(85_000),
            yard_name: Some("Atlanta, GA".to_string()),
            source: "copart".to_string(),
            fuel_type: Some("gasoline".to_string()),
            category: Some("sedan".to_string()),
            drive: Some("fwd".to_string()),
            created_at: Utc::now(),
        }
    }

    fn company(id: i64, name: &str, base_price: f64) -> Company {
        Company {
            id,
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            website: None,
            logo_url: None,
            rating: Some(4.0),
            review_count: 3,
            base_price,
            price_per_mile: 0.5,
            customs_fee: 200.0,
            service_fee: 100.0,
            broker_fee: 50.0,
            final_formula: None,
            avg_delivery_days: Some(40),
            active: true,
        }
    }

    #[test]
    fn test_distance_resolved_once_and_shared() {
        let vehicle = vehicle_in_atlanta();
        let companies = vec![company(1, "Alfa", 500.0), company(2, "Beta", 600.0)];

        let computation =
            ShippingQuoteService::compute_quotes_for_vehicle(&vehicle, &companies);

        assert_eq!(computation.distance_miles, 800.0);
        assert_eq!(computation.quotes.len(), 2);
        assert_eq!(computation.quotes[0].total_price, 1250.0);
        assert_eq!(computation.quotes[1].total_price, 1350.0);
    }

    #[test]
    fn test_failed_company_is_skipped_not_fatal() {
        let vehicle = vehicle_in_atlanta();
        let mut broken = company(2, "Beta", 600.0);
        broken.service_fee = -100.0;
        let companies = vec![company(1, "Alfa", 500.0), broken, company(3, "Gamma", 700.0)];

        let computation =
            ShippingQuoteService::compute_quotes_for_vehicle(&vehicle, &companies);

        let ids: Vec<i64> = computation.quotes.iter().map(|q| q.company_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_identical_inputs_yield_identical_results() {
        let vehicle = vehicle_in_atlanta();
        let companies = vec![company(1, "Alfa", 500.0), company(2, "Beta", 600.0)];

        let first = ShippingQuoteService::compute_quotes_for_vehicle(&vehicle, &companies);
        let second = ShippingQuoteService::compute_quotes_for_vehicle(&vehicle, &companies);

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_company_metadata_is_attached() {
        let vehicle = vehicle_in_atlanta();
        let mut c = company(7, "GeTrans Logistics", 500.0);
        c.website = Some("https://getrans.example".to_string());
        c.rating = Some(4.8);
        c.review_count = 21;

        let computation =
            ShippingQuoteService::compute_quotes_for_vehicle(&vehicle, &[c]);

        let quote = &computation.quotes[0];
        assert_eq!(quote.company_id, 7);
        assert_eq!(quote.company_name, "GeTrans Logistics");
        assert_eq!(quote.website.as_deref(), Some("https://getrans.example"));
        assert_eq!(quote.company_rating, Some(4.8));
        assert_eq!(quote.company_review_count, 21);
        assert_eq!(quote.currency, Currency::Usd);
        assert_eq!(quote.breakdown.component_sum(), quote.total_price);
    }
}

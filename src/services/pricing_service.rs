//! Evaluación de la fórmula de precios
//!
//! Función pura sobre (empresa, distancia): aplica la fórmula por defecto
//! `base + por_milla * distancia + aduana + servicio + broker`, o el
//! override estructurado `final_formula` campo a campo si la empresa lo
//! define. El desglose expone siempre las mismas claves. No se redondea
//! durante el cálculo.

use crate::models::company::Company;
use crate::models::quote::QuoteBreakdown;
use crate::utils::errors::{AppError, AppResult};

/// Resultado de evaluar la tarifa de una empresa
#[derive(Debug, Clone)]
pub struct PricingOutcome {
    pub total_price: f64,
    pub breakdown: QuoteBreakdown,
    pub delivery_time_days: Option<i32>,
}

pub struct PricingEvaluator;

impl PricingEvaluator {
    /// Evaluar el precio total de una empresa para una distancia dada
    pub fn evaluate(company: &Company, distance_miles: f64) -> AppResult<PricingOutcome> {
        let formula = company.formula();

        let base_price = formula
            .and_then(|f| f.base_price)
            .unwrap_or(company.base_price);
        let price_per_mile = formula
            .and_then(|f| f.price_per_mile)
            .unwrap_or(company.price_per_mile);
        let customs_fee = formula
            .and_then(|f| f.customs_fee)
            .unwrap_or(company.customs_fee);
        let service_fee = formula
            .and_then(|f| f.service_fee)
            .unwrap_or(company.service_fee);
        let broker_fee = formula
            .and_then(|f| f.broker_fee)
            .unwrap_or(company.broker_fee);
        let insurance_fee = formula.and_then(|f| f.insurance_fee).unwrap_or(0.0);

        let components = [
            base_price,
            price_per_mile,
            customs_fee,
            service_fee,
            broker_fee,
            insurance_fee,
        ];
        if components.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(AppError::ValidationError(format!(
                "Invalid pricing configuration for company '{}'",
                company.name
            )));
        }

        let mut breakdown = QuoteBreakdown {
            shipping_total: base_price + price_per_mile * distance_miles,
            customs_fee,
            service_fee,
            broker_fee,
            insurance_fee,
            total_price: 0.0,
        };
        // el total es siempre la suma de los componentes
        breakdown.total_price = breakdown.component_sum();
        let total_price = breakdown.total_price;

        Ok(PricingOutcome {
            total_price,
            breakdown,
            delivery_time_days: formula
                .and_then(|f| f.delivery_days)
                .or(company.avg_delivery_days),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::company::FinalFormula;

    fn company_with_rates() -> Company {
        Company {
            id: 1,
            name: "GeTrans Logistics".to_string(),
            slug: "getrans-logistics".to_string(),
            website: Some("https://getrans.example".to_string()),
            logo_url: None,
            rating: Some(4.5),
            review_count: 12,
            base_price: 500.0,
            price_per_mile: 0.5,
            customs_fee: 200.0,
            service_fee: 100.0,
            broker_fee: 50.0,
            final_formula: None,
            avg_delivery_days: Some(45),
            active: true,
        }
    }

    #[test]
    fn test_default_formula() {
        let company = company_with_rates();
        let outcome = PricingEvaluator::evaluate(&company, 800.0).unwrap();

        assert_eq!(outcome.total_price, 1250.0);
        assert_eq!(outcome.breakdown.shipping_total, 900.0);
        assert_eq!(outcome.breakdown.component_sum(), outcome.total_price);
        assert_eq!(outcome.breakdown.total_price, outcome.total_price);
        assert_eq!(outcome.delivery_time_days, Some(45));
    }

    #[test]
    fn test_final_formula_takes_precedence_per_field() {
        let mut company = company_with_rates();
        company.final_formula = Some(sqlx::types::Json(FinalFormula {
            base_price: Some(700.0),
            price_per_mile: None,
            customs_fee: None,
            service_fee: None,
            broker_fee: Some(0.0),
            insurance_fee: Some(80.0),
            delivery_days: Some(30),
        }));

        let outcome = PricingEvaluator::evaluate(&company, 800.0).unwrap();

        // 700 + 0.5*800 + 200 + 100 + 0 + 80
        assert_eq!(outcome.total_price, 1480.0);
        assert_eq!(outcome.breakdown.insurance_fee, 80.0);
        assert_eq!(outcome.breakdown.component_sum(), outcome.total_price);
        assert_eq!(outcome.delivery_time_days, Some(30));
    }

    #[test]
    fn test_negative_component_is_rejected() {
        let mut company = company_with_rates();
        company.customs_fee = -1.0;

        assert!(PricingEvaluator::evaluate(&company, 800.0).is_err());
    }

    #[test]
    fn test_non_finite_component_is_rejected() {
        let mut company = company_with_rates();
        company.price_per_mile = f64::NAN;

        assert!(PricingEvaluator::evaluate(&company, 800.0).is_err());
    }
}

//! Conversión de moneda
//!
//! Obtiene la tasa USD→GEL de la fuente externa y la aplica a un lote
//! completo de quotes. La conversión es todo-o-nada: sin tasa válida
//! (ausente, no finita o ≤ 0) el lote entero falla; nunca se devuelve un
//! resultado parcial ni se cae en silencio a USD.

use serde::Deserialize;
use std::time::Duration;

use crate::models::quote::{Currency, Quote};
use crate::utils::errors::{AppError, AppResult};

/// Timeout de la petición a la fuente de tasas
const FX_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct FxCurrencyGroup {
    #[serde(default)]
    currencies: Vec<FxCurrency>,
}

#[derive(Debug, Deserialize)]
struct FxCurrency {
    code: String,
    rate: f64,
    #[serde(default)]
    quantity: Option<f64>,
}

/// Cliente de la fuente externa de tasas de cambio
#[derive(Clone)]
pub struct FxRateClient {
    client: reqwest::Client,
    api_url: String,
}

impl FxRateClient {
    pub fn new(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    /// Obtener la última tasa USD→GEL publicada; None si la fuente no la
    /// entrega o no responde
    pub async fn get_latest_usd_gel_rate(&self) -> AppResult<Option<f64>> {
        log::info!("💱 Consultando tasa USD→GEL en {}", self.api_url);

        let response = match self
            .client
            .get(&self.api_url)
            .query(&[("currencies", "USD")])
            .timeout(Duration::from_secs(FX_REQUEST_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::error!("❌ Fuente de tasas inaccesible: {}", e);
                return Ok(None);
            }
        };

        let status = response.status();
        if !status.is_success() {
            log::error!("❌ Fuente de tasas respondió {}", status);
            return Ok(None);
        }

        let groups: Vec<FxCurrencyGroup> = match response.json().await {
            Ok(groups) => groups,
            Err(e) => {
                log::error!("❌ Respuesta de tasas no parseable: {}", e);
                return Ok(None);
            }
        };

        let rate = groups
            .iter()
            .flat_map(|g| g.currencies.iter())
            .find(|c| c.code.eq_ignore_ascii_case("USD"))
            .map(|c| {
                // la tasa se publica por `quantity` unidades de la divisa
                let quantity = c.quantity.filter(|q| *q > 0.0).unwrap_or(1.0);
                c.rate / quantity
            });

        match rate {
            Some(r) => log::info!("✅ Tasa USD→GEL: {}", r),
            None => log::warn!("⚠️ La fuente no publicó tasa para USD"),
        }

        Ok(rate)
    }
}

/// Servicio de conversión de moneda sobre lotes de quotes
#[derive(Clone)]
pub struct CurrencyService {
    fx: FxRateClient,
}

impl CurrencyService {
    pub fn new(fx: FxRateClient) -> Self {
        Self { fx }
    }

    /// Resolver la tasa a aplicar para la moneda pedida.
    /// USD no necesita tasa (None); GEL exige una tasa válida.
    pub async fn resolve_rate(&self, currency: Currency) -> AppResult<Option<f64>> {
        match currency {
            Currency::Usd => Ok(None),
            Currency::Gel => {
                let rate = self.fx.get_latest_usd_gel_rate().await?;
                Self::validate_rate(rate).map(Some)
            }
        }
    }

    /// Precondición dura de conversión: tasa presente, finita y positiva
    pub fn validate_rate(rate: Option<f64>) -> AppResult<f64> {
        match rate {
            Some(r) if r.is_finite() && r > 0.0 => Ok(r),
            _ => Err(AppError::ValidationError(
                "Exchange rate USD to GEL is not available".to_string(),
            )),
        }
    }

    /// Aplicar una tasa ya validada a un lote de quotes. Se reconstruye
    /// cada desglose; total y desglose llevan siempre la misma tasa.
    pub fn apply_rate(quotes: Vec<Quote>, rate: f64, currency: Currency) -> Vec<Quote> {
        quotes
            .into_iter()
            .map(|quote| Quote {
                company_id: quote.company_id,
                company_name: quote.company_name,
                website: quote.website,
                logo_url: quote.logo_url,
                total_price: quote.total_price * rate,
                currency,
                delivery_time_days: quote.delivery_time_days,
                breakdown: quote.breakdown.converted(rate),
                company_rating: quote.company_rating,
                company_review_count: quote.company_review_count,
            })
            .collect()
    }

    /// Convertir un lote completo a la moneda pedida
    pub async fn convert_quotes(
        &self,
        quotes: Vec<Quote>,
        currency: Currency,
    ) -> AppResult<Vec<Quote>> {
        match self.resolve_rate(currency).await? {
            None => Ok(quotes),
            Some(rate) => Ok(Self::apply_rate(quotes, rate, currency)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quote::QuoteBreakdown;

    fn usd_quote(total: f64) -> Quote {
        Quote {
            company_id: 1,
            company_name: "GeTrans Logistics".to_string(),
            website: None,
            logo_url: None,
            total_price: total,
            currency: Currency::Usd,
            delivery_time_days: Some(45),
            breakdown: QuoteBreakdown {
                shipping_total: total - 350.0,
                customs_fee: 200.0,
                service_fee: 100.0,
                broker_fee: 50.0,
                insurance_fee: 0.0,
                total_price: total,
            },
            company_rating: Some(4.5),
            company_review_count: 12,
        }
    }

    #[test]
    fn test_apply_rate_converts_total_and_breakdown_uniformly() {
        let quotes = CurrencyService::apply_rate(vec![usd_quote(1250.0)], 2.7, Currency::Gel);

        let quote = &quotes[0];
        assert_eq!(quote.total_price, 3375.0);
        assert_eq!(quote.breakdown.total_price, 3375.0);
        assert_eq!(quote.currency, Currency::Gel);
        // total y desglose nunca divergen
        assert_eq!(quote.total_price, quote.breakdown.total_price);
    }

    #[test]
    fn test_validate_rate_rejects_missing_or_invalid() {
        assert!(CurrencyService::validate_rate(None).is_err());
        assert!(CurrencyService::validate_rate(Some(0.0)).is_err());
        assert!(CurrencyService::validate_rate(Some(-2.7)).is_err());
        assert!(CurrencyService::validate_rate(Some(f64::NAN)).is_err());
        assert!(CurrencyService::validate_rate(Some(f64::INFINITY)).is_err());
        assert_eq!(CurrencyService::validate_rate(Some(2.7)).unwrap(), 2.7);
    }

    #[tokio::test]
    async fn test_gel_conversion_fails_closed_without_rate() {
        // la fuente no responde: el lote entero falla, sin resultado parcial
        let fx = FxRateClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1/fx".to_string(),
        );
        let service = CurrencyService::new(fx);

        let result = service
            .convert_quotes(vec![usd_quote(1250.0)], Currency::Gel)
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_usd_conversion_is_identity() {
        // USD no toca la red: el cliente apunta a un host inexistente
        let fx = FxRateClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1/fx".to_string(),
        );
        let service = CurrencyService::new(fx);

        let quotes = service
            .convert_quotes(vec![usd_quote(1250.0)], Currency::Usd)
            .await
            .unwrap();

        assert_eq!(quotes[0].total_price, 1250.0);
        assert_eq!(quotes[0].currency, Currency::Usd);
    }
}

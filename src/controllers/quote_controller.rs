//! Controlador de cotizaciones
//!
//! Capa de orquestación del subsistema: valida entradas, carga vehículo y
//! empresas activas, invoca los servicios de cotización, aplica conversión
//! de moneda, ordena, filtra por rating y pagina. La superficie legacy de
//! quotes persistidos se mantiene como shim de compatibilidad.

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::cache::versioned_cache::VersionedCache;
use crate::config::environment::EnvironmentConfig;
use crate::dto::quote_dto::{
    AdminQuoteResponse, CalculateQuotesRequest, CheapestQuotesQuery, CheapestQuotesResponse,
    CompareVehiclesRequest, CompareVehiclesResponse, CreateQuoteAdminRequest, PaginationParams,
    PersistedQuotesResponse, QuoteQueryParams, SearchQuotesRequest, SearchQuotesResponse,
    VehicleQuotesEntry, VehicleQuotesResponse,
};
use crate::models::company::Company;
use crate::models::quote::{Currency, Quote, QuoteBreakdown};
use crate::models::vehicle::Vehicle;
use crate::repositories::company_repository::CompanyRepository;
use crate::repositories::quote_repository::QuoteRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::calculator_service::{
    normalize_token, CalculatorClient, CalculatorEntry, CalculatorNoMatch, CalculatorOutcome,
};
use crate::services::currency_service::{CurrencyService, FxRateClient};
use crate::services::distance_service::DistanceResolver;
use crate::services::quote_service::{QuoteComputation, ShippingQuoteService};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::{clamp_limit, clamp_limit_with, clamp_offset, total_pages};

/// Namespace de cache invalidado por cualquier mutación de empresas
pub const CACHE_NS_COMPANIES: &str = "companies";

/// Máximo de vehículos por comparación
pub const MAX_COMPARE_VEHICLES: usize = 5;

const DEFAULT_QUOTES_PER_VEHICLE: i64 = 3;
const MAX_QUOTES_PER_VEHICLE: i64 = 10;
const DEFAULT_CHEAPEST_LIMIT: i64 = 5;
const MAX_CHEAPEST_LIMIT: i64 = 50;

/// Resultado cacheable del cálculo de precios en vivo (siempre en USD;
/// la conversión, el filtro de rating y la paginación se aplican después)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveQuotes {
    pub price_available: bool,
    pub unmatched_auction: Option<String>,
    pub unmatched_city: Option<String>,
    pub quotes: Vec<Quote>,
}

impl LiveQuotes {
    fn priced(quotes: Vec<Quote>) -> Self {
        Self {
            price_available: true,
            unmatched_auction: None,
            unmatched_city: None,
            quotes,
        }
    }

    fn no_match(reason: CalculatorNoMatch) -> Self {
        Self {
            price_available: false,
            unmatched_auction: reason.unmatched_auction,
            unmatched_city: reason.unmatched_city,
            quotes: Vec::new(),
        }
    }

    fn unavailable() -> Self {
        Self {
            price_available: false,
            unmatched_auction: None,
            unmatched_city: None,
            quotes: Vec::new(),
        }
    }
}

/// Resultado cacheable de la búsqueda de vehículos con quotes (en USD)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SearchComputation {
    results: Vec<VehicleQuotesEntry>,
}

pub struct QuoteController {
    vehicles: VehicleRepository,
    companies: CompanyRepository,
    quotes: QuoteRepository,
    currency: CurrencyService,
    calculator: CalculatorClient,
    cache: VersionedCache,
    config: EnvironmentConfig,
}

impl QuoteController {
    pub fn new(state: &AppState) -> Self {
        Self {
            vehicles: VehicleRepository::new(state.pool.clone()),
            companies: CompanyRepository::new(state.pool.clone()),
            quotes: QuoteRepository::new(state.pool.clone()),
            currency: CurrencyService::new(FxRateClient::new(
                state.http_client.clone(),
                state.config.fx_rate_api_url.clone(),
            )),
            calculator: CalculatorClient::new(
                state.http_client.clone(),
                state.config.calculator_api_url.clone(),
                state.config.calculator_timeout_secs,
            ),
            cache: VersionedCache::new(state.redis.clone()),
            config: state.config.clone(),
        }
    }

    /// Calcular los quotes en vivo de un vehículo contra la calculadora
    /// externa. Una entrada no reconocida o una calculadora caída nunca
    /// son un error HTTP: se responde 200 con `price_available: false`.
    pub async fn calculate_quotes_for_vehicle(
        &self,
        vehicle_id: i64,
        params: QuoteQueryParams,
        body: CalculateQuotesRequest,
    ) -> AppResult<VehicleQuotesResponse> {
        body.validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        let currency = Currency::parse(params.currency.as_deref())?;
        let limit = clamp_limit(params.limit);
        let offset = clamp_offset(params.offset);

        let vehicle = self.load_vehicle(vehicle_id).await?;
        let companies = self.load_active_companies().await?;
        let distance_miles =
            DistanceResolver::resolve(vehicle.yard_name.as_deref().unwrap_or_default());

        let computed = match CalculatorClient::normalize_request(
            &body.auction,
            &body.usacity,
            body.vehiclecategory.as_deref(),
        ) {
            Err(no_match) => {
                info!(
                    "🔎 Entrada de cotización sin coincidencia para vehículo {} (auction: {:?}, city: {:?})",
                    vehicle.id, no_match.unmatched_auction, no_match.unmatched_city
                );
                LiveQuotes::no_match(no_match)
            }
            Ok(request) => {
                let key_parts = vec![
                    vehicle.id.to_string(),
                    request.auction.clone(),
                    request.usacity.clone(),
                    request.vehiclecategory.clone(),
                ];
                let calculator = &self.calculator;
                let companies_ref = &companies;
                let cached = self
                    .cache
                    .with_versioned_cache(
                        CACHE_NS_COMPANIES,
                        &key_parts,
                        self.config.quote_cache_ttl,
                        || async move {
                            match calculator.fetch_quotes(&request).await {
                                CalculatorOutcome::Priced(entries) => Ok(LiveQuotes::priced(
                                    join_calculator_entries(companies_ref, &entries),
                                )),
                                CalculatorOutcome::NoMatch(reason) => {
                                    Ok(LiveQuotes::no_match(reason))
                                }
                                CalculatorOutcome::Unavailable(message) => {
                                    Err(AppError::UpstreamUnavailable(message))
                                }
                            }
                        },
                    )
                    .await;

                match cached {
                    Ok(live) => live,
                    // la indisponibilidad degrada, no se cachea y no es un 500
                    Err(AppError::UpstreamUnavailable(message)) => {
                        error!(
                            "❌ Calculadora no disponible para vehículo {}: {}",
                            vehicle.id, message
                        );
                        LiveQuotes::unavailable()
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        let quotes = if computed.quotes.is_empty() {
            computed.quotes
        } else {
            self.currency.convert_quotes(computed.quotes, currency).await?
        };

        let mut quotes = quotes;
        sort_quotes(&mut quotes);
        let quotes = filter_min_rating(quotes, params.min_rating);
        let total = quotes.len() as i64;
        let page: Vec<Quote> = quotes
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        Ok(VehicleQuotesResponse {
            vehicle_id: vehicle.id,
            make: vehicle.make,
            model: vehicle.model,
            year: vehicle.year,
            mileage: vehicle.mileage,
            yard_name: vehicle.yard_name,
            source: vehicle.source,
            distance_miles,
            quotes: page,
            price_available: computed.price_available,
            unmatched_auction: computed.unmatched_auction,
            unmatched_city: computed.unmatched_city,
            total,
            limit,
            offset,
            total_pages: total_pages(total, limit),
        })
    }

    /// Top-N de quotes más baratos de un vehículo (fórmula local, cacheado)
    pub async fn cheapest_quotes(
        &self,
        vehicle_id: i64,
        query: CheapestQuotesQuery,
    ) -> AppResult<CheapestQuotesResponse> {
        let currency = Currency::parse(query.currency.as_deref())?;
        let limit = clamp_limit_with(query.limit, DEFAULT_CHEAPEST_LIMIT, MAX_CHEAPEST_LIMIT);

        let vehicle = self.load_vehicle(vehicle_id).await?;
        let companies = self.load_active_companies().await?;

        let key_parts = vec![
            "cheapest".to_string(),
            vehicle_id.to_string(),
            limit.to_string(),
        ];
        let vehicle_ref = &vehicle;
        let companies_ref = &companies;
        let computation = self
            .cache
            .with_versioned_cache(
                CACHE_NS_COMPANIES,
                &key_parts,
                self.config.quote_cache_ttl,
                || async move {
                    let mut computation =
                        ShippingQuoteService::compute_quotes_for_vehicle(vehicle_ref, companies_ref);
                    sort_quotes(&mut computation.quotes);
                    computation.quotes.truncate(limit as usize);
                    Ok(computation)
                },
            )
            .await?;

        let QuoteComputation {
            distance_miles,
            quotes,
        } = computation;
        let quotes = if quotes.is_empty() {
            quotes
        } else {
            self.currency.convert_quotes(quotes, currency).await?
        };

        Ok(CheapestQuotesResponse {
            vehicle_id,
            distance_miles,
            currency,
            quotes,
        })
    }

    /// Buscar vehículos por filtros y cotizarlos. Un vehículo cuyos quotes
    /// quedan todos fuera del rango de precio pedido se excluye de la
    /// página sin reemplazo: una página puede traer menos de `limit`.
    pub async fn search_quotes_for_vehicles(
        &self,
        body: SearchQuotesRequest,
    ) -> AppResult<SearchQuotesResponse> {
        body.validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        let filters = body.filters();
        if !filters.has_any() {
            return Err(AppError::ValidationError(
                "At least one filter is required".to_string(),
            ));
        }
        let currency = Currency::parse(body.currency.as_deref())?;
        let limit = clamp_limit(body.limit);
        let offset = clamp_offset(body.offset);

        let companies = self.load_active_companies().await?;
        let total = self.vehicles.count_by_filters(&filters).await?;

        let filters_key = serde_json::to_string(&filters)
            .map_err(|e| AppError::Internal(format!("Filter serialization failed: {}", e)))?;
        let key_parts = vec![
            "search".to_string(),
            filters_key,
            limit.to_string(),
            offset.to_string(),
        ];
        let vehicles_repo = &self.vehicles;
        let filters_ref = &filters;
        let companies_ref = &companies;
        let computation = self
            .cache
            .with_versioned_cache(
                CACHE_NS_COMPANIES,
                &key_parts,
                self.config.search_cache_ttl,
                || async move {
                    let vehicles = vehicles_repo
                        .search_by_filters(filters_ref, limit, offset)
                        .await?;
                    let mut results = Vec::new();
                    for vehicle in &vehicles {
                        let computation = ShippingQuoteService::compute_quotes_for_vehicle(
                            vehicle,
                            companies_ref,
                        );
                        let mut quotes = filter_price_range(
                            computation.quotes,
                            filters_ref.price_from,
                            filters_ref.price_to,
                        );
                        if quotes.is_empty() {
                            debug!(
                                "🚫 Vehículo {} excluido de la búsqueda: sin quotes en el rango",
                                vehicle.id
                            );
                            continue;
                        }
                        sort_quotes(&mut quotes);
                        results.push(VehicleQuotesEntry::new(
                            vehicle,
                            computation.distance_miles,
                            quotes,
                        ));
                    }
                    Ok(SearchComputation { results })
                },
            )
            .await?;

        let mut results = computation.results;
        if results.iter().any(|entry| !entry.quotes.is_empty()) {
            if let Some(rate) = self.currency.resolve_rate(currency).await? {
                for entry in &mut results {
                    entry.quotes =
                        CurrencyService::apply_rate(std::mem::take(&mut entry.quotes), rate, currency);
                }
            }
        }

        Ok(SearchQuotesResponse {
            results,
            total,
            limit,
            offset,
            total_pages: total_pages(total, limit),
        })
    }

    /// Comparar hasta 5 vehículos, con los N mejores quotes de cada uno
    pub async fn compare_vehicles(
        &self,
        body: CompareVehiclesRequest,
    ) -> AppResult<CompareVehiclesResponse> {
        let ids = dedupe_ids(&body.vehicle_ids);
        validate_compare_count(&ids)?;
        let per_vehicle = body
            .quotes_per_vehicle
            .unwrap_or(DEFAULT_QUOTES_PER_VEHICLE)
            .clamp(1, MAX_QUOTES_PER_VEHICLE);
        let currency = Currency::parse(body.currency.as_deref())?;

        let companies = self.load_active_companies().await?;
        let vehicles = try_join_all(ids.iter().map(|id| self.load_vehicle(*id))).await?;

        let mut entries = Vec::with_capacity(vehicles.len());
        for vehicle in &vehicles {
            let computation =
                ShippingQuoteService::compute_quotes_for_vehicle(vehicle, &companies);
            let mut quotes = computation.quotes;
            sort_quotes(&mut quotes);
            quotes.truncate(per_vehicle as usize);
            entries.push(VehicleQuotesEntry::new(
                vehicle,
                computation.distance_miles,
                quotes,
            ));
        }

        if entries.iter().any(|entry| !entry.quotes.is_empty()) {
            if let Some(rate) = self.currency.resolve_rate(currency).await? {
                for entry in &mut entries {
                    entry.quotes =
                        CurrencyService::apply_rate(std::mem::take(&mut entry.quotes), rate, currency);
                }
            }
        }

        Ok(CompareVehiclesResponse { vehicles: entries })
    }

    /// Quotes persistidos de un vehículo (superficie legacy, paginada)
    pub async fn quotes_by_vehicle(
        &self,
        vehicle_id: i64,
        params: PaginationParams,
    ) -> AppResult<PersistedQuotesResponse> {
        let limit = clamp_limit(params.limit);
        let offset = clamp_offset(params.offset);

        if !self.vehicles.exists_by_id(vehicle_id).await? {
            return Err(not_found_error("Vehicle", vehicle_id));
        }

        let total = self.quotes.count_by_vehicle(vehicle_id).await?;
        let rows = self.quotes.find_by_vehicle(vehicle_id, limit, offset).await?;

        Ok(PersistedQuotesResponse {
            quotes: rows.into_iter().map(Into::into).collect(),
            total,
            limit,
            offset,
            total_pages: total_pages(total, limit),
        })
    }

    /// Quotes persistidos de una empresa (superficie legacy, paginada)
    pub async fn quotes_by_company(
        &self,
        company_id: i64,
        params: PaginationParams,
    ) -> AppResult<PersistedQuotesResponse> {
        let limit = clamp_limit(params.limit);
        let offset = clamp_offset(params.offset);

        if !self.companies.exists_by_id(company_id).await? {
            return Err(not_found_error("Company", company_id));
        }

        let total = self.quotes.count_by_company(company_id).await?;
        let rows = self.quotes.find_by_company(company_id, limit, offset).await?;

        Ok(PersistedQuotesResponse {
            quotes: rows.into_iter().map(Into::into).collect(),
            total,
            limit,
            offset,
            total_pages: total_pages(total, limit),
        })
    }

    /// Shim de compatibilidad: antes persistía un quote, ahora calcula
    /// bajo demanda y devuelve un registro efímero con id = 0
    pub async fn create_quote_admin(
        &self,
        body: CreateQuoteAdminRequest,
    ) -> AppResult<AdminQuoteResponse> {
        warn!("⚠️ create_quote_admin es una ruta de compatibilidad: no persiste resultados");

        let currency = Currency::parse(body.currency.as_deref())?;
        let vehicle = self.load_vehicle(body.vehicle_id).await?;
        let company = self
            .companies
            .find_by_id(body.company_id)
            .await?
            .ok_or_else(|| not_found_error("Company", body.company_id))?;
        if !company.active {
            return Err(AppError::ValidationError(format!(
                "Company '{}' is deactivated",
                company.name
            )));
        }

        let computation = ShippingQuoteService::compute_quotes_for_vehicle(
            &vehicle,
            std::slice::from_ref(&company),
        );
        let quote = computation.quotes.into_iter().next().ok_or_else(|| {
            AppError::ValidationError(format!(
                "Quote could not be computed for company '{}'",
                company.name
            ))
        })?;
        let quote = self
            .currency
            .convert_quotes(vec![quote], currency)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("Empty conversion batch".to_string()))?;

        Ok(AdminQuoteResponse {
            id: 0,
            vehicle_id: vehicle.id,
            company_id: company.id,
            company_name: quote.company_name,
            total_price: quote.total_price,
            currency: quote.currency,
            delivery_time_days: quote.delivery_time_days,
            breakdown: quote.breakdown,
        })
    }

    /// Borrado administrativo de una fila legacy
    pub async fn delete_quote_admin(&self, quote_id: i64) -> AppResult<()> {
        if !self.quotes.delete_by_id(quote_id).await? {
            return Err(not_found_error("Quote", quote_id));
        }
        info!("🗑️ Quote {} eliminado por administración", quote_id);
        Ok(())
    }

    async fn load_vehicle(&self, vehicle_id: i64) -> AppResult<Vehicle> {
        self.vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))
    }

    async fn load_active_companies(&self) -> AppResult<Vec<Company>> {
        let companies = self
            .companies
            .find_all_active(self.config.quote_companies_limit, 0)
            .await?;
        if companies.is_empty() {
            return Err(AppError::ValidationError(
                "No shipping companies configured".to_string(),
            ));
        }
        Ok(companies)
    }
}

/// Ordenar quotes por precio ascendente. El sort es estable: los empates
/// conservan el orden de iteración original de las empresas.
pub(crate) fn sort_quotes(quotes: &mut [Quote]) {
    quotes.sort_by(|a, b| {
        a.total_price
            .partial_cmp(&b.total_price)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Filtrar por rating mínimo antes de paginar; las empresas sin rating
/// cuentan como 0
pub(crate) fn filter_min_rating(quotes: Vec<Quote>, min_rating: Option<f64>) -> Vec<Quote> {
    match min_rating {
        None => quotes,
        Some(min) => quotes
            .into_iter()
            .filter(|q| q.company_rating.unwrap_or(0.0) >= min)
            .collect(),
    }
}

/// Conservar solo los quotes dentro del rango de precio pedido (en USD)
pub(crate) fn filter_price_range(
    quotes: Vec<Quote>,
    price_from: Option<f64>,
    price_to: Option<f64>,
) -> Vec<Quote> {
    quotes
        .into_iter()
        .filter(|q| {
            price_from.map_or(true, |from| q.total_price >= from)
                && price_to.map_or(true, |to| q.total_price <= to)
        })
        .collect()
}

/// Deduplicar ids preservando el orden de llegada
pub(crate) fn dedupe_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Validar el número de vehículos de una comparación
pub(crate) fn validate_compare_count(ids: &[i64]) -> AppResult<()> {
    if ids.is_empty() {
        return Err(AppError::ValidationError(
            "At least one vehicle id is required".to_string(),
        ));
    }
    if ids.len() > MAX_COMPARE_VEHICLES {
        return Err(AppError::ValidationError(format!(
            "A maximum of {} vehicles can be compared",
            MAX_COMPARE_VEHICLES
        )));
    }
    Ok(())
}

/// Unir los precios de la calculadora con las empresas locales para
/// adjuntar metadatos. El total se recalcula como suma de componentes:
/// si el total reportado difiere, manda el desglose.
fn join_calculator_entries(companies: &[Company], entries: &[CalculatorEntry]) -> Vec<Quote> {
    let mut quotes = Vec::new();
    for entry in entries {
        let Some(company) = companies
            .iter()
            .find(|c| company_matches(c, &entry.company_name))
        else {
            debug!(
                "🔍 Precio de calculadora sin empresa local: '{}'",
                entry.company_name
            );
            continue;
        };

        let mut breakdown = QuoteBreakdown {
            shipping_total: entry.shipping_total,
            customs_fee: entry.customs_fee,
            service_fee: entry.service_fee,
            broker_fee: entry.broker_fee,
            insurance_fee: entry.insurance_fee,
            total_price: 0.0,
        };
        breakdown.total_price = breakdown.component_sum();
        if let Some(reported) = entry.total_price {
            if (reported - breakdown.total_price).abs() > 0.01 {
                warn!(
                    "⚠️ Total de calculadora difiere del desglose para '{}': {} vs {}",
                    entry.company_name, reported, breakdown.total_price
                );
            }
        }

        quotes.push(Quote {
            company_id: company.id,
            company_name: company.name.clone(),
            website: company.website.clone(),
            logo_url: company.logo_url.clone(),
            total_price: breakdown.total_price,
            currency: Currency::Usd,
            delivery_time_days: entry.delivery_days.or(company.avg_delivery_days),
            breakdown,
            company_rating: company.rating,
            company_review_count: company.review_count,
        });
    }
    quotes
}

fn company_matches(company: &Company, entry_name: &str) -> bool {
    let normalized = normalize_token(entry_name);
    normalized == normalize_token(&company.name) || normalized == company.slug.replace('-', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(company_id: i64, total: f64, rating: Option<f64>) -> Quote {
        Quote {
            company_id,
            company_name: format!("Company {}", company_id),
            website: None,
            logo_url: None,
            total_price: total,
            currency: Currency::Usd,
            delivery_time_days: None,
            breakdown: QuoteBreakdown {
                shipping_total: total,
                customs_fee: 0.0,
                service_fee: 0.0,
                broker_fee: 0.0,
                insurance_fee: 0.0,
                total_price: total,
            },
            company_rating: rating,
            company_review_count: 0,
        }
    }

    fn company(id: i64, name: &str, slug: &str) -> Company {
        Company {
            id,
            name: name.to_string(),
            slug: slug.to_string(),
            website: Some("https://example.test".to_string()),
            logo_url: None,
            rating: Some(4.2),
            review_count: 9,
            base_price: 500.0,
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
    fn test_dedupe_ids_preserves_order() {
        assert_eq!(dedupe_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert_eq!(dedupe_ids(&[]), Vec::<i64>::new());
    }

    #[test]
    fn test_compare_count_boundaries() {
        assert!(validate_compare_count(&[]).is_err());
        assert!(validate_compare_count(&[1, 2, 3, 4, 5]).is_ok());
        assert!(validate_compare_count(&[1, 2, 3, 4, 5, 6]).is_err());
    }

    #[test]
    fn test_sort_quotes_ascending_and_stable() {
        let mut quotes = vec![
            quote(1, 1500.0, None),
            quote(2, 1200.0, None),
            quote(3, 1200.0, None),
            quote(4, 900.0, None),
        ];
        sort_quotes(&mut quotes);

        let order: Vec<i64> = quotes.iter().map(|q| q.company_id).collect();
        // el empate 2/3 conserva el orden original
        assert_eq!(order, vec![4, 2, 3, 1]);
        for pair in quotes.windows(2) {
            assert!(pair[0].total_price <= pair[1].total_price);
        }
    }

    #[test]
    fn test_filter_min_rating_counts_post_filter() {
        let quotes = vec![
            quote(1, 1000.0, Some(4.5)),
            quote(2, 1100.0, Some(3.0)),
            quote(3, 1200.0, None),
            quote(4, 1300.0, Some(4.0)),
        ];

        let filtered = filter_min_rating(quotes, Some(4.0));
        let ids: Vec<i64> = filtered.iter().map(|q| q.company_id).collect();
        assert_eq!(ids, vec![1, 4]);
        // el total reportado al cliente sale del lote ya filtrado
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filter_price_range() {
        let quotes = vec![
            quote(1, 800.0, None),
            quote(2, 1200.0, None),
            quote(3, 2000.0, None),
        ];

        let filtered = filter_price_range(quotes, Some(1000.0), Some(1500.0));
        let ids: Vec<i64> = filtered.iter().map(|q| q.company_id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_join_calculator_entries_matches_and_enforces_breakdown() {
        let companies = vec![
            company(1, "GeTrans Logistics", "getrans-logistics"),
            company(2, "Caucasus Auto Import", "caucasus-auto-import"),
        ];
        let entries = vec![
            CalculatorEntry {
                company_name: "getrans logistics".to_string(),
                shipping_total: 900.0,
                customs_fee: 200.0,
                service_fee: 100.0,
                broker_fee: 50.0,
                insurance_fee: 0.0,
                // total reportado incoherente: manda el desglose
                total_price: Some(9999.0),
                delivery_days: Some(35),
            },
            CalculatorEntry {
                company_name: "Unknown Carrier".to_string(),
                shipping_total: 500.0,
                customs_fee: 0.0,
                service_fee: 0.0,
                broker_fee: 0.0,
                insurance_fee: 0.0,
                total_price: None,
                delivery_days: None,
            },
        ];

        let quotes = join_calculator_entries(&companies, &entries);

        assert_eq!(quotes.len(), 1);
        let q = &quotes[0];
        assert_eq!(q.company_id, 1);
        assert_eq!(q.total_price, 1250.0);
        assert_eq!(q.breakdown.total_price, 1250.0);
        assert_eq!(q.breakdown.component_sum(), q.total_price);
        assert_eq!(q.delivery_time_days, Some(35));
        assert_eq!(q.company_rating, Some(4.2));
    }
}

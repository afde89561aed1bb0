//! Cliente de la calculadora externa de precios
//!
//! En el diseño de precios en vivo los quotes los calcula un servicio
//! externo. Este módulo normaliza las entradas libres de subasta y ciudad
//! contra listas conocidas, construye el sobre de petición con valores por
//! defecto fijos y llama a la API con timeout y un único reintento con
//! backoff. El resultado es una variante etiquetada: "sin coincidencia"
//! es una salida válida, distinta de coste cero y distinta de un fallo
//! del upstream; ninguna excepción cruza el límite del módulo.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Puerto de destino fijo de la ruta marítima
pub const DEFAULT_DESTINATION_PORT: &str = "poti";

/// Tipo de vehículo enviado por defecto a la calculadora
pub const DEFAULT_VEHICLE_TYPE: &str = "automobile";

/// Categoría por defecto cuando el cliente no la envía
pub const DEFAULT_VEHICLE_CATEGORY: &str = "sedan";

/// Precio de compra de referencia usado por la calculadora
pub const DEFAULT_BUY_PRICE: f64 = 5000.0;

/// Pausa antes del único reintento
const RETRY_BACKOFF_MS: u64 = 500;

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9 ]+").unwrap();

    static ref KNOWN_AUCTIONS: Vec<&'static str> = vec!["copart", "iaai"];

    static ref AUCTION_ALIASES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("iaa", "iaai");
        m.insert("insurance auto auctions", "iaai");
        m.insert("copart usa", "copart");
        m
    };

    /// Ciudades que la calculadora acepta como origen
    static ref KNOWN_CITIES: Vec<&'static str> = vec![
        "atlanta",
        "savannah",
        "charlotte",
        "nashville",
        "orlando",
        "tampa",
        "miami",
        "jacksonville",
        "baltimore",
        "philadelphia",
        "newark",
        "boston",
        "chicago",
        "detroit",
        "indianapolis",
        "columbus",
        "dallas",
        "houston",
        "san antonio",
        "oklahoma city",
        "kansas city",
        "minneapolis",
        "denver",
        "phoenix",
        "las vegas",
        "los angeles",
        "san francisco",
        "portland",
        "seattle",
    ];

    static ref CITY_ALIASES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("la", "los angeles");
        m.insert("nyc", "newark");
        m.insert("philly", "philadelphia");
        m.insert("sf", "san francisco");
        m.insert("kc", "kansas city");
        m.insert("okc", "oklahoma city");
        m
    };
}

/// Normalizar un token libre: minúsculas, sin signos, espacios simples
pub fn normalize_token(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let cleaned = NON_ALNUM.replace_all(&lowered, " ");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalizar la casa de subastas; None si no se reconoce
pub fn normalize_auction(raw: &str) -> Option<String> {
    let token = normalize_token(raw);
    if token.is_empty() {
        return None;
    }
    if KNOWN_AUCTIONS.contains(&token.as_str()) {
        return Some(token);
    }
    AUCTION_ALIASES.get(token.as_str()).map(|s| s.to_string())
}

/// Canonicalizar la ciudad de origen; None si no se reconoce o la
/// coincidencia parcial es ambigua
pub fn normalize_city(raw: &str) -> Option<String> {
    let token = normalize_token(raw);
    if token.is_empty() {
        return None;
    }
    if KNOWN_CITIES.contains(&token.as_str()) {
        return Some(token);
    }
    if let Some(canonical) = CITY_ALIASES.get(token.as_str()) {
        return Some(canonical.to_string());
    }
    // coincidencia parcial solo si es única ("atlanta ga" → "atlanta")
    let candidates: Vec<&&str> = KNOWN_CITIES
        .iter()
        .filter(|city| token.contains(**city))
        .collect();
    match candidates.as_slice() {
        [single] => Some(single.to_string()),
        _ => None,
    }
}

/// Sobre de petición normalizado que entiende la calculadora
#[derive(Debug, Clone, Serialize)]
pub struct CalculatorRequest {
    pub auction: String,
    pub usacity: String,
    pub vehicletype: String,
    pub vehiclecategory: String,
    pub destinationport: String,
    pub buyprice: f64,
}

/// Entrada de precio por empresa devuelta por la calculadora
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorEntry {
    pub company_name: String,
    #[serde(default)]
    pub shipping_total: f64,
    #[serde(default)]
    pub customs_fee: f64,
    #[serde(default)]
    pub service_fee: f64,
    #[serde(default)]
    pub broker_fee: f64,
    #[serde(default)]
    pub insurance_fee: f64,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub delivery_days: Option<i32>,
}

/// Entradas que no pudieron canonicalizarse
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculatorNoMatch {
    pub unmatched_auction: Option<String>,
    pub unmatched_city: Option<String>,
}

/// Resultado etiquetado de la calculadora
#[derive(Debug, Clone)]
pub enum CalculatorOutcome {
    Priced(Vec<CalculatorEntry>),
    NoMatch(CalculatorNoMatch),
    Unavailable(String),
}

#[derive(Debug, Deserialize)]
struct CalculatorResponse {
    #[serde(default)]
    results: Vec<CalculatorEntry>,
}

#[derive(Clone)]
pub struct CalculatorClient {
    client: reqwest::Client,
    api_url: String,
    timeout: Duration,
}

impl CalculatorClient {
    pub fn new(client: reqwest::Client, api_url: String, timeout_secs: u64) -> Self {
        Self {
            client,
            api_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Construir el sobre de petición a partir de las entradas libres del
    /// cliente. Devuelve las entradas no reconocidas en lugar de fallar.
    pub fn normalize_request(
        auction: &str,
        usacity: &str,
        vehiclecategory: Option<&str>,
    ) -> Result<CalculatorRequest, CalculatorNoMatch> {
        let normalized_auction = normalize_auction(auction);
        let normalized_city = normalize_city(usacity);

        match (normalized_auction, normalized_city) {
            (Some(auction), Some(usacity)) => Ok(CalculatorRequest {
                auction,
                usacity,
                vehicletype: DEFAULT_VEHICLE_TYPE.to_string(),
                vehiclecategory: vehiclecategory
                    .map(normalize_token)
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| DEFAULT_VEHICLE_CATEGORY.to_string()),
                destinationport: DEFAULT_DESTINATION_PORT.to_string(),
                buyprice: DEFAULT_BUY_PRICE,
            }),
            (auction_match, city_match) => Err(CalculatorNoMatch {
                unmatched_auction: auction_match
                    .is_none()
                    .then(|| auction.trim().to_string()),
                unmatched_city: city_match.is_none().then(|| usacity.trim().to_string()),
            }),
        }
    }

    /// Pedir precios en vivo. Un fallo transitorio se reintenta una sola
    /// vez con backoff; un segundo fallo se reporta como Unavailable.
    pub async fn fetch_quotes(&self, request: &CalculatorRequest) -> CalculatorOutcome {
        log::info!(
            "🧮 Consultando calculadora: {} / {} ({})",
            request.auction,
            request.usacity,
            request.vehiclecategory
        );

        let mut last_error = String::new();
        for attempt in 0..2u8 {
            if attempt > 0 {
                log::warn!("🔁 Reintentando calculadora tras fallo: {}", last_error);
                tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS)).await;
            }

            match self.try_fetch(request).await {
                Ok(entries) if entries.is_empty() => {
                    // entrada válida pero sin resultados para esta ruta
                    log::info!(
                        "🔎 Calculadora sin resultados para {} / {}",
                        request.auction,
                        request.usacity
                    );
                    return CalculatorOutcome::NoMatch(CalculatorNoMatch::default());
                }
                Ok(entries) => {
                    log::info!("✅ Calculadora devolvió {} precios", entries.len());
                    return CalculatorOutcome::Priced(entries);
                }
                Err(e) => last_error = e,
            }
        }

        log::error!("❌ Calculadora no disponible: {}", last_error);
        CalculatorOutcome::Unavailable(last_error)
    }

    async fn try_fetch(&self, request: &CalculatorRequest) -> Result<Vec<CalculatorEntry>, String> {
        let response = self
            .client
            .post(&self.api_url)
            .json(request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("calculator responded with status {}", status));
        }

        let body: CalculatorResponse = response.json().await.map_err(|e| e.to_string())?;
        Ok(body.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_auction() {
        assert_eq!(normalize_auction("Copart").as_deref(), Some("copart"));
        assert_eq!(normalize_auction(" IAA ").as_deref(), Some("iaai"));
        assert_eq!(normalize_auction("manheim"), None);
        assert_eq!(normalize_auction(""), None);
    }

    #[test]
    fn test_normalize_city_exact_and_alias() {
        assert_eq!(normalize_city("Atlanta").as_deref(), Some("atlanta"));
        assert_eq!(normalize_city("Philly").as_deref(), Some("philadelphia"));
        assert_eq!(normalize_city("Los Angeles, CA").as_deref(), Some("los angeles"));
    }

    #[test]
    fn test_normalize_city_unknown() {
        assert_eq!(normalize_city("Springfield"), None);
        assert_eq!(normalize_city("??"), None);
    }

    #[test]
    fn test_normalize_request_defaults() {
        let request =
            CalculatorClient::normalize_request("copart", "Atlanta, GA", None).unwrap();

        assert_eq!(request.auction, "copart");
        assert_eq!(request.usacity, "atlanta");
        assert_eq!(request.vehicletype, DEFAULT_VEHICLE_TYPE);
        assert_eq!(request.vehiclecategory, DEFAULT_VEHICLE_CATEGORY);
        assert_eq!(request.destinationport, DEFAULT_DESTINATION_PORT);
        assert_eq!(request.buyprice, DEFAULT_BUY_PRICE);
    }

    #[test]
    fn test_normalize_request_reports_unmatched_city() {
        let err = CalculatorClient::normalize_request("copart", "Springfield", None)
            .unwrap_err();

        assert_eq!(err.unmatched_auction, None);
        assert_eq!(err.unmatched_city.as_deref(), Some("Springfield"));
    }

    #[test]
    fn test_normalize_request_reports_unmatched_auction() {
        let err = CalculatorClient::normalize_request("manheim", "Atlanta", None)
            .unwrap_err();

        assert_eq!(err.unmatched_auction.as_deref(), Some("manheim"));
        assert_eq!(err.unmatched_city, None);
    }
}

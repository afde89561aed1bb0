//! Resolución de distancias
//!
//! Mapea el nombre del patio de subasta de un vehículo a una distancia
//! fija en millas hasta el puerto de salida. Es una tabla de
//! configuración, no un cálculo geográfico: un patio desconocido cae en
//! la distancia por defecto y se registra, nunca es un error.

use lazy_static::lazy_static;
use std::collections::HashMap;
use tracing::warn;

/// Distancia aplicada cuando el patio no figura en la tabla
pub const DEFAULT_DISTANCE_MILES: f64 = 1000.0;

lazy_static! {
    /// Millas de transporte terrestre desde la ciudad del patio hasta el
    /// puerto de salida asignado por la red de transportistas
    static ref YARD_DISTANCES: HashMap<&'static str, f64> = {
        let mut m = HashMap::new();
        m.insert("atlanta", 800.0);
        m.insert("savannah", 150.0);
        m.insert("charlotte", 550.0);
        m.insert("nashville", 850.0);
        m.insert("orlando", 950.0);
        m.insert("tampa", 1000.0);
        m.insert("miami", 1100.0);
        m.insert("jacksonville", 700.0);
        m.insert("baltimore", 60.0);
        m.insert("philadelphia", 120.0);
        m.insert("newark", 150.0);
        m.insert("boston", 350.0);
        m.insert("chicago", 900.0);
        m.insert("detroit", 750.0);
        m.insert("indianapolis", 820.0);
        m.insert("columbus", 680.0);
        m.insert("dallas", 1100.0);
        m.insert("houston", 1050.0);
        m.insert("san antonio", 1250.0);
        m.insert("oklahoma city", 1350.0);
        m.insert("kansas city", 1250.0);
        m.insert("minneapolis", 1300.0);
        m.insert("denver", 1800.0);
        m.insert("phoenix", 2400.0);
        m.insert("las vegas", 2550.0);
        m.insert("los angeles", 2800.0);
        m.insert("san francisco", 2900.0);
        m.insert("portland", 2950.0);
        m.insert("seattle", 3000.0);
        m
    };
}

pub struct DistanceResolver;

impl DistanceResolver {
    /// Resolver la distancia en millas para un nombre de patio.
    /// Función total: siempre devuelve un valor.
    pub fn resolve(yard_name: &str) -> f64 {
        let normalized = normalize_yard(yard_name);

        if normalized.is_empty() {
            warn!("⚠️ Vehículo sin patio de origen, usando distancia por defecto");
            return DEFAULT_DISTANCE_MILES;
        }

        if let Some(miles) = YARD_DISTANCES.get(normalized.as_str()) {
            return *miles;
        }

        // Los patios de subasta llevan prefijos y sufijos propios
        // ("GA - ATLANTA EAST", "Atlanta, GA"): buscar la ciudad contenida
        for (city, miles) in YARD_DISTANCES.iter() {
            if normalized.contains(city) {
                return *miles;
            }
        }

        warn!(
            "⚠️ Patio desconocido '{}', usando distancia por defecto {} mi",
            yard_name, DEFAULT_DISTANCE_MILES
        );
        DEFAULT_DISTANCE_MILES
    }
}

/// Normalizar el nombre del patio: minúsculas, solo alfanuméricos y
/// espacios simples
fn normalize_yard(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_yard() {
        assert_eq!(DistanceResolver::resolve("Atlanta, GA"), 800.0);
        assert_eq!(DistanceResolver::resolve("atlanta"), 800.0);
    }

    #[test]
    fn test_resolve_auction_style_yard_names() {
        assert_eq!(DistanceResolver::resolve("GA - ATLANTA EAST"), 800.0);
        assert_eq!(DistanceResolver::resolve("Los Angeles (CA)"), 2800.0);
    }

    #[test]
    fn test_resolve_unknown_yard_falls_back() {
        assert_eq!(
            DistanceResolver::resolve("Tbilisi Central"),
            DEFAULT_DISTANCE_MILES
        );
        assert_eq!(DistanceResolver::resolve(""), DEFAULT_DISTANCE_MILES);
    }

    #[test]
    fn test_normalize_yard() {
        assert_eq!(normalize_yard("  Atlanta,   GA "), "atlanta ga");
        assert_eq!(normalize_yard("GA-ATLANTA*EAST"), "ga atlanta east");
    }
}

//! Servicios
//!
//! Este módulo contiene la lógica de negocio del subsistema de
//! cotización: distancia, fórmula de precios, calculadora externa,
//! conversión de moneda y orquestación por vehículo.

pub mod calculator_service;
pub mod currency_service;
pub mod distance_service;
pub mod pricing_service;
pub mod quote_service;

//! Repositorios
//!
//! Este módulo contiene el acceso a datos sobre sqlx.

pub mod company_repository;
pub mod quote_repository;
pub mod vehicle_repository;

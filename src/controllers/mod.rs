//! Controladores
//!
//! Este módulo contiene la capa de orquestación entre rutas y servicios.

pub mod quote_controller;

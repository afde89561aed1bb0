//! Cache
//!
//! Este módulo contiene el cliente Redis y el cache versionado por
//! contador de generación.

pub mod cache_config;
pub mod redis_client;
pub mod versioned_cache;

pub use cache_config::CacheConfig;

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};

/// Operaciones básicas de cache
#[async_trait::async_trait]
pub trait CacheOperations {
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>>;
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T, ttl: u64) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
    async fn exists(&self, key: &str) -> Result<bool>;
}

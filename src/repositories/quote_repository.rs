//! Repositorio de quotes persistidos (superficie legacy)
//!
//! Las filas existentes se conservan para lectura y borrado
//! administrativo; el diseño actual no escribe filas nuevas.

use sqlx::PgPool;

use crate::models::quote::QuoteRecord;
use crate::utils::errors::AppError;

pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_vehicle(
        &self,
        vehicle_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QuoteRecord>, AppError> {
        let quotes = sqlx::query_as::<_, QuoteRecord>(
            "SELECT * FROM quotes WHERE vehicle_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(vehicle_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error listing vehicle quotes: {}", e)))?;

        Ok(quotes)
    }

    pub async fn count_by_vehicle(&self, vehicle_id: i64) -> Result<i64, AppError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM quotes WHERE vehicle_id = $1")
            .bind(vehicle_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Error counting vehicle quotes: {}", e))
            })?;

        Ok(row.0)
    }

    pub async fn find_by_company(
        &self,
        company_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QuoteRecord>, AppError> {
        let quotes = sqlx::query_as::<_, QuoteRecord>(
            "SELECT * FROM quotes WHERE company_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(company_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error listing company quotes: {}", e)))?;

        Ok(quotes)
    }

    pub async fn count_by_company(&self, company_id: i64) -> Result<i64, AppError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM quotes WHERE company_id = $1")
            .bind(company_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Error counting company quotes: {}", e))
            })?;

        Ok(row.0)
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error deleting quote: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

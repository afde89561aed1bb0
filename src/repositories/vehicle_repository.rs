use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::vehicle::{Vehicle, VehicleFilters};
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error finding vehicle: {}", e)))?;

        Ok(vehicle)
    }

    pub async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Error checking vehicle: {}", e))
                })?;

        Ok(result.0)
    }

    pub async fn count_by_filters(&self, filters: &VehicleFilters) -> Result<i64, AppError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM vehicles WHERE 1=1");
        push_filters(&mut builder, filters);

        let row: (i64,) = builder
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error counting vehicles: {}", e)))?;

        Ok(row.0)
    }

    pub async fn search_by_filters(
        &self,
        filters: &VehicleFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Vehicle>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM vehicles WHERE 1=1");
        push_filters(&mut builder, filters);
        builder.push(" ORDER BY id ASC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let vehicles = builder
            .build_query_as::<Vehicle>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error searching vehicles: {}", e)))?;

        Ok(vehicles)
    }
}

/// Componer las condiciones SQL de los filtros de vehículo.
/// Los rangos de precio no son columnas: se aplican sobre los quotes.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &VehicleFilters) {
    if let Some(make) = &filters.make {
        builder.push(" AND make ILIKE ");
        builder.push_bind(make.clone());
    }
    if let Some(model) = &filters.model {
        builder.push(" AND model ILIKE ");
        builder.push_bind(model.clone());
    }
    if let Some(year_from) = filters.year_from {
        builder.push(" AND year >= ");
        builder.push_bind(year_from);
    }
    if let Some(year_to) = filters.year_to {
        builder.push(" AND year <= ");
        builder.push_bind(year_to);
    }
    if let Some(mileage_from) = filters.mileage_from {
        builder.push(" AND mileage >= ");
        builder.push_bind(mileage_from);
    }
    if let Some(mileage_to) = filters.mileage_to {
        builder.push(" AND mileage <= ");
        builder.push_bind(mileage_to);
    }
    if let Some(fuel_type) = &filters.fuel_type {
        builder.push(" AND fuel_type ILIKE ");
        builder.push_bind(fuel_type.clone());
    }
    if let Some(category) = &filters.category {
        builder.push(" AND category ILIKE ");
        builder.push_bind(category.clone());
    }
    if let Some(drive) = &filters.drive {
        builder.push(" AND drive ILIKE ");
        builder.push_bind(drive.clone());
    }
}

// src/db/location_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{Document, DocumentStore, unique_violation_as},
    models::location::{Location, LocationFilter},
};

const FILTER: &str = "($1::uuid IS NULL OR seller_id = $1)
      AND ($2::uuid IS NULL OR product_id = $2)
      AND ($3::bool IS NULL OR is_active = $3)";

#[derive(Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore<Location> for LocationRepository {
    async fn insert(&self, location: &Location) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO locations (
                id, seller_id, product_id, name, description, zone, section, aisle, shelf,
                position_x, position_y, is_active, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(location.id)
        .bind(location.seller_id)
        .bind(location.product_id)
        .bind(&location.name)
        .bind(&location.description)
        .bind(&location.zone)
        .bind(&location.section)
        .bind(location.aisle.as_deref())
        .bind(location.shelf.as_deref())
        .bind(location.position.x)
        .bind(location.position.y)
        .bind(location.is_active)
        .bind(location.notes.as_deref())
        .bind(location.created_at)
        .bind(location.updated_at)
        .execute(&self.pool)
        .await
        .map_err(unique_violation_as(Location::CONFLICT_MESSAGE))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, AppError> {
        let location = sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(location)
    }

    async fn exists_for_seller(
        &self,
        seller_id: Uuid,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM locations
                WHERE seller_id = $1 AND name = $2 AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(seller_id)
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn list_page(
        &self,
        filter: &LocationFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Location>, AppError> {
        let sql = format!(
            "SELECT * FROM locations WHERE {FILTER} ORDER BY created_at DESC, id LIMIT $4 OFFSET $5"
        );
        let locations = sqlx::query_as::<_, Location>(&sql)
            .bind(filter.seller_id)
            .bind(filter.product_id)
            .bind(filter.is_active)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(locations)
    }

    async fn count(&self, filter: &LocationFilter) -> Result<u64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM locations WHERE {FILTER}");
        let total: i64 = sqlx::query_scalar(&sql)
            .bind(filter.seller_id)
            .bind(filter.product_id)
            .bind(filter.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(total as u64)
    }

    async fn list_all(&self, filter: &LocationFilter) -> Result<Vec<Location>, AppError> {
        let sql = format!("SELECT * FROM locations WHERE {FILTER} ORDER BY created_at DESC, id");
        let locations = sqlx::query_as::<_, Location>(&sql)
            .bind(filter.seller_id)
            .bind(filter.product_id)
            .bind(filter.is_active)
            .fetch_all(&self.pool)
            .await?;
        Ok(locations)
    }

    async fn update(&self, location: &Location) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE locations SET
                product_id = $2, name = $3, description = $4, zone = $5, section = $6,
                aisle = $7, shelf = $8, position_x = $9, position_y = $10,
                is_active = $11, notes = $12, updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(location.id)
        .bind(location.product_id)
        .bind(&location.name)
        .bind(&location.description)
        .bind(&location.zone)
        .bind(&location.section)
        .bind(location.aisle.as_deref())
        .bind(location.shelf.as_deref())
        .bind(location.position.x)
        .bind(location.position.y)
        .bind(location.is_active)
        .bind(location.notes.as_deref())
        .bind(location.updated_at)
        .execute(&self.pool)
        .await
        .map_err(unique_violation_as(Location::CONFLICT_MESSAGE))?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

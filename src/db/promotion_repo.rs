// src/db/promotion_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{Document, DocumentStore, unique_violation_as},
    models::promotion::{Promotion, PromotionFilter},
};

const FILTER: &str = "($1::uuid IS NULL OR seller_id = $1)
      AND ($2::uuid IS NULL OR product_id = $2)
      AND ($3::bool IS NULL OR is_active = $3)";

#[derive(Clone)]
pub struct PromotionRepository {
    pool: PgPool,
}

impl PromotionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore<Promotion> for PromotionRepository {
    async fn insert(&self, promotion: &Promotion) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO promotions (
                id, seller_id, product_id, title, description, message,
                discount_type, discount_value, start_date, end_date, is_active,
                current_uses, max_uses, conditions, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(promotion.id)
        .bind(promotion.seller_id)
        .bind(promotion.product_id)
        .bind(&promotion.title)
        .bind(&promotion.description)
        .bind(&promotion.message)
        .bind(promotion.discount_type)
        .bind(promotion.discount_value)
        .bind(promotion.start_date)
        .bind(promotion.end_date)
        .bind(promotion.is_active)
        .bind(promotion.current_uses)
        .bind(promotion.max_uses)
        .bind(promotion.conditions.as_deref())
        .bind(promotion.created_at)
        .bind(promotion.updated_at)
        .execute(&self.pool)
        .await
        .map_err(unique_violation_as(Promotion::CONFLICT_MESSAGE))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Promotion>, AppError> {
        let promotion = sqlx::query_as::<_, Promotion>("SELECT * FROM promotions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(promotion)
    }

    async fn exists_for_seller(
        &self,
        seller_id: Uuid,
        title: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM promotions
                WHERE seller_id = $1 AND title = $2 AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(seller_id)
        .bind(title)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn list_page(
        &self,
        filter: &PromotionFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Promotion>, AppError> {
        let sql = format!(
            "SELECT * FROM promotions WHERE {FILTER} ORDER BY created_at DESC, id LIMIT $4 OFFSET $5"
        );
        let promotions = sqlx::query_as::<_, Promotion>(&sql)
            .bind(filter.seller_id)
            .bind(filter.product_id)
            .bind(filter.is_active)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(promotions)
    }

    async fn count(&self, filter: &PromotionFilter) -> Result<u64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM promotions WHERE {FILTER}");
        let total: i64 = sqlx::query_scalar(&sql)
            .bind(filter.seller_id)
            .bind(filter.product_id)
            .bind(filter.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(total as u64)
    }

    async fn list_all(&self, filter: &PromotionFilter) -> Result<Vec<Promotion>, AppError> {
        let sql = format!("SELECT * FROM promotions WHERE {FILTER} ORDER BY created_at DESC, id");
        let promotions = sqlx::query_as::<_, Promotion>(&sql)
            .bind(filter.seller_id)
            .bind(filter.product_id)
            .bind(filter.is_active)
            .fetch_all(&self.pool)
            .await?;
        Ok(promotions)
    }

    async fn update(&self, promotion: &Promotion) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE promotions SET
                product_id = $2, title = $3, description = $4, message = $5,
                discount_type = $6, discount_value = $7, start_date = $8, end_date = $9,
                is_active = $10, current_uses = $11, max_uses = $12, conditions = $13,
                updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(promotion.id)
        .bind(promotion.product_id)
        .bind(&promotion.title)
        .bind(&promotion.description)
        .bind(&promotion.message)
        .bind(promotion.discount_type)
        .bind(promotion.discount_value)
        .bind(promotion.start_date)
        .bind(promotion.end_date)
        .bind(promotion.is_active)
        .bind(promotion.current_uses)
        .bind(promotion.max_uses)
        .bind(promotion.conditions.as_deref())
        .bind(promotion.updated_at)
        .execute(&self.pool)
        .await
        .map_err(unique_violation_as(Promotion::CONFLICT_MESSAGE))?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM promotions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

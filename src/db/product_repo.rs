// src/db/product_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{Document, DocumentStore, unique_violation_as},
    models::product::{Product, ProductFilter},
};

// Filtros opcionais: um `NULL` no parâmetro desliga a condição.
const FILTER: &str = "($1::uuid IS NULL OR seller_id = $1)
      AND ($2::text IS NULL OR category = $2)
      AND ($3::bool IS NULL OR is_active = $3)";

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore<Product> for ProductRepository {
    async fn insert(&self, product: &Product) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, seller_id, name, description, price, quantity,
                sku, category, stock_alert, is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(product.id)
        .bind(product.seller_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.quantity)
        .bind(&product.sku)
        .bind(&product.category)
        .bind(product.stock_alert)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(unique_violation_as(Product::CONFLICT_MESSAGE))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn exists_for_seller(
        &self,
        seller_id: Uuid,
        sku: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM products
                WHERE seller_id = $1 AND sku = $2 AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(seller_id)
        .bind(sku)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn list_page(
        &self,
        filter: &ProductFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Product>, AppError> {
        let sql = format!(
            "SELECT * FROM products WHERE {FILTER} ORDER BY created_at DESC, id LIMIT $4 OFFSET $5"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(filter.seller_id)
            .bind(filter.category.as_deref())
            .bind(filter.is_active)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn count(&self, filter: &ProductFilter) -> Result<u64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM products WHERE {FILTER}");
        let total: i64 = sqlx::query_scalar(&sql)
            .bind(filter.seller_id)
            .bind(filter.category.as_deref())
            .bind(filter.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(total as u64)
    }

    async fn list_all(&self, filter: &ProductFilter) -> Result<Vec<Product>, AppError> {
        let sql = format!("SELECT * FROM products WHERE {FILTER} ORDER BY created_at DESC, id");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(filter.seller_id)
            .bind(filter.category.as_deref())
            .bind(filter.is_active)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn update(&self, product: &Product) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE products SET
                name = $2, description = $3, price = $4, quantity = $5, sku = $6,
                category = $7, stock_alert = $8, is_active = $9, updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.quantity)
        .bind(&product.sku)
        .bind(&product.category)
        .bind(product.stock_alert)
        .bind(product.is_active)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(unique_violation_as(Product::CONFLICT_MESSAGE))?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

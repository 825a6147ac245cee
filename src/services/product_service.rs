// src/services/product_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        ownership::{ensure_owned, parse_id},
        pagination::{PageParams, Pagination, matches_search, parse_bool_flag},
    },
    db::{Document, ProductStore},
    models::product::{
        CreateProductPayload, DeletedProduct, Product, ProductCountQuery, ProductFilter,
        ProductList, ProductListQuery, ProductStatisticsResponse, UpdateProductPayload,
    },
    services::statistics::product_statistics,
};

pub const NO_FIELDS_TO_UPDATE: &str = "No valid fields provided for update";

#[derive(Clone)]
pub struct ProductService {
    products: ProductStore,
}

impl ProductService {
    pub fn new(products: ProductStore) -> Self {
        Self { products }
    }

    /// Busca por id e confere o dono. Usado também por locais e promoções.
    pub async fn find_owned(&self, seller_id: Uuid, raw_id: &str) -> Result<Product, AppError> {
        let id = parse_id(raw_id, Product::NOT_FOUND_MESSAGE)?;
        let found = self.products.find_by_id(id).await?;
        ensure_owned(found, seller_id)
    }

    /// Produto referenciado por um local ou promoção: precisa existir e ser do mesmo vendedor.
    pub async fn require_reference(&self, seller_id: Uuid, product_id: Uuid) -> Result<Product, AppError> {
        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(Product::NOT_FOUND_MESSAGE.into()))?;
        if product.seller_id != seller_id {
            tracing::warn!(%seller_id, %product_id, "Produto referenciado é de outro vendedor");
            return Err(AppError::Forbidden("Product does not belong to this user".into()));
        }
        Ok(product)
    }

    // --- CREATE ---
    pub async fn create(
        &self,
        seller_id: Uuid,
        payload: CreateProductPayload,
    ) -> Result<Product, AppError> {
        if self.products.exists_for_seller(seller_id, &payload.sku, None).await? {
            tracing::warn!(%seller_id, sku = %payload.sku, "SKU já existe para o vendedor");
            return Err(AppError::Conflict(Product::CONFLICT_MESSAGE.into()));
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            seller_id,
            name: payload.name,
            description: payload.description,
            price: payload.price,
            quantity: payload.quantity,
            sku: payload.sku,
            category: payload.category,
            stock_alert: payload.stock_alert,
            is_active: payload.is_active,
            created_at: now,
            updated_at: now,
        };

        // O UNIQUE do store cobre a corrida entre a consulta e a escrita
        self.products.insert(&product).await?;
        tracing::info!(%seller_id, product_id = %product.id, sku = %product.sku, "Produto criado");
        Ok(product)
    }

    // --- LIST ---
    pub async fn list(
        &self,
        seller_id: Uuid,
        query: &ProductListQuery,
    ) -> Result<ProductList, AppError> {
        let params = PageParams::parse(query.page.as_deref(), query.limit.as_deref())?;
        let filter = ProductFilter {
            seller_id: Some(seller_id),
            category: query.category.clone().filter(|c| !c.is_empty()),
            is_active: parse_bool_flag(query.is_active.as_deref())?,
        };

        let total = self.products.count(&filter).await?;
        let mut products = self
            .products
            .list_page(&filter, params.offset(), params.limit)
            .await?;

        // A busca textual só estreita a página carregada
        if let Some(needle) = query.search.as_deref().filter(|s| !s.is_empty()) {
            products.retain(|p| {
                matches_search(
                    needle,
                    &[Some(p.name.as_str()), Some(p.description.as_str()), Some(p.sku.as_str())],
                )
            });
        }

        Ok(ProductList { products, pagination: Pagination::new(params, total) })
    }

    // --- READ ---
    pub async fn get(&self, seller_id: Uuid, raw_id: &str) -> Result<Product, AppError> {
        self.find_owned(seller_id, raw_id).await
    }

    // --- UPDATE ---
    pub async fn update(
        &self,
        seller_id: Uuid,
        raw_id: &str,
        changes: UpdateProductPayload,
    ) -> Result<Product, AppError> {
        if changes.is_empty() {
            return Err(AppError::BadRequest(NO_FIELDS_TO_UPDATE.into()));
        }

        let mut product = self.find_owned(seller_id, raw_id).await?;

        if let Some(sku) = changes.sku.as_deref().filter(|sku| *sku != product.sku) {
            if self.products.exists_for_seller(seller_id, sku, Some(product.id)).await? {
                tracing::warn!(%seller_id, %sku, "SKU já existe para o vendedor");
                return Err(AppError::Conflict(Product::CONFLICT_MESSAGE.into()));
            }
        }

        product.apply(changes);
        product.updated_at = Utc::now();
        self.products.update(&product).await?;

        tracing::info!(%seller_id, product_id = %product.id, "Produto atualizado");
        Ok(product)
    }

    // --- DELETE ---
    pub async fn delete(&self, seller_id: Uuid, raw_id: &str) -> Result<DeletedProduct, AppError> {
        let product = self.find_owned(seller_id, raw_id).await?;
        self.products.delete(product.id).await?;

        tracing::info!(%seller_id, product_id = %product.id, "Produto removido");
        Ok(DeletedProduct {
            id: product.id,
            name: product.name,
            sku: product.sku,
            category: product.category,
        })
    }

    // --- STATISTICS ---
    pub async fn statistics(
        &self,
        seller_id: Uuid,
        query: ProductCountQuery,
    ) -> Result<ProductStatisticsResponse, AppError> {
        let filter = ProductFilter {
            seller_id: Some(seller_id),
            category: query.category.clone().filter(|c| !c.is_empty()),
            is_active: parse_bool_flag(query.is_active.as_deref())?,
        };
        let low_stock_only = parse_bool_flag(query.low_stock.as_deref())?.unwrap_or(false);

        let products = self.products.list_all(&filter).await?;
        let statistics = product_statistics(&products, low_stock_only);

        tracing::info!(
            %seller_id,
            total = statistics.total,
            low_stock = statistics.low_stock,
            "Estatísticas de produtos calculadas"
        );
        Ok(ProductStatisticsResponse { statistics, query })
    }

    /// Produtos ativos de um vendedor (vitrine pública).
    pub async fn active_for_seller(&self, seller_id: Uuid) -> Result<Vec<Product>, AppError> {
        let filter = ProductFilter {
            seller_id: Some(seller_id),
            is_active: Some(true),
            ..Default::default()
        };
        self.products.list_all(&filter).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        self.products.find_by_id(id).await
    }

    pub async fn count_for_seller(&self, seller_id: Uuid) -> Result<u64, AppError> {
        let filter = ProductFilter { seller_id: Some(seller_id), ..Default::default() };
        self.products.count(&filter).await
    }
}

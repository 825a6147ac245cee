// src/models/product.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::pagination::Pagination;

pub const DEFAULT_STOCK_ALERT: i64 = 10;
/// Teto de quantidade e de alerta de estoque.
pub const MAX_QUANTITY: i64 = 1_000_000_000;
// Maior valor que cabe em NUMERIC(12, 2)
const MAX_PRICE: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2); // 9_999_999_999.99

// --- Produto (catálogo do vendedor) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: i64,
    pub sku: String,
    pub category: String,
    pub stock_alert: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Limite efetivo: 0 (não configurado) cai no padrão de 10.
    pub fn effective_stock_alert(&self) -> i64 {
        if self.stock_alert == 0 { DEFAULT_STOCK_ALERT } else { self.stock_alert }
    }

    /// Estoque baixo: quantidade <= limite de alerta.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.effective_stock_alert()
    }

    pub fn apply(&mut self, changes: UpdateProductPayload) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(sku) = changes.sku {
            self.sku = sku;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(stock_alert) = changes.stock_alert {
            self.stock_alert = stock_alert;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
    }
}

// Filtros de igualdade aplicados no próprio store
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub seller_id: Option<Uuid>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

pub(crate) fn validate_price(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("Price must be positive".into());
        return Err(err);
    }
    if *val > MAX_PRICE {
        let mut err = ValidationError::new("range");
        err.add_param("max".into(), &MAX_PRICE.to_string());
        err.message = Some("Price must be at most 9999999999.99".into());
        return Err(err);
    }
    Ok(())
}

fn default_stock_alert() -> i64 {
    DEFAULT_STOCK_ALERT
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, max = 100, message = "Product name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 500, message = "Description must be between 1 and 500 characters"))]
    pub description: String,

    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = f64)]
    pub price: Decimal,

    #[validate(range(min = 0, max = MAX_QUANTITY, message = "Quantity must be between 0 and 1000000000"))]
    pub quantity: i64,

    #[validate(length(min = 1, max = 50, message = "SKU must be between 1 and 50 characters"))]
    pub sku: String,

    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: String,

    #[validate(range(min = 0, max = MAX_QUANTITY, message = "Stock alert must be between 0 and 1000000000"))]
    #[serde(default = "default_stock_alert")]
    pub stock_alert: i64,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

// Todos os campos opcionais: atualização parcial
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, max = 100, message = "Product name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 500, message = "Description must be between 1 and 500 characters"))]
    pub description: Option<String>,

    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,

    #[validate(range(min = 0, max = MAX_QUANTITY, message = "Quantity must be between 0 and 1000000000"))]
    pub quantity: Option<i64>,

    #[validate(length(min = 1, max = 50, message = "SKU must be between 1 and 50 characters"))]
    pub sku: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: Option<String>,

    #[validate(range(min = 0, max = MAX_QUANTITY, message = "Stock alert must be between 0 and 1000000000"))]
    pub stock_alert: Option<i64>,

    pub is_active: Option<bool>,
}

impl UpdateProductPayload {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.sku.is_none()
            && self.category.is_none()
            && self.stock_alert.is_none()
            && self.is_active.is_none()
    }

    // O preço opcional é checado à parte, igual ao `validate_consistency` dos itens.
    pub fn validate_amounts(&self) -> Result<(), ValidationError> {
        match &self.price {
            Some(price) => validate_price(price),
            None => Ok(()),
        }
    }
}

// Query string crua da listagem; a conversão tipada acontece no service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductCountQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductEnvelope {
    pub product: Product,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductList {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedProduct {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub category: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDeleted {
    pub message: String,
    pub deleted_product: DeletedProduct,
}

// --- Estatísticas ---
#[derive(Debug, Clone, Default, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductHealthScore {
    pub stock_health: u32,
    pub active_ratio: u32,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductStatistics {
    pub count: u64,
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub low_stock: u64,
    pub total_quantity: i64,
    #[schema(value_type = f64)]
    pub total_value: Decimal,
    #[schema(value_type = f64)]
    pub average_value: Decimal,
    pub categories: BTreeMap<String, u64>,
    pub total_categories: u64,
    pub health_score: ProductHealthScore,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductStatisticsResponse {
    pub statistics: ProductStatistics,
    pub query: ProductCountQuery,
}

// src/models/promotion.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::pagination::Pagination, models::product::MAX_QUANTITY};

// NUMERIC(12, 2)
const MAX_DISCOUNT_VALUE: f64 = 9_999_999_999.99;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "discount_type", rename_all = "snake_case")] // Banco
#[serde(rename_all = "snake_case")] // JSON
pub enum DiscountType {
    Percentage,   // Vira "percentage"
    Fixed,        // Vira "fixed"
    FreeShipping, // Vira "free_shipping"
}

// Situação de uma promoção em relação ao "agora"
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PromotionStatus {
    Active,
    Upcoming,
    Expired,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub product_id: Uuid,
    pub title: String,
    pub description: String,
    pub message: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub current_uses: i64,
    pub max_uses: Option<i64>,
    pub conditions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Promotion {
    /// Janela fechada [start, end]: `now` dentro dela é "vigente".
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && self.end_date >= now
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> PromotionStatus {
        if !self.is_active {
            PromotionStatus::Inactive
        } else if now < self.start_date {
            PromotionStatus::Upcoming
        } else if now > self.end_date {
            PromotionStatus::Expired
        } else {
            PromotionStatus::Active
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromotionFilter {
    pub seller_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

/// Aceita RFC 3339 ("2025-01-31T10:00:00Z") ou data simples ("2025-01-31", meia-noite UTC).
pub fn parse_promotion_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromotionPayload {
    #[validate(length(min = 1, max = 100, message = "Promotion title must be between 1 and 100 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 500, message = "Description must be between 1 and 500 characters"))]
    pub description: String,

    #[validate(length(min = 1, max = 200, message = "Message must be between 1 and 200 characters"))]
    pub message: String,

    pub product_id: Uuid,

    pub discount_type: DiscountType,

    #[validate(range(min = 0.0, max = MAX_DISCOUNT_VALUE, message = "Discount value must be between 0 and 9999999999.99"))]
    pub discount_value: f64,

    #[validate(length(min = 1, message = "Start date is required"))]
    pub start_date: String,

    #[validate(length(min = 1, message = "End date is required"))]
    pub end_date: String,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[validate(range(min = 1, max = MAX_QUANTITY, message = "Max uses must be between 1 and 1000000000"))]
    pub max_uses: Option<i64>,

    #[validate(length(max = 300, message = "Conditions must be at most 300 characters"))]
    pub conditions: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePromotionPayload {
    #[validate(length(min = 1, max = 100, message = "Promotion title must be between 1 and 100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 500, message = "Description must be between 1 and 500 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Message must be between 1 and 200 characters"))]
    pub message: Option<String>,

    pub product_id: Option<Uuid>,

    pub discount_type: Option<DiscountType>,

    #[validate(range(min = 0.0, max = MAX_DISCOUNT_VALUE, message = "Discount value must be between 0 and 9999999999.99"))]
    pub discount_value: Option<f64>,

    #[validate(length(min = 1, message = "Start date is required"))]
    pub start_date: Option<String>,

    #[validate(length(min = 1, message = "End date is required"))]
    pub end_date: Option<String>,

    pub is_active: Option<bool>,

    #[validate(range(min = 1, max = MAX_QUANTITY, message = "Max uses must be between 1 and 1000000000"))]
    pub max_uses: Option<i64>,

    #[validate(length(max = 300, message = "Conditions must be at most 300 characters"))]
    pub conditions: Option<String>,
}

impl UpdatePromotionPayload {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.message.is_none()
            && self.product_id.is_none()
            && self.discount_type.is_none()
            && self.discount_value.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.is_active.is_none()
            && self.max_uses.is_none()
            && self.conditions.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub is_active: Option<String>,
    pub product_id: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionCountQuery {
    pub is_active: Option<String>,
    pub product_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionEnvelope {
    pub promotion: Promotion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionList {
    pub promotions: Vec<Promotion>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedPromotion {
    pub id: Uuid,
    pub title: String,
    pub product_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionDeleted {
    pub message: String,
    pub deleted_promotion: DeletedPromotion,
}

// --- Estatísticas ---
#[derive(Debug, Clone, Default, Serialize, PartialEq, ToSchema)]
pub struct DiscountTypeCounts {
    pub percentage: u64,
    pub fixed: u64,
    pub free_shipping: u64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionHealthScore {
    pub active_ratio: f64,
    pub current_ratio: f64,
    pub usage_ratio: f64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionStatistics {
    pub count: u64,
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub current: u64,
    pub upcoming: u64,
    pub expired: u64,
    pub total_uses: i64,
    pub total_max_uses: i64,
    pub usage_rate: f64,
    #[schema(value_type = f64)]
    pub avg_discount_value: Decimal,
    pub products_with_promotions: u64,
    pub discount_types: DiscountTypeCounts,
    pub health_score: PromotionHealthScore,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromotionStatisticsResponse {
    pub statistics: PromotionStatistics,
}

// src/models/storefront.rs
//
// Visões públicas (sem autenticação) da vitrine de uma empresa.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    auth::User,
    company::Company,
    location::{Location, Position},
    product::Product,
    promotion::{DiscountType, Promotion, PromotionStatus},
};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicCompany {
    pub id: Uuid,
    pub name: String,
    pub ruc: String,
    pub corporate_email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub industry: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Company> for PublicCompany {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id,
            name: company.name.clone(),
            ruc: company.ruc.clone(),
            corporate_email: company.corporate_email.clone(),
            phone: company.phone.clone(),
            address: company.address.clone(),
            industry: company.industry.clone(),
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerInfo {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
}

impl From<User> for OwnerInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            telephone: user.telephone,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyStats {
    pub total_products: u64,
    pub total_locations: u64,
    pub active_promotions: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub company: PublicCompany,
    pub owner: Option<OwnerInfo>,
    pub stats: CompanyStats,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontLocation {
    pub id: Uuid,
    pub name: String,
    pub zone: String,
    pub section: String,
    pub position: Position,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Location> for StorefrontLocation {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            name: location.name,
            zone: location.zone,
            section: location.section,
            position: location.position,
            is_active: location.is_active,
            created_at: location.created_at,
            updated_at: location.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontPromotion {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub discount_type: DiscountType,
    #[schema(value_type = f64)]
    pub discount_value: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub uses: i64,
    pub status: PromotionStatus,
    pub is_active: bool,
}

impl StorefrontPromotion {
    pub fn at(promotion: Promotion, now: DateTime<Utc>) -> Self {
        let status = promotion.status_at(now);
        Self {
            id: promotion.id,
            title: promotion.title,
            message: promotion.message,
            discount_type: promotion.discount_type,
            discount_value: promotion.discount_value,
            start_date: promotion.start_date,
            end_date: promotion.end_date,
            uses: promotion.current_uses,
            status,
            is_active: promotion.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontProductSummary {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub description: String,
    pub category: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub quantity: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Product> for StorefrontProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            sku: product.sku.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price,
            quantity: product.quantity,
            is_active: product.is_active,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontProductStats {
    pub total_locations: u64,
    pub active_promotions: u64,
    pub has_low_stock: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontProduct {
    #[serde(flatten)]
    pub product: StorefrontProductSummary,
    pub locations: Vec<StorefrontLocation>,
    pub promotions: Vec<StorefrontPromotion>,
    pub stats: StorefrontProductStats,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProducts {
    pub company_id: Uuid,
    pub company_name: String,
    pub total_products: u64,
    pub products: Vec<StorefrontProduct>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontCompany {
    pub id: Uuid,
    pub name: String,
    pub ruc: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<Company> for StorefrontCompany {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            ruc: company.ruc,
            phone: company.phone,
            address: company.address,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailStats {
    pub total_locations: u64,
    pub active_promotions: u64,
    pub upcoming_promotions: u64,
    pub has_low_stock: bool,
    pub has_promotions: bool,
    pub has_locations: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product: StorefrontProductSummary,
    pub company: Option<StorefrontCompany>,
    pub locations: Vec<StorefrontLocation>,
    pub promotions: Vec<StorefrontPromotion>,
    pub stats: ProductDetailStats,
}

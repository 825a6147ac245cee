// src/services/public_service.rs
//
// Leituras da vitrine pública. Enriquecimentos (dono, contagens, empresa do
// produto) são "best-effort": se falharem, o campo cai no padrão e a
// requisição segue.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::{error::AppError, ownership::parse_id},
    db::UserStore,
    models::{
        company::Company,
        product::Product,
        promotion::PromotionStatus,
        storefront::{
            CompanyProducts, CompanyProfile, CompanyStats, OwnerInfo, ProductDetail,
            ProductDetailStats, PublicCompany, StorefrontCompany, StorefrontLocation,
            StorefrontProduct, StorefrontProductStats, StorefrontProductSummary,
            StorefrontPromotion,
        },
    },
    services::{
        location_service::LocationService, product_service::ProductService,
        promotion_service::PromotionService,
    },
};

const COMPANY_NOT_FOUND: &str = "Company not found";
const PRODUCT_NOT_FOUND: &str = "Product not found";

#[derive(Clone)]
pub struct PublicService {
    users: Arc<dyn UserStore>,
    products: ProductService,
    locations: LocationService,
    promotions: PromotionService,
}

impl PublicService {
    pub fn new(
        users: Arc<dyn UserStore>,
        products: ProductService,
        locations: LocationService,
        promotions: PromotionService,
    ) -> Self {
        Self { users, products, locations, promotions }
    }

    async fn find_company(&self, raw_id: &str) -> Result<Company, AppError> {
        let id = parse_id(raw_id, COMPANY_NOT_FOUND)?;
        self.users
            .find_company(id)
            .await?
            .ok_or_else(|| AppError::NotFound(COMPANY_NOT_FOUND.into()))
    }

    async fn owner_info(&self, owner_id: Uuid) -> Option<OwnerInfo> {
        match self.users.find_user(owner_id).await {
            Ok(user) => user.map(OwnerInfo::from),
            Err(e) => {
                tracing::warn!(%owner_id, error = %e, "Não foi possível buscar o dono da empresa");
                None
            }
        }
    }

    async fn company_stats(&self, owner_id: Uuid) -> Result<CompanyStats, AppError> {
        let (total_products, total_locations, active_promotions) = tokio::try_join!(
            self.products.count_for_seller(owner_id),
            self.locations.count_for_seller(owner_id),
            self.promotions.count_active_for_seller(owner_id),
        )?;
        Ok(CompanyStats { total_products, total_locations, active_promotions })
    }

    // Locais ativos + promoções ativas (com status) de um produto
    async fn attachments(
        &self,
        product_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(Vec<StorefrontLocation>, Vec<StorefrontPromotion>), AppError> {
        let (locations, promotions) = tokio::try_join!(
            self.locations.active_for_product(product_id),
            self.promotions.active_for_product(product_id),
        )?;
        Ok((
            locations.into_iter().map(StorefrontLocation::from).collect(),
            promotions
                .into_iter()
                .map(|p| StorefrontPromotion::at(p, now))
                .collect(),
        ))
    }

    // --- GET /api/public/company/{companyId} ---
    pub async fn company_profile(&self, raw_company_id: &str) -> Result<CompanyProfile, AppError> {
        let company = self.find_company(raw_company_id).await?;

        let owner = self.owner_info(company.owner_id).await;
        let stats = self.company_stats(company.owner_id).await.unwrap_or_else(|e| {
            tracing::warn!(company_id = %company.id, error = %e, "Não foi possível calcular as estatísticas da empresa");
            CompanyStats::default()
        });

        tracing::info!(company_id = %company.id, "Empresa pública consultada");
        Ok(CompanyProfile { company: PublicCompany::from(&company), owner, stats })
    }

    // --- GET /api/public/company/{companyId}/products ---
    pub async fn company_products(&self, raw_company_id: &str) -> Result<CompanyProducts, AppError> {
        let company = self.find_company(raw_company_id).await?;
        let now = Utc::now();

        let mut products = Vec::new();
        for product in self.products.active_for_seller(company.owner_id).await? {
            let (locations, promotions) = self.attachments(product.id, now).await?;
            let stats = StorefrontProductStats {
                total_locations: locations.len() as u64,
                active_promotions: promotions.len() as u64,
                has_low_stock: product.is_low_stock(),
            };
            products.push(StorefrontProduct {
                product: StorefrontProductSummary::from(&product),
                locations,
                promotions,
                stats,
            });
        }

        tracing::info!(company_id = %company.id, total = products.len(), "Produtos públicos listados");
        Ok(CompanyProducts {
            company_id: company.id,
            company_name: company.name,
            total_products: products.len() as u64,
            products,
        })
    }

    // Empresa do vendedor dono do produto
    async fn seller_company(&self, product: &Product) -> Result<Option<Company>, AppError> {
        let Some(user) = self.users.find_user(product.seller_id).await? else {
            return Ok(None);
        };
        match user.company_id {
            Some(company_id) => self.users.find_company(company_id).await,
            None => Ok(None),
        }
    }

    // --- GET /api/public/product/{productId} ---
    pub async fn product_detail(&self, raw_product_id: &str) -> Result<ProductDetail, AppError> {
        let id = parse_id(raw_product_id, PRODUCT_NOT_FOUND)?;
        let product = self
            .products
            .find_by_id(id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.into()))?;

        let company = self.seller_company(&product).await.unwrap_or_else(|e| {
            tracing::warn!(product_id = %product.id, error = %e, "Não foi possível buscar a empresa do produto");
            None
        });

        let (locations, promotions) = self.attachments(product.id, Utc::now()).await?;
        let count_status = |status: PromotionStatus| {
            promotions.iter().filter(|p| p.status == status).count() as u64
        };
        let stats = ProductDetailStats {
            total_locations: locations.len() as u64,
            active_promotions: count_status(PromotionStatus::Active),
            upcoming_promotions: count_status(PromotionStatus::Upcoming),
            has_low_stock: product.is_low_stock(),
            has_promotions: !promotions.is_empty(),
            has_locations: !locations.is_empty(),
        };

        tracing::info!(product_id = %product.id, "Produto público consultado");
        Ok(ProductDetail {
            product: StorefrontProductSummary::from(&product),
            company: company.map(StorefrontCompany::from),
            locations,
            promotions,
            stats,
        })
    }
}

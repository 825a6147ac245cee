// src/services/promotion_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        ownership::{ensure_owned, parse_id},
        pagination::{PageParams, Pagination, matches_search, parse_bool_flag, parse_optional_id},
    },
    db::{Document, PromotionStore},
    models::promotion::{
        CreatePromotionPayload, DeletedPromotion, Promotion, PromotionCountQuery,
        PromotionFilter, PromotionList, PromotionListQuery, PromotionStatisticsResponse,
        UpdatePromotionPayload, parse_promotion_date,
    },
    services::{
        product_service::{NO_FIELDS_TO_UPDATE, ProductService},
        statistics::promotion_statistics,
    },
};

fn parse_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    parse_promotion_date(raw).ok_or_else(|| AppError::BadRequest("Invalid date format".into()))
}

fn ensure_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if start >= end {
        return Err(AppError::BadRequest("End date must be after start date".into()));
    }
    Ok(())
}

// Duas casas, igual à coluna NUMERIC(12, 2)
fn discount_from(value: f64) -> Result<Decimal, AppError> {
    Decimal::try_from(value)
        .map(|d| d.round_dp(2))
        .map_err(|_| AppError::ValidationError("Invalid promotion data: Discount value is invalid".into()))
}

#[derive(Clone)]
pub struct PromotionService {
    promotions: PromotionStore,
    products: ProductService,
}

impl PromotionService {
    pub fn new(promotions: PromotionStore, products: ProductService) -> Self {
        Self { promotions, products }
    }

    async fn find_owned(&self, seller_id: Uuid, raw_id: &str) -> Result<Promotion, AppError> {
        let id = parse_id(raw_id, Promotion::NOT_FOUND_MESSAGE)?;
        let found = self.promotions.find_by_id(id).await?;
        ensure_owned(found, seller_id)
    }

    async fn ensure_title_free(
        &self,
        seller_id: Uuid,
        title: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), AppError> {
        if self.promotions.exists_for_seller(seller_id, title, exclude).await? {
            tracing::warn!(%seller_id, %title, "Título de promoção já existe para o vendedor");
            return Err(AppError::Conflict(Promotion::CONFLICT_MESSAGE.into()));
        }
        Ok(())
    }

    // --- CREATE ---
    pub async fn create(
        &self,
        seller_id: Uuid,
        payload: CreatePromotionPayload,
    ) -> Result<Promotion, AppError> {
        // Janela inválida é 400 antes de qualquer leitura de produto
        let start_date = parse_date(&payload.start_date)?;
        let end_date = parse_date(&payload.end_date)?;
        ensure_window(start_date, end_date)?;

        self.products.require_reference(seller_id, payload.product_id).await?;
        self.ensure_title_free(seller_id, &payload.title, None).await?;

        let now = Utc::now();
        let promotion = Promotion {
            id: Uuid::new_v4(),
            seller_id,
            product_id: payload.product_id,
            title: payload.title,
            description: payload.description,
            message: payload.message,
            discount_type: payload.discount_type,
            discount_value: discount_from(payload.discount_value)?,
            start_date,
            end_date,
            is_active: payload.is_active,
            current_uses: 0,
            max_uses: payload.max_uses,
            conditions: payload.conditions,
            created_at: now,
            updated_at: now,
        };

        self.promotions.insert(&promotion).await?;
        tracing::info!(%seller_id, promotion_id = %promotion.id, product_id = %promotion.product_id, "Promoção criada");
        Ok(promotion)
    }

    // --- LIST ---
    pub async fn list(
        &self,
        seller_id: Uuid,
        query: &PromotionListQuery,
    ) -> Result<PromotionList, AppError> {
        let params = PageParams::parse(query.page.as_deref(), query.limit.as_deref())?;
        let filter = PromotionFilter {
            seller_id: Some(seller_id),
            product_id: parse_optional_id(query.product_id.as_deref())?,
            is_active: parse_bool_flag(query.is_active.as_deref())?,
        };

        let total = self.promotions.count(&filter).await?;
        let mut promotions = self
            .promotions
            .list_page(&filter, params.offset(), params.limit)
            .await?;

        if let Some(needle) = query.search.as_deref().filter(|s| !s.is_empty()) {
            promotions.retain(|p| {
                matches_search(
                    needle,
                    &[
                        Some(p.title.as_str()),
                        Some(p.message.as_str()),
                        Some(p.description.as_str()),
                    ],
                )
            });
        }

        Ok(PromotionList { promotions, pagination: Pagination::new(params, total) })
    }

    // --- READ ---
    pub async fn get(&self, seller_id: Uuid, raw_id: &str) -> Result<Promotion, AppError> {
        self.find_owned(seller_id, raw_id).await
    }

    // --- UPDATE ---
    pub async fn update(
        &self,
        seller_id: Uuid,
        raw_id: &str,
        changes: UpdatePromotionPayload,
    ) -> Result<Promotion, AppError> {
        if changes.is_empty() {
            return Err(AppError::BadRequest(NO_FIELDS_TO_UPDATE.into()));
        }

        let mut promotion = self.find_owned(seller_id, raw_id).await?;

        // A data ausente no payload vem do documento gravado
        if changes.start_date.is_some() || changes.end_date.is_some() {
            let start_date = match changes.start_date.as_deref() {
                Some(raw) => parse_date(raw)?,
                None => promotion.start_date,
            };
            let end_date = match changes.end_date.as_deref() {
                Some(raw) => parse_date(raw)?,
                None => promotion.end_date,
            };
            ensure_window(start_date, end_date)?;
            promotion.start_date = start_date;
            promotion.end_date = end_date;
        }

        if let Some(product_id) = changes.product_id.filter(|p| *p != promotion.product_id) {
            self.products.require_reference(seller_id, product_id).await?;
        }
        if let Some(title) = changes.title.as_deref().filter(|t| *t != promotion.title) {
            self.ensure_title_free(seller_id, title, Some(promotion.id)).await?;
        }

        if let Some(value) = changes.discount_value {
            promotion.discount_value = discount_from(value)?;
        }
        if let Some(title) = changes.title {
            promotion.title = title;
        }
        if let Some(description) = changes.description {
            promotion.description = description;
        }
        if let Some(message) = changes.message {
            promotion.message = message;
        }
        if let Some(product_id) = changes.product_id {
            promotion.product_id = product_id;
        }
        if let Some(discount_type) = changes.discount_type {
            promotion.discount_type = discount_type;
        }
        if let Some(is_active) = changes.is_active {
            promotion.is_active = is_active;
        }
        if changes.max_uses.is_some() {
            promotion.max_uses = changes.max_uses;
        }
        if changes.conditions.is_some() {
            promotion.conditions = changes.conditions;
        }

        promotion.updated_at = Utc::now();
        self.promotions.update(&promotion).await?;

        tracing::info!(%seller_id, promotion_id = %promotion.id, "Promoção atualizada");
        Ok(promotion)
    }

    // --- DELETE ---
    pub async fn delete(&self, seller_id: Uuid, raw_id: &str) -> Result<DeletedPromotion, AppError> {
        let promotion = self.find_owned(seller_id, raw_id).await?;
        self.promotions.delete(promotion.id).await?;

        tracing::info!(%seller_id, promotion_id = %promotion.id, "Promoção removida");
        Ok(DeletedPromotion {
            id: promotion.id,
            title: promotion.title,
            product_id: promotion.product_id,
        })
    }

    // --- STATISTICS ---
    pub async fn statistics(
        &self,
        seller_id: Uuid,
        query: &PromotionCountQuery,
    ) -> Result<PromotionStatisticsResponse, AppError> {
        let filter = PromotionFilter {
            seller_id: Some(seller_id),
            product_id: parse_optional_id(query.product_id.as_deref())?,
            is_active: parse_bool_flag(query.is_active.as_deref())?,
        };

        let promotions = self.promotions.list_all(&filter).await?;
        let statistics = promotion_statistics(&promotions, Utc::now());

        tracing::info!(%seller_id, total = statistics.total, "Estatísticas de promoções calculadas");
        Ok(PromotionStatisticsResponse { statistics })
    }

    pub async fn active_for_product(&self, product_id: Uuid) -> Result<Vec<Promotion>, AppError> {
        let filter = PromotionFilter {
            product_id: Some(product_id),
            is_active: Some(true),
            ..Default::default()
        };
        self.promotions.list_all(&filter).await
    }

    pub async fn count_active_for_seller(&self, seller_id: Uuid) -> Result<u64, AppError> {
        let filter = PromotionFilter {
            seller_id: Some(seller_id),
            is_active: Some(true),
            ..Default::default()
        };
        self.promotions.count(&filter).await
    }
}

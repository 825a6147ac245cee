// src/services/location_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        ownership::{ensure_owned, parse_id},
        pagination::{PageParams, Pagination, matches_search, parse_bool_flag, parse_optional_id},
    },
    db::{Document, LocationStore},
    models::location::{
        CreateLocationPayload, DeletedLocation, Location, LocationCountQuery, LocationFilter,
        LocationList, LocationListQuery, LocationStatisticsResponse, UpdateLocationPayload,
    },
    services::{
        product_service::{NO_FIELDS_TO_UPDATE, ProductService},
        statistics::location_statistics,
    },
};

#[derive(Clone)]
pub struct LocationService {
    locations: LocationStore,
    products: ProductService,
}

impl LocationService {
    pub fn new(locations: LocationStore, products: ProductService) -> Self {
        Self { locations, products }
    }

    async fn find_owned(&self, seller_id: Uuid, raw_id: &str) -> Result<Location, AppError> {
        let id = parse_id(raw_id, Location::NOT_FOUND_MESSAGE)?;
        let found = self.locations.find_by_id(id).await?;
        ensure_owned(found, seller_id)
    }

    async fn ensure_name_free(
        &self,
        seller_id: Uuid,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), AppError> {
        if self.locations.exists_for_seller(seller_id, name, exclude).await? {
            tracing::warn!(%seller_id, %name, "Nome de local já existe para o vendedor");
            return Err(AppError::Conflict(Location::CONFLICT_MESSAGE.into()));
        }
        Ok(())
    }

    // --- CREATE ---
    pub async fn create(
        &self,
        seller_id: Uuid,
        payload: CreateLocationPayload,
    ) -> Result<Location, AppError> {
        self.products.require_reference(seller_id, payload.product_id).await?;
        self.ensure_name_free(seller_id, &payload.name, None).await?;

        let now = Utc::now();
        let location = Location {
            id: Uuid::new_v4(),
            seller_id,
            product_id: payload.product_id,
            name: payload.name,
            description: payload.description,
            zone: payload.zone,
            section: payload.section,
            aisle: payload.aisle,
            shelf: payload.shelf,
            position: payload.position,
            is_active: payload.is_active,
            notes: payload.notes,
            created_at: now,
            updated_at: now,
        };

        self.locations.insert(&location).await?;
        tracing::info!(%seller_id, location_id = %location.id, product_id = %location.product_id, "Local criado");
        Ok(location)
    }

    // --- LIST ---
    pub async fn list(
        &self,
        seller_id: Uuid,
        query: &LocationListQuery,
    ) -> Result<LocationList, AppError> {
        let params = PageParams::parse(query.page.as_deref(), query.limit.as_deref())?;
        let filter = LocationFilter {
            seller_id: Some(seller_id),
            product_id: parse_optional_id(query.product_id.as_deref())?,
            is_active: parse_bool_flag(query.is_active.as_deref())?,
        };

        let total = self.locations.count(&filter).await?;
        let mut locations = self
            .locations
            .list_page(&filter, params.offset(), params.limit)
            .await?;

        if let Some(needle) = query.search.as_deref().filter(|s| !s.is_empty()) {
            locations.retain(|l| {
                matches_search(
                    needle,
                    &[
                        Some(l.name.as_str()),
                        Some(l.description.as_str()),
                        Some(l.zone.as_str()),
                        Some(l.section.as_str()),
                    ],
                )
            });
        }

        Ok(LocationList { locations, pagination: Pagination::new(params, total) })
    }

    // --- READ ---
    pub async fn get(&self, seller_id: Uuid, raw_id: &str) -> Result<Location, AppError> {
        self.find_owned(seller_id, raw_id).await
    }

    // --- UPDATE ---
    pub async fn update(
        &self,
        seller_id: Uuid,
        raw_id: &str,
        changes: UpdateLocationPayload,
    ) -> Result<Location, AppError> {
        if changes.is_empty() {
            return Err(AppError::BadRequest(NO_FIELDS_TO_UPDATE.into()));
        }

        let mut location = self.find_owned(seller_id, raw_id).await?;

        if let Some(product_id) = changes.product_id.filter(|p| *p != location.product_id) {
            self.products.require_reference(seller_id, product_id).await?;
        }
        if let Some(name) = changes.name.as_deref().filter(|n| *n != location.name) {
            self.ensure_name_free(seller_id, name, Some(location.id)).await?;
        }

        location.apply(changes);
        location.updated_at = Utc::now();
        self.locations.update(&location).await?;

        tracing::info!(%seller_id, location_id = %location.id, "Local atualizado");
        Ok(location)
    }

    // --- DELETE ---
    pub async fn delete(&self, seller_id: Uuid, raw_id: &str) -> Result<DeletedLocation, AppError> {
        let location = self.find_owned(seller_id, raw_id).await?;
        self.locations.delete(location.id).await?;

        tracing::info!(%seller_id, location_id = %location.id, "Local removido");
        Ok(DeletedLocation {
            id: location.id,
            name: location.name,
            product_id: location.product_id,
        })
    }

    // --- STATISTICS ---
    pub async fn statistics(
        &self,
        seller_id: Uuid,
        query: &LocationCountQuery,
    ) -> Result<LocationStatisticsResponse, AppError> {
        let filter = LocationFilter {
            seller_id: Some(seller_id),
            product_id: parse_optional_id(query.product_id.as_deref())?,
            is_active: parse_bool_flag(query.is_active.as_deref())?,
        };

        let locations = self.locations.list_all(&filter).await?;
        let statistics = location_statistics(&locations);

        tracing::info!(%seller_id, total = statistics.total, "Estatísticas de locais calculadas");
        Ok(LocationStatisticsResponse { statistics })
    }

    pub async fn active_for_product(&self, product_id: Uuid) -> Result<Vec<Location>, AppError> {
        let filter = LocationFilter {
            product_id: Some(product_id),
            is_active: Some(true),
            ..Default::default()
        };
        self.locations.list_all(&filter).await
    }

    pub async fn count_for_seller(&self, seller_id: Uuid) -> Result<u64, AppError> {
        let filter = LocationFilter { seller_id: Some(seller_id), ..Default::default() };
        self.locations.count(&filter).await
    }
}

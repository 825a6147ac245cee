// src/models/location.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::pagination::Pagination;

// Coordenadas no mapa da loja. No banco viram `position_x` / `position_y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, FromRow, Validate, ToSchema)]
pub struct Position {
    #[sqlx(rename = "position_x")]
    #[validate(range(min = 0.0, message = "X position must be positive"))]
    pub x: f64,

    #[sqlx(rename = "position_y")]
    #[validate(range(min = 0.0, message = "Y position must be positive"))]
    pub y: f64,
}

// --- Local físico de um produto (zona / seção / corredor / prateleira) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub description: String,
    pub zone: String,
    pub section: String,
    pub aisle: Option<String>,
    pub shelf: Option<String>,
    #[sqlx(flatten)]
    pub position: Position,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Location {
    pub fn apply(&mut self, changes: UpdateLocationPayload) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(product_id) = changes.product_id {
            self.product_id = product_id;
        }
        if let Some(zone) = changes.zone {
            self.zone = zone;
        }
        if let Some(section) = changes.section {
            self.section = section;
        }
        if changes.aisle.is_some() {
            self.aisle = changes.aisle;
        }
        if changes.shelf.is_some() {
            self.shelf = changes.shelf;
        }
        if let Some(position) = changes.position {
            self.position = position;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        if changes.notes.is_some() {
            self.notes = changes.notes;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocationFilter {
    pub seller_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationPayload {
    #[validate(length(min = 1, max = 100, message = "Location name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 500, message = "Description must be between 1 and 500 characters"))]
    pub description: String,

    pub product_id: Uuid,

    #[validate(length(min = 1, max = 50, message = "Zone must be between 1 and 50 characters"))]
    pub zone: String,

    #[validate(length(min = 1, max = 50, message = "Section must be between 1 and 50 characters"))]
    pub section: String,

    pub aisle: Option<String>,
    pub shelf: Option<String>,

    #[validate(nested)]
    pub position: Position,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[validate(length(max = 200, message = "Notes must be at most 200 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationPayload {
    #[validate(length(min = 1, max = 100, message = "Location name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 500, message = "Description must be between 1 and 500 characters"))]
    pub description: Option<String>,

    pub product_id: Option<Uuid>,

    #[validate(length(min = 1, max = 50, message = "Zone must be between 1 and 50 characters"))]
    pub zone: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Section must be between 1 and 50 characters"))]
    pub section: Option<String>,

    pub aisle: Option<String>,
    pub shelf: Option<String>,

    #[validate(nested)]
    pub position: Option<Position>,

    pub is_active: Option<bool>,

    #[validate(length(max = 200, message = "Notes must be at most 200 characters"))]
    pub notes: Option<String>,
}

impl UpdateLocationPayload {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.product_id.is_none()
            && self.zone.is_none()
            && self.section.is_none()
            && self.aisle.is_none()
            && self.shelf.is_none()
            && self.position.is_none()
            && self.is_active.is_none()
            && self.notes.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub is_active: Option<String>,
    pub product_id: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCountQuery {
    pub is_active: Option<String>,
    pub product_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationEnvelope {
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationList {
    pub locations: Vec<Location>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedLocation {
    pub id: Uuid,
    pub name: String,
    pub product_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationDeleted {
    pub message: String,
    pub deleted_location: DeletedLocation,
}

// --- Estatísticas ---
#[derive(Debug, Clone, Default, Serialize, PartialEq, ToSchema)]
pub struct LocationCoverage {
    pub zones: Vec<String>,
    pub sections: Vec<String>,
    pub aisles: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationHealthScore {
    pub active_ratio: f64,
    pub coverage_ratio: f64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationStatistics {
    pub count: u64,
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub total_zones: u64,
    pub total_sections: u64,
    pub total_aisles: u64,
    pub products_covered: u64,
    pub avg_position: Position,
    pub coverage: LocationCoverage,
    pub health_score: LocationHealthScore,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationStatisticsResponse {
    pub statistics: LocationStatistics,
}

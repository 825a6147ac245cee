// src/handlers/locations.rs

use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::location::{
        CreateLocationPayload, LocationCountQuery, LocationDeleted, LocationEnvelope,
        LocationList, LocationListQuery, LocationStatisticsResponse, UpdateLocationPayload,
    },
};

#[utoipa::path(
    post,
    path = "/api/locations",
    tag = "Locations",
    request_body = CreateLocationPayload,
    responses(
        (status = 200, description = "Local criado", body = LocationEnvelope),
        (status = 400, description = "Payload inválido"),
        (status = 403, description = "Produto de outro vendedor"),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "Nome de local já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_location(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreateLocationPayload>, AppError>,
) -> Result<Json<LocationEnvelope>, AppError> {
    payload.validate().map_err(|e| AppError::invalid("location", e))?;

    let location = app_state.location_service.create(identity.uid, payload).await?;

    Ok(Json(LocationEnvelope {
        location,
        message: Some("Location created successfully".into()),
    }))
}

#[utoipa::path(
    get,
    path = "/api/locations",
    tag = "Locations",
    params(
        ("page" = Option<u64>, Query, description = "Página (>= 1)"),
        ("limit" = Option<u64>, Query, description = "Itens por página (1..=100)"),
        ("isActive" = Option<bool>, Query, description = "Filtro por ativo"),
        ("productId" = Option<String>, Query, description = "Filtro por produto"),
        ("search" = Option<String>, Query, description = "Busca em nome, descrição, zona e seção")
    ),
    responses(
        (status = 200, description = "Página de locais do vendedor", body = LocationList),
        (status = 400, description = "Parâmetros inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_locations(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    WithRejection(Query(query), _): WithRejection<Query<LocationListQuery>, AppError>,
) -> Result<Json<LocationList>, AppError> {
    let list = app_state.location_service.list(identity.uid, &query).await?;
    Ok(Json(list))
}

#[utoipa::path(
    get,
    path = "/api/locations/count",
    tag = "Locations",
    params(
        ("isActive" = Option<bool>, Query, description = "Filtro por ativo"),
        ("productId" = Option<String>, Query, description = "Filtro por produto")
    ),
    responses(
        (status = 200, description = "Estatísticas dos locais", body = LocationStatisticsResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn count_locations(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    WithRejection(Query(query), _): WithRejection<Query<LocationCountQuery>, AppError>,
) -> Result<Json<LocationStatisticsResponse>, AppError> {
    let stats = app_state.location_service.statistics(identity.uid, &query).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/locations/{id}",
    tag = "Locations",
    params(("id" = String, Path, description = "ID do local")),
    responses(
        (status = 200, description = "Local", body = LocationEnvelope),
        (status = 403, description = "Local de outro vendedor"),
        (status = 404, description = "Local não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_location(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<LocationEnvelope>, AppError> {
    let location = app_state.location_service.get(identity.uid, &id).await?;
    Ok(Json(LocationEnvelope { location, message: None }))
}

#[utoipa::path(
    put,
    path = "/api/locations/{id}",
    tag = "Locations",
    params(("id" = String, Path, description = "ID do local")),
    request_body = UpdateLocationPayload,
    responses(
        (status = 200, description = "Local atualizado", body = LocationEnvelope),
        (status = 400, description = "Payload vazio ou inválido"),
        (status = 403, description = "Local de outro vendedor"),
        (status = 404, description = "Local não encontrado"),
        (status = 409, description = "Nome de local já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_location(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateLocationPayload>, AppError>,
) -> Result<Json<LocationEnvelope>, AppError> {
    payload.validate().map_err(|e| AppError::invalid("location", e))?;

    let location = app_state.location_service.update(identity.uid, &id, payload).await?;

    Ok(Json(LocationEnvelope {
        location,
        message: Some("Location updated successfully".into()),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/locations/{id}",
    tag = "Locations",
    params(("id" = String, Path, description = "ID do local")),
    responses(
        (status = 200, description = "Local removido", body = LocationDeleted),
        (status = 403, description = "Local de outro vendedor"),
        (status = 404, description = "Local não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_location(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<LocationDeleted>, AppError> {
    let deleted_location = app_state.location_service.delete(identity.uid, &id).await?;
    Ok(Json(LocationDeleted {
        message: "Location deleted successfully".into(),
        deleted_location,
    }))
}

// src/handlers/promotions.rs

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
    models::promotion::{
        CreatePromotionPayload, PromotionCountQuery, PromotionDeleted, PromotionEnvelope,
        PromotionList, PromotionListQuery, PromotionStatisticsResponse, UpdatePromotionPayload,
    },
};

#[utoipa::path(
    post,
    path = "/api/promotions",
    tag = "Promotions",
    request_body = CreatePromotionPayload,
    responses(
        (status = 200, description = "Promoção criada", body = PromotionEnvelope),
        (status = 400, description = "Payload ou datas inválidas"),
        (status = 403, description = "Produto de outro vendedor"),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "Título já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_promotion(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreatePromotionPayload>, AppError>,
) -> Result<Json<PromotionEnvelope>, AppError> {
    payload.validate().map_err(|e| AppError::invalid("promotion", e))?;

    let promotion = app_state.promotion_service.create(identity.uid, payload).await?;

    Ok(Json(PromotionEnvelope {
        promotion,
        message: Some("Promotion created successfully".into()),
    }))
}

#[utoipa::path(
    get,
    path = "/api/promotions",
    tag = "Promotions",
    params(
        ("page" = Option<u64>, Query, description = "Página (>= 1)"),
        ("limit" = Option<u64>, Query, description = "Itens por página (1..=100)"),
        ("isActive" = Option<bool>, Query, description = "Filtro por ativo"),
        ("productId" = Option<String>, Query, description = "Filtro por produto"),
        ("search" = Option<String>, Query, description = "Busca em título, mensagem e descrição")
    ),
    responses(
        (status = 200, description = "Página de promoções do vendedor", body = PromotionList),
        (status = 400, description = "Parâmetros inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_promotions(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    WithRejection(Query(query), _): WithRejection<Query<PromotionListQuery>, AppError>,
) -> Result<Json<PromotionList>, AppError> {
    let list = app_state.promotion_service.list(identity.uid, &query).await?;
    Ok(Json(list))
}

#[utoipa::path(
    get,
    path = "/api/promotions/count",
    tag = "Promotions",
    params(
        ("isActive" = Option<bool>, Query, description = "Filtro por ativo"),
        ("productId" = Option<String>, Query, description = "Filtro por produto")
    ),
    responses(
        (status = 200, description = "Estatísticas das promoções", body = PromotionStatisticsResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn count_promotions(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    WithRejection(Query(query), _): WithRejection<Query<PromotionCountQuery>, AppError>,
) -> Result<Json<PromotionStatisticsResponse>, AppError> {
    let stats = app_state.promotion_service.statistics(identity.uid, &query).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/promotions/{id}",
    tag = "Promotions",
    params(("id" = String, Path, description = "ID da promoção")),
    responses(
        (status = 200, description = "Promoção", body = PromotionEnvelope),
        (status = 403, description = "Promoção de outro vendedor"),
        (status = 404, description = "Promoção não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_promotion(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<PromotionEnvelope>, AppError> {
    let promotion = app_state.promotion_service.get(identity.uid, &id).await?;
    Ok(Json(PromotionEnvelope { promotion, message: None }))
}

#[utoipa::path(
    put,
    path = "/api/promotions/{id}",
    tag = "Promotions",
    params(("id" = String, Path, description = "ID da promoção")),
    request_body = UpdatePromotionPayload,
    responses(
        (status = 200, description = "Promoção atualizada", body = PromotionEnvelope),
        (status = 400, description = "Payload vazio, inválido ou datas fora de ordem"),
        (status = 403, description = "Promoção de outro vendedor"),
        (status = 404, description = "Promoção não encontrada"),
        (status = 409, description = "Título já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_promotion(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdatePromotionPayload>, AppError>,
) -> Result<Json<PromotionEnvelope>, AppError> {
    payload.validate().map_err(|e| AppError::invalid("promotion", e))?;

    let promotion = app_state.promotion_service.update(identity.uid, &id, payload).await?;

    Ok(Json(PromotionEnvelope {
        promotion,
        message: Some("Promotion updated successfully".into()),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/promotions/{id}",
    tag = "Promotions",
    params(("id" = String, Path, description = "ID da promoção")),
    responses(
        (status = 200, description = "Promoção removida", body = PromotionDeleted),
        (status = 403, description = "Promoção de outro vendedor"),
        (status = 404, description = "Promoção não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_promotion(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<PromotionDeleted>, AppError> {
    let deleted_promotion = app_state.promotion_service.delete(identity.uid, &id).await?;
    Ok(Json(PromotionDeleted {
        message: "Promotion deleted successfully".into(),
        deleted_promotion,
    }))
}

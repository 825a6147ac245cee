// src/handlers/products.rs

use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use validator::{Validate, ValidationErrors};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::product::{
        CreateProductPayload, ProductCountQuery, ProductDeleted, ProductEnvelope, ProductList,
        ProductListQuery, ProductStatisticsResponse, UpdateProductPayload,
    },
};

// ---
// Handler: create_product
// ---
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductPayload,
    responses(
        (status = 200, description = "Produto criado", body = ProductEnvelope),
        (status = 400, description = "Payload inválido"),
        (status = 401, description = "Não autenticado"),
        (status = 409, description = "SKU já existe para o vendedor")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreateProductPayload>, AppError>,
) -> Result<Json<ProductEnvelope>, AppError> {
    payload.validate().map_err(|e| AppError::invalid("product", e))?;

    let product = app_state.product_service.create(identity.uid, payload).await?;

    Ok(Json(ProductEnvelope {
        product,
        message: Some("Product created successfully".into()),
    }))
}

// ---
// Handler: list_products
// ---
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(
        ("page" = Option<u64>, Query, description = "Página (>= 1)"),
        ("limit" = Option<u64>, Query, description = "Itens por página (1..=100)"),
        ("category" = Option<String>, Query, description = "Filtro por categoria"),
        ("isActive" = Option<bool>, Query, description = "Filtro por ativo"),
        ("search" = Option<String>, Query, description = "Busca em nome, descrição e SKU")
    ),
    responses(
        (status = 200, description = "Página de produtos do vendedor", body = ProductList),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    WithRejection(Query(query), _): WithRejection<Query<ProductListQuery>, AppError>,
) -> Result<Json<ProductList>, AppError> {
    let list = app_state.product_service.list(identity.uid, &query).await?;
    Ok(Json(list))
}

// ---
// Handler: count_products (estatísticas)
// ---
#[utoipa::path(
    get,
    path = "/api/products/count",
    tag = "Products",
    params(
        ("category" = Option<String>, Query, description = "Filtro por categoria"),
        ("isActive" = Option<bool>, Query, description = "Filtro por ativo"),
        ("lowStock" = Option<bool>, Query, description = "Conta só os de estoque baixo")
    ),
    responses(
        (status = 200, description = "Estatísticas dos produtos", body = ProductStatisticsResponse),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn count_products(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    WithRejection(Query(query), _): WithRejection<Query<ProductCountQuery>, AppError>,
) -> Result<Json<ProductStatisticsResponse>, AppError> {
    let stats = app_state.product_service.statistics(identity.uid, query).await?;
    Ok(Json(stats))
}

// ---
// Handler: get_product
// ---
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = ProductEnvelope),
        (status = 403, description = "Produto de outro vendedor"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<ProductEnvelope>, AppError> {
    let product = app_state.product_service.get(identity.uid, &id).await?;
    Ok(Json(ProductEnvelope { product, message: None }))
}

// ---
// Handler: update_product
// ---
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "ID do produto")),
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = ProductEnvelope),
        (status = 400, description = "Payload vazio ou inválido"),
        (status = 403, description = "Produto de outro vendedor"),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "SKU já existe para o vendedor")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateProductPayload>, AppError>,
) -> Result<Json<ProductEnvelope>, AppError> {
    payload.validate().map_err(|e| AppError::invalid("product", e))?;

    // O preço opcional não passa pelo derive
    payload.validate_amounts().map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("price", e);
        AppError::invalid("product", errors)
    })?;

    let product = app_state.product_service.update(identity.uid, &id, payload).await?;

    Ok(Json(ProductEnvelope {
        product,
        message: Some("Product updated successfully".into()),
    }))
}

// ---
// Handler: delete_product
// ---
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto removido", body = ProductDeleted),
        (status = 403, description = "Produto de outro vendedor"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<ProductDeleted>, AppError> {
    let deleted_product = app_state.product_service.delete(identity.uid, &id).await?;
    Ok(Json(ProductDeleted {
        message: "Product deleted successfully".into(),
        deleted_product,
    }))
}

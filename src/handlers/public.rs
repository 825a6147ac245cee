// src/handlers/public.rs
//
// Vitrine pública: sem token.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::storefront::{CompanyProducts, CompanyProfile, ProductDetail},
};

#[utoipa::path(
    get,
    path = "/api/public/company/{companyId}",
    tag = "Public",
    params(("companyId" = String, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Empresa, dono e contagens", body = CompanyProfile),
        (status = 404, description = "Empresa não encontrada")
    )
)]
pub async fn get_company(
    State(app_state): State<AppState>,
    Path(company_id): Path<String>,
) -> Result<Json<CompanyProfile>, AppError> {
    let profile = app_state.public_service.company_profile(&company_id).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/api/public/company/{companyId}/products",
    tag = "Public",
    params(("companyId" = String, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Produtos ativos com locais e promoções", body = CompanyProducts),
        (status = 404, description = "Empresa não encontrada")
    )
)]
pub async fn get_company_products(
    State(app_state): State<AppState>,
    Path(company_id): Path<String>,
) -> Result<Json<CompanyProducts>, AppError> {
    let products = app_state.public_service.company_products(&company_id).await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/public/product/{productId}",
    tag = "Public",
    params(("productId" = String, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Detalhe público do produto", body = ProductDetail),
        (status = 404, description = "Produto não encontrado ou inativo")
    )
)]
pub async fn get_product_detail(
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<ProductDetail>, AppError> {
    let detail = app_state.public_service.product_detail(&product_id).await?;
    Ok(Json(detail))
}

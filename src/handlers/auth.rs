// src/handlers/auth.rs

use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{LoginPayload, LoginResponse, RegisterResponse, RegisterSellerPayload},
};

// Handler de registro de vendedor + empresa
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterSellerPayload,
    responses(
        (status = 200, description = "Vendedor registrado", body = RegisterResponse),
        (status = 400, description = "Payload inválido ou e-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterSellerPayload>, AppError>,
) -> Result<Json<RegisterResponse>, AppError> {
    payload.validate().map_err(|e| AppError::invalid("registration", e))?;

    let response = app_state.registration_service.register_seller(payload).await?;

    Ok(Json(response))
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token emitido", body = LoginResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginPayload>, AppError>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate().map_err(|e| AppError::invalid("login", e))?;

    let token = app_state.identity.sign_in(&payload.email, &payload.password).await?;
    let identity = app_state.identity.verify_token(&token).await?;

    tracing::info!(uid = %identity.uid, "Login realizado");
    Ok(Json(LoginResponse { token, uid: identity.uid }))
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Servidor no ar", body = String))
)]
pub async fn health() -> &'static str {
    "OK"
}

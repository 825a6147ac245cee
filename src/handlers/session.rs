// src/handlers/session.rs

use axum::{Json, extract::State};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::SessionResponse,
};

// Chamado pelo cliente logo após o login
#[utoipa::path(
    post,
    path = "/api/user/session",
    tag = "Session",
    responses(
        (status = 200, description = "Sessão criada", body = SessionResponse),
        (status = 400, description = "Dados do usuário fora do formato"),
        (status = 401, description = "Não autenticado"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_session(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<SessionResponse>, AppError> {
    let user = app_state.session_service.create_session(&identity).await?;
    Ok(Json(SessionResponse { user }))
}

#[utoipa::path(
    get,
    path = "/api/user/session",
    tag = "Session",
    responses(
        (status = 200, description = "Sessão atual", body = SessionResponse),
        (status = 401, description = "Não autenticado"),
        (status = 404, description = "Sessão não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_session(
    State(app_state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<SessionResponse>, AppError> {
    let user = app_state.session_service.current_session(&identity).await?;
    Ok(Json(SessionResponse { user }))
}

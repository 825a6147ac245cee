// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{common::error::AppError, config::AppState, models::auth::VerifiedIdentity};

// Prefixos liberados sem token. Tudo que não começa com /api/ também passa.
const PUBLIC_PREFIXES: &[&str] = &[
    "/api/public/",
    "/api/auth/register",
    "/api/auth/login",
    "/api/health",
];

pub fn is_public_path(path: &str) -> bool {
    !path.starts_with("/api/") || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

// O auth gate. Roda em todas as rotas; decide pelo path.
pub async fn auth_gate(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>() else {
        return Err(AppError::Unauthenticated("Authorization token is required".into()));
    };

    let identity = app_state.identity.verify_token(bearer.token()).await?;
    tracing::debug!(uid = %identity.uid, path = %request.uri().path(), "Token verificado");

    // Insere a identidade nos "extensions" da requisição
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

// Extrator para obter a identidade verificada diretamente nos handlers
pub struct AuthenticatedUser(pub VerifiedIdentity);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedIdentity>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| AppError::Unauthenticated("No user authentication context found".into()))
    }
}

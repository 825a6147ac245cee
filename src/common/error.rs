use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Toda resposta de erro sai no formato `{ statusCode, statusMessage }`.
#[derive(Debug, Error)]
pub enum AppError {
    // Payload ou parâmetros fora do contrato (400)
    #[error("{0}")]
    ValidationError(String),

    // Requisição inválida que não vem do validator (ex: payload vazio, datas)
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    // O recurso existe, mas pertence a outro vendedor
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    // Violação de unicidade (SKU, nome, título) no escopo do vendedor
    #[error("{0}")]
    Conflict(String),

    // Falha do provedor de identidade que não é um erro de token
    #[error("Erro do provedor de identidade: {0}")]
    ProviderError(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Achata os erros do `validator` em "Invalid <entity> data: msg1, msg2".
    pub fn invalid(entity: &str, errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"))
                })
            })
            .collect();

        // Erros de structs aninhadas (ex: position, company)
        for (field, kind) in errors.errors() {
            if let validator::ValidationErrorsKind::Struct(inner) = kind {
                for (inner_field, inner_errors) in inner.field_errors() {
                    for e in inner_errors {
                        messages.push(
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("{field}.{inner_field} is invalid")),
                        );
                    }
                }
            }
        }

        messages.sort();
        if messages.is_empty() {
            return AppError::ValidationError(format!("Invalid {entity} data"));
        }
        AppError::ValidationError(format!("Invalid {entity} data: {}", messages.join(", ")))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_)
            | AppError::TokenExpired
            | AppError::InvalidToken
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Corpo JSON malformado ou campo com tipo errado também vira 400 no nosso formato.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Query string rejeitada");
        AppError::ValidationError("Invalid query parameters".into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Erros 500 não vazam detalhes internos; o `tracing` registra a mensagem completa.
        let message = if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "statusCode": status.as_u16(),
            "statusMessage": message,
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(range(min = 0, message = "Quantity must be non-negative"))]
        quantity: i64,
    }

    #[test]
    fn flattens_validator_messages_with_entity_prefix() {
        let errors = Sample { name: String::new(), quantity: -1 }.validate().unwrap_err();
        let err = AppError::invalid("product", errors);
        assert_eq!(
            err.to_string(),
            "Invalid product data: Name is required, Quantity must be non-negative"
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn maps_taxonomy_to_status_codes() {
        assert_eq!(AppError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::ProviderError("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

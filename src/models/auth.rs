// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::company::Company;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Seller,
    Client,
}

// Conta no provedor de identidade (credenciais). Não é o documento do usuário.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

// Identidade verificada que o auth gate anexa à requisição
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub uid: Uuid,
    pub email: Option<String>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (uid da conta)
    pub email: String,
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}

// Documento do usuário (perfil), com o mesmo id da conta
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub role: Option<UserRole>,
    pub company_id: Option<Uuid>,
    pub is_active: bool,
    pub is_super_admin: bool,
    pub is_email_verified: bool,
    pub is_phone_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para registro de um vendedor + empresa
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSellerPayload {
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Telephone is required"))]
    pub telephone: String,

    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "Company RUC is required"))]
    pub company_ruc: String,
    #[validate(email(message = "Company corporate email is invalid"))]
    pub company_corporate_email: String,
    pub company_phone: Option<String>,
    pub company_address: Option<String>,
    pub company_industry: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub uid: Uuid,
    pub company_id: Uuid,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub uid: Uuid,
}

// --- Sessão ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionCompany {
    pub id: Uuid,
    #[validate(length(min = 1, message = "Company name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Company RUC is required"))]
    pub ruc: String,
    #[validate(length(min = 1, message = "Company corporate email is required"))]
    pub corporate_email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub industry: Option<String>,
    pub is_active: bool,
}

impl From<Company> for SessionCompany {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            ruc: company.ruc,
            corporate_email: company.corporate_email,
            phone: company.phone,
            address: company.address,
            industry: company.industry,
            is_active: company.is_active,
        }
    }
}

// O formato persistido como sessão do usuário
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    // Documentos antigos podem ter e-mails fora do RFC: só o tipo importa aqui
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub is_super_admin: bool,
    pub role: Option<UserRole>,
    pub is_active: bool,
    pub company_id: Option<Uuid>,
    #[validate(nested)]
    pub company: Option<SessionCompany>,
}

impl SessionUser {
    pub fn from_user(user: User, company: Option<SessionCompany>) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            telephone: user.telephone,
            is_super_admin: user.is_super_admin,
            role: user.role,
            is_active: user.is_active,
            company_id: user.company_id,
            company,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub user: SessionUser,
}

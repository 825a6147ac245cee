// src/db/store.rs
//
// Contratos de persistência. Os services só conhecem estes traits;
// quem implementa é o Postgres (repos) ou o `MemoryStore` (dev/testes).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{Account, SessionUser, User},
        company::Company,
        location::{Location, LocationFilter},
        product::{Product, ProductFilter},
        promotion::{Promotion, PromotionFilter},
    },
};

/// Um documento que pertence a um vendedor e tem uma chave única no escopo dele.
pub trait Document: Clone + Send + Sync + 'static {
    type Filter: Send + Sync;

    const KIND: &'static str;
    const NOT_FOUND_MESSAGE: &'static str;
    const FORBIDDEN_MESSAGE: &'static str;
    const CONFLICT_MESSAGE: &'static str;

    fn id(&self) -> Uuid;
    fn seller_id(&self) -> Uuid;
    /// SKU, nome ou título: único por vendedor.
    fn unique_key(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn matches(&self, filter: &Self::Filter) -> bool;
}

impl Document for Product {
    type Filter = ProductFilter;

    const KIND: &'static str = "product";
    const NOT_FOUND_MESSAGE: &'static str = "Product not found";
    const FORBIDDEN_MESSAGE: &'static str = "Access denied - Product belongs to another seller";
    const CONFLICT_MESSAGE: &'static str = "Product with this SKU already exists";

    fn id(&self) -> Uuid {
        self.id
    }
    fn seller_id(&self) -> Uuid {
        self.seller_id
    }
    fn unique_key(&self) -> &str {
        &self.sku
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn matches(&self, filter: &ProductFilter) -> bool {
        filter.seller_id.is_none_or(|s| s == self.seller_id)
            && filter.category.as_deref().is_none_or(|c| c == self.category)
            && filter.is_active.is_none_or(|a| a == self.is_active)
    }
}

impl Document for Location {
    type Filter = LocationFilter;

    const KIND: &'static str = "location";
    const NOT_FOUND_MESSAGE: &'static str = "Location not found";
    const FORBIDDEN_MESSAGE: &'static str = "Location does not belong to this user";
    const CONFLICT_MESSAGE: &'static str = "Location name already exists";

    fn id(&self) -> Uuid {
        self.id
    }
    fn seller_id(&self) -> Uuid {
        self.seller_id
    }
    fn unique_key(&self) -> &str {
        &self.name
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn matches(&self, filter: &LocationFilter) -> bool {
        filter.seller_id.is_none_or(|s| s == self.seller_id)
            && filter.product_id.is_none_or(|p| p == self.product_id)
            && filter.is_active.is_none_or(|a| a == self.is_active)
    }
}

impl Document for Promotion {
    type Filter = PromotionFilter;

    const KIND: &'static str = "promotion";
    const NOT_FOUND_MESSAGE: &'static str = "Promotion not found";
    const FORBIDDEN_MESSAGE: &'static str = "Promotion does not belong to this user";
    const CONFLICT_MESSAGE: &'static str = "Promotion title already exists";

    fn id(&self) -> Uuid {
        self.id
    }
    fn seller_id(&self) -> Uuid {
        self.seller_id
    }
    fn unique_key(&self) -> &str {
        &self.title
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn matches(&self, filter: &PromotionFilter) -> bool {
        filter.seller_id.is_none_or(|s| s == self.seller_id)
            && filter.product_id.is_none_or(|p| p == self.product_id)
            && filter.is_active.is_none_or(|a| a == self.is_active)
    }
}

// ---
// Coleções de documentos do vendedor
// ---

#[async_trait]
pub trait DocumentStore<T: Document>: Send + Sync {
    /// Falha com `Conflict` se a chave única já existir para o vendedor.
    async fn insert(&self, doc: &T) -> Result<(), AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, AppError>;

    /// Consulta prévia de unicidade. `exclude` ignora o próprio documento num update.
    async fn exists_for_seller(
        &self,
        seller_id: Uuid,
        key: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError>;

    /// Página ordenada por `created_at` decrescente.
    async fn list_page(&self, filter: &T::Filter, offset: u64, limit: u64) -> Result<Vec<T>, AppError>;

    async fn count(&self, filter: &T::Filter) -> Result<u64, AppError>;

    /// Coleção inteira que casa com o filtro (agregações e vitrine).
    async fn list_all(&self, filter: &T::Filter) -> Result<Vec<T>, AppError>;

    /// Regrava o documento inteiro. Também respeita a unicidade.
    async fn update(&self, doc: &T) -> Result<(), AppError>;

    /// `false` se não havia nada para apagar.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

pub type ProductStore = Arc<dyn DocumentStore<Product>>;
pub type LocationStore = Arc<dyn DocumentStore<Location>>;
pub type PromotionStore = Arc<dyn DocumentStore<Promotion>>;

// ---
// Usuários, empresas e sessões
// ---

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_company(&self, id: Uuid) -> Result<Option<Company>, AppError>;

    /// Grava empresa e usuário juntos: ou os dois existem, ou nenhum.
    async fn create_seller(&self, user: &User, company: &Company) -> Result<(), AppError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save_session(&self, session: &SessionUser) -> Result<(), AppError>;
    async fn find_session(&self, user_id: Uuid) -> Result<Option<SessionUser>, AppError>;
}

// Credenciais do provedor de identidade local
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;
    async fn insert_account(&self, account: &Account) -> Result<(), AppError>;
    async fn delete_account(&self, id: Uuid) -> Result<bool, AppError>;
    async fn list_accounts(&self) -> Result<Vec<Account>, AppError>;
}

/// Violação de UNIQUE no Postgres vira `Conflict`; o resto segue como erro de banco.
pub(crate) fn unique_violation_as(message: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AppError::Conflict(message.to_string());
            }
        }
        e.into()
    }
}

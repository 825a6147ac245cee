// src/db/memory.rs
//
// Backend em memória (STORAGE_BACKEND=memory). Usado em desenvolvimento e nos
// testes de integração. A checagem de unicidade e a escrita acontecem sob o
// mesmo write lock, então duas criações concorrentes não duplicam a chave.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{AccountStore, Document, DocumentStore, SessionStore, UserStore},
    models::{
        auth::{Account, SessionUser, User},
        company::Company,
        location::Location,
        product::Product,
        promotion::Promotion,
    },
};

pub struct MemoryCollection<T: Document> {
    docs: RwLock<HashMap<Uuid, T>>,
}

impl<T: Document> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self { docs: RwLock::new(HashMap::new()) }
    }
}

impl<T: Document> MemoryCollection<T> {
    fn key_taken(docs: &HashMap<Uuid, T>, doc: &T) -> bool {
        docs.values().any(|other| {
            other.id() != doc.id()
                && other.seller_id() == doc.seller_id()
                && other.unique_key() == doc.unique_key()
        })
    }

    // Mesma ordem do Postgres: created_at DESC, id ASC
    async fn sorted(&self, filter: &T::Filter) -> Vec<T> {
        let docs = self.docs.read().await;
        let mut matching: Vec<T> = docs.values().filter(|d| d.matches(filter)).cloned().collect();
        matching.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        matching
    }
}

#[async_trait]
impl<T: Document> DocumentStore<T> for MemoryCollection<T> {
    async fn insert(&self, doc: &T) -> Result<(), AppError> {
        let mut docs = self.docs.write().await;
        if Self::key_taken(&docs, doc) {
            return Err(AppError::Conflict(T::CONFLICT_MESSAGE.to_string()));
        }
        docs.insert(doc.id(), doc.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, AppError> {
        Ok(self.docs.read().await.get(&id).cloned())
    }

    async fn exists_for_seller(
        &self,
        seller_id: Uuid,
        key: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let docs = self.docs.read().await;
        Ok(docs.values().any(|d| {
            d.seller_id() == seller_id && d.unique_key() == key && Some(d.id()) != exclude
        }))
    }

    async fn list_page(&self, filter: &T::Filter, offset: u64, limit: u64) -> Result<Vec<T>, AppError> {
        Ok(self
            .sorted(filter)
            .await
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, filter: &T::Filter) -> Result<u64, AppError> {
        let docs = self.docs.read().await;
        Ok(docs.values().filter(|d| d.matches(filter)).count() as u64)
    }

    async fn list_all(&self, filter: &T::Filter) -> Result<Vec<T>, AppError> {
        Ok(self.sorted(filter).await)
    }

    async fn update(&self, doc: &T) -> Result<(), AppError> {
        let mut docs = self.docs.write().await;
        if !docs.contains_key(&doc.id()) {
            return Err(AppError::NotFound(T::NOT_FOUND_MESSAGE.to_string()));
        }
        if Self::key_taken(&docs, doc) {
            return Err(AppError::Conflict(T::CONFLICT_MESSAGE.to_string()));
        }
        docs.insert(doc.id(), doc.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.docs.write().await.remove(&id).is_some())
    }
}

// Usuários e empresas ficam sob o mesmo lock para que `create_seller` seja atômico.
#[derive(Default)]
struct Directory {
    users: HashMap<Uuid, User>,
    companies: HashMap<Uuid, Company>,
}

#[derive(Default)]
pub struct MemoryStore {
    pub products: Arc<MemoryCollection<Product>>,
    pub locations: Arc<MemoryCollection<Location>>,
    pub promotions: Arc<MemoryCollection<Promotion>>,
    directory: RwLock<Directory>,
    sessions: RwLock<HashMap<Uuid, SessionUser>>,
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.directory.read().await.users.get(&id).cloned())
    }

    async fn find_company(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        Ok(self.directory.read().await.companies.get(&id).cloned())
    }

    async fn create_seller(&self, user: &User, company: &Company) -> Result<(), AppError> {
        let mut directory = self.directory.write().await;
        if directory.users.contains_key(&user.id) || directory.companies.contains_key(&company.id) {
            return Err(AppError::Conflict("User already registered".into()));
        }
        directory.users.insert(user.id, user.clone());
        directory.companies.insert(company.id, company.clone());
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn save_session(&self, session: &SessionUser) -> Result<(), AppError> {
        self.sessions.write().await.insert(session.id, session.clone());
        Ok(())
    }

    async fn find_session(&self, user_id: Uuid) -> Result<Option<SessionUser>, AppError> {
        Ok(self.sessions.read().await.get(&user_id).cloned())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn insert_account(&self, account: &Account) -> Result<(), AppError> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(AppError::Conflict("An account with this email already exists.".into()));
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn delete_account(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.accounts.write().await.remove(&id).is_some())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        let mut accounts: Vec<Account> = self.accounts.read().await.values().cloned().collect();
        accounts.sort_by_key(|a| a.created_at);
        Ok(accounts)
    }
}

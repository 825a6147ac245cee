// src/services/identity.rs
//
// Provedor de identidade: emite e verifica os bearer tokens e guarda as
// credenciais. O resto da aplicação só conhece o trait.

use std::sync::Arc;

use async_trait::async_trait;
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AccountStore,
    models::auth::{Account, Claims, VerifiedIdentity},
};

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `TokenExpired` / `InvalidToken` para tokens ruins.
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, AppError>;
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;
    async fn create_account(&self, email: &str, password: &str) -> Result<Uuid, AppError>;
    async fn delete_account(&self, uid: Uuid) -> Result<(), AppError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, AppError>;
    async fn list_accounts(&self) -> Result<Vec<Account>, AppError>;
}

// Falhas do store de credenciais viram `ProviderError` (500), exceto as já classificadas.
fn provider_failure(err: AppError) -> AppError {
    match err {
        AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
            AppError::ProviderError(err.to_string())
        }
        other => other,
    }
}

#[derive(Clone)]
pub struct LocalIdentityProvider {
    accounts: Arc<dyn AccountStore>,
    jwt_secret: String,
    token_ttl: Duration,
    hash_cost: u32,
}

impl LocalIdentityProvider {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        jwt_secret: String,
        token_ttl: Duration,
        hash_cost: u32,
    ) -> Self {
        Self { accounts, jwt_secret, token_ttl, hash_cost }
    }

    fn create_token(&self, account: &Account) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: account.id,
            email: account.email.clone(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })?;

        Ok(VerifiedIdentity {
            uid: token_data.claims.sub,
            email: Some(token_data.claims.email),
        })
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        self.accounts.find_account_by_email(email).await.map_err(provider_failure)
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Uuid, AppError> {
        // bcrypt é CPU-bound: fora do runtime async
        let password = password.to_owned();
        let cost = self.hash_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            password_hash,
            created_at: Utc::now(),
        };
        self.accounts.insert_account(&account).await.map_err(provider_failure)?;
        Ok(account.id)
    }

    async fn delete_account(&self, uid: Uuid) -> Result<(), AppError> {
        self.accounts.delete_account(uid).await.map_err(provider_failure)?;
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<String, AppError> {
        let account = self
            .find_account_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = password.to_owned();
        let password_hash = account.password_hash.clone();
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(&account)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        self.accounts.list_accounts().await.map_err(provider_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn provider(ttl: Duration) -> LocalIdentityProvider {
        LocalIdentityProvider::new(
            Arc::new(MemoryStore::new()),
            "test-secret".into(),
            ttl,
            4,
        )
    }

    #[tokio::test]
    async fn sign_in_issues_a_token_that_verifies() {
        let idp = provider(Duration::hours(1));
        let uid = idp.create_account("ana@shop.test", "secret1").await.unwrap();

        let token = idp.sign_in("ana@shop.test", "secret1").await.unwrap();
        let identity = idp.verify_token(&token).await.unwrap();
        assert_eq!(identity.uid, uid);
        assert_eq!(identity.email.as_deref(), Some("ana@shop.test"));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let idp = provider(Duration::hours(1));
        idp.create_account("ana@shop.test", "secret1").await.unwrap();
        let err = idp.sign_in("ana@shop.test", "nope").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn expired_and_garbage_tokens_are_classified() {
        // Bem além do leeway padrão de 60s do jsonwebtoken
        let idp = provider(Duration::hours(-1));
        idp.create_account("ana@shop.test", "secret1").await.unwrap();
        let token = idp.sign_in("ana@shop.test", "secret1").await.unwrap();

        assert!(matches!(idp.verify_token(&token).await, Err(AppError::TokenExpired)));
        assert!(matches!(idp.verify_token("not.a.jwt").await, Err(AppError::InvalidToken)));
    }
}

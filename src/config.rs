// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::{Context, bail};
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{
        AccountRepository, AccountStore, LocationRepository, LocationStore, MemoryStore,
        ProductRepository, ProductStore, PromotionRepository, PromotionStore, SessionStore,
        UserRepository, UserStore,
    },
    services::{
        identity::{IdentityProvider, LocalIdentityProvider},
        location_service::LocationService,
        product_service::ProductService,
        promotion_service::PromotionService,
        public_service::PublicService,
        registration_service::RegistrationService,
        session_service::SessionService,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub db_max_connections: u32,
    /// 0 desliga a reconciliação de contas órfãs.
    pub orphan_reconcile_secs: u64,
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            storage: StorageBackend::Memory,
            database_url: None,
            jwt_secret: "dev-secret-key".into(),
            token_ttl_hours: 1,
            db_max_connections: 5,
            orphan_reconcile_secs: 300,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{key} tem um valor inválido: {raw}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let storage = match env::var("STORAGE_BACKEND").as_deref() {
            Ok("memory") => StorageBackend::Memory,
            Ok("postgres") | Err(_) => StorageBackend::Postgres,
            Ok(other) => bail!("STORAGE_BACKEND desconhecido: {other}"),
        };

        let database_url = env::var("DATABASE_URL").ok();
        let jwt_secret = match (env::var("JWT_SECRET"), storage) {
            (Ok(secret), _) => secret,
            (Err(_), StorageBackend::Memory) => defaults.jwt_secret,
            (Err(_), StorageBackend::Postgres) => bail!("JWT_SECRET deve ser definido"),
        };
        if storage == StorageBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL deve ser definida");
        }

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            storage,
            database_url,
            jwt_secret,
            token_ttl_hours: env_or("TOKEN_TTL_HOURS", defaults.token_ttl_hours)?,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            orphan_reconcile_secs: env_or("ORPHAN_RECONCILE_SECS", defaults.orphan_reconcile_secs)?,
            bcrypt_cost: env_or("BCRYPT_COST", defaults.bcrypt_cost)?,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: Option<PgPool>,
    pub identity: Arc<dyn IdentityProvider>,
    pub product_service: ProductService,
    pub location_service: LocationService,
    pub promotion_service: PromotionService,
    pub public_service: PublicService,
    pub session_service: SessionService,
    pub registration_service: RegistrationService,
}

// Os stores concretos que cada backend entrega
struct Stores {
    products: ProductStore,
    locations: LocationStore,
    promotions: PromotionStore,
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    accounts: Arc<dyn AccountStore>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        match config.storage {
            StorageBackend::Memory => Ok(Self::in_memory(config)),
            StorageBackend::Postgres => {
                let database_url = config
                    .database_url
                    .clone()
                    .context("DATABASE_URL deve ser definida")?;

                let db_pool = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(&database_url)
                    .await?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                let users = Arc::new(UserRepository::new(db_pool.clone()));
                let stores = Stores {
                    products: Arc::new(ProductRepository::new(db_pool.clone())),
                    locations: Arc::new(LocationRepository::new(db_pool.clone())),
                    promotions: Arc::new(PromotionRepository::new(db_pool.clone())),
                    users: users.clone(),
                    sessions: users,
                    accounts: Arc::new(AccountRepository::new(db_pool.clone())),
                };
                Ok(Self::assemble(config, Some(db_pool), stores))
            }
        }
    }

    /// Tudo em memória: sem banco, sem migrações. Usado nos testes.
    pub fn in_memory(config: Config) -> Self {
        let memory = Arc::new(MemoryStore::new());
        let stores = Stores {
            products: memory.products.clone(),
            locations: memory.locations.clone(),
            promotions: memory.promotions.clone(),
            users: memory.clone(),
            sessions: memory.clone(),
            accounts: memory,
        };
        Self::assemble(config, None, stores)
    }

    // --- Monta o gráfico de dependências ---
    fn assemble(config: Config, db_pool: Option<PgPool>, stores: Stores) -> Self {
        let identity: Arc<dyn IdentityProvider> = Arc::new(LocalIdentityProvider::new(
            stores.accounts,
            config.jwt_secret.clone(),
            chrono::Duration::hours(config.token_ttl_hours),
            config.bcrypt_cost,
        ));

        let product_service = ProductService::new(stores.products);
        let location_service = LocationService::new(stores.locations, product_service.clone());
        let promotion_service = PromotionService::new(stores.promotions, product_service.clone());
        let public_service = PublicService::new(
            stores.users.clone(),
            product_service.clone(),
            location_service.clone(),
            promotion_service.clone(),
        );
        let session_service = SessionService::new(stores.users.clone(), stores.sessions);
        let registration_service = RegistrationService::new(identity.clone(), stores.users);

        Self {
            config: Arc::new(config),
            db_pool,
            identity,
            product_service,
            location_service,
            promotion_service,
            public_service,
            session_service,
            registration_service,
        }
    }
}

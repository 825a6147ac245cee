pub mod store;
pub use store::{
    AccountStore, Document, DocumentStore, LocationStore, ProductStore, PromotionStore,
    SessionStore, UserStore,
};

pub mod memory;
pub use memory::MemoryStore;

pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod location_repo;
pub use location_repo::LocationRepository;
pub mod promotion_repo;
pub use promotion_repo::PromotionRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod account_repo;
pub use account_repo::AccountRepository;

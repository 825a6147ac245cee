pub mod auth;
pub mod locations;
pub mod products;
pub mod promotions;
pub mod public;
pub mod session;

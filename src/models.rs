pub mod auth;
pub mod company;
pub mod location;
pub mod product;
pub mod promotion;
pub mod storefront;

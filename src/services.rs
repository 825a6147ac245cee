pub mod identity;
pub mod location_service;
pub mod product_service;
pub mod promotion_service;
pub mod public_service;
pub mod registration_service;
pub mod session_service;
pub mod statistics;

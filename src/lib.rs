// src/lib.rs

use axum::{
    Json, Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{config::AppState, docs::ApiDoc, middleware::auth::auth_gate};

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Monta o router completo. O auth gate roda em tudo e libera os prefixos públicos.
pub fn build_router(app_state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let session_routes = Router::new().route(
        "/session",
        post(handlers::session::create_session).get(handlers::session::get_session),
    );

    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route("/count", get(handlers::products::count_products))
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        );

    let location_routes = Router::new()
        .route(
            "/",
            post(handlers::locations::create_location).get(handlers::locations::list_locations),
        )
        .route("/count", get(handlers::locations::count_locations))
        .route(
            "/{id}",
            get(handlers::locations::get_location)
                .put(handlers::locations::update_location)
                .delete(handlers::locations::delete_location),
        );

    let promotion_routes = Router::new()
        .route(
            "/",
            post(handlers::promotions::create_promotion)
                .get(handlers::promotions::list_promotions),
        )
        .route("/count", get(handlers::promotions::count_promotions))
        .route(
            "/{id}",
            get(handlers::promotions::get_promotion)
                .put(handlers::promotions::update_promotion)
                .delete(handlers::promotions::delete_promotion),
        );

    let public_routes = Router::new()
        .route("/company/{companyId}", get(handlers::public::get_company))
        .route(
            "/company/{companyId}/products",
            get(handlers::public::get_company_products),
        )
        .route("/product/{productId}", get(handlers::public::get_product_detail));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(handlers::auth::health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/auth", auth_routes)
        .nest("/api/user", session_routes)
        .nest("/api/products", product_routes)
        .nest("/api/locations", location_routes)
        .nest("/api/promotions", promotion_routes)
        .nest("/api/public", public_routes)
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_gate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

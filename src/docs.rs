// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::common;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::health,

        // --- Session ---
        handlers::session::create_session,
        handlers::session::get_session,

        // --- Products ---
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::count_products,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Locations ---
        handlers::locations::create_location,
        handlers::locations::list_locations,
        handlers::locations::count_locations,
        handlers::locations::get_location,
        handlers::locations::update_location,
        handlers::locations::delete_location,

        // --- Promotions ---
        handlers::promotions::create_promotion,
        handlers::promotions::list_promotions,
        handlers::promotions::count_promotions,
        handlers::promotions::get_promotion,
        handlers::promotions::update_promotion,
        handlers::promotions::delete_promotion,

        // --- Public ---
        handlers::public::get_company,
        handlers::public::get_company_products,
        handlers::public::get_product_detail,
    ),
    components(
        schemas(
            common::pagination::Pagination,

            // --- Auth ---
            models::auth::UserRole,
            models::auth::RegisterSellerPayload,
            models::auth::RegisterResponse,
            models::auth::LoginPayload,
            models::auth::LoginResponse,
            models::auth::SessionCompany,
            models::auth::SessionUser,
            models::auth::SessionResponse,

            // --- Products ---
            models::product::Product,
            models::product::CreateProductPayload,
            models::product::UpdateProductPayload,
            models::product::ProductEnvelope,
            models::product::ProductList,
            models::product::DeletedProduct,
            models::product::ProductDeleted,
            models::product::ProductCountQuery,
            models::product::ProductHealthScore,
            models::product::ProductStatistics,
            models::product::ProductStatisticsResponse,

            // --- Locations ---
            models::location::Position,
            models::location::Location,
            models::location::CreateLocationPayload,
            models::location::UpdateLocationPayload,
            models::location::LocationEnvelope,
            models::location::LocationList,
            models::location::DeletedLocation,
            models::location::LocationDeleted,
            models::location::LocationCoverage,
            models::location::LocationHealthScore,
            models::location::LocationStatistics,
            models::location::LocationStatisticsResponse,

            // --- Promotions ---
            models::promotion::DiscountType,
            models::promotion::PromotionStatus,
            models::promotion::Promotion,
            models::promotion::CreatePromotionPayload,
            models::promotion::UpdatePromotionPayload,
            models::promotion::PromotionEnvelope,
            models::promotion::PromotionList,
            models::promotion::DeletedPromotion,
            models::promotion::PromotionDeleted,
            models::promotion::DiscountTypeCounts,
            models::promotion::PromotionHealthScore,
            models::promotion::PromotionStatistics,
            models::promotion::PromotionStatisticsResponse,

            // --- Public ---
            models::storefront::PublicCompany,
            models::storefront::OwnerInfo,
            models::storefront::CompanyStats,
            models::storefront::CompanyProfile,
            models::storefront::StorefrontLocation,
            models::storefront::StorefrontPromotion,
            models::storefront::StorefrontProductSummary,
            models::storefront::StorefrontProductStats,
            models::storefront::StorefrontProduct,
            models::storefront::CompanyProducts,
            models::storefront::StorefrontCompany,
            models::storefront::ProductDetailStats,
            models::storefront::ProductDetail,
        )
    ),
    tags(
        (name = "Auth", description = "Registro de vendedores e login"),
        (name = "Session", description = "Sessão do usuário no servidor"),
        (name = "Products", description = "Catálogo do vendedor"),
        (name = "Locations", description = "Locais físicos dos produtos"),
        (name = "Promotions", description = "Promoções dos produtos"),
        (name = "Public", description = "Vitrine pública (sem token)"),
        (name = "Health", description = "Verificação de saúde")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_resource_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/products",
            "/api/products/count",
            "/api/products/{id}",
            "/api/locations/{id}",
            "/api/promotions/count",
            "/api/public/company/{companyId}/products",
            "/api/user/session",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltou {path}");
        }
        let schemes = doc.components.expect("components").security_schemes;
        assert!(schemes.contains_key("api_jwt"));
    }
}

// tests/api_tests.rs
//
// Exercita o router inteiro contra o backend em memória.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use shelfmark::{
    build_router,
    config::{AppState, Config, StorageBackend},
    models::auth::Claims,
};

const SECRET: &str = "test-secret";

fn test_app() -> Router {
    let config = Config {
        storage: StorageBackend::Memory,
        jwt_secret: SECRET.into(),
        bcrypt_cost: 4,
        orphan_reconcile_secs: 0,
        ..Config::default()
    };
    build_router(AppState::in_memory(config))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

struct Seller {
    token: String,
    uid: String,
    company_id: String,
}

async fn register_and_login(app: &Router, email: &str) -> Seller {
    let (status, registered) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "secret1",
            "firstName": "Ana",
            "lastName": "Lima",
            "telephone": "+595 981 000000",
            "companyName": format!("Shop of {email}"),
            "companyRuc": "80012345-6",
            "companyCorporateEmail": "contact@shop.test",
            "companyIndustry": "Retail"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{registered}");

    let (status, login) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{login}");

    Seller {
        token: login["token"].as_str().unwrap().to_owned(),
        uid: login["uid"].as_str().unwrap().to_owned(),
        company_id: registered["companyId"].as_str().unwrap().to_owned(),
    }
}

fn product_body(sku: &str) -> Value {
    json!({
        "name": format!("Product {sku}"),
        "description": "A shelf item",
        "price": 12.5,
        "quantity": 30,
        "sku": sku,
        "category": "Tools"
    })
}

async fn create_product(app: &Router, token: &str, sku: &str) -> String {
    let (status, body) = send(app, "POST", "/api/products", Some(token), Some(product_body(sku))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["product"]["id"].as_str().unwrap().to_owned()
}

fn location_body(product_id: &str, name: &str) -> Value {
    json!({
        "name": name,
        "description": "Front of the store",
        "productId": product_id,
        "zone": "A",
        "section": "1",
        "aisle": "3",
        "position": { "x": 1.0, "y": 2.0 }
    })
}

#[tokio::test]
async fn health_and_openapi_are_public() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");

    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/products"].is_object());
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/api/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["statusCode"], 401);
    assert_eq!(body["statusMessage"], "Authorization token is required");

    let (status, body) = send(&app, "GET", "/api/products", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["statusMessage"], "Invalid token format");

    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: Uuid::new_v4(),
        email: "late@shop.test".into(),
        exp: now - 3600,
        iat: now - 7200,
    };
    let expired = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_ref())).unwrap();
    let (status, body) = send(&app, "GET", "/api/products", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["statusMessage"], "Token expired");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = test_app();
    register_and_login(&app, "ana@shop.test").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ana@shop.test", "password": "wrong-one" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["statusMessage"], "Invalid email or password");
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let app = test_app();
    register_and_login(&app, "dup@shop.test").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "dup@shop.test",
            "password": "secret1",
            "firstName": "Ana",
            "lastName": "Lima",
            "telephone": "1",
            "companyName": "Other",
            "companyRuc": "1",
            "companyCorporateEmail": "other@shop.test"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusMessage"], "An account with this email already exists.");
}

#[tokio::test]
async fn products_of_another_seller_are_forbidden() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    let bob = register_and_login(&app, "bob@shop.test").await;

    let product_id = create_product(&app, &alice.token, "SKU-1").await;

    let uri = format!("/api/products/{product_id}");
    let (status, body) = send(&app, "GET", &uri, Some(&bob.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["statusMessage"], "Access denied - Product belongs to another seller");

    let (status, _) = send(&app, "DELETE", &uri, Some(&bob.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Continua intacto para a dona
    let (status, body) = send(&app, "GET", &uri, Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["sku"], "SKU-1");
    assert_eq!(body["product"]["sellerId"], alice.uid.as_str());
}

#[tokio::test]
async fn sku_is_unique_per_seller_only() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    let bob = register_and_login(&app, "bob@shop.test").await;

    create_product(&app, &alice.token, "SKU-1").await;

    let (status, body) = send(&app, "POST", "/api/products", Some(&alice.token), Some(product_body("SKU-1"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["statusMessage"], "Product with this SKU already exists");

    // Outro vendedor pode repetir o SKU
    create_product(&app, &bob.token, "SKU-1").await;
}

#[tokio::test]
async fn invalid_product_payload_lists_messages() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;

    let mut body = product_body("SKU-X");
    body["quantity"] = json!(-1);
    let (status, body) = send(&app, "POST", "/api/products", Some(&alice.token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusMessage"], "Invalid product data: Quantity must be between 0 and 1000000000");
}

#[tokio::test]
async fn product_update_requires_some_field() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    let product_id = create_product(&app, &alice.token, "SKU-1").await;
    let uri = format!("/api/products/{product_id}");

    let (status, body) = send(&app, "PUT", &uri, Some(&alice.token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusMessage"], "No valid fields provided for update");

    let (status, body) = send(&app, "PUT", &uri, Some(&alice.token), Some(json!({ "quantity": 3 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["quantity"], 3);
    assert_eq!(body["message"], "Product updated successfully");
}

#[tokio::test]
async fn product_list_paginates() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    for i in 0..15 {
        create_product(&app, &alice.token, &format!("SKU-{i:02}")).await;
    }

    let (status, body) = send(&app, "GET", "/api/products?page=2&limit=10", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"].as_array().unwrap().len(), 5);
    assert_eq!(body["pagination"]["total"], 15);
    assert_eq!(body["pagination"]["totalPages"], 2);
    assert_eq!(body["pagination"]["hasNext"], false);
    assert_eq!(body["pagination"]["hasPrev"], true);

    let (status, _) = send(&app, "GET", "/api/products?limit=500", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/products?isActive=maybe", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusMessage"], "Invalid query parameters");
}

#[tokio::test]
async fn product_count_reports_statistics() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    create_product(&app, &alice.token, "SKU-1").await;

    let mut low = product_body("SKU-2");
    low["quantity"] = json!(2);
    let (status, _) = send(&app, "POST", "/api/products", Some(&alice.token), Some(low)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/products/count", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let stats = &body["statistics"];
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["active"], 2);
    assert_eq!(stats["lowStock"], 1);
    assert_eq!(stats["totalQuantity"], 32);
    assert_eq!(stats["categories"]["Tools"], 2);
    assert_eq!(stats["healthScore"]["stockHealth"], 50);
}

#[tokio::test]
async fn location_delete_checks_owner() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    let bob = register_and_login(&app, "bob@shop.test").await;
    let product_id = create_product(&app, &alice.token, "SKU-1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/locations",
        Some(&alice.token),
        Some(location_body(&product_id, "Front shelf")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let location_id = body["location"]["id"].as_str().unwrap().to_owned();
    let uri = format!("/api/locations/{location_id}");

    let (status, body) = send(&app, "DELETE", &uri, Some(&bob.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["statusMessage"], "Location does not belong to this user");

    let missing = format!("/api/locations/{}", Uuid::new_v4());
    let (status, body) = send(&app, "DELETE", &missing, Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["statusMessage"], "Location not found");

    let (status, body) = send(&app, "GET", &uri, Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"]["name"], "Front shelf");

    let (status, body) = send(&app, "DELETE", &uri, Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedLocation"]["id"], location_id.as_str());
}

#[tokio::test]
async fn location_needs_an_owned_product() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    let bob = register_and_login(&app, "bob@shop.test").await;
    let product_id = create_product(&app, &alice.token, "SKU-1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/locations",
        Some(&bob.token),
        Some(location_body(&product_id, "Back shelf")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["statusMessage"], "Product does not belong to this user");
}

#[tokio::test]
async fn promotion_dates_must_be_ordered() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    let product_id = create_product(&app, &alice.token, "SKU-1").await;

    let promotion = |start: &str, end: &str| {
        json!({
            "title": "Summer",
            "description": "Summer sale",
            "message": "10% off",
            "productId": product_id,
            "discountType": "percentage",
            "discountValue": 10,
            "startDate": start,
            "endDate": end
        })
    };

    let (status, body) = send(
        &app,
        "POST",
        "/api/promotions",
        Some(&alice.token),
        Some(promotion("2030-02-01", "2030-01-01")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusMessage"], "End date must be after start date");

    let (status, body) = send(
        &app,
        "POST",
        "/api/promotions",
        Some(&alice.token),
        Some(promotion("2030-01-01", "2030-02-01")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["promotion"]["discountType"], "percentage");

    let (status, body) = send(&app, "GET", "/api/promotions/count", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statistics"]["total"], 1);
    assert_eq!(body["statistics"]["upcoming"], 1);
}

#[tokio::test]
async fn public_storefront_reads() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    let product_id = create_product(&app, &alice.token, "SKU-1").await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/locations",
        Some(&alice.token),
        Some(location_body(&product_id, "Front shelf")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &format!("/api/public/company/{}", Uuid::new_v4()), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["statusMessage"], "Company not found");

    let uri = format!("/api/public/company/{}", alice.company_id);
    let (status, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["totalProducts"], 1);
    assert_eq!(body["stats"]["totalLocations"], 1);
    assert_eq!(body["owner"]["id"], alice.uid.as_str());

    let (status, body) = send(&app, "GET", &format!("{uri}/products"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalProducts"], 1);
    assert_eq!(body["products"][0]["locations"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", &format!("/api/public/product/{product_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company"]["id"], alice.company_id.as_str());
    assert_eq!(body["stats"]["hasLocations"], true);
}

#[tokio::test]
async fn session_is_created_then_read_back() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;

    let (status, body) = send(&app, "GET", "/api/user/session", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["statusMessage"], "Session not found");

    let (status, created) = send(&app, "POST", "/api/user/session", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["user"]["id"], alice.uid.as_str());
    assert_eq!(created["user"]["company"]["id"], alice.company_id.as_str());

    let (status, current) = send(&app, "GET", "/api/user/session", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current, created);
}

fn promotion_body(product_id: &str, title: &str, start: &str, end: &str) -> Value {
    json!({
        "title": title,
        "description": "Seasonal sale",
        "message": "10% off",
        "productId": product_id,
        "discountType": "percentage",
        "discountValue": 10,
        "startDate": start,
        "endDate": end
    })
}

async fn create_promotion(app: &Router, token: &str, body: Value) -> String {
    let (status, body) = send(app, "POST", "/api/promotions", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["promotion"]["id"].as_str().unwrap().to_owned()
}

async fn create_location(app: &Router, token: &str, product_id: &str, name: &str) -> String {
    let (status, body) = send(app, "POST", "/api/locations", Some(token), Some(location_body(product_id, name))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["location"]["id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn product_amounts_are_bounded_and_count_survives_large_values() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;

    let mut body = product_body("SKU-BIG");
    body["price"] = json!(1e10);
    let (status, body) = send(&app, "POST", "/api/products", Some(&alice.token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusMessage"], "Invalid product data: Price must be at most 9999999999.99");

    let mut body = product_body("SKU-BIG");
    body["quantity"] = json!(9_000_000_000_000_000_000_i64);
    let (status, body) = send(&app, "POST", "/api/products", Some(&alice.token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusMessage"], "Invalid product data: Quantity must be between 0 and 1000000000");

    // Os maiores valores aceitos ainda somam sem estourar
    for sku in ["SKU-MAX-1", "SKU-MAX-2"] {
        let mut body = product_body(sku);
        body["price"] = json!(9_999_999_999.99);
        body["quantity"] = json!(1_000_000_000);
        body["stockAlert"] = json!(1_000_000_000);
        let (status, body) = send(&app, "POST", "/api/products", Some(&alice.token), Some(body)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let (status, body) = send(&app, "GET", "/api/products/count", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["statistics"]["total"], 2);
    assert_eq!(body["statistics"]["totalQuantity"], 2_000_000_000_i64);

    let product_id = create_product(&app, &alice.token, "SKU-1").await;
    let mut promotion = promotion_body(&product_id, "Huge", "2030-01-01", "2030-02-01");
    promotion["maxUses"] = json!(i64::MAX);
    let (status, body) = send(&app, "POST", "/api/promotions", Some(&alice.token), Some(promotion)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusMessage"], "Invalid promotion data: Max uses must be between 1 and 1000000000");
}

#[tokio::test]
async fn huge_page_numbers_are_rejected() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;

    for uri in [
        "/api/products?page=18446744073709551615&limit=100",
        "/api/locations?page=18446744073709551615&limit=100",
        "/api/promotions?page=92233720368547759&limit=100",
    ] {
        let (status, body) = send(&app, "GET", uri, Some(&alice.token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["statusMessage"], "Invalid query parameters");
    }

    let (status, body) = send(&app, "GET", "/api/products?page=92233720368547758&limit=100", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"].as_array().unwrap().len(), 0);
    assert_eq!(body["pagination"]["hasNext"], false);
}

#[tokio::test]
async fn search_narrows_the_page_but_not_the_total() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    for i in 0..15 {
        create_product(&app, &alice.token, &format!("SKU-{i:02}")).await;
    }

    let (status, body) = send(&app, "GET", "/api/products?limit=10&search=sku", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"].as_array().unwrap().len(), 10);
    assert_eq!(body["pagination"]["total"], 15);

    let (status, body) = send(&app, "GET", "/api/products?limit=10&search=nothing-like-this", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["products"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["total"], 15);
    assert_eq!(body["pagination"]["totalPages"], 2);
    assert_eq!(body["pagination"]["hasNext"], true);
}

#[tokio::test]
async fn location_update_revalidates_changed_fields() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    let bob = register_and_login(&app, "bob@shop.test").await;
    let first_product = create_product(&app, &alice.token, "SKU-1").await;
    let second_product = create_product(&app, &alice.token, "SKU-2").await;
    let bobs_product = create_product(&app, &bob.token, "SKU-1").await;

    let location_id = create_location(&app, &alice.token, &first_product, "Front shelf").await;
    create_location(&app, &alice.token, &first_product, "Back shelf").await;
    let uri = format!("/api/locations/{location_id}");

    let (status, body) = send(&app, "PUT", &uri, Some(&alice.token), Some(json!({ "zone": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusMessage"], "Invalid location data: Zone must be between 1 and 50 characters");

    let (status, body) = send(&app, "PUT", &uri, Some(&alice.token), Some(json!({ "name": "Back shelf" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["statusMessage"], "Location name already exists");

    // Repetir o próprio nome não é conflito
    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&alice.token),
        Some(json!({ "name": "Front shelf", "notes": "Near the door" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["location"]["notes"], "Near the door");
    assert_eq!(body["location"]["zone"], "A");

    let missing = Uuid::new_v4().to_string();
    let (status, body) = send(&app, "PUT", &uri, Some(&alice.token), Some(json!({ "productId": missing }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["statusMessage"], "Product not found");

    let (status, body) = send(&app, "PUT", &uri, Some(&alice.token), Some(json!({ "productId": bobs_product }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["statusMessage"], "Product does not belong to this user");

    let (status, body) = send(&app, "PUT", &uri, Some(&alice.token), Some(json!({ "productId": second_product }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"]["productId"], second_product.as_str());
    assert_eq!(body["message"], "Location updated successfully");
}

#[tokio::test]
async fn location_count_applies_filters() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    let first_product = create_product(&app, &alice.token, "SKU-1").await;
    let second_product = create_product(&app, &alice.token, "SKU-2").await;

    let front = create_location(&app, &alice.token, &first_product, "Front shelf").await;
    create_location(&app, &alice.token, &first_product, "Back shelf").await;
    create_location(&app, &alice.token, &second_product, "Window").await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/locations/{front}"),
        Some(&alice.token),
        Some(json!({ "isActive": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/locations/count", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statistics"]["total"], 3);
    assert_eq!(body["statistics"]["productsCovered"], 2);

    let uri = format!("/api/locations/count?productId={first_product}");
    let (status, body) = send(&app, "GET", &uri, Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statistics"]["total"], 2);
    assert_eq!(body["statistics"]["inactive"], 1);

    let (status, body) = send(&app, "GET", "/api/locations/count?isActive=false", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statistics"]["total"], 1);
    assert_eq!(body["statistics"]["active"], 0);

    let (status, body) = send(&app, "GET", "/api/locations/count?productId=nope", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusMessage"], "Invalid query parameters");
}

#[tokio::test]
async fn promotion_window_is_checked_before_the_product() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    let missing = Uuid::new_v4().to_string();

    let body = promotion_body(&missing, "Summer", "2030-02-01", "2030-01-01");
    let (status, body) = send(&app, "POST", "/api/promotions", Some(&alice.token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusMessage"], "End date must be after start date");

    let product_id = create_product(&app, &alice.token, "SKU-1").await;
    let promotion_id =
        create_promotion(&app, &alice.token, promotion_body(&product_id, "Summer", "2030-01-01", "2030-02-01")).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/promotions/{promotion_id}"),
        Some(&alice.token),
        Some(json!({ "productId": missing, "endDate": "2029-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusMessage"], "End date must be after start date");
}

#[tokio::test]
async fn promotion_update_revalidates_changed_fields() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    let bob = register_and_login(&app, "bob@shop.test").await;
    let product_id = create_product(&app, &alice.token, "SKU-1").await;
    let bobs_product = create_product(&app, &bob.token, "SKU-1").await;

    let promotion_id =
        create_promotion(&app, &alice.token, promotion_body(&product_id, "Summer", "2030-01-01", "2030-02-01")).await;
    create_promotion(&app, &alice.token, promotion_body(&product_id, "Winter", "2030-06-01", "2030-07-01")).await;
    let uri = format!("/api/promotions/{promotion_id}");

    let (status, body) = send(&app, "PUT", &uri, Some(&alice.token), Some(json!({ "discountValue": -1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["statusMessage"],
        "Invalid promotion data: Discount value must be between 0 and 9999999999.99"
    );

    let (status, body) = send(&app, "PUT", &uri, Some(&alice.token), Some(json!({ "title": "Winter" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["statusMessage"], "Promotion title already exists");

    let missing = Uuid::new_v4().to_string();
    let (status, body) = send(&app, "PUT", &uri, Some(&alice.token), Some(json!({ "productId": missing }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["statusMessage"], "Product not found");

    let (status, body) = send(&app, "PUT", &uri, Some(&alice.token), Some(json!({ "productId": bobs_product }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["statusMessage"], "Product does not belong to this user");

    // Só uma das datas: a outra vem do documento gravado
    let (status, body) = send(&app, "PUT", &uri, Some(&alice.token), Some(json!({ "endDate": "2029-12-01" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusMessage"], "End date must be after start date");

    let (status, body) = send(&app, "PUT", &uri, Some(&alice.token), Some(json!({ "startDate": "2030-03-01" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusMessage"], "End date must be after start date");

    let (status, body) = send(&app, "PUT", &uri, Some(&alice.token), Some(json!({ "startDate": "2030-01-15" }))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["promotion"]["startDate"], "2030-01-15T00:00:00Z");
    assert_eq!(body["promotion"]["endDate"], "2030-02-01T00:00:00Z");
    assert_eq!(body["promotion"]["title"], "Summer");
}

#[tokio::test]
async fn promotion_count_applies_filters() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    let first_product = create_product(&app, &alice.token, "SKU-1").await;
    let second_product = create_product(&app, &alice.token, "SKU-2").await;

    create_promotion(&app, &alice.token, promotion_body(&first_product, "Summer", "2030-01-01", "2030-02-01")).await;
    let mut paused = promotion_body(&first_product, "Paused", "2030-01-01", "2030-02-01");
    paused["isActive"] = json!(false);
    create_promotion(&app, &alice.token, paused).await;
    create_promotion(&app, &alice.token, promotion_body(&second_product, "Winter", "2030-06-01", "2030-07-01")).await;

    let uri = format!("/api/promotions/count?productId={first_product}");
    let (status, body) = send(&app, "GET", &uri, Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statistics"]["total"], 2);
    assert_eq!(body["statistics"]["productsWithPromotions"], 1);

    let (status, body) = send(&app, "GET", "/api/promotions/count?isActive=false", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statistics"]["total"], 1);
    assert_eq!(body["statistics"]["inactive"], 1);

    let (status, body) = send(&app, "GET", "/api/promotions/count?isActive=yes", Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusMessage"], "Invalid query parameters");
}

#[tokio::test]
async fn public_detail_derives_promotion_status() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@shop.test").await;
    let product_id = create_product(&app, &alice.token, "SKU-1").await;

    let now = Utc::now();
    let window = |from: Duration, to: Duration| ((now + from).to_rfc3339(), (now + to).to_rfc3339());
    for (title, (start, end)) in [
        ("Running", window(Duration::days(-1), Duration::days(1))),
        ("Soon", window(Duration::days(1), Duration::days(2))),
        ("Over", window(Duration::days(-2), Duration::days(-1))),
    ] {
        create_promotion(&app, &alice.token, promotion_body(&product_id, title, &start, &end)).await;
    }
    let (running_start, running_end) = window(Duration::days(-1), Duration::days(1));
    let mut disabled = promotion_body(&product_id, "Disabled", &running_start, &running_end);
    disabled["isActive"] = json!(false);
    create_promotion(&app, &alice.token, disabled).await;

    let (status, body) = send(&app, "GET", &format!("/api/public/product/{product_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    // Só promoções com a flag ativa aparecem, cada uma com o status calculado
    let promotions = body["promotions"].as_array().unwrap();
    assert_eq!(promotions.len(), 3);
    let status_of = |title: &str| {
        promotions
            .iter()
            .find(|p| p["title"] == title)
            .map(|p| p["status"].clone())
            .unwrap()
    };
    assert_eq!(status_of("Running"), "active");
    assert_eq!(status_of("Soon"), "upcoming");
    assert_eq!(status_of("Over"), "expired");

    assert_eq!(body["stats"]["activePromotions"], 1);
    assert_eq!(body["stats"]["upcomingPromotions"], 1);
    assert_eq!(body["stats"]["hasPromotions"], true);
    assert_eq!(body["stats"]["hasLocations"], false);

    let uri = format!("/api/public/company/{}/products", alice.company_id);
    let (status, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"][0]["stats"]["activePromotions"], 3);
}

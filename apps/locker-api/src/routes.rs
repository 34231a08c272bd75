//! # Router
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request                                                                │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  SetRequestId ─► Trace ─► PropagateRequestId ─► CatchPanic ─► Timeout   │
//! │                                                                  │      │
//! │                                                                  ▼      │
//! │                                            /api/v1/... ─► extractors    │
//! │                                                                  │      │
//! │                                                                  ▼      │
//! │                                                               handler   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, catalog, reports, requests, system, transactions, users};
use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let max_upload = state.config.max_upload_bytes;
    let timeout = state.config.request_timeout();

    let api = Router::new()
        // Session
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Users
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", delete(users::delete))
        // Catalog
        .route("/catalog", get(catalog::list_catalog))
        .route("/products", post(catalog::create_product))
        .route("/products/{id}", delete(catalog::delete_product))
        .route("/products/{id}/variants", post(catalog::create_variant))
        .route(
            "/variants/{id}",
            get(catalog::get_variant).delete(catalog::delete_variant),
        )
        .route("/variants/{id}/stock", put(catalog::update_stock))
        .route(
            "/variants/{id}/photo",
            post(catalog::upload_photo).layer(DefaultBodyLimit::max(max_upload)),
        )
        // Ledger
        .route("/scan", post(transactions::scan))
        .route("/transactions/sell", post(transactions::sell))
        .route("/transactions/restock", post(transactions::restock))
        .route("/purchases", get(transactions::list_pending))
        .route("/purchases/{id}/approve", post(transactions::approve))
        .route("/purchases/{id}/reject", post(transactions::reject))
        // Requests
        .route("/requests", get(requests::overview))
        .route(
            "/public/contact/{variant_id}",
            get(requests::describe_variant).post(requests::submit_contact),
        )
        .route(
            "/public/pre-order/{variant_id}",
            get(requests::describe_variant).post(requests::submit_pre_order),
        )
        // Reports
        .route("/reports/summary", get(reports::summary))
        .route("/reports/sales", get(reports::sales))
        .route("/export/inventory", get(reports::export_inventory))
        .route("/export/sales", get(reports::export_sales))
        // System
        .route("/assets/{photo_ref}", get(system::get_asset))
        .route("/health", get(system::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CatchPanicLayer::new())
                .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)),
        )
        .with_state(state)
}

// =============================================================================
// HTTP Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
    use axum::http::{Method, Request};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::bootstrap_admin;
    use crate::config::ServerConfig;
    use locker_db::{Database, DbConfig};

    struct TestApp {
        app: Router,
        state: AppState,
        _uploads: tempfile::TempDir,
    }

    async fn setup() -> TestApp {
        let uploads = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = ServerConfig {
            upload_dir: uploads.path().to_path_buf(),
            ..ServerConfig::default()
        };

        let state = AppState::new(db, config);
        assert!(bootstrap_admin(&state).await.unwrap());

        TestApp {
            app: router(state.clone()),
            state,
            _uploads: uploads,
        }
    }

    impl TestApp {
        async fn send(&self, request: Request<Body>) -> Response {
            self.app.clone().oneshot(request).await.unwrap()
        }

        async fn call(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
            }
            let body = match body {
                Some(json) => {
                    builder = builder.header(CONTENT_TYPE, "application/json");
                    Body::from(json.to_string())
                }
                None => Body::empty(),
            };

            let response = self.send(builder.body(body).unwrap()).await;
            let status = response.status();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes)
                    .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            };
            (status, json)
        }

        async fn login(&self, username: &str, password: &str) -> String {
            let (status, body) = self
                .call(
                    Method::POST,
                    "/api/v1/auth/login",
                    None,
                    Some(json!({ "username": username, "password": password })),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "login failed: {body}");
            body["token"].as_str().unwrap().to_string()
        }

        async fn admin(&self) -> String {
            self.login("admin", "adminpass").await
        }

        async fn clerk(&self, admin: &str) -> String {
            let (status, _) = self
                .call(
                    Method::POST,
                    "/api/v1/users",
                    Some(admin),
                    Some(json!({ "username": "clerk", "password": "clerkpass" })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
            self.login("clerk", "clerkpass").await
        }

        /// Creates "Team Jersey" with one Home/M variant; returns the variant id.
        async fn jersey(&self, admin: &str, barcode: &str, stock: i64) -> String {
            let (status, body) = self
                .call(
                    Method::POST,
                    "/api/v1/products",
                    Some(admin),
                    Some(json!({
                        "name": "Team Jersey",
                        "variants": [{
                            "barcode": barcode,
                            "type": "Home",
                            "size": "M",
                            "cost_cents": 4999,
                            "selling_price_cents": 7999,
                            "stock": stock
                        }]
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
            body["variants"][0]["id"].as_str().unwrap().to_string()
        }

        async fn upload(&self, admin: &str, variant_id: &str, file_name: &str, bytes: &[u8]) -> (StatusCode, Value) {
            let boundary = "locker-test-boundary";
            let mut body = format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .into_bytes();
            body.extend_from_slice(bytes);
            body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

            let request = Request::builder()
                .method(Method::POST)
                .uri(format!("/api/v1/variants/{variant_id}/photo"))
                .header(AUTHORIZATION, format!("Bearer {admin}"))
                .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
                .body(Body::from(body))
                .unwrap();

            let response = self.send(request).await;
            let status = response.status();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
        }
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let t = setup().await;
        let (status, body) = t.call(Method::GET, "/api/v1/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let request = Request::builder()
            .uri("/api/v1/health")
            .body(Body::empty())
            .unwrap();
        let response = t.send(request).await;
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_missing_or_bogus_token_is_unauthenticated() {
        let t = setup().await;

        let (status, body) = t.call(Method::GET, "/api/v1/catalog", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");

        let (status, _) = t.call(Method::GET, "/api/v1/catalog", Some("bogus"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_me_logout() {
        let t = setup().await;

        let (status, body) = t
            .call(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "username": "admin", "password": "wrong-password" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "AUTH_ERROR");

        let (status, body) = t
            .call(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "username": "ghost", "password": "adminpass" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "AUTH_ERROR");

        let token = t.admin().await;
        let (status, me) = t.call(Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["username"], "admin");
        assert_eq!(me["is_admin"], true);

        let (status, _) = t.call(Method::POST, "/api/v1/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = t.call(Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_admin_is_refused_without_state_change() {
        let t = setup().await;
        let admin = t.admin().await;
        let clerk = t.clerk(&admin).await;

        let (status, body) = t
            .call(
                Method::POST,
                "/api/v1/products",
                Some(&clerk),
                Some(json!({ "name": "Scarf" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "PERMISSION_DENIED");

        let (status, _) = t.call(Method::GET, "/api/v1/users", Some(&clerk), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (_, catalog) = t.call(Method::GET, "/api/v1/catalog", Some(&clerk), None).await;
        assert_eq!(catalog, json!([]));
    }

    #[tokio::test]
    async fn test_scan_and_sell_until_out_of_stock() {
        let t = setup().await;
        let admin = t.admin().await;
        let clerk = t.clerk(&admin).await;
        let id = t.jersey(&admin, "123456789", 1).await;

        let (status, scan) = t
            .call(
                Method::POST,
                "/api/v1/scan",
                Some(&clerk),
                Some(json!({ "barcode": " 123456789 " })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(scan["product_name"], "Team Jersey");
        assert_eq!(scan["variant"]["stock"], 1);
        assert_eq!(
            scan["photo_url"],
            "http://localhost:3000/api/v1/assets/placeholder.jpg"
        );
        assert!(scan.get("contact_url").is_none());

        let sell = json!({ "variant_id": id, "revenue_cents": 7500 });
        let (status, sold) = t
            .call(Method::POST, "/api/v1/transactions/sell", Some(&clerk), Some(sell.clone()))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sold["new_stock"], 0);
        assert_eq!(sold["sale"]["revenue_cents"], 7500);

        let (status, refused) = t
            .call(Method::POST, "/api/v1/transactions/sell", Some(&clerk), Some(sell))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(refused["code"], "OUT_OF_STOCK");
        assert_eq!(
            refused["contact_url"],
            format!("http://localhost:3000/api/v1/public/contact/{id}")
        );
        assert_eq!(
            refused["pre_order_url"],
            format!("http://localhost:3000/api/v1/public/pre-order/{id}")
        );

        let (_, scan) = t
            .call(
                Method::POST,
                "/api/v1/scan",
                Some(&clerk),
                Some(json!({ "barcode": "123456789" })),
            )
            .await;
        assert!(scan["contact_url"].is_string());

        let (_, summary) = t.call(Method::GET, "/api/v1/reports/summary", Some(&clerk), None).await;
        assert_eq!(summary["sale_count"], 1);
        assert_eq!(summary["total_revenue_cents"], 7500);
        assert_eq!(summary["total_profit_cents"], 7500 - 4999);
    }

    #[tokio::test]
    async fn test_unknown_barcode_and_variant() {
        let t = setup().await;
        let admin = t.admin().await;

        let (status, body) = t
            .call(Method::POST, "/api/v1/scan", Some(&admin), Some(json!({ "barcode": "000" })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = t
            .call(
                Method::POST,
                "/api/v1/transactions/sell",
                Some(&admin),
                Some(json!({ "variant_id": "missing", "revenue_cents": 100 })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_barcode_rolls_back_product() {
        let t = setup().await;
        let admin = t.admin().await;
        t.jersey(&admin, "123456789", 10).await;

        let (status, body) = t
            .call(
                Method::POST,
                "/api/v1/products",
                Some(&admin),
                Some(json!({
                    "name": "Practice Kit",
                    "variants": [
                        { "barcode": "111222333", "type": "Training", "size": "M",
                          "cost_cents": 3999, "selling_price_cents": 6999, "stock": 8 },
                        { "barcode": "123456789", "type": "Training", "size": "L",
                          "cost_cents": 3999, "selling_price_cents": 6999, "stock": 8 }
                    ]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");

        let (_, catalog) = t.call(Method::GET, "/api/v1/catalog", Some(&admin), None).await;
        assert_eq!(catalog.as_array().unwrap().len(), 1);

        let (status, body) = t
            .call(
                Method::POST,
                "/api/v1/products",
                Some(&admin),
                Some(json!({
                    "name": "Scarf",
                    "variants": [{ "barcode": "555", "type": "Club", "size": "One",
                                   "cost_cents": -1, "selling_price_cents": 100, "stock": 1 }]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_restock_approval_flow() {
        let t = setup().await;
        let admin = t.admin().await;
        let clerk = t.clerk(&admin).await;
        let id = t.jersey(&admin, "123456790", 0).await;

        let (status, purchase) = t
            .call(
                Method::POST,
                "/api/v1/transactions/restock",
                Some(&clerk),
                Some(json!({ "variant_id": id, "quantity": 5 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let purchase_id = purchase["id"].as_str().unwrap().to_string();

        let (status, _) = t
            .call(
                Method::POST,
                "/api/v1/transactions/restock",
                Some(&clerk),
                Some(json!({ "variant_id": id, "quantity": 1000 })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, pending) = t.call(Method::GET, "/api/v1/purchases", Some(&clerk), None).await;
        assert_eq!(pending.as_array().unwrap().len(), 1);
        assert_eq!(pending[0]["product_name"], "Team Jersey");

        let approve = format!("/api/v1/purchases/{purchase_id}/approve");
        let (status, _) = t.call(Method::POST, &approve, Some(&clerk), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, variant) = t.call(Method::POST, &approve, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(variant["stock"], 5);

        let (status, _) = t.call(Method::POST, &approve, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, variant) = t
            .call(Method::GET, &format!("/api/v1/variants/{id}"), Some(&clerk), None)
            .await;
        assert_eq!(variant["stock"], 5);
    }

    #[tokio::test]
    async fn test_approve_past_stock_cap_is_validation_error() {
        let t = setup().await;
        let admin = t.admin().await;
        let id = t.jersey(&admin, "123456791", 0).await;

        let stock = format!("/api/v1/variants/{id}/stock");
        let (status, body) = t
            .call(Method::PUT, &stock, Some(&admin), Some(json!({ "stock": i64::MAX })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _) = t
            .call(
                Method::PUT,
                &stock,
                Some(&admin),
                Some(json!({ "stock": locker_core::MAX_STOCK })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, purchase) = t
            .call(
                Method::POST,
                "/api/v1/transactions/restock",
                Some(&admin),
                Some(json!({ "variant_id": id, "quantity": 5 })),
            )
            .await;
        let approve = format!("/api/v1/purchases/{}/approve", purchase["id"].as_str().unwrap());

        let (status, body) = t.call(Method::POST, &approve, Some(&admin), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (_, pending) = t.call(Method::GET, "/api/v1/purchases", Some(&admin), None).await;
        assert_eq!(pending.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reject_leaves_stock() {
        let t = setup().await;
        let admin = t.admin().await;
        let id = t.jersey(&admin, "123456790", 2).await;

        let (_, purchase) = t
            .call(
                Method::POST,
                "/api/v1/transactions/restock",
                Some(&admin),
                Some(json!({ "variant_id": id, "quantity": 4 })),
            )
            .await;
        let reject = format!("/api/v1/purchases/{}/reject", purchase["id"].as_str().unwrap());

        let (status, _) = t.call(Method::POST, &reject, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = t.call(Method::POST, &reject, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, variant) = t
            .call(Method::GET, &format!("/api/v1/variants/{id}"), Some(&admin), None)
            .await;
        assert_eq!(variant["stock"], 2);
    }

    #[tokio::test]
    async fn test_public_forms() {
        let t = setup().await;
        let admin = t.admin().await;
        let id = t.jersey(&admin, "123456790", 0).await;

        let (status, label) = t
            .call(Method::GET, &format!("/api/v1/public/contact/{id}"), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(label["product_name"], "Team Jersey");
        assert_eq!(label["type"], "Home");

        let (status, _) = t
            .call(Method::GET, "/api/v1/public/pre-order/nope", None, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = t
            .call(
                Method::POST,
                &format!("/api/v1/public/contact/{id}"),
                None,
                Some(json!({ "customer_name": "Sam", "contact_info": "sam@example.com" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let pre_order = format!("/api/v1/public/pre-order/{id}");
        let (status, body) = t
            .call(
                Method::POST,
                &pre_order,
                None,
                Some(json!({ "customer_name": "Sam", "contact_info": "555-0100", "quantity": 0 })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, order) = t
            .call(
                Method::POST,
                &pre_order,
                None,
                Some(json!({ "customer_name": "Sam", "contact_info": "555-0100", "quantity": 2 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(order["quantity"], 2);

        let (status, _) = t.call(Method::GET, "/api/v1/requests", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, overview) = t.call(Method::GET, "/api/v1/requests", Some(&admin), None).await;
        assert_eq!(overview["customer_requests"].as_array().unwrap().len(), 1);
        assert_eq!(overview["pre_orders"].as_array().unwrap().len(), 1);
        assert_eq!(overview["purchases"], json!([]));
    }

    #[tokio::test]
    async fn test_user_management() {
        let t = setup().await;
        let admin = t.admin().await;
        let clerk = t.clerk(&admin).await;

        let (_, me) = t.call(Method::GET, "/api/v1/auth/me", Some(&admin), None).await;
        let admin_id = me["user_id"].as_str().unwrap().to_string();
        let (_, me) = t.call(Method::GET, "/api/v1/auth/me", Some(&clerk), None).await;
        let clerk_id = me["user_id"].as_str().unwrap().to_string();

        let (status, _) = t
            .call(Method::DELETE, &format!("/api/v1/users/{admin_id}"), Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = t
            .call(
                Method::POST,
                "/api/v1/users",
                Some(&admin),
                Some(json!({ "username": "clerk", "password": "another-pass" })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");

        let (status, _) = t
            .call(
                Method::POST,
                "/api/v1/users",
                Some(&admin),
                Some(json!({ "username": "newbie", "password": "short" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, users) = t.call(Method::GET, "/api/v1/users", Some(&admin), None).await;
        assert_eq!(users.as_array().unwrap().len(), 2);
        assert!(users[0].get("password_hash").is_none());

        let (status, _) = t
            .call(Method::DELETE, &format!("/api/v1/users/{clerk_id}"), Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = t.call(Method::GET, "/api/v1/catalog", Some(&clerk), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(t.state.sessions.count().await, 1);
    }

    #[tokio::test]
    async fn test_photo_upload_replace_and_release() {
        let t = setup().await;
        let admin = t.admin().await;
        let id = t.jersey(&admin, "123456789", 3).await;

        let (status, variant) = t.upload(&admin, &id, "front.PNG", b"png-bytes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(variant["photo"], format!("{id}.png"));

        let asset = Request::builder()
            .uri(format!("/api/v1/assets/{id}.png"))
            .body(Body::empty())
            .unwrap();
        let response = t.send(asset).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "image/png");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"png-bytes");

        let (status, variant) = t.upload(&admin, &id, "front.jpg", b"jpg-bytes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(variant["photo"], format!("{id}.jpg"));
        assert!(t.state.photos.read(&format!("{id}.png")).await.is_err());

        let (status, body) = t.upload(&admin, &id, "front.gif", b"gif").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _) = t
            .call(Method::DELETE, &format!("/api/v1/variants/{id}"), Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(t.state.photos.read(&format!("{id}.jpg")).await.is_err());

        let (status, _) = t.upload(&admin, &id, "front.png", b"png").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_asset_traversal_rejected() {
        let t = setup().await;
        let (status, body) = t
            .call(Method::GET, "/api/v1/assets/..%2Fsecret.jpg", None, None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_stock_update_and_delete_product() {
        let t = setup().await;
        let admin = t.admin().await;
        let id = t.jersey(&admin, "123456789", 3).await;

        let stock = format!("/api/v1/variants/{id}/stock");
        let (status, variant) = t
            .call(Method::PUT, &stock, Some(&admin), Some(json!({ "stock": 12 })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(variant["stock"], 12);

        let (status, _) = t
            .call(Method::PUT, &stock, Some(&admin), Some(json!({ "stock": -1 })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let product_id = variant["product_id"].as_str().unwrap().to_string();
        let (status, _) = t
            .call(Method::DELETE, &format!("/api/v1/products/{product_id}"), Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = t
            .call(Method::GET, &format!("/api/v1/variants/{id}"), Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_csv_export() {
        let t = setup().await;
        let admin = t.admin().await;
        let id = t.jersey(&admin, "123456789", 3).await;
        t.call(
            Method::POST,
            "/api/v1/transactions/sell",
            Some(&admin),
            Some(json!({ "variant_id": id, "revenue_cents": 7999 })),
        )
        .await;

        let request = Request::builder()
            .uri("/api/v1/export/sales")
            .header(AUTHORIZATION, format!("Bearer {admin}"))
            .body(Body::empty())
            .unwrap();
        let response = t.send(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/csv; charset=utf-8");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Product Name,Type,Size,Quantity,Revenue,Cost,Sale Time")
        );
        assert!(lines.next().unwrap().starts_with("Team Jersey,Home,M,1,79.99,49.99,"));

        let (status, _) = t.call(Method::GET, "/api/v1/export/inventory", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

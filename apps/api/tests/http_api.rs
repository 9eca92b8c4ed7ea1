//! Integration tests driving the router end to end.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use stockroom_api::{build_router, password::hash_password, AppState, ServerConfig};
use stockroom_core::{NewUser, UserPatch};
use stockroom_db::{Database, DbConfig};
use tower::ServiceExt; // For `oneshot` method

struct TestApp {
    router: Router,
    state: Arc<AppState>,
}

impl TestApp {
    async fn new() -> Self {
        let db = Database::new(DbConfig::in_memory())
            .await
            .expect("Failed to create in-memory database");
        let config = ServerConfig {
            jwt_secret: "test-secret".to_string(),
            ..Default::default()
        };
        let state = Arc::new(AppState::new(db, config));
        TestApp {
            router: build_router(state.clone()),
            state,
        }
    }

    /// Inserts a user and returns a bearer token for it.
    async fn user(&self, email: &str, is_superuser: bool) -> String {
        let user = self
            .state
            .db
            .users()
            .create(NewUser {
                email: email.to_string(),
                hashed_password: hash_password("password123").unwrap(),
                full_name: None,
                is_active: true,
                is_superuser,
            })
            .await
            .unwrap();
        self.state
            .jwt
            .generate_access_token(user.id)
            .unwrap()
            .access_token
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call("GET", uri, Some(token), None).await
    }

    async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call("POST", uri, Some(token), Some(body)).await
    }
}

fn product_body(sku: &str, stock: i64, min_quantity: i64) -> Value {
    json!({
        "name": format!("Product {sku}"),
        "sku": sku,
        "price_cents": 999,
        "cost_cents": 500,
        "stock": stock,
        "min_quantity": min_quantity,
    })
}

async fn customer_id(app: &TestApp, token: &str) -> i64 {
    let (status, body) = app
        .post("/api/v1/customers", token, json!({ "full_name": "Ada Lovelace" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.call("GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/users/register",
            None,
            Some(json!({
                "email": "alice@example.com",
                "password": "correct horse",
                "full_name": "Alice"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_superuser"], false);
    assert!(body.get("hashed_password").is_none());

    let login = Request::builder()
        .method("POST")
        .uri("/api/v1/login/access-token")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(
            "username=alice%40example.com&password=correct+horse",
        ))
        .unwrap();
    let (status, body) = app.send(login).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, me) = app.get("/api/v1/users/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "alice@example.com");

    let (status, updated) = app
        .call(
            "PUT",
            "/api/v1/users/me",
            Some(&token),
            Some(json!({ "full_name": "Alice L." })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["full_name"], "Alice L.");
    assert_eq!(updated["email"], "alice@example.com");

    let bad_login = Request::builder()
        .method("POST")
        .uri("/api/v1/login/access-token")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("username=alice%40example.com&password=wrong"))
        .unwrap();
    let (status, body) = app.send(bad_login).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_access_gate() {
    let app = TestApp::new().await;

    let (status, body) = app.call("GET", "/api/v1/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, body) = app.get("/api/v1/products", "not-a-jwt").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    // Token for a user id that does not exist
    let ghost = app.state.jwt.generate_access_token(999).unwrap().access_token;
    let (status, _) = app.get("/api/v1/products", &ghost).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let token = app.user("bob@example.com", false).await;
    let bob = app
        .state
        .db
        .users()
        .get_by_email("bob@example.com")
        .await
        .unwrap()
        .unwrap();
    app.state
        .db
        .users()
        .update(
            bob.id,
            UserPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let (status, body) = app.get("/api/v1/products", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Inactive user");
}

#[tokio::test]
async fn test_user_administration_requires_superuser() {
    let app = TestApp::new().await;
    let clerk = app.user("clerk@example.com", false).await;
    let admin = app.user("admin@example.com", true).await;

    let (status, _) = app.get("/api/v1/users", &clerk).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, users) = app.get("/api/v1/users", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);

    let (status, created) = app
        .post(
            "/api/v1/users",
            &admin,
            json!({ "email": "new@example.com", "password": "password123" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let new_id = created["id"].as_i64().unwrap();

    let (status, _) = app.get(&format!("/api/v1/users/{new_id}"), &clerk).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get(&format!("/api/v1/users/{new_id}"), &admin).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(
            "/api/v1/users",
            &admin,
            json!({ "email": "new@example.com", "password": "password123" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_product_crud_and_conflicts() {
    let app = TestApp::new().await;
    let token = app.user("clerk@example.com", false).await;

    let (status, category) = app
        .post("/api/v1/categories", &token, json!({ "name": "Electronics" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let mut body = product_body("KB-001", 10, 5);
    body["category_id"] = category["id"].clone();
    let (status, product) = app.post("/api/v1/products", &token, body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["category"]["name"], "Electronics");
    assert!(product["supplier"].is_null());
    let id = product["id"].as_i64().unwrap();

    let (status, body) = app
        .post("/api/v1/products", &token, product_body("KB-001", 1, 0))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, body) = app
        .post("/api/v1/products", &token, json!({
            "name": "Free",
            "price_cents": 0,
            "cost_cents": 1,
        }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, updated) = app
        .call(
            "PUT",
            &format!("/api/v1/products/{id}"),
            Some(&token),
            Some(json!({ "price_cents": 1299 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price_cents"], 1299);
    assert_eq!(updated["name"], "Product KB-001");

    let (status, found) = app.get("/api/v1/products/sku/KB-001", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], id);

    // Category in use
    let cat_id = category["id"].as_i64().unwrap();
    let (status, _) = app
        .call("DELETE", &format!("/api/v1/categories/{cat_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .call("DELETE", &format!("/api/v1/products/{id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.get(&format!("/api/v1/products/{id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_low_stock_route() {
    let app = TestApp::new().await;
    let token = app.user("clerk@example.com", false).await;

    for (sku, stock, min) in [("LOW", 2, 5), ("EDGE", 5, 5), ("OK", 50, 5)] {
        let (status, _) = app
            .post("/api/v1/products", &token, product_body(sku, stock, min))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, low) = app.get("/api/v1/products/low-stock", &token).await;
    assert_eq!(status, StatusCode::OK);
    let mut skus: Vec<_> = low
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["sku"].as_str().unwrap().to_string())
        .collect();
    skus.sort();
    assert_eq!(skus, vec!["EDGE", "LOW"]);
}

#[tokio::test]
async fn test_stock_walkthrough_over_http() {
    let app = TestApp::new().await;
    let token = app.user("clerk@example.com", false).await;
    let customer = customer_id(&app, &token).await;

    let (_, product) = app
        .post("/api/v1/products", &token, product_body("KB-001", 10, 5))
        .await;
    let product_id = product["id"].as_i64().unwrap();

    let (status, entry) = app
        .post(
            "/api/v1/inventory",
            &token,
            json!({ "product_id": product_id, "quantity": 5, "type": "IN" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["type"], "IN");
    assert_eq!(entry["product"]["stock"], 15);

    let (status, body) = app
        .post(
            "/api/v1/inventory",
            &token,
            json!({ "product_id": product_id, "quantity": 20, "type": "OUT" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    let (status, sale) = app
        .post(
            "/api/v1/sales",
            &token,
            json!({
                "product_id": product_id,
                "customer_id": customer,
                "quantity": 3,
                "unit_price_cents": 999
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["total_amount_cents"], 2997);
    assert_eq!(sale["product"]["stock"], 12);
    assert_eq!(sale["customer"]["id"], customer);
    let sale_id = sale["id"].as_i64().unwrap();

    let (status, _) = app
        .post(
            "/api/v1/returns",
            &token,
            json!({ "sale_id": sale_id, "product_id": product_id, "quantity": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post(
            "/api/v1/returns",
            &token,
            json!({ "sale_id": sale_id, "product_id": product_id, "quantity": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, product) = app
        .get(&format!("/api/v1/products/{product_id}"), &token)
        .await;
    assert_eq!(product["stock"], 15);

    let (status, ledger) = app
        .get(&format!("/api/v1/inventory/product/{product_id}"), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ledger.as_array().unwrap().len(), 1);

    let (status, returns) = app
        .get(&format!("/api/v1/returns?sale_id={sale_id}"), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(returns.as_array().unwrap().len(), 1);

    let (status, summary) = app.get("/api/v1/sales/summary", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_sales"], 1);
    assert_eq!(summary["total_revenue_cents"], 2997);
}

#[tokio::test]
async fn test_sale_for_missing_customer() {
    let app = TestApp::new().await;
    let token = app.user("clerk@example.com", false).await;
    let (_, product) = app
        .post("/api/v1/products", &token, product_body("KB-001", 10, 5))
        .await;

    let (status, body) = app
        .post(
            "/api/v1/sales",
            &token,
            json!({
                "product_id": product["id"],
                "customer_id": 404,
                "quantity": 1,
                "unit_price_cents": 999
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_owned_records_are_private() {
    let app = TestApp::new().await;
    let alice = app.user("alice@example.com", false).await;
    let bob = app.user("bob@example.com", false).await;
    let admin = app.user("admin@example.com", true).await;

    let (_, product) = app
        .post("/api/v1/products", &alice, product_body("ALICE-1", 10, 0))
        .await;
    let id = product["id"].as_i64().unwrap();

    let (status, _) = app.get(&format!("/api/v1/products/{id}"), &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, bobs) = app.get("/api/v1/products", &bob).await;
    assert!(bobs.as_array().unwrap().is_empty());

    let (status, _) = app
        .post(
            "/api/v1/inventory",
            &bob,
            json!({ "product_id": id, "quantity": 1, "type": "OUT" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&format!("/api/v1/products/{id}"), &admin).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_sales_date_filters() {
    let app = TestApp::new().await;
    let token = app.user("clerk@example.com", false).await;
    let customer = customer_id(&app, &token).await;
    let (_, product) = app
        .post("/api/v1/products", &token, product_body("KB-001", 10, 0))
        .await;

    for quantity in [1, 2] {
        let (status, _) = app
            .post(
                "/api/v1/sales",
                &token,
                json!({
                    "product_id": product["id"],
                    "customer_id": customer,
                    "quantity": quantity,
                    "unit_price_cents": 100
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let today = chrono::Utc::now().date_naive();
    let (status, sales) = app
        .get(
            &format!("/api/v1/sales?start_date={today}&end_date={today}&customer_id={customer}"),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sales.as_array().unwrap().len(), 2);

    let (_, sales) = app.get("/api/v1/sales?start_date=2000-01-01&end_date=2000-01-31", &token).await;
    assert!(sales.as_array().unwrap().is_empty());

    let (status, body) = app
        .get("/api/v1/sales/summary?start_date=2000-02-01&end_date=2000-01-01", &token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_requests_are_validation_errors() {
    let app = TestApp::new().await;
    let token = app.user("clerk@example.com", false).await;
    let (_, product) = app
        .post("/api/v1/products", &token, product_body("KB-001", 10, 0))
        .await;

    // Missing customer_id
    let (status, body) = app
        .post("/api/v1/sales", &token, json!({ "product_id": product["id"] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .post(
            "/api/v1/inventory",
            &token,
            json!({ "product_id": product["id"], "quantity": 1, "type": "SIDEWAYS" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app.get("/api/v1/products/abc", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app.get("/api/v1/sales?start_date=notadate", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(!body["message"].as_str().unwrap().is_empty());

    let login = Request::builder()
        .method("POST")
        .uri("/api/v1/login/access-token")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("username=clerk%40example.com"))
        .unwrap();
    let (status, body) = app.send(login).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

//! # Stockroom API
//!
//! HTTP server for the Stockroom inventory backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stockroom API Routes                            │
//! │                                                                         │
//! │  /api/v1                                                               │
//! │  ┌────────────────────┐  ┌───────────────────────────────────────────┐ │
//! │  │  Public            │  │  Protected (require_auth → Principal)     │ │
//! │  │                    │  │                                           │ │
//! │  │ • GET  /health     │  │ • /users, /users/me, /users/{id}          │ │
//! │  │ • POST /login/     │  │ • /categories, /suppliers, /customers     │ │
//! │  │        access-token│  │ • /products (+ sku, barcode, low-stock)   │ │
//! │  │ • POST /users/     │  │ • /inventory   ledger + IN/OUT/ADJUSTMENT │ │
//! │  │        register    │  │ • /sales       sale + summary             │ │
//! │  │                    │  │ • /returns                                │ │
//! │  └────────────────────┘  └───────────────────────────────────────────┘ │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │ stockroom-db │  │  JwtManager  │  │  tower-http              ││  │
//! │  │  │              │  │              │  │                          ││  │
//! │  │  │ repositories │  │ HS256 access │  │ TraceLayer, CorsLayer    ││  │
//! │  │  │ workflow     │  │ tokens       │  │                          ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ServerConfig`]. Environment variables:
//! - `STOCKROOM_BIND_ADDR` - listen address (default: 127.0.0.1:8000)
//! - `STOCKROOM_DATABASE_PATH` - SQLite file (default: ./stockroom.db)
//! - `STOCKROOM_JWT_SECRET` - Secret for JWT signing
//! - `STOCKROOM_ACCESS_TOKEN_LIFETIME_SECS` - Token lifetime (default: 691200)
//! - `STOCKROOM_CORS_ORIGINS` - Comma-separated origins (default: any)

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod password;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use stockroom_db::Database;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

// Re-exports
pub use auth::JwtManager;
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, config.access_token_lifetime_secs);
        AppState { db, jwt, config }
    }
}

/// Build the router with all routes under `/api/v1`.
pub fn build_router(state: Arc<AppState>) -> Router {
    use handlers::{
        categories, customers, health, inventory, login, products, returns, sales, suppliers,
        users,
    };

    // PUBLIC routes (no authentication required)
    let public_router = Router::new()
        .route("/health", get(health::health_check))
        .route("/login/access-token", post(login::login_access_token))
        .route("/users/register", post(users::register));

    // PROTECTED routes (bearer token → Principal extension)
    let protected_router = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/me", get(users::read_me).put(users::update_me))
        .route("/users/{id}", get(users::read_user))
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            get(categories::read)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/suppliers", get(suppliers::list).post(suppliers::create))
        .route(
            "/suppliers/{id}",
            get(suppliers::read)
                .put(suppliers::update)
                .delete(suppliers::delete),
        )
        .route("/customers", get(customers::list).post(customers::create))
        .route(
            "/customers/{id}",
            get(customers::read)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/products", get(products::list).post(products::create))
        .route("/products/low-stock", get(products::low_stock))
        .route("/products/sku/{sku}", get(products::by_sku))
        .route("/products/barcode/{barcode}", get(products::by_barcode))
        .route("/products/category/{id}", get(products::by_category))
        .route("/products/supplier/{id}", get(products::by_supplier))
        .route(
            "/products/{id}",
            get(products::read)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/inventory", get(inventory::list).post(inventory::create))
        .route("/inventory/product/{id}", get(inventory::by_product))
        .route("/inventory/{id}", get(inventory::read))
        .route("/sales", get(sales::list).post(sales::create))
        .route("/sales/summary", get(sales::summary))
        .route("/sales/{id}", get(sales::read))
        .route("/returns", get(returns::list).post(returns::create))
        .route("/returns/{id}", get(returns::read))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    let api_router = public_router.merge(protected_router).with_state(state.clone());

    Router::new()
        .nest("/api/v1", api_router)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

//! API Routes
//!
//! Configures the Axum router with the catalog, OTP and health endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::catalog::{
    add_product_handler, admin_handler, item_handler, product_handler, root_handler,
};
use super::handlers::{health_handler, send_otp_handler, verify_otp_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// The OTP endpoints answer with and without the trailing slash.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/users/admin", get(admin_handler))
        .route("/items/:item_id", get(item_handler))
        .route("/products", get(product_handler))
        .route("/addproducts", post(add_product_handler))
        .route("/api/send-otp/", post(send_otp_handler))
        .route("/api/send-otp", post(send_otp_handler))
        .route("/api/verify-otp/", post(verify_otp_handler))
        .route("/api/verify-otp", post(verify_otp_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

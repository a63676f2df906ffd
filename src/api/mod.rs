//! API Module
//!
//! HTTP handlers and routing.
//!
//! # Endpoints
//! - `GET /` - Greeting
//! - `GET /users/admin` - Static admin marker
//! - `GET /items/:item_id` - Echo an integer item id
//! - `GET /products?id=` - Echo a product id
//! - `POST /addproducts` - Validate and echo a product record
//! - `POST /api/send-otp/` - Issue an email OTP
//! - `POST /api/verify-otp/` - Verify an email OTP
//! - `GET /health` - Health check endpoint

pub mod catalog;
pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

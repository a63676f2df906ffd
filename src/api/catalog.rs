//! Product catalog stub
//!
//! Static and echoing endpoints. Nothing is stored; the only validation is
//! what the extractors perform.

use axum::{
    extract::{Path, Query},
    Json,
};

use crate::models::{ItemResponse, MessageResponse, Product, ProductQuery, ProductResponse};

/// Formats a price the way a float literal reads: `10.0`, `9.99`.
pub fn format_price(price: f64) -> String {
    if price.is_finite() && price.fract() == 0.0 {
        format!("{:.1}", price)
    } else {
        price.to_string()
    }
}

/// Handler for GET /
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello World"))
}

/// Handler for GET /users/admin
pub async fn admin_handler() -> Json<Vec<&'static str>> {
    Json(vec!["I'm admin."])
}

/// Handler for GET /items/:item_id
pub async fn item_handler(Path(item_id): Path<i64>) -> Json<ItemResponse> {
    Json(ItemResponse {
        item_id: format!("Your item id is {}", item_id),
    })
}

/// Handler for GET /products?id=
pub async fn product_handler(Query(query): Query<ProductQuery>) -> Json<ProductResponse> {
    Json(ProductResponse {
        product_id: format!("Your product id is {}", query.id),
    })
}

/// Handler for POST /addproducts
///
/// Echoes a product that matched the schema.
pub async fn add_product_handler(Json(product): Json<Product>) -> Json<ProductResponse> {
    Json(ProductResponse {
        product_id: format!(
            "Your product id is {} name is {} and price is {}",
            product.id,
            product.name,
            format_price(product.price)
        ),
    })
}

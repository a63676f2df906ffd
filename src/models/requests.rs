//! Request DTOs for the HTTP API
//!
//! OTP request fields are optional at the serde level so that a missing
//! field reaches the service and is reported as a 400, not an extractor 422.

use serde::Deserialize;

/// Request body for `POST /api/send-otp/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for `POST /api/verify-otp/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub otp: Option<String>,
}

/// Catalog record accepted by `POST /addproducts`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

/// Query string of `GET /products`
#[derive(Debug, Clone, Deserialize)]
pub struct ProductQuery {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_otp_request_missing_email() {
        let req: SendOtpRequest = serde_json::from_str("{}").unwrap();
        assert!(req.email.is_none());
    }

    #[test]
    fn test_verify_otp_request_deserialize() {
        let json = r#"{"email": "a@example.com", "otp": "012345"}"#;
        let req: VerifyOtpRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.email.as_deref(), Some("a@example.com"));
        assert_eq!(req.otp.as_deref(), Some("012345"));
    }

    #[test]
    fn test_verify_otp_request_null_otp() {
        let json = r#"{"email": "a@example.com", "otp": null}"#;
        let req: VerifyOtpRequest = serde_json::from_str(json).unwrap();
        assert!(req.otp.is_none());
    }

    #[test]
    fn test_product_accepts_integer_price() {
        let product: Product =
            serde_json::from_str(r#"{"id": 1, "name": "Lamp", "price": 10}"#).unwrap();
        assert_eq!(product.price, 10.0);
    }

    #[test]
    fn test_product_rejects_wrong_types() {
        let wrong_id = r#"{"id": "x", "name": "Lamp", "price": 1.5}"#;
        assert!(serde_json::from_str::<Product>(wrong_id).is_err());
        assert!(serde_json::from_str::<Product>(r#"{"id": 1, "price": 1.5}"#).is_err());
    }
}

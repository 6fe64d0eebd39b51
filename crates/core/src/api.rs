//! Wire format of the retail backend.
//!
//! Three form-encoded `POST` endpoints, each answering with a JSON envelope
//! that carries a `success` flag and, on failure, a user-facing `message`.

use serde::{Deserialize, Serialize};

use crate::types::{CartItem, Product, ProductId};

/// Product search endpoint.
pub const SEARCH_PATH: &str = "/search";
/// Add-to-cart endpoint.
pub const ADD_TO_CART_PATH: &str = "/add-to-cart";
/// Checkout endpoint.
pub const CHECKOUT_PATH: &str = "/checkout";

// =============================================================================
// Request Forms
// =============================================================================

/// Search form data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub product_name: String,
}

/// Add-to-cart form data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
}

// =============================================================================
// Response Envelopes
// =============================================================================

/// Response to `POST /search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl SearchResponse {
    /// Successful search with the matching products.
    #[must_use]
    pub const fn found(products: Vec<Product>) -> Self {
        Self {
            success: true,
            message: None,
            products,
        }
    }

    /// Rejected search.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            products: Vec::new(),
        }
    }
}

/// Response to `POST /add-to-cart`.
///
/// On success `cart` is the complete cart after the mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCartResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub cart: Vec<CartItem>,
}

impl AddToCartResponse {
    #[must_use]
    pub fn added(message: impl Into<String>, cart: Vec<CartItem>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            cart,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            cart: Vec::new(),
        }
    }
}

/// Response to `POST /checkout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckoutResponse {
    #[must_use]
    pub fn completed(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

//! Retail backend API.
//!
//! # Architecture
//!
//! - [`StoreApi`] is the seam between the page controller and the network:
//!   the controller only sees decoded response envelopes or an [`ApiError`]
//! - [`HttpStoreApi`] is the `reqwest` implementation; it keeps a cookie jar
//!   so the backend can track the cart per session
//! - The backend is the source of truth - no local cart edits, no caching
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_client::api::{HttpStoreApi, StoreApi};
//!
//! let api = HttpStoreApi::new(&config)?;
//! let response = api.search("mug").await?;
//! if response.success {
//!     println!("{} products", response.products.len());
//! }
//! ```

mod http;

use std::future::Future;

use shopfront_core::ProductId;
use shopfront_core::api::{AddToCartResponse, CheckoutResponse, SearchResponse};
use thiserror::Error;

pub use http::HttpStoreApi;

/// Errors that can occur when talking to the backend.
///
/// These are transport-level failures. A well-formed `success: false`
/// response is not an error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built from the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Operations the page controller needs from the backend.
pub trait StoreApi {
    /// Search products by name.
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<SearchResponse, ApiError>> + Send;

    /// Add `quantity` units of a product to the session's cart.
    fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<AddToCartResponse, ApiError>> + Send;

    /// Finalize and clear the session's cart.
    fn checkout(&self) -> impl Future<Output = Result<CheckoutResponse, ApiError>> + Send;
}

//! Products returned by a search.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product as reported by the backend.
///
/// Products are read-only on the client; stock is only ever displayed and used
/// to bound the quantity input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub stock: u32,
}

/// Availability derived from the stock count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockStatus {
    InStock,
    OutOfStock,
}

impl StockStatus {
    /// Human-readable label shown next to the product.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }
}

impl Product {
    /// Whether the product can currently be added to the cart.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.stock > 0
    }

    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        if self.is_available() {
            StockStatus::InStock
        } else {
            StockStatus::OutOfStock
        }
    }
}

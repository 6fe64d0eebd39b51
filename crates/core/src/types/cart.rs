//! Cart line items mirrored from the backend.
//!
//! The client never edits these: every successful cart mutation returns the
//! full, authoritative list and the previous one is discarded.

use serde::{Deserialize, Serialize};

use super::price::Price;

/// One line in the server-tracked cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    /// Unit price.
    pub price: Price,
    pub quantity: u32,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// Sum of `price * quantity` over all lines.
#[must_use]
pub fn cart_total(items: &[CartItem]) -> Price {
    items.iter().map(CartItem::line_total).sum()
}

/// Total number of units across all lines.
#[must_use]
pub fn cart_item_count(items: &[CartItem]) -> u32 {
    items
        .iter()
        .fold(0_u32, |count, item| count.saturating_add(item.quantity))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(name: &str, cents: i64, quantity: u32) -> CartItem {
        CartItem {
            name: name.to_string(),
            price: Price::from_cents(cents),
            quantity,
        }
    }

    #[test]
    fn test_cart_total_single_line() {
        let cart = vec![item("Mug", 950, 2)];
        assert_eq!(cart_total(&cart).amount_string(), "19.00");
    }

    #[test]
    fn test_cart_total_is_exact() {
        // 0.1 * 3 would drift with binary floats
        let cart = vec![item("Sticker", 10, 3), item("Pin", 20, 1)];
        assert_eq!(cart_total(&cart).amount(), Price::from_cents(50).amount());
    }

    #[test]
    fn test_empty_cart() {
        assert_eq!(cart_total(&[]).amount_string(), "0.00");
        assert_eq!(cart_item_count(&[]), 0);
    }

    #[test]
    fn test_item_count() {
        let cart = vec![item("Mug", 950, 2), item("Pen", 125, 5)];
        assert_eq!(cart_item_count(&cart), 7);
    }

    #[test]
    fn test_deserialize_cart_item() {
        let parsed: CartItem =
            serde_json::from_str(r#"{"name":"Mug","price":9.5,"quantity":2}"#).unwrap();
        assert_eq!(parsed, item("Mug", 950, 2));
    }
}

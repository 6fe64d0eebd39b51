//! View models and HTML rendering.
//!
//! The page is a pure function of the controller's state: product results,
//! the cart mirror and the banner. Each piece has a view model holding the
//! already-formatted strings and flags, and an Askama template that renders it
//! with the element ids and classes of the storefront page.

use askama::Template;
use shopfront_core::{CartItem, Product, ProductId, cart_item_count, cart_total};

use crate::error::RenderError;
use crate::message::Message;

// =============================================================================
// Product Results
// =============================================================================

/// One row of the search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    /// Formatted unit price, e.g. `"$9.50"`.
    pub price: String,
    /// `"In Stock"` or `"Out of Stock"`.
    pub stock_label: &'static str,
    /// Upper bound of the quantity input (the stock count).
    pub max_quantity: u32,
    /// Quantity input and add button are disabled.
    pub disabled: bool,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price.display(),
            stock_label: product.stock_status().label(),
            max_quantity: product.stock,
            disabled: !product.is_available(),
        }
    }
}

/// The search results area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductResultsView {
    pub rows: Vec<ProductRow>,
    /// Show the "No products found" placeholder instead of rows.
    pub show_placeholder: bool,
}

impl ProductResultsView {
    /// Blank results area (nothing searched yet, or the last search failed).
    #[must_use]
    pub const fn cleared() -> Self {
        Self {
            rows: Vec::new(),
            show_placeholder: false,
        }
    }

    /// Render the inner HTML of `#product-results`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_html(&self) -> Result<String, RenderError> {
        Ok(ProductResultsTemplate { results: self }.render()?)
    }
}

/// Rebuild the results area from a product list.
#[must_use]
pub fn render_products(products: &[Product]) -> ProductResultsView {
    ProductResultsView {
        rows: products.iter().map(ProductRow::from).collect(),
        show_placeholder: products.is_empty(),
    }
}

// =============================================================================
// Cart
// =============================================================================

/// One cart line as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub name: String,
    pub quantity: u32,
    /// Formatted line total, e.g. `"$19.00"`.
    pub line_total: String,
}

/// The cart panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    /// Total without currency symbol, two decimals (`"19.00"`).
    pub total: String,
    pub item_count: u32,
    pub checkout_disabled: bool,
}

impl CartView {
    /// Whether the empty-cart placeholder is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render the inner HTML of `#cart-items`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_html(&self) -> Result<String, RenderError> {
        Ok(CartItemsTemplate { cart: self }.render()?)
    }
}

/// Rebuild the cart panel from the cart mirror.
#[must_use]
pub fn render_cart(items: &[CartItem]) -> CartView {
    CartView {
        lines: items
            .iter()
            .map(|item| CartLineView {
                name: item.name.clone(),
                quantity: item.quantity,
                line_total: item.line_total().display(),
            })
            .collect(),
        total: cart_total(items).amount_string(),
        item_count: cart_item_count(items),
        checkout_disabled: items.is_empty(),
    }
}

// =============================================================================
// Page
// =============================================================================

/// Snapshot of the whole page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub results: ProductResultsView,
    pub cart: CartView,
    pub message: Option<Message>,
}

impl PageView {
    /// Class list of `#message-container`.
    #[must_use]
    pub fn message_class(&self) -> String {
        self.message.as_ref().map_or_else(
            || "message-container".to_string(),
            |message| format!("message-container {}", message.kind.css_class()),
        )
    }

    #[must_use]
    pub fn message_text(&self) -> &str {
        self.message.as_ref().map_or("", |message| message.text.as_str())
    }

    /// Render the full HTML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_html(&self) -> Result<String, RenderError> {
        Ok(PageTemplate {
            results: &self.results,
            cart: &self.cart,
            message_class: self.message_class(),
            message_text: self.message_text(),
        }
        .render()?)
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Product results fragment.
#[derive(Template)]
#[template(path = "partials/product_results.html")]
struct ProductResultsTemplate<'a> {
    results: &'a ProductResultsView,
}

/// Cart items fragment.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
struct CartItemsTemplate<'a> {
    cart: &'a CartView,
}

/// Full storefront page.
#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    results: &'a ProductResultsView,
    cart: &'a CartView,
    message_class: String,
    message_text: &'a str,
}

//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! No external services are needed: [`FakeBackend`] serves the three
//! storefront endpoints from an in-memory catalog on an ephemeral port, with
//! the cart kept per cookie session the way the real backend does it.
//!
//! # Backend Rules
//!
//! - Search matches one product by exact, case-insensitive name
//! - Add-to-cart rejects zero quantities, unknown products and requests
//!   above the current stock, and merges lines by product name
//! - Checkout rejects an empty cart and lines above current stock, then
//!   decrements stock and empties the cart
//! - [`FakeBackend::fail_next_checkout`] makes the next checkout answer with
//!   an HTML 500 page instead of JSON

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use shopfront_core::api::{
    ADD_TO_CART_PATH, AddToCartForm, AddToCartResponse, CHECKOUT_PATH, CheckoutResponse,
    SEARCH_PATH, SearchForm, SearchResponse,
};
use shopfront_core::{CartItem, Price, Product, ProductId};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};
use url::Url;

/// Session key holding the cart.
const CART_KEY: &str = "cart";

/// Default catalog.
#[must_use]
pub fn default_catalog() -> Vec<Product> {
    [
        (1, "laptop", 99_999, 10),
        (2, "phone", 49_999, 15),
        (3, "headphones", 9_999, 20),
        (4, "keyboard", 5_999, 8),
        (5, "mug", 950, 2),
        (6, "teapot", 2_500, 0),
    ]
    .into_iter()
    .map(|(id, name, cents, stock)| Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Price::from_cents(cents),
        stock,
    })
    .collect()
}

// =============================================================================
// FakeBackend
// =============================================================================

/// Fake retail backend running on a background task.
///
/// The server stops when the value is dropped.
pub struct FakeBackend {
    base_url: Url,
    state: BackendState,
    task: JoinHandle<()>,
}

#[derive(Clone)]
struct BackendState {
    inventory: Arc<Mutex<Vec<Product>>>,
    fail_next_checkout: Arc<AtomicBool>,
}

impl FakeBackend {
    /// Start a backend with [`default_catalog`].
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> std::io::Result<Self> {
        Self::with_catalog(default_catalog()).await
    }

    /// Start a backend with the given catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn with_catalog(catalog: Vec<Product>) -> std::io::Result<Self> {
        let state = BackendState {
            inventory: Arc::new(Mutex::new(catalog)),
            fail_next_checkout: Arc::new(AtomicBool::new(false)),
        };

        let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);
        let app = Router::new()
            .route(SEARCH_PATH, post(search))
            .route(ADD_TO_CART_PATH, post(add_to_cart))
            .route(CHECKOUT_PATH, post(checkout))
            .layer(session_layer)
            .with_state(state.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let base_url = Url::parse(&format!("http://{addr}/")).map_err(std::io::Error::other)?;

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Fake backend stopped: {e}");
            }
        });
        tracing::debug!(%base_url, "Fake backend listening");

        Ok(Self {
            base_url,
            state,
            task,
        })
    }

    /// Base URL to point the client at.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Current stock of a product, by name.
    pub async fn stock_of(&self, name: &str) -> Option<u32> {
        let inventory = self.state.inventory.lock().await;
        find_by_name(&inventory, name).map(|product| product.stock)
    }

    /// Overwrite the stock of a product, e.g. to sell it out behind a cart's back.
    pub async fn set_stock(&self, name: &str, stock: u32) {
        let mut inventory = self.state.inventory.lock().await;
        if let Some(product) = inventory
            .iter_mut()
            .find(|product| product.name.eq_ignore_ascii_case(name))
        {
            product.stock = stock;
        }
    }

    /// Make the next checkout fail with a non-JSON 500 response.
    pub fn fail_next_checkout(&self) {
        self.state.fail_next_checkout.store(true, Ordering::SeqCst);
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Session storage failure, answered as a non-JSON 500.
struct SessionFailure(tower_sessions::session::Error);

impl IntoResponse for SessionFailure {
    fn into_response(self) -> Response {
        tracing::error!("Session error: {}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "session error").into_response()
    }
}

impl From<tower_sessions::session::Error> for SessionFailure {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self(err)
    }
}

fn find_by_name<'a>(inventory: &'a [Product], name: &str) -> Option<&'a Product> {
    inventory
        .iter()
        .find(|product| product.name.eq_ignore_ascii_case(name))
}

async fn load_cart(session: &Session) -> Result<Vec<CartItem>, SessionFailure> {
    Ok(session
        .get::<Vec<CartItem>>(CART_KEY)
        .await?
        .unwrap_or_default())
}

async fn search(
    State(state): State<BackendState>,
    Form(form): Form<SearchForm>,
) -> Json<SearchResponse> {
    let name = form.product_name.trim();
    if name.is_empty() {
        return Json(SearchResponse::failure("Please enter a product name"));
    }

    let inventory = state.inventory.lock().await;
    Json(find_by_name(&inventory, name).map_or_else(
        || SearchResponse::failure("Product not found"),
        |product| SearchResponse::found(vec![product.clone()]),
    ))
}

async fn add_to_cart(
    State(state): State<BackendState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Json<AddToCartResponse>, SessionFailure> {
    if form.quantity == 0 {
        return Ok(Json(AddToCartResponse::failure(
            "Quantity must be greater than 0",
        )));
    }

    let product = {
        let inventory = state.inventory.lock().await;
        inventory
            .iter()
            .find(|product| product.id == form.product_id)
            .cloned()
    };
    let Some(product) = product else {
        return Ok(Json(AddToCartResponse::failure("Product not found")));
    };
    if product.stock == 0 {
        return Ok(Json(AddToCartResponse::failure(
            "This product is currently out of stock",
        )));
    }
    if product.stock < form.quantity {
        return Ok(Json(AddToCartResponse::failure(format!(
            "Only {} units available",
            product.stock
        ))));
    }

    let mut cart = load_cart(&session).await?;
    match cart
        .iter_mut()
        .find(|item| item.name.eq_ignore_ascii_case(&product.name))
    {
        Some(item) => item.quantity += form.quantity,
        None => cart.push(CartItem {
            name: product.name.clone(),
            price: product.price,
            quantity: form.quantity,
        }),
    }
    session.insert(CART_KEY, &cart).await?;

    Ok(Json(AddToCartResponse::added(
        format!("Added {} {}(s) to cart", form.quantity, product.name),
        cart,
    )))
}

async fn checkout(
    State(state): State<BackendState>,
    session: Session,
) -> Result<Response, SessionFailure> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Json(CheckoutResponse::failure("Cart is empty")).into_response());
    }

    if state.fail_next_checkout.swap(false, Ordering::SeqCst) {
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>An unexpected error occurred</h1>"),
        )
            .into_response());
    }

    let mut inventory = state.inventory.lock().await;
    for item in &cart {
        if let Some(product) = find_by_name(&inventory, &item.name)
            && product.stock < item.quantity
        {
            return Ok(Json(CheckoutResponse::failure(format!(
                "{} is out of stock. Only {} available.",
                item.name, product.stock
            )))
            .into_response());
        }
    }

    for item in &cart {
        if let Some(product) = inventory
            .iter_mut()
            .find(|product| product.name.eq_ignore_ascii_case(&item.name))
        {
            product.stock -= item.quantity;
        }
    }
    drop(inventory);

    session.insert(CART_KEY, Vec::<CartItem>::new()).await?;
    Ok(Json(CheckoutResponse::completed("Thank you for your purchase!")).into_response())
}

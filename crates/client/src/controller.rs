//! Page controller.
//!
//! Wires user actions to the backend and keeps the page state: the last
//! product results, a mirror of the server-tracked cart and the message
//! banner. The cart mirror is only ever replaced wholesale by what the
//! backend returns.
//!
//! Mutating operations take `&mut self`, so one controller has at most one
//! request in flight and responses are applied in the order they were issued.

use shopfront_core::{CartItem, Product, ProductId};
use tokio::sync::watch;
use tracing::instrument;

use crate::api::{ApiError, HttpStoreApi, StoreApi};
use crate::config::ClientConfig;
use crate::error::{add_breadcrumb, report_transport_error};
use crate::message::{Message, MessageBanner, MessageKind};
use crate::view::{PageView, ProductResultsView, render_cart, render_products};

/// Banner text for transport and parse failures.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// What a user action resulted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The backend accepted the action and the page was re-rendered.
    Updated,
    /// The backend answered `success: false`; the message is on the banner.
    Rejected { message: String },
    /// The request failed in transport; the generic error is on the banner.
    Failed,
    /// Checkout failed and the debug crash hook sent the page home.
    NavigateHome,
}

/// Client-side page state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageState {
    /// `None` while the results area is blank.
    products: Option<Vec<Product>>,
    cart: Vec<CartItem>,
}

impl PageState {
    /// Products from the last successful search.
    #[must_use]
    pub fn products(&self) -> Option<&[Product]> {
        self.products.as_deref()
    }

    /// The cart as last reported by the backend.
    #[must_use]
    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    /// Render the state and the current banner message into a page view.
    #[must_use]
    pub fn render(&self, message: Option<Message>) -> PageView {
        PageView {
            results: self
                .products
                .as_deref()
                .map_or_else(ProductResultsView::cleared, render_products),
            cart: render_cart(&self.cart),
            message,
        }
    }
}

/// Controller for the storefront page.
pub struct PageController<A> {
    api: A,
    state: PageState,
    banner: MessageBanner,
    checkout_crash_rate: f64,
}

impl PageController<HttpStoreApi> {
    /// Build a controller talking HTTP to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect(config: &ClientConfig) -> Result<Self, ApiError> {
        let api = HttpStoreApi::new(config)?;
        Ok(Self::new(api).with_checkout_crash_rate(config.checkout_crash_rate))
    }
}

impl<A: StoreApi> PageController<A> {
    /// Create a controller with no results, an empty cart and no message.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: PageState::default(),
            banner: MessageBanner::new(),
            checkout_crash_rate: 0.0,
        }
    }

    /// Use a custom banner (e.g. a different display time).
    #[must_use]
    pub fn with_banner(mut self, banner: MessageBanner) -> Self {
        self.banner = banner;
        self
    }

    /// Enable the debug crash hook on checkout transport failures.
    ///
    /// `rate` is clamped to `[0, 1]`; 0 disables the hook.
    #[must_use]
    pub fn with_checkout_crash_rate(mut self, rate: f64) -> Self {
        self.checkout_crash_rate = rate.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub const fn state(&self) -> &PageState {
        &self.state
    }

    #[must_use]
    pub const fn banner(&self) -> &MessageBanner {
        &self.banner
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Snapshot of the page as currently displayed.
    #[must_use]
    pub fn view(&self) -> PageView {
        self.state.render(self.banner.current())
    }

    /// Receiver of banner changes, including the automatic clear.
    #[must_use]
    pub fn subscribe_messages(&self) -> watch::Receiver<Option<Message>> {
        self.banner.subscribe()
    }

    /// Submit a product search.
    ///
    /// Success replaces the results; a rejection blanks them and shows the
    /// backend's message; a transport failure leaves them as they were.
    #[instrument(skip(self))]
    pub async fn search(&mut self, query: &str) -> ActionOutcome {
        add_breadcrumb("search", "Submitted product search", Some(&[("query", query)]));

        match self.api.search(query).await {
            Ok(response) if response.success => {
                tracing::debug!(count = response.products.len(), "Search returned products");
                self.state.products = Some(response.products);
                ActionOutcome::Updated
            }
            Ok(response) => {
                self.state.products = None;
                self.reject(response.message)
            }
            Err(e) => self.fail("search", &e),
        }
    }

    /// Add a product to the cart.
    ///
    /// `quantity` is sent as given; bounds are only suggested by the view.
    /// Only a successful response touches the cart mirror.
    #[instrument(skip(self))]
    pub async fn add_to_cart(&mut self, product_id: ProductId, quantity: u32) -> ActionOutcome {
        let id = product_id.to_string();
        let qty = quantity.to_string();
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", id.as_str()), ("quantity", qty.as_str())]),
        );

        match self.api.add_to_cart(product_id, quantity).await {
            Ok(response) if response.success => {
                self.state.cart = response.cart;
                if let Some(message) = response.message {
                    self.banner.show(message, MessageKind::Success);
                }
                ActionOutcome::Updated
            }
            Ok(response) => self.reject(response.message),
            Err(e) => self.fail("add_to_cart", &e),
        }
    }

    /// Check out the server-side cart.
    #[instrument(skip(self))]
    pub async fn checkout(&mut self) -> ActionOutcome {
        add_breadcrumb("cart", "Started checkout", None);

        match self.api.checkout().await {
            Ok(response) if response.success => {
                self.state.cart.clear();
                if let Some(message) = response.message {
                    self.banner.show(message, MessageKind::Success);
                }
                ActionOutcome::Updated
            }
            Ok(response) => self.reject(response.message),
            Err(e) => {
                let outcome = self.fail("checkout", &e);
                if self.roll_crash() {
                    tracing::warn!("Simulated page crash after checkout failure, navigating home");
                    self.reload();
                    return ActionOutcome::NavigateHome;
                }
                outcome
            }
        }
    }

    /// Show a message on the banner.
    pub fn show_message(&self, text: impl Into<String>, kind: MessageKind) {
        self.banner.show(text, kind);
    }

    /// Reset to a freshly loaded page.
    ///
    /// The backend session (and therefore its cart) survives; the client
    /// only forgets its mirror until the next cart response.
    pub fn reload(&mut self) {
        self.state = PageState::default();
        self.banner.clear();
    }

    fn reject(&self, message: Option<String>) -> ActionOutcome {
        let message = message.unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
        tracing::info!(message = %message, "Backend rejected request");
        self.banner.show(message.clone(), MessageKind::Error);
        ActionOutcome::Rejected { message }
    }

    fn fail(&self, action: &str, err: &ApiError) -> ActionOutcome {
        report_transport_error(action, err);
        self.banner.show(GENERIC_ERROR_MESSAGE, MessageKind::Error);
        ActionOutcome::Failed
    }

    fn roll_crash(&self) -> bool {
        self.checkout_crash_rate > 0.0 && rand::random::<f64>() < self.checkout_crash_rate
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use shopfront_core::Price;
    use shopfront_core::api::{AddToCartResponse, CheckoutResponse, SearchResponse};

    use super::*;
    use crate::message::MESSAGE_DURATION;

    /// Recorded request.
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Search(String),
        AddToCart(ProductId, u32),
        Checkout,
    }

    /// Scripted backend: each call pops the next queued reply.
    #[derive(Default)]
    struct ScriptedApi {
        searches: Mutex<VecDeque<Result<SearchResponse, ApiError>>>,
        adds: Mutex<VecDeque<Result<AddToCartResponse, ApiError>>>,
        checkouts: Mutex<VecDeque<Result<CheckoutResponse, ApiError>>>,
        calls: Mutex<Vec<Call>>,
    }

    impl ScriptedApi {
        fn on_search(self, reply: Result<SearchResponse, ApiError>) -> Self {
            self.searches.lock().unwrap().push_back(reply);
            self
        }

        fn on_add(self, reply: Result<AddToCartResponse, ApiError>) -> Self {
            self.adds.lock().unwrap().push_back(reply);
            self
        }

        fn on_checkout(self, reply: Result<CheckoutResponse, ApiError>) -> Self {
            self.checkouts.lock().unwrap().push_back(reply);
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl StoreApi for ScriptedApi {
        async fn search(&self, query: &str) -> Result<SearchResponse, ApiError> {
            self.calls.lock().unwrap().push(Call::Search(query.to_string()));
            self.searches.lock().unwrap().pop_front().unwrap()
        }

        async fn add_to_cart(
            &self,
            product_id: ProductId,
            quantity: u32,
        ) -> Result<AddToCartResponse, ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::AddToCart(product_id, quantity));
            self.adds.lock().unwrap().pop_front().unwrap()
        }

        async fn checkout(&self) -> Result<CheckoutResponse, ApiError> {
            self.calls.lock().unwrap().push(Call::Checkout);
            self.checkouts.lock().unwrap().pop_front().unwrap()
        }
    }

    fn transport_error() -> ApiError {
        ApiError::from(serde_json::from_str::<serde_json::Value>("<html>").unwrap_err())
    }

    fn mug() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Mug".to_string(),
            price: Price::from_cents(950),
            stock: 2,
        }
    }

    fn mugs(quantity: u32) -> Vec<CartItem> {
        vec![CartItem {
            name: "Mug".to_string(),
            price: Price::from_cents(950),
            quantity,
        }]
    }

    #[tokio::test]
    async fn test_initial_page_shows_empty_cart() {
        let controller = PageController::new(ScriptedApi::default());
        let view = controller.view();

        assert!(view.cart.is_empty());
        assert!(view.cart.checkout_disabled);
        assert_eq!(view.cart.total, "0.00");
        assert!(view.results.rows.is_empty());
        assert!(!view.results.show_placeholder);
        assert_eq!(view.message, None);
    }

    #[tokio::test]
    async fn test_search_success_renders_products() {
        let api = ScriptedApi::default().on_search(Ok(SearchResponse::found(vec![mug()])));
        let mut controller = PageController::new(api);

        let outcome = controller.search("mug").await;

        assert_eq!(outcome, ActionOutcome::Updated);
        let view = controller.view();
        assert_eq!(view.results.rows.len(), 1);
        let row = view.results.rows.first().unwrap();
        assert_eq!(row.price, "$9.50");
        assert_eq!(row.stock_label, "In Stock");
        assert!(!row.disabled);
        assert_eq!(view.message, None);
        assert_eq!(controller.api().calls(), vec![Call::Search("mug".to_string())]);
    }

    #[tokio::test]
    async fn test_search_rejection_clears_results_and_shows_message() {
        let api = ScriptedApi::default()
            .on_search(Ok(SearchResponse::found(vec![mug()])))
            .on_search(Ok(SearchResponse::failure("Product not found")));
        let mut controller = PageController::new(api);

        controller.search("mug").await;
        let outcome = controller.search("kettle").await;

        assert_eq!(
            outcome,
            ActionOutcome::Rejected {
                message: "Product not found".to_string()
            }
        );
        assert_eq!(controller.state().products(), None);
        let view = controller.view();
        assert!(view.results.rows.is_empty());
        let message = view.message.unwrap();
        assert_eq!(message.text, "Product not found");
        assert_eq!(message.kind, MessageKind::Error);
    }

    #[tokio::test]
    async fn test_search_transport_failure_shows_generic_error() {
        let api = ScriptedApi::default()
            .on_search(Ok(SearchResponse::found(vec![mug()])))
            .on_search(Err(transport_error()));
        let mut controller = PageController::new(api);

        controller.search("mug").await;
        let outcome = controller.search("mug").await;

        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(controller.view().message.unwrap().text, GENERIC_ERROR_MESSAGE);
        // Results from the previous search stay on screen
        assert_eq!(controller.state().products().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_with_no_matches_shows_placeholder() {
        let api = ScriptedApi::default().on_search(Ok(SearchResponse::found(Vec::new())));
        let mut controller = PageController::new(api);

        controller.search("zzz").await;

        assert!(controller.view().results.show_placeholder);
    }

    #[tokio::test]
    async fn test_add_to_cart_replaces_cart_with_server_copy() {
        let api = ScriptedApi::default()
            .on_add(Ok(AddToCartResponse::added("Added 1 Mug(s) to cart", mugs(1))))
            .on_add(Ok(AddToCartResponse::added("Added 1 Mug(s) to cart", mugs(2))));
        let mut controller = PageController::new(api);

        controller.add_to_cart(ProductId::new(1), 1).await;
        let outcome = controller.add_to_cart(ProductId::new(1), 1).await;

        assert_eq!(outcome, ActionOutcome::Updated);
        assert_eq!(controller.state().cart(), mugs(2).as_slice());
        let view = controller.view();
        assert_eq!(view.cart.total, "19.00");
        assert!(!view.cart.checkout_disabled);
        let message = view.message.unwrap();
        assert_eq!(message.text, "Added 1 Mug(s) to cart");
        assert_eq!(message.kind, MessageKind::Success);
    }

    #[tokio::test]
    async fn test_failed_add_to_cart_keeps_prior_cart() {
        let api = ScriptedApi::default()
            .on_add(Ok(AddToCartResponse::added("Added 2 Mug(s) to cart", mugs(2))))
            .on_add(Ok(AddToCartResponse::failure("Only 2 units available")));
        let mut controller = PageController::new(api);

        controller.add_to_cart(ProductId::new(1), 2).await;
        let outcome = controller.add_to_cart(ProductId::new(1), 5).await;

        assert_eq!(
            outcome,
            ActionOutcome::Rejected {
                message: "Only 2 units available".to_string()
            }
        );
        assert_eq!(controller.state().cart(), mugs(2).as_slice());
        assert_eq!(controller.view().message.unwrap().text, "Only 2 units available");
    }

    #[tokio::test]
    async fn test_add_to_cart_sends_quantity_unchecked() {
        let api = ScriptedApi::default()
            .on_add(Ok(AddToCartResponse::failure("Quantity must be greater than 0")));
        let mut controller = PageController::new(api);

        controller.add_to_cart(ProductId::new(1), 0).await;

        assert_eq!(
            controller.api().calls(),
            vec![Call::AddToCart(ProductId::new(1), 0)]
        );
    }

    #[tokio::test]
    async fn test_add_to_cart_transport_failure_keeps_cart() {
        let api = ScriptedApi::default()
            .on_add(Ok(AddToCartResponse::added("Added 1 Mug(s) to cart", mugs(1))))
            .on_add(Err(transport_error()));
        let mut controller = PageController::new(api);

        controller.add_to_cart(ProductId::new(1), 1).await;
        let outcome = controller.add_to_cart(ProductId::new(1), 1).await;

        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(controller.state().cart(), mugs(1).as_slice());
        assert_eq!(controller.view().message.unwrap().text, GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_rejection_without_message_uses_generic_text() {
        let api = ScriptedApi::default().on_checkout(Ok(CheckoutResponse {
            success: false,
            message: None,
        }));
        let mut controller = PageController::new(api);

        let outcome = controller.checkout().await;

        assert_eq!(
            outcome,
            ActionOutcome::Rejected {
                message: GENERIC_ERROR_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_checkout_success_empties_cart() {
        let api = ScriptedApi::default()
            .on_add(Ok(AddToCartResponse::added("Added 2 Mug(s) to cart", mugs(2))))
            .on_checkout(Ok(CheckoutResponse::completed("Thank you for your purchase!")));
        let mut controller = PageController::new(api);

        controller.add_to_cart(ProductId::new(1), 2).await;
        let outcome = controller.checkout().await;

        assert_eq!(outcome, ActionOutcome::Updated);
        let view = controller.view();
        assert!(view.cart.is_empty());
        assert!(view.cart.checkout_disabled);
        assert_eq!(view.cart.total, "0.00");
        assert_eq!(view.message.unwrap().text, "Thank you for your purchase!");
    }

    #[tokio::test]
    async fn test_checkout_rejection_keeps_cart() {
        let api = ScriptedApi::default()
            .on_add(Ok(AddToCartResponse::added("Added 2 Mug(s) to cart", mugs(2))))
            .on_checkout(Ok(CheckoutResponse::failure(
                "Mug is out of stock. Only 0 available.",
            )));
        let mut controller = PageController::new(api);

        controller.add_to_cart(ProductId::new(1), 2).await;
        controller.checkout().await;

        assert_eq!(controller.state().cart(), mugs(2).as_slice());
        assert_eq!(controller.view().message.unwrap().kind, MessageKind::Error);
    }

    #[tokio::test]
    async fn test_checkout_failure_without_crash_hook() {
        let api = ScriptedApi::default().on_checkout(Err(transport_error()));
        let mut controller = PageController::new(api);

        assert_eq!(controller.checkout().await, ActionOutcome::Failed);
        assert_eq!(controller.view().message.unwrap().text, GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_checkout_failure_with_certain_crash_navigates_home() {
        let api = ScriptedApi::default()
            .on_search(Ok(SearchResponse::found(vec![mug()])))
            .on_add(Ok(AddToCartResponse::added("Added 1 Mug(s) to cart", mugs(1))))
            .on_checkout(Err(transport_error()));
        let mut controller = PageController::new(api).with_checkout_crash_rate(1.0);

        controller.search("mug").await;
        controller.add_to_cart(ProductId::new(1), 1).await;
        let outcome = controller.checkout().await;

        assert_eq!(outcome, ActionOutcome::NavigateHome);
        // A reloaded page starts blank
        assert_eq!(controller.state(), &PageState::default());
        assert_eq!(controller.view().message, None);
    }

    #[tokio::test]
    async fn test_crash_rate_is_clamped() {
        let controller = PageController::new(ScriptedApi::default()).with_checkout_crash_rate(7.0);
        assert!((controller.checkout_crash_rate - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscriber_sees_action_message_and_clear() {
        let api = ScriptedApi::default()
            .on_add(Ok(AddToCartResponse::added("Added 1 Mug(s) to cart", mugs(1))));
        let mut controller = PageController::new(api);
        let mut rx = controller.subscribe_messages();

        controller.add_to_cart(ProductId::new(1), 1).await;
        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow_and_update().as_ref().map(|m| m.text.clone()),
            Some("Added 1 Mug(s) to cart".to_string())
        );

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_message_clears_after_message_duration() {
        let controller = PageController::new(ScriptedApi::default());

        controller.show_message("Saved", MessageKind::Success);
        let message = controller.view().message.unwrap();
        assert_eq!(message.text, "Saved");
        assert_eq!(message.kind, MessageKind::Success);

        tokio::time::sleep(MESSAGE_DURATION - Duration::from_millis(1)).await;
        assert!(controller.view().message.is_some());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(controller.view().message, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_older_clear_timer_cuts_newer_message_short() {
        let controller = PageController::new(ScriptedApi::default());

        controller.show_message("first", MessageKind::Success);
        tokio::time::sleep(Duration::from_secs(3)).await;
        controller.show_message("second", MessageKind::Error);

        // The first timer fires 5s after the first message
        tokio::time::sleep(Duration::from_millis(2_001)).await;
        assert_eq!(controller.view().message, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_banner_duration() {
        let api = ScriptedApi::default().on_search(Ok(SearchResponse::failure("Product not found")));
        let mut controller = PageController::new(api)
            .with_banner(MessageBanner::with_duration(Duration::from_secs(1)));

        controller.search("kettle").await;
        assert_eq!(
            controller.banner().current().unwrap().text,
            "Product not found"
        );

        tokio::time::sleep(Duration::from_millis(1_001)).await;
        assert_eq!(controller.banner().current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_message_from_action_clears_after_five_seconds() {
        let api = ScriptedApi::default().on_search(Ok(SearchResponse::failure("Product not found")));
        let mut controller = PageController::new(api);

        controller.search("kettle").await;
        assert!(controller.view().message.is_some());

        tokio::time::sleep(Duration::from_millis(5_001)).await;
        assert_eq!(controller.view().message, None);
    }
}

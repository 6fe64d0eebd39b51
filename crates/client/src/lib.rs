//! Shopfront client library.
//!
//! Client-side glue for a retail storefront: product search, a mirror of the
//! server-tracked cart, and checkout, all through a JSON backend.
//!
//! # Architecture
//!
//! - [`api`] - `StoreApi` trait and its `reqwest` implementation
//! - [`controller`] - `PageController`, the page state and user actions
//! - [`view`] - View models and Askama rendering of the page
//! - [`message`] - Auto-clearing message banner
//! - [`config`], [`error`], [`telemetry`] - Environment config, errors, tracing and Sentry
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_client::{ClientConfig, PageController};
//!
//! let config = ClientConfig::from_env()?;
//! let mut page = PageController::connect(&config)?;
//!
//! page.search("mug").await;
//! page.add_to_cart(ProductId::new(1), 2).await;
//! println!("{}", page.view().render_html()?);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod message;
pub mod telemetry;
pub mod view;

pub use api::{ApiError, HttpStoreApi, StoreApi};
pub use config::{ClientConfig, ConfigError};
pub use controller::{ActionOutcome, GENERIC_ERROR_MESSAGE, PageController, PageState};
pub use error::RenderError;
pub use message::{MESSAGE_DURATION, Message, MessageBanner, MessageKind};
pub use view::{CartView, PageView, ProductResultsView, ProductRow, render_cart, render_products};

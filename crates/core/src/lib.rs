//! Shopfront Core - Shared types library.
//!
//! This crate provides the types exchanged between the storefront client and
//! the retail backend:
//! - `client` - HTTP client and page controller
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients. The backend is the source of truth for products and the cart;
//! these types only mirror what it sends.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and prices, products and cart items
//! - [`api`] - Endpoint paths, request forms and response envelopes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod types;

pub use types::*;

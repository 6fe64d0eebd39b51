//! `reqwest` implementation of [`StoreApi`].

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use shopfront_core::ProductId;
use shopfront_core::api::{
    ADD_TO_CART_PATH, AddToCartForm, AddToCartResponse, CHECKOUT_PATH, CheckoutResponse,
    SEARCH_PATH, SearchForm, SearchResponse,
};
use tracing::instrument;
use url::Url;

use super::{ApiError, StoreApi};
use crate::config::ClientConfig;

/// Characters of a bad response body kept in logs.
const LOGGED_BODY_CHARS: usize = 500;

/// HTTP client for the retail backend.
///
/// Cheap to clone; clones share the connection pool and the cookie jar, and
/// therefore the backend session (and cart).
#[derive(Clone)]
pub struct HttpStoreApi {
    inner: Arc<HttpStoreApiInner>,
}

struct HttpStoreApiInner {
    client: reqwest::Client,
    search_url: Url,
    add_to_cart_url: Url,
    checkout_url: Url,
}

impl HttpStoreApi {
    /// Create a client with its own cookie jar.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the endpoint
    /// URLs cannot be derived from the configured base URL.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()?;

        Self::with_client(client, &config.base_url)
    }

    /// Create a client around an existing `reqwest::Client`.
    ///
    /// The client should have a cookie store enabled, otherwise every
    /// request lands in a fresh backend session.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URLs cannot be derived from `base_url`.
    pub fn with_client(client: reqwest::Client, base_url: &Url) -> Result<Self, ApiError> {
        Ok(Self {
            inner: Arc::new(HttpStoreApiInner {
                client,
                search_url: endpoint(base_url, SEARCH_PATH)?,
                add_to_cart_url: endpoint(base_url, ADD_TO_CART_PATH)?,
                checkout_url: endpoint(base_url, CHECKOUT_PATH)?,
            }),
        })
    }

    /// POST an optional form and decode the JSON envelope.
    ///
    /// The status code is not checked: the backend answers failures with a
    /// JSON envelope too, and any body that does not decode is an error.
    async fn post<F, R>(&self, url: &Url, form: Option<&F>) -> Result<R, ApiError>
    where
        F: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.inner.client.post(url.clone());
        if let Some(form) = form {
            request = request.form(form);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                status = %status,
                url = %url,
                body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }
}

impl StoreApi for HttpStoreApi {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<SearchResponse, ApiError> {
        let form = SearchForm {
            product_name: query.to_string(),
        };
        self.post(&self.inner.search_url, Some(&form)).await
    }

    #[instrument(skip(self))]
    async fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<AddToCartResponse, ApiError> {
        let form = AddToCartForm {
            product_id,
            quantity,
        };
        self.post(&self.inner.add_to_cart_url, Some(&form)).await
    }

    #[instrument(skip(self))]
    async fn checkout(&self) -> Result<CheckoutResponse, ApiError> {
        self.post::<(), _>(&self.inner.checkout_url, None).await
    }
}

/// Resolve an endpoint path against the base URL, keeping any path prefix
/// the base URL carries (`http://host/shop` + `/search` = `http://host/shop/search`).
fn endpoint(base_url: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path.trim_start_matches('/'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_at_root() {
        let base = Url::parse("http://localhost:8080").unwrap();
        assert_eq!(
            endpoint(&base, SEARCH_PATH).unwrap().as_str(),
            "http://localhost:8080/search"
        );
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let base = Url::parse("https://example.com/shop").unwrap();
        assert_eq!(
            endpoint(&base, ADD_TO_CART_PATH).unwrap().as_str(),
            "https://example.com/shop/add-to-cart"
        );

        let base = Url::parse("https://example.com/shop/").unwrap();
        assert_eq!(
            endpoint(&base, CHECKOUT_PATH).unwrap().as_str(),
            "https://example.com/shop/checkout"
        );
    }

    #[test]
    fn test_new_builds_from_config() {
        let config = ClientConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        let api = HttpStoreApi::new(&config).unwrap();
        assert_eq!(api.inner.search_url.as_str(), "http://127.0.0.1:9/search");
    }
}

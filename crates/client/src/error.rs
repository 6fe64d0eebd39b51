//! Error reporting with Sentry integration.
//!
//! Backend failures never abort the page: the controller turns them into a
//! banner. This module holds the rendering error and the Sentry helpers used
//! when a failure is swallowed.

use thiserror::Error;

use crate::api::ApiError;

/// Template rendering failure.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Log a swallowed transport failure and capture it to Sentry.
///
/// Sentry capture is a no-op when no client is bound (no DSN configured).
pub fn report_transport_error(action: &str, err: &ApiError) {
    let event_id = sentry::capture_error(err);
    tracing::error!(
        action,
        error = %err,
        sentry_event_id = %event_id,
        "Request failed"
    );
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

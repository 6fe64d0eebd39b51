//! CLI actions on the storefront page.

pub mod output;
pub mod shell;

use std::io::Write;
use std::path::PathBuf;

use shopfront_client::{ActionOutcome, HttpStoreApi, PageController, RenderError};
use shopfront_core::ProductId;
use thiserror::Error;

/// Errors that can occur while running an action.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Writing to the terminal or the HTML file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Page could not be rendered to HTML.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search(String),
    Add(ProductId, u32),
    Checkout,
    /// Print the page without contacting the backend.
    Show,
    Help,
    Quit,
}

/// One page and where to mirror it.
pub struct Session {
    page: PageController<HttpStoreApi>,
    html_out: Option<PathBuf>,
}

impl Session {
    pub const fn new(page: PageController<HttpStoreApi>, html_out: Option<PathBuf>) -> Self {
        Self { page, html_out }
    }

    /// Run an action, then print the page and refresh the HTML file.
    ///
    /// Backend failures are not errors here: they end up on the banner.
    pub async fn perform(&mut self, action: Action) -> Result<(), CommandError> {
        let outcome = match action {
            Action::Search(query) => Some(self.page.search(&query).await),
            Action::Add(product_id, quantity) => {
                Some(self.page.add_to_cart(product_id, quantity).await)
            }
            Action::Checkout => Some(self.page.checkout().await),
            Action::Show => None,
            Action::Help => {
                let mut stdout = std::io::stdout().lock();
                shell::write_help(&mut stdout)?;
                return Ok(());
            }
            Action::Quit => return Ok(()),
        };

        if let Some(ActionOutcome::NavigateHome) = outcome {
            tracing::warn!("Page reloaded after a failed checkout");
        }

        let view = self.page.view();
        {
            let mut stdout = std::io::stdout().lock();
            output::write_view(&mut stdout, &view)?;
            stdout.flush()?;
        }

        if let Some(path) = &self.html_out {
            tokio::fs::write(path, view.render_html()?).await?;
            tracing::debug!(path = %path.display(), "Wrote page HTML");
        }

        Ok(())
    }
}

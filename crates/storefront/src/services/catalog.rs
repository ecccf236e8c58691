//! Product listing and search.

use std::sync::Arc;

use tracing::instrument;

use qkart_core::CatalogEntry;

use crate::api::ApiClient;
use crate::error::Result;

/// Catalog service.
pub struct CatalogService<'a> {
    api: &'a ApiClient,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Every product available to buy.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    pub async fn products(&self) -> Result<Arc<[CatalogEntry]>> {
        Ok(self.api.products().await?)
    }

    /// Products matching `text`. Blank text lists the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    #[instrument(skip(self))]
    pub async fn search(&self, text: &str) -> Result<Arc<[CatalogEntry]>> {
        let text = text.trim();
        if text.is_empty() {
            return self.products().await;
        }
        Ok(self.api.search_products(text).await?)
    }
}

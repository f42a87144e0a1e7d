//! Product catalog client.
//!
//! Wraps the HTTP transport for the product resource. Every operation here
//! degrades to a fallback value on failure instead of surfacing an error:
//! the UI keeps rendering with an empty page or a missing product while the
//! failure is logged. That policy is deliberate and is encoded in the
//! return types - there is no error arm for callers to observe.

use std::future::Future;

use anyhow::Result;
use tracing::{debug, warn};

use crate::api::HttpClient;
use crate::models::{NewProduct, Product, ProductPage};

/// Catalog CRUD and search against the backend product resource.
/// Stateless beyond request construction; Clone shares the connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    http: HttpClient,
}

impl CatalogClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Run a catalog request, degrading to `fallback` on failure.
    ///
    /// This is the single suppression point for catalog errors; the failed
    /// operation is logged and the caller sees only the degraded value.
    async fn degrade<T, F>(&self, operation: &'static str, fallback: T, request: F) -> T
    where
        F: Future<Output = Result<T>>,
    {
        match request.await {
            Ok(value) => value,
            Err(err) => {
                warn!(operation, error = %err, "catalog request failed; returning fallback");
                fallback
            }
        }
    }

    /// Fetch one page of products, optionally filtered by category.
    /// Falls back to an empty page.
    pub async fn get_products(&self, page: u32, category_id: Option<i64>) -> ProductPage {
        let mut path = format!("products?page={}", page);
        if let Some(category_id) = category_id {
            path.push_str(&format!("&categoryId={}", category_id));
        }

        self.degrade("get_products", ProductPage::default(), async {
            let result: ProductPage = self.http.get(&path).await?;
            debug!(count = result.content.len(), page, "fetched products");
            Ok(result)
        })
        .await
    }

    /// Fetch a single product. Falls back to `None`.
    pub async fn get_product(&self, id: i64) -> Option<Product> {
        let path = format!("products/{}", id);
        self.degrade("get_product", None, async {
            let product: Product = self.http.get(&path).await?;
            debug!(id, "fetched product");
            Ok(Some(product))
        })
        .await
    }

    /// Update a product in place. Falls back to `None`.
    pub async fn update_product(&self, product: &Product) -> Option<Product> {
        let path = format!("products/{}", product.id);
        self.degrade("update_product", None, async {
            let updated: Product = self.http.put(&path, product).await?;
            debug!(id = updated.id, "updated product");
            Ok(Some(updated))
        })
        .await
    }

    /// Create a product; the server assigns the id. Falls back to `None`.
    pub async fn add_product(&self, draft: &NewProduct) -> Option<Product> {
        self.degrade("add_product", None, async {
            let created: Product = self.http.post("products", draft).await?;
            debug!(id = created.id, "added product");
            Ok(Some(created))
        })
        .await
    }

    /// Delete a product, best-effort. Falls back to `None`.
    pub async fn delete_product(&self, id: i64) -> Option<Product> {
        let path = format!("products/{}", id);
        self.degrade("delete_product", None, async {
            let deleted: Product = self.http.delete(&path).await?;
            debug!(id, "deleted product");
            Ok(Some(deleted))
        })
        .await
    }

    /// Search products whose name contains the keyword, paged.
    /// Falls back to an empty page.
    pub async fn search_products(&self, keyword: &str, page: u32, size: u32) -> ProductPage {
        let path = format!(
            "search/findByNameContaining?name={}&page={}&size={}",
            urlencoding::encode(keyword),
            page,
            size
        );

        self.degrade("search_products", ProductPage::default(), async {
            let result: ProductPage = self.http.get(&path).await?;
            debug!(count = result.content.len(), keyword, "searched products");
            Ok(result)
        })
        .await
    }
}

use async_trait::async_trait;
use tracing::debug;

use crate::models::Product;

use super::CatalogClient;

/// Pre-navigation data loading capability.
///
/// A router calls `resolve` with the raw route parameter and delays the
/// transition until the entity arrives (or doesn't). Whether an unresolved
/// entity blocks navigation is the router's decision, not the resolver's.
#[async_trait]
pub trait RouteResolver {
    type Resolved;

    async fn resolve(&self, param: &str) -> Option<Self::Resolved>;
}

#[async_trait]
impl RouteResolver for CatalogClient {
    type Resolved = Product;

    /// Resolve a product from its route id parameter. A non-numeric
    /// parameter resolves to nothing without touching the network.
    async fn resolve(&self, param: &str) -> Option<Product> {
        debug!(param, "resolving product for navigation");
        let id: i64 = param.parse().ok()?;
        self.get_product(id).await
    }
}

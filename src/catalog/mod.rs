//! Product catalog access.
//!
//! This module provides the `CatalogClient` for product CRUD and search,
//! and the `RouteResolver` capability used to load a product before a
//! navigation completes.

pub mod client;
pub mod resolver;

pub use client::CatalogClient;
pub use resolver::RouteResolver;

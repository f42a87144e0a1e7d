//! HTTP transport module for the storefront backend API.
//!
//! This module provides the `HttpClient` used by the session manager and
//! the catalog client, plus the `ApiError` taxonomy for failed exchanges.

pub mod client;
pub mod error;

pub use client::HttpClient;
pub use error::ApiError;

use serde::{Deserialize, Serialize};

/// A catalog product as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(rename = "pictureUrl", default)]
    pub picture_url: Option<String>,
    #[serde(rename = "categoryId", default)]
    pub category_id: Option<i64>,
}

/// Body for creating a product; the server assigns the id.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(rename = "pictureUrl", skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    #[serde(rename = "categoryId", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

/// One page of products, in the backend's page envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub content: Vec<Product>,
    #[serde(default)]
    pub pageable: Pageable,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
    #[serde(default)]
    pub size: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pageable {
    #[serde(rename = "pageNumber", default)]
    pub page_number: u32,
    #[serde(rename = "pageSize", default)]
    pub page_size: u32,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub sort: Sort,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    #[serde(default)]
    pub sorted: bool,
    #[serde(default)]
    pub unsorted: bool,
    #[serde(default)]
    pub empty: bool,
}

//! Transport contract for the entity REST resources.
//!
//! Every entity is served under `/api/{resource}`:
//!
//! | Operation        | Request                              |
//! |------------------|--------------------------------------|
//! | `find`           | `GET /api/{resource}/{id}`           |
//! | `query`          | `GET /api/{resource}?{params}`       |
//! | `create`         | `POST /api/{resource}`               |
//! | `update`         | `PUT /api/{resource}/{id}`           |
//! | `partial_update` | `PATCH /api/{resource}/{id}`         |
//! | `delete`         | `DELETE /api/{resource}/{id}`        |
//!
//! [`EntityApi`] is the seam the resolver and the update controller depend
//! on; [`RestClient`] is the HTTP implementation.

mod client;

pub use client::RestClient;

use async_trait::async_trait;
use emporium_core::{Address, Category, Customer, Entity, Order, Product, WishList};
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Unauthorized (missing or invalid token).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Failed to build a request URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Query parameters for list requests.
///
/// Mirrors the paging/sorting parameters the backend understands; any other
/// criteria go into `filters` verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Zero-based page index.
    pub page: Option<u32>,
    /// Page size.
    pub size: Option<u32>,
    /// Sort criteria, e.g. `id,asc`. Repeated as separate `sort` parameters.
    pub sort: Vec<String>,
    /// Additional filter parameters.
    pub filters: Vec<(String, String)>,
}

impl QueryParams {
    /// Request a specific page.
    #[must_use]
    pub const fn page(mut self, page: u32, size: u32) -> Self {
        self.page = Some(page);
        self.size = Some(size);
        self
    }

    /// Append a sort criterion.
    #[must_use]
    pub fn sort(mut self, criterion: impl Into<String>) -> Self {
        self.sort.push(criterion.into());
        self
    }

    /// Append a filter parameter.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Flatten into ordered key/value pairs.
    #[must_use]
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        pairs.extend(self.sort.iter().map(|s| ("sort".to_string(), s.clone())));
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}

/// REST operations on one entity type.
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait EntityApi<E: Entity>: Send + Sync {
    /// Fetch one entity. `Ok(None)` means the backend has no such entity.
    async fn find(&self, id: E::Id) -> Result<Option<E>, ApiError>;

    /// List entities.
    async fn query(&self, params: &QueryParams) -> Result<Vec<E>, ApiError>;

    /// Create an entity; returns the stored copy with its assigned identifier.
    async fn create(&self, entity: &E::New) -> Result<E, ApiError>;

    /// Replace an existing entity.
    async fn update(&self, entity: &E) -> Result<E, ApiError>;

    /// Merge-patch an existing entity with the given JSON fields.
    async fn partial_update(&self, id: E::Id, patch: &serde_json::Value) -> Result<E, ApiError>;

    /// Delete an entity.
    async fn delete(&self, id: E::Id) -> Result<(), ApiError>;
}

/// A transport serving every entity of the catalogue.
pub trait Backend:
    EntityApi<Address>
    + EntityApi<Category>
    + EntityApi<Customer>
    + EntityApi<Order>
    + EntityApi<Product>
    + EntityApi<WishList>
{
}

impl<T> Backend for T where
    T: EntityApi<Address>
        + EntityApi<Category>
        + EntityApi<Customer>
        + EntityApi<Order>
        + EntityApi<Product>
        + EntityApi<WishList>
{
}

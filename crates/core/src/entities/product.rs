//! Product entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Category, Order, WishList};
use crate::entity::Entity;
use crate::types::{ProductId, ProductStatus, Unsaved};

/// A catalogue product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product<I = ProductId> {
    pub id: I,
    pub title: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    /// Rating from 0 to 5.
    pub rating: Option<i32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub quantity_in_stock: Option<i32>,
    pub status: Option<ProductStatus>,
    pub weight: Option<f64>,
    pub dimensions: Option<String>,
    pub date_added: Option<DateTime<Utc>>,
    pub date_modified: Option<DateTime<Utc>>,
    pub wish_list: Option<WishList>,
    pub order: Option<Order>,
    pub categories: Option<Vec<Category>>,
}

/// A product that has not been saved yet.
pub type NewProduct = Product<Unsaved>;

impl<I> Product<I> {
    /// Same product with a different identifier slot.
    #[must_use]
    pub fn with_id<J>(self, id: J) -> Product<J> {
        Product {
            id,
            title: self.title,
            keywords: self.keywords,
            description: self.description,
            rating: self.rating,
            price: self.price,
            quantity_in_stock: self.quantity_in_stock,
            status: self.status,
            weight: self.weight,
            dimensions: self.dimensions,
            date_added: self.date_added,
            date_modified: self.date_modified,
            wish_list: self.wish_list,
            order: self.order,
            categories: self.categories,
        }
    }
}

impl Entity for Product {
    type Id = ProductId;
    type New = NewProduct;

    const RESOURCE: &'static str = "products";

    fn id(&self) -> ProductId {
        self.id
    }
}

//! Category entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Product;
use crate::entity::Entity;
use crate::types::{CategoryId, CategoryStatus, Unsaved};

/// A catalogue category. Categories nest through `parent`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category<I = CategoryId> {
    pub id: I,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub date_added: Option<DateTime<Utc>>,
    pub date_modified: Option<DateTime<Utc>>,
    pub status: Option<CategoryStatus>,
    pub parent: Option<Box<Category>>,
    pub products: Option<Vec<Product>>,
}

/// A category that has not been saved yet.
pub type NewCategory = Category<Unsaved>;

impl<I> Category<I> {
    /// Same category with a different identifier slot.
    #[must_use]
    pub fn with_id<J>(self, id: J) -> Category<J> {
        Category {
            id,
            description: self.description,
            sort_order: self.sort_order,
            date_added: self.date_added,
            date_modified: self.date_modified,
            status: self.status,
            parent: self.parent,
            products: self.products,
        }
    }
}

impl Entity for Category {
    type Id = CategoryId;
    type New = NewCategory;

    const RESOURCE: &'static str = "categories";

    fn id(&self) -> CategoryId {
        self.id
    }
}

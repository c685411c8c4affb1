//! Wish list entity.

use serde::{Deserialize, Serialize};

use super::Customer;
use crate::entity::Entity;
use crate::types::{Unsaved, WishListId};

/// A customer's wish list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishList<I = WishListId> {
    pub id: I,
    pub title: Option<String>,
    pub restricted: Option<bool>,
    pub customer: Option<Customer>,
}

/// A wish list that has not been saved yet.
pub type NewWishList = WishList<Unsaved>;

impl<I> WishList<I> {
    /// Same wish list with a different identifier slot.
    #[must_use]
    pub fn with_id<J>(self, id: J) -> WishList<J> {
        WishList {
            id,
            title: self.title,
            restricted: self.restricted,
            customer: self.customer,
        }
    }
}

impl Entity for WishList {
    type Id = WishListId;
    type New = NewWishList;

    const RESOURCE: &'static str = "wish-lists";

    fn id(&self) -> WishListId {
        self.id
    }
}

use chrono::{DateTime, Utc};
use emporium_core::{Customer, NewWishList, Record, Unsaved, WishList, WishListId};
use serde::{Deserialize, Serialize};

use super::validation::{Constraint, FieldError, FieldInput, check};
use super::{EntityForm, FormError, FormService};

/// Form conversion service for wish lists.
pub type WishListFormService = FormService<WishListFormRawValue>;

/// Edit form raw value of a [`WishList`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishListFormRawValue {
    id: Option<WishListId>,
    pub title: Option<String>,
    pub restricted: Option<bool>,
    pub customer: Option<Customer>,
}

impl WishListFormRawValue {
    fn from_entity<I>(id: Option<WishListId>, wish_list: WishList<I>) -> Self {
        Self {
            id,
            title: wish_list.title,
            restricted: wish_list.restricted,
            customer: wish_list.customer,
        }
    }
}

impl EntityForm for WishListFormRawValue {
    type Entity = WishList;

    fn seed(record: Record<WishList>, _now: DateTime<Utc>) -> Self {
        match record {
            Record::Persisted(wish_list) => Self::from_entity(Some(wish_list.id), wish_list),
            Record::New(wish_list) => Self::from_entity(None, wish_list),
        }
    }

    fn id(&self) -> Option<WishListId> {
        self.id
    }

    fn into_record(self) -> Result<Record<WishList>, FormError> {
        let wish_list = NewWishList {
            id: Unsaved,
            title: self.title,
            restricted: self.restricted,
            customer: self.customer,
        };

        Ok(match self.id {
            Some(id) => Record::Persisted(wish_list.with_id(id)),
            None => Record::New(wish_list),
        })
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check(
            "title",
            FieldInput::from(self.title.as_deref()),
            &[
                Constraint::Required,
                Constraint::MinLength(3),
                Constraint::MaxLength(100),
            ],
            &mut errors,
        );
        errors
    }
}

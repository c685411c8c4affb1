//! Address entity.

use serde::{Deserialize, Serialize};

use super::Customer;
use crate::entity::Entity;
use crate::types::{AddressId, Unsaved};

/// A postal address, optionally owned by a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address<I = AddressId> {
    pub id: I,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    /// Two-letter country code.
    pub country: Option<String>,
    pub customer: Option<Customer>,
}

/// An address that has not been saved yet.
pub type NewAddress = Address<Unsaved>;

impl<I> Address<I> {
    /// Same address with a different identifier slot.
    #[must_use]
    pub fn with_id<J>(self, id: J) -> Address<J> {
        Address {
            id,
            address1: self.address1,
            address2: self.address2,
            city: self.city,
            postcode: self.postcode,
            country: self.country,
            customer: self.customer,
        }
    }
}

impl Entity for Address {
    type Id = AddressId;
    type New = NewAddress;

    const RESOURCE: &'static str = "addresses";

    fn id(&self) -> AddressId {
        self.id
    }
}

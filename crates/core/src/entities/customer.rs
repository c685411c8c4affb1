//! Customer entity.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::types::{CustomerId, Unsaved};

/// A customer account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer<I = CustomerId> {
    pub id: I,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
}

/// A customer that has not been saved yet.
pub type NewCustomer = Customer<Unsaved>;

impl<I> Customer<I> {
    /// Same customer with a different identifier slot.
    #[must_use]
    pub fn with_id<J>(self, id: J) -> Customer<J> {
        Customer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            telephone: self.telephone,
        }
    }
}

impl Entity for Customer {
    type Id = CustomerId;
    type New = NewCustomer;

    const RESOURCE: &'static str = "customers";

    fn id(&self) -> CustomerId {
        self.id
    }
}

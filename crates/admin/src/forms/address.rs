use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use emporium_core::{Address, AddressId, Customer, NewAddress, Record, Unsaved};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::validation::{Constraint, FieldError, check};
use super::{EntityForm, FormError, FormService};

#[allow(clippy::unwrap_used)] // Static regex pattern is known to be valid
static POSTCODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\s]+$").unwrap());

/// Form conversion service for addresses.
pub type AddressFormService = FormService<AddressFormRawValue>;

/// Edit form raw value of an [`Address`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFormRawValue {
    id: Option<AddressId>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub customer: Option<Customer>,
}

impl AddressFormRawValue {
    fn from_entity<I>(id: Option<AddressId>, address: Address<I>) -> Self {
        Self {
            id,
            address1: address.address1,
            address2: address.address2,
            city: address.city,
            postcode: address.postcode,
            country: address.country,
            customer: address.customer,
        }
    }
}

impl EntityForm for AddressFormRawValue {
    type Entity = Address;

    fn seed(record: Record<Address>, _now: DateTime<Utc>) -> Self {
        match record {
            Record::Persisted(address) => Self::from_entity(Some(address.id), address),
            Record::New(address) => Self::from_entity(None, address),
        }
    }

    fn id(&self) -> Option<AddressId> {
        self.id
    }

    fn into_record(self) -> Result<Record<Address>, FormError> {
        let address = NewAddress {
            id: Unsaved,
            address1: self.address1,
            address2: self.address2,
            city: self.city,
            postcode: self.postcode,
            country: self.country,
            customer: self.customer,
        };

        Ok(match self.id {
            Some(id) => Record::Persisted(address.with_id(id)),
            None => Record::New(address),
        })
    }

    fn validate(&self) -> Vec<FieldError> {
        use Constraint::{MaxLength, Pattern, Required};

        let mut errors = Vec::new();
        check("address1", self.address1.as_deref().into(), &[Required, MaxLength(100)], &mut errors);
        check("address2", self.address2.as_deref().into(), &[MaxLength(100)], &mut errors);
        check("city", self.city.as_deref().into(), &[Required, MaxLength(50)], &mut errors);
        check(
            "postcode",
            self.postcode.as_deref().into(),
            &[Required, MaxLength(10), Pattern(&POSTCODE_PATTERN)],
            &mut errors,
        );
        check("country", self.country.as_deref().into(), &[Required, MaxLength(2)], &mut errors);
        errors
    }
}

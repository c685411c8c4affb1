use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use emporium_core::{Customer, CustomerId, NewCustomer, Record, Unsaved};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::validation::{Constraint, FieldError, FieldInput, check};
use super::{EntityForm, FormError, FormService};

#[allow(clippy::unwrap_used)] // Static regex pattern is known to be valid
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w\-\.]+@([\w-]+\.)+[\w-]{2,4}$").unwrap());

#[allow(clippy::unwrap_used)] // Static regex pattern is known to be valid
static TELEPHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s-]+$").unwrap());

/// Form conversion service for customers.
pub type CustomerFormService = FormService<CustomerFormRawValue>;

/// Edit form raw value of a [`Customer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFormRawValue {
    id: Option<CustomerId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
}

impl CustomerFormRawValue {
    fn from_entity<I>(id: Option<CustomerId>, customer: Customer<I>) -> Self {
        Self {
            id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            telephone: customer.telephone,
        }
    }
}

impl EntityForm for CustomerFormRawValue {
    type Entity = Customer;

    fn seed(record: Record<Customer>, _now: DateTime<Utc>) -> Self {
        match record {
            Record::Persisted(customer) => Self::from_entity(Some(customer.id), customer),
            Record::New(customer) => Self::from_entity(None, customer),
        }
    }

    fn id(&self) -> Option<CustomerId> {
        self.id
    }

    fn into_record(self) -> Result<Record<Customer>, FormError> {
        let customer = NewCustomer {
            id: Unsaved,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            telephone: self.telephone,
        };

        Ok(match self.id {
            Some(id) => Record::Persisted(customer.with_id(id)),
            None => Record::New(customer),
        })
    }

    fn validate(&self) -> Vec<FieldError> {
        let name = [
            Constraint::Required,
            Constraint::MinLength(2),
            Constraint::MaxLength(50),
        ];

        let mut errors = Vec::new();
        check("firstName", self.first_name.as_deref().into(), &name, &mut errors);
        check("lastName", self.last_name.as_deref().into(), &name, &mut errors);
        check(
            "email",
            FieldInput::from(self.email.as_deref()),
            &[Constraint::Required, Constraint::Pattern(&EMAIL_PATTERN)],
            &mut errors,
        );
        check(
            "telephone",
            FieldInput::from(self.telephone.as_deref()),
            &[Constraint::MaxLength(15), Constraint::Pattern(&TELEPHONE_PATTERN)],
            &mut errors,
        );
        errors
    }
}

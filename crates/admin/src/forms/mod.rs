//! Form conversion between entities and their editable raw values.
//!
//! Each entity has a raw-value type (`ProductFormRawValue`, ...) mirroring
//! its fields, with timestamps re-encoded as display strings (see
//! [`datetime`]) and the identifier kept private. The identifier is part of
//! the raw value and survives extraction, but cannot be edited.
//!
//! [`FormService`] is the conversion service:
//!
//! | Operation | Description |
//! |-----------|-------------|
//! | `create_form` | Seed a new form from a record merged over defaults |
//! | `extract` | Convert the raw value back into a record |
//! | `reset_form` | Re-seed an existing form in place |

pub mod datetime;
pub mod validation;

mod address;
mod category;
mod customer;
mod order;
mod product;
mod wish_list;

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use emporium_core::{Entity, Record};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use address::{AddressFormRawValue, AddressFormService};
pub use category::{CategoryFormRawValue, CategoryFormService};
pub use customer::{CustomerFormRawValue, CustomerFormService};
pub use datetime::DATE_TIME_FORMAT;
pub use order::{OrderFormRawValue, OrderFormService};
pub use product::{ProductFormRawValue, ProductFormService};
pub use validation::{Constraint, FieldError, FieldInput, Violation};
pub use wish_list::{WishListFormRawValue, WishListFormService};

/// Errors raised while editing or extracting a form.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Invalid timestamp in {field}: {value:?}")]
    InvalidTimestamp { field: String, value: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field is disabled: {0}")]
    DisabledField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Raw value of an entity's edit form.
pub trait EntityForm:
    Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The entity this form edits.
    type Entity: Entity;

    /// Name of the disabled identifier field.
    const ID_FIELD: &'static str = "id";

    /// Build a raw value from `record`.
    ///
    /// A new record is merged over this form's defaults, which only fill
    /// fields it leaves empty; `now` is the value used for timestamp
    /// defaults. A persisted record is taken as is, so an absent value
    /// stays absent through extraction.
    fn seed(record: Record<Self::Entity>, now: DateTime<Utc>) -> Self;

    /// The identifier held by the form, `None` while unsaved.
    fn id(&self) -> Option<<Self::Entity as Entity>::Id>;

    /// Convert back into a record, parsing display-encoded timestamps.
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidTimestamp` if a timestamp field is not in
    /// the display format.
    fn into_record(self) -> Result<Record<Self::Entity>, FormError>;

    /// Check every field against its declared constraints.
    fn validate(&self) -> Vec<FieldError>;
}

/// Source of the current time for timestamp defaults.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Form conversion service for one entity type.
pub struct FormService<F> {
    clock: Clock,
    _form: PhantomData<fn() -> F>,
}

impl<F> Clone for FormService<F> {
    fn clone(&self) -> Self {
        Self {
            clock: Arc::clone(&self.clock),
            _form: PhantomData,
        }
    }
}

impl<F> Debug for FormService<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormService")
            .field("form", &std::any::type_name::<F>())
            .finish_non_exhaustive()
    }
}

impl<F: EntityForm> Default for FormService<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: EntityForm> FormService<F> {
    /// Service using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }

    /// Service using a custom clock.
    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            _form: PhantomData,
        }
    }

    /// Build a form seeded with `initial` merged over the defaults.
    ///
    /// With no initial value the form holds a new record.
    #[must_use]
    pub fn create_form(&self, initial: Option<Record<F::Entity>>) -> EditForm<F> {
        EditForm {
            raw: F::seed(initial.unwrap_or_default(), (self.clock)()),
        }
    }

    /// Read the form back into a record, including its identifier.
    ///
    /// Constraint violations do not prevent extraction.
    ///
    /// # Errors
    ///
    /// Returns `FormError` if a timestamp field cannot be parsed.
    pub fn extract(&self, form: &EditForm<F>) -> Result<Record<F::Entity>, FormError> {
        form.raw.clone().into_record()
    }

    /// Re-seed `form` in place from `value` merged over the defaults.
    pub fn reset_form(&self, form: &mut EditForm<F>, value: Record<F::Entity>) {
        form.raw = F::seed(value, (self.clock)());
    }
}

/// An edit form holding a raw value.
///
/// Only a [`FormService`] can seed the identifier; edits go through
/// [`EditForm::update`] or [`EditForm::set_field`], neither of which can
/// reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm<F> {
    raw: F,
}

impl<F: EntityForm> EditForm<F> {
    /// The full raw value, including the disabled identifier.
    #[must_use]
    pub const fn raw_value(&self) -> &F {
        &self.raw
    }

    /// The identifier held by the form.
    #[must_use]
    pub fn id(&self) -> Option<<F::Entity as Entity>::Id> {
        self.raw.id()
    }

    /// Whether `field` is disabled for direct editing.
    #[must_use]
    pub fn is_disabled(&self, field: &str) -> bool {
        field == F::ID_FIELD
    }

    /// Edit the raw value's public fields.
    pub fn update(&mut self, edit: impl FnOnce(&mut F)) {
        edit(&mut self.raw);
    }

    /// Set one field by its wire name (`quantityInStock`, `wishList`, ...).
    ///
    /// # Errors
    ///
    /// Returns `FormError::DisabledField` for the identifier,
    /// `FormError::UnknownField` for names the form does not have and
    /// `FormError::InvalidValue` if `value` does not fit the field.
    pub fn set_field(&mut self, field: &str, value: serde_json::Value) -> Result<(), FormError> {
        if self.is_disabled(field) {
            return Err(FormError::DisabledField(field.to_string()));
        }

        let invalid = |e: serde_json::Error| FormError::InvalidValue {
            field: field.to_string(),
            message: e.to_string(),
        };

        let mut current = serde_json::to_value(&self.raw).map_err(invalid)?;
        let slot = current
            .as_object_mut()
            .and_then(|fields| fields.get_mut(field))
            .ok_or_else(|| FormError::UnknownField(field.to_string()))?;
        *slot = value;

        self.raw = serde_json::from_value(current).map_err(invalid)?;
        Ok(())
    }

    /// Constraint violations of the current raw value.
    #[must_use]
    pub fn errors(&self) -> Vec<FieldError> {
        self.raw.validate()
    }

    /// Whether every field satisfies its constraints.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }
}

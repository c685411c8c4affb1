//! Identifier newtypes, one per entity.
//!
//! `define_id!` stamps out an `i64` wrapper per entity so a `ProductId`
//! can never be passed where a `WishListId` is expected.
//!
//! Identifiers are assigned by the backing store. An entity that has not been
//! saved yet carries the [`Unsaved`] marker in its identifier slot instead of
//! an ID, which serializes as JSON `null`.

use serde::{Deserialize, Serialize};

/// Identifier slot of an entity.
///
/// Implemented for every ID type (present) and for [`Unsaved`] (absent).
pub trait IdSlot<Id>: Copy {
    /// The identifier held by this slot, if any.
    fn get(self) -> Option<Id>;
}

/// Identifier slot of an entity that has not been persisted yet.
///
/// Serializes as `null` and only deserializes from `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unsaved;

/// Define an `i64` identifier newtype.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>`, `Into<i64>`, `Display` and `FromStr` implementations
/// - [`IdSlot`] implementations for the ID itself and for [`Unsaved`]
///
/// # Example
///
/// ```rust
/// # use emporium_core::define_id;
/// define_id!(InvoiceId);
/// define_id!(ShipmentId);
///
/// let invoice_id = InvoiceId::new(1);
/// let shipment_id: ShipmentId = "1".parse().unwrap();
///
/// // Distinct types; mixing them is a compile error:
/// // let _: InvoiceId = shipment_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl $crate::IdSlot<$name> for $name {
            fn get(self) -> Option<$name> {
                Some(self)
            }
        }

        impl $crate::IdSlot<$name> for $crate::Unsaved {
            fn get(self) -> Option<$name> {
                None
            }
        }
    };
}

define_id!(AddressId);
define_id!(CategoryId);
define_id!(CustomerId);
define_id!(OrderId);
define_id!(ProductId);
define_id!(WishListId);

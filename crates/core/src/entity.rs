//! The persisted-entity contract shared by every record type.

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A persisted domain record with a server-assigned identifier.
///
/// Implemented for the persisted form of each entity (`Product<ProductId>`).
/// The unsaved form (`Product<Unsaved>`) is named by [`Entity::New`].
pub trait Entity: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Identifier type.
    type Id: Copy
        + Debug
        + Display
        + Eq
        + Hash
        + FromStr
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Same record with its identifier statically absent.
    type New: Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Plural REST resource name (`/api/{RESOURCE}`).
    const RESOURCE: &'static str;

    /// The server-assigned identifier.
    fn id(&self) -> Self::Id;
}

/// Either a persisted entity or its unsaved counterpart.
///
/// Used as the input of form construction and as the output of form
/// extraction: the variant decides between create and update on save.
#[derive(Debug, Clone, PartialEq)]
pub enum Record<E: Entity> {
    /// Loaded from the backing store; has an identifier.
    Persisted(E),
    /// Not saved yet; identifier is null.
    New(E::New),
}

impl<E: Entity> Record<E> {
    /// Identifier of the record, `None` while unsaved.
    #[must_use]
    pub fn id(&self) -> Option<E::Id> {
        match self {
            Self::Persisted(entity) => Some(entity.id()),
            Self::New(_) => None,
        }
    }

    /// Whether the record has not been saved yet.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::New(_))
    }

    /// The persisted entity, if any.
    #[must_use]
    pub fn into_persisted(self) -> Option<E> {
        match self {
            Self::Persisted(entity) => Some(entity),
            Self::New(_) => None,
        }
    }
}

impl<E: Entity> Default for Record<E> {
    fn default() -> Self {
        Self::New(E::New::default())
    }
}

impl<E: Entity> From<E> for Record<E> {
    fn from(entity: E) -> Self {
        Self::Persisted(entity)
    }
}

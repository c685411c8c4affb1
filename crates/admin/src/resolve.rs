//! Reference resolution for detail and edit views.
//!
//! A navigation request carries an optional raw identifier. [`Resolver`]
//! turns it into a [`Resolution`] with at most one backend request. Not
//! found is a value, not an error; the caller decides where to navigate.

use std::marker::PhantomData;
use std::sync::Arc;

use emporium_core::Entity;
use tracing::{debug, instrument};

use crate::api::{ApiError, EntityApi};

/// Default route navigated to when a resolution finds nothing.
pub const NOT_FOUND_ROUTE: &str = "404";

/// Outcome of resolving a navigation identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<E> {
    /// No identifier was given: the view creates a new entity.
    Create,
    /// The entity was loaded.
    Found(E),
    /// The backend has no entity with that identifier.
    NotFound,
}

impl<E> Resolution<E> {
    /// The loaded entity, if any.
    #[must_use]
    pub fn into_entity(self) -> Option<E> {
        match self {
            Self::Found(entity) => Some(entity),
            Self::Create | Self::NotFound => None,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Navigation side effects requested by the admin views.
pub trait Navigator: Send + Sync {
    /// Return to the previous view.
    fn back(&self);

    /// Go to `route`.
    fn navigate(&self, route: &str);
}

/// Resolves navigation identifiers for one entity type.
pub struct Resolver<E, A: ?Sized> {
    api: Arc<A>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, A: ?Sized> Clone for Resolver<E, A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            _entity: PhantomData,
        }
    }
}

impl<E, A> Resolver<E, A>
where
    E: Entity,
    A: EntityApi<E> + ?Sized,
{
    pub const fn new(api: Arc<A>) -> Self {
        Self {
            api,
            _entity: PhantomData,
        }
    }

    /// Resolve `raw_id` into an entity.
    ///
    /// Missing or blank identifiers resolve to [`Resolution::Create`] without
    /// a request. Identifiers that do not parse cannot exist and resolve to
    /// [`Resolution::NotFound`], also without a request.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the fetch fails. Nothing is retried.
    #[instrument(skip(self), fields(resource = E::RESOURCE))]
    pub async fn resolve(&self, raw_id: Option<&str>) -> Result<Resolution<E>, ApiError> {
        let Some(raw_id) = raw_id.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Ok(Resolution::Create);
        };

        let Ok(id) = raw_id.parse::<E::Id>() else {
            debug!(raw_id, "Identifier does not parse");
            return Ok(Resolution::NotFound);
        };

        Ok(match EntityApi::<E>::find(&*self.api, id).await? {
            Some(entity) => Resolution::Found(entity),
            None => Resolution::NotFound,
        })
    }
}

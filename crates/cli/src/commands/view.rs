//! Read-only commands.

use std::sync::Arc;

use emporium_admin::api::{EntityApi, QueryParams};
use emporium_admin::resolve::{Resolution, Resolver};
use emporium_core::Entity;

use super::{CommandError, Context, print_json};

/// Print the entity with identifier `id`.
pub async fn show<E: Entity>(context: &Context, id: &str) -> Result<(), CommandError> {
    let entity = find::<E>(context, id).await?;
    print_json(&entity)
}

/// Print one page of entities.
pub async fn list<E: Entity>(context: &Context, params: &QueryParams) -> Result<(), CommandError> {
    let entities = EntityApi::<E>::query(&*context.client, params).await?;
    tracing::debug!(resource = E::RESOURCE, count = entities.len(), "Listed entities");
    print_json(&entities)
}

/// Build query parameters from the `list` arguments.
pub fn query_params(
    page: Option<u32>,
    size: Option<u32>,
    sort: Vec<String>,
    filters: Vec<(String, String)>,
) -> QueryParams {
    QueryParams {
        page,
        size,
        sort,
        filters,
    }
}

/// Resolve `id`, treating a blank id or a missing entity as an error.
pub(super) async fn find<E: Entity>(context: &Context, id: &str) -> Result<E, CommandError> {
    match Resolver::<E, _>::new(Arc::clone(&context.client)).resolve(Some(id)).await? {
        Resolution::Found(entity) => Ok(entity),
        Resolution::NotFound => Err(CommandError::NotFound {
            resource: E::RESOURCE,
            id: id.to_string(),
        }),
        Resolution::Create => Err(CommandError::MissingId),
    }
}

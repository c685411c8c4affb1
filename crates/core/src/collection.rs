//! Identity-based collection helpers for option lists.
//!
//! A select list offered for a reference field must always contain the value
//! currently assigned to that field, even when the option query (paged or
//! filtered) did not return it. [`merge`] prepends such values without ever
//! introducing duplicate identifiers.

use std::collections::HashSet;

use crate::entity::Entity;

/// Merge candidate entities into `base`, deduplicated by identifier.
///
/// Absent candidates are skipped. A candidate is kept only if neither `base`
/// nor an earlier candidate already has its identifier. Kept candidates come
/// first, in input order, followed by `base` unchanged.
///
/// # Example
///
/// ```
/// use emporium_core::{NewWishList, WishListId, merge};
///
/// let wish_list = |id| NewWishList::default().with_id(WishListId::new(id));
/// let options = vec![wish_list(14566)];
///
/// let merged = merge(options, [Some(wish_list(29642)), None, Some(wish_list(14566))]);
/// let ids: Vec<i64> = merged.iter().map(|w| w.id.as_i64()).collect();
/// assert_eq!(ids, [29642, 14566]);
/// ```
#[must_use]
pub fn merge<T, I>(base: Vec<T>, candidates: I) -> Vec<T>
where
    T: Entity,
    I: IntoIterator<Item = Option<T>>,
{
    let present: Vec<T> = candidates.into_iter().flatten().collect();
    if present.is_empty() {
        return base;
    }

    let mut seen: HashSet<T::Id> = base.iter().map(Entity::id).collect();
    let mut merged: Vec<T> = present
        .into_iter()
        .filter(|candidate| seen.insert(candidate.id()))
        .collect();
    merged.extend(base);
    merged
}

/// Identity equality for optional entity references.
///
/// Two present entities are equal when their identifiers match; two absent
/// values are equal; a present and an absent value are not.
#[must_use]
pub fn compare<T: Entity>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.id() == b.id(),
        (None, None) => true,
        _ => false,
    }
}

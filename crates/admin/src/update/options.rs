//! Option lists for reference fields of each update view.
//!
//! Every list is built from its own query and then merged with the current
//! entity's reference values, so the assigned value is always selectable
//! even when the query did not return it. Queries run concurrently; a
//! failing query leaves its list as it was.

use async_trait::async_trait;
use emporium_core::{Address, Category, Customer, Entity, Order, Product, WishList, merge};
use tracing::warn;

use crate::api::{Backend, EntityApi, QueryParams};

/// The option lists an update view offers for its reference fields.
#[async_trait]
pub trait RelationshipOptions<E: Entity>: Default + Send + Sync {
    /// Merge `entity`'s current reference values into the lists.
    fn include_references(&mut self, entity: &E);

    /// Query every list and merge in `current`'s reference values.
    async fn load<B: Backend + ?Sized>(&mut self, backend: &B, current: Option<&E>);
}

/// Query one option list, merge in `references`, and store the result in
/// `slot`. On failure `slot` is left untouched.
async fn refresh<T, B>(backend: &B, slot: &mut Vec<T>, references: Vec<T>)
where
    T: Entity,
    B: EntityApi<T> + ?Sized,
{
    match EntityApi::<T>::query(backend, &QueryParams::default()).await {
        Ok(options) => *slot = merge(options, references.into_iter().map(Some)),
        Err(e) => warn!(resource = T::RESOURCE, error = %e, "Failed to load options"),
    }
}

fn include<T: Entity>(slot: &mut Vec<T>, references: Vec<T>) {
    *slot = merge(std::mem::take(slot), references.into_iter().map(Some));
}

/// Customers have no reference fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoRelationships;

#[async_trait]
impl RelationshipOptions<Customer> for NoRelationships {
    fn include_references(&mut self, _entity: &Customer) {}

    async fn load<B: Backend + ?Sized>(&mut self, _backend: &B, _current: Option<&Customer>) {}
}

/// Options of the address update view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressOptions {
    pub customers: Vec<Customer>,
}

#[async_trait]
impl RelationshipOptions<Address> for AddressOptions {
    fn include_references(&mut self, entity: &Address) {
        include(&mut self.customers, entity.customer.iter().cloned().collect());
    }

    async fn load<B: Backend + ?Sized>(&mut self, backend: &B, current: Option<&Address>) {
        let customers = current.and_then(|a| a.customer.clone()).into_iter().collect();
        refresh(backend, &mut self.customers, customers).await;
    }
}

/// Options of the wish list update view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishListOptions {
    pub customers: Vec<Customer>,
}

#[async_trait]
impl RelationshipOptions<WishList> for WishListOptions {
    fn include_references(&mut self, entity: &WishList) {
        include(&mut self.customers, entity.customer.iter().cloned().collect());
    }

    async fn load<B: Backend + ?Sized>(&mut self, backend: &B, current: Option<&WishList>) {
        let customers = current.and_then(|w| w.customer.clone()).into_iter().collect();
        refresh(backend, &mut self.customers, customers).await;
    }
}

/// Options of the order update view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderOptions {
    pub addresses: Vec<Address>,
    pub customers: Vec<Customer>,
}

#[async_trait]
impl RelationshipOptions<Order> for OrderOptions {
    fn include_references(&mut self, entity: &Order) {
        include(&mut self.addresses, entity.shipping_address.iter().cloned().collect());
        include(&mut self.customers, entity.customer.iter().cloned().collect());
    }

    async fn load<B: Backend + ?Sized>(&mut self, backend: &B, current: Option<&Order>) {
        let addresses = current
            .and_then(|o| o.shipping_address.clone())
            .into_iter()
            .collect();
        let customers = current.and_then(|o| o.customer.clone()).into_iter().collect();

        tokio::join!(
            refresh(backend, &mut self.addresses, addresses),
            refresh(backend, &mut self.customers, customers),
        );
    }
}

/// Options of the category update view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryOptions {
    /// Candidate parents.
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

#[async_trait]
impl RelationshipOptions<Category> for CategoryOptions {
    fn include_references(&mut self, entity: &Category) {
        include(
            &mut self.categories,
            entity.parent.iter().map(|p| (**p).clone()).collect(),
        );
        include(&mut self.products, entity.products.clone().unwrap_or_default());
    }

    async fn load<B: Backend + ?Sized>(&mut self, backend: &B, current: Option<&Category>) {
        let parents = current
            .and_then(|c| c.parent.as_deref().cloned())
            .into_iter()
            .collect();
        let products = current
            .and_then(|c| c.products.clone())
            .unwrap_or_default();

        tokio::join!(
            refresh(backend, &mut self.categories, parents),
            refresh(backend, &mut self.products, products),
        );
    }
}

/// Options of the product update view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductOptions {
    pub wish_lists: Vec<WishList>,
    pub orders: Vec<Order>,
    pub categories: Vec<Category>,
}

#[async_trait]
impl RelationshipOptions<Product> for ProductOptions {
    fn include_references(&mut self, entity: &Product) {
        include(&mut self.wish_lists, entity.wish_list.iter().cloned().collect());
        include(&mut self.orders, entity.order.iter().cloned().collect());
        include(&mut self.categories, entity.categories.clone().unwrap_or_default());
    }

    async fn load<B: Backend + ?Sized>(&mut self, backend: &B, current: Option<&Product>) {
        let wish_lists = current.and_then(|p| p.wish_list.clone()).into_iter().collect();
        let orders = current.and_then(|p| p.order.clone()).into_iter().collect();
        let categories = current
            .and_then(|p| p.categories.clone())
            .unwrap_or_default();

        tokio::join!(
            refresh(backend, &mut self.wish_lists, wish_lists),
            refresh(backend, &mut self.orders, orders),
            refresh(backend, &mut self.categories, categories),
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use emporium_core::{
        CategoryId, NewCategory, NewOrder, NewProduct, NewWishList, OrderId, ProductId,
        WishListId,
    };

    use super::*;
    use crate::testing::{Call, RecordingBackend};

    fn wish_list(id: i64) -> WishList {
        NewWishList::default().with_id(WishListId::new(id))
    }

    fn category(id: i64) -> Category {
        NewCategory::default().with_id(CategoryId::new(id))
    }

    fn product() -> Product {
        NewProduct {
            wish_list: Some(wish_list(29642)),
            categories: Some(vec![category(1), category(2)]),
            ..NewProduct::default()
        }
        .with_id(ProductId::new(456))
    }

    #[tokio::test]
    async fn test_current_reference_is_prepended() {
        let backend = RecordingBackend::default().with(vec![wish_list(14566)]);
        let mut options = ProductOptions::default();

        options.load(&backend, Some(&product())).await;

        let ids: Vec<i64> = options.wish_lists.iter().map(|w| w.id.as_i64()).collect();
        assert_eq!(ids, [29642, 14566]);
        assert!(options.orders.is_empty());
        assert_eq!(options.categories, [category(1), category(2)]);

        let mut calls = backend.calls();
        calls.sort_by_key(|c| format!("{c:?}"));
        assert_eq!(
            calls,
            [
                Call::Query("categories"),
                Call::Query("orders"),
                Call::Query("wish-lists"),
            ]
        );
    }

    #[tokio::test]
    async fn test_reference_already_listed_is_not_duplicated() {
        let backend = RecordingBackend::default().with(vec![category(2), category(3)]);
        let mut options = ProductOptions::default();

        options.load(&backend, Some(&product())).await;

        let ids: Vec<i64> = options.categories.iter().map(|c| c.id.as_i64()).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failed_query_keeps_previous_list() {
        let backend = RecordingBackend::default()
            .with(vec![wish_list(14566)])
            .failing_on("orders");
        let mut options = ProductOptions {
            orders: vec![NewOrder::default().with_id(OrderId::new(9))],
            ..ProductOptions::default()
        };

        options.load(&backend, None).await;

        assert_eq!(options.wish_lists, [wish_list(14566)]);
        assert_eq!(options.orders.len(), 1);
    }

    #[test]
    fn test_include_references_before_queries_complete() {
        let mut options = CategoryOptions::default();
        let child = NewCategory {
            parent: Some(Box::new(category(21109))),
            products: Some(vec![NewProduct::default().with_id(ProductId::new(3330))]),
            ..NewCategory::default()
        }
        .with_id(CategoryId::new(1260));

        options.include_references(&child);
        options.include_references(&child);

        assert_eq!(options.categories, [category(21109)]);
        assert_eq!(options.products.len(), 1);
    }

    #[tokio::test]
    async fn test_customer_view_issues_no_queries() {
        let backend = RecordingBackend::default();
        let mut options = NoRelationships;
        let customer = emporium_core::NewCustomer::default().with_id(emporium_core::CustomerId::new(1));

        options.load(&backend, Some(&customer)).await;
        assert!(backend.calls().is_empty());
    }
}

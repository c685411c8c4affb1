//! Entity records of the catalogue domain.
//!
//! Every record is generic over its identifier slot: the default parameter is
//! the persisted form carrying a server-assigned ID, and the `New*` alias is
//! the same shape with [`Unsaved`](crate::Unsaved) in place of the ID.
//! Reference fields hold whole snapshots of the related persisted entity.

mod address;
mod category;
mod customer;
mod order;
mod product;
mod wish_list;

pub use address::{Address, NewAddress};
pub use category::{Category, NewCategory};
pub use customer::{Customer, NewCustomer};
pub use order::{NewOrder, Order};
pub use product::{NewProduct, Product};
pub use wish_list::{NewWishList, WishList};

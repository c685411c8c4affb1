//! Order entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Address, Customer};
use crate::entity::Entity;
use crate::types::{OrderId, Unsaved};

/// A customer order.
///
/// Monetary amounts travel as JSON numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order<I = OrderId> {
    pub id: I,
    pub order_date: Option<DateTime<Utc>>,
    pub shipped_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_amount: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub shipping_cost: Option<Decimal>,
    pub tracking_number: Option<String>,
    pub shipping_address: Option<Address>,
    pub customer: Option<Customer>,
}

/// An order that has not been saved yet.
pub type NewOrder = Order<Unsaved>;

impl<I> Order<I> {
    /// Same order with a different identifier slot.
    #[must_use]
    pub fn with_id<J>(self, id: J) -> Order<J> {
        Order {
            id,
            order_date: self.order_date,
            shipped_date: self.shipped_date,
            status: self.status,
            total_amount: self.total_amount,
            shipping_cost: self.shipping_cost,
            tracking_number: self.tracking_number,
            shipping_address: self.shipping_address,
            customer: self.customer,
        }
    }
}

impl Entity for Order {
    type Id = OrderId;
    type New = NewOrder;

    const RESOURCE: &'static str = "orders";

    fn id(&self) -> OrderId {
        self.id
    }
}

use chrono::{DateTime, Utc};
use emporium_core::{Address, Customer, NewOrder, Order, OrderId, Record, Unsaved};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::datetime;
use super::validation::{Constraint, FieldError, FieldInput, check};
use super::{EntityForm, FormError, FormService};

/// Form conversion service for orders.
pub type OrderFormService = FormService<OrderFormRawValue>;

/// Edit form raw value of an [`Order`].
///
/// `orderDate` and `shippedDate` hold [`DATE_TIME_FORMAT`](super::DATE_TIME_FORMAT)
/// strings and default to the time the form was seeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFormRawValue {
    id: Option<OrderId>,
    pub order_date: Option<String>,
    pub shipped_date: Option<String>,
    pub status: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_amount: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub shipping_cost: Option<Decimal>,
    pub tracking_number: Option<String>,
    pub shipping_address: Option<Address>,
    pub customer: Option<Customer>,
}

impl OrderFormRawValue {
    fn from_entity<I>(id: Option<OrderId>, order: Order<I>) -> Self {
        Self {
            id,
            order_date: datetime::format(order.order_date),
            shipped_date: datetime::format(order.shipped_date),
            status: order.status,
            total_amount: order.total_amount,
            shipping_cost: order.shipping_cost,
            tracking_number: order.tracking_number,
            shipping_address: order.shipping_address,
            customer: order.customer,
        }
    }

    /// Fill the empty dates of a new order with `now`.
    fn with_defaults(mut self, now: DateTime<Utc>) -> Self {
        let now = datetime::format(Some(now));
        self.order_date = self.order_date.or_else(|| now.clone());
        self.shipped_date = self.shipped_date.or(now);
        self
    }
}

impl EntityForm for OrderFormRawValue {
    type Entity = Order;

    fn seed(record: Record<Order>, now: DateTime<Utc>) -> Self {
        match record {
            Record::Persisted(order) => Self::from_entity(Some(order.id), order),
            Record::New(order) => Self::from_entity(None, order).with_defaults(now),
        }
    }

    fn id(&self) -> Option<OrderId> {
        self.id
    }

    fn into_record(self) -> Result<Record<Order>, FormError> {
        let order = NewOrder {
            id: Unsaved,
            order_date: datetime::parse("orderDate", self.order_date.as_deref())?,
            shipped_date: datetime::parse("shippedDate", self.shipped_date.as_deref())?,
            status: self.status,
            total_amount: self.total_amount,
            shipping_cost: self.shipping_cost,
            tracking_number: self.tracking_number,
            shipping_address: self.shipping_address,
            customer: self.customer,
        };

        Ok(match self.id {
            Some(id) => Record::Persisted(order.with_id(id)),
            None => Record::New(order),
        })
    }

    fn validate(&self) -> Vec<FieldError> {
        use Constraint::{MaxLength, Min, MinLength, Required};

        let mut errors = Vec::new();
        check("orderDate", self.order_date.as_deref().into(), &[Required], &mut errors);
        check("status", self.status.as_deref().into(), &[Required, MinLength(3)], &mut errors);
        check(
            "totalAmount",
            FieldInput::from(self.total_amount),
            &[Required, Min(0.0)],
            &mut errors,
        );
        check("shippingCost", FieldInput::from(self.shipping_cost), &[Min(0.0)], &mut errors);
        check(
            "trackingNumber",
            self.tracking_number.as_deref().into(),
            &[MaxLength(50)],
            &mut errors,
        );
        errors
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use emporium_core::{AddressId, NewAddress};
    use serde_json::json;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 10, 8, 30, 0).unwrap()
    }

    fn service() -> OrderFormService {
        OrderFormService::with_clock(Arc::new(now))
    }

    #[test]
    fn test_new_form_defaults_dates_to_now() {
        let service = service();
        let form = service.create_form(None);
        assert_eq!(form.raw_value().order_date.as_deref(), Some("2024-09-10T08:30"));
        assert_eq!(form.raw_value().shipped_date.as_deref(), Some("2024-09-10T08:30"));

        let Record::New(order) = service.extract(&form).unwrap() else {
            panic!("expected a new order");
        };
        assert_eq!(order.order_date, Some(now()));
        assert_eq!(order.shipped_date, Some(now()));
        assert_eq!(order.status, None);
    }

    #[test]
    fn test_persisted_dates_win_over_defaults() {
        let placed = Utc.with_ymd_and_hms(2024, 9, 9, 20, 15, 41).unwrap();
        let order = NewOrder {
            order_date: Some(placed),
            status: Some("SHIPPED".to_string()),
            total_amount: Some(Decimal::new(1999, 2)),
            shipping_address: Some(NewAddress::default().with_id(AddressId::new(77))),
            ..NewOrder::default()
        }
        .with_id(OrderId::new(123));

        let service = service();
        let form = service.create_form(Some(order.clone().into()));
        assert_eq!(form.raw_value().order_date.as_deref(), Some("2024-09-09T20:15"));

        let Record::Persisted(extracted) = service.extract(&form).unwrap() else {
            panic!("expected a persisted order");
        };
        assert_eq!(extracted.id, OrderId::new(123));
        assert_eq!(
            extracted.order_date,
            Some(Utc.with_ymd_and_hms(2024, 9, 9, 20, 15, 0).unwrap())
        );
        // Not shipped yet: no date is invented on save.
        assert_eq!(extracted.shipped_date, None);
        assert_eq!(extracted.total_amount, order.total_amount);
        assert_eq!(extracted.shipping_address, order.shipping_address);
    }

    #[test]
    fn test_unshipped_order_round_trips_without_dates() {
        let order = NewOrder {
            status: Some("PENDING".to_string()),
            ..NewOrder::default()
        }
        .with_id(OrderId::new(123));

        let service = service();
        let form = service.create_form(Some(order.clone().into()));
        assert_eq!(form.raw_value().shipped_date, None);
        assert_eq!(service.extract(&form).unwrap(), Record::Persisted(order));
    }

    #[test]
    fn test_set_field_amount_and_invalid_date() {
        let service = service();
        let mut form = service.create_form(None);
        form.set_field("totalAmount", json!(42.5)).unwrap();
        assert_eq!(form.raw_value().total_amount, Some(Decimal::new(425, 1)));

        form.set_field("orderDate", json!("next tuesday")).unwrap();
        assert!(matches!(
            service.extract(&form),
            Err(FormError::InvalidTimestamp { ref field, .. }) if field == "orderDate"
        ));
    }

    #[test]
    fn test_constraints() {
        let service = service();
        let mut form = service.create_form(None);
        form.update(|raw| {
            raw.status = Some("ok".to_string());
            raw.shipping_cost = Some(Decimal::new(-5, 0));
        });

        let fields: Vec<_> = form.errors().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, ["status", "totalAmount", "shippingCost"]);
    }
}

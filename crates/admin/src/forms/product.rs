use chrono::{DateTime, Utc};
use emporium_core::{
    Category, NewProduct, Order, Product, ProductId, ProductStatus, Record, Unsaved, WishList,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::datetime;
use super::validation::{Constraint, FieldError, FieldInput, check};
use super::{EntityForm, FormError, FormService};

/// Form conversion service for products.
pub type ProductFormService = FormService<ProductFormRawValue>;

/// Edit form raw value of a [`Product`].
///
/// `dateAdded` and `dateModified` default to the time the form was seeded;
/// `categories` defaults to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFormRawValue {
    id: Option<ProductId>,
    pub title: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub rating: Option<i32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub quantity_in_stock: Option<i32>,
    pub status: Option<ProductStatus>,
    pub weight: Option<f64>,
    pub dimensions: Option<String>,
    pub date_added: Option<String>,
    pub date_modified: Option<String>,
    pub wish_list: Option<WishList>,
    pub order: Option<Order>,
    pub categories: Option<Vec<Category>>,
}

impl ProductFormRawValue {
    fn from_entity<I>(id: Option<ProductId>, product: Product<I>) -> Self {
        Self {
            id,
            title: product.title,
            keywords: product.keywords,
            description: product.description,
            rating: product.rating,
            price: product.price,
            quantity_in_stock: product.quantity_in_stock,
            status: product.status,
            weight: product.weight,
            dimensions: product.dimensions,
            date_added: datetime::format(product.date_added),
            date_modified: datetime::format(product.date_modified),
            wish_list: product.wish_list,
            order: product.order,
            categories: product.categories,
        }
    }

    /// Fill the empty fields of a new product: timestamps with `now`,
    /// categories with an empty list.
    fn with_defaults(mut self, now: DateTime<Utc>) -> Self {
        let now = datetime::format(Some(now));
        self.date_added = self.date_added.or_else(|| now.clone());
        self.date_modified = self.date_modified.or(now);
        self.categories.get_or_insert_with(Vec::new);
        self
    }
}

impl EntityForm for ProductFormRawValue {
    type Entity = Product;

    fn seed(record: Record<Product>, now: DateTime<Utc>) -> Self {
        match record {
            Record::Persisted(product) => Self::from_entity(Some(product.id), product),
            Record::New(product) => Self::from_entity(None, product).with_defaults(now),
        }
    }

    fn id(&self) -> Option<ProductId> {
        self.id
    }

    fn into_record(self) -> Result<Record<Product>, FormError> {
        let product = NewProduct {
            id: Unsaved,
            title: self.title,
            keywords: self.keywords,
            description: self.description,
            rating: self.rating,
            price: self.price,
            quantity_in_stock: self.quantity_in_stock,
            status: self.status,
            weight: self.weight,
            dimensions: self.dimensions,
            date_added: datetime::parse("dateAdded", self.date_added.as_deref())?,
            date_modified: datetime::parse("dateModified", self.date_modified.as_deref())?,
            wish_list: self.wish_list,
            order: self.order,
            categories: self.categories,
        };

        Ok(match self.id {
            Some(id) => Record::Persisted(product.with_id(id)),
            None => Record::New(product),
        })
    }

    fn validate(&self) -> Vec<FieldError> {
        use Constraint::{Max, MaxLength, Min, MinLength, Required};

        let mut errors = Vec::new();
        check(
            "title",
            self.title.as_deref().into(),
            &[Required, MinLength(3), MaxLength(100)],
            &mut errors,
        );
        check("keywords", self.keywords.as_deref().into(), &[MaxLength(200)], &mut errors);
        check("description", self.description.as_deref().into(), &[MinLength(10)], &mut errors);
        check("rating", self.rating.into(), &[Min(0.0), Max(5.0)], &mut errors);
        check("price", self.price.into(), &[Required, Min(0.0)], &mut errors);
        check("quantityInStock", self.quantity_in_stock.into(), &[Min(0.0)], &mut errors);
        check(
            "status",
            FieldInput::presence(self.status.is_some()),
            &[Required],
            &mut errors,
        );
        check("weight", self.weight.into(), &[Min(0.0)], &mut errors);
        check("dimensions", self.dimensions.as_deref().into(), &[MaxLength(50)], &mut errors);
        check("dateAdded", self.date_added.as_deref().into(), &[Required], &mut errors);
        errors
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use emporium_core::{CategoryId, NewCategory, NewWishList, WishListId};
    use serde_json::json;

    use super::*;
    use crate::forms::Violation;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 10, 12, 0, 0).unwrap()
    }

    fn service() -> ProductFormService {
        ProductFormService::with_clock(Arc::new(now))
    }

    fn sample() -> Product {
        NewProduct {
            title: Some("outside".to_string()),
            keywords: Some("garden".to_string()),
            description: Some("a long enough description".to_string()),
            rating: Some(4),
            price: Some(Decimal::new(24793, 2)),
            quantity_in_stock: Some(12),
            status: Some(ProductStatus::InStock),
            weight: Some(1.25),
            dimensions: Some("10x20x30".to_string()),
            date_added: Some(Utc.with_ymd_and_hms(2024, 9, 9, 22, 41, 0).unwrap()),
            date_modified: Some(Utc.with_ymd_and_hms(2024, 9, 10, 3, 37, 0).unwrap()),
            wish_list: Some(NewWishList::default().with_id(WishListId::new(29642))),
            order: None,
            categories: Some(vec![
                NewCategory::default().with_id(CategoryId::new(1260)),
            ]),
            ..NewProduct::default()
        }
        .with_id(ProductId::new(456))
    }

    #[test]
    fn test_round_trip_reproduces_minute_precision_entity() {
        let service = service();
        let form = service.create_form(Some(sample().into()));
        assert_eq!(service.extract(&form).unwrap(), Record::Persisted(sample()));
    }

    #[test]
    fn test_round_trip_drops_seconds() {
        let product = Product {
            date_added: Some(Utc.with_ymd_and_hms(2024, 9, 9, 22, 41, 59).unwrap()),
            ..sample()
        };

        let service = service();
        let form = service.create_form(Some(product.into()));
        let Record::Persisted(extracted) = service.extract(&form).unwrap() else {
            panic!("expected a persisted product");
        };
        assert_eq!(
            extracted.date_added,
            Some(Utc.with_ymd_and_hms(2024, 9, 9, 22, 41, 0).unwrap())
        );
        assert_eq!(extracted.title, sample().title);
    }

    #[test]
    fn test_sparse_product_keeps_absent_fields() {
        let product = NewProduct {
            title: Some("lamp".to_string()),
            date_added: Some(Utc.with_ymd_and_hms(2024, 9, 9, 22, 41, 0).unwrap()),
            ..NewProduct::default()
        }
        .with_id(ProductId::new(8));

        let service = service();
        let form = service.create_form(Some(product.clone().into()));
        assert_eq!(form.raw_value().date_modified, None);
        assert_eq!(form.raw_value().categories, None);

        assert_eq!(service.extract(&form).unwrap(), Record::Persisted(product.clone()));

        let mut form = service.create_form(None);
        service.reset_form(&mut form, product.clone().into());
        assert_eq!(service.extract(&form).unwrap(), Record::Persisted(product));
    }

    #[test]
    fn test_new_form_has_only_defaults() {
        let service = service();
        let form = service.create_form(None);
        assert_eq!(form.id(), None);

        assert_eq!(
            service.extract(&form).unwrap(),
            Record::New(NewProduct {
                date_added: Some(now()),
                date_modified: Some(now()),
                categories: Some(Vec::new()),
                ..NewProduct::default()
            })
        );
    }

    #[test]
    fn test_reset_form_replaces_values_in_place() {
        let service = service();
        let mut form = service.create_form(Some(sample().into()));
        form.update(|raw| raw.title = Some("edited".to_string()));

        service.reset_form(&mut form, Record::New(NewProduct::default()));
        assert_eq!(form.id(), None);
        assert_eq!(form.raw_value().title, None);
        assert_eq!(form.raw_value().categories, Some(Vec::new()));
        assert!(form.is_disabled("id"));
    }

    #[test]
    fn test_set_field_status_by_wire_name() {
        let service = service();
        let mut form = service.create_form(None);
        form.set_field("status", json!("OUT_OF_STOCK")).unwrap();
        form.set_field("quantityInStock", json!(3)).unwrap();
        assert_eq!(form.raw_value().status, Some(ProductStatus::OutOfStock));
        assert_eq!(form.raw_value().quantity_in_stock, Some(3));
    }

    #[test]
    fn test_constraints() {
        let service = service();
        let form = service.create_form(Some(sample().into()));
        assert!(form.is_valid());

        let mut form = service.create_form(None);
        form.update(|raw| {
            raw.title = Some("ab".to_string());
            raw.rating = Some(6);
            raw.weight = Some(-0.5);
        });
        let errors = form.errors();
        let found: Vec<_> = errors.iter().map(|e| (e.field, e.violation.clone())).collect();
        assert_eq!(
            found,
            [
                ("title", Violation::MinLength(3)),
                ("rating", Violation::Max(5.0)),
                ("price", Violation::Required),
                ("status", Violation::Required),
                ("weight", Violation::Min(0.0)),
            ]
        );
    }
}

use chrono::{DateTime, Utc};
use emporium_core::{Category, CategoryId, CategoryStatus, NewCategory, Product, Record, Unsaved};
use serde::{Deserialize, Serialize};

use super::datetime;
use super::validation::{Constraint, FieldError, FieldInput, check};
use super::{EntityForm, FormError, FormService};

/// Form conversion service for categories.
pub type CategoryFormService = FormService<CategoryFormRawValue>;

/// Edit form raw value of a [`Category`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFormRawValue {
    id: Option<CategoryId>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub date_added: Option<String>,
    pub date_modified: Option<String>,
    pub status: Option<CategoryStatus>,
    pub parent: Option<Category>,
    pub products: Option<Vec<Product>>,
}

impl CategoryFormRawValue {
    fn from_entity<I>(id: Option<CategoryId>, category: Category<I>) -> Self {
        Self {
            id,
            description: category.description,
            sort_order: category.sort_order,
            date_added: datetime::format(category.date_added),
            date_modified: datetime::format(category.date_modified),
            status: category.status,
            parent: category.parent.map(|parent| *parent),
            products: category.products,
        }
    }

    fn with_defaults(mut self, now: DateTime<Utc>) -> Self {
        let now = datetime::format(Some(now));
        self.date_added = self.date_added.or_else(|| now.clone());
        self.date_modified = self.date_modified.or(now);
        self.products.get_or_insert_with(Vec::new);
        self
    }
}

impl EntityForm for CategoryFormRawValue {
    type Entity = Category;

    fn seed(record: Record<Category>, now: DateTime<Utc>) -> Self {
        match record {
            Record::Persisted(category) => Self::from_entity(Some(category.id), category),
            Record::New(category) => Self::from_entity(None, category).with_defaults(now),
        }
    }

    fn id(&self) -> Option<CategoryId> {
        self.id
    }

    fn into_record(self) -> Result<Record<Category>, FormError> {
        let category = NewCategory {
            id: Unsaved,
            description: self.description,
            sort_order: self.sort_order,
            date_added: datetime::parse("dateAdded", self.date_added.as_deref())?,
            date_modified: datetime::parse("dateModified", self.date_modified.as_deref())?,
            status: self.status,
            parent: self.parent.map(Box::new),
            products: self.products,
        };

        Ok(match self.id {
            Some(id) => Record::Persisted(category.with_id(id)),
            None => Record::New(category),
        })
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check(
            "description",
            FieldInput::from(self.description.as_deref()),
            &[
                Constraint::Required,
                Constraint::MinLength(5),
                Constraint::MaxLength(100),
            ],
            &mut errors,
        );
        check("sortOrder", self.sort_order.into(), &[Constraint::Min(0.0)], &mut errors);
        check(
            "dateAdded",
            FieldInput::from(self.date_added.as_deref()),
            &[Constraint::Required],
            &mut errors,
        );
        check(
            "status",
            FieldInput::presence(self.status.is_some()),
            &[Constraint::Required],
            &mut errors,
        );
        errors
    }
}

//! Update controllers orchestrating the edit views.
//!
//! An [`UpdateController`] owns one edit form and the option lists for its
//! reference fields. It is activated with a [`Resolution`], loads the option
//! lists, and saves the form back through the backend:
//!
//! ```text
//! Idle -> LoadingOptions -> Idle -> Saving -> Idle
//! ```
//!
//! Every controller holds its own state; nothing is shared between views.
//! Dropping an in-flight `activate` or `save` future discards its result.

mod options;

use std::sync::Arc;

use emporium_core::{Entity, Record};
use tracing::{info, instrument, warn};

/// Identity equality for reference options, for selection widgets.
pub use emporium_core::compare;
pub use options::{
    AddressOptions, CategoryOptions, NoRelationships, OrderOptions, ProductOptions,
    RelationshipOptions, WishListOptions,
};

use crate::api::{Backend, EntityApi, RestClient};
use crate::error::ControllerError;
use crate::forms::{
    AddressFormRawValue, CategoryFormRawValue, CustomerFormRawValue, EditForm, EntityForm,
    FormService, OrderFormRawValue, ProductFormRawValue, WishListFormRawValue,
};
use crate::resolve::{NOT_FOUND_ROUTE, Navigator, Resolution};

/// Update controller of the address edit view.
pub type AddressUpdateController<B = RestClient> =
    UpdateController<AddressFormRawValue, AddressOptions, B>;
/// Update controller of the category edit view.
pub type CategoryUpdateController<B = RestClient> =
    UpdateController<CategoryFormRawValue, CategoryOptions, B>;
/// Update controller of the customer edit view.
pub type CustomerUpdateController<B = RestClient> =
    UpdateController<CustomerFormRawValue, NoRelationships, B>;
/// Update controller of the order edit view.
pub type OrderUpdateController<B = RestClient> =
    UpdateController<OrderFormRawValue, OrderOptions, B>;
/// Update controller of the product edit view.
pub type ProductUpdateController<B = RestClient> =
    UpdateController<ProductFormRawValue, ProductOptions, B>;
/// Update controller of the wish list edit view.
pub type WishListUpdateController<B = RestClient> =
    UpdateController<WishListFormRawValue, WishListOptions, B>;

/// Lifecycle state of an update controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    LoadingOptions,
    Saving,
}

/// Extension points run after a save attempt.
pub trait SaveHooks<E>: Send + Sync {
    /// Called with the stored entity. Navigates back by default.
    fn on_save_success(&self, saved: &E, navigator: &dyn Navigator) {
        let _ = saved;
        navigator.back();
    }

    /// Called when the save failed. Does nothing by default.
    fn on_save_error(&self, error: &ControllerError) {
        let _ = error;
    }
}

/// Default hooks: go back on success, ignore errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigateBack;

impl<E> SaveHooks<E> for NavigateBack {}

/// Orchestrates resolution, form conversion, option lists and saving for one
/// entity type.
pub struct UpdateController<F: EntityForm, O, B: ?Sized> {
    backend: Arc<B>,
    forms: FormService<F>,
    navigator: Arc<dyn Navigator>,
    hooks: Arc<dyn SaveHooks<F::Entity>>,
    not_found_route: String,
    edit_form: EditForm<F>,
    entity: Option<F::Entity>,
    options: O,
    state: ControllerState,
}

impl<F, O, B> UpdateController<F, O, B>
where
    F: EntityForm,
    O: RelationshipOptions<F::Entity>,
    B: Backend + EntityApi<F::Entity> + ?Sized,
{
    /// Controller with a fresh creation form and empty option lists.
    pub fn new(backend: Arc<B>, forms: FormService<F>, navigator: Arc<dyn Navigator>) -> Self {
        let edit_form = forms.create_form(None);
        Self {
            backend,
            forms,
            navigator,
            hooks: Arc::new(NavigateBack),
            not_found_route: NOT_FOUND_ROUTE.to_string(),
            edit_form,
            entity: None,
            options: O::default(),
            state: ControllerState::Idle,
        }
    }

    /// Replace the save hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<dyn SaveHooks<F::Entity>>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Route to navigate to when activated with [`Resolution::NotFound`].
    #[must_use]
    pub fn with_not_found_route(mut self, route: impl Into<String>) -> Self {
        self.not_found_route = route.into();
        self
    }

    /// Activate the view with a resolver's output.
    ///
    /// A found entity is loaded into the form; on create the form is reset
    /// to its defaults and any previously loaded entity is forgotten. Option
    /// lists are loaded in both cases. Not found navigates
    /// to the not-found route and returns `false` without loading anything.
    pub async fn activate(&mut self, resolution: Resolution<F::Entity>) -> bool {
        match resolution {
            Resolution::NotFound => {
                self.navigator.navigate(&self.not_found_route);
                return false;
            }
            Resolution::Found(entity) => self.update_form(entity),
            Resolution::Create => {
                self.forms.reset_form(&mut self.edit_form, Record::default());
                self.options = O::default();
                self.entity = None;
            }
        }

        self.load_relationships_options().await;
        true
    }

    /// Load `entity` into the form and make its references selectable.
    pub fn update_form(&mut self, entity: F::Entity) {
        self.forms
            .reset_form(&mut self.edit_form, Record::Persisted(entity.clone()));
        self.options.include_references(&entity);
        self.entity = Some(entity);
    }

    /// Query every option list and merge in the current references.
    pub async fn load_relationships_options(&mut self) {
        let _loading = StateGuard::enter(&mut self.state, ControllerState::LoadingOptions);
        self.options
            .load(&*self.backend, self.entity.as_ref())
            .await;
    }

    /// Extract the form and create or update the entity.
    ///
    /// A form without identifier is created, otherwise it is updated under
    /// its identifier. The saving state is cleared whatever the outcome,
    /// including when the future is dropped before completing.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Form` if the form cannot be extracted and
    /// `ControllerError::Api` if the request fails. Nothing is retried.
    #[instrument(skip(self), fields(resource = <F::Entity as Entity>::RESOURCE))]
    pub async fn save(&mut self) -> Result<F::Entity, ControllerError> {
        let result = {
            let _saving = StateGuard::enter(&mut self.state, ControllerState::Saving);
            submit(&self.forms, &self.edit_form, &*self.backend).await
        };

        match &result {
            Ok(saved) => {
                info!(id = %saved.id(), "Entity saved");
                self.hooks.on_save_success(saved, &*self.navigator);
            }
            Err(e) => {
                warn!(error = %e, "Failed to save entity");
                self.hooks.on_save_error(e);
            }
        }

        result
    }

    /// Return to the previous view.
    pub fn previous_state(&self) {
        self.navigator.back();
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.state == ControllerState::Saving
    }

    #[must_use]
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// The entity the view was activated with, if any.
    #[must_use]
    pub const fn entity(&self) -> Option<&F::Entity> {
        self.entity.as_ref()
    }

    #[must_use]
    pub const fn edit_form(&self) -> &EditForm<F> {
        &self.edit_form
    }

    pub const fn edit_form_mut(&mut self) -> &mut EditForm<F> {
        &mut self.edit_form
    }

    #[must_use]
    pub const fn options(&self) -> &O {
        &self.options
    }
}

/// Holds a controller in a busy state; back to `Idle` when dropped.
struct StateGuard<'a>(&'a mut ControllerState);

impl<'a> StateGuard<'a> {
    fn enter(state: &'a mut ControllerState, busy: ControllerState) -> Self {
        *state = busy;
        Self(state)
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        *self.0 = ControllerState::Idle;
    }
}

async fn submit<F, B>(
    forms: &FormService<F>,
    form: &EditForm<F>,
    backend: &B,
) -> Result<F::Entity, ControllerError>
where
    F: EntityForm,
    B: EntityApi<F::Entity> + ?Sized,
{
    let saved = match forms.extract(form)? {
        Record::Persisted(entity) => EntityApi::<F::Entity>::update(backend, &entity).await?,
        Record::New(draft) => EntityApi::<F::Entity>::create(backend, &draft).await?,
    };
    Ok(saved)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use emporium_core::{
        NewProduct, NewWishList, Product, ProductId, ProductStatus, WishList, WishListId,
    };
    use rust_decimal::Decimal;

    use super::*;
    use crate::forms::{FormError, ProductFormService};
    use crate::testing::{Call, RecordingBackend, RecordingNavigator};

    fn wish_list(id: i64) -> WishList {
        NewWishList::default().with_id(WishListId::new(id))
    }

    fn product(id: i64) -> Product {
        NewProduct {
            title: Some("outside".to_string()),
            price: Some(Decimal::new(24793, 2)),
            status: Some(ProductStatus::InStock),
            wish_list: Some(wish_list(29642)),
            ..NewProduct::default()
        }
        .with_id(ProductId::new(id))
    }

    fn controller(
        backend: &Arc<RecordingBackend>,
        navigator: &Arc<RecordingNavigator>,
    ) -> ProductUpdateController<RecordingBackend> {
        let forms = ProductFormService::with_clock(Arc::new(|| {
            Utc.with_ymd_and_hms(2024, 9, 10, 12, 0, 0).unwrap()
        }));
        UpdateController::new(Arc::clone(backend), forms, navigator.clone())
    }

    #[tokio::test]
    async fn test_activate_found_merges_current_reference() {
        let backend = Arc::new(RecordingBackend::default().with(vec![wish_list(14566)]));
        let navigator = Arc::new(RecordingNavigator::default());
        let mut controller = controller(&backend, &navigator);

        assert!(controller.activate(Resolution::Found(product(456))).await);

        let ids: Vec<i64> = controller
            .options()
            .wish_lists
            .iter()
            .map(|w| w.id.as_i64())
            .collect();
        assert_eq!(ids, [29642, 14566]);
        assert_eq!(controller.edit_form().id(), Some(ProductId::new(456)));
        assert_eq!(controller.entity(), Some(&product(456)));
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(navigator.events().is_empty());
    }

    #[tokio::test]
    async fn test_activate_not_found_redirects_once() {
        let backend = Arc::new(RecordingBackend::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let mut controller = controller(&backend, &navigator);

        assert!(!controller.activate(Resolution::NotFound).await);

        assert_eq!(navigator.events(), ["404"]);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_custom_not_found_route() {
        let backend = Arc::new(RecordingBackend::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let mut controller = controller(&backend, &navigator).with_not_found_route("missing");

        controller.activate(Resolution::NotFound).await;
        assert_eq!(navigator.events(), ["missing"]);
    }

    #[tokio::test]
    async fn test_save_new_form_creates() {
        let backend = Arc::new(RecordingBackend::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let mut controller = controller(&backend, &navigator);

        assert!(controller.activate(Resolution::Create).await);
        controller
            .edit_form_mut()
            .update(|raw| raw.title = Some("brand new".to_string()));

        let saved = controller.save().await.unwrap();

        assert_eq!(saved.title.as_deref(), Some("brand new"));
        assert!(backend.calls().contains(&Call::Create("products")));
        assert!(!backend.calls().iter().any(|c| matches!(c, Call::Update(..))));
        assert_eq!(navigator.events(), ["back"]);
        assert!(!controller.is_saving());
    }

    #[tokio::test]
    async fn test_save_persisted_form_updates_by_id() {
        let backend = Arc::new(RecordingBackend::default().with(vec![product(123)]));
        let navigator = Arc::new(RecordingNavigator::default());
        let mut controller = controller(&backend, &navigator);

        controller.activate(Resolution::Found(product(123))).await;
        controller.save().await.unwrap();

        assert_eq!(backend.calls().last(), Some(&Call::Update("products", 123)));
        assert!(!backend.calls().contains(&Call::Create("products")));
        assert_eq!(navigator.events(), ["back"]);
    }

    #[tokio::test]
    async fn test_save_error_clears_flag_and_keeps_form() {
        let backend = Arc::new(RecordingBackend::default().failing_on("products"));
        let navigator = Arc::new(RecordingNavigator::default());
        let errors = Arc::new(AtomicUsize::new(0));

        struct CountErrors(Arc<AtomicUsize>);
        impl SaveHooks<Product> for CountErrors {
            fn on_save_error(&self, _error: &ControllerError) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let mut controller = controller(&backend, &navigator)
            .with_hooks(Arc::new(CountErrors(Arc::clone(&errors))));
        controller.update_form(product(123));

        let result = controller.save().await;

        assert!(matches!(result, Err(ControllerError::Api(_))));
        assert!(!controller.is_saving());
        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert!(navigator.events().is_empty());
        assert_eq!(controller.edit_form().id(), Some(ProductId::new(123)));
        assert_eq!(
            backend.calls(),
            [Call::Update("products", 123)],
            "no retry expected"
        );
    }

    #[tokio::test]
    async fn test_invalid_timestamp_fails_before_request() {
        let backend = Arc::new(RecordingBackend::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let mut controller = controller(&backend, &navigator);
        controller
            .edit_form_mut()
            .update(|raw| raw.date_added = Some("soon".to_string()));

        let result = controller.save().await;

        assert!(matches!(
            result,
            Err(ControllerError::Form(FormError::InvalidTimestamp { .. }))
        ));
        assert!(backend.calls().is_empty());
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[tokio::test]
    async fn test_dropped_save_returns_to_idle() {
        let backend = Arc::new(RecordingBackend::default().stalling_writes());
        let navigator = Arc::new(RecordingNavigator::default());
        let mut controller = controller(&backend, &navigator);
        controller.update_form(product(123));

        let timed_out = tokio::time::timeout(Duration::from_millis(20), controller.save()).await;

        assert!(timed_out.is_err());
        assert_eq!(backend.calls(), [Call::Update("products", 123)]);
        assert!(!controller.is_saving());
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(navigator.events().is_empty());
    }

    #[tokio::test]
    async fn test_activate_create_discards_previous_entity() {
        let backend = Arc::new(RecordingBackend::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let mut controller = controller(&backend, &navigator);
        controller.activate(Resolution::Found(product(456))).await;

        assert!(controller.activate(Resolution::Create).await);

        assert!(controller.entity().is_none());
        assert_eq!(controller.edit_form().id(), None);
        assert_eq!(controller.edit_form().raw_value().title, None);
        assert!(controller.options().wish_lists.is_empty());

        controller.save().await.unwrap();
        assert_eq!(backend.calls().last(), Some(&Call::Create("products")));
    }

    #[tokio::test]
    async fn test_previous_state_navigates_back() {
        let backend = Arc::new(RecordingBackend::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let controller = controller(&backend, &navigator);

        controller.previous_state();
        assert_eq!(navigator.events(), ["back"]);
    }
}

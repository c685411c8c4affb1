//! Create and edit commands.
//!
//! Both drive an update controller exactly like an edit view would:
//! resolve the identifier, activate, apply the field edits, then save.
//! Unlike the controller itself, the command refuses to save a form that
//! breaks its field constraints.

use std::sync::Arc;

use emporium_admin::api::RestClient;
use emporium_admin::forms::{EditForm, EntityForm, FieldError, FormService};
use emporium_admin::resolve::{Resolution, Resolver};
use emporium_admin::update::{RelationshipOptions, UpdateController};
use emporium_core::Entity;

use super::{Assignment, CommandError, ConsoleNavigator, Context, print_json};

/// Load the entity `id` (or a fresh form when `id` is `None`), apply
/// `assignments` and save. Prints the stored entity.
pub async fn save<F, O>(
    context: &Context,
    id: Option<&str>,
    assignments: &[Assignment],
) -> Result<(), CommandError>
where
    F: EntityForm,
    O: RelationshipOptions<F::Entity>,
{
    let resource = <F::Entity as Entity>::RESOURCE;
    let resolution = Resolver::<F::Entity, _>::new(Arc::clone(&context.client))
        .resolve(id)
        .await?;
    if id.is_some() && matches!(resolution, Resolution::Create) {
        return Err(CommandError::MissingId);
    }

    let mut controller: UpdateController<F, O, RestClient> = UpdateController::new(
        Arc::clone(&context.client),
        FormService::new(),
        Arc::new(ConsoleNavigator),
    )
    .with_not_found_route(context.config.not_found_route.as_str());

    if !controller.activate(resolution).await {
        return Err(CommandError::NotFound {
            resource,
            id: id.unwrap_or_default().to_string(),
        });
    }

    apply(controller.edit_form_mut(), assignments)?;

    let errors = controller.edit_form().errors();
    if !errors.is_empty() {
        report(&errors);
        return Err(CommandError::Invalid(errors));
    }

    let saved = controller.save().await?;
    print_json(&saved)
}

fn apply<F: EntityForm>(
    form: &mut EditForm<F>,
    assignments: &[Assignment],
) -> Result<(), CommandError> {
    for Assignment { field, value } in assignments {
        form.set_field(field, value.clone())?;
    }
    Ok(())
}

#[allow(clippy::print_stderr)]
fn report(errors: &[FieldError]) {
    for error in errors {
        eprintln!("  {error}");
    }
}

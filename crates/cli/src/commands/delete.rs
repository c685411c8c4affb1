//! Delete command.

use std::io::{BufRead, Write};

use emporium_admin::api::EntityApi;
use emporium_core::Entity;

use super::view::find;
use super::{CommandError, Context};

/// Delete the entity `id` after confirmation.
///
/// The entity is loaded first, so a missing id fails before anything is
/// asked. Without `yes` the user must answer `y` on stdin.
pub async fn delete<E: Entity>(context: &Context, id: &str, yes: bool) -> Result<(), CommandError> {
    let entity = find::<E>(context, id).await?;

    if !yes && !confirm(&format!("Delete {} {}?", E::RESOURCE, entity.id()))? {
        return Err(CommandError::Aborted);
    }

    EntityApi::<E>::delete(&*context.client, entity.id()).await?;
    tracing::info!(resource = E::RESOURCE, id = %entity.id(), "Entity deleted");
    Ok(())
}

#[allow(clippy::print_stderr)]
fn confirm(question: &str) -> Result<bool, CommandError> {
    eprint!("{question} [y/N] ");
    std::io::stderr().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

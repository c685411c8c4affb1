//! Command implementations.
//!
//! Every command is generic over the entity (and, for edits, its form and
//! option list types); `main` picks the types from the resource argument.

pub mod delete;
pub mod edit;
pub mod view;

use std::sync::Arc;

use emporium_admin::{AdminError, ControllerError};
use emporium_admin::api::{ApiError, RestClient};
use emporium_admin::config::AdminConfig;
use emporium_admin::forms::{FieldError, FormError};
use emporium_admin::resolve::Navigator;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration, transport, form or save failure.
    #[error(transparent)]
    Admin(#[from] AdminError),

    /// The backend has no entity with that identifier.
    #[error("No {resource} with id {id}")]
    NotFound { resource: &'static str, id: String },

    /// The identifier argument was blank.
    #[error("An id is required")]
    MissingId,

    /// The edited form breaks field constraints; nothing was saved.
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<FieldError>),

    /// The user declined the confirmation prompt.
    #[error("Aborted")]
    Aborted,

    /// Failed to render output.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    /// Terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ApiError> for CommandError {
    fn from(e: ApiError) -> Self {
        Self::Admin(e.into())
    }
}

impl From<FormError> for CommandError {
    fn from(e: FormError) -> Self {
        Self::Admin(e.into())
    }
}

impl From<ControllerError> for CommandError {
    fn from(e: ControllerError) -> Self {
        Self::Admin(e.into())
    }
}

impl CommandError {
    /// Process exit code: 2 when the backend failed, 1 otherwise.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Admin(e) if e.is_remote() => 2,
            _ => 1,
        }
    }
}

/// Shared state of a command run.
pub struct Context {
    pub client: Arc<RestClient>,
    pub config: AdminConfig,
}

impl Context {
    pub fn new(config: AdminConfig) -> Result<Self, CommandError> {
        let client = Arc::new(RestClient::new(&config.api)?);
        Ok(Self { client, config })
    }
}

/// A `--set field=value` edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub field: String,
    pub value: Value,
}

/// Parse `field=value`. The value is read as JSON and falls back to a
/// plain string, so `title=Lamp` and `title="Lamp"` are equivalent.
pub fn parse_assignment(raw: &str) -> Result<Assignment, String> {
    let (field, value) = split_pair(raw)?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
    Ok(Assignment {
        field: field.to_string(),
        value,
    })
}

/// Parse a `key=value` query parameter.
pub fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (key, value) = split_pair(raw)?;
    Ok((key.to_string(), value.to_string()))
}

fn split_pair(raw: &str) -> Result<(&str, &str), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(format!("expected key=value, got {raw:?}")),
    }
}

/// Write `value` to stdout as pretty JSON.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Navigator for a terminal session: there is no view stack, so
/// navigation is only logged.
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn back(&self) {
        tracing::debug!("Returning to previous view");
    }

    fn navigate(&self, route: &str) {
        tracing::info!(route, "Navigating");
    }
}

//! Emporium CLI - browse and edit catalogue entities from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show one product
//! emporium show products 456
//!
//! # List the second page of customers, newest first
//! emporium list customers --page 1 --size 20 --sort id,desc
//!
//! # Rename a wish list
//! emporium edit wish-lists 123 --set title='"Birthday"'
//!
//! # Create a product; values are JSON, anything else is taken as text
//! emporium create products --set title=Lamp --set price=12.5 --set status=IN_STOCK
//!
//! # Delete an address without the confirmation prompt
//! emporium delete addresses 7 --yes
//! ```
//!
//! # Commands
//!
//! - `show` - Print one entity
//! - `list` - Print a page of entities
//! - `edit` - Load an entity into its form, apply `--set` edits and save
//! - `create` - Apply `--set` edits to a fresh form and save
//! - `delete` - Delete an entity after confirmation
//!
//! Configuration comes from the environment, see `emporium_admin::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand, ValueEnum};
use emporium_admin::AdminError;
use emporium_admin::config::AdminConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Assignment, CommandError, Context, parse_assignment, parse_filter};

#[derive(Parser)]
#[command(name = "emporium")]
#[command(author, version, about = "Emporium catalogue admin")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Entity collections served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Resource {
    Addresses,
    Categories,
    Customers,
    Orders,
    Products,
    WishLists,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one entity as JSON
    Show {
        resource: Resource,
        id: String,
    },
    /// Print a page of entities as JSON
    List {
        resource: Resource,

        /// Zero-based page index
        #[arg(long, requires = "size")]
        page: Option<u32>,

        /// Page size
        #[arg(long)]
        size: Option<u32>,

        /// Sort criterion such as `id,asc`; may be repeated
        #[arg(long)]
        sort: Vec<String>,

        /// Extra query parameter as `key=value`; may be repeated
        #[arg(long, value_parser = parse_filter)]
        filter: Vec<(String, String)>,
    },
    /// Edit an existing entity
    Edit {
        resource: Resource,
        id: String,

        /// Field edit as `field=value`, using the JSON field name
        #[arg(long = "set", value_parser = parse_assignment)]
        assignments: Vec<Assignment>,
    },
    /// Create a new entity
    Create {
        resource: Resource,

        /// Field edit as `field=value`, using the JSON field name
        #[arg(long = "set", value_parser = parse_assignment)]
        assignments: Vec<Assignment>,
    },
    /// Delete an entity
    Delete {
        resource: Resource,
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Run `$body` with `$entity`, `$form` and `$options` bound to the entity,
/// form raw value and option list types of `$resource`.
macro_rules! with_resource {
    ($resource:expr, |$entity:ident, $form:ident, $options:ident| $body:expr) => {
        match $resource {
            Resource::Addresses => {
                #[allow(dead_code)]
                type $entity = emporium_core::Address;
                #[allow(dead_code)]
                type $form = emporium_admin::forms::AddressFormRawValue;
                #[allow(dead_code)]
                type $options = emporium_admin::update::AddressOptions;
                $body
            }
            Resource::Categories => {
                #[allow(dead_code)]
                type $entity = emporium_core::Category;
                #[allow(dead_code)]
                type $form = emporium_admin::forms::CategoryFormRawValue;
                #[allow(dead_code)]
                type $options = emporium_admin::update::CategoryOptions;
                $body
            }
            Resource::Customers => {
                #[allow(dead_code)]
                type $entity = emporium_core::Customer;
                #[allow(dead_code)]
                type $form = emporium_admin::forms::CustomerFormRawValue;
                #[allow(dead_code)]
                type $options = emporium_admin::update::NoRelationships;
                $body
            }
            Resource::Orders => {
                #[allow(dead_code)]
                type $entity = emporium_core::Order;
                #[allow(dead_code)]
                type $form = emporium_admin::forms::OrderFormRawValue;
                #[allow(dead_code)]
                type $options = emporium_admin::update::OrderOptions;
                $body
            }
            Resource::Products => {
                #[allow(dead_code)]
                type $entity = emporium_core::Product;
                #[allow(dead_code)]
                type $form = emporium_admin::forms::ProductFormRawValue;
                #[allow(dead_code)]
                type $options = emporium_admin::update::ProductOptions;
                $body
            }
            Resource::WishLists => {
                #[allow(dead_code)]
                type $entity = emporium_core::WishList;
                #[allow(dead_code)]
                type $form = emporium_admin::forms::WishListFormRawValue;
                #[allow(dead_code)]
                type $options = emporium_admin::update::WishListOptions;
                $body
            }
        }
    };
}

/// Start Sentry when a DSN is configured. Reports are flushed when the
/// returned guard drops.
fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Warnings and errors become Sentry events; info and debug only leave
/// breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Install the tracing subscriber. Logs go to stderr so stdout stays JSON.
fn init_tracing(with_sentry: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "emporium=info,emporium_admin=info".into());

    let json = std::env::var("EMPORIUM_LOG_JSON").is_ok();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let sentry_layer =
        with_sentry.then(|| sentry_tracing::layer().event_filter(sentry_event_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_layer)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Sentry must be initialized before the tracing subscriber
    let config = AdminConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing(sentry_guard.is_some());

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(CommandError::from(AdminError::from(e))),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        // process::exit skips destructors; flush Sentry first
        drop(sentry_guard);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, config: AdminConfig) -> Result<(), CommandError> {
    let context = Context::new(config)?;

    match cli.command {
        Commands::Show { resource, id } => {
            with_resource!(resource, |E, F, O| commands::view::show::<E>(&context, &id).await)
        }
        Commands::List {
            resource,
            page,
            size,
            sort,
            filter,
        } => {
            let params = commands::view::query_params(page, size, sort, filter);
            with_resource!(resource, |E, F, O| commands::view::list::<E>(&context, &params).await)
        }
        Commands::Edit {
            resource,
            id,
            assignments,
        } => with_resource!(resource, |E, F, O| {
            commands::edit::save::<F, O>(&context, Some(&id), &assignments).await
        }),
        Commands::Create {
            resource,
            assignments,
        } => with_resource!(resource, |E, F, O| {
            commands::edit::save::<F, O>(&context, None, &assignments).await
        }),
        Commands::Delete { resource, id, yes } => {
            with_resource!(resource, |E, F, O| commands::delete::delete::<E>(&context, &id, yes).await)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resource_names_are_kebab_case() {
        let cli = Cli::try_parse_from(["emporium", "show", "wish-lists", "123"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Show { resource: Resource::WishLists, ref id } if id == "123"
        ));
    }

    #[test]
    fn test_edit_collects_assignments() {
        let cli = Cli::try_parse_from([
            "emporium",
            "edit",
            "products",
            "456",
            "--set",
            "title=Lamp",
            "--set",
            "price=12.5",
        ])
        .unwrap();

        let Commands::Edit { assignments, .. } = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(
            assignments,
            [
                Assignment {
                    field: "title".to_string(),
                    value: json!("Lamp"),
                },
                Assignment {
                    field: "price".to_string(),
                    value: json!(12.5),
                },
            ]
        );
    }

    #[test]
    fn test_page_requires_size() {
        assert!(Cli::try_parse_from(["emporium", "list", "orders", "--page", "1"]).is_err());
        assert!(
            Cli::try_parse_from(["emporium", "list", "orders", "--page", "1", "--size", "5"])
                .is_ok()
        );
    }

    #[test]
    fn test_delete_confirmation_flag() {
        let cli = Cli::try_parse_from(["emporium", "delete", "addresses", "7", "-y"]).unwrap();
        assert!(matches!(cli.command, Commands::Delete { yes: true, .. }));
    }
}

//! Emporium admin library.
//!
//! The edit surface of the catalogue admin, independent of any renderer:
//!
//! - [`api`] - REST transport for every entity resource
//! - [`resolve`] - turns navigation identifiers into loaded entities
//! - [`forms`] - converts entities to editable raw values and back
//! - [`update`] - orchestrates an edit view from activation to save
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use emporium_admin::api::RestClient;
//! use emporium_admin::config::AdminConfig;
//! use emporium_admin::forms::ProductFormService;
//! use emporium_admin::resolve::{Navigator, Resolver};
//! use emporium_admin::update::{ProductUpdateController, UpdateController};
//! use emporium_core::Product;
//!
//! struct Console;
//!
//! impl Navigator for Console {
//!     fn back(&self) {}
//!     fn navigate(&self, _route: &str) {}
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AdminConfig::from_env()?;
//! let client = Arc::new(RestClient::new(&config.api)?);
//!
//! let resolution = Resolver::<Product, _>::new(Arc::clone(&client))
//!     .resolve(Some("123"))
//!     .await?;
//!
//! let mut controller: ProductUpdateController =
//!     UpdateController::new(client, ProductFormService::new(), Arc::new(Console));
//! if controller.activate(resolution).await {
//!     controller.save().await?;
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod resolve;
pub mod update;

#[cfg(test)]
mod testing;

pub use error::{AdminError, ControllerError};

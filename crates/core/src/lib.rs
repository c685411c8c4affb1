//! Emporium Core - entity model shared by the admin front-end.
//!
//! This crate provides the catalogue domain as plain data. It is used by
//! `emporium-admin` (entity resolution, form conversion and update
//! orchestration) and, through it, by the `emporium` command-line driver.
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure functions - no I/O,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and statuses
//! - [`entity`] - The [`Entity`] contract and the persisted/new [`Record`]
//! - [`entities`] - Address, Category, Customer, Order, Product, `WishList`
//! - [`collection`] - Identity-based merging of option lists

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod collection;
pub mod entities;
pub mod entity;
pub mod types;

pub use collection::{compare, merge};
pub use entities::*;
pub use entity::{Entity, Record};
pub use types::*;

//! Core types for Emporium.
//!
//! This module provides type-safe wrappers for identifiers and statuses.

pub mod id;
pub mod status;

pub use id::*;
pub use status::*;

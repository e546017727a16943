//! BazarLink Core - Shared types library.
//!
//! This crate provides the types used across all BazarLink components:
//! - `data` - The data-access layer (fallback and remote engines, facade)
//! - `cli` - Command-line tools for seeding and inspecting data
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. Both storage engines serialize exactly these records,
//! so a record written by one engine has the same shape as one read by the
//! other.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, credentials, and statuses
//! - [`models`] - Entity records, joined read shapes, and validated inputs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;

//! BazarLink data-access layer.
//!
//! One [`DataEngine`] contract with two implementations, selected once at
//! startup by [`Database::create`]:
//!
//! - [`FallbackEngine`] - keeps every collection in a local
//!   [`RecordStore`] (JSON files in a directory, or memory)
//! - [`RemoteEngine`] - delegates to a hosted auth and database service
//!
//! Every operation returns [`Result`], whatever the engine; both report
//! failures with the same [`DataError`] variants.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod engine;
pub mod error;
pub mod facade;
pub mod fallback;
pub mod remote;
pub mod store;

pub use config::{ConfigError, DataConfig, RemoteConfig};
pub use engine::{DataEngine, EngineKind, SeedSummary};
pub use error::{DataError, Result};
pub use facade::Database;
pub use fallback::FallbackEngine;
pub use remote::{RemoteEngine, RemoteError};
pub use store::{Batch, FileMedium, KeyValueMedium, MemoryMedium, RecordStore, StoreError};

/// Schema, row-level security policies and server-side functions the
/// remote engine expects.
pub const REMOTE_SCHEMA_SQL: &str = include_str!("../sql/setup.sql");

//! Integration tests for the BazarLink data layer.
//!
//! # Running Tests
//!
//! ```bash
//! # Fallback and mocked-remote suites
//! cargo test -p bazarlink-integration-tests
//!
//! # Also run the live suite against a real project
//! BAZARLINK_SUPABASE_URL=... BAZARLINK_SUPABASE_ANON_KEY=... \
//!     cargo test -p bazarlink-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `fallback_flow` - End-to-end storefront flow on file-backed storage
//! - `facade_selection` - Engine selection from configuration
//! - `remote_flow` - The same flow against a mocked remote service

use bazarlink_core::{NewProduct, Price, SellerId};
use bazarlink_data::{DataConfig, Database, DataEngine};
use tempfile::TempDir;

/// A fallback-backed database in a throwaway directory.
///
/// The directory is removed when the context is dropped.
pub struct TestContext {
    pub db: Database,
    pub dir: TempDir,
}

impl TestContext {
    /// Create and initialize a fresh context.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created or the engine
    /// fails to initialize.
    #[allow(clippy::expect_used)]
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db = Database::create(&Self::config_for(&dir));
        db.init().await.expect("Failed to initialize engine");
        Self { db, dir }
    }

    /// Configuration pointing the fallback engine at `dir`.
    #[must_use]
    pub fn config_for(dir: &TempDir) -> DataConfig {
        DataConfig {
            data_dir: dir.path().to_path_buf(),
            ..DataConfig::default()
        }
    }

    /// A second database over the same directory, as a restarted process
    /// would see it.
    pub async fn reopen(&self) -> Database {
        let db = Database::create(&Self::config_for(&self.dir));
        let _ = db.init().await;
        db
    }
}

/// A valid listing priced at `units` whole currency units.
///
/// # Panics
///
/// Panics if `title` or `category` is blank.
#[allow(clippy::expect_used)]
#[must_use]
pub fn listing(seller_id: SellerId, title: &str, units: u32, inventory: u32) -> NewProduct {
    NewProduct::new(
        seller_id,
        title,
        format!("{title} description"),
        Price::from_units(units),
        "General",
        inventory,
    )
    .expect("Invalid test listing")
}

/// Assert that `engine` holds no products.
///
/// # Panics
///
/// Panics if the catalog cannot be read or is not empty.
#[allow(clippy::expect_used)]
pub async fn assert_empty_catalog(engine: &dyn DataEngine) {
    let products = engine.get_products().await.expect("Failed to list products");
    assert!(products.is_empty(), "expected no products, got {products:?}");
}

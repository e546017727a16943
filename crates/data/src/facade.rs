//! Engine selection.

use std::ops::Deref;
use std::sync::Arc;

use crate::config::DataConfig;
use crate::engine::{DataEngine, EngineKind};
use crate::fallback::FallbackEngine;
use crate::remote::RemoteEngine;

/// Stable entry point to whichever engine the configuration selects.
///
/// Cheap to clone; clones share the engine. Every [`DataEngine`] operation
/// is reachable through `Deref`:
///
/// ```no_run
/// # async fn demo() -> bazarlink_data::Result<()> {
/// let db = bazarlink_data::Database::from_env();
/// db.init().await?;
/// let products = db.get_products().await?;
/// # let _ = products;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Database {
    engine: Arc<dyn DataEngine>,
    kind: EngineKind,
}

impl Database {
    /// Select and build an engine for `config`.
    ///
    /// Uses the remote engine when remote credentials are configured and
    /// are not placeholders. Any construction failure is logged and
    /// degrades to the next option: remote, then fallback on disk, then
    /// fallback in memory. Never fails.
    #[must_use]
    pub fn create(config: &DataConfig) -> Self {
        if let Some(remote) = config.remote() {
            match RemoteEngine::new(&remote) {
                Ok(engine) => {
                    tracing::info!(url = %engine.base_url(), "Using remote data engine");
                    return Self::with_engine(engine);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Remote engine unavailable, using fallback");
                }
            }
        } else {
            tracing::info!("Remote service not configured, using fallback");
        }

        let engine = match FallbackEngine::open(&config.data_dir) {
            Ok(engine) => {
                tracing::info!(dir = %config.data_dir.display(), "Using fallback data engine");
                engine
            }
            Err(e) => {
                tracing::warn!(
                    dir = %config.data_dir.display(),
                    error = %e,
                    "Cannot open data directory, keeping data in memory"
                );
                FallbackEngine::in_memory()
            }
        };
        Self::with_engine(engine.with_seed_on_init(config.seed_demo_data))
    }

    /// [`Database::create`] with configuration from the environment.
    ///
    /// Malformed variables are logged and the defaults used instead.
    #[must_use]
    pub fn from_env() -> Self {
        let config = DataConfig::from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Invalid data configuration, using defaults");
            DataConfig::default()
        });
        Self::create(&config)
    }

    /// Wrap an already built engine.
    pub fn with_engine(engine: impl DataEngine + 'static) -> Self {
        let kind = engine.kind();
        Self {
            engine: Arc::new(engine),
            kind,
        }
    }

    /// Which engine was selected.
    #[must_use]
    pub const fn engine_kind(&self) -> EngineKind {
        self.kind
    }

    /// Whether the remote engine was selected.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.kind == EngineKind::Remote
    }
}

impl Deref for Database {
    type Target = dyn DataEngine;

    fn deref(&self) -> &Self::Target {
        self.engine.as_ref()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

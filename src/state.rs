//! Application state: the loaded catalog, the session registry, and settings.
//!
//! The catalog is built once here and never mutated afterwards; all
//! session mutation goes through the registry's per-session locks.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, instrument};

use crate::catalog::Catalog;
use crate::config::{load_quiz_config_from_env, Settings};
use crate::error::EngineError;
use crate::manager::SessionManager;
use crate::seeds::seed_puzzles;

pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub sessions: SessionManager,
    pub settings: Settings,
}

impl AppState {
    /// Build state from env: load config, build the catalog (operator
    /// bank, or built-in seeds when the bank is absent or invalid), and
    /// wire up the session registry with an entropy-seeded shuffle rng.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, EngineError> {
        let cfg = load_quiz_config_from_env().unwrap_or_default();
        let settings = cfg.settings.clone();

        let catalog = if cfg.puzzles.is_empty() {
            Catalog::load(seed_puzzles())?
        } else {
            // A bad bank fails that load entirely (no partial catalog);
            // startup then falls back to the seeds.
            match Catalog::load(cfg.puzzles) {
                Ok(catalog) => catalog,
                Err(e) => {
                    error!(target: "quiz", error = %e, "Puzzle bank rejected; using built-in seeds");
                    Catalog::load(seed_puzzles())?
                }
            }
        };

        // Inventory summary by category.
        let mut count_by_category: HashMap<&str, usize> = HashMap::new();
        for puzzle in catalog.iter() {
            *count_by_category.entry(puzzle.category.as_str()).or_default() += 1;
        }
        for (category, count) in count_by_category {
            info!(target: "quiz", %category, puzzles = count, "Startup puzzle inventory");
        }

        Ok(Self::with_parts(catalog, settings, StdRng::from_entropy()))
    }

    /// Assemble state from explicit parts. Tests use this with a seeded
    /// rng and a hand-built catalog.
    pub fn with_parts(catalog: Catalog, settings: Settings, rng: StdRng) -> Self {
        let timeout = Duration::seconds(settings.inactivity_timeout_secs as i64);
        Self {
            catalog: Arc::new(catalog),
            sessions: SessionManager::new(timeout, rng),
            settings,
        }
    }
}

//! Builder for creating and configuring Planner instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::info;
use tokio::task;

use super::Planner;
use crate::{
    curriculum::Catalog,
    error::{PilotError, Result},
    generation::{ContentGenerator, GeneratorConfig, HttpGenerator, OfflineGenerator},
    quality::QualityThresholds,
    store::DraftStore,
};

/// Builder for creating and configuring Planner instances.
#[derive(Clone, Default)]
pub struct PlannerBuilder {
    database_path: Option<PathBuf>,
    generator: Option<Arc<dyn ContentGenerator>>,
    generator_config: Option<GeneratorConfig>,
    offline: bool,
    catalog: Option<Catalog>,
    thresholds: QualityThresholds,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/planpilot/planpilot.db` or
    /// `~/.local/share/planpilot/planpilot.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses the given generator instead of one derived from the environment.
    pub fn with_generator(mut self, generator: Arc<dyn ContentGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Configures the HTTP generator explicitly instead of reading the
    /// environment.
    pub fn with_generator_config(mut self, config: GeneratorConfig) -> Self {
        self.generator_config = Some(config);
        self
    }

    /// Never contact the generation service; every generation falls back.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_quality_thresholds(mut self, thresholds: QualityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Builds the configured planner instance.
    ///
    /// # Errors
    ///
    /// Returns `PilotError::FileSystem` if the database directory cannot be
    /// created, `PilotError::Database` if database initialization fails and
    /// `PilotError::Generation` if the HTTP client cannot be set up.
    pub async fn build(self) -> Result<Planner> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PilotError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _store = DraftStore::new(&db_path_clone)?;
            Ok::<(), PilotError>(())
        })
        .await
        .map_err(PilotError::join)??;

        let generator: Arc<dyn ContentGenerator> = match (self.generator, self.offline) {
            (Some(generator), _) => generator,
            (None, true) => Arc::new(OfflineGenerator),
            (None, false) => match self.generator_config.or_else(GeneratorConfig::from_env) {
                Some(config) => Arc::new(HttpGenerator::new(config)?),
                None => Arc::new(OfflineGenerator),
            },
        };
        info!(
            "Planner ready (database: {}, generator: {})",
            db_path.display(),
            generator.name()
        );

        Ok(Planner::new(
            db_path,
            generator,
            self.catalog.unwrap_or_default(),
            self.thresholds,
        ))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("planpilot")
            .place_data_file("planpilot.db")
            .map_err(|e| PilotError::XdgDirectory(e.to_string()))
    }
}

//! High-level async API of the planning wizard.
//!
//! The [`Planner`] coordinates the draft store, the content generator and
//! the rule engines. It never keeps plan state itself: callers load a
//! [`Session`](crate::session::Session), run operations against it and save
//! it again. SQLite work runs on the blocking thread pool, one connection per
//! operation.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │     CLI      │───▶│   Planner    │───▶│ DraftStore (db)  │
//! │              │    │              │───▶│ ContentGenerator │
//! └──────────────┘    └──────────────┘    └──────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: configures database path, generator, catalog and thresholds
//! - [`session_ops`]: load, save and reset the stored session
//! - [`generation_ops`]: short version, sequence, revision and detail planning
//! - [`curriculum_ops`]: competency search, suggestions and uploads
//! - [`export_ops`]: quality report and document export
//!
//! # Usage
//!
//! ```rust,no_run
//! use planpilot_core::{generation::AbortSignal, PlannerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new().offline(true).build().await?;
//! let mut session = planner.load_session().await?;
//! session.set_subject("Mathematik");
//! let report = planner.generate(&mut session, &AbortSignal::never()).await;
//! planner.save_session(&session).await?;
//! # let _ = report;
//! # Ok(())
//! # }
//! ```

use std::{path::PathBuf, sync::Arc};

pub mod builder;
pub mod curriculum_ops;
pub mod export_ops;
pub mod generation_ops;
pub mod session_ops;

#[cfg(test)]
mod tests;

pub use builder::PlannerBuilder;
pub use curriculum_ops::UploadSummary;
pub use export_ops::ExportResult;

use crate::{curriculum::Catalog, generation::ContentGenerator, quality::QualityThresholds};

/// What a generation command did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationReport {
    /// Content from the generation service was assigned.
    Generated,
    /// The service failed; deterministic content was assigned instead.
    FellBack { notice: String },
    /// The service failed and there is nothing to fall back to; the session
    /// is unchanged.
    Unchanged { notice: String },
    /// The request was aborted; the session is unchanged.
    Cancelled,
}

impl GenerationReport {
    /// Notice to show to the teacher, if any.
    pub fn notice(&self) -> Option<&str> {
        match self {
            GenerationReport::FellBack { notice } | GenerationReport::Unchanged { notice } => {
                Some(notice)
            }
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, GenerationReport::Cancelled)
    }
}

/// Main planner interface.
pub struct Planner {
    pub(crate) db_path: PathBuf,
    pub(crate) generator: Arc<dyn ContentGenerator>,
    pub(crate) catalog: Catalog,
    pub(crate) thresholds: QualityThresholds,
}

impl Planner {
    pub(crate) fn new(
        db_path: PathBuf,
        generator: Arc<dyn ContentGenerator>,
        catalog: Catalog,
        thresholds: QualityThresholds,
    ) -> Self {
        Self {
            db_path,
            generator,
            catalog,
            thresholds,
        }
    }

    /// Path of the draft database.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Name of the configured content generator.
    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }
}

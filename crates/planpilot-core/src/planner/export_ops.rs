//! Quality report and document export.

use std::path::{Path, PathBuf};

use jiff::Timestamp;
use log::info;
use tokio::task;

use super::Planner;
use crate::{
    error::{PilotError, Result},
    export::{default_file_name, render_export, ExportFormat},
    quality::QualityReport,
    session::Session,
    workflow,
};

/// A rendered export and where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub format: ExportFormat,
    pub file_name: String,
    /// `None` when the document was only rendered, not written.
    pub path: Option<PathBuf>,
    pub content: String,
}

impl Planner {
    /// Runs the quality checks and the compatibility check on the plan.
    pub fn quality_report(&self, session: &Session) -> QualityReport {
        QualityReport::for_plan(session.plan(), &self.thresholds)
    }

    /// Renders the plan and, if `destination` is given, writes it there.
    ///
    /// A destination that is an existing directory receives the default
    /// file name. The export step must be reachable and complete. A
    /// successful export marks the plan exported.
    pub async fn export(
        &self,
        session: &mut Session,
        format: ExportFormat,
        destination: Option<&Path>,
    ) -> Result<ExportResult> {
        let plan = session.plan();
        if !workflow::is_step_accessible(workflow::STEP_COUNT, plan) {
            return Err(PilotError::StepLocked {
                step: workflow::STEP_COUNT,
            });
        }
        let validation = workflow::validate_step(workflow::STEP_COUNT, plan);
        if !validation.is_valid() {
            return Err(PilotError::StepIncomplete {
                step: workflow::STEP_COUNT,
                reasons: validation.errors,
            });
        }

        let now = Timestamp::now();
        let content = render_export(plan, format, &now)?;
        let file_name = default_file_name(plan, format, &now);

        let path = match destination {
            Some(destination) => {
                let target = if destination.is_dir() {
                    destination.join(&file_name)
                } else {
                    destination.to_path_buf()
                };
                let write_path = target.clone();
                let bytes = content.clone();
                task::spawn_blocking(move || {
                    std::fs::write(&write_path, bytes).map_err(|e| PilotError::FileSystem {
                        path: write_path.clone(),
                        source: e,
                    })
                })
                .await
                .map_err(PilotError::join)??;
                info!("Exported {format} to {}", target.display());
                Some(target)
            }
            None => None,
        };

        session.mark_exported();
        Ok(ExportResult {
            format,
            file_name,
            path,
            content,
        })
    }
}

//! Curriculum commands: search, suggestions, mappings and uploads.

use std::path::Path;

use log::info;
use tokio::task;

use super::Planner;
use crate::{
    curriculum::{self, parse_curriculum_upload, CompetencySuggestion, UploadFormat},
    error::{PilotError, Result},
    models::{Competency, CurriculumMapping},
    session::Session,
};

/// Confidence given to a competency added by hand.
pub const MANUAL_CONFIDENCE: f64 = 0.5;
/// Confidence given to competencies from an uploaded curriculum.
pub const UPLOAD_CONFIDENCE: f64 = 0.7;

/// Outcome of a curriculum upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSummary {
    pub competencies: Vec<Competency>,
    /// Mappings that were new to the plan.
    pub added: usize,
}

impl Planner {
    pub fn search_competencies(
        &self,
        query: &str,
        area: Option<&str>,
        cycle: Option<&str>,
    ) -> Vec<Competency> {
        curriculum::search(&self.catalog, query, area, cycle)
    }

    pub fn suggest_competencies(&self, session: &Session) -> Vec<CompetencySuggestion> {
        curriculum::auto_suggest(&self.catalog, session.plan())
    }

    /// Maps a catalog competency, found by id or code, onto the plan.
    ///
    /// A competency that is currently suggested keeps its suggested
    /// confidence. Returns `false` when the plan already maps it.
    pub fn add_competency(&self, session: &mut Session, id_or_code: &str) -> Result<bool> {
        let competency = self.catalog.find(id_or_code).ok_or_else(|| {
            PilotError::invalid_input("competency")
                .with_reason(format!("Kompetenz \"{id_or_code}\" nicht gefunden."))
        })?;
        let confidence = self
            .suggest_competencies(session)
            .iter()
            .find(|s| s.competency.id == competency.id)
            .map_or(MANUAL_CONFIDENCE, |s| s.confidence);

        Ok(session.add_curriculum_mapping(CurriculumMapping::new(competency, confidence)))
    }

    /// Reads a `.csv` or `.txt` curriculum file and maps every competency in
    /// it onto the plan. Nothing changes when the file is rejected.
    pub async fn import_curriculum(
        &self,
        session: &mut Session,
        path: &Path,
    ) -> Result<UploadSummary> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        UploadFormat::from_file_name(&file_name)?;

        let read_path = path.to_path_buf();
        let contents = task::spawn_blocking(move || {
            std::fs::read_to_string(&read_path).map_err(|e| PilotError::FileSystem {
                path: read_path.clone(),
                source: e,
            })
        })
        .await
        .map_err(PilotError::join)??;

        let competencies = parse_curriculum_upload(&file_name, &contents)?;
        let added = session.add_curriculum_mappings(
            competencies
                .iter()
                .map(|c| CurriculumMapping::new(c, UPLOAD_CONFIDENCE))
                .collect(),
        );
        info!(
            "Imported {} competencies from {file_name} ({added} new)",
            competencies.len()
        );

        Ok(UploadSummary {
            competencies,
            added,
        })
    }
}

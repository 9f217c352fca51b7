//! Curriculum competencies and their mapping onto a plan.

use serde::{Deserialize, Serialize};

use super::choice::CurriculumSource;

/// Confidence assigned to mappings created without a score.
pub const DEFAULT_MAPPING_CONFIDENCE: f64 = 0.5;
/// Confidence assigned to competencies taken from an uploaded file.
pub const UPLOAD_MAPPING_CONFIDENCE: f64 = 0.7;

/// A curriculum-standard statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competency {
    pub id: String,
    pub code: String,
    pub area: String,
    pub competency_area: String,
    pub competency: String,
    pub cycle: Option<String>,
    #[serde(default)]
    pub level_indicators: Vec<String>,
    #[serde(default)]
    pub source: CurriculumSource,
}

impl Competency {
    /// Lower-cased text that free-text search runs against.
    pub(crate) fn search_text(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.code,
            self.area,
            self.competency_area,
            self.competency,
            self.level_indicators.join(" ")
        )
        .to_lowercase()
    }
}

/// A competency linked to the current plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumMapping {
    pub competency_id: String,
    pub competency_code: String,
    pub competency_text: String,
    pub area: String,
    pub confidence_score: f64,
    pub confirmed: bool,
}

impl CurriculumMapping {
    /// Creates an unconfirmed mapping, clamping the confidence into `[0, 1]`.
    pub fn new(competency: &Competency, confidence_score: f64) -> Self {
        Self {
            competency_id: competency.id.clone(),
            competency_code: competency.code.clone(),
            competency_text: competency.competency.clone(),
            area: competency.area.clone(),
            confidence_score: confidence_score.clamp(0.0, 1.0),
            confirmed: false,
        }
    }
}

impl From<&Competency> for CurriculumMapping {
    fn from(competency: &Competency) -> Self {
        Self::new(competency, DEFAULT_MAPPING_CONFIDENCE)
    }
}

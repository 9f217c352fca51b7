//! Generated lesson content.
//!
//! These records are produced either by the generation service or by the
//! offline generators. They derive [`JsonSchema`] because the schema is sent
//! along with each generation request as the expected response shape.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::choice::AccessMode;

/// Three-tier adaptation of a phase plus optional language supports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Differentiation {
    /// Basis level.
    pub niveau_a: String,
    /// Standard level.
    pub niveau_b: String,
    /// Challenge level.
    pub niveau_c: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_starters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_list: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_modes: Option<Vec<AccessMode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_hints: Option<String>,
}

impl Differentiation {
    /// Whether any language support is present.
    pub fn has_language_support(&self) -> bool {
        self.sentence_starters.as_ref().is_some_and(|s| !s.is_empty())
            || self.word_list.as_ref().is_some_and(|w| !w.is_empty())
            || self.support_hints.as_ref().is_some_and(|h| !h.is_empty())
    }
}

/// One phase of a detailed lesson script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: String,
    pub name: String,
    pub duration_minutes: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub didactic_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_actions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_actions: Option<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_form: Option<String>,
    #[serde(default)]
    pub differentiation: Differentiation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_b_alternative: Option<String>,
}

/// Condensed phase entry of a short version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSummary {
    pub name: String,
    pub duration_minutes: u32,
    pub description: String,
}

/// Abbreviated first draft of a lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShortVersion {
    pub title: String,
    pub overview: String,
    pub goals: Vec<String>,
    pub phases_summary: Vec<PhaseSummary>,
    pub differentiation_summary: Differentiation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_supports: Option<Vec<String>>,
}

impl ShortVersion {
    /// Sum of the summarized phase durations.
    pub fn total_minutes(&self) -> u32 {
        self.phases_summary
            .iter()
            .fold(0u32, |total, p| total.saturating_add(p.duration_minutes))
    }
}

/// Subject-matter analysis attached to a detail plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DidacticDiagnosis {
    pub core_concept: String,
    pub misconceptions: Vec<String>,
    pub threshold_concept: String,
    pub relevance: String,
}

/// One criterion of the assessment rubric, described per level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RubricRow {
    pub criteria: String,
    pub level_a: String,
    pub level_b: String,
    pub level_c: String,
}

/// Fully elaborated lesson script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailPlan {
    pub phases: Vec<Phase>,
    pub plan_b_included: bool,
    pub reflection_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub didactic_diagnosis: Option<DidacticDiagnosis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_rubric: Option<Vec<RubricRow>>,
}

impl DetailPlan {
    /// Sum of the phase durations.
    pub fn total_minutes(&self) -> u32 {
        self.phases
            .iter()
            .fold(0u32, |total, p| total.saturating_add(p.duration_minutes))
    }
}

/// One lesson of a sequence skeleton.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SequenceLesson {
    #[serde(default)]
    pub id: String,
    pub lesson_number: u32,
    pub title: String,
    pub focus: String,
    pub goals: Vec<String>,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate_check: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_version: Option<ShortVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_plan: Option<DetailPlan>,
}

/// Multi-lesson outline for sequence mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SequenceSkeleton {
    pub lessons: Vec<SequenceLesson>,
    pub progression: String,
    pub overall_goals: Vec<String>,
}

//! Data models for lesson plans and generated content.
//!
//! This module contains the domain records of the planning wizard. Display
//! implementations for these models are located in [`crate::display`] to keep
//! data structures and presentation logic apart.
//!
//! ## Layout
//!
//! - [`choice`]: closed option sets (level, language level, didactic slots, ...)
//! - [`plan`]: the [`Plan`] aggregate with its class profile and slots
//! - [`content`]: generated artifacts (short version, detail plan, sequence)
//! - [`curriculum`]: competencies and plan mappings
//! - [`quality`]: advisory warnings and compatibility results
//!
//! All records serialize with camelCase keys so the stored draft, the JSON
//! export and the generation service share one shape.

pub mod choice;
pub mod content;
pub mod curriculum;
pub mod plan;
pub mod quality;

#[cfg(test)]
mod tests;

pub use choice::{
    AccessMode, CurriculumSource, Heterogeneity, LanguageLevel, LearningGoalType, LearningMode,
    Level, PlanMode, PlanStatus, QualityLayer, StructureModel,
};
pub use content::{
    DetailPlan, DidacticDiagnosis, Differentiation, Phase, PhaseSummary, RubricRow,
    SequenceLesson, SequenceSkeleton, ShortVersion,
};
pub use curriculum::{Competency, CurriculumMapping};
pub use plan::{ClassProfile, DidacticSlots, Plan};
pub use quality::{CompatibilityResult, QualityWarning, Severity, WarningKind};

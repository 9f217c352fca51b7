//! The plan aggregate and its context records.

use serde::{Deserialize, Serialize};

use super::{
    choice::{
        Heterogeneity, LanguageLevel, LearningGoalType, LearningMode, Level, PlanMode,
        PlanStatus, QualityLayer, StructureModel,
    },
    content::{DetailPlan, SequenceSkeleton, ShortVersion},
    curriculum::CurriculumMapping,
};

/// Default lesson length in minutes.
pub const DEFAULT_DURATION_MINUTES: u32 = 45;
/// Default number of lessons in a sequence.
pub const DEFAULT_LESSON_COUNT: u32 = 6;
/// Allowed range for the number of lessons in a sequence.
pub const LESSON_COUNT_RANGE: std::ops::RangeInclusive<u32> = 3..=12;

/// Profile of the class the lesson is planned for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassProfile {
    pub class_size: u32,
    pub heterogeneity: Heterogeneity,
    pub language_level: LanguageLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ClassProfile {
    /// Whether phases need sentence starters, word lists and support hints.
    pub fn needs_language_support(&self) -> bool {
        self.language_level.is_developing() || self.heterogeneity == Heterogeneity::High
    }
}

impl Default for ClassProfile {
    fn default() -> Self {
        Self {
            class_size: 20,
            heterogeneity: Heterogeneity::Medium,
            language_level: LanguageLevel::B2,
            notes: None,
        }
    }
}

/// The three independent didactic choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidacticSlots {
    pub slot1: Option<StructureModel>,
    pub slot2: Option<LearningMode>,
    pub slot3: Option<QualityLayer>,
}

/// Canonical record of one lesson or lesson sequence.
///
/// Every field the wizard collects lives here, together with the generated
/// artifacts and the workflow flags. The record serializes with camelCase
/// keys; the same shape is stored as the draft and written by the JSON
/// export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Plan {
    pub mode: PlanMode,
    pub title: String,
    pub subject: String,
    pub topic_description: String,
    pub level: Option<Level>,
    pub duration_minutes: u32,
    pub lesson_count: u32,
    pub class_profile: ClassProfile,
    pub special_needs: String,
    pub learning_goal_type: Option<LearningGoalType>,

    pub goals: Vec<String>,
    pub curriculum_mappings: Vec<CurriculumMapping>,

    pub didactic_slots: DidacticSlots,

    pub short_version: Option<ShortVersion>,
    pub detail_plan: Option<DetailPlan>,
    pub sequence_skeleton: Option<SequenceSkeleton>,

    pub status: PlanStatus,
    pub gate_a_approved: bool,
    pub gate_b_approved: bool,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            mode: PlanMode::Single,
            title: String::new(),
            subject: String::new(),
            topic_description: String::new(),
            level: None,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            lesson_count: DEFAULT_LESSON_COUNT,
            class_profile: ClassProfile::default(),
            special_needs: String::new(),
            learning_goal_type: None,
            goals: vec![String::new()],
            curriculum_mappings: Vec::new(),
            didactic_slots: DidacticSlots::default(),
            short_version: None,
            detail_plan: None,
            sequence_skeleton: None,
            status: PlanStatus::Draft,
            gate_a_approved: false,
            gate_b_approved: false,
        }
    }
}

impl Plan {
    /// Title if set, otherwise the subject.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.subject
        } else {
            &self.title
        }
    }

    /// Goals with blank entries removed.
    pub fn filled_goals(&self) -> Vec<&str> {
        self.goals
            .iter()
            .map(|goal| goal.trim())
            .filter(|goal| !goal.is_empty())
            .collect()
    }

    /// Whether at least one lesson of the skeleton has a detail plan.
    pub fn has_lesson_details(&self) -> bool {
        self.sequence_skeleton
            .as_ref()
            .is_some_and(|skeleton| skeleton.lessons.iter().any(|l| l.detail_plan.is_some()))
    }
}

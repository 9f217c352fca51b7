//! Step gating for the nine-step planning wizard.
//!
//! Two questions are answered here, both as pure functions of a [`Plan`]:
//!
//! - [`is_step_accessible`]: may the wizard show step `n` at all?
//! - [`validate_step`]: is step `n` complete enough to move on?
//!
//! Steps 1-4 are always reachable. Steps 5-7 need a short version, step 8
//! needs gate B, and step 9 needs a detail plan (single mode) or a sequence
//! skeleton (sequence mode). Failed validation never raises; it returns the
//! list of reasons shown to the teacher.

pub mod steps;

#[cfg(test)]
mod tests;

pub use steps::{step_config, steps_for, StepConfig, SEQUENCE_STEPS, SINGLE_STEPS, STEP_COUNT};

use crate::models::{Plan, PlanMode};

/// Reasons that keep a step from being complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepValidation {
    pub errors: Vec<String>,
}

impl StepValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn require(&mut self, condition: bool, message: &str) {
        if !condition {
            self.errors.push(message.to_string());
        }
    }
}

/// Whether `step` may be entered with the given plan.
///
/// Step numbers outside `1..=9` are never accessible.
pub fn is_step_accessible(step: u8, plan: &Plan) -> bool {
    match step {
        1..=4 => true,
        5..=7 => plan.short_version.is_some(),
        8 => plan.gate_b_approved,
        9 => match plan.mode {
            PlanMode::Single => plan.detail_plan.is_some(),
            PlanMode::Sequence => plan.sequence_skeleton.is_some(),
        },
        _ => false,
    }
}

/// Checks whether `step` is complete.
pub fn validate_step(step: u8, plan: &Plan) -> StepValidation {
    let mut validation = StepValidation::default();

    match step {
        1 => {
            validation.require(plan.level.is_some(), "Bitte wähle eine Stufe.");
            validation.require(!plan.subject.trim().is_empty(), "Bitte gib ein Fach/Thema ein.");
            validation.require(plan.duration_minutes > 0, "Bitte wähle eine Dauer.");
            validation.require(
                plan.class_profile.class_size > 0,
                "Bitte gib die Klassengrösse ein.",
            );
            if plan.mode == PlanMode::Sequence {
                validation.require(
                    crate::models::plan::LESSON_COUNT_RANGE.contains(&plan.lesson_count),
                    "Sequenz benötigt 3–12 Lektionen.",
                );
            }
            validation.require(
                plan.learning_goal_type.is_some(),
                "Bitte wähle einen Lernzieltyp.",
            );
        }
        2 => validation.require(
            !plan.filled_goals().is_empty(),
            "Bitte gib mindestens ein Lernziel ein.",
        ),
        3 => validation.require(
            plan.didactic_slots.slot1.is_some(),
            "Bitte wähle ein Strukturmodell (Slot 1).",
        ),
        7 => validation.require(
            plan.gate_a_approved || plan.gate_b_approved,
            "Bitte bestätige die Kurzversion, bevor du fortfährst.",
        ),
        8 => validation.require(
            plan.gate_b_approved,
            "Detailplanung erst nach Freigabe der Kurzversion möglich.",
        ),
        9 => match plan.mode {
            PlanMode::Single => validation.require(
                plan.detail_plan.is_some(),
                "Bitte erstelle zuerst eine Detailplanung.",
            ),
            PlanMode::Sequence => validation.require(
                plan.has_lesson_details(),
                "Bitte erstelle die Detailplanung für mindestens eine Lektion der Sequenz.",
            ),
        },
        _ => {}
    }

    validation
}

/// Validates every step up to and including `last`, collecting all reasons.
pub fn validate_through(last: u8, plan: &Plan) -> StepValidation {
    let errors = (1..=last)
        .flat_map(|step| validate_step(step, plan).errors)
        .collect();
    StepValidation { errors }
}

//! The wizard's application state and every mutation on it.
//!
//! A [`Session`] owns the current [`Plan`], the wizard position, the last
//! validation messages, the teacher's working copy of the short version and a
//! bounded undo/redo [`History`]. Every plan mutation records the prior plan
//! first, so a single `undo` always reverts exactly one command.

pub mod history;


pub use history::{History, HISTORY_LIMIT};

use serde::{Deserialize, Serialize};

use crate::{
    error::{PilotError, Result},
    models::{
        CurriculumMapping, DetailPlan, Heterogeneity, LanguageLevel, LearningGoalType,
        LearningMode, Level, Plan, PlanMode, PlanStatus, QualityLayer, SequenceSkeleton,
        ShortVersion, StructureModel,
    },
    workflow::{self, STEP_COUNT},
};

/// Batched update of the context fields collected in step 1.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextUpdate {
    pub mode: Option<PlanMode>,
    pub title: Option<String>,
    pub subject: Option<String>,
    pub topic_description: Option<String>,
    pub level: Option<Level>,
    pub duration_minutes: Option<u32>,
    pub lesson_count: Option<u32>,
    pub learning_goal_type: Option<LearningGoalType>,
    pub class_size: Option<u32>,
    pub heterogeneity: Option<Heterogeneity>,
    pub language_level: Option<LanguageLevel>,
    pub special_needs: Option<String>,
    pub class_notes: Option<String>,
}

impl ContextUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(self, plan: &mut Plan) {
        if let Some(mode) = self.mode {
            plan.mode = mode;
        }
        if let Some(title) = self.title {
            plan.title = title;
        }
        if let Some(subject) = self.subject {
            plan.subject = subject;
        }
        if let Some(topic) = self.topic_description {
            plan.topic_description = topic;
        }
        if let Some(level) = self.level {
            plan.level = Some(level);
        }
        if let Some(minutes) = self.duration_minutes {
            plan.duration_minutes = minutes;
        }
        if let Some(count) = self.lesson_count {
            plan.lesson_count = count;
        }
        if let Some(goal_type) = self.learning_goal_type {
            plan.learning_goal_type = Some(goal_type);
        }
        if let Some(size) = self.class_size {
            plan.class_profile.class_size = size;
        }
        if let Some(heterogeneity) = self.heterogeneity {
            plan.class_profile.heterogeneity = heterogeneity;
        }
        if let Some(language_level) = self.language_level {
            plan.class_profile.language_level = language_level;
        }
        if let Some(needs) = self.special_needs {
            plan.special_needs = needs;
        }
        if let Some(notes) = self.class_notes {
            plan.class_profile.notes = Some(notes).filter(|n| !n.trim().is_empty());
        }
    }
}

/// Result of trying to advance the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepTransition {
    /// The wizard moved to the contained step.
    Moved(u8),
    /// The current step is incomplete; the reasons were stored on the session.
    Blocked(Vec<String>),
    /// The step is complete but the following step is not reachable.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    plan: Plan,
    current_step: u8,
    validation_errors: Vec<String>,
    edited_short_version: Option<ShortVersion>,
    history: History,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session on step 1 with a default plan.
    pub fn new() -> Self {
        Self {
            plan: Plan::default(),
            current_step: 1,
            validation_errors: Vec::new(),
            edited_short_version: None,
            history: History::default(),
        }
    }

    /// Rebuilds a session from persisted parts.
    ///
    /// A step outside the wizard range falls back to step 1.
    pub fn restore(
        plan: Plan,
        step: u8,
        edited_short_version: Option<ShortVersion>,
        history: History,
    ) -> Self {
        let current_step = if (1..=STEP_COUNT).contains(&step) {
            step
        } else {
            1
        };
        let edited_short_version = edited_short_version.or_else(|| plan.short_version.clone());
        let mut session = Self {
            plan,
            current_step,
            validation_errors: Vec::new(),
            edited_short_version,
            history,
        };
        session.clamp_step();
        session
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    pub fn edited_short_version(&self) -> Option<&ShortVersion> {
        self.edited_short_version.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether the edited copy differs from the generated short version.
    pub fn has_unrevised_edits(&self) -> bool {
        match (&self.plan.short_version, &self.edited_short_version) {
            (Some(generated), Some(edited)) => generated != edited,
            _ => false,
        }
    }

    /// Applies `change` to the plan after recording the current state.
    fn update(&mut self, change: impl FnOnce(&mut Plan)) {
        self.history.record(self.plan.clone());
        change(&mut self.plan);
    }

    // --- navigation ---

    /// Jumps to `step` if it is accessible. Returns whether the wizard moved.
    pub fn set_step(&mut self, step: u8) -> bool {
        if !workflow::is_step_accessible(step, &self.plan) {
            return false;
        }
        self.current_step = step;
        self.validation_errors.clear();
        true
    }

    pub fn next_step(&mut self) -> StepTransition {
        let validation = workflow::validate_step(self.current_step, &self.plan);
        if !validation.is_valid() {
            self.validation_errors = validation.errors.clone();
            return StepTransition::Blocked(validation.errors);
        }

        let next = self.current_step + 1;
        if next <= STEP_COUNT && workflow::is_step_accessible(next, &self.plan) {
            self.current_step = next;
            self.validation_errors.clear();
            StepTransition::Moved(next)
        } else {
            StepTransition::Unchanged
        }
    }

    /// Falls back to the nearest earlier step the plan still unlocks.
    fn clamp_step(&mut self) {
        let reachable = (1..=self.current_step)
            .rev()
            .find(|&step| workflow::is_step_accessible(step, &self.plan))
            .unwrap_or(1);
        if reachable != self.current_step {
            log::debug!(
                "Step {} is no longer accessible, moving to step {reachable}",
                self.current_step
            );
            self.current_step = reachable;
            self.validation_errors.clear();
        }
    }

    /// Steps back once. Returns whether the wizard moved.
    pub fn prev_step(&mut self) -> bool {
        if self.current_step <= 1 {
            return false;
        }
        self.current_step -= 1;
        self.validation_errors.clear();
        true
    }

    // --- context ---

    pub fn update_context(&mut self, update: ContextUpdate) {
        self.update(|plan| update.apply(plan));
    }

    pub fn set_mode(&mut self, mode: PlanMode) {
        self.update(|plan| plan.mode = mode);
    }

    pub fn set_level(&mut self, level: Level) {
        self.update(|plan| plan.level = Some(level));
    }

    pub fn set_duration(&mut self, minutes: u32) {
        self.update(|plan| plan.duration_minutes = minutes);
    }

    pub fn set_lesson_count(&mut self, count: u32) {
        self.update(|plan| plan.lesson_count = count);
    }

    pub fn set_learning_goal_type(&mut self, goal_type: LearningGoalType) {
        self.update(|plan| plan.learning_goal_type = Some(goal_type));
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        let subject = subject.into();
        self.update(|plan| plan.subject = subject);
    }

    pub fn set_topic_description(&mut self, topic: impl Into<String>) {
        let topic = topic.into();
        self.update(|plan| plan.topic_description = topic);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.update(|plan| plan.title = title);
    }

    pub fn set_class_size(&mut self, size: u32) {
        self.update(|plan| plan.class_profile.class_size = size);
    }

    pub fn set_heterogeneity(&mut self, heterogeneity: Heterogeneity) {
        self.update(|plan| plan.class_profile.heterogeneity = heterogeneity);
    }

    pub fn set_language_level(&mut self, level: LanguageLevel) {
        self.update(|plan| plan.class_profile.language_level = level);
    }

    pub fn set_special_needs(&mut self, notes: impl Into<String>) {
        let notes = notes.into();
        self.update(|plan| plan.special_needs = notes);
    }

    // --- goals ---

    pub fn add_goal(&mut self, goal: impl Into<String>) {
        let goal = goal.into();
        self.update(|plan| plan.goals.push(goal));
    }

    pub fn update_goal(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        if index >= self.plan.goals.len() {
            return Err(goal_index_error(index, self.plan.goals.len()));
        }
        let value = value.into();
        self.update(|plan| plan.goals[index] = value);
        Ok(())
    }

    /// Removes a goal. The last remaining goal is never removed; in that case
    /// `Ok(false)` is returned and nothing changes.
    pub fn remove_goal(&mut self, index: usize) -> Result<bool> {
        if index >= self.plan.goals.len() {
            return Err(goal_index_error(index, self.plan.goals.len()));
        }
        if self.plan.goals.len() <= 1 {
            return Ok(false);
        }
        self.update(|plan| {
            plan.goals.remove(index);
        });
        Ok(true)
    }

    pub fn set_goals(&mut self, goals: Vec<String>) {
        self.update(|plan| plan.goals = goals);
    }

    // --- didactics ---

    pub fn set_slot1(&mut self, value: Option<StructureModel>) {
        self.update(|plan| plan.didactic_slots.slot1 = value);
    }

    pub fn set_slot2(&mut self, value: Option<LearningMode>) {
        self.update(|plan| plan.didactic_slots.slot2 = value);
    }

    pub fn set_slot3(&mut self, value: Option<QualityLayer>) {
        self.update(|plan| plan.didactic_slots.slot3 = value);
    }

    // --- generated content ---

    /// Replaces the short version and refreshes the teacher's working copy.
    pub fn set_short_version(&mut self, short_version: ShortVersion) {
        self.edited_short_version = Some(short_version.clone());
        self.update(|plan| {
            plan.short_version = Some(short_version);
            plan.status = PlanStatus::AiGenerated;
        });
    }

    pub fn set_detail_plan(&mut self, detail: DetailPlan) {
        self.update(|plan| {
            plan.detail_plan = Some(detail);
            plan.status = PlanStatus::DetailReady;
        });
    }

    pub fn set_sequence_skeleton(&mut self, skeleton: SequenceSkeleton) {
        self.update(|plan| plan.sequence_skeleton = Some(skeleton));
    }

    /// Replaces skeleton and short version together, as one undo step.
    pub fn set_sequence_content(&mut self, skeleton: SequenceSkeleton, short_version: ShortVersion) {
        self.edited_short_version = Some(short_version.clone());
        self.update(|plan| {
            plan.sequence_skeleton = Some(skeleton);
            plan.short_version = Some(short_version);
            plan.status = PlanStatus::AiGenerated;
        });
    }

    /// Stores the teacher's edited copy of the short version.
    pub fn set_edited_short_version(&mut self, edited: ShortVersion) {
        self.edited_short_version = Some(edited);
        self.update(|plan| plan.status = PlanStatus::Edited);
    }

    /// Attaches a detail plan to lesson `index` of the sequence.
    pub fn set_lesson_detail(&mut self, index: usize, detail: DetailPlan) -> Result<()> {
        let lessons = self
            .plan
            .sequence_skeleton
            .as_ref()
            .map(|s| s.lessons.len())
            .ok_or_else(|| {
                PilotError::invalid_input("lesson")
                    .with_reason("Es gibt noch keine Sequenzplanung.")
            })?;
        if index >= lessons {
            return Err(PilotError::invalid_input("lesson").with_reason(format!(
                "Lektion {} existiert nicht (Sequenz hat {lessons} Lektionen).",
                index + 1
            )));
        }
        self.update(|plan| {
            if let Some(lesson) = plan
                .sequence_skeleton
                .as_mut()
                .and_then(|s| s.lessons.get_mut(index))
            {
                lesson.detail_plan = Some(detail);
            }
        });
        Ok(())
    }

    /// Replaces the short version with a revised one and marks the plan revised.
    pub fn mark_revised(&mut self, revised: ShortVersion) {
        self.edited_short_version = Some(revised.clone());
        self.update(|plan| {
            plan.short_version = Some(revised);
            plan.status = PlanStatus::Revised;
        });
    }

    pub fn mark_exported(&mut self) {
        self.update(|plan| plan.status = PlanStatus::Exported);
    }

    // --- gates ---

    pub fn approve_gate_a(&mut self) -> Result<()> {
        self.require_short_version('A')?;
        self.update(|plan| {
            plan.gate_a_approved = true;
            plan.status = PlanStatus::Edited;
        });
        Ok(())
    }

    pub fn approve_gate_b(&mut self) -> Result<()> {
        self.require_short_version('B')?;
        self.update(|plan| {
            plan.gate_b_approved = true;
            plan.status = PlanStatus::Approved;
        });
        Ok(())
    }

    pub fn reset_gates(&mut self) {
        self.update(|plan| {
            plan.gate_a_approved = false;
            plan.gate_b_approved = false;
            plan.status = PlanStatus::Draft;
        });
    }

    fn require_short_version(&self, gate: char) -> Result<()> {
        if self.plan.short_version.is_some() {
            Ok(())
        } else {
            Err(PilotError::GateLocked {
                gate,
                reason: "Bitte generiere zuerst eine Kurzversion.".to_string(),
            })
        }
    }

    // --- curriculum ---

    /// Adds a mapping unless one with the same competency id exists.
    pub fn add_curriculum_mapping(&mut self, mapping: CurriculumMapping) -> bool {
        if self
            .plan
            .curriculum_mappings
            .iter()
            .any(|m| m.competency_id == mapping.competency_id)
        {
            return false;
        }
        self.update(|plan| plan.curriculum_mappings.push(mapping));
        true
    }

    /// Adds every mapping whose competency id is new, as one undo step.
    /// Returns the number of mappings added.
    pub fn add_curriculum_mappings(&mut self, mappings: Vec<CurriculumMapping>) -> usize {
        let mut fresh: Vec<CurriculumMapping> = Vec::new();
        for mapping in mappings {
            let known = self.has_mapping(&mapping.competency_id)
                || fresh.iter().any(|m| m.competency_id == mapping.competency_id);
            if !known {
                fresh.push(mapping);
            }
        }
        let added = fresh.len();
        if added > 0 {
            self.update(|plan| plan.curriculum_mappings.extend(fresh));
        }
        added
    }

    pub fn remove_curriculum_mapping(&mut self, competency_id: &str) -> bool {
        if !self.has_mapping(competency_id) {
            return false;
        }
        self.update(|plan| {
            plan.curriculum_mappings
                .retain(|m| m.competency_id != competency_id)
        });
        true
    }

    pub fn confirm_mapping(&mut self, competency_id: &str) -> bool {
        if !self.has_mapping(competency_id) {
            return false;
        }
        self.update(|plan| {
            for mapping in plan
                .curriculum_mappings
                .iter_mut()
                .filter(|m| m.competency_id == competency_id)
            {
                mapping.confirmed = true;
            }
        });
        true
    }

    fn has_mapping(&self, competency_id: &str) -> bool {
        self.plan
            .curriculum_mappings
            .iter()
            .any(|m| m.competency_id == competency_id)
    }

    // --- history ---

    pub fn undo(&mut self) -> bool {
        let current = std::mem::take(&mut self.plan);
        match self.history.undo(current) {
            Ok(previous) => {
                self.plan = previous;
                self.clamp_step();
                true
            }
            Err(current) => {
                self.plan = current;
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = std::mem::take(&mut self.plan);
        match self.history.redo(current) {
            Ok(next) => {
                self.plan = next;
                self.clamp_step();
                true
            }
            Err(current) => {
                self.plan = current;
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Starts over with a fresh plan on step 1 and an empty history.
    pub fn reset_plan(&mut self) {
        *self = Self::new();
    }
}

fn goal_index_error(index: usize, len: usize) -> PilotError {
    PilotError::invalid_input("goal").with_reason(format!(
        "Lernziel {} existiert nicht (es gibt {len}).",
        index + 1
    ))
}

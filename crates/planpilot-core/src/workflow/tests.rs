//! Tests for step gating.

use super::*;
use crate::models::{
    DetailPlan, LearningGoalType, Level, PlanMode, SequenceLesson, SequenceSkeleton,
    ShortVersion, StructureModel,
};

fn complete_context() -> Plan {
    Plan {
        subject: "Mathematik".to_string(),
        level: Some(Level::Primary),
        learning_goal_type: Some(LearningGoalType::Application),
        goals: vec!["Die SuS können Brüche addieren.".to_string()],
        ..Default::default()
    }
}

#[test]
fn test_first_four_steps_always_accessible() {
    let plan = Plan::default();
    for step in 1..=4 {
        assert!(is_step_accessible(step, &plan));
    }
    for step in 5..=9 {
        assert!(!is_step_accessible(step, &plan));
    }
}

#[test]
fn test_out_of_range_steps_are_inaccessible() {
    let plan = Plan::default();
    assert!(!is_step_accessible(0, &plan));
    assert!(!is_step_accessible(10, &plan));
}

#[test]
fn test_short_version_unlocks_middle_steps() {
    let plan = Plan {
        short_version: Some(ShortVersion::default()),
        ..Default::default()
    };
    for step in 5..=7 {
        assert!(is_step_accessible(step, &plan));
    }
    assert!(!is_step_accessible(8, &plan));
}

#[test]
fn test_sequence_step_eight_requires_gate_b() {
    let mut plan = Plan {
        mode: PlanMode::Sequence,
        short_version: Some(ShortVersion::default()),
        sequence_skeleton: Some(SequenceSkeleton::default()),
        gate_a_approved: true,
        ..Default::default()
    };
    assert!(!is_step_accessible(8, &plan));

    plan.gate_b_approved = true;
    assert!(is_step_accessible(8, &plan));
}

#[test]
fn test_step_nine_depends_on_mode() {
    let mut plan = Plan {
        detail_plan: Some(DetailPlan::default()),
        ..Default::default()
    };
    assert!(is_step_accessible(9, &plan));

    plan.mode = PlanMode::Sequence;
    assert!(!is_step_accessible(9, &plan));

    plan.sequence_skeleton = Some(SequenceSkeleton::default());
    assert!(is_step_accessible(9, &plan));
}

#[test]
fn test_validate_context_reports_every_missing_field() {
    let mut plan = Plan::default();
    plan.duration_minutes = 0;
    plan.class_profile.class_size = 0;

    let validation = validate_step(1, &plan);
    assert_eq!(
        validation.errors,
        vec![
            "Bitte wähle eine Stufe.",
            "Bitte gib ein Fach/Thema ein.",
            "Bitte wähle eine Dauer.",
            "Bitte gib die Klassengrösse ein.",
            "Bitte wähle einen Lernzieltyp.",
        ]
    );
}

#[test]
fn test_validate_context_lesson_count_only_in_sequence_mode() {
    let mut plan = complete_context();
    plan.lesson_count = 2;
    assert!(validate_step(1, &plan).is_valid());

    plan.mode = PlanMode::Sequence;
    assert_eq!(
        validate_step(1, &plan).errors,
        vec!["Sequenz benötigt 3–12 Lektionen."]
    );

    plan.lesson_count = 12;
    assert!(validate_step(1, &plan).is_valid());
}

#[test]
fn test_validate_goals_ignores_blank_entries() {
    let mut plan = Plan::default();
    plan.goals = vec!["   ".to_string(), String::new()];
    assert!(!validate_step(2, &plan).is_valid());

    plan.goals.push("Die SuS können argumentieren.".to_string());
    assert!(validate_step(2, &plan).is_valid());
}

#[test]
fn test_validate_didactics_requires_slot_one() {
    let mut plan = Plan::default();
    assert!(!validate_step(3, &plan).is_valid());

    plan.didactic_slots.slot1 = Some(StructureModel::Aviva);
    assert!(validate_step(3, &plan).is_valid());
}

#[test]
fn test_validate_step_seven_passes_iff_either_gate() {
    for (gate_a, gate_b) in [(false, false), (true, false), (false, true), (true, true)] {
        let plan = Plan {
            gate_a_approved: gate_a,
            gate_b_approved: gate_b,
            ..Default::default()
        };
        assert_eq!(validate_step(7, &plan).is_valid(), gate_a || gate_b);
    }
}

#[test]
fn test_validate_export_in_sequence_mode_needs_a_lesson_detail() {
    let mut skeleton = SequenceSkeleton {
        lessons: vec![SequenceLesson::default(), SequenceLesson::default()],
        ..Default::default()
    };
    let mut plan = Plan {
        mode: PlanMode::Sequence,
        sequence_skeleton: Some(skeleton.clone()),
        ..Default::default()
    };
    assert!(!validate_step(9, &plan).is_valid());

    skeleton.lessons[1].detail_plan = Some(DetailPlan::default());
    plan.sequence_skeleton = Some(skeleton);
    assert!(validate_step(9, &plan).is_valid());
}

#[test]
fn test_steps_without_rules_are_valid() {
    let plan = Plan::default();
    for step in [4, 5, 6, 42] {
        assert!(validate_step(step, &plan).is_valid());
    }
}

#[test]
fn test_validate_through_collects_all_steps() {
    let plan = complete_context();
    let validation = validate_through(3, &plan);
    assert_eq!(validation.errors, vec!["Bitte wähle ein Strukturmodell (Slot 1)."]);
}

#[test]
fn test_step_tables() {
    assert_eq!(SINGLE_STEPS.len(), 9);
    assert_eq!(step_config(PlanMode::Single, 5).and_then(|s| s.gate_label), Some("GATE A"));
    assert_eq!(step_config(PlanMode::Sequence, 7).and_then(|s| s.gate_label), Some("GATE S2"));
    assert!(step_config(PlanMode::Single, 10).is_none());
    assert!(!SEQUENCE_STEPS[0].is_gate());
}

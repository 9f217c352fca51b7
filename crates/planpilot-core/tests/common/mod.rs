use planpilot_core::{
    models::{LearningGoalType, Level, PlanMode, StructureModel},
    Planner, PlannerBuilder, Session,
};
use tempfile::TempDir;

/// Helper function to create an offline test planner
pub async fn create_test_planner() -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .offline(true)
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

/// A session with steps 1 to 3 complete.
#[allow(dead_code)]
pub fn prepared_session(mode: PlanMode) -> Session {
    let mut session = Session::new();
    session.set_mode(mode);
    session.set_subject("Natur und Technik");
    session.set_topic_description("Einfache Stromkreise bauen und erklären");
    session.set_level(Level::LowerSecondary);
    session.set_learning_goal_type(LearningGoalType::Application);
    session.set_lesson_count(4);
    session.add_goal("Die SuS können einen einfachen Stromkreis aufbauen.");
    session.set_slot1(Some(StructureModel::Aviva));
    session
}

//! Tests for the planner module.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use tempfile::TempDir;

use super::*;
use crate::{
    export::ExportFormat,
    generation::{
        AbortSignal, DetailPrompt, GenerationError, GenerationOutcome, RevisePrompt,
        SequencePrompt, ShortPrompt,
    },
    models::{
        DetailPlan, Differentiation, LanguageLevel, LearningGoalType, Level, Phase, PhaseSummary,
        PlanMode, PlanStatus, SequenceLesson, SequenceSkeleton, ShortVersion, StructureModel,
    },
    session::{ContextUpdate, Session},
    PilotError,
};

/// Generator that answers from fixed content; a missing entry fails with
/// HTTP 429.
#[derive(Default)]
struct ScriptedGenerator {
    short: Option<ShortVersion>,
    detail: Option<DetailPlan>,
    skeleton: Option<SequenceSkeleton>,
    revised: Option<ShortVersion>,
    cancel: bool,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    fn answer<T: Clone>(&self, value: &Option<T>) -> GenerationOutcome<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.cancel {
            return GenerationOutcome::Cancelled;
        }
        match value {
            Some(value) => GenerationOutcome::Generated(value.clone()),
            None => GenerationOutcome::Failed(GenerationError::Status {
                status: 429,
                body: "rate limited".to_string(),
            }),
        }
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn short_version(&self, _: &ShortPrompt, _: &AbortSignal) -> GenerationOutcome<ShortVersion> {
        self.answer(&self.short)
    }

    async fn detail_plan(&self, _: &DetailPrompt, _: &AbortSignal) -> GenerationOutcome<DetailPlan> {
        self.answer(&self.detail)
    }

    async fn sequence_skeleton(
        &self,
        _: &SequencePrompt,
        _: &AbortSignal,
    ) -> GenerationOutcome<SequenceSkeleton> {
        self.answer(&self.skeleton)
    }

    async fn revise(&self, _: &RevisePrompt, _: &AbortSignal) -> GenerationOutcome<ShortVersion> {
        self.answer(&self.revised)
    }
}

/// Helper function to create a test planner
async fn create_test_planner(generator: ScriptedGenerator) -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .with_generator(Arc::new(generator))
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

fn ready_session(mode: PlanMode) -> Session {
    let mut session = Session::new();
    session.update_context(ContextUpdate {
        mode: Some(mode),
        subject: Some("Natur und Technik".to_string()),
        topic_description: Some("Elektrische Stromkreise".to_string()),
        level: Some(Level::LowerSecondary),
        learning_goal_type: Some(LearningGoalType::Application),
        lesson_count: Some(4),
        ..Default::default()
    });
    session.set_goals(vec!["Die SuS bauen einen einfachen Stromkreis.".to_string()]);
    session.set_slot1(Some(StructureModel::Aviva));
    session
}

fn generated_short_version() -> ShortVersion {
    ShortVersion {
        title: "Stromkreise".to_string(),
        overview: "Von der Batterie zur Lampe.".to_string(),
        goals: vec!["Stromkreis bauen".to_string()],
        phases_summary: vec![PhaseSummary {
            name: "Einstieg".to_string(),
            duration_minutes: 45,
            description: "Lampe zum Leuchten bringen".to_string(),
        }],
        ..Default::default()
    }
}

fn generated_detail() -> DetailPlan {
    DetailPlan {
        phases: vec![Phase {
            id: "p1".to_string(),
            name: "Einführung".to_string(),
            duration_minutes: 45,
            description: "Erklärung des Stromkreises".to_string(),
            differentiation: Differentiation {
                niveau_a: "Mit Vorlage".to_string(),
                niveau_b: "Standard".to_string(),
                niveau_c: "Parallelschaltung".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_generate_requires_complete_context() {
    let (_temp_dir, planner) = create_test_planner(ScriptedGenerator::default()).await;
    let mut session = Session::new();

    let err = planner
        .generate(&mut session, &AbortSignal::never())
        .await
        .unwrap_err();
    assert!(matches!(err, PilotError::StepIncomplete { step: 1, .. }));
    assert!(session.plan().short_version.is_none());
}

#[tokio::test]
async fn test_generate_assigns_service_content() {
    let generator = ScriptedGenerator {
        short: Some(generated_short_version()),
        ..Default::default()
    };
    let (_temp_dir, planner) = create_test_planner(generator).await;
    let mut session = ready_session(PlanMode::Single);

    let report = planner
        .generate(&mut session, &AbortSignal::never())
        .await
        .unwrap();
    assert_eq!(report, GenerationReport::Generated);
    assert_eq!(session.plan().short_version, Some(generated_short_version()));
    assert_eq!(session.plan().status, PlanStatus::AiGenerated);
}

#[tokio::test]
async fn test_generate_falls_back_with_notice() {
    let (_temp_dir, planner) = create_test_planner(ScriptedGenerator::default()).await;
    let mut session = ready_session(PlanMode::Single);

    let report = planner
        .generate(&mut session, &AbortSignal::never())
        .await
        .unwrap();
    let notice = report.notice().unwrap();
    assert!(notice.starts_with("Hinweis: KI-Limit erreicht."));
    assert!(notice.ends_with("Plan wurde mit verbesserter Vorlage erstellt."));

    let short_version = session.plan().short_version.as_ref().unwrap();
    let total: u32 = short_version.phases_summary.iter().map(|p| p.duration_minutes).sum();
    assert_eq!(total, 45);
}

#[tokio::test]
async fn test_cancelled_generation_leaves_session_untouched() {
    let generator = ScriptedGenerator {
        short: Some(generated_short_version()),
        cancel: true,
        ..Default::default()
    };
    let (_temp_dir, planner) = create_test_planner(generator).await;
    let mut session = ready_session(PlanMode::Single);
    let before = session.clone();

    let report = planner
        .generate(&mut session, &AbortSignal::never())
        .await
        .unwrap();
    assert!(report.is_cancelled());
    assert_eq!(session, before);
}

#[tokio::test]
async fn test_sequence_generation_derives_short_version() {
    let skeleton = SequenceSkeleton {
        lessons: vec![
            SequenceLesson {
                title: "Einstieg".to_string(),
                focus: "Vorwissen".to_string(),
                ..Default::default()
            },
            SequenceLesson {
                title: "Vertiefung".to_string(),
                focus: "Schaltungen".to_string(),
                ..Default::default()
            },
        ],
        progression: "Vom Einfachen zum Komplexen".to_string(),
        overall_goals: vec!["Stromkreise verstehen".to_string()],
    };
    let generator = ScriptedGenerator {
        skeleton: Some(skeleton),
        ..Default::default()
    };
    let (_temp_dir, planner) = create_test_planner(generator).await;
    let mut session = ready_session(PlanMode::Sequence);

    planner
        .generate(&mut session, &AbortSignal::never())
        .await
        .unwrap();

    let plan = session.plan();
    let lessons = &plan.sequence_skeleton.as_ref().unwrap().lessons;
    assert_eq!(lessons[1].id, "l-2");
    assert_eq!(lessons[1].duration_minutes, 45);
    let short_version = plan.short_version.as_ref().unwrap();
    assert_eq!(short_version.phases_summary[1].name, "Lektion 2: Vertiefung");

    assert!(session.undo());
    assert!(session.plan().sequence_skeleton.is_none());
}

#[tokio::test]
async fn test_sequence_fallback_uses_lesson_count() {
    let (_temp_dir, planner) = create_test_planner(ScriptedGenerator::default()).await;
    let mut session = ready_session(PlanMode::Sequence);

    let report = planner
        .generate(&mut session, &AbortSignal::never())
        .await
        .unwrap();
    assert!(matches!(report, GenerationReport::FellBack { .. }));
    assert_eq!(session.plan().sequence_skeleton.as_ref().unwrap().lessons.len(), 4);
    assert!(session.plan().short_version.is_some());
}

#[tokio::test]
async fn test_detail_requires_gate_b() {
    let (_temp_dir, planner) = create_test_planner(ScriptedGenerator::default()).await;
    let mut session = ready_session(PlanMode::Single);
    planner
        .generate(&mut session, &AbortSignal::never())
        .await
        .unwrap();

    let err = planner
        .generate_detail(&mut session, &AbortSignal::never())
        .await
        .unwrap_err();
    assert!(matches!(err, PilotError::StepLocked { step: 8 }));

    session.approve_gate_a().unwrap();
    session.approve_gate_b().unwrap();
    let report = planner
        .generate_detail(&mut session, &AbortSignal::never())
        .await
        .unwrap();
    assert!(report.notice().unwrap().contains("Fallback-Logik"));
    assert_eq!(session.plan().status, PlanStatus::DetailReady);
    assert_eq!(session.plan().detail_plan.as_ref().unwrap().total_minutes(), 45);
}

#[tokio::test]
async fn test_generated_detail_gets_language_support() {
    let generator = ScriptedGenerator {
        short: Some(generated_short_version()),
        detail: Some(generated_detail()),
        ..Default::default()
    };
    let (_temp_dir, planner) = create_test_planner(generator).await;
    let mut session = ready_session(PlanMode::Single);
    session.set_language_level(LanguageLevel::A2);
    planner
        .generate(&mut session, &AbortSignal::never())
        .await
        .unwrap();
    session.approve_gate_b().unwrap();

    planner
        .generate_detail(&mut session, &AbortSignal::never())
        .await
        .unwrap();

    let phase = &session.plan().detail_plan.as_ref().unwrap().phases[0];
    assert_eq!(phase.differentiation.niveau_c, "Parallelschaltung");
    assert!(phase.differentiation.sentence_starters.is_some());
}

#[tokio::test]
async fn test_all_lesson_details_fall_back_per_lesson() {
    let generator = ScriptedGenerator::default();
    let (_temp_dir, planner) = create_test_planner(generator).await;
    let mut session = ready_session(PlanMode::Sequence);
    planner
        .generate(&mut session, &AbortSignal::never())
        .await
        .unwrap();
    session.approve_gate_b().unwrap();

    let reports = planner
        .generate_all_lesson_details(&mut session, &AbortSignal::never())
        .await
        .unwrap();
    assert_eq!(reports.len(), 4);
    assert!(reports
        .iter()
        .all(|(_, report)| matches!(report, GenerationReport::FellBack { .. })));
    assert!(session
        .plan()
        .sequence_skeleton
        .as_ref()
        .unwrap()
        .lessons
        .iter()
        .all(|lesson| lesson.detail_plan.is_some()));

    let again = planner
        .generate_all_lesson_details(&mut session, &AbortSignal::never())
        .await
        .unwrap();
    assert!(again.is_empty());
}

#[tokio::test]
async fn test_lesson_detail_is_rejected_in_single_mode() {
    let (_temp_dir, planner) = create_test_planner(ScriptedGenerator::default()).await;
    let mut session = ready_session(PlanMode::Single);
    let err = planner
        .generate_lesson_detail(&mut session, 0, &AbortSignal::never())
        .await
        .unwrap_err();
    assert!(matches!(err, PilotError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_revise_adopts_edits_when_service_fails() {
    let (_temp_dir, planner) = create_test_planner(ScriptedGenerator::default()).await;
    let mut session = ready_session(PlanMode::Single);
    planner
        .generate(&mut session, &AbortSignal::never())
        .await
        .unwrap();

    let mut edited = session.edited_short_version().unwrap().clone();
    edited.overview = "Eigener Überblick".to_string();
    session.set_edited_short_version(edited);

    let report = planner
        .revise(&mut session, None, &AbortSignal::never())
        .await
        .unwrap();
    assert!(report.notice().unwrap().starts_with("Fehler bei der Überarbeitung"));
    assert_eq!(session.plan().status, PlanStatus::Revised);
    assert_eq!(
        session.plan().short_version.as_ref().unwrap().overview,
        "Eigener Überblick"
    );
}

#[tokio::test]
async fn test_revise_edited_failure_changes_nothing() {
    let (_temp_dir, planner) = create_test_planner(ScriptedGenerator::default()).await;
    let mut session = ready_session(PlanMode::Single);
    planner
        .generate(&mut session, &AbortSignal::never())
        .await
        .unwrap();
    let before = session.clone();

    let report = planner
        .revise_edited(&mut session, "Mehr Gruppenarbeit", &AbortSignal::never())
        .await
        .unwrap();
    assert!(matches!(report, GenerationReport::Unchanged { .. }));
    assert_eq!(session, before);
}

#[tokio::test]
async fn test_refine_detail_needs_instruction_and_plan() {
    let (_temp_dir, planner) = create_test_planner(ScriptedGenerator::default()).await;
    let mut session = ready_session(PlanMode::Single);

    assert!(planner.refine_detail(&mut session, "  ", None).is_err());
    assert!(planner.refine_detail(&mut session, "kürzen", None).is_err());

    session.set_detail_plan(generated_detail());
    planner
        .refine_detail(&mut session, "mehr Gruppenarbeit", None)
        .unwrap();
    let phase = &session.plan().detail_plan.as_ref().unwrap().phases[0];
    assert!(phase.social_form.is_some());
}

#[tokio::test]
async fn test_session_round_trip_through_database() {
    let (_temp_dir, planner) = create_test_planner(ScriptedGenerator::default()).await;
    let session = ready_session(PlanMode::Single);
    planner.save_session(&session).await.unwrap();

    let loaded = planner.load_session().await.unwrap();
    assert_eq!(loaded.plan(), session.plan());
    assert!(loaded.can_undo());
    assert!(planner.draft_saved_at().await.unwrap().is_some());

    let fresh = planner.reset_session().await.unwrap();
    assert_eq!(fresh, Session::new());
    assert_eq!(planner.load_session().await.unwrap(), Session::new());
}

#[tokio::test]
async fn test_add_competency_by_code() {
    let (_temp_dir, planner) = create_test_planner(ScriptedGenerator::default()).await;
    let mut session = ready_session(PlanMode::Single);
    let code = planner.catalog().competencies()[0].code.clone();

    assert!(planner.add_competency(&mut session, &code).unwrap());
    assert!(!planner.add_competency(&mut session, &code).unwrap());
    assert!(planner.add_competency(&mut session, "XX.9.9.9").is_err());
    assert_eq!(session.plan().curriculum_mappings.len(), 1);
}

#[tokio::test]
async fn test_import_curriculum_maps_competencies() {
    let (temp_dir, planner) = create_test_planner(ScriptedGenerator::default()).await;
    let path = temp_dir.path().join("lehrplan.txt");
    std::fs::write(&path, "MA.1.A.2: Zahlen vergleichen\nMA.1.B.1 - Schätzen\n").unwrap();
    let mut session = ready_session(PlanMode::Single);

    let summary = planner.import_curriculum(&mut session, &path).await.unwrap();
    assert_eq!(summary.competencies.len(), 2);
    assert_eq!(summary.added, 2);
    assert!(session
        .plan()
        .curriculum_mappings
        .iter()
        .all(|m| (m.confidence_score - 0.7).abs() < f64::EPSILON));

    let pdf = temp_dir.path().join("lehrplan.pdf");
    std::fs::write(&pdf, "x").unwrap();
    let before = session.clone();
    assert!(matches!(
        planner.import_curriculum(&mut session, &pdf).await,
        Err(PilotError::Upload { .. })
    ));
    assert_eq!(session, before);
}

#[tokio::test]
async fn test_second_upload_keeps_its_own_competencies() {
    let (temp_dir, planner) = create_test_planner(ScriptedGenerator::default()).await;
    let first = temp_dir.path().join("zyklus2.txt");
    let second = temp_dir.path().join("zyklus3.txt");
    std::fs::write(&first, "Zahlen vergleichen\nSchätzen\n").unwrap();
    std::fs::write(&second, "Terme umformen\nGleichungen lösen\n").unwrap();
    let mut session = ready_session(PlanMode::Single);
    let before = session.plan().curriculum_mappings.len();

    planner.import_curriculum(&mut session, &first).await.unwrap();
    let summary = planner.import_curriculum(&mut session, &second).await.unwrap();

    assert_eq!(summary.added, 2);
    let mappings = &session.plan().curriculum_mappings;
    assert_eq!(mappings.len(), before + 4);
    assert!(mappings.iter().any(|m| m.competency_id == "upload-zyklus3-0"));
}

#[tokio::test]
async fn test_export_requires_detail_and_marks_exported() {
    let (temp_dir, planner) = create_test_planner(ScriptedGenerator::default()).await;
    let mut session = ready_session(PlanMode::Single);

    let err = planner
        .export(&mut session, ExportFormat::Markdown, None)
        .await
        .unwrap_err();
    assert!(matches!(err, PilotError::StepLocked { step: 9 }));

    session.set_detail_plan(generated_detail());
    let result = planner
        .export(&mut session, ExportFormat::Markdown, Some(temp_dir.path()))
        .await
        .unwrap();

    let path = result.path.unwrap();
    assert!(path.starts_with(temp_dir.path()));
    assert!(result.file_name.ends_with(".md"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), result.content);
    assert_eq!(session.plan().status, PlanStatus::Exported);
}

#[tokio::test]
async fn test_quality_report_includes_compatibility() {
    let (_temp_dir, planner) = create_test_planner(ScriptedGenerator::default()).await;
    let mut session = ready_session(PlanMode::Single);
    session.set_slot1(Some(StructureModel::DirectInstruction));
    session.set_slot2(Some(crate::models::LearningMode::Inquiry));

    let report = planner.quality_report(&session);
    assert!(!report.compatibility.compatible);
    assert!(!report.is_clean());
}

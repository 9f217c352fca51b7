//! Content generation: prompts, the service client and offline fallbacks.
//!
//! A [`ContentGenerator`] never raises. Each call resolves to a
//! [`GenerationOutcome`] and the caller decides what to do with it:
//! assign generated content, fall back to the deterministic generators in
//! [`fallback`] with a notice, or leave the plan untouched when the request
//! was cancelled through an [`AbortSignal`].

pub mod abort;
pub mod client;
pub mod error;
pub mod fallback;
pub mod prompts;

pub use abort::{abort_pair, AbortHandle, AbortSignal};
pub use client::{GeneratorConfig, HttpGenerator, RetryPolicy};
pub use error::{ErrorKind, GenerationError};
pub use prompts::{
    DetailPrompt, GenerationKind, PlanContext, Prompt, RevisePrompt, SequencePrompt, ShortPrompt,
};

use async_trait::async_trait;

use crate::models::{
    DetailPlan, Differentiation, PhaseSummary, Plan, SequenceSkeleton, ShortVersion,
};

/// Instruction used when the teacher asks to polish an edited short version.
pub const DEFAULT_REVISION_INSTRUCTION: &str = "Überarbeite die Kurzversion basierend auf den \
     Änderungen der Lehrperson. Verbessere Formulierungen und Kohärenz.";

/// Result of one generation request.
#[derive(Debug)]
pub enum GenerationOutcome<T> {
    Generated(T),
    Cancelled,
    Failed(GenerationError),
}

impl<T> GenerationOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GenerationOutcome<U> {
        match self {
            GenerationOutcome::Generated(value) => GenerationOutcome::Generated(f(value)),
            GenerationOutcome::Cancelled => GenerationOutcome::Cancelled,
            GenerationOutcome::Failed(e) => GenerationOutcome::Failed(e),
        }
    }
}

/// Source of generated lesson content.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str;

    async fn short_version(
        &self,
        prompt: &ShortPrompt,
        signal: &AbortSignal,
    ) -> GenerationOutcome<ShortVersion>;

    async fn detail_plan(
        &self,
        prompt: &DetailPrompt,
        signal: &AbortSignal,
    ) -> GenerationOutcome<DetailPlan>;

    async fn sequence_skeleton(
        &self,
        prompt: &SequencePrompt,
        signal: &AbortSignal,
    ) -> GenerationOutcome<SequenceSkeleton>;

    async fn revise(
        &self,
        prompt: &RevisePrompt,
        signal: &AbortSignal,
    ) -> GenerationOutcome<ShortVersion>;
}

/// Generator used without an API key or with `--offline`. Every request
/// fails, so callers always take the fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

impl OfflineGenerator {
    fn unavailable<T>() -> GenerationOutcome<T> {
        GenerationOutcome::Failed(GenerationError::NotConfigured(
            "offline mode or OPENAI_API_KEY not set".to_string(),
        ))
    }
}

#[async_trait]
impl ContentGenerator for OfflineGenerator {
    fn name(&self) -> &str {
        "offline"
    }

    async fn short_version(&self, _: &ShortPrompt, _: &AbortSignal) -> GenerationOutcome<ShortVersion> {
        Self::unavailable()
    }

    async fn detail_plan(&self, _: &DetailPrompt, _: &AbortSignal) -> GenerationOutcome<DetailPlan> {
        Self::unavailable()
    }

    async fn sequence_skeleton(
        &self,
        _: &SequencePrompt,
        _: &AbortSignal,
    ) -> GenerationOutcome<SequenceSkeleton> {
        Self::unavailable()
    }

    async fn revise(&self, _: &RevisePrompt, _: &AbortSignal) -> GenerationOutcome<ShortVersion> {
        Self::unavailable()
    }
}

/// The plan as seen by a single lesson of its skeleton: lesson title, goals
/// and duration, with the lesson focus appended to the topic.
pub fn lesson_context(plan: &Plan, index: usize) -> Option<Plan> {
    let lesson = plan.sequence_skeleton.as_ref()?.lessons.get(index)?;
    let topic = if plan.topic_description.trim().is_empty() {
        plan.subject.as_str()
    } else {
        plan.topic_description.as_str()
    };

    Some(Plan {
        title: lesson.title.clone(),
        topic_description: format!("{topic} — Lektion {}: {}", index + 1, lesson.focus),
        duration_minutes: lesson.duration_minutes,
        goals: lesson.goals.clone(),
        sequence_skeleton: None,
        ..plan.clone()
    })
}

/// Fills ids, numbers and durations that a service response left empty.
pub fn normalize_skeleton(skeleton: &mut SequenceSkeleton, plan: &Plan) {
    for (lesson, number) in skeleton.lessons.iter_mut().zip(1u32..) {
        if lesson.lesson_number == 0 {
            lesson.lesson_number = number;
        }
        if lesson.id.trim().is_empty() {
            lesson.id = format!("l-{}", lesson.lesson_number);
        }
        if lesson.duration_minutes == 0 {
            lesson.duration_minutes = plan.duration_minutes;
        }
    }
}

/// Short version derived from a skeleton, one summary entry per lesson.
pub fn short_version_from_skeleton(plan: &Plan, skeleton: &SequenceSkeleton) -> ShortVersion {
    let title = if plan.title.trim().is_empty() {
        plan.subject.clone()
    } else {
        plan.title.clone()
    };

    ShortVersion {
        title,
        overview: skeleton.progression.clone(),
        goals: skeleton.overall_goals.clone(),
        phases_summary: skeleton
            .lessons
            .iter()
            .map(|lesson| PhaseSummary {
                name: format!("Lektion {}: {}", lesson.lesson_number, lesson.title),
                duration_minutes: lesson.duration_minutes,
                description: lesson.focus.clone(),
            })
            .collect(),
        differentiation_summary: Differentiation {
            niveau_a: "Scaffolding und Hilfsstrukturen für alle Lektionen.".to_string(),
            niveau_b: "Standardausführung gemäss Sequenzplanung.".to_string(),
            niveau_c: "Erweiterte Aufgaben und Vertiefung.".to_string(),
            ..Default::default()
        },
        language_supports: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlanMode, SequenceLesson};

    fn sequence_plan() -> Plan {
        let mut plan = Plan {
            mode: PlanMode::Sequence,
            subject: "Geschichte".to_string(),
            lesson_count: 3,
            ..Default::default()
        };
        plan.sequence_skeleton = Some(fallback::sequence_skeleton(&plan));
        plan
    }

    #[tokio::test]
    async fn test_offline_generator_always_fails() {
        let plan = sequence_plan();
        let outcome = OfflineGenerator
            .short_version(&ShortPrompt::new(&plan), &AbortSignal::never())
            .await;
        assert!(matches!(
            outcome,
            GenerationOutcome::Failed(GenerationError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_outcome_map() {
        let outcome: GenerationOutcome<u32> = GenerationOutcome::Generated(2);
        assert!(matches!(outcome.map(|v| v * 2), GenerationOutcome::Generated(4)));
        let cancelled: GenerationOutcome<u32> = GenerationOutcome::Cancelled;
        assert!(matches!(cancelled.map(|v| v + 1), GenerationOutcome::Cancelled));
    }

    #[test]
    fn test_lesson_context() {
        let plan = sequence_plan();
        let context = lesson_context(&plan, 1).unwrap();
        assert_eq!(context.title, "Lektion 2: Grundlagen: Geschichte erarbeiten");
        assert!(context.topic_description.starts_with("Geschichte — Lektion 2: "));
        assert!(context.sequence_skeleton.is_none());
        assert!(lesson_context(&plan, 9).is_none());
        assert!(lesson_context(&Plan::default(), 0).is_none());
    }

    #[test]
    fn test_normalize_skeleton_fills_missing_fields() {
        let plan = sequence_plan();
        let mut skeleton = SequenceSkeleton {
            lessons: vec![SequenceLesson::default(), SequenceLesson::default()],
            ..Default::default()
        };
        normalize_skeleton(&mut skeleton, &plan);
        assert_eq!(skeleton.lessons[1].id, "l-2");
        assert_eq!(skeleton.lessons[1].lesson_number, 2);
        assert_eq!(skeleton.lessons[0].duration_minutes, 45);
    }

    #[test]
    fn test_short_version_from_skeleton() {
        let plan = sequence_plan();
        let skeleton = plan.sequence_skeleton.clone().unwrap();
        let short = short_version_from_skeleton(&plan, &skeleton);

        assert_eq!(short.title, "Geschichte");
        assert_eq!(short.overview, skeleton.progression);
        assert_eq!(short.phases_summary.len(), 3);
        assert!(short.phases_summary[0].name.starts_with("Lektion 1: "));
        assert_eq!(short.total_minutes(), 135);
    }
}

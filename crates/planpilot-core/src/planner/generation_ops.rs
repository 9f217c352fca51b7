//! Generation commands: each asks the content generator first and falls
//! back to the deterministic generators when the service fails.

use log::{info, warn};

use super::{GenerationReport, Planner};
use crate::{
    differentiation::supplement_language_support,
    error::{PilotError, Result},
    generation::{
        fallback, lesson_context, normalize_skeleton, short_version_from_skeleton, AbortSignal,
        DetailPrompt, GenerationError, GenerationOutcome, Prompt, RevisePrompt, SequencePrompt,
        ShortPrompt, DEFAULT_REVISION_INSTRUCTION,
    },
    models::{Plan, PlanMode},
    session::Session,
    workflow,
};

/// Fails with the first incomplete step among `1..=last`.
fn require_steps(plan: &Plan, last: u8) -> Result<()> {
    for step in 1..=last {
        let validation = workflow::validate_step(step, plan);
        if !validation.is_valid() {
            return Err(PilotError::StepIncomplete {
                step,
                reasons: validation.errors,
            });
        }
    }
    Ok(())
}

fn require_gate_b(plan: &Plan) -> Result<()> {
    if plan.gate_b_approved {
        Ok(())
    } else {
        Err(PilotError::StepLocked { step: 8 })
    }
}

fn require_mode(plan: &Plan, mode: PlanMode, reason: &str) -> Result<()> {
    if plan.mode == mode {
        Ok(())
    } else {
        Err(PilotError::invalid_input("mode").with_reason(reason))
    }
}

/// First sentence of a fallback notice.
fn service_notice(error: &GenerationError) -> &'static str {
    match error {
        GenerationError::NotConfigured(_) => "Keine KI verbunden (Offline-Modus).",
        _ => error.user_message(),
    }
}

fn cancelled(what: &str) -> GenerationReport {
    info!("Generation of {what} cancelled, plan unchanged");
    GenerationReport::Cancelled
}

impl Planner {
    /// Generates the short version (single mode) or the sequence skeleton
    /// with its derived short version (sequence mode).
    ///
    /// Steps 1 to 3 must be complete.
    pub async fn generate(
        &self,
        session: &mut Session,
        signal: &AbortSignal,
    ) -> Result<GenerationReport> {
        let plan = session.plan().clone();
        require_steps(&plan, 3)?;

        match plan.mode {
            PlanMode::Single => {
                let prompt = ShortPrompt::new(&plan);
                prompt.validate()?;

                match self.generator.short_version(&prompt, signal).await {
                    GenerationOutcome::Generated(short_version) => {
                        info!("Short version generated by {}", self.generator.name());
                        session.set_short_version(short_version);
                        Ok(GenerationReport::Generated)
                    }
                    GenerationOutcome::Failed(e) => {
                        warn!("Short version generation failed, using fallback: {e}");
                        session.set_short_version(fallback::short_version(&plan));
                        Ok(GenerationReport::FellBack {
                            notice: format!(
                                "Hinweis: {} Plan wurde mit verbesserter Vorlage erstellt.",
                                service_notice(&e)
                            ),
                        })
                    }
                    GenerationOutcome::Cancelled => Ok(cancelled("short version")),
                }
            }
            PlanMode::Sequence => {
                let prompt = SequencePrompt::new(&plan);
                prompt.validate()?;

                match self.generator.sequence_skeleton(&prompt, signal).await {
                    GenerationOutcome::Generated(mut skeleton) => {
                        info!(
                            "Sequence skeleton with {} lessons generated by {}",
                            skeleton.lessons.len(),
                            self.generator.name()
                        );
                        normalize_skeleton(&mut skeleton, &plan);
                        let short_version = short_version_from_skeleton(&plan, &skeleton);
                        session.set_sequence_content(skeleton, short_version);
                        Ok(GenerationReport::Generated)
                    }
                    GenerationOutcome::Failed(e) => {
                        warn!("Sequence generation failed, using fallback: {e}");
                        session.set_sequence_content(
                            fallback::sequence_skeleton(&plan),
                            fallback::short_version(&plan),
                        );
                        Ok(GenerationReport::FellBack {
                            notice: format!(
                                "Hinweis: {} Plan wurde mit verbesserter Vorlage erstellt.",
                                service_notice(&e)
                            ),
                        })
                    }
                    GenerationOutcome::Cancelled => Ok(cancelled("sequence skeleton")),
                }
            }
        }
    }

    /// Proposes learning goals for the plan. A generated short version is
    /// kept as well.
    pub async fn suggest_goals(
        &self,
        session: &mut Session,
        signal: &AbortSignal,
    ) -> Result<GenerationReport> {
        let plan = session.plan().clone();
        require_steps(&plan, 1)?;
        let prompt = ShortPrompt::new(&plan);
        prompt.validate()?;

        match self.generator.short_version(&prompt, signal).await {
            GenerationOutcome::Generated(short_version) => {
                let goals = short_version.goals.clone();
                session.set_short_version(short_version);
                session.set_goals(goals);
                Ok(GenerationReport::Generated)
            }
            GenerationOutcome::Failed(e) => {
                warn!("Goal generation failed, using fallback: {e}");
                session.set_goals(fallback::learning_goals(&plan));
                Ok(GenerationReport::FellBack {
                    notice: format!(
                        "Hinweis: {} Lernziele wurden aus der Vorlage abgeleitet.",
                        service_notice(&e)
                    ),
                })
            }
            GenerationOutcome::Cancelled => Ok(cancelled("learning goals")),
        }
    }

    /// Sends the teacher's edited short version to the service for a
    /// polished revision and adopts the result as the new short version.
    ///
    /// When the service fails the edited copy is adopted unchanged.
    pub async fn revise(
        &self,
        session: &mut Session,
        instruction: Option<&str>,
        signal: &AbortSignal,
    ) -> Result<GenerationReport> {
        let plan = session.plan().clone();
        let Some(generated) = plan.short_version.clone() else {
            return Err(PilotError::StepLocked { step: 6 });
        };
        let edited = session.edited_short_version().cloned().unwrap_or(generated);
        let prompt = RevisePrompt::new(
            &plan,
            edited.clone(),
            instruction.unwrap_or(DEFAULT_REVISION_INSTRUCTION),
        );
        prompt.validate()?;

        match self.generator.revise(&prompt, signal).await {
            GenerationOutcome::Generated(revised) => {
                info!("Short version revised by {}", self.generator.name());
                session.mark_revised(revised);
                Ok(GenerationReport::Generated)
            }
            GenerationOutcome::Failed(e) => {
                warn!("Revision failed, adopting the edited version: {e}");
                session.mark_revised(fallback::revise_short_version(&edited));
                Ok(GenerationReport::FellBack {
                    notice: format!(
                        "Fehler bei der Überarbeitung ({}). Deine Änderungen wurden ohne \
                         KI-Überarbeitung übernommen.",
                        service_notice(&e).trim_end_matches('.')
                    ),
                })
            }
            GenerationOutcome::Cancelled => Ok(cancelled("revision")),
        }
    }

    /// Asks the service to rework the edited copy of the short version
    /// along `instruction`. Only the edited copy changes; on failure nothing
    /// changes.
    pub async fn revise_edited(
        &self,
        session: &mut Session,
        instruction: &str,
        signal: &AbortSignal,
    ) -> Result<GenerationReport> {
        let plan = session.plan().clone();
        let Some(generated) = plan.short_version.clone() else {
            return Err(PilotError::StepLocked { step: 5 });
        };
        let edited = session.edited_short_version().cloned().unwrap_or(generated);
        let prompt = RevisePrompt::new(&plan, edited, instruction);
        prompt.validate()?;

        match self.generator.revise(&prompt, signal).await {
            GenerationOutcome::Generated(revised) => {
                session.set_edited_short_version(revised);
                Ok(GenerationReport::Generated)
            }
            GenerationOutcome::Failed(e) => {
                warn!("Edit request failed: {e}");
                Ok(GenerationReport::Unchanged {
                    notice: format!(
                        "Entschuldigung, da ist etwas schiefgelaufen. {}",
                        service_notice(&e)
                    ),
                })
            }
            GenerationOutcome::Cancelled => Ok(cancelled("edit request")),
        }
    }

    /// Generates the detail plan of a single lesson. Gate B must be approved.
    pub async fn generate_detail(
        &self,
        session: &mut Session,
        signal: &AbortSignal,
    ) -> Result<GenerationReport> {
        let plan = session.plan().clone();
        require_mode(
            &plan,
            PlanMode::Single,
            "Im Sequenzmodus wird die Detailplanung pro Lektion erstellt.",
        )?;
        require_gate_b(&plan)?;
        let prompt = DetailPrompt::new(&plan);
        prompt.validate()?;

        match self.generator.detail_plan(&prompt, signal).await {
            GenerationOutcome::Generated(mut detail) => {
                info!(
                    "Detail plan with {} phases generated by {}",
                    detail.phases.len(),
                    self.generator.name()
                );
                supplement_language_support(&mut detail.phases, &plan);
                session.set_detail_plan(detail);
                Ok(GenerationReport::Generated)
            }
            GenerationOutcome::Failed(e) => {
                warn!("Detail generation failed, using fallback: {e}");
                session.set_detail_plan(fallback::detail_plan(&plan));
                Ok(GenerationReport::FellBack {
                    notice: format!(
                        "{} Ein strukturierter Plan wurde trotzdem erstellt (Fallback-Logik).",
                        service_notice(&e)
                    ),
                })
            }
            GenerationOutcome::Cancelled => Ok(cancelled("detail plan")),
        }
    }

    /// Generates the detail plan of lesson `index` (zero based) of the
    /// sequence. Gate B must be approved.
    pub async fn generate_lesson_detail(
        &self,
        session: &mut Session,
        index: usize,
        signal: &AbortSignal,
    ) -> Result<GenerationReport> {
        let plan = session.plan().clone();
        require_mode(
            &plan,
            PlanMode::Sequence,
            "Lektionsplanung gibt es nur im Sequenzmodus.",
        )?;
        require_gate_b(&plan)?;
        let context = lesson_context(&plan, index).ok_or_else(|| {
            PilotError::invalid_input("lesson")
                .with_reason(format!("Lektion {} existiert nicht.", index + 1))
        })?;
        let prompt = DetailPrompt::new(&context);
        prompt.validate()?;

        match self.generator.detail_plan(&prompt, signal).await {
            GenerationOutcome::Generated(mut detail) => {
                info!("Lesson {} planned by {}", index + 1, self.generator.name());
                supplement_language_support(&mut detail.phases, &context);
                session.set_lesson_detail(index, detail)?;
                Ok(GenerationReport::Generated)
            }
            GenerationOutcome::Failed(e) => {
                warn!("Lesson {} generation failed, using fallback: {e}", index + 1);
                let detail = fallback::lesson_detail(&plan, index).ok_or_else(|| {
                    PilotError::invalid_input("lesson")
                        .with_reason(format!("Lektion {} existiert nicht.", index + 1))
                })?;
                session.set_lesson_detail(index, detail)?;
                Ok(GenerationReport::FellBack {
                    notice: format!(
                        "{} Lektion {} wurde mit der Vorlage geplant.",
                        service_notice(&e),
                        index + 1
                    ),
                })
            }
            GenerationOutcome::Cancelled => Ok(cancelled("lesson detail")),
        }
    }

    /// Plans every lesson that has no detail plan yet, in order. Stops at
    /// the first cancellation.
    pub async fn generate_all_lesson_details(
        &self,
        session: &mut Session,
        signal: &AbortSignal,
    ) -> Result<Vec<(usize, GenerationReport)>> {
        let pending: Vec<usize> = session
            .plan()
            .sequence_skeleton
            .as_ref()
            .map(|skeleton| {
                skeleton
                    .lessons
                    .iter()
                    .enumerate()
                    .filter(|(_, lesson)| lesson.detail_plan.is_none())
                    .map(|(index, _)| index)
                    .collect()
            })
            .unwrap_or_default();

        let mut reports = Vec::with_capacity(pending.len());
        for index in pending {
            let report = self.generate_lesson_detail(session, index, signal).await?;
            let stop = report.is_cancelled();
            reports.push((index, report));
            if stop {
                break;
            }
        }
        Ok(reports)
    }

    /// Applies a free-text refinement (kürzen, Gruppenarbeit, Quiz, digital,
    /// Differenzierung) to the detail plan, or to the detail plan of
    /// `lesson` in sequence mode.
    pub fn refine_detail(
        &self,
        session: &mut Session,
        instruction: &str,
        lesson: Option<usize>,
    ) -> Result<()> {
        if instruction.trim().is_empty() {
            return Err(PilotError::invalid_input("instruction")
                .with_reason("Bitte beschreibe die gewünschte Anpassung."));
        }
        let missing = || {
            PilotError::invalid_input("detail")
                .with_reason("Bitte erstelle zuerst eine Detailplanung.")
        };

        match lesson {
            None => {
                let current = session.plan().detail_plan.as_ref().ok_or_else(missing)?;
                let refined = fallback::refine_detail_plan(current, instruction);
                session.set_detail_plan(refined);
            }
            Some(index) => {
                let current = session
                    .plan()
                    .sequence_skeleton
                    .as_ref()
                    .and_then(|s| s.lessons.get(index))
                    .and_then(|l| l.detail_plan.as_ref())
                    .ok_or_else(missing)?;
                let refined = fallback::refine_detail_plan(current, instruction);
                session.set_lesson_detail(index, refined)?;
            }
        }
        info!("Detail plan refined: {instruction}");
        Ok(())
    }
}

//! Command handlers.
//!
//! Every invocation loads the stored draft, applies one command and saves
//! the draft again when the session changed.

use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;
use planpilot_core::{
    compatibility::check_didactic_compatibility,
    display::{
        Competencies, LessonReports, OperationStatus, SessionStatus, StepOverview, Suggestions,
        UpdateResult, ValidationErrors,
    },
    generation::AbortSignal,
    models::{LearningMode, PlanMode, QualityLayer, ShortVersion, StructureModel},
    store::DraftSnapshot,
    workflow::step_config,
    GenerationReport, Planner, Session, StepTransition,
};

use crate::{
    args::{
        Commands, ContextArgs, CurriculumCommands, DetailArgs, DidacticsArgs, EditArgs,
        ExportArgs, GateArg, GoalCommands, RefineArgs, ResetArgs, StatusArgs,
    },
    renderer::TerminalRenderer,
};

pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
    signal: AbortSignal,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer, signal: AbortSignal) -> Self {
        Self {
            planner,
            renderer,
            signal,
        }
    }

    /// Runs one command against the stored draft.
    pub async fn run(&self, command: Option<Commands>) -> Result<()> {
        let mut session = self
            .planner
            .load_session()
            .await
            .context("Failed to load draft")?;
        let before = session.clone();

        let outcome = self.dispatch(&mut session, command).await;

        // Changes made before a failure are kept as well.
        if session != before {
            self.planner
                .save_session(&session)
                .await
                .context("Failed to save draft")?;
        }
        outcome
    }

    async fn dispatch(&self, session: &mut Session, command: Option<Commands>) -> Result<()> {
        use Commands::*;

        match command {
            None => self.status(session, StatusArgs::default()).await,
            Some(Status(args)) => self.status(session, args).await,
            Some(Steps) => self.render(StepOverview::new(session.plan(), session.current_step())),
            Some(Goto { step }) => self.goto(session, step),
            Some(Next) => self.next(session),
            Some(Prev) => {
                if session.prev_step() {
                    self.moved_to(session)
                } else {
                    self.status_line(OperationStatus::notice("Du bist bereits bei Schritt 1."))
                }
            }
            Some(Context(args)) => self.context(session, args),
            Some(Goal { command }) => self.goal(session, command).await,
            Some(Didactics(args)) => self.didactics(session, args),
            Some(Curriculum { command }) => self.curriculum(session, command).await,
            Some(Generate) => self.generate(session).await,
            Some(Edit(args)) => self.edit(session, args).await,
            Some(Approve { gate }) => self.approve(session, gate),
            Some(ResetGates) => {
                session.reset_gates();
                self.status_line(OperationStatus::success("Freigaben zurückgesetzt."))
            }
            Some(Revise(args)) => {
                let report = self
                    .planner
                    .revise(session, args.instruction.as_deref(), &self.signal)
                    .await?;
                self.report(&report)?;
                self.show_short_version(session.plan().short_version.as_ref())
            }
            Some(Detail(args)) => self.detail(session, args).await,
            Some(Refine(args)) => self.refine(session, args),
            Some(Check) => self.render(self.planner.quality_report(session)),
            Some(Export(args)) => self.export(session, args).await,
            Some(Undo) => {
                if session.undo() {
                    self.status_line(OperationStatus::success("Änderung rückgängig gemacht."))
                } else {
                    self.status_line(OperationStatus::failure("Nichts zum Rückgängigmachen."))
                }
            }
            Some(Redo) => {
                if session.redo() {
                    self.status_line(OperationStatus::success("Änderung wiederhergestellt."))
                } else {
                    self.status_line(OperationStatus::failure("Nichts zum Wiederherstellen."))
                }
            }
            Some(Reset(args)) => self.reset(session, args).await,
        }
    }

    fn render(&self, value: impl std::fmt::Display) -> Result<()> {
        self.renderer.render(&value.to_string())
    }

    fn status_line(&self, status: OperationStatus) -> Result<()> {
        self.renderer.status(&status)
    }

    fn report(&self, report: &GenerationReport) -> Result<()> {
        let status = match report {
            GenerationReport::Generated => OperationStatus::success(report.to_string().trim()),
            GenerationReport::FellBack { .. } | GenerationReport::Cancelled => {
                OperationStatus::notice(report.to_string().trim())
            }
            GenerationReport::Unchanged { .. } => OperationStatus::failure(report.to_string().trim()),
        };
        self.status_line(status)
    }

    fn show_short_version(&self, short_version: Option<&ShortVersion>) -> Result<()> {
        match short_version {
            Some(short_version) => self.render(short_version),
            None => Ok(()),
        }
    }

    // --- navigation ---

    async fn status(&self, session: &Session, args: StatusArgs) -> Result<()> {
        if args.json {
            let snapshot = DraftSnapshot::of(session);
            println!(
                "{}",
                serde_json::to_string_pretty(&snapshot).context("Failed to serialize draft")?
            );
            return Ok(());
        }

        let saved_at = self.planner.draft_saved_at().await?;
        self.render(
            SessionStatus::new(session, self.planner.generator_name()).with_saved_at(saved_at),
        )?;

        if args.full {
            let plan = session.plan();
            self.show_short_version(plan.short_version.as_ref())?;
            if session.has_unrevised_edits() {
                self.renderer.render("\n# Arbeitskopie\n\n")?;
                self.show_short_version(session.edited_short_version())?;
            }
            if let Some(skeleton) = &plan.sequence_skeleton {
                self.render(skeleton)?;
            }
            if let Some(detail) = &plan.detail_plan {
                self.render(detail)?;
            }
        }
        Ok(())
    }

    fn moved_to(&self, session: &Session) -> Result<()> {
        let step = session.current_step();
        let title = step_config(session.plan().mode, step).map_or("", |config| config.title);
        self.status_line(OperationStatus::success(format!("Schritt {step}: {title}")))
    }

    fn goto(&self, session: &mut Session, step: u8) -> Result<()> {
        if session.set_step(step) {
            self.moved_to(session)
        } else {
            self.status_line(OperationStatus::failure(format!(
                "Schritt {step} ist noch gesperrt."
            )))
        }
    }

    fn next(&self, session: &mut Session) -> Result<()> {
        match session.next_step() {
            StepTransition::Moved(_) => self.moved_to(session),
            StepTransition::Blocked(errors) => {
                self.render(ValidationErrors(&errors))?;
                self.status_line(OperationStatus::failure(format!(
                    "Schritt {} ist noch nicht vollständig.",
                    session.current_step()
                )))
            }
            StepTransition::Unchanged => self.status_line(OperationStatus::notice(
                "Der nächste Schritt ist noch gesperrt.",
            )),
        }
    }

    // --- steps 1 to 3 ---

    fn context(&self, session: &mut Session, args: ContextArgs) -> Result<()> {
        let changes = args.changes();
        if changes.is_empty() {
            return self.render(session.plan());
        }
        session.update_context(args.into());
        info!("Updated context: {}", changes.join(", "));
        self.render(UpdateResult::with_changes(session.plan(), changes))
    }

    async fn goal(&self, session: &mut Session, command: GoalCommands) -> Result<()> {
        match command {
            GoalCommands::Add { text } => {
                // The form starts with one blank goal; fill it before appending.
                let blank = session.plan().goals.iter().position(|g| g.trim().is_empty());
                match blank {
                    Some(index) => session.update_goal(index, text)?,
                    None => session.add_goal(text),
                }
                self.status_line(OperationStatus::success("Lernziel hinzugefügt."))?;
            }
            GoalCommands::Set { position, text } => {
                session.update_goal(index_of(position)?, text)?;
                self.status_line(OperationStatus::success(format!(
                    "Lernziel {position} geändert."
                )))?;
            }
            GoalCommands::Remove { position } => {
                if !session.remove_goal(index_of(position)?)? {
                    return self.status_line(OperationStatus::failure(
                        "Das letzte Lernziel kann nicht entfernt werden.",
                    ));
                }
                self.status_line(OperationStatus::success(format!(
                    "Lernziel {position} entfernt."
                )))?;
            }
            GoalCommands::List => {}
            GoalCommands::Suggest => {
                let report = self.planner.suggest_goals(session, &self.signal).await?;
                self.report(&report)?;
            }
        }
        self.render(goal_list(session))
    }

    fn didactics(&self, session: &mut Session, args: DidacticsArgs) -> Result<()> {
        if !args.is_empty() {
            if let Some(choice) = args.structure {
                session.set_slot1(choice.0);
            }
            if let Some(choice) = args.learning_mode {
                session.set_slot2(choice.0);
            }
            if let Some(choice) = args.quality_layer {
                session.set_slot3(choice.0);
            }
            self.status_line(OperationStatus::success("Didaktik aktualisiert."))?;
        }

        self.render(slot_menu(session))?;
        let compatibility = check_didactic_compatibility(&session.plan().didactic_slots);
        for warning in &compatibility.warnings {
            self.render(warning)?;
        }
        Ok(())
    }

    async fn curriculum(&self, session: &mut Session, command: CurriculumCommands) -> Result<()> {
        match command {
            CurriculumCommands::Search { query, area, cycle } => self.render(Competencies(
                self.planner
                    .search_competencies(&query, area.as_deref(), cycle.as_deref()),
            )),
            CurriculumCommands::Suggest { add } => {
                let suggestions = self.planner.suggest_competencies(session);
                if add && !suggestions.is_empty() {
                    let added = session.add_curriculum_mappings(
                        suggestions.iter().map(|s| s.to_mapping()).collect(),
                    );
                    self.status_line(OperationStatus::success(format!(
                        "{added} Kompetenzen zugeordnet."
                    )))?;
                }
                self.render(Suggestions(suggestions))
            }
            CurriculumCommands::Add { competency } => {
                if self.planner.add_competency(session, &competency)? {
                    self.status_line(OperationStatus::success(format!(
                        "{competency} zugeordnet."
                    )))
                } else {
                    self.status_line(OperationStatus::notice(format!(
                        "{competency} ist bereits zugeordnet."
                    )))
                }
            }
            CurriculumCommands::Remove { competency } => {
                let id = mapped_id(session, &competency)?;
                session.remove_curriculum_mapping(&id);
                self.status_line(OperationStatus::success(format!("{competency} entfernt.")))
            }
            CurriculumCommands::Confirm { competency } => {
                let id = mapped_id(session, &competency)?;
                session.confirm_mapping(&id);
                self.status_line(OperationStatus::success(format!(
                    "{competency} bestätigt."
                )))
            }
            CurriculumCommands::List => {
                let mappings = &session.plan().curriculum_mappings;
                if mappings.is_empty() {
                    return self.renderer.render("Noch keine Kompetenzen zugeordnet.\n");
                }
                for mapping in mappings {
                    self.render(mapping)?;
                }
                Ok(())
            }
            CurriculumCommands::Upload { path } => {
                let summary = self
                    .planner
                    .import_curriculum(session, &path)
                    .await
                    .with_context(|| format!("Failed to import {}", path.display()))?;
                self.status_line(OperationStatus::success(summary.to_string().trim()))?;
                self.render(Competencies(summary.competencies))
            }
        }
    }

    // --- steps 4 to 7 ---

    async fn generate(&self, session: &mut Session) -> Result<()> {
        let report = self.planner.generate(session, &self.signal).await?;
        self.report(&report)?;
        if report.is_cancelled() {
            return Ok(());
        }
        let plan = session.plan();
        if let Some(skeleton) = &plan.sequence_skeleton {
            if plan.mode == PlanMode::Sequence {
                self.render(skeleton)?;
            }
        }
        self.show_short_version(plan.short_version.as_ref())
    }

    async fn edit(&self, session: &mut Session, args: EditArgs) -> Result<()> {
        let Some(mut edited) = session.edited_short_version().cloned() else {
            bail!("Bitte generiere zuerst eine Kurzversion.");
        };
        if args.is_empty() {
            return self.show_short_version(Some(&edited));
        }

        if let Some(instruction) = &args.ask {
            let report = self
                .planner
                .revise_edited(session, instruction, &self.signal)
                .await?;
            self.report(&report)?;
            return self.show_short_version(session.edited_short_version());
        }

        if let Some(path) = &args.from_file {
            edited = read_short_version(path)?;
        }
        if let Some(title) = args.title {
            edited.title = title;
        }
        if let Some(overview) = args.overview {
            edited.overview = overview;
        }
        if let Some(position) = args.phase {
            let count = edited.phases_summary.len();
            let phase = edited
                .phases_summary
                .get_mut(index_of(position)?)
                .with_context(|| format!("Phase {position} existiert nicht ({count} Phasen)."))?;
            if let Some(name) = args.name {
                phase.name = name;
            }
            if let Some(minutes) = args.minutes {
                phase.duration_minutes = minutes;
            }
            if let Some(description) = args.description {
                phase.description = description;
            }
        }

        session.set_edited_short_version(edited);
        self.status_line(OperationStatus::success("Kurzversion bearbeitet."))?;
        self.show_short_version(session.edited_short_version())
    }

    fn approve(&self, session: &mut Session, gate: GateArg) -> Result<()> {
        match gate {
            GateArg::A => session.approve_gate_a()?,
            GateArg::B => session.approve_gate_b()?,
        }
        let label = match gate {
            GateArg::A => "A",
            GateArg::B => "B",
        };
        self.status_line(OperationStatus::success(format!("Gate {label} bestätigt.")))
    }

    // --- steps 8 and 9 ---

    async fn detail(&self, session: &mut Session, args: DetailArgs) -> Result<()> {
        if session.plan().mode == PlanMode::Single {
            if args.lesson.is_some() || args.all {
                bail!("--lesson und --all gelten nur für Sequenzen.");
            }
            let report = self.planner.generate_detail(session, &self.signal).await?;
            self.report(&report)?;
            if let Some(detail) = &session.plan().detail_plan {
                self.render(detail)?;
            }
            return Ok(());
        }

        match args.lesson {
            Some(position) => {
                let index = index_of(position)?;
                let report = self
                    .planner
                    .generate_lesson_detail(session, index, &self.signal)
                    .await?;
                self.report(&report)?;
                if let Some(detail) = lesson_detail(session, index) {
                    self.render(detail)?;
                }
                Ok(())
            }
            None => {
                let reports = self
                    .planner
                    .generate_all_lesson_details(session, &self.signal)
                    .await?;
                self.render(LessonReports(&reports))
            }
        }
    }

    fn refine(&self, session: &mut Session, args: RefineArgs) -> Result<()> {
        let lesson = args.lesson.map(index_of).transpose()?;
        self.planner
            .refine_detail(session, &args.instruction, lesson)?;
        self.status_line(OperationStatus::success("Detailplanung angepasst."))?;

        let detail = match lesson {
            Some(index) => lesson_detail(session, index),
            None => session.plan().detail_plan.as_ref(),
        };
        match detail {
            Some(detail) => self.render(detail),
            None => Ok(()),
        }
    }

    async fn export(&self, session: &mut Session, args: ExportArgs) -> Result<()> {
        let result = self
            .planner
            .export(session, args.format, args.output.as_deref())
            .await
            .context("Failed to export plan")?;

        match &result.path {
            Some(_) => self.status_line(OperationStatus::success(result.to_string().trim())),
            None => {
                print!("{}", result.content);
                Ok(())
            }
        }
    }

    async fn reset(&self, session: &mut Session, args: ResetArgs) -> Result<()> {
        if !args.confirm {
            return self.status_line(OperationStatus::failure(
                "Der Entwurf wird verworfen. Zum Bestätigen --confirm angeben.",
            ));
        }
        *session = self
            .planner
            .reset_session()
            .await
            .context("Failed to reset draft")?;
        self.status_line(OperationStatus::success("Neue Planung begonnen."))
    }
}

/// Converts a 1-based position from the command line.
fn index_of(position: usize) -> Result<usize> {
    match position.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("Positionen beginnen bei 1."),
    }
}

/// Resolves a mapped competency by id or code.
fn mapped_id(session: &Session, key: &str) -> Result<String> {
    session
        .plan()
        .curriculum_mappings
        .iter()
        .find(|m| m.competency_id == key || m.competency_code.eq_ignore_ascii_case(key))
        .map(|m| m.competency_id.clone())
        .with_context(|| format!("{key} ist nicht zugeordnet."))
}

fn lesson_detail(session: &Session, index: usize) -> Option<&planpilot_core::models::DetailPlan> {
    session
        .plan()
        .sequence_skeleton
        .as_ref()
        .and_then(|skeleton| skeleton.lessons.get(index))
        .and_then(|lesson| lesson.detail_plan.as_ref())
}

fn read_short_version(path: &Path) -> Result<ShortVersion> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid short version in {}", path.display()))
}

fn goal_list(session: &Session) -> String {
    let plan = session.plan();
    if plan.filled_goals().is_empty() {
        return "Noch keine Lernziele.\n".to_string();
    }
    let mut out = String::from("## Lernziele\n\n");
    for (number, goal) in plan.goals.iter().enumerate() {
        let goal = if goal.trim().is_empty() { "_(leer)_" } else { goal.as_str() };
        out.push_str(&format!("{}. {goal}\n", number + 1));
    }
    out
}

fn slot_menu(session: &Session) -> String {
    let slots = &session.plan().didactic_slots;
    let mut out = String::new();

    let mut section = |title: &str, options: Vec<(&str, &str, &str, bool)>| {
        out.push_str(&format!("## {title}\n\n"));
        for (value, label, description, selected) in options {
            let marker = if selected { "●" } else { "○" };
            out.push_str(&format!("{marker} `{value}` **{label}**: {description}\n"));
        }
        out.push('\n');
    };

    section(
        "Slot 1: Strukturmodell",
        StructureModel::ALL
            .iter()
            .map(|s| (s.as_str(), s.label(), s.description(), slots.slot1 == Some(*s)))
            .collect(),
    );
    section(
        "Slot 2: Lernmodus",
        LearningMode::ALL
            .iter()
            .map(|s| (s.as_str(), s.label(), s.description(), slots.slot2 == Some(*s)))
            .collect(),
    );
    section(
        "Slot 3: Qualitätslayer",
        QualityLayer::ALL
            .iter()
            .map(|s| (s.as_str(), s.label(), s.description(), slots.slot3 == Some(*s)))
            .collect(),
    );
    out
}

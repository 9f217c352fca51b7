//! Display implementations for domain models.
//!
//! All output is markdown for the terminal renderer.

use std::fmt;

use crate::models::{
    Competency, CurriculumMapping, DetailPlan, Phase, Plan, PlanMode, QualityWarning,
    SequenceSkeleton, Severity, ShortVersion,
};

/// Escapes characters that would break a markdown table cell.
pub(crate) fn table_cell(text: &str) -> String {
    text.trim().replace('|', "/").replace('\n', " ")
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = if self.display_title().trim().is_empty() {
            "Neue Planung"
        } else {
            self.display_title()
        };
        writeln!(f, "# {title}")?;
        writeln!(f)?;

        writeln!(f, "- **Modus**: {}", self.mode)?;
        if !self.subject.trim().is_empty() {
            writeln!(f, "- **Fach**: {}", self.subject)?;
        }
        if !self.topic_description.trim().is_empty() {
            writeln!(f, "- **Thema**: {}", self.topic_description)?;
        }
        if let Some(level) = self.level {
            writeln!(f, "- **Stufe**: {level}")?;
        }
        match self.mode {
            PlanMode::Single => writeln!(f, "- **Dauer**: {} Min", self.duration_minutes)?,
            PlanMode::Sequence => writeln!(
                f,
                "- **Dauer**: {} Lektionen à {} Min",
                self.lesson_count, self.duration_minutes
            )?,
        }
        let profile = &self.class_profile;
        writeln!(
            f,
            "- **Klasse**: {} SuS, Heterogenität {}, Sprachstand {}",
            profile.class_size, profile.heterogeneity, profile.language_level
        )?;
        if let Some(goal_type) = self.learning_goal_type {
            writeln!(f, "- **Lernzieltyp**: {goal_type}")?;
        }
        let slots = &self.didactic_slots;
        let slot_labels: Vec<&str> = [
            slots.slot1.map(|s| s.label()),
            slots.slot2.map(|s| s.label()),
            slots.slot3.map(|s| s.label()),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !slot_labels.is_empty() {
            writeln!(f, "- **Didaktik**: {}", slot_labels.join(" · "))?;
        }
        writeln!(f, "- **Status**: {}", self.status)?;
        writeln!(
            f,
            "- **Gates**: A {} · B {}",
            if self.gate_a_approved { "✓" } else { "–" },
            if self.gate_b_approved { "✓" } else { "–" }
        )?;

        let goals = self.filled_goals();
        if !goals.is_empty() {
            writeln!(f, "\n## Lernziele\n")?;
            for (number, goal) in goals.iter().enumerate() {
                writeln!(f, "{}. {goal}", number + 1)?;
            }
        }

        if !self.curriculum_mappings.is_empty() {
            writeln!(f, "\n## Lehrplan\n")?;
            for mapping in &self.curriculum_mappings {
                write!(f, "{mapping}")?;
            }
        }

        let mut artifacts = Vec::new();
        if self.short_version.is_some() {
            artifacts.push("Kurzversion");
        }
        if let Some(skeleton) = &self.sequence_skeleton {
            artifacts.push("Sequenz-Skelett");
            if skeleton.lessons.iter().any(|l| l.detail_plan.is_some()) {
                artifacts.push("Lektionsplanung");
            }
        }
        if self.detail_plan.is_some() {
            artifacts.push("Detailplanung");
        }
        if !artifacts.is_empty() {
            writeln!(f, "\n**Vorhanden**: {}", artifacts.join(", "))?;
        }

        Ok(())
    }
}

impl fmt::Display for ShortVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.title)?;
        writeln!(f)?;
        if !self.overview.trim().is_empty() {
            writeln!(f, "{}", self.overview.trim())?;
            writeln!(f)?;
        }

        if !self.goals.is_empty() {
            writeln!(f, "### Ziele")?;
            writeln!(f)?;
            for goal in &self.goals {
                writeln!(f, "- {goal}")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "### Phasen ({} Min)", self.total_minutes())?;
        writeln!(f)?;
        writeln!(f, "| # | Phase | Min | Beschreibung |")?;
        writeln!(f, "|---|---|---|---|")?;
        for (number, phase) in self.phases_summary.iter().enumerate() {
            writeln!(
                f,
                "| {} | {} | {} | {} |",
                number + 1,
                table_cell(&phase.name),
                phase.duration_minutes,
                table_cell(&phase.description)
            )?;
        }
        writeln!(f)?;

        let d = &self.differentiation_summary;
        writeln!(f, "### Differenzierung")?;
        writeln!(f)?;
        writeln!(f, "- **A**: {}", d.niveau_a)?;
        writeln!(f, "- **B**: {}", d.niveau_b)?;
        writeln!(f, "- **C**: {}", d.niveau_c)?;

        if let Some(supports) = self.language_supports.as_ref().filter(|s| !s.is_empty()) {
            writeln!(f)?;
            writeln!(f, "**Sprachliche Unterstützung**: {}", supports.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} ({} Min)", self.name, self.duration_minutes)?;
        writeln!(f)?;
        writeln!(f, "{}", self.description.trim())?;
        writeln!(f)?;

        if let Some(social_form) = &self.social_form {
            writeln!(f, "- **Sozialform**: {social_form}")?;
        }
        if let Some(actions) = &self.teacher_actions {
            writeln!(f, "- **Lehrperson**: {actions}")?;
        }
        if let Some(actions) = &self.child_actions {
            writeln!(f, "- **Kinder**: {actions}")?;
        }
        if !self.materials.is_empty() {
            writeln!(f, "- **Material**: {}", self.materials.join(", "))?;
        }
        let d = &self.differentiation;
        writeln!(f, "- **Niveau A**: {}", d.niveau_a)?;
        writeln!(f, "- **Niveau B**: {}", d.niveau_b)?;
        writeln!(f, "- **Niveau C**: {}", d.niveau_c)?;
        if let Some(starters) = &d.sentence_starters {
            writeln!(f, "- **Satzanfänge**: {}", starters.join(" / "))?;
        }
        if let Some(words) = &d.word_list {
            writeln!(f, "- **Wortliste**: {}", words.join(", "))?;
        }
        if let Some(hints) = &d.support_hints {
            writeln!(f, "- **Hinweis**: {hints}")?;
        }
        if let Some(plan_b) = &self.plan_b_alternative {
            writeln!(f, "- **Plan B**: {plan_b}")?;
        }
        if let Some(comment) = &self.didactic_comment {
            writeln!(f, "\n> {comment}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for DetailPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Unterrichtsverlauf ({} Min)", self.total_minutes())?;
        writeln!(f)?;
        for phase in &self.phases {
            write!(f, "{phase}")?;
        }

        if let Some(diagnosis) = &self.didactic_diagnosis {
            writeln!(f, "## Didaktische Diagnose")?;
            writeln!(f)?;
            writeln!(f, "- **Kernkonzept**: {}", diagnosis.core_concept)?;
            writeln!(f, "- **Schwellenkonzept**: {}", diagnosis.threshold_concept)?;
            writeln!(f, "- **Relevanz**: {}", diagnosis.relevance)?;
            for misconception in &diagnosis.misconceptions {
                writeln!(f, "- **Fehlvorstellung**: {misconception}")?;
            }
            writeln!(f)?;
        }

        if !self.reflection_notes.trim().is_empty() {
            writeln!(f, "## Reflexion")?;
            writeln!(f)?;
            writeln!(f, "{}", self.reflection_notes.trim())?;
        }
        Ok(())
    }
}

impl fmt::Display for SequenceSkeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Sequenz ({} Lektionen)", self.lessons.len())?;
        writeln!(f)?;
        if !self.progression.trim().is_empty() {
            writeln!(f, "{}", self.progression.trim())?;
            writeln!(f)?;
        }
        writeln!(f, "| Nr. | Titel | Fokus | Min | Detail |")?;
        writeln!(f, "|---|---|---|---|---|")?;
        for lesson in &self.lessons {
            writeln!(
                f,
                "| {} | {} | {} | {} | {} |",
                lesson.lesson_number,
                table_cell(&lesson.title),
                table_cell(&lesson.focus),
                lesson.duration_minutes,
                if lesson.detail_plan.is_some() { "✓" } else { "–" }
            )?;
        }
        let checks: Vec<String> = self
            .lessons
            .iter()
            .filter_map(|l| {
                l.intermediate_check
                    .as_ref()
                    .map(|check| format!("- Lektion {}: {check}", l.lesson_number))
            })
            .collect();
        if !checks.is_empty() {
            writeln!(f)?;
            writeln!(f, "**Zwischenchecks**")?;
            writeln!(f)?;
            for check in checks {
                writeln!(f, "{check}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for QualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "Fehler",
            Severity::Warning => "Warnung",
            Severity::Info => "Info",
        };
        write!(f, "- **{label}** ({}): {}", self.kind.as_str(), self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " _Tipp: {suggestion}_")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Competency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- **{}** {} / {}", self.code, self.area, self.competency_area)?;
        if let Some(cycle) = &self.cycle {
            write!(f, " ({cycle})")?;
        }
        writeln!(f)?;
        writeln!(f, "  {}", self.competency)?;
        writeln!(f, "  `{}`", self.id)
    }
}

impl fmt::Display for CurriculumMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- {} **{}** {} ({:.0}%){}",
            if self.confirmed { "☑" } else { "☐" },
            self.competency_code,
            self.competency_text,
            self.confidence_score * 100.0,
            if self.confirmed { "" } else { " unbestätigt" }
        )
    }
}

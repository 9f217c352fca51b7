//! Typed prompt contexts, one per kind of generated artifact.
//!
//! Every context is built from a [`Plan`], validated before it is sent and
//! rendered into the German instruction text the generation service expects.

use std::fmt::Write;

use crate::models::{
    plan::LESSON_COUNT_RANGE, ClassProfile, Level, Plan, ShortVersion, StructureModel,
};

use super::GenerationError;

/// Kind of artifact a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Short,
    Detail,
    Sequence,
    Revise,
}

impl GenerationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationKind::Short => "short",
            GenerationKind::Detail => "detail",
            GenerationKind::Sequence => "sequence",
            GenerationKind::Revise => "revise",
        }
    }
}

/// A validated, renderable prompt.
pub trait Prompt {
    const KIND: GenerationKind;

    fn validate(&self) -> Result<(), GenerationError>;

    fn render(&self) -> String;
}

/// Plan facts shared by all prompt kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanContext {
    pub subject: String,
    pub topic: String,
    pub level: Option<Level>,
    pub duration_minutes: u32,
    pub class_profile: ClassProfile,
    pub goals: Vec<String>,
    pub structure: Option<StructureModel>,
    pub special_needs: String,
}

impl From<&Plan> for PlanContext {
    fn from(plan: &Plan) -> Self {
        let topic = if plan.topic_description.trim().is_empty() {
            plan.title.clone()
        } else {
            plan.topic_description.clone()
        };
        Self {
            subject: plan.subject.trim().to_string(),
            topic,
            level: plan.level,
            duration_minutes: plan.duration_minutes,
            class_profile: plan.class_profile.clone(),
            goals: plan.filled_goals().into_iter().map(str::to_string).collect(),
            structure: plan.didactic_slots.slot1,
            special_needs: plan.special_needs.trim().to_string(),
        }
    }
}

impl PlanContext {
    fn validate(&self) -> Result<(), GenerationError> {
        if self.subject.is_empty() {
            return Err(GenerationError::InvalidContext("subject must not be blank".into()));
        }
        if self.duration_minutes == 0 {
            return Err(GenerationError::InvalidContext(
                "duration must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    fn level_label(&self) -> &'static str {
        self.level.map_or("Sek I", |level| level.label())
    }

    fn class_line(&self) -> String {
        format!(
            "Klassenprofil: {} SuS, Heterogenität: {}, Sprachniveau: {}.",
            self.class_profile.class_size,
            self.class_profile.heterogeneity.label(),
            self.class_profile.language_level.label()
        )
    }

    fn write_optional_lines(&self, out: &mut String, goal_suffix: &str) {
        if !self.goals.is_empty() {
            let _ = writeln!(out, "- Bereits definierte Lernziele{goal_suffix}:");
            for (i, goal) in self.goals.iter().enumerate() {
                let _ = writeln!(out, "  {}. {goal}", i + 1);
            }
        }
        if let Some(structure) = self.structure {
            let _ = writeln!(out, "- Gewähltes Unterrichtsmodell: {}", structure.label());
        }
        if !self.special_needs.is_empty() {
            let _ = writeln!(out, "- Besondere Hinweise: {}", self.special_needs);
        }
    }
}

/// Request for a short version of a single lesson.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortPrompt {
    pub context: PlanContext,
}

impl ShortPrompt {
    pub fn new(plan: &Plan) -> Self {
        Self {
            context: plan.into(),
        }
    }
}

impl Prompt for ShortPrompt {
    const KIND: GenerationKind = GenerationKind::Short;

    fn validate(&self) -> Result<(), GenerationError> {
        self.context.validate()
    }

    fn render(&self) -> String {
        let c = &self.context;
        let mut out = String::from(
            "Du bist ein erfahrener Schweizer Didaktiker (Lehrplan 21). \
             Erstelle eine KURZVERSION eines Unterrichtsplans.\n\nKONTEXT:\n",
        );
        let _ = writeln!(out, "- Fach: {}", c.subject);
        let _ = writeln!(out, "- Thema / Fokus: {}", c.topic);
        let _ = writeln!(out, "- Stufe: {}", c.level_label());
        let _ = writeln!(out, "- Dauer: {} Minuten", c.duration_minutes);
        let _ = writeln!(out, "- {}", c.class_line());
        c.write_optional_lines(&mut out, "");
        out.push_str(
            "\nQUALITÄTSANFORDERUNGEN:\n\
             1. Lernziele: Formuliere 3-4 spezifische Lernziele nach dem Muster \
             \"Die SuS können [Verb], indem sie [was genau], und zeigen dies durch [Produkt].\" \
             Keine Platzhalter.\n\
             2. Phasen: Gliedere die Stunde in 3-5 Phasen mit konkreter Beschreibung. \
             Die Phasendauern ergeben zusammen die Lektionsdauer.\n\
             3. Differenzierung: Beschreibe 3 Niveaus (Basis, Standard, Challenge) mit Bezug zum Thema.\n\
             4. Sprachliche Hilfen: Schlage Satzmuster, Fachbegriffe und Zugangsmodi vor.\n",
        );
        out
    }
}

/// Request for a full detail plan.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPrompt {
    pub context: PlanContext,
}

impl DetailPrompt {
    pub fn new(plan: &Plan) -> Self {
        Self {
            context: plan.into(),
        }
    }
}

impl Prompt for DetailPrompt {
    const KIND: GenerationKind = GenerationKind::Detail;

    fn validate(&self) -> Result<(), GenerationError> {
        self.context.validate()
    }

    fn render(&self) -> String {
        let c = &self.context;
        let mut out = String::from(
            "Du bist ein erfahrener Schweizer Didaktiker. \
             Erstelle einen DETAILLIERTEN, KREATIVEN Unterrichtsplan.\n\nKONTEXT:\n",
        );
        let _ = writeln!(out, "- Fach: {}", c.subject);
        let _ = writeln!(out, "- Thema / Fokus: {}", c.topic);
        let _ = writeln!(out, "- Stufe: {}", c.level_label());
        let _ = writeln!(out, "- Dauer: {} Minuten", c.duration_minutes);
        let _ = writeln!(out, "- {}", c.class_line());
        c.write_optional_lines(&mut out, "");
        out.push_str(
            "\nQUALITÄTSANFORDERUNGEN & STIL:\n\
             1. Konkrete Lernziele: 1-3 messbare Ziele für diese Lektion.\n\
             2. Aktivierung: Kooperative Lernformen, bewegtes Lernen oder digitale Tools.\n\
             3. Differenzierung: Niveau A mit viel Scaffolding, Niveau B mit geführten Aufgaben, \
             Niveau C mit Expertenrollen statt Zusatzblättern.\n\
             4. Materialien: Nenne konkrete Materialien.\n\n\
             ABLAUF-DREHBUCH:\n\
             Schreibe genau, was LP und SuS tun. Die Phasendauern ergeben zusammen die Lektionsdauer. \
             Ergänze pro Phase eine Plan-B-Alternative, eine didaktische Diagnose und eine Bewertungsrubrik.\n",
        );
        out
    }
}

/// Request for a sequence skeleton.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencePrompt {
    pub context: PlanContext,
    pub lesson_count: u32,
}

impl SequencePrompt {
    pub fn new(plan: &Plan) -> Self {
        Self {
            context: plan.into(),
            lesson_count: plan.lesson_count,
        }
    }
}

impl Prompt for SequencePrompt {
    const KIND: GenerationKind = GenerationKind::Sequence;

    fn validate(&self) -> Result<(), GenerationError> {
        self.context.validate()?;
        if !LESSON_COUNT_RANGE.contains(&self.lesson_count) {
            return Err(GenerationError::InvalidContext(format!(
                "lesson count {} is outside {}..={}",
                self.lesson_count,
                LESSON_COUNT_RANGE.start(),
                LESSON_COUNT_RANGE.end()
            )));
        }
        Ok(())
    }

    fn render(&self) -> String {
        let c = &self.context;
        let mut out = format!(
            "Du bist ein moderner, kreativer Schweizer Didaktiker. Erstelle eine \
             UNTERRICHTSSEQUENZ mit {} Lektionen für eine heterogene Klasse.\n\nKONTEXT:\n",
            self.lesson_count
        );
        let _ = writeln!(out, "- Fach: {}", c.subject);
        let _ = writeln!(out, "- Thema der Reihe: {}", c.topic);
        let _ = writeln!(out, "- Stufe: {}", c.level_label());
        let _ = writeln!(out, "- Anzahl Lektionen: {}", self.lesson_count);
        let _ = writeln!(out, "- Dauer pro Lektion: {} Minuten", c.duration_minutes);
        let _ = writeln!(out, "- {}", c.class_line());
        c.write_optional_lines(&mut out, " (übergeordnete Ziele der Reihe)");
        out.push_str(
            "\nDIDAKTISCHE LEITLINIEN:\n\
             1. Lebensweltbezug: Starte im Hier und Jetzt der SuS, nicht mit abstrakter Theorie.\n\
             2. Keine Platzhalter: Formuliere für jede Lektion 1-2 konkrete Lernziele.\n\
             3. Methodenmix: Rollenspiele, Debatten, Bild-Analysen oder Erklärvideos statt reiner Textarbeit.\n\
             4. Progression: Die erste Lektion weckt Interesse, die mittleren erarbeiten Wissen, \
             die letzte führt zu einer Anwendung oder einem Produkt.\n\n\
             AUFGABE:\nEntwickle ein Sequenz-Skelett mit Titel, Fokus und Lernzielen pro Lektion.\n",
        );
        out
    }
}

/// Request to revise an existing short version.
#[derive(Debug, Clone, PartialEq)]
pub struct RevisePrompt {
    pub context: PlanContext,
    pub current: ShortVersion,
    pub instruction: String,
}

impl RevisePrompt {
    pub fn new(plan: &Plan, current: ShortVersion, instruction: impl Into<String>) -> Self {
        Self {
            context: plan.into(),
            current,
            instruction: instruction.into(),
        }
    }
}

impl Prompt for RevisePrompt {
    const KIND: GenerationKind = GenerationKind::Revise;

    fn validate(&self) -> Result<(), GenerationError> {
        self.context.validate()?;
        if self.instruction.trim().is_empty() {
            return Err(GenerationError::InvalidContext(
                "revision instruction must not be blank".into(),
            ));
        }
        Ok(())
    }

    fn render(&self) -> String {
        let c = &self.context;
        let sv = &self.current;
        let phases = sv
            .phases_summary
            .iter()
            .map(|p| format!("{} ({} Min): {}", p.name, p.duration_minutes, p.description))
            .collect::<Vec<_>>()
            .join(" | ");

        let mut out = String::from(
            "Du bist ein erfahrener Schweizer Didaktiker. Du hast bereits eine Kurzversion \
             eines Unterrichtsplans erstellt. Die Lehrperson möchte Änderungen vornehmen.\n\n\
             AKTUELLE KURZVERSION:\n",
        );
        let _ = writeln!(out, "- Titel: {}", or_unknown(&sv.title));
        let _ = writeln!(out, "- Überblick: {}", or_unknown(&sv.overview));
        let _ = writeln!(out, "- Lernziele: {}", or_unknown(&sv.goals.join("; ")));
        let _ = writeln!(out, "- Phasen: {}", or_unknown(&phases));
        out.push_str("\nKONTEXT:\n");
        let _ = writeln!(out, "- Fach: {}", c.subject);
        let _ = writeln!(out, "- Stufe: {}", c.level_label());
        let _ = writeln!(out, "- Dauer: {} Minuten", c.duration_minutes);
        let _ = writeln!(out, "- {}", c.class_line());
        let _ = writeln!(
            out,
            "\nANWEISUNG DER LEHRPERSON:\n\"{}\"\n\n\
             Erstelle eine ÜBERARBEITETE Kurzversion, die die Anweisung umsetzt. \
             Behalte den Rest möglichst bei.",
            self.instruction.trim()
        );
        out
    }
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        "k.A."
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlanMode;

    fn plan() -> Plan {
        Plan {
            subject: "Geschichte".to_string(),
            topic_description: "Der Sonderbundskrieg".to_string(),
            level: Some(Level::LowerSecondary),
            goals: vec!["Die SuS können Ursachen nennen.".to_string(), " ".to_string()],
            special_needs: "Zwei SuS mit Legasthenie".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_blank_subject_is_rejected() {
        let prompt = ShortPrompt::new(&Plan::default());
        assert!(matches!(
            prompt.validate(),
            Err(GenerationError::InvalidContext(_))
        ));
    }

    #[test]
    fn test_zero_duration_is_rejected() {
        let mut plan = plan();
        plan.duration_minutes = 0;
        assert!(DetailPrompt::new(&plan).validate().is_err());
    }

    #[test]
    fn test_sequence_lesson_count_bounds() {
        let mut plan = plan();
        plan.mode = PlanMode::Sequence;
        plan.lesson_count = 2;
        assert!(SequencePrompt::new(&plan).validate().is_err());
        plan.lesson_count = 3;
        assert!(SequencePrompt::new(&plan).validate().is_ok());
        plan.lesson_count = 13;
        assert!(SequencePrompt::new(&plan).validate().is_err());
    }

    #[test]
    fn test_revise_requires_instruction() {
        let prompt = RevisePrompt::new(&plan(), ShortVersion::default(), "   ");
        assert!(prompt.validate().is_err());
        let prompt = RevisePrompt::new(&plan(), ShortVersion::default(), "Mehr Gruppenarbeit");
        assert!(prompt.validate().is_ok());
        assert!(prompt.render().contains("\"Mehr Gruppenarbeit\""));
        assert!(prompt.render().contains("- Titel: k.A."));
    }

    #[test]
    fn test_render_includes_context_and_skips_blank_goals() {
        let text = ShortPrompt::new(&plan()).render();
        assert!(text.contains("- Fach: Geschichte"));
        assert!(text.contains("- Thema / Fokus: Der Sonderbundskrieg"));
        assert!(text.contains("- Stufe: Sek I"));
        assert!(text.contains("1. Die SuS können Ursachen nennen."));
        assert!(!text.contains("  2. "));
        assert!(text.contains("Besondere Hinweise: Zwei SuS mit Legasthenie"));
    }

    #[test]
    fn test_topic_falls_back_to_title() {
        let mut plan = plan();
        plan.topic_description.clear();
        plan.title = "Krieg und Bundesstaat".to_string();
        assert_eq!(PlanContext::from(&plan).topic, "Krieg und Bundesstaat");
    }
}

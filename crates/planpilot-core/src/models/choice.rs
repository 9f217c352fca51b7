//! Closed option sets that the wizard offers in its forms.
//!
//! Each set serializes to the short wire value (`"sek1"`, `"a2"`, ...),
//! parses back from it case-insensitively and carries the German label that
//! the terminal output shows.

use std::{fmt, str::FromStr};

/// Declares a closed option set with wire values and display labels.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal, $label:literal; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
            ::schemars::JsonSchema,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $value)] $variant, )+
        }

        impl $name {
            /// Every option in presentation order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire value used in storage, prompts and the CLI.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            /// Human readable German label.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|option| option.as_str() == needle)
                    .ok_or_else(|| format!("Invalid {}: {s}", $kind))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice_enum! {
    /// Whether a single lesson or a lesson sequence is planned.
    pub enum PlanMode ("plan mode") {
        Single => "single", "Einzelstunde";
        Sequence => "sequence", "Sequenz";
    }
}

choice_enum! {
    /// School level of the class.
    pub enum Level ("level") {
        Kindergarten => "kg", "Kindergarten";
        Primary => "primar", "Primar";
        LowerSecondary => "sek1", "Sek I";
        TenthYear => "10sj", "10. Schuljahr";
        Gymnasium => "gymnasium", "Gymnasium";
    }
}

choice_enum! {
    /// Kind of learning goal the lesson aims for.
    pub enum LearningGoalType ("learning goal type") {
        Knowledge => "knowledge", "Wissen";
        Application => "application", "Anwendung";
        Reflection => "reflection", "Reflexion";
        Transfer => "transfer", "Transfer";
    }
}

choice_enum! {
    /// Spread of ability within the class.
    pub enum Heterogeneity ("heterogeneity") {
        Low => "low", "Gering";
        Medium => "medium", "Mittel";
        High => "high", "Hoch";
    }
}

choice_enum! {
    /// CEFR language level of the class.
    pub enum LanguageLevel ("language level") {
        A1 => "a1", "A1";
        A2 => "a2", "A2";
        B1 => "b1", "B1";
        B2 => "b2", "B2";
        C1 => "c1", "C1";
        C2 => "c2", "C2";
    }
}

choice_enum! {
    /// Didactic slot 1: the lesson's structure model.
    pub enum StructureModel ("structure model") {
        Aviva => "aviva", "AVIVA";
        DirectInstruction => "direct_instruction", "Direkte Instruktion";
        FiveE => "5e", "5E";
        Workshop => "workshop", "Workshop / Atelier";
        ProjectCycle => "project_cycle", "Projektzyklus";
    }
}

choice_enum! {
    /// Didactic slot 2: the dominant learning mode.
    pub enum LearningMode ("learning mode") {
        Cooperative => "cooperative", "Kooperatives Lernen";
        ProblemBased => "problem_based", "Problemorientiert";
        Inquiry => "inquiry", "Inquiry / Forschend";
        ProjectBased => "project_based", "Projektbasiert";
        Practice => "practice", "Übungsmodus";
        Discourse => "discourse", "Diskurs / Debatte";
    }
}

choice_enum! {
    /// Didactic slot 3: the quality layer placed on top.
    pub enum QualityLayer ("quality layer") {
        FourK => "four_k", "4K";
        DeeperLearning => "deeper_learning", "Deeper Learning";
        LanguageSensitive => "language_sensitive", "Sprachsensibler Unterricht";
        FormativeAssessment => "formative_assessment", "Formatives Assessment";
        Udl => "udl", "UDL";
        SelfRegulated => "self_regulated", "Selbstreguliertes Lernen";
        Gamification => "gamification", "Gamification light";
    }
}

choice_enum! {
    /// Progress of a plan through the wizard.
    pub enum PlanStatus ("plan status") {
        Draft => "draft", "Entwurf";
        AiGenerated => "ai_generated", "KI-generiert";
        Edited => "edited", "Bearbeitet";
        Revised => "revised", "Überarbeitet";
        Approved => "approved", "Freigegeben";
        DetailReady => "detail_ready", "Detailplanung bereit";
        Exported => "exported", "Exportiert";
    }
}

choice_enum! {
    /// Channel through which learners can access a phase.
    pub enum AccessMode ("access mode") {
        Text => "text", "Text";
        Visual => "visual", "Visuell";
        Audio => "audio", "Audio";
        Product => "product", "Produkt";
    }
}

choice_enum! {
    /// Where a curriculum competency came from.
    pub enum CurriculumSource ("curriculum source") {
        Lehrplan21 => "lehrplan21", "Lehrplan 21";
        CustomUpload => "custom_upload", "Eigener Upload";
    }
}

impl Default for PlanMode {
    fn default() -> Self {
        PlanMode::Single
    }
}

impl Default for Heterogeneity {
    fn default() -> Self {
        Heterogeneity::Medium
    }
}

impl Default for LanguageLevel {
    fn default() -> Self {
        LanguageLevel::B2
    }
}

impl Default for PlanStatus {
    fn default() -> Self {
        PlanStatus::Draft
    }
}

impl Default for CurriculumSource {
    fn default() -> Self {
        CurriculumSource::Lehrplan21
    }
}

impl Level {
    /// Lehrplan 21 cycle that covers this level.
    pub fn cycle(&self) -> &'static str {
        match self {
            Level::Kindergarten => "Zyklus 1",
            Level::Primary => "Zyklus 2",
            Level::LowerSecondary | Level::TenthYear | Level::Gymnasium => "Zyklus 3",
        }
    }
}

impl LanguageLevel {
    /// A1 and A2.
    pub fn is_elementary(&self) -> bool {
        matches!(self, LanguageLevel::A1 | LanguageLevel::A2)
    }

    /// A1 through B1, the levels that call for language-sensitive material.
    pub fn is_developing(&self) -> bool {
        matches!(self, LanguageLevel::A1 | LanguageLevel::A2 | LanguageLevel::B1)
    }
}

impl StructureModel {
    /// Short description shown next to the option.
    pub fn description(&self) -> &'static str {
        match self {
            StructureModel::Aviva => "Ankommen, Vorwissen, Informieren, Verarbeiten, Auswerten",
            StructureModel::DirectInstruction => "Klare, lehrpersonengesteuerte Vermittlung",
            StructureModel::FiveE => "Engage, Explore, Explain, Elaborate, Evaluate",
            StructureModel::Workshop => "Offene Lernumgebung mit Stationen",
            StructureModel::ProjectCycle => "Planen, Durchführen, Präsentieren, Reflektieren",
        }
    }
}

impl LearningMode {
    /// Short description shown next to the option.
    pub fn description(&self) -> &'static str {
        match self {
            LearningMode::Cooperative => "Think-Pair-Share, Jigsaw, Gruppenpuzzle",
            LearningMode::ProblemBased => "Authentische Problemstellungen lösen",
            LearningMode::Inquiry => "Fragen stellen, untersuchen, Ergebnisse teilen",
            LearningMode::ProjectBased => "Reales Produkt in längeren Phasen erstellen",
            LearningMode::Practice => "Gezieltes Üben und Vertiefen",
            LearningMode::Discourse => "Argumente entwickeln und austauschen",
        }
    }
}

impl QualityLayer {
    /// Short description shown next to the option.
    pub fn description(&self) -> &'static str {
        match self {
            QualityLayer::FourK => "Kreativität, Kritisches Denken, Kommunikation, Kollaboration",
            QualityLayer::DeeperLearning => "Tiefes Verständnis und Transfer",
            QualityLayer::LanguageSensitive => "Scaffolding, Wortschatz, Satzbausteine",
            QualityLayer::FormativeAssessment => "Lernprozessbegleitende Beurteilung",
            QualityLayer::Udl => "Universal Design for Learning, Mehrfachzugänge",
            QualityLayer::SelfRegulated => "Lernstrategien, Metakognition, Planung",
            QualityLayer::Gamification => "Spielelemente für Motivation",
        }
    }
}

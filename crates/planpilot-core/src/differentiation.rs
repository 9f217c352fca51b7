//! Rule-based three-tier differentiation of lesson phases.
//!
//! [`generate_differentiation`] classifies a phase by keyword, picks the
//! Niveau A and Niveau C templates for that phase type and, when the class
//! profile calls for it, adds sentence starters, a word list, access modes
//! and a support hint. The output depends only on its inputs, so applying it
//! repeatedly over a plan always yields the same result.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{
    AccessMode, ClassProfile, Differentiation, Heterogeneity, LanguageLevel, Phase, Plan,
};

/// Maximum number of words taken from the phase text.
const MAX_EXTRACTED_WORDS: usize = 6;
/// Maximum number of subject-specific terms appended.
const MAX_DOMAIN_TERMS: usize = 4;
/// Maximum length of the final word list.
const MAX_WORD_LIST: usize = 8;

static CAPITALIZED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-ZÄÖÜ][a-zäöüß]{3,}").expect("valid word pattern"));

/// Kind of activity a phase represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseType {
    Input,
    Practice,
    Discussion,
    Creative,
    Assessment,
    Reflection,
    General,
}

/// Trigger fragments per phase type, in priority order. The first type with a
/// fragment contained in the lower-cased phase text wins.
pub const PHASE_PATTERNS: &[(PhaseType, &[&str])] = &[
    (
        PhaseType::Input,
        &["einstieg", "einführ", "input", "erklär", "inform", "vorstell", "präsent"],
    ),
    (
        PhaseType::Practice,
        &["üb", "anwend", "vertieft", "arbeit", "aufgab", "bearbeit", "training"],
    ),
    (
        PhaseType::Discussion,
        &["diskuss", "debatt", "gespräch", "austausch", "dialog", "diskurs", "argum"],
    ),
    (
        PhaseType::Creative,
        &["gestalt", "kreativ", "produkt", "erstell", "entwer", "design", "projekt"],
    ),
    (
        PhaseType::Assessment,
        &["prüf", "test", "bewert", "assessment", "kontroll", "überprüf", "evaluati"],
    ),
    (
        PhaseType::Reflection,
        &["reflex", "rückblick", "auswert", "meta", "zusammenfass", "sicher"],
    ),
];

/// Subject keywords and the vocabulary they contribute, checked in order.
const DOMAIN_TERMS: &[(&[&str], &[&str])] = &[
    (
        &["mathe"],
        &["Gleichung", "Variable", "Ergebnis", "Operation", "Berechnung"],
    ),
    (
        &["deutsch"],
        &["Textsorte", "Absatz", "Argument", "Hauptaussage", "Zusammenfassung"],
    ),
    (
        &["nmg", "natur"],
        &["Experiment", "Hypothese", "Beobachtung", "Ergebnis", "Lebensraum"],
    ),
    (
        &["geschich", "rzg"],
        &["Quelle", "Epoche", "Ursache", "Wirkung", "Ereignis"],
    ),
];

impl PhaseType {
    /// Classifies a phase from its name and description.
    pub fn detect(name: &str, description: &str) -> Self {
        let text = format!("{name} {description}").to_lowercase();
        PHASE_PATTERNS
            .iter()
            .find(|(_, fragments)| fragments.iter().any(|f| text.contains(f)))
            .map_or(PhaseType::General, |(phase_type, _)| *phase_type)
    }

    fn scaffolds(self) -> [&'static str; 3] {
        match self {
            PhaseType::Input => [
                "Vereinfachter Text mit Schlüsselbegriff-Markierungen.",
                "Visuelles Begleitmaterial (Bilder, Symbole) zur Unterstützung.",
                "Vorentlastung der wichtigsten Begriffe.",
            ],
            PhaseType::Practice => [
                "Reduzierte Aufgabenanzahl (50% des Standards).",
                "Schritt-für-Schritt-Anleitung mit Beispiellösung.",
                "Hilfsblatt mit Lösungsstrategien verfügbar.",
            ],
            PhaseType::Discussion => [
                "Gesprächshilfe mit vorformulierten Satzanfängen.",
                "Partnerarbeit statt Plenum (kleinerer Rahmen).",
                "Bildkarten als Gesprächsanlass.",
            ],
            PhaseType::Creative => [
                "Vorlage oder Teilprodukt als Startpunkt.",
                "Klare Gestaltungskriterien als Checkliste.",
                "Reduzierte Komplexität (ein Material, eine Technik).",
            ],
            PhaseType::Assessment => [
                "Vereinfachte Aufgabenformulierung.",
                "Multiple-Choice-Format statt offene Fragen.",
                "Mehr Bearbeitungszeit.",
            ],
            PhaseType::Reflection => [
                "Reflexionsfragen als Ankreuz-Format.",
                "Smileys / Ampel statt Freitext.",
                "Partnerreflexion statt Einzelreflexion.",
            ],
            PhaseType::General => [
                "Vereinfachtes Material mit Hilfsstrukturen.",
                "Weniger Aufgaben, mehr Bearbeitungszeit.",
                "Partnerarbeit oder Tandems zur Unterstützung.",
            ],
        }
    }

    fn extensions(self) -> [&'static str; 3] {
        match self {
            PhaseType::Input => [
                "Vertiefende Zusatzfrage zum Weiterdenken.",
                "Vergleich mit anderem Themengebiet herstellen.",
                "Fachbegriffe auch in Fremdsprache / Fachsprache einordnen.",
            ],
            PhaseType::Practice => [
                "Zusatzaufgaben mit erhöhtem Anforderungsniveau.",
                "Offene Problemstellung ohne vorgegebenen Lösungsweg.",
                "Transfer auf unbekannte Situationen.",
            ],
            PhaseType::Discussion => [
                "Moderationsrolle übernehmen.",
                "Gegenargumente formulieren und verteidigen.",
                "Diskussionsergebnisse schriftlich zusammenfassen.",
            ],
            PhaseType::Creative => [
                "Erweitertes Produkt mit zusätzlichen Gestaltungselementen.",
                "Eigene Kriterien für Qualitätsbeurteilung entwickeln.",
                "Peer-Feedback geben und einbauen.",
            ],
            PhaseType::Assessment => [
                "Offene Analyse- oder Transferaufgaben.",
                "Eigene Aufgaben zum Thema erstellen.",
                "Fehleranalyse bei Beispiellösungen.",
            ],
            PhaseType::Reflection => [
                "Reflexion auf Meta-Ebene: Lernstrategien analysieren.",
                "Schriftlicher Reflexionstext mit Begründung.",
                "Lernziel-Selbstbewertung mit Evidenz.",
            ],
            PhaseType::General => [
                "Erweiterte Aufgabenstellung mit Transferbezug.",
                "Selbstständige Vertiefung und Reflexion.",
                "Ergebnisse präsentieren oder dokumentieren.",
            ],
        }
    }

    /// Sentence starters offered to learners in this kind of phase.
    pub fn sentence_starters(self) -> &'static [&'static str] {
        match self {
            PhaseType::Input => &[
                "Ich habe verstanden, dass…",
                "Das Wichtigste ist…",
                "Mir ist aufgefallen, dass…",
                "Ein Beispiel dafür ist…",
            ],
            PhaseType::Practice => &[
                "Zuerst mache ich…",
                "Dann versuche ich…",
                "Ich beginne mit…",
                "Mein nächster Schritt ist…",
            ],
            PhaseType::Discussion => &[
                "Ich denke, dass…",
                "Ich bin anderer Meinung, weil…",
                "Ich stimme zu, weil…",
                "Dazu möchte ich ergänzen, dass…",
                "Meiner Meinung nach…",
                "Ein Argument dafür ist…",
            ],
            PhaseType::Creative => &[
                "Meine Idee ist…",
                "Ich möchte darstellen, wie…",
                "Für mein Produkt verwende ich…",
                "Ich habe mich entschieden für…",
            ],
            PhaseType::Assessment => &[
                "Die Lösung ist…, weil…",
                "Ich habe herausgefunden, dass…",
                "Der Unterschied zwischen X und Y ist…",
                "Ich überprüfe mein Ergebnis, indem…",
            ],
            PhaseType::Reflection => &[
                "Heute habe ich gelernt, dass…",
                "Schwierig war für mich…",
                "Beim nächsten Mal möchte ich…",
                "Besonders gut gelungen ist…",
                "Ich habe mein Ziel erreicht, weil…",
            ],
            PhaseType::General => &[
                "Ich denke, dass…",
                "Mir ist aufgefallen, dass…",
                "Ich habe bemerkt, dass…",
                "Das bedeutet, dass…",
            ],
        }
    }
}

/// Lesson context the engine draws vocabulary from.
#[derive(Debug, Clone, Copy)]
pub struct DifferentiationContext<'a> {
    pub subject: &'a str,
}

impl<'a> From<&'a Plan> for DifferentiationContext<'a> {
    fn from(plan: &'a Plan) -> Self {
        Self {
            subject: &plan.subject,
        }
    }
}

/// Derives the three tiers and, if needed, language supports for one phase.
pub fn generate_differentiation(
    name: &str,
    description: &str,
    profile: &ClassProfile,
    context: DifferentiationContext<'_>,
) -> Differentiation {
    let phase_type = PhaseType::detect(name, description);
    let mut differentiation = Differentiation {
        niveau_a: phase_type.scaffolds().join(" "),
        niveau_b: format!("Standardausführung: {description}"),
        niveau_c: phase_type.extensions().join(" "),
        ..Default::default()
    };

    if profile.needs_language_support() {
        differentiation.sentence_starters = Some(
            phase_type
                .sentence_starters()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        );
        differentiation.word_list = Some(word_list(description, context.subject));
        differentiation.access_modes = Some(access_modes(phase_type, profile));
        differentiation.support_hints = Some(support_hint(phase_type, profile));
    }

    differentiation
}

/// Replaces the differentiation of every phase with the engine's output.
pub fn differentiate_phases(phases: &[Phase], plan: &Plan) -> Vec<Phase> {
    phases
        .iter()
        .map(|phase| Phase {
            differentiation: generate_differentiation(
                &phase.name,
                &phase.description,
                &plan.class_profile,
                plan.into(),
            ),
            ..phase.clone()
        })
        .collect()
}

/// Adds engine language supports to phases that lack them when the class
/// needs them. Tier texts written by the generation service are kept.
pub fn supplement_language_support(phases: &mut [Phase], plan: &Plan) {
    if !plan.class_profile.needs_language_support() {
        return;
    }
    for phase in phases.iter_mut() {
        if phase.differentiation.has_language_support() {
            continue;
        }
        let generated = generate_differentiation(
            &phase.name,
            &phase.description,
            &plan.class_profile,
            plan.into(),
        );
        let current = &mut phase.differentiation;
        current.sentence_starters = generated.sentence_starters;
        current.word_list = generated.word_list;
        current.support_hints = generated.support_hints;
        if current.access_modes.as_ref().map_or(true, Vec::is_empty) {
            current.access_modes = generated.access_modes;
        }
    }
}

fn word_list(description: &str, subject: &str) -> Vec<String> {
    let text = format!("{description} {subject}");
    let mut words: Vec<String> = Vec::new();
    for found in CAPITALIZED_WORD.find_iter(&text) {
        if !words.iter().any(|w| w == found.as_str()) {
            words.push(found.as_str().to_string());
        }
    }
    words.truncate(MAX_EXTRACTED_WORDS);

    let subject_lower = subject.to_lowercase();
    let domain = DOMAIN_TERMS
        .iter()
        .find(|(keys, _)| keys.iter().any(|key| subject_lower.contains(key)))
        .map_or(&[][..], |(_, terms)| *terms);

    words.extend(
        domain
            .iter()
            .take(MAX_DOMAIN_TERMS)
            .map(|term| (*term).to_string()),
    );
    words.truncate(MAX_WORD_LIST);
    words
}

fn access_modes(phase_type: PhaseType, profile: &ClassProfile) -> Vec<AccessMode> {
    let elementary = profile.language_level.is_elementary();
    let mut modes = vec![AccessMode::Text];

    if elementary || profile.heterogeneity == Heterogeneity::High {
        modes.push(AccessMode::Visual);
    }
    if matches!(phase_type, PhaseType::Input | PhaseType::Discussion) || elementary {
        modes.push(AccessMode::Audio);
    }
    if matches!(phase_type, PhaseType::Creative | PhaseType::Practice) {
        modes.push(AccessMode::Product);
    }

    modes
}

fn support_hint(phase_type: PhaseType, profile: &ClassProfile) -> String {
    let level = profile.language_level;
    let mut hints = Vec::new();

    if level.is_elementary() {
        hints.push("Schlüsselwörter vorentlasten und an der Tafel sichtbar machen.");
        hints.push("Einfache Sprache verwenden, komplexe Sätze aufteilen.");
    }
    if level == LanguageLevel::B1 {
        hints.push("Fachbegriffe mit Erklärungen versehen.");
    }
    if profile.heterogeneity == Heterogeneity::High {
        hints.push("Partnersystem (stärkere/schwächere SuS im Tandem) einsetzen.");
    }
    if phase_type == PhaseType::Discussion && level.is_developing() {
        hints.push("Gesprächsregeln visuell aufhängen. Sprechzeit in kleinen Gruppen maximieren.");
    }

    hints.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(language_level: LanguageLevel, heterogeneity: Heterogeneity) -> ClassProfile {
        ClassProfile {
            language_level,
            heterogeneity,
            ..Default::default()
        }
    }

    fn context(subject: &str) -> DifferentiationContext<'_> {
        DifferentiationContext { subject }
    }

    #[test]
    fn test_every_pattern_fragment_selects_its_type() {
        for (phase_type, fragments) in PHASE_PATTERNS {
            for fragment in *fragments {
                // Earlier types take priority, so only check fragments that
                // do not also contain an earlier type's trigger.
                let detected = PhaseType::detect(fragment, "");
                let earlier = PHASE_PATTERNS
                    .iter()
                    .take_while(|(t, _)| t != phase_type)
                    .any(|(_, f)| f.iter().any(|e| fragment.contains(e)));
                if !earlier {
                    assert_eq!(detected, *phase_type, "fragment {fragment}");
                }
            }
        }
    }

    #[test]
    fn test_priority_order_and_fallback() {
        assert_eq!(PhaseType::detect("Einstieg", "Übung"), PhaseType::Input);
        assert_eq!(PhaseType::detect("Erarbeitung", ""), PhaseType::Practice);
        assert_eq!(PhaseType::detect("Debatte", "Pro und Contra"), PhaseType::Discussion);
        assert_eq!(PhaseType::detect("Abschluss", "Rückblick"), PhaseType::Reflection);
        assert_eq!(PhaseType::detect("Pause", "Znüni"), PhaseType::General);
    }

    #[test]
    fn test_low_need_class_gets_no_language_support() {
        let result = generate_differentiation(
            "Einstieg",
            "Bildimpuls zum Thema",
            &profile(LanguageLevel::B2, Heterogeneity::Medium),
            context("Mathematik"),
        );

        assert!(result.sentence_starters.is_none());
        assert!(result.word_list.is_none());
        assert!(result.access_modes.is_none());
        assert!(result.support_hints.is_none());
        assert_eq!(result.niveau_b, "Standardausführung: Bildimpuls zum Thema");
        assert!(result.niveau_a.starts_with("Vereinfachter Text"));
    }

    #[test]
    fn test_a2_high_heterogeneity_practice_phase() {
        let result = generate_differentiation(
            "Erarbeitung",
            "Arbeitsblatt bearbeiten",
            &profile(LanguageLevel::A2, Heterogeneity::High),
            context("Deutsch"),
        );

        let starters = result.sentence_starters.unwrap();
        assert!(!starters.is_empty());
        assert_eq!(starters[0], "Zuerst mache ich…");

        let words = result.word_list.unwrap();
        assert_eq!(
            words,
            vec!["Arbeitsblatt", "Deutsch", "Textsorte", "Absatz", "Argument", "Hauptaussage"]
        );

        assert_eq!(
            result.access_modes.unwrap(),
            vec![AccessMode::Text, AccessMode::Visual, AccessMode::Audio, AccessMode::Product]
        );
        let hint = result.support_hints.unwrap();
        assert!(hint.contains("Schlüsselwörter vorentlasten"));
        assert!(hint.contains("Partnersystem"));
    }

    #[test]
    fn test_word_list_is_capped_at_eight() {
        let words = word_list(
            "Brüche Nenner Zähler Kürzen Erweitern Vergleichen Ordnen Rechnen",
            "Mathematik",
        );
        assert_eq!(words.len(), 8);
        assert_eq!(&words[..6], ["Brüche", "Nenner", "Zähler", "Kürzen", "Erweitern", "Vergleichen"]);
        assert_eq!(&words[6..], ["Gleichung", "Variable"]);
    }

    #[test]
    fn test_word_list_deduplicates_extracted_words() {
        let words = word_list("Quelle lesen, Quelle deuten", "RZG Geschichte");
        assert_eq!(words[0], "Quelle");
        assert_eq!(words.iter().filter(|w| *w == "Quelle").count(), 2);
        assert_eq!(words[1], "Geschichte");
    }

    #[test]
    fn test_discussion_hint_for_b1() {
        let result = generate_differentiation(
            "Austausch",
            "Gespräch in Gruppen",
            &profile(LanguageLevel::B1, Heterogeneity::Low),
            context("NMG"),
        );
        assert_eq!(
            result.support_hints.as_deref(),
            Some("Fachbegriffe mit Erklärungen versehen. Gesprächsregeln visuell aufhängen. Sprechzeit in kleinen Gruppen maximieren.")
        );
        assert_eq!(result.access_modes.unwrap(), vec![AccessMode::Text, AccessMode::Audio]);
    }

    #[test]
    fn test_generation_is_idempotent() {
        let class = profile(LanguageLevel::A1, Heterogeneity::High);
        let first = generate_differentiation("Reflexion", "Lernweg auswerten", &class, context("NMG"));
        let second = generate_differentiation("Reflexion", "Lernweg auswerten", &class, context("NMG"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_supplement_keeps_existing_tiers() {
        let mut plan = Plan::default();
        plan.class_profile.language_level = LanguageLevel::A2;
        let mut phases = vec![Phase {
            name: "Einstieg".to_string(),
            description: "Impuls".to_string(),
            differentiation: Differentiation {
                niveau_a: "eigene Basis".to_string(),
                niveau_b: "eigener Standard".to_string(),
                niveau_c: "eigene Challenge".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }];

        supplement_language_support(&mut phases, &plan);

        let differentiation = &phases[0].differentiation;
        assert_eq!(differentiation.niveau_a, "eigene Basis");
        assert!(differentiation.sentence_starters.is_some());
        assert!(differentiation.access_modes.is_some());
    }
}

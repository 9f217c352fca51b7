//! Deterministic content used when the generation service is unavailable.
//!
//! The generators here never fail. Phase durations always add up to the
//! lesson length, and detail phases run through the differentiation engine
//! so the fallback output carries the same language supports as any other
//! plan.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    differentiation::differentiate_phases,
    models::{
        AccessMode, DetailPlan, DidacticDiagnosis, Differentiation, Phase, PhaseSummary, Plan,
        RubricRow, SequenceLesson, SequenceSkeleton, ShortVersion, StructureModel,
    },
};

use super::lesson_context;

static WHOLE_CLASS_FORMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)plenum|einzelarbeit").expect("valid social form pattern"));

const FALLBACK_LESSON_COUNT: u32 = 4;
const FALLBACK_DURATION_MINUTES: u32 = 45;
const MIN_SHORTENED_MINUTES: u32 = 5;

/// Subject-matter reading of the plan that drives the templates.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LessonAnalysis {
    topic: String,
    keywords: Vec<String>,
    threshold_concept: String,
    misconception: String,
    relevance: String,
}

impl LessonAnalysis {
    fn of(plan: &Plan) -> Self {
        let text = format!("{} {} {}", plan.title, plan.subject, plan.topic_description)
            .to_lowercase();
        let topic = if plan.subject.trim().is_empty() {
            "Thema".to_string()
        } else {
            plan.subject.trim().to_string()
        };
        let keywords = text
            .split_whitespace()
            .filter(|w| w.chars().count() > 5)
            .map(str::to_string)
            .collect();

        let has = |needles: &[&str]| needles.iter().any(|n| text.contains(n));
        let (threshold_concept, misconception, relevance) = if has(&["strom", "physik"]) {
            (
                "Der geschlossene Stromkreis und der Energiefluss".to_string(),
                "Strom wird \"verbraucht\" (statt Energieumwandlung)".to_string(),
                "Sicherer Umgang mit Elektrizität im Alltag.".to_string(),
            )
        } else if has(&["geschichte", "zeit"]) {
            (
                "Multiperspektivität von Quellen".to_string(),
                "Geschichte ist \"objektive Wahrheit\"".to_string(),
                "Erkennen von Manipulation in Medien heute.".to_string(),
            )
        } else if has(&["ethik", "fussball", "kommerzialisierung"]) {
            (
                "Spannungsfeld zwischen Tradition und Marktlogik".to_string(),
                "Dass Kommerzialisierung nur \"böse\" ist (Multiperspektivität fehlt)".to_string(),
                "Kritische Konsumentenentscheidungen treffen.".to_string(),
            )
        } else {
            (
                format!("Das Prinzip der Kausalität in {topic}"),
                format!("Dass {topic} statisch ist und nicht prozesshaft."),
                format!("Verständnis von {topic} ist essentiell für die Teilhabe an der Gesellschaft."),
            )
        };

        Self {
            topic,
            keywords,
            threshold_concept,
            misconception,
            relevance,
        }
    }
}

struct PhaseTemplate {
    name: &'static str,
    description: String,
    teacher: String,
    child: &'static str,
    operation: &'static str,
    checkpoint: &'static str,
}

impl PhaseTemplate {
    fn into_phase(self, id: u32, minutes: u32) -> Phase {
        Phase {
            id: format!("p-{id}"),
            name: format!("{minutes}' {}", self.name),
            duration_minutes: minutes,
            description: self.description,
            didactic_comment: Some(format!("Checkpoint: {}", self.checkpoint)),
            teacher_actions: Some(self.teacher),
            child_actions: Some(format!("{}\n(Denkoperation: {})", self.child, self.operation)),
            materials: vec![
                "Arbeitsmaterial".to_string(),
                "Beamer".to_string(),
                "Moderatorenkoffer".to_string(),
            ],
            social_form: Some(if id == 2 { "Partner-/Gruppenarbeit" } else { "Plenum" }.to_string()),
            differentiation: Differentiation {
                niveau_a: "Stark vorstrukturiert, Fokus auf Basisbegriffe.".to_string(),
                niveau_b: "Standard-Auftrag mit Hilfekarten.".to_string(),
                niveau_c: "Offene Aufgabenstellung, Transferforderung.".to_string(),
                ..Default::default()
            },
            plan_b_alternative: Some("Lehrervortrag mit Tafelbild (bei Technik-Ausfall).".to_string()),
        }
    }
}

fn share(total: u32, fraction: f64) -> u32 {
    (f64::from(total) * fraction).round() as u32
}

fn lesson_flow(analysis: &LessonAnalysis, plan: &Plan) -> Vec<(PhaseTemplate, u32)> {
    let total = plan.duration_minutes;
    match plan.didactic_slots.slot1 {
        Some(StructureModel::Aviva) => aviva_flow(analysis, total),
        _ => standard_flow(analysis, total),
    }
}

fn aviva_flow(analysis: &LessonAnalysis, total: u32) -> Vec<(PhaseTemplate, u32)> {
    let arrive = share(total, 0.15);
    let prior = share(total, 0.15);
    let inform = share(total, 0.25);
    let process = share(total, 0.30);
    let evaluate = total.saturating_sub(arrive + prior + inform + process);
    let focus = analysis.keywords.first().map_or("Kernbegriff", String::as_str);

    vec![
        (
            PhaseTemplate {
                name: "A: Ankommen & Aktivieren",
                description: format!(
                    "Herstellen von Präsenz und kognitive Aktivierung durch das Schwellenkonzept «{}».",
                    analysis.threshold_concept
                ),
                teacher: "LP begrüsst die Klasse an der Tür und startet mit einem provokanten Bildimpuls.\n\
                          LP fragt: «Was seht ihr hier? Was stimmt an diesem Bild nicht?» (Wartezeit 10 Sek.)\n\
                          LP sammelt erste Zurufe kommentarlos an der Tafel."
                    .to_string(),
                child: "SuS kommen an und betrachten den Bildimpuls still.\n\
                        SuS formulieren erste Hypothesen: «Das kann so nicht stimmen, weil...»",
                operation: "Hypothesen bilden",
                checkpoint: "Blitzlicht: Wer hat eine Idee?",
            },
            arrive,
        ),
        (
            PhaseTemplate {
                name: "V: Vorwissen aktivieren",
                description: "Explizitmachung der Präkonzepte und Vernetzung.".to_string(),
                teacher: "LP gibt den Auftrag: «Notiert in 2 Minuten alles, was ihr schon wisst, auf Post-its.»\n\
                          LP clustert die Zettel an der Tafel nach Kategorien.\n\
                          LP würdigt das Vorwissen und benennt offene Fragen."
                    .to_string(),
                child: "SuS schreiben in Einzelarbeit Assoziationen auf Zettel.\n\
                        SuS kleben ihre Zettel an die Tafel und vergleichen ihr Wissen.",
                operation: "Assoziieren & Strukturieren",
                checkpoint: "Cluster an der Tafel.",
            },
            prior,
        ),
        (
            PhaseTemplate {
                name: "I: Informieren",
                description: "Instruktion und Erarbeitung neuer Inhalte.".to_string(),
                teacher: format!(
                    "LP präsentiert den Kerninhalt mit Fokus auf {focus}.\n\
                     LP nutzt Visualisierungen (Dual Coding).\n\
                     LP stoppt nach 5 Minuten für eine Hinge-Point-Frage: «Zeigt mit 1-5 Fingern, wie sicher ihr seid.»"
                ),
                child: "SuS folgen dem Input aktiv und machen Notizen.\n\
                        SuS beantworten die Hinge-Point-Frage per Handzeichen.",
                operation: "Aufnehmen & Verarbeiten",
                checkpoint: "Verständnisfrage (Hinge Point Question).",
            },
            inform,
        ),
        (
            PhaseTemplate {
                name: "V: Verarbeiten",
                description: "Vertiefte Auseinandersetzung und Anwendung.".to_string(),
                teacher: "LP verteilt die Aufgabenblätter (A/B/C).\n\
                          LP: «Wählt euer Niveau. Wer Hilfe braucht, kommt zum Support-Tisch.»\n\
                          LP coacht einzelne Gruppen und gibt formatives Feedback."
                    .to_string(),
                child: "SuS wählen ihr Niveau selbstständig.\n\
                        SuS bearbeiten ein Fallbeispiel und nutzen Wortliste und Scaffolding bei Bedarf.",
                operation: "Anwenden & Transferieren",
                checkpoint: "Lernprodukt (z.B. Lösungsskizze).",
            },
            process,
        ),
        (
            PhaseTemplate {
                name: "A: Auswerten",
                description: "Metakognitive Reflexion des Lernprozesses.".to_string(),
                teacher: "LP fragt: «Wie hat sich eure Meinung vom Anfang verändert?»\n\
                          LP lässt den Lernzuwachs auf einer Zielscheibe markieren (Exit Ticket)."
                    .to_string(),
                child: "SuS vergleichen Vorwissen mit neuem Wissen.\n\
                        SuS reflektieren: «Ich habe heute verstanden, dass...»",
                operation: "Reflektieren (Metakognition)",
                checkpoint: "Rubrik-Selbsteinschätzung.",
            },
            evaluate,
        ),
    ]
}

fn standard_flow(analysis: &LessonAnalysis, total: u32) -> Vec<(PhaseTemplate, u32)> {
    let opening = share(total, 0.15);
    let closing = share(total, 0.15);
    let rest = total.saturating_sub(opening + closing);
    let work = share(rest, 0.6);
    let transfer = rest - work;
    let topic = &analysis.topic;

    vec![
        (
            PhaseTemplate {
                name: "Einstieg: Kognitive Dissonanz",
                description: format!("Konfrontation mit einer Fehlvorstellung zu «{topic}»."),
                teacher: format!(
                    "LP zeigt ein kontroverses Zitat: «{topic} braucht niemand.»\n\
                     LP fragt: «Wer stimmt zu? Steht auf!» (Barometer-Methode)\n\
                     LP moderiert die kurze Diskussion."
                ),
                child: "SuS positionieren sich im Raum.\n\
                        SuS begründen ihre Meinung spontan.",
                operation: "Problematisieren",
                checkpoint: "Meinungsbild.",
            },
            opening,
        ),
        (
            PhaseTemplate {
                name: "Erarbeitung: Deep Dive",
                description: format!("Analyse von Material (Text/Video) zu «{topic}»."),
                teacher: "LP erklärt den Arbeitsauftrag: «Analysiert die Quelle in Partnerarbeit.»\n\
                          LP stellt einen Timer und unterstützt bei Verständnisfragen."
                    .to_string(),
                child: "SuS lesen oder schauen das Material aktiv und markieren Schlüsselbegriffe.\n\
                        SuS tauschen sich mit dem Partner aus (Think-Pair-Share).",
                operation: "Analysieren",
                checkpoint: "Zwischenergebnis.",
            },
            work,
        ),
        (
            PhaseTemplate {
                name: "Sicherung & Transfer",
                description: "Synthese der Ergebnisse und Anwendung.".to_string(),
                teacher: "LP sammelt Ergebnisse im Plenum (Visualizer/Tafel).\n\
                          LP fordert Transfer: «Was bedeutet das für unser Beispiel von vorhin?»"
                    .to_string(),
                child: "SuS präsentieren ihre Ergebnisse kurz und prägnant.\n\
                        SuS verknüpfen das Neue mit dem Bekannten.",
                operation: "Synthetisieren",
                checkpoint: "Präsentation.",
            },
            transfer,
        ),
        (
            PhaseTemplate {
                name: "Abschluss: Meta-View",
                description: "Rückblick und Ausblick.".to_string(),
                teacher: "LP fasst zusammen und gibt einen Ausblick auf die nächste Stunde.".to_string(),
                child: "SuS notieren Hausaufgaben und offene Fragen.",
                operation: "Reflektieren",
                checkpoint: "Exit-Ticket.",
            },
            closing,
        ),
    ]
}

fn build_phases(plan: &Plan, analysis: &LessonAnalysis) -> Vec<Phase> {
    lesson_flow(analysis, plan)
        .into_iter()
        .zip(1..)
        .map(|((template, minutes), id)| template.into_phase(id, minutes))
        .collect()
}

/// Three goals derived from the topic.
pub fn learning_goals(plan: &Plan) -> Vec<String> {
    let analysis = LessonAnalysis::of(plan);
    let topic = if plan.topic_description.trim().is_empty() {
        analysis.topic.as_str()
    } else {
        plan.topic_description.trim()
    };

    vec![
        format!(
            "Die SuS können die Kernmerkmale von «{topic}» analysieren, indem sie fachspezifische \
             Quellen untersuchen und die Zusammenhänge in einer Mindmap strukturieren."
        ),
        format!(
            "Die SuS können beurteilen, inwiefern das Konzept «{}» in Bezug auf {topic} relevant ist.",
            analysis.threshold_concept
        ),
        format!(
            "Die SuS können ihr Wissen auf ein konkretes Fallbeispiel zu {topic} transferieren \
             und begründete Lösungsansätze entwickeln."
        ),
    ]
}

/// Short version built from the lesson flow templates.
pub fn short_version(plan: &Plan) -> ShortVersion {
    let analysis = LessonAnalysis::of(plan);
    let phases_summary = lesson_flow(&analysis, plan)
        .into_iter()
        .map(|(template, minutes)| PhaseSummary {
            name: template.name.to_string(),
            duration_minutes: minutes,
            description: template.description,
        })
        .collect();

    let title = if plan.title.trim().is_empty() {
        let structure = plan
            .didactic_slots
            .slot1
            .map_or_else(|| "Standard".to_string(), |s| s.as_str().to_uppercase());
        format!("{} — {structure}", plan.subject)
    } else {
        plan.title.clone()
    };
    let filled: Vec<String> = plan.filled_goals().into_iter().map(str::to_string).collect();
    let goals = if filled.is_empty() {
        learning_goals(plan)
    } else {
        filled
    };

    let support = plan.class_profile.needs_language_support();
    let differentiation_summary = Differentiation {
        niveau_a: "Basis: Fokus auf Reproduktion und geführte Anwendung.".to_string(),
        niveau_b: "Standard: Selbstständige Bearbeitung mit Transfer-Anteil.".to_string(),
        niveau_c: "Challenge: Metakognitive Reflexion und komplexer Transfer.".to_string(),
        sentence_starters: support.then(|| {
            ["Ich vermute, dass...", "Ein Argument dafür ist...", "Im Vergleich dazu..."]
                .map(String::from)
                .to_vec()
        }),
        word_list: support.then(|| analysis.keywords.clone()),
        access_modes: support.then(|| vec![AccessMode::Text, AccessMode::Visual, AccessMode::Audio]),
        support_hints: support
            .then(|| "Scaffolding durch Visualisierung des Denkprozesses.".to_string()),
    };

    ShortVersion {
        title,
        overview: format!(
            "Diese {}-minütige Lektion basiert auf dem Konzept «{}». Sie folgt dem Prinzip des \
             Backward Design und fokussiert auf kognitive Aktivierung.",
            plan.duration_minutes, analysis.threshold_concept
        ),
        goals,
        phases_summary,
        differentiation_summary,
        language_supports: Some(
            [
                "Wortspeicher mit Fachbegriffen",
                "Satzmuster für Argumentation",
                "Visualisierung der Operatoren",
            ]
            .map(String::from)
            .to_vec(),
        ),
    }
}

/// Detail plan with differentiated phases, diagnosis and rubric.
pub fn detail_plan(plan: &Plan) -> DetailPlan {
    let analysis = LessonAnalysis::of(plan);
    let phases = differentiate_phases(&build_phases(plan, &analysis), plan);

    DetailPlan {
        phases,
        plan_b_included: true,
        reflection_notes: "Reflexion: Wurde das Schwellenkonzept von der Mehrheit verstanden? \
                           War die kognitive Aktivierung hoch genug?"
            .to_string(),
        didactic_diagnosis: Some(DidacticDiagnosis {
            core_concept: analysis.threshold_concept.clone(),
            misconceptions: vec![
                analysis.misconception.clone(),
                "Fehlende Unterscheidung zwischen Ursache und Wirkung".to_string(),
                "Übergeneralisierung von Einzelfällen".to_string(),
            ],
            threshold_concept: analysis.threshold_concept,
            relevance: analysis.relevance,
        }),
        assessment_rubric: Some(rubric()),
    }
}

fn rubric() -> Vec<RubricRow> {
    let row = |criteria: &str, a: &str, b: &str, c: &str| RubricRow {
        criteria: criteria.to_string(),
        level_a: a.to_string(),
        level_b: b.to_string(),
        level_c: c.to_string(),
    };
    vec![
        row(
            "Fachverständnis",
            "Nennt Basisbegriffe korrekt.",
            "Erklärt Zusammenhänge verständlich.",
            "Analysiert komplexe Wechselwirkungen.",
        ),
        row(
            "Methodenkompetenz",
            "Führt Arbeitsschritte nach Anleitung aus.",
            "Plant das Vorgehen selbstständig.",
            "Reflektiert das methodische Vorgehen kritisch.",
        ),
        row(
            "Kommunikation",
            "Verwendet Alltagssprache.",
            "Nutzt Fachbegriffe meist korrekt.",
            "Argumentiert präzise und adressatengerecht.",
        ),
    ]
}

/// Detail plan for one lesson of the skeleton, or `None` if the index is out
/// of range.
pub fn lesson_detail(plan: &Plan, index: usize) -> Option<DetailPlan> {
    lesson_context(plan, index).map(|context| detail_plan(&context))
}

/// Skeleton with position-aware lesson titles and a mid-sequence check.
pub fn sequence_skeleton(plan: &Plan) -> SequenceSkeleton {
    let count = if plan.lesson_count == 0 {
        FALLBACK_LESSON_COUNT
    } else {
        plan.lesson_count
    };
    let subject = [plan.subject.trim(), plan.topic_description.trim()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("Thema");
    let duration = if plan.duration_minutes == 0 {
        FALLBACK_DURATION_MINUTES
    } else {
        plan.duration_minutes
    };
    let check_at = count.div_ceil(2);

    let lessons = (1..=count)
        .map(|n| {
            let (title, focus, goal) = lesson_outline(n, count, subject);
            SequenceLesson {
                id: format!("l-{n}"),
                lesson_number: n,
                title: format!("Lektion {n}: {title}"),
                focus: focus.to_string(),
                goals: vec![goal],
                duration_minutes: duration,
                intermediate_check: (n == check_at).then(|| {
                    "Formative Lernstandserhebung: kurzes Quiz oder Peer-Feedback".to_string()
                }),
                short_version: None,
                detail_plan: None,
            }
        })
        .collect();

    SequenceSkeleton {
        lessons,
        progression: format!(
            "Spiralcurricular: Aufbau von Grundlagen zu «{subject}» über Erarbeitung und \
             Vertiefung bis zur Reflexion und Transfer."
        ),
        overall_goals: vec![
            format!("Die SuS können «{subject}» in seinen Grundzügen erklären."),
            "Die SuS können das Gelernte auf neue Situationen anwenden.".to_string(),
        ],
    }
}

fn lesson_outline(n: u32, count: u32, subject: &str) -> (String, &'static str, String) {
    if n == 1 {
        (
            format!("Einstieg: {subject} entdecken"),
            "Vorwissen aktivieren & Problemstellung erschliessen",
            format!("Die SuS können ihr Vorwissen zu «{subject}» aktivieren und eigene Fragen formulieren."),
        )
    } else if n == count {
        (
            format!("Abschluss: {subject} reflektieren"),
            "Transfer, Reflexion & Lernprodukt sichern",
            format!(
                "Die SuS können das Gelernte zu «{subject}» auf eine neue Situation übertragen \
                 und ihren Lernprozess reflektieren."
            ),
        )
    } else if n == 2 {
        (
            format!("Grundlagen: {subject} erarbeiten"),
            "Basiswissen erarbeiten & strukturieren",
            format!("Die SuS können die Grundbegriffe und -konzepte zu «{subject}» erklären."),
        )
    } else if n == count - 1 {
        (
            format!("Vertiefung: {subject} anwenden"),
            "Anwendung in komplexeren Kontexten",
            format!("Die SuS können die erarbeiteten Konzepte zu «{subject}» auf neue Probleme anwenden."),
        )
    } else {
        (
            format!("Erarbeitung {}: {subject} vertiefen", n - 1),
            "Systematische Erarbeitung & Übung",
            format!("Die SuS können Teilaspekte von «{subject}» eigenständig erarbeiten und üben."),
        )
    }
}

/// Applies keyword-driven adjustments to a detail plan.
///
/// Recognized requests: shortening, group work, a closing quiz, digital
/// devices and extra differentiation. Several may apply at once; unknown
/// instructions leave the plan unchanged.
pub fn refine_detail_plan(current: &DetailPlan, instruction: &str) -> DetailPlan {
    let lower = instruction.to_lowercase();
    let wants = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));
    let mut refined = current.clone();

    if wants(&["kürz", "kurz", "schneller"]) {
        if let Some(longest) = refined.phases.iter().map(|p| p.duration_minutes).max() {
            if let Some(phase) = refined.phases.iter_mut().find(|p| p.duration_minutes == longest) {
                phase.duration_minutes = share(longest, 0.6).max(MIN_SHORTENED_MINUTES);
                phase.description.push_str(" (gekürzt)");
            }
        }
    }

    if wants(&["gruppenarbeit", "gruppe", "kooperativ"]) {
        for phase in refined.phases.iter_mut().filter(|p| {
            let name = p.name.to_lowercase();
            !name.contains("einstieg") && !name.contains("abschluss")
        }) {
            phase.social_form = Some("Gruppenarbeit (3–4 SuS)".to_string());
            if let Some(actions) = phase.teacher_actions.as_mut() {
                *actions = WHOLE_CLASS_FORMS.replace_all(actions, "Gruppenarbeit").into_owned();
            }
        }
    }

    if wants(&["quiz", "test", "prüf"]) {
        if let Some(last) = refined.phases.last_mut() {
            last.description
                .push_str(" Inkl. kurzes formatives Quiz zur Lernstandserhebung.");
        }
    }

    if wants(&["digital", "tablet", "app"]) {
        for phase in &mut refined.phases {
            if !phase.materials.iter().any(|m| m.to_lowercase().contains("tablet")) {
                phase.materials.push("Tablets / digitale Endgeräte".to_string());
            }
        }
    }

    if wants(&["differenz", "niveau"]) {
        for phase in &mut refined.phases {
            phase
                .differentiation
                .niveau_a
                .push_str(" Mit zusätzlichem Scaffolding und Hilfsstruktur.");
            phase
                .differentiation
                .niveau_c
                .push_str(" Erweiterte Vertiefungsaufgabe.");
        }
    }

    refined
}

/// Revision without the service keeps the teacher's edited version.
pub fn revise_short_version(edited: &ShortVersion) -> ShortVersion {
    edited.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Heterogeneity, LanguageLevel, Level, PlanMode};

    fn plan(duration: u32, structure: Option<StructureModel>) -> Plan {
        let mut plan = Plan {
            subject: "Physik".to_string(),
            topic_description: "Elektrischer Stromkreis".to_string(),
            level: Some(Level::LowerSecondary),
            duration_minutes: duration,
            ..Default::default()
        };
        plan.didactic_slots.slot1 = structure;
        plan
    }

    #[test]
    fn test_phase_durations_sum_to_lesson_length() {
        for structure in [None, Some(StructureModel::Aviva), Some(StructureModel::FiveE)] {
            for duration in [1, 3, 20, 45, 60, 90, 135] {
                let detail = detail_plan(&plan(duration, structure));
                assert_eq!(detail.total_minutes(), duration, "{structure:?} {duration}");
                let short = short_version(&plan(duration, structure));
                assert_eq!(short.total_minutes(), duration, "{structure:?} {duration}");
            }
        }
    }

    #[test]
    fn test_aviva_has_five_phases_and_standard_four() {
        assert_eq!(detail_plan(&plan(45, Some(StructureModel::Aviva))).phases.len(), 5);
        assert_eq!(detail_plan(&plan(45, None)).phases.len(), 4);

        let standard = detail_plan(&plan(45, None));
        let minutes: Vec<u32> = standard.phases.iter().map(|p| p.duration_minutes).collect();
        assert_eq!(minutes, vec![7, 19, 12, 7]);
        assert_eq!(standard.phases[0].name, "7' Einstieg: Kognitive Dissonanz");
        assert_eq!(standard.phases[1].social_form.as_deref(), Some("Partner-/Gruppenarbeit"));
    }

    #[test]
    fn test_detail_plan_uses_context_analysis() {
        let detail = detail_plan(&plan(45, None));
        let diagnosis = detail.didactic_diagnosis.unwrap();
        assert_eq!(diagnosis.threshold_concept, "Der geschlossene Stromkreis und der Energiefluss");
        assert_eq!(diagnosis.misconceptions.len(), 3);
        assert_eq!(detail.assessment_rubric.unwrap().len(), 3);
        assert!(detail.plan_b_included);
    }

    #[test]
    fn test_detail_phases_are_differentiated() {
        let mut plan = plan(45, None);
        plan.class_profile.language_level = LanguageLevel::A2;
        let detail = detail_plan(&plan);
        assert!(detail
            .phases
            .iter()
            .all(|p| p.differentiation.niveau_b.starts_with("Standardausführung: ")
                && p.differentiation.sentence_starters.is_some()));
    }

    #[test]
    fn test_short_version_goals_and_title() {
        let mut plan = plan(45, None);
        let short = short_version(&plan);
        assert_eq!(short.goals.len(), 3);
        assert_eq!(short.title, "Physik — Standard");

        plan.goals = vec!["Die SuS können einen Stromkreis bauen.".to_string()];
        plan.title = "Strom im Alltag".to_string();
        let short = short_version(&plan);
        assert_eq!(short.goals, vec!["Die SuS können einen Stromkreis bauen."]);
        assert_eq!(short.title, "Strom im Alltag");
    }

    #[test]
    fn test_short_version_language_fields_follow_class_profile() {
        let mut plan = plan(45, None);
        assert!(short_version(&plan).differentiation_summary.word_list.is_none());

        plan.class_profile.heterogeneity = Heterogeneity::High;
        let summary = short_version(&plan).differentiation_summary;
        assert!(summary.sentence_starters.is_some());
        assert_eq!(
            summary.word_list,
            Some(vec!["physik".to_string(), "elektrischer".to_string(), "stromkreis".to_string()])
        );
    }

    #[test]
    fn test_sequence_skeleton_outline() {
        let mut plan = plan(50, None);
        plan.mode = PlanMode::Sequence;
        plan.lesson_count = 5;
        let skeleton = sequence_skeleton(&plan);

        assert_eq!(skeleton.lessons.len(), 5);
        let titles: Vec<&str> = skeleton.lessons.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Lektion 1: Einstieg: Physik entdecken",
                "Lektion 2: Grundlagen: Physik erarbeiten",
                "Lektion 3: Erarbeitung 2: Physik vertiefen",
                "Lektion 4: Vertiefung: Physik anwenden",
                "Lektion 5: Abschluss: Physik reflektieren",
            ]
        );
        let checks: Vec<bool> = skeleton
            .lessons
            .iter()
            .map(|l| l.intermediate_check.is_some())
            .collect();
        assert_eq!(checks, vec![false, false, true, false, false]);
        assert!(skeleton.lessons.iter().all(|l| l.duration_minutes == 50));
        assert_eq!(skeleton.lessons[4].id, "l-5");
    }

    #[test]
    fn test_lesson_detail_uses_lesson_context() {
        let mut plan = plan(45, None);
        plan.mode = PlanMode::Sequence;
        plan.lesson_count = 3;
        let mut skeleton = sequence_skeleton(&plan);
        skeleton.lessons[1].duration_minutes = 60;
        plan.sequence_skeleton = Some(skeleton);

        let detail = lesson_detail(&plan, 1).unwrap();
        assert_eq!(detail.total_minutes(), 60);
        assert!(lesson_detail(&plan, 3).is_none());
    }

    #[test]
    fn test_refine_shortens_first_longest_phase() {
        let current = detail_plan(&plan(45, None));
        let refined = refine_detail_plan(&current, "Mach es bitte kürzer");
        assert_eq!(refined.phases[1].duration_minutes, 11);
        assert!(refined.phases[1].description.ends_with(" (gekürzt)"));
        assert_eq!(refined.phases[0], current.phases[0]);
    }

    #[test]
    fn test_refine_group_work_skips_opening_and_closing() {
        let current = detail_plan(&plan(45, None));
        let refined = refine_detail_plan(&current, "Mehr Gruppenarbeit");
        assert_eq!(refined.phases[0].social_form, current.phases[0].social_form);
        assert_eq!(refined.phases[2].social_form.as_deref(), Some("Gruppenarbeit (3–4 SuS)"));
        assert!(refined.phases[2]
            .teacher_actions
            .as_deref()
            .unwrap()
            .contains("im Gruppenarbeit"));
        assert_eq!(refined.phases[3].social_form, current.phases[3].social_form);
    }

    #[test]
    fn test_refine_quiz_digital_and_differentiation() {
        let current = detail_plan(&plan(45, None));
        let refined = refine_detail_plan(&current, "Quiz am Ende, digital mit Tablet, mehr Niveau");
        let last = refined.phases.last().unwrap();
        assert!(last.description.contains("formatives Quiz"));
        assert!(refined
            .phases
            .iter()
            .all(|p| p.materials.contains(&"Tablets / digitale Endgeräte".to_string())));
        assert!(refined.phases[0]
            .differentiation
            .niveau_c
            .ends_with("Erweiterte Vertiefungsaufgabe."));

        let twice = refine_detail_plan(&refined, "digital");
        assert_eq!(twice.phases[0].materials.len(), refined.phases[0].materials.len());
    }

    #[test]
    fn test_refine_ignores_unknown_instructions() {
        let current = detail_plan(&plan(45, None));
        assert_eq!(refine_detail_plan(&current, "Bitte schöner"), current);
    }
}

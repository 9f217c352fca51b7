//! Format-neutral document structure of an exported plan.

use crate::models::{DetailPlan, Plan, PlanMode, SequenceLesson};

const MAX_COMPETENCY_CHARS: usize = 80;
const EMPTY_CELL: &str = "—";

/// One structural element of the exported document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block {
    Heading(u8, String),
    Paragraph(String),
    Bullets(Vec<String>),
    Table {
        headers: Vec<&'static str>,
        rows: Vec<Vec<String>>,
    },
}

impl Block {
    fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading(level, text.into())
    }

    fn table(headers: &[&'static str], rows: Vec<Vec<String>>) -> Self {
        Block::Table {
            headers: headers.to_vec(),
            rows,
        }
    }
}

/// Title of the exported document.
pub(crate) fn document_title(plan: &Plan) -> String {
    if let Some(short) = plan.short_version.as_ref().filter(|s| !s.title.trim().is_empty()) {
        return short.title.clone();
    }
    if !plan.title.trim().is_empty() {
        return plan.title.clone();
    }
    format!("{} — Planung", plan.subject)
}

fn or_empty(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => EMPTY_CELL.to_string(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}…")
    } else {
        text.to_string()
    }
}

/// Builds the ordered block list for `plan`.
pub(crate) fn document_blocks(plan: &Plan) -> Vec<Block> {
    let mut blocks = vec![Block::table(&["Feld", "Wert"], metadata_rows(plan))];

    let goals: Vec<String> = plan.filled_goals().into_iter().map(str::to_string).collect();
    if !goals.is_empty() {
        blocks.push(Block::heading(2, "Lernziele"));
        blocks.push(Block::Bullets(goals));
    }

    if !plan.curriculum_mappings.is_empty() {
        blocks.push(Block::heading(2, "Lehrplan-Kompetenzen"));
        let rows = plan
            .curriculum_mappings
            .iter()
            .map(|m| {
                vec![
                    m.competency_code.clone(),
                    truncate(&m.competency_text, MAX_COMPETENCY_CHARS),
                    m.area.clone(),
                    format!("{}%", (m.confidence_score * 100.0).round()),
                    if m.confirmed { "ja" } else { "nein" }.to_string(),
                ]
            })
            .collect();
        blocks.push(Block::table(
            &["Code", "Kompetenz", "Bereich", "Konfidenz", "Bestätigt"],
            rows,
        ));
    }

    if let Some(short) = &plan.short_version {
        blocks.push(Block::heading(2, "Kurzversion: Phasenübersicht"));
        if !short.overview.trim().is_empty() {
            blocks.push(Block::Paragraph(short.overview.clone()));
        }
        let rows = short
            .phases_summary
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    format!("{} Min", p.duration_minutes),
                    p.description.clone(),
                ]
            })
            .collect();
        blocks.push(Block::table(&["Phase", "Dauer", "Beschreibung"], rows));
    }

    match plan.mode {
        PlanMode::Single => {
            if let Some(detail) = &plan.detail_plan {
                blocks.push(Block::heading(2, "Detailplanung: Unterrichtsverlauf"));
                detail_blocks(detail, 3, &mut blocks);
            }
        }
        PlanMode::Sequence => {
            if let Some(skeleton) = &plan.sequence_skeleton {
                blocks.push(Block::heading(2, "Sequenzübersicht"));
                if !skeleton.progression.trim().is_empty() {
                    blocks.push(Block::Paragraph(skeleton.progression.clone()));
                }
                let rows = skeleton
                    .lessons
                    .iter()
                    .map(|l| {
                        vec![
                            l.lesson_number.to_string(),
                            l.title.clone(),
                            l.focus.clone(),
                            format!("{} Min", l.duration_minutes),
                            or_empty(l.intermediate_check.as_deref()),
                        ]
                    })
                    .collect();
                blocks.push(Block::table(
                    &["Nr.", "Titel", "Fokus", "Dauer", "Zwischencheck"],
                    rows,
                ));
                if !skeleton.overall_goals.is_empty() {
                    blocks.push(Block::heading(3, "Übergeordnete Ziele"));
                    blocks.push(Block::Bullets(skeleton.overall_goals.clone()));
                }
                for lesson in &skeleton.lessons {
                    lesson_blocks(lesson, &mut blocks);
                }
            }
        }
    }

    if let Some(short) = &plan.short_version {
        let d = &short.differentiation_summary;
        blocks.push(Block::heading(2, "Zusammenfassende Differenzierung"));
        blocks.push(Block::table(
            &["Niveau", "Beschreibung"],
            vec![
                vec!["A (Basis)".to_string(), d.niveau_a.clone()],
                vec!["B (Standard)".to_string(), d.niveau_b.clone()],
                vec!["C (Challenge)".to_string(), d.niveau_c.clone()],
            ],
        ));
        if let Some(supports) = short.language_supports.as_ref().filter(|s| !s.is_empty()) {
            blocks.push(Block::heading(2, "Sprachliche Unterstützung"));
            blocks.push(Block::Bullets(supports.clone()));
        }
    }

    blocks
}

fn metadata_rows(plan: &Plan) -> Vec<Vec<String>> {
    let row = |field: &str, value: String| vec![field.to_string(), value];
    let profile = &plan.class_profile;

    let mut rows = vec![
        row("Modus", plan.mode.label().to_string()),
        row("Fach / Thema", or_empty(Some(&plan.subject))),
    ];
    if !plan.topic_description.trim().is_empty() {
        rows.push(row("Thema", plan.topic_description.clone()));
    }
    rows.push(row("Stufe", or_empty(plan.level.map(|l| l.label()))));
    rows.push(row("Dauer", format!("{} Minuten", plan.duration_minutes)));
    if plan.mode == PlanMode::Sequence {
        rows.push(row("Lektionen", plan.lesson_count.to_string()));
    }
    rows.push(row("Klassengrösse", format!("{} SuS", profile.class_size)));
    rows.push(row("Heterogenität", profile.heterogeneity.label().to_string()));
    rows.push(row("Sprachstand", profile.language_level.label().to_string()));
    if let Some(goal_type) = plan.learning_goal_type {
        rows.push(row("Lernzieltyp", goal_type.label().to_string()));
    }
    let slots = &plan.didactic_slots;
    if let Some(slot) = slots.slot1 {
        rows.push(row("Strukturmodell", slot.label().to_string()));
    }
    if let Some(slot) = slots.slot2 {
        rows.push(row("Lernmodus", slot.label().to_string()));
    }
    if let Some(slot) = slots.slot3 {
        rows.push(row("Qualitätsebene", slot.label().to_string()));
    }
    if !plan.special_needs.trim().is_empty() {
        rows.push(row("Besondere Hinweise", plan.special_needs.clone()));
    }
    rows.push(row("Status", plan.status.label().to_string()));
    rows
}

fn lesson_blocks(lesson: &SequenceLesson, blocks: &mut Vec<Block>) {
    let Some(detail) = &lesson.detail_plan else {
        return;
    };
    blocks.push(Block::heading(
        2,
        format!("Lektion {}: {}", lesson.lesson_number, lesson.title),
    ));
    blocks.push(Block::Paragraph(format!(
        "Fokus: {} · {} Min",
        lesson.focus, lesson.duration_minutes
    )));
    if !lesson.goals.is_empty() {
        blocks.push(Block::heading(3, "Lernziele"));
        blocks.push(Block::Bullets(lesson.goals.clone()));
    }
    blocks.push(Block::heading(3, "Unterrichtsverlauf"));
    detail_blocks(detail, 4, blocks);
}

fn detail_blocks(detail: &DetailPlan, level: u8, blocks: &mut Vec<Block>) {
    let course = detail
        .phases
        .iter()
        .map(|p| {
            let step = match p.didactic_comment.as_deref().map(str::trim) {
                Some(comment) if !comment.is_empty() => format!("{}\n\n{comment}", p.name),
                _ => p.name.clone(),
            };
            vec![
                format!("{}'", p.duration_minutes),
                step,
                or_empty(p.teacher_actions.as_deref()),
                or_empty(p.child_actions.as_deref()),
                or_empty(p.social_form.as_deref()),
                or_empty(Some(&p.materials.join(", "))),
            ]
        })
        .collect();
    blocks.push(Block::table(
        &[
            "Zeit",
            "Teilschritte und didaktischer Kommentar",
            "Tätigkeit der Lehrperson",
            "Tätigkeit der Kinder",
            "Sozialform",
            "Material / Medien",
        ],
        course,
    ));

    blocks.push(Block::heading(level, "Differenzierung & Support"));
    let tiers = detail
        .phases
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.differentiation.niveau_a.clone(),
                p.differentiation.niveau_b.clone(),
                p.differentiation.niveau_c.clone(),
            ]
        })
        .collect();
    blocks.push(Block::table(
        &["Phase", "A (Basis)", "B (Standard)", "C (Challenge)"],
        tiers,
    ));

    let supports: Vec<Vec<String>> = detail
        .phases
        .iter()
        .filter(|p| p.differentiation.has_language_support())
        .map(|p| {
            let d = &p.differentiation;
            vec![
                p.name.clone(),
                or_empty(d.sentence_starters.as_ref().map(|s| s.join(" / ")).as_deref()),
                or_empty(d.word_list.as_ref().map(|w| w.join(", ")).as_deref()),
                or_empty(d.support_hints.as_deref()),
            ]
        })
        .collect();
    if !supports.is_empty() {
        blocks.push(Block::heading(level, "Sprachliche Unterstützung"));
        blocks.push(Block::table(
            &["Phase", "Satzanfänge", "Wortliste", "Hinweis"],
            supports,
        ));
    }

    if detail.plan_b_included {
        let alternatives: Vec<Vec<String>> = detail
            .phases
            .iter()
            .filter_map(|p| {
                p.plan_b_alternative
                    .as_ref()
                    .filter(|alt| !alt.trim().is_empty())
                    .map(|alt| vec![p.name.clone(), alt.clone()])
            })
            .collect();
        if !alternatives.is_empty() {
            blocks.push(Block::heading(level, "Plan B: Alternativen"));
            blocks.push(Block::table(
                &["Phase", "Alternative Vorgehensweise"],
                alternatives,
            ));
        }
    }

    if let Some(diagnosis) = &detail.didactic_diagnosis {
        blocks.push(Block::heading(level, "Didaktische Diagnose"));
        let mut items = vec![
            format!("Kernkonzept: {}", diagnosis.core_concept),
            format!("Schwellenkonzept: {}", diagnosis.threshold_concept),
            format!("Relevanz: {}", diagnosis.relevance),
        ];
        items.extend(
            diagnosis
                .misconceptions
                .iter()
                .map(|m| format!("Fehlvorstellung: {m}")),
        );
        blocks.push(Block::Bullets(items));
    }

    if let Some(rubric) = detail.assessment_rubric.as_ref().filter(|r| !r.is_empty()) {
        blocks.push(Block::heading(level, "Beurteilungsraster"));
        let rows = rubric
            .iter()
            .map(|r| {
                vec![
                    r.criteria.clone(),
                    r.level_a.clone(),
                    r.level_b.clone(),
                    r.level_c.clone(),
                ]
            })
            .collect();
        blocks.push(Block::table(
            &["Kriterium", "Niveau A", "Niveau B", "Niveau C"],
            rows,
        ));
    }

    if !detail.reflection_notes.trim().is_empty() {
        blocks.push(Block::heading(level, "Reflexion"));
        blocks.push(Block::Paragraph(detail.reflection_notes.clone()));
    }
}

//! Markdown rendering of the export document.

use jiff::Timestamp;

use super::document::{document_blocks, document_title, Block};
use crate::{display::LocalDateTime, models::Plan};

/// Escapes a table cell so it stays on one row.
fn cell(text: &str) -> String {
    text.trim()
        .replace('|', "\\|")
        .replace("\r\n", "\n")
        .replace('\n', "<br>")
}

fn push_table(out: &mut String, headers: &[&str], rows: &[Vec<String>]) {
    out.push_str(&format!("| {} |\n", headers.join(" | ")));
    out.push_str(&format!("|{}\n", "---|".repeat(headers.len())));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| cell(c)).collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out.push('\n');
}

/// Renders `plan` as a GitHub flavoured Markdown document.
pub fn render_markdown(plan: &Plan, generated_at: &Timestamp) -> String {
    let mut out = format!(
        "# {}\n\n_PlanPilot · erstellt am {}_\n\n",
        document_title(plan),
        LocalDateTime(generated_at)
    );

    for block in document_blocks(plan) {
        match block {
            Block::Heading(level, text) => {
                out.push_str(&format!("{} {text}\n\n", "#".repeat(usize::from(level))));
            }
            Block::Paragraph(text) => {
                out.push_str(text.trim());
                out.push_str("\n\n");
            }
            Block::Bullets(items) => {
                for item in items {
                    out.push_str(&format!("- {}\n", item.trim()));
                }
                out.push('\n');
            }
            Block::Table { headers, rows } => push_table(&mut out, &headers, &rows),
        }
    }

    out.truncate(out.trim_end().len());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        generation::fallback,
        models::{CurriculumMapping, Level, PlanMode},
    };

    fn plan() -> Plan {
        Plan {
            title: "Brüche addieren".to_string(),
            subject: "Mathematik".to_string(),
            level: Some(Level::Primary),
            goals: vec!["Die SuS addieren gleichnamige Brüche.".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_plan_has_title_and_metadata() {
        let text = render_markdown(&plan(), &Timestamp::UNIX_EPOCH);

        assert!(text.starts_with("# Brüche addieren\n"));
        assert!(text.contains("| Feld | Wert |"));
        assert!(text.contains("| Fach / Thema | Mathematik |"));
        assert!(text.contains("## Lernziele"));
        assert!(text.contains("- Die SuS addieren gleichnamige Brüche."));
        assert!(!text.contains("Kurzversion"));
        assert!(text.ends_with('\n') && !text.ends_with("\n\n"));
    }

    #[test]
    fn test_table_cells_escape_pipes_and_newlines() {
        assert_eq!(cell("a | b\nc"), "a \\| b<br>c");
    }

    #[test]
    fn test_competency_text_is_truncated() {
        let mut plan = plan();
        plan.curriculum_mappings.push(CurriculumMapping {
            competency_id: "x".to_string(),
            competency_code: "MA.1.A.1".to_string(),
            competency_text: "k".repeat(100),
            area: "Mathematik".to_string(),
            confidence_score: 0.456,
            confirmed: true,
        });
        let text = render_markdown(&plan, &Timestamp::UNIX_EPOCH);

        assert!(text.contains(&format!("| MA.1.A.1 | {}… | Mathematik | 46% | ja |", "k".repeat(80))));
    }

    #[test]
    fn test_single_plan_with_detail_sections() {
        let mut plan = plan();
        plan.short_version = Some(fallback::short_version(&plan));
        plan.detail_plan = Some(fallback::detail_plan(&plan));
        let text = render_markdown(&plan, &Timestamp::UNIX_EPOCH);

        for heading in [
            "## Kurzversion: Phasenübersicht",
            "## Detailplanung: Unterrichtsverlauf",
            "### Differenzierung & Support",
            "### Plan B: Alternativen",
            "### Didaktische Diagnose",
            "### Beurteilungsraster",
            "## Zusammenfassende Differenzierung",
        ] {
            assert!(text.contains(heading), "missing {heading}");
        }
        assert!(!text.contains("## Sequenzübersicht"));
    }

    #[test]
    fn test_sequence_plan_lists_lessons() {
        let mut plan = plan();
        plan.mode = PlanMode::Sequence;
        plan.lesson_count = 4;
        let mut skeleton = fallback::sequence_skeleton(&plan);
        skeleton.lessons[0].detail_plan = fallback::lesson_detail(&plan, 0);
        plan.sequence_skeleton = Some(skeleton);
        let text = render_markdown(&plan, &Timestamp::UNIX_EPOCH);

        assert!(text.contains("| Lektionen | 4 |"));
        assert!(text.contains("## Sequenzübersicht"));
        assert!(text.contains("## Lektion 1:"));
        assert!(!text.contains("## Lektion 2:"));
        assert!(!text.contains("## Detailplanung"));
    }
}

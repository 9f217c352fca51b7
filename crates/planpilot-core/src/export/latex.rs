//! LaTeX rendering of the export document.

use jiff::Timestamp;

use super::document::{document_blocks, document_title, Block};
use crate::{display::LocalDateTime, models::Plan};

pub fn default_latex_template() -> &'static str {
    r#"\documentclass[10pt,a4paper]{article}
\usepackage[utf8]{inputenc}
\usepackage[T1]{fontenc}
\usepackage[ngerman]{babel}
\usepackage[margin=18mm]{geometry}
\usepackage{array}
\usepackage{longtable}
\title{{{TITLE}}}
\author{PlanPilot}
\date{{{GENERATED_AT}}}
\begin{document}
\maketitle

{{BODY}}
\end{document}
"#
}

/// Escapes text for use inside a LaTeX document body.
pub fn latex_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '$' => out.push_str("\\$"),
            '&' => out.push_str("\\&"),
            '#' => out.push_str("\\#"),
            '^' => out.push_str("\\^{}"),
            '_' => out.push_str("\\_"),
            '%' => out.push_str("\\%"),
            '~' => out.push_str("\\~{}"),
            '\u{2014}' => out.push_str("---"),
            '\u{2013}' => out.push_str("--"),
            '\u{201C}' | '\u{201E}' => out.push_str("``"),
            '\u{201D}' => out.push_str("''"),
            '\u{2018}' => out.push('`'),
            '\u{2019}' => out.push('\''),
            '\u{2026}' => out.push_str("\\ldots{}"),
            '\u{2192}' => out.push_str("$\\rightarrow$"),
            '\u{00B7}' => out.push_str("\\textperiodcentered{}"),
            _ => out.push(c),
        }
    }
    out
}

fn cell(text: &str) -> String {
    text.trim()
        .split('\n')
        .map(|line| latex_escape(line.trim()))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" \\newline ")
}

fn heading_command(level: u8) -> &'static str {
    match level {
        0..=2 => "section*",
        3 => "subsection*",
        _ => "subsubsection*",
    }
}

fn push_table(out: &mut String, headers: &[&str], rows: &[Vec<String>]) {
    let columns = headers.len().max(1);
    let width = 0.94 / columns as f64;
    let spec = format!(">{{\\raggedright\\arraybackslash}}p{{{width:.3}\\linewidth}}").repeat(columns);

    out.push_str(&format!("\\begin{{longtable}}{{{spec}}}\n\\hline\n"));
    let head: Vec<String> = headers
        .iter()
        .map(|h| format!("\\textbf{{{}}}", latex_escape(h)))
        .collect();
    out.push_str(&format!("{} \\\\\n\\hline\n\\endhead\n", head.join(" & ")));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| cell(c)).collect();
        out.push_str(&format!("{} \\\\\n\\hline\n", cells.join(" & ")));
    }
    out.push_str("\\end{longtable}\n\n");
}

fn render_body(plan: &Plan) -> String {
    let mut body = String::new();
    for block in document_blocks(plan) {
        match block {
            Block::Heading(level, text) => {
                body.push_str(&format!(
                    "\\{}{{{}}}\n\n",
                    heading_command(level),
                    latex_escape(&text)
                ));
            }
            Block::Paragraph(text) => {
                body.push_str(&latex_escape(text.trim()));
                body.push_str("\n\n");
            }
            Block::Bullets(items) => {
                body.push_str("\\begin{itemize}\n");
                for item in items {
                    body.push_str(&format!("  \\item {}\n", latex_escape(item.trim())));
                }
                body.push_str("\\end{itemize}\n\n");
            }
            Block::Table { headers, rows } => push_table(&mut body, &headers, &rows),
        }
    }
    body
}

/// Renders `plan` as a standalone LaTeX article.
pub fn render_latex(plan: &Plan, generated_at: &Timestamp) -> String {
    default_latex_template()
        .replace("{{TITLE}}", &latex_escape(&document_title(plan)))
        .replace(
            "{{GENERATED_AT}}",
            &latex_escape(&LocalDateTime(generated_at).to_string()),
        )
        .replace("{{BODY}}", &render_body(plan))
}

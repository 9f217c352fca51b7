//! Parsing of teacher-supplied curriculum files.
//!
//! Only plain-text formats are read: `.csv` with one competency per row and
//! `.txt` with one competency per line.

use std::{path::Path, sync::LazyLock};

use regex::Regex;

use crate::{
    error::{PilotError, Result},
    models::{Competency, CurriculumSource},
};

static LEADING_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]{1,4}\.\d+\.[A-Z]\.\d+|[A-Z]{1,4}\.\d+\.\d+)").expect("valid code regex")
});
static CODE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[:\-–]\s*").expect("valid separator regex"));

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Txt,
}

impl UploadFormat {
    /// Picks the format from the file extension, rejecting anything but
    /// `.csv` and `.txt`.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(UploadFormat::Csv),
            "txt" => Ok(UploadFormat::Txt),
            other => Err(PilotError::upload(file_name).with_reason(format!(
                "Dateityp \".{other}\" wird noch nicht unterstützt. Bitte TXT oder CSV verwenden."
            ))),
        }
    }
}

/// Parses an uploaded curriculum file into competencies.
///
/// A file that yields no competencies is rejected so no partial state is
/// produced.
pub fn parse_curriculum_upload(file_name: &str, contents: &str) -> Result<Vec<Competency>> {
    let prefix = id_prefix(file_name);
    let competencies = match UploadFormat::from_file_name(file_name)? {
        UploadFormat::Csv => parse_csv(&prefix, contents),
        UploadFormat::Txt => parse_txt(&prefix, contents),
    };

    if competencies.is_empty() {
        return Err(PilotError::upload(file_name)
            .with_reason("Keine Kompetenzen in der Datei gefunden."));
    }
    log::debug!("Parsed {} competencies from {file_name}", competencies.len());
    Ok(competencies)
}

/// Id prefix derived from the file stem, so competencies from different
/// files never share an id.
fn id_prefix(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_lowercase();
    let slug = stem
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "upload".to_string()
    } else {
        format!("upload-{slug}")
    }
}

fn non_blank_lines(contents: &str) -> Vec<&str> {
    contents.lines().filter(|l| !l.trim().is_empty()).collect()
}

fn parse_csv(prefix: &str, contents: &str) -> Vec<Competency> {
    let lines = non_blank_lines(contents);
    let has_header = lines.first().is_some_and(|first| {
        let first = first.to_lowercase();
        first.contains("code") || first.contains("kompetenz")
    });
    let start = usize::from(has_header);

    lines
        .iter()
        .enumerate()
        .skip(start)
        .filter_map(|(i, line)| {
            let cols: Vec<String> = line
                .split([';', ',', '\t'])
                .map(|c| c.trim().trim_start_matches('"').trim_end_matches('"').to_string())
                .collect();
            if cols.len() < 2 {
                return None;
            }

            let col = |n: usize| cols.get(n).filter(|c| !c.is_empty()).cloned();
            let competency = col(3)
                .or_else(|| col(1))
                .unwrap_or_else(|| cols[0].clone());
            let level_indicators = col(4)
                .map(|raw| raw.split('|').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default();

            Some(Competency {
                id: format!("{prefix}-{i}"),
                code: col(0).unwrap_or_else(|| format!("U.{i}")),
                area: col(1).unwrap_or_else(|| "Custom".to_string()),
                competency_area: col(2).unwrap_or_else(|| "Allgemein".to_string()),
                competency,
                cycle: None,
                level_indicators,
                source: CurriculumSource::CustomUpload,
            })
        })
        .collect()
}

fn parse_txt(prefix: &str, contents: &str) -> Vec<Competency> {
    non_blank_lines(contents)
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let line = raw.trim();
            if line.starts_with('#') || line.starts_with("//") {
                return None;
            }

            let (code, text) = match LEADING_CODE.find(line) {
                Some(m) => {
                    let rest = line[m.end()..].trim();
                    (m.as_str().to_string(), CODE_SEPARATOR.replace(rest, "").into_owned())
                }
                None => (format!("U.{}", i + 1), line.to_string()),
            };

            Some(Competency {
                id: format!("{prefix}-{i}"),
                code,
                area: "Upload".to_string(),
                competency_area: "Benutzerdefiniert".to_string(),
                competency: text,
                cycle: None,
                level_indicators: Vec::new(),
                source: CurriculumSource::CustomUpload,
            })
        })
        .collect()
}

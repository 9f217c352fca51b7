//! Free-text search and plan-driven suggestions over a [`Catalog`].

use crate::models::{Competency, CurriculumMapping, Plan};

use super::Catalog;

/// Maximum number of suggestions returned by [`auto_suggest`].
pub const MAX_SUGGESTIONS: usize = 5;
/// Suggestions below this confidence are dropped.
pub const MIN_SUGGESTION_CONFIDENCE: f64 = 0.15;
/// Upper bound for a suggestion's confidence.
pub const MAX_SUGGESTION_CONFIDENCE: f64 = 0.95;

const CODE_SCORE: u32 = 10;
const AREA_SCORE: u32 = 5;
const TEXT_SCORE: u32 = 1;

/// A competency proposed for the plan with its confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetencySuggestion {
    pub competency: Competency,
    pub confidence: f64,
}

impl CompetencySuggestion {
    pub fn to_mapping(&self) -> CurriculumMapping {
        CurriculumMapping::new(&self.competency, self.confidence)
    }
}

/// Searches the catalog.
///
/// `area` and `cycle` narrow the pool first. An empty query returns the
/// narrowed pool in catalog order; otherwise every whitespace-separated term
/// scores each competency and zero-score entries are dropped. Equal scores
/// keep catalog order.
pub fn search(
    catalog: &Catalog,
    query: &str,
    area: Option<&str>,
    cycle: Option<&str>,
) -> Vec<Competency> {
    let pool: Vec<&Competency> = catalog
        .competencies()
        .iter()
        .filter(|c| area.map_or(true, |a| c.area.to_lowercase() == a.trim().to_lowercase()))
        .filter(|c| cycle.map_or(true, |z| c.cycle.as_deref() == Some(z.trim())))
        .collect();

    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return pool.into_iter().cloned().collect();
    }
    let terms: Vec<&str> = query.split_whitespace().collect();

    let mut scored: Vec<(u32, &Competency)> = pool
        .into_iter()
        .map(|c| (score(c, &terms), c))
        .filter(|(score, _)| *score > 0)
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored.into_iter().map(|(_, c)| c.clone()).collect()
}

fn score(competency: &Competency, terms: &[&str]) -> u32 {
    let code = competency.code.to_lowercase();
    let area = competency.area.to_lowercase();
    let competency_area = competency.competency_area.to_lowercase();
    let text = competency.search_text();

    terms
        .iter()
        .map(|term| {
            if code.contains(term) {
                CODE_SCORE
            } else if area.contains(term) || competency_area.contains(term) {
                AREA_SCORE
            } else if text.contains(term) {
                TEXT_SCORE
            } else {
                0
            }
        })
        .sum()
}

/// Proposes up to five competencies that fit the plan's context.
///
/// The pool is the cycle matching the plan's level, or the whole catalog
/// when no level is set.
pub fn auto_suggest(catalog: &Catalog, plan: &Plan) -> Vec<CompetencySuggestion> {
    let cycle = plan.level.map(|level| level.cycle());
    let context = format!(
        "{} {} {} {}",
        plan.subject,
        plan.topic_description,
        plan.special_needs,
        plan.goals.join(" ")
    )
    .to_lowercase();
    let subject = plan.subject.trim().to_lowercase();

    let mut suggestions: Vec<CompetencySuggestion> = catalog
        .competencies()
        .iter()
        .filter(|c| cycle.map_or(true, |z| c.cycle.as_deref() == Some(z)))
        .filter_map(|c| {
            let confidence = confidence(c, &subject, &context);
            (confidence >= MIN_SUGGESTION_CONFIDENCE).then(|| CompetencySuggestion {
                competency: c.clone(),
                confidence,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

fn confidence(competency: &Competency, subject: &str, context: &str) -> f64 {
    let mut confidence = 0.0;

    let area = competency.area.to_lowercase();
    let subject_head = subject.split(' ').next().unwrap_or_default();
    let area_hit = (!area.is_empty() && subject.contains(&area))
        || (!subject_head.is_empty() && area.contains(subject_head));
    if area_hit {
        confidence += 0.4;
    }

    let competency_text = format!(
        "{} {} {}",
        competency.area, competency.competency_area, competency.competency
    )
    .to_lowercase();
    let words: Vec<&str> = competency_text
        .split_whitespace()
        .filter(|w| w.chars().count() > 3)
        .collect();
    if !words.is_empty() {
        let matched = words.iter().filter(|w| context.contains(*w)).count();
        confidence += (matched as f64 / words.len() as f64 * 0.6).min(0.4);
    }

    let area_head = competency
        .competency_area
        .to_lowercase()
        .split(' ')
        .next()
        .unwrap_or_default()
        .to_string();
    if !area_head.is_empty() && context.contains(&area_head) {
        confidence += 0.15;
    }

    let capped = confidence.min(MAX_SUGGESTION_CONFIDENCE);
    (capped * 100.0).round() / 100.0
}

//! Advisory quality checks over a plan snapshot.
//!
//! The battery covers time reality (detail phases and short version),
//! workload, language level and resources. Every check is a pure function;
//! the gate machine never consults the results.

use std::collections::BTreeSet;

use crate::{
    compatibility::check_didactic_compatibility,
    models::{
        CompatibilityResult, Heterogeneity, Phase, Plan, QualityLayer, QualityWarning, Severity,
        ShortVersion, WarningKind,
    },
};

/// Keywords that mark a phase as depending on digital equipment.
pub const DIGITAL_KEYWORDS: &[&str] = &[
    "tablet",
    "laptop",
    "computer",
    "digital",
    "app",
    "online",
    "internet",
    "beamer",
    "smartboard",
];

/// Tunable limits used by the checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityThresholds {
    /// Overshoot beyond the lesson length that counts as an error.
    pub overshoot_minutes: u32,
    /// Unused time beyond which a warning is raised.
    pub undershoot_minutes: u32,
    /// Phases shorter than this are flagged.
    pub min_phase_minutes: u32,
    /// Allowed deviation of the short-version summary from the lesson length.
    pub summary_tolerance_minutes: u32,
    /// Phase count above which the lesson is considered overloaded.
    pub max_phases: usize,
    /// Distinct social forms above which changes are considered restless.
    pub max_social_forms: usize,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            overshoot_minutes: 2,
            undershoot_minutes: 5,
            min_phase_minutes: 3,
            summary_tolerance_minutes: 2,
            max_phases: 6,
            max_social_forms: 4,
        }
    }
}

/// Runs every check with the default thresholds.
pub fn run_quality_checks(plan: &Plan) -> Vec<QualityWarning> {
    run_quality_checks_with(plan, &QualityThresholds::default())
}

/// Runs every check and returns the warnings ordered error, warning, info.
pub fn run_quality_checks_with(plan: &Plan, thresholds: &QualityThresholds) -> Vec<QualityWarning> {
    let mut warnings = Vec::new();

    if let Some(detail) = &plan.detail_plan {
        warnings.extend(check_time_reality(&detail.phases, plan.duration_minutes, thresholds));
        warnings.extend(check_workload(&detail.phases, thresholds));
    }
    if let Some(short_version) = &plan.short_version {
        warnings.extend(check_summary_time(short_version, plan.duration_minutes, thresholds));
    }
    warnings.extend(check_language_level(plan));
    warnings.extend(check_resources(plan));

    // sort_by_key is stable, so checks keep their relative order per severity
    warnings.sort_by_key(|warning| warning.severity);
    warnings
}

/// Compares detail-phase durations against the lesson length.
pub fn check_time_reality(
    phases: &[Phase],
    total_minutes: u32,
    thresholds: &QualityThresholds,
) -> Vec<QualityWarning> {
    let mut warnings = Vec::new();
    let phase_total = phases
        .iter()
        .fold(0u32, |total, p| total.saturating_add(p.duration_minutes));

    if phase_total > total_minutes.saturating_add(thresholds.overshoot_minutes) {
        warnings.push(
            QualityWarning::new(
                WarningKind::Time,
                Severity::Error,
                format!(
                    "Phasen dauern insgesamt {phase_total} Min, aber nur {total_minutes} Min verfügbar ({} Min zu viel).",
                    phase_total - total_minutes
                ),
            )
            .with_suggestion(format!(
                "Kürze Phasen um {} Minuten.",
                phase_total - total_minutes
            )),
        );
    } else if phase_total.saturating_add(thresholds.undershoot_minutes) < total_minutes {
        warnings.push(QualityWarning::new(
            WarningKind::Time,
            Severity::Warning,
            format!(
                "{} Min ungenutzt. Überlege, ob du Phasen verlängerst oder eine Pufferzeit einplanst.",
                total_minutes - phase_total
            ),
        ));
    }

    for phase in phases {
        if phase.duration_minutes < thresholds.min_phase_minutes {
            warnings.push(
                QualityWarning::new(
                    WarningKind::Time,
                    Severity::Warning,
                    format!(
                        "Phase \"{}\" hat nur {} Min und ist zu kurz für sinnvolle Arbeit.",
                        phase.name, phase.duration_minutes
                    ),
                )
                .with_suggestion(
                    "Kombiniere kurze Phasen oder verlängere sie auf mindestens 5 Minuten.",
                ),
            );
        }
    }

    warnings
}

/// Compares the short-version phase summary against the lesson length.
pub fn check_summary_time(
    short_version: &ShortVersion,
    total_minutes: u32,
    thresholds: &QualityThresholds,
) -> Vec<QualityWarning> {
    let summary_total = short_version.total_minutes();
    if summary_total.abs_diff(total_minutes) <= thresholds.summary_tolerance_minutes {
        return Vec::new();
    }

    vec![QualityWarning::new(
        WarningKind::Time,
        Severity::Warning,
        format!(
            "Phasenzeiten ({summary_total} Min) passen nicht zur Gesamtdauer ({total_minutes} Min)."
        ),
    )
    .with_suggestion(format!(
        "Passe die Phasenzeiten an, sodass sie insgesamt {total_minutes} Minuten ergeben."
    ))]
}

/// Flags lessons with too many phases or social forms.
pub fn check_workload(phases: &[Phase], thresholds: &QualityThresholds) -> Vec<QualityWarning> {
    let mut warnings = Vec::new();

    if phases.len() > thresholds.max_phases {
        warnings.push(
            QualityWarning::new(
                WarningKind::Workload,
                Severity::Warning,
                format!(
                    "{} Phasen in einer Lektion bedeuten eine hohe kognitive Belastung für SuS.",
                    phases.len()
                ),
            )
            .with_suggestion(
                "Reduziere auf maximal 5–6 Phasen und priorisiere die wichtigsten Aktivitäten.",
            ),
        );
    }

    let social_forms: BTreeSet<&str> = phases
        .iter()
        .filter_map(|p| p.social_form.as_deref())
        .filter(|form| !form.is_empty())
        .collect();
    if social_forms.len() > thresholds.max_social_forms {
        warnings.push(
            QualityWarning::new(
                WarningKind::Workload,
                Severity::Info,
                format!(
                    "{} verschiedene Sozialformen. Viele Wechsel können unruhig wirken.",
                    social_forms.len()
                ),
            )
            .with_suggestion("Überlege, ob 2–3 Sozialformen reichen."),
        );
    }

    warnings
}

/// Recommends language-sensitive material for classes that need it.
pub fn check_language_level(plan: &Plan) -> Vec<QualityWarning> {
    let profile = &plan.class_profile;
    if !profile.language_level.is_developing()
        || profile.heterogeneity == Heterogeneity::Low
    {
        return Vec::new();
    }

    let mut warnings = Vec::new();
    if plan.didactic_slots.slot3 != Some(QualityLayer::LanguageSensitive) {
        warnings.push(
            QualityWarning::new(
                WarningKind::Language,
                Severity::Warning,
                format!(
                    "Sprachstand {} mit Heterogenität: sprachsensible Materialien empfohlen.",
                    profile.language_level.label()
                ),
            )
            .with_suggestion(
                "Wähle \"Sprachsensibler Unterricht\" als Qualitätslayer oder stelle sicher, dass Satzstarter und Wortlisten enthalten sind.",
            ),
        );
    }

    let missing_supports = plan
        .short_version
        .as_ref()
        .is_some_and(|sv| sv.language_supports.as_ref().map_or(true, Vec::is_empty));
    if missing_supports {
        warnings.push(QualityWarning::new(
            WarningKind::Language,
            Severity::Info,
            "Sprachstützen (Satzstarter, Wortlisten) werden automatisch hinzugefügt.",
        ));
    }

    warnings
}

/// Flags phases that rely on digital equipment without an analog fallback.
pub fn check_resources(plan: &Plan) -> Vec<QualityWarning> {
    let Some(detail) = &plan.detail_plan else {
        return Vec::new();
    };

    detail
        .phases
        .iter()
        .filter(|phase| uses_digital_tools(phase) && !has_plan_b(phase))
        .map(|phase| {
            QualityWarning::new(
                WarningKind::Resources,
                Severity::Warning,
                format!(
                    "Phase \"{}\" nutzt digitale Mittel, aber hat keine analoge Alternative (Plan B).",
                    phase.name
                ),
            )
            .with_suggestion(
                "Ergänze eine analoge Alternative für den Fall, dass die Technik ausfällt.",
            )
        })
        .collect()
}

fn uses_digital_tools(phase: &Phase) -> bool {
    let description = phase.description.to_lowercase();
    let materials: Vec<String> = phase.materials.iter().map(|m| m.to_lowercase()).collect();
    DIGITAL_KEYWORDS.iter().any(|keyword| {
        description.contains(keyword) || materials.iter().any(|m| m.contains(keyword))
    })
}

fn has_plan_b(phase: &Phase) -> bool {
    phase
        .plan_b_alternative
        .as_ref()
        .is_some_and(|alternative| !alternative.trim().is_empty())
}

/// Quality warnings together with the didactic compatibility verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    pub warnings: Vec<QualityWarning>,
    pub compatibility: CompatibilityResult,
}

impl QualityReport {
    pub fn for_plan(plan: &Plan, thresholds: &QualityThresholds) -> Self {
        Self {
            warnings: run_quality_checks_with(plan, thresholds),
            compatibility: check_didactic_compatibility(&plan.didactic_slots),
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.warnings.iter().filter(|w| w.severity == severity).count()
    }

    /// Whether nothing at all was reported.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.compatibility.compatible
    }
}

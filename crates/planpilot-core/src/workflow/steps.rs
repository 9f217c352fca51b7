//! Step tables for the two planning modes.

use crate::models::PlanMode;

/// Number of wizard steps in both modes.
pub const STEP_COUNT: u8 = 9;

/// Static description of one wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepConfig {
    pub id: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub gate_label: Option<&'static str>,
}

impl StepConfig {
    const fn new(id: u8, title: &'static str, description: &'static str) -> Self {
        Self {
            id,
            title,
            description,
            gate_label: None,
        }
    }

    const fn gate(id: u8, title: &'static str, description: &'static str, label: &'static str) -> Self {
        Self {
            id,
            title,
            description,
            gate_label: Some(label),
        }
    }

    /// Whether this step is a manual approval checkpoint.
    pub fn is_gate(&self) -> bool {
        self.gate_label.is_some()
    }
}

pub const SINGLE_STEPS: [StepConfig; STEP_COUNT as usize] = [
    StepConfig::new(1, "Kontext", "Stufe, Fach, Dauer, Klassenprofil"),
    StepConfig::new(2, "Ziele & Lehrplan", "Lernziele und Kompetenz-Mapping"),
    StepConfig::new(3, "Didaktik", "Strukturmodell, Lernmodus, Qualitätslayer"),
    StepConfig::new(4, "KI-Kurzversion", "Automatische Planerstellung"),
    StepConfig::gate(5, "Anpassen", "Kurzversion bearbeiten", "GATE A"),
    StepConfig::new(6, "KI-Überarbeitung", "Überarbeitete Version prüfen"),
    StepConfig::gate(7, "Freigabe", "Kurzversion bestätigen", "GATE B"),
    StepConfig::new(8, "Detailplanung", "Vollständige Unterrichtsplanung"),
    StepConfig::new(9, "Export", "Dokument oder Rohdaten exportieren"),
];

pub const SEQUENCE_STEPS: [StepConfig; STEP_COUNT as usize] = [
    StepConfig::new(1, "Kontext", "Stufe, Fach, Lektionenanzahl"),
    StepConfig::new(2, "Ziele & Lehrplan", "Übergeordnete Kompetenzen"),
    StepConfig::new(3, "Didaktik", "Strukturmodell, Lernmodus, Qualitätslayer"),
    StepConfig::new(4, "Sequenz-Skelett", "KI erstellt Lektionsübersicht"),
    StepConfig::gate(5, "Sequenz anpassen", "Reihenfolge und Fokus bearbeiten", "GATE S1"),
    StepConfig::new(6, "KI-Überarbeitung", "Überarbeitete Sequenz prüfen"),
    StepConfig::gate(7, "Sequenz freigeben", "Sequenz bestätigen", "GATE S2"),
    StepConfig::new(8, "Detailplanung", "Details pro Lektion"),
    StepConfig::new(9, "Export", "Dokument oder Rohdaten exportieren"),
];

/// Step table for the given mode.
pub fn steps_for(mode: PlanMode) -> &'static [StepConfig] {
    match mode {
        PlanMode::Single => &SINGLE_STEPS,
        PlanMode::Sequence => &SEQUENCE_STEPS,
    }
}

/// Looks up a step by id in the table for `mode`.
pub fn step_config(mode: PlanMode, step: u8) -> Option<&'static StepConfig> {
    steps_for(mode).iter().find(|config| config.id == step)
}

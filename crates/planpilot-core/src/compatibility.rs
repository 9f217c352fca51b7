//! Detection of didactic slot combinations that work against each other.

use crate::models::{
    CompatibilityResult, DidacticSlots, LearningMode, QualityLayer, QualityWarning, Severity,
    StructureModel, WarningKind,
};

/// A slot combination known to be contradictory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncompatibleCombo {
    pub slot1: Option<StructureModel>,
    pub slot2: Option<LearningMode>,
    pub slot3: Option<QualityLayer>,
    pub reason: &'static str,
    pub alternative: &'static str,
}

pub const INCOMPATIBLE_COMBOS: &[IncompatibleCombo] = &[
    IncompatibleCombo {
        slot1: Some(StructureModel::DirectInstruction),
        slot2: Some(LearningMode::Inquiry),
        slot3: None,
        reason: "Direkte Instruktion und Forschendes Lernen widersprechen sich im Steuerungsgrad.",
        alternative: "5E mit Inquiry kombinieren oder Direkte Instruktion mit Übungsmodus.",
    },
    IncompatibleCombo {
        slot1: Some(StructureModel::DirectInstruction),
        slot2: Some(LearningMode::ProjectBased),
        slot3: None,
        reason: "Direkte Instruktion ist stark lehrerzentriert, Projektbasiertes Lernen stark schülerzentriert.",
        alternative: "Workshop/Atelier mit Projektbasiertem Lernen oder Direkte Instruktion mit Übungsmodus.",
    },
    IncompatibleCombo {
        slot1: None,
        slot2: Some(LearningMode::Practice),
        slot3: Some(QualityLayer::Gamification),
        reason: "Übungsmodus mit Gamification kann zu oberflächlicher Beschäftigung führen.",
        alternative: "Übungsmodus mit Formativem Assessment oder Gamification mit Kooperativem Lernen.",
    },
];

impl IncompatibleCombo {
    /// A combination fires when every slot it names matches and at least two
    /// slots match in total.
    pub fn matches(&self, slots: &DidacticSlots) -> bool {
        let checks = [
            self.slot1.map(|s| Some(s) == slots.slot1),
            self.slot2.map(|s| Some(s) == slots.slot2),
            self.slot3.map(|s| Some(s) == slots.slot3),
        ];
        let named = checks.iter().flatten().count();
        let matched = checks.iter().flatten().filter(|hit| **hit).count();
        matched == named && matched >= 2
    }
}

/// Checks the slots against the table of incompatible combinations.
pub fn check_didactic_compatibility(slots: &DidacticSlots) -> CompatibilityResult {
    let mut result = CompatibilityResult {
        compatible: true,
        ..Default::default()
    };

    for combo in INCOMPATIBLE_COMBOS.iter().filter(|c| c.matches(slots)) {
        result.compatible = false;
        result.warnings.push(
            QualityWarning::new(WarningKind::Compatibility, Severity::Warning, combo.reason)
                .with_suggestion(combo.alternative),
        );
        result.alternatives.push(combo.alternative.to_string());
    }

    result
}

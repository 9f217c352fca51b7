#[cfg(test)]
mod model_tests {
    use std::str::FromStr;

    use crate::models::{
        AccessMode, ClassProfile, Competency, CurriculumMapping, CurriculumSource, Heterogeneity,
        LanguageLevel, Level, Phase, Plan, PlanMode, PlanStatus, Severity, StructureModel,
    };

    fn sample_competency() -> Competency {
        Competency {
            id: "ma-1".to_string(),
            code: "MA.1.A.1".to_string(),
            area: "Mathematik".to_string(),
            competency_area: "Zahl und Variable".to_string(),
            competency: "Operieren und Benennen".to_string(),
            cycle: Some("Zyklus 2".to_string()),
            level_indicators: vec![],
            source: CurriculumSource::Lehrplan21,
        }
    }

    #[test]
    fn test_fresh_plan_defaults() {
        let plan = Plan::default();

        assert_eq!(plan.mode, PlanMode::Single);
        assert_eq!(plan.duration_minutes, 45);
        assert_eq!(plan.lesson_count, 6);
        assert_eq!(plan.class_profile.class_size, 20);
        assert_eq!(plan.class_profile.heterogeneity, Heterogeneity::Medium);
        assert_eq!(plan.class_profile.language_level, LanguageLevel::B2);
        assert_eq!(plan.goals, vec![String::new()]);
        assert_eq!(plan.status, PlanStatus::Draft);
        assert!(!plan.gate_a_approved);
        assert!(!plan.gate_b_approved);
    }

    #[test]
    fn test_plan_serializes_camel_case() {
        let plan = Plan::default();
        let json = serde_json::to_value(&plan).unwrap();

        assert!(json.get("gateAApproved").is_some());
        assert!(json.get("gateBApproved").is_some());
        assert!(json.get("topicDescription").is_some());
        assert_eq!(json["classProfile"]["languageLevel"], "b2");
        assert_eq!(json["didacticSlots"]["slot1"], serde_json::Value::Null);
    }

    #[test]
    fn test_plan_deserializes_with_missing_fields() {
        let plan: Plan = serde_json::from_str(r#"{"subject":"Mathematik","level":"10sj"}"#).unwrap();

        assert_eq!(plan.subject, "Mathematik");
        assert_eq!(plan.level, Some(Level::TenthYear));
        assert_eq!(plan.duration_minutes, 45);
    }

    #[test]
    fn test_choice_from_str() {
        assert_eq!(Level::from_str("SEK1").unwrap(), Level::LowerSecondary);
        assert_eq!(StructureModel::from_str("5e").unwrap(), StructureModel::FiveE);
        assert_eq!(LanguageLevel::from_str(" a2 ").unwrap(), LanguageLevel::A2);
        assert!(Level::from_str("uni").is_err());
    }

    #[test]
    fn test_level_cycles() {
        assert_eq!(Level::Kindergarten.cycle(), "Zyklus 1");
        assert_eq!(Level::Primary.cycle(), "Zyklus 2");
        assert_eq!(Level::Gymnasium.cycle(), "Zyklus 3");
    }

    #[test]
    fn test_language_support_need() {
        let mut profile = ClassProfile::default();
        assert!(!profile.needs_language_support());

        profile.language_level = LanguageLevel::B1;
        assert!(profile.needs_language_support());

        profile.language_level = LanguageLevel::C1;
        profile.heterogeneity = Heterogeneity::High;
        assert!(profile.needs_language_support());
    }

    #[test]
    fn test_severity_ordering() {
        let mut severities = vec![Severity::Info, Severity::Error, Severity::Warning];
        severities.sort();
        assert_eq!(severities, vec![Severity::Error, Severity::Warning, Severity::Info]);
    }

    #[test]
    fn test_mapping_confidence_is_clamped() {
        let competency = sample_competency();

        let high = CurriculumMapping::new(&competency, 1.7);
        assert_eq!(high.confidence_score, 1.0);
        assert!(!high.confirmed);

        let default: CurriculumMapping = (&competency).into();
        assert_eq!(default.confidence_score, 0.5);
        assert_eq!(default.competency_code, "MA.1.A.1");
    }

    #[test]
    fn test_phase_optional_fields_are_omitted() {
        let phase = Phase {
            id: "p-1".to_string(),
            name: "Einstieg".to_string(),
            duration_minutes: 10,
            description: "Bildimpuls".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&phase).unwrap();

        assert!(json.get("planBAlternative").is_none());
        assert!(json["differentiation"].get("sentenceStarters").is_none());
        assert_eq!(json["durationMinutes"], 10);
    }

    #[test]
    fn test_access_mode_wire_values() {
        let modes = vec![AccessMode::Text, AccessMode::Product];
        assert_eq!(serde_json::to_string(&modes).unwrap(), r#"["text","product"]"#);
    }
}

use proptest::prelude::*;
use witmap_map::{ConfidenceLevel, MappingEngine, suggest_mapping};
use witmap_model::{FieldDefinition, FieldValueType, MappingOptions, MatchReason};

fn field(reference_name: &str, display_name: &str) -> FieldDefinition {
    FieldDefinition::new(reference_name, display_name, FieldValueType::String)
}

fn test_case_catalog() -> Vec<FieldDefinition> {
    vec![
        field("System.Title", "Title").with_required(true),
        FieldDefinition::new("Microsoft.VSTS.TCM.Steps", "Steps", FieldValueType::Text),
        FieldDefinition::new(
            "Microsoft.VSTS.Common.Priority",
            "Priority",
            FieldValueType::Number,
        ),
        field("Custom.RiskLevel", "Risk Level"),
        field("Custom.BuildNumber", "Build Number"),
        field("Custom.BuildVersion", "Build Version"),
    ]
}

#[test]
fn maps_title_steps_and_priority() {
    let catalog = vec![
        field("System.Title", "Title"),
        field("Microsoft.VSTS.TCM.Steps", "Steps"),
        field("Microsoft.VSTS.Common.Priority", "Priority"),
    ];
    let report = suggest_mapping(&["Test Case Title", "Steps", "Pri"], &catalog);

    let mapping = &report.resolved_mapping;
    assert_eq!(mapping.len(), 3);
    assert_eq!(mapping.get("Test Case Title"), Some("System.Title"));
    assert_eq!(mapping.get("Steps"), Some("Microsoft.VSTS.TCM.Steps"));
    assert_eq!(mapping.get("Pri"), Some("Microsoft.VSTS.Common.Priority"));
    assert!(report.unmapped_headers.is_empty());
    assert!(report.has_title());
}

#[test]
fn custom_field_matches_by_display_name() {
    let report = suggest_mapping(&["Risk Level"], &test_case_catalog());

    let suggestion = report.suggestion_for("Risk Level").expect("suggestion");
    assert_eq!(suggestion.suggested_field.as_deref(), Some("Custom.RiskLevel"));
    assert_eq!(suggestion.confidence, 100);
    assert_eq!(suggestion.reason, MatchReason::ExactName);
    assert!(!suggestion.ambiguous);
    assert_eq!(report.resolved_mapping.get("Risk Level"), Some("Custom.RiskLevel"));
}

#[test]
fn synonyms_win_even_without_catalog_entry() {
    let report = suggest_mapping(&["Area Path", "Tags"], &[field("Custom.Area", "Area")]);

    let area = report.suggestion_for("Area Path").expect("area path");
    assert_eq!(area.suggested_field.as_deref(), Some("System.AreaPath"));
    assert_eq!(area.confidence, 100);
    assert_eq!(area.reason, MatchReason::DirectSynonym);

    let tags = report.suggestion_for("Tags").expect("tags");
    assert_eq!(tags.suggested_field.as_deref(), Some("System.Tags"));
}

#[test]
fn synonym_target_uses_catalog_spelling() {
    let report = suggest_mapping(&["Title"], &[field("SYSTEM.TITLE", "Title")]);
    assert_eq!(report.resolved_mapping.get("Title"), Some("SYSTEM.TITLE"));
}

#[test]
fn close_weak_candidates_are_left_for_review() {
    let report = suggest_mapping(&["Build"], &test_case_catalog());

    let suggestion = report.suggestion_for("Build").expect("suggestion");
    assert!(suggestion.ambiguous);
    assert_eq!(suggestion.suggested_field.as_deref(), Some("Custom.BuildNumber"));
    assert_eq!(suggestion.confidence, 80);
    assert_eq!(suggestion.candidates.len(), 2);
    assert_eq!(suggestion.candidates[1].reference_name, "Custom.BuildVersion");

    assert!(!report.resolved_mapping.contains_header("Build"));
    assert_eq!(report.unmapped_headers, vec!["Build".to_string()]);
    assert_eq!(report.needs_review().len(), 1);
}

#[test]
fn close_strong_candidates_are_auto_accepted() {
    let catalog = vec![
        field("Custom.Severity", "Severity"),
        field("Microsoft.VSTS.Common.Severity", "Bug Severity"),
    ];
    let report = suggest_mapping(&["Severity"], &catalog);

    let suggestion = report.suggestion_for("Severity").expect("suggestion");
    assert!(suggestion.ambiguous);
    assert_eq!(suggestion.confidence, 100);
    assert_eq!(suggestion.candidates[1].score, 95);
    assert_eq!(report.resolved_mapping.get("Severity"), Some("Custom.Severity"));
}

#[test]
fn wider_gap_option_marks_more_headers_ambiguous() {
    let catalog = vec![
        field("Custom.Platform", "Platform"),
        field("Custom.Platforms", "Platform List"),
    ];
    // Platform: exact name 100; Platform List: substring 80.
    let default = MappingEngine::new(catalog.clone(), MappingOptions::default());
    let (suggestion, applied) = default.suggest_header("Platform");
    assert!(!suggestion.ambiguous);
    assert!(applied);

    let wide = MappingEngine::new(catalog, MappingOptions::default().with_ambiguity_gap(25));
    let (suggestion, applied) = wide.suggest_header("Platform");
    assert!(suggestion.ambiguous);
    assert!(applied, "100 still clears the auto-accept score");
}

#[test]
fn min_confidence_holds_back_weak_matches() {
    let catalog = vec![field("Custom.Platform", "Platform")];
    let engine = MappingEngine::new(catalog, MappingOptions::default().with_min_confidence(80));

    let report = engine.suggest(&["Platfrm"]);
    let suggestion = report.suggestion_for("Platfrm").expect("suggestion");
    assert_eq!(suggestion.confidence, 75);
    assert!(report.resolved_mapping.is_empty());
    assert_eq!(report.needs_review().len(), 1);
}

#[test]
fn unknown_header_has_no_suggestion() {
    let report = suggest_mapping(&["Reviewer Comments", ""], &test_case_catalog());

    for header in ["Reviewer Comments", ""] {
        let suggestion = report.suggestion_for(header).expect("suggestion");
        assert_eq!(suggestion.confidence, 0);
        assert_eq!(suggestion.suggested_field, None);
        assert_eq!(suggestion.reason, MatchReason::NoMatch);
        assert!(suggestion.candidates.is_empty());
    }
    assert_eq!(report.unmapped_headers.len(), 2);
    assert!(report.mean_confidence().is_none());
}

#[test]
fn counts_suggestions_by_level() {
    let report = suggest_mapping(
        &["Title", "Sprints", "Build", "Platfrm"],
        &[
            field("Custom.BuildNumber", "Build Number"),
            field("Custom.BuildVersion", "Build Version"),
            field("Custom.Platform", "Platform"),
        ],
    );
    let counts = report.count_by_level();
    assert_eq!(counts.get(&ConfidenceLevel::High), Some(&2));
    assert_eq!(counts.get(&ConfidenceLevel::Medium), Some(&1));
    assert_eq!(counts.get(&ConfidenceLevel::Low), Some(&1));
}

#[test]
fn candidate_list_is_capped() {
    let catalog: Vec<FieldDefinition> = (0..8)
        .map(|i| field(&format!("Custom.Env{i}"), &format!("Env {i}")))
        .collect();
    let report = suggest_mapping(&["Env"], &catalog);
    let suggestion = report.suggestion_for("Env").expect("suggestion");
    assert_eq!(suggestion.candidates.len(), 5);
    assert_eq!(suggestion.candidates[0].reference_name, "Custom.Env0");
}

const SYNONYM_HEADERS: &[&str] = &[
    "Title",
    "Test Case ID",
    "steps",
    "PRIORITY",
    "area_path",
    "Iteration Path",
    "Description",
    "tags",
    "Automation Status",
];

proptest! {
    #[test]
    fn suggestion_invariants_hold(
        headers in prop::collection::vec("[A-Za-z _]{0,14}", 1..6),
        names in prop::collection::vec("[A-Za-z ]{1,12}", 0..8),
    ) {
        let catalog: Vec<FieldDefinition> = names
            .iter()
            .enumerate()
            .map(|(i, name)| field(&format!("Custom.F{i}"), name))
            .collect();
        let report = suggest_mapping(&headers, &catalog);

        prop_assert_eq!(report.suggestions.len(), headers.len());
        for suggestion in &report.suggestions {
            prop_assert!(suggestion.confidence <= 100);
            prop_assert_eq!(suggestion.confidence == 0, suggestion.suggested_field.is_none());
            prop_assert!(suggestion.candidates.len() <= 5);
            prop_assert!(suggestion.candidates.windows(2).all(|w| w[0].score >= w[1].score));
            if suggestion.ambiguous && suggestion.confidence < 90 {
                prop_assert!(!report.resolved_mapping.contains_header(&suggestion.header));
            }
        }
    }

    #[test]
    fn synonym_headers_always_resolve_directly(
        header in prop::sample::select(SYNONYM_HEADERS),
        names in prop::collection::vec("[A-Za-z ]{1,12}", 0..8),
    ) {
        let catalog: Vec<FieldDefinition> = names
            .iter()
            .enumerate()
            .map(|(i, name)| field(&format!("Custom.F{i}"), name))
            .collect();
        let report = suggest_mapping(&[header], &catalog);
        let suggestion = &report.suggestions[0];
        prop_assert_eq!(suggestion.confidence, 100);
        prop_assert_eq!(suggestion.reason, MatchReason::DirectSynonym);
        prop_assert!(report.resolved_mapping.contains_header(header));
    }
}

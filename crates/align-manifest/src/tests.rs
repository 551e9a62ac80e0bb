//! # Integration Tests for the Manifest Loader
//!
//! ## Test Categories
//!
//! 1. **Wire contract**: field names, defaults, document order
//! 2. **Degradation**: malformed experiments and missing index entries
//! 3. **Loading**: files on disk and the load report

use crate::loader::{load, LoadReport, ManifestSource};
use crate::manifest::Manifest;
use crate::models::{DeciderFamily, Level};
use serde_json::json;
use std::io::Write;

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_document() -> serde_json::Value {
    json!({
        "version": "1.0",
        "generated_at": "2025-01-01T00:00:00+00:00",
        "metadata": {
            "total_experiments": 2,
            "total_scenarios": 2,
            "adm_types": ["pipeline_baseline", "pipeline_comparative_regression"],
            "llm_backbones": ["mistral-7b"],
            "kdma_combinations": ["merit-0.0", "unaligned"]
        },
        "config": {
            "dimensions": [
                { "id": "merit", "label": "Merit", "description": "Moral desert" },
                { "id": "affiliation", "label": "Affiliation" }
            ],
            "presets": [
                {
                    "id": "judge",
                    "label": "Moral Judge",
                    "tagline": "Character matters",
                    "values": { "merit": "high", "affiliation": "low" }
                }
            ]
        },
        "scenarios": {
            "zeta-scene": {
                "title": "Shooter vs. Victim",
                "description": "Two patients.\n\nPatient A.\n\nPatient B.",
                "kdma_type": "merit",
                "scenario_id": "June2025-MF",
                "scene_id": "P1",
                "choices": [
                    { "id": "treat_a", "label": "Treat Patient A", "kdma_association": { "merit": 0.1 } },
                    { "id": "treat_b", "label": "Treat Patient B" }
                ],
                "characters": [ { "name": "Patient A", "description": "Shooter" } ]
            },
            "alpha-scene": {
                "title": "POW vs. Soldier",
                "kdma_type": "affiliation",
                "choices": [
                    { "id": "treat_pow", "label": "Treat the POW" },
                    { "id": "treat_ally", "label": "Treat the soldier" }
                ]
            }
        },
        "experiments": {
            "baseline/run": {
                "parameters": {
                    "adm": { "name": "pipeline_baseline", "llm_backbone": "mistral-7b" },
                    "kdma_values": [],
                    "alignment_target_id": "unaligned"
                },
                "results": {
                    "zeta-scene": {
                        "choice_id": "treat_a",
                        "choice_label": "Treat Patient A",
                        "justification": "Airway first.",
                        "timing_s": 1.5
                    }
                }
            },
            "aligned/merit-0.0": {
                "parameters": {
                    "adm": { "name": "pipeline_comparative_regression" },
                    "kdma_values": [ { "kdma": "merit", "value": 0.0 } ],
                    "run_variant": "default"
                },
                "results": {}
            },
            "broken": { "parameters": { "kdma_values": [] } }
        },
        "indices": {
            "by_scenario": { "zeta-scene": ["baseline/run", "aligned/merit-0.0"] },
            "by_adm": { "pipeline_baseline": ["baseline/run"] },
            "by_kdma": { "unaligned": ["baseline/run"] }
        }
    })
}

// =============================================================================
// Wire Contract Tests
// =============================================================================

#[test]
fn test_scenarios_keep_document_order() {
    let manifest = Manifest::from_json(sample_document()).unwrap();
    let ids: Vec<&str> = manifest.scenarios().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["zeta-scene", "alpha-scene"]);
}

#[test]
fn test_scenario_fields_and_defaults() {
    let manifest = Manifest::from_json(sample_document()).unwrap();

    let zeta = manifest.scenario("zeta-scene").unwrap();
    assert_eq!(zeta.kdma_type, "merit");
    assert_eq!(zeta.characters.len(), 1);
    assert_eq!(zeta.scene_id.as_deref(), Some("P1"));
    assert!(zeta.choice("treat_a").unwrap().kdma_association.is_some());

    let alpha = manifest.scenario("alpha-scene").unwrap();
    assert!(alpha.characters.is_empty());
    assert_eq!(alpha.description, "");
}

#[test]
fn test_dimension_description_defaults_to_empty() {
    let manifest = Manifest::from_json(sample_document()).unwrap();
    assert_eq!(manifest.dimensions()[0].description, "Moral desert");
    assert_eq!(manifest.dimensions()[1].description, "");
}

#[test]
fn test_presets_parse_levels() {
    let manifest = Manifest::from_json(sample_document()).unwrap();
    let judge = manifest.preset("judge").unwrap();
    assert_eq!(judge.values.get("merit"), Some(&Level::High));
    assert_eq!(judge.values.get("affiliation"), Some(&Level::Low));
}

#[test]
fn test_presets_absent_is_empty() {
    let mut doc = sample_document();
    doc["config"].as_object_mut().unwrap().remove("presets");
    let manifest = Manifest::from_json(doc).unwrap();
    assert!(manifest.presets().is_empty());
}

#[test]
fn test_non_string_preset_levels_load_as_unrecognized() {
    let mut doc = sample_document();
    doc["config"]["presets"][0]["values"] = json!({ "merit": null, "affiliation": 0.9 });

    let manifest = Manifest::from_json(doc).unwrap();
    let judge = manifest.preset("judge").unwrap();
    let merit = judge.values.get("merit").unwrap();
    let affiliation = judge.values.get("affiliation").unwrap();

    assert!(!merit.is_recognized());
    assert!(!affiliation.is_recognized());
    assert_eq!(merit.normalized(), Level::Medium);
    assert_eq!(affiliation.normalized(), Level::Medium);
}

#[test]
fn test_metadata_and_indices() {
    let manifest = Manifest::from_json(sample_document()).unwrap();
    assert_eq!(manifest.version(), Some("1.0"));
    assert_eq!(manifest.metadata().total_scenarios, 2);
    assert_eq!(manifest.experiments_for_adm("pipeline_baseline"), ["baseline/run"]);
    assert_eq!(manifest.experiments_for_kdma("unaligned"), ["baseline/run"]);
    assert_eq!(
        manifest.candidates("zeta-scene"),
        ["baseline/run", "aligned/merit-0.0"]
    );
}

#[test]
fn test_experiment_details() {
    let manifest = Manifest::from_json(sample_document()).unwrap();

    let baseline = manifest.experiment("baseline/run").unwrap();
    assert_eq!(baseline.family, DeciderFamily::Baseline);
    assert_eq!(baseline.adm.llm_backbone.as_deref(), Some("mistral-7b"));
    let result = baseline.result_for("zeta-scene").unwrap();
    assert_eq!(result.choice_id, "treat_a");
    assert_eq!(result.timing_s, Some(1.5));

    let aligned = manifest.experiment("aligned/merit-0.0").unwrap();
    assert_eq!(aligned.family, DeciderFamily::Aligned);
    assert_eq!(aligned.kdma_value("merit"), Some(0.0));
    assert!(aligned.result_for("zeta-scene").is_none());
}

// =============================================================================
// Degradation Tests
// =============================================================================

#[test]
fn test_malformed_experiment_is_skipped() {
    let manifest = Manifest::from_json(sample_document()).unwrap();
    assert!(manifest.experiment("broken").is_none());
    assert_eq!(manifest.skipped_experiments(), ["broken"]);
    assert_eq!(manifest.experiment_count(), 2);
}

#[test]
fn test_bad_entries_drop_only_themselves() {
    let mut doc = sample_document();
    doc["experiments"]["aligned/merit-0.0"] = json!({
        "parameters": {
            "adm": { "name": "pipeline_comparative_regression" },
            "kdma_values": [
                { "kdma": "search", "value": null },
                { "kdma": "merit", "value": 0.0 }
            ]
        },
        "results": {
            "alpha-scene": { "choice_label": "no id" },
            "zeta-scene": { "choice_id": "treat_b", "choice_label": "Treat Patient B" }
        }
    });

    let manifest = Manifest::from_json(doc).unwrap();
    assert_eq!(manifest.skipped_experiments(), ["broken"]);

    let aligned = manifest.experiment("aligned/merit-0.0").unwrap();
    assert_eq!(aligned.kdma_values.len(), 1);
    assert_eq!(aligned.kdma_value("merit"), Some(0.0));
    assert_eq!(aligned.kdma_value("search"), None);
    assert!(aligned.result_for("alpha-scene").is_none());
    assert_eq!(aligned.result_for("zeta-scene").unwrap().choice_id, "treat_b");
}

#[test]
fn test_malformed_scenario_fails_load() {
    let mut doc = sample_document();
    doc["scenarios"]["alpha-scene"] = json!({ "title": "no choices" });
    assert!(Manifest::from_json(doc).is_err());
}

// =============================================================================
// Loading Tests
// =============================================================================

#[test]
fn test_report_lists_unindexed_scenarios() {
    let manifest = Manifest::from_json(sample_document()).unwrap();
    let report = LoadReport::from_manifest(&manifest);

    assert_eq!(report.scenarios, 2);
    assert_eq!(report.unindexed_scenarios, vec!["alpha-scene".to_string()]);
    assert!(!report.is_clean());
    assert!(report.to_string().contains("no data for: alpha-scene"));
}

#[tokio::test]
async fn test_load_from_file_fingerprints_bytes() {
    let text = serde_json::to_string_pretty(&sample_document()).unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();

    let manifest = load(&ManifestSource::Path(file.path().to_path_buf()))
        .await
        .unwrap();

    assert_eq!(manifest.fingerprint(), crate::fingerprint(text.as_bytes()));
    assert_eq!(manifest.fingerprint().len(), 64);
    assert_eq!(manifest.scenarios().len(), 2);
}

extern crate casereview;

mod util;

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use casereview::data_types::FamilyNote;
use casereview::web::config::Config;
use casereview::web::export::*;
use casereview::ui_state::TableState;
use casereview::web::views::{ProjectViews, ViewScope};

use util::*;

#[test]
fn test_export_file_names() {
    let store = get_test_store();
    let ui_state = get_test_ui_state();
    let views = ProjectViews::default();

    let scope = ViewScope::new(Some("case review"), None);
    let tables = views.project_export_tables(&store, &ui_state, &scope).unwrap();
    let names: Vec<&str> = tables.iter().map(|table| table.name).collect();
    assert_eq!(names, vec!["Families", "Individuals", "Samples"]);
    assert_eq!(tables[0].config.filename, "my_project_case_review_families");
    assert_eq!(tables[2].config.filename, "my_project_case_review_samples");

    let tables = views.project_export_tables(&store, &ui_state, &ViewScope::default()).unwrap();
    assert_eq!(tables[1].config.filename, "my_project_individuals");

    let mut no_project = get_test_ui_state();
    no_project.current_project_guid = None;
    assert!(views.project_export_tables(&store, &no_project, &ViewScope::default()).is_none());
}

#[test]
fn test_case_review_table_fields() {
    let store = get_test_store();
    let ui_state = get_test_ui_state();
    let views = ProjectViews::default();

    let case_review_scope = ViewScope::new(Some("Case Review"), None);
    let tables = views.project_export_tables(&store, &ui_state, &case_review_scope).unwrap();
    assert!(tables[0].config.headers.contains(&"Case Review Notes".to_owned()));
    assert!(tables[1].config.headers.contains(&"Case Review Status".to_owned()));

    let tables = views.project_export_tables(&store, &ui_state, &ViewScope::default()).unwrap();
    assert!(!tables[0].config.headers.contains(&"Case Review Notes".to_owned()));
    assert!(tables[0].config.headers.contains(&"Analysis Status".to_owned()));
}

#[test]
fn test_families_export_rows() {
    let mut store = get_test_store();
    let mut ui_state = get_test_ui_state();
    let views = ProjectViews::default();
    let scope = ViewScope::new(Some("Case Review"), None);

    ui_state.set_table_state(Some("Case Review"), TableState {
        families_filter: Some("NEEDS_REVIEW".into()),
        families_sort_direction: Some(-1),
        ..TableState::default()
    });

    let note = FamilyNote {
        note_guid: "FN1".into(),
        family_guid: "F1".into(),
        note_type: "C".into(),
        note: "Needs trio data".into(),
        created_by: Some("Ann Analyst".into()),
        last_modified_date: None,
    };
    let mut notes = IndexMap::new();
    notes.insert(note.note_guid.clone(), note);
    store.family_notes_by_guid = Arc::new(notes);

    let rows = views.export_data(&store, &ui_state, &scope, ExportEntity::Families);
    let family_ids: Vec<&str> =
        rows.iter().map(|row| row["familyId"].as_str().unwrap()).collect();
    assert_eq!(family_ids, vec!["Gamma_family", "beta_family", "Alpha_family"]);

    // the newest sample, active or not
    assert_eq!(rows[2]["firstSample"]["sampleGuid"], "S1");
    assert_eq!(rows[1]["firstSample"]["sampleGuid"], "S2");
    assert_eq!(rows[0]["firstSample"], Value::Null);
    assert_eq!(rows[2]["caseReviewNotes"][0]["note"], "Needs trio data");
    assert_eq!(rows[1]["caseReviewNotes"], Value::Null);

    let tables = views.project_export_tables(&store, &ui_state, &scope).unwrap();
    let processed = tables[0].config.process_rows(&rows);
    assert_eq!(processed[2], vec!["Alpha_family", "Alpha family", "2023-02-01", "Yes",
                                  "Needs trio data"]);
    assert_eq!(processed[0][3], "No");

    let again = views.export_data(&store, &ui_state, &scope, ExportEntity::Families);
    assert!(Arc::ptr_eq(&rows, &again));
}

#[test]
fn test_individuals_and_samples_export_rows() {
    let store = get_test_store();
    let ui_state = get_test_ui_state();
    let views = ProjectViews::default();
    let scope = ViewScope::new(None, Some(ANALYSIS_GROUP_GUID));

    let individuals = views.export_data(&store, &ui_state, &scope, ExportEntity::Individuals);
    let individual_ids: Vec<&str> =
        individuals.iter().map(|row| row["individualId"].as_str().unwrap()).collect();
    // family name order, then individual ID order
    assert_eq!(individual_ids, vec!["NA19675", "NA19678", "HG00731"]);
    assert_eq!(individuals[0]["familyId"], "Alpha_family");
    assert_eq!(individuals[0]["hasActiveData"], true);
    assert_eq!(individuals[1]["hasActiveData"], false);
    assert_eq!(individuals[2]["hasActiveData"], false);

    let samples = views.export_data(&store, &ui_state, &scope, ExportEntity::Samples);
    let sample_ids: Vec<&str> =
        samples.iter().map(|row| row["sampleId"].as_str().unwrap()).collect();
    assert_eq!(sample_ids, vec!["S1_id", "S2_id"]);
    assert_eq!(samples[1]["individualId"], "HG00731");
}

#[test]
fn test_write_tsv() {
    let store = get_test_store();
    let ui_state = get_test_ui_state();
    let views = ProjectViews::new(Arc::new(Config::default()));
    let scope = ViewScope::default();

    let tables = views.project_export_tables(&store, &ui_state, &scope).unwrap();
    let samples_table = tables.iter().find(|table| table.entity == ExportEntity::Samples).unwrap();
    let rows = views.export_data(&store, &ui_state, &scope, ExportEntity::Samples);

    let mut output = vec![];
    write_tsv(&mut output, &samples_table.config, &rows).unwrap();
    let output = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Family ID\tIndividual ID\tSample ID\tSample Type\tDataset Type\tLoaded Date\tActive");
    assert_eq!(lines[1], "Alpha_family\tNA19675\tS1_id\tWES\tSNV_INDEL\t2024-01-10\tYes");
    assert_eq!(lines[2], "beta_family\tHG00731\tS2_id\tWES\tSNV_INDEL\t2024-03-01\tNo");
}

#[test]
fn test_export_entity_names() {
    assert_eq!(ExportEntity::from_name("Samples"), Some(ExportEntity::Samples));
    assert_eq!(ExportEntity::from_name("families"), Some(ExportEntity::Families));
    assert!(ExportEntity::from_name("variants").is_none());
}

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use casereview::data_types::*;
use casereview::store::EntityStore;
use casereview::ui_state::UiState;

pub const PROJECT_GUID: &str = "R0001_my_project";
pub const OTHER_PROJECT_GUID: &str = "R0002_other";
pub const ANALYSIS_GROUP_GUID: &str = "AG0001_group";

#[allow(dead_code)]
pub fn make_test_project(project_guid: &str, name: &str) -> Project {
    Project {
        project_guid: project_guid.into(),
        name: name.into(),
        collaborators: vec![],
        mme_primary_data_owner: None,
        mme_contact_url: None,
        has_case_review: true,
        workspace_name: None,
    }
}

#[allow(dead_code)]
pub fn make_test_family(family_guid: &str, project_guid: &str, display_name: &str,
                        individual_guids: &[&str], analysis_status: Option<&str>) -> Family {
    Family {
        family_guid: family_guid.into(),
        project_guid: project_guid.into(),
        family_id: display_name.replace(' ', "_").into(),
        display_name: display_name.into(),
        individual_guids: individual_guids.iter().map(|guid| (*guid).into()).collect(),
        analysis_status: analysis_status.map(|status| status.into()),
        assigned_analyst: None,
        analysed_by: vec![],
        created_date: None,
        description: None,
        coded_phenotype: None,
    }
}

#[allow(dead_code)]
pub fn make_test_individual(individual_guid: &str, family_guid: &str, project_guid: &str,
                            individual_id: &str, case_review_status: Option<&str>) -> Individual {
    Individual {
        individual_guid: individual_guid.into(),
        family_guid: family_guid.into(),
        project_guid: project_guid.into(),
        individual_id: individual_id.into(),
        display_name: None,
        paternal_id: None,
        maternal_id: None,
        sex: Some("F".into()),
        affected: Some("A".into()),
        sample_guids: vec![],
        features: vec![],
        case_review_status: case_review_status.map(|status| status.into()),
        case_review_status_last_modified_date: None,
    }
}

#[allow(dead_code)]
pub fn make_test_sample(sample_guid: &str, individual_guid: &str, family_guid: &str,
                        loaded_date: &str, is_active: bool) -> Sample {
    Sample {
        sample_guid: sample_guid.into(),
        individual_guid: individual_guid.into(),
        family_guid: family_guid.into(),
        project_guid: PROJECT_GUID.into(),
        sample_id: format!("{}_id", sample_guid).into(),
        sample_type: "WES".into(),
        dataset_type: "SNV_INDEL".into(),
        loaded_date: loaded_date.into(),
        is_active,
    }
}

#[allow(dead_code)]
pub fn make_test_user(email: &str, display_name: &str) -> User {
    User {
        username: email.split('@').next().unwrap_or(email).into(),
        email: Some(email.into()),
        display_name: Some(display_name.into()),
        full_name: Some(display_name.into()),
        is_analyst: false,
    }
}

fn by_guid<T, F>(entities: Vec<T>, guid: F) -> IndexMap<flexstr::SharedStr, T>
  where F: Fn(&T) -> &flexstr::SharedStr
{
    entities.into_iter().map(|entity| (guid(&entity).clone(), entity)).collect()
}

// Two projects.  The first has four families, F2 and F1 forming an analysis
// group:
//   F1 "Alpha family"   I1 (Q), I2 (A)    active sample loaded 2024-01-10
//   F2 "beta family"    I3 (I)            inactive sample
//   F3 "Gamma family"   I4 (Q)            no samples
//   F4 "delta family"   I5 (no status)    active sample loaded 2023-05-01
// The second project has one family.
#[allow(dead_code)]
pub fn get_test_store() -> EntityStore {
    let projects = vec![
        make_test_project(PROJECT_GUID, "My Project"),
        make_test_project(OTHER_PROJECT_GUID, "Other Project"),
    ];

    let mut alpha = make_test_family("F1", PROJECT_GUID, "Alpha family", &["I1", "I2"], Some("Q"));
    alpha.created_date = Some("2023-02-01T10:00:00+00:00".into());
    let mut beta = make_test_family("F2", PROJECT_GUID, "beta family", &["I3"], Some("C"));
    beta.created_date = Some("2022-11-20T10:00:00+00:00".into());
    beta.assigned_analyst = Some(UserShort {
        full_name: Some("Ann Analyst".into()),
        email: Some("ann@example.org".into()),
    });
    let gamma = make_test_family("F3", PROJECT_GUID, "Gamma family", &["I4", "I_missing"], Some("S_kgfp"));
    let delta = make_test_family("F4", PROJECT_GUID, "delta family", &["I5"], None);
    let other = make_test_family("F5", OTHER_PROJECT_GUID, "Other family", &["I6"], Some("Q"));

    let mut i1 = make_test_individual("I1", "F1", PROJECT_GUID, "NA19675", Some("Q"));
    i1.sample_guids = vec!["S1".into()];
    i1.features = vec![Feature { id: Some("HP:0001250".into()), label: "Seizures".into() }];
    let i2 = make_test_individual("I2", "F1", PROJECT_GUID, "NA19678", Some("A"));
    let mut i3 = make_test_individual("I3", "F2", PROJECT_GUID, "HG00731", Some("I"));
    i3.sample_guids = vec!["S2".into()];
    let i4 = make_test_individual("I4", "F3", PROJECT_GUID, "HG00733", Some("Q"));
    let mut i5 = make_test_individual("I5", "F4", PROJECT_GUID, "NA20870", None);
    i5.sample_guids = vec!["S3".into()];
    let i6 = make_test_individual("I6", "F5", OTHER_PROJECT_GUID, "NA21234", Some("Q"));

    let samples = vec![
        make_test_sample("S1", "I1", "F1", "2024-01-10T08:00:00", true),
        make_test_sample("S2", "I3", "F2", "2024-03-01T08:00:00", false),
        make_test_sample("S3", "I5", "F4", "2023-05-01T08:00:00", true),
    ];

    let analysis_groups = vec![
        AnalysisGroup {
            analysis_group_guid: ANALYSIS_GROUP_GUID.into(),
            project_guid: PROJECT_GUID.into(),
            name: "Epilepsy cases".into(),
            family_guids: vec!["F2".into(), "F1".into()],
            description: None,
        },
    ];

    EntityStore {
        projects_by_guid: Arc::new(by_guid(projects, |p| &p.project_guid)),
        families_by_guid:
            Arc::new(by_guid(vec![alpha, beta, gamma, delta, other], |f| &f.family_guid)),
        individuals_by_guid:
            Arc::new(by_guid(vec![i1, i2, i3, i4, i5, i6], |i| &i.individual_guid)),
        samples_by_guid: Arc::new(by_guid(samples, |s| &s.sample_guid)),
        analysis_groups_by_guid:
            Arc::new(by_guid(analysis_groups, |g| &g.analysis_group_guid)),
        ..EntityStore::default()
    }
}

#[allow(dead_code)]
pub fn get_test_ui_state() -> UiState {
    UiState {
        current_project_guid: Some(PROJECT_GUID.into()),
        user: Arc::new(make_test_user("ann@example.org", "Ann Analyst")),
        table_states: HashMap::new(),
    }
}

#[allow(dead_code)]
pub fn family_guids(families: &[Family]) -> Vec<String> {
    families.iter().map(|family| family.family_guid.to_string()).collect()
}

#[allow(dead_code)]
pub fn make_test_variant(variant_guid: &str, family_guids: &[&str], chrom: &str, pos: i64,
                         reference: Option<&str>, alt: Option<&str>) -> SavedVariant {
    SavedVariant {
        variant_guid: variant_guid.into(),
        family_guids: family_guids.iter().map(|guid| (*guid).into()).collect(),
        chrom: chrom.into(),
        pos,
        reference: reference.map(|r| r.into()),
        alt: alt.map(|a| a.into()),
        end: None,
        gene_id: None,
        genome_version: Some("37".into()),
        sv_type: None,
        transcripts: IndexMap::new(),
        main_transcript_id: None,
        genotypes: HashMap::new(),
        populations: HashMap::new(),
        tag_guids: vec![],
        note_guids: vec![],
        lifted_over_genome_version: None,
        lifted_over_chrom: None,
        lifted_over_pos: None,
    }
}

extern crate casereview;

mod util;

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use casereview::constants::{StatusOption, GNOMAD_SV_CRITERIA_MESSAGE, SV_CALLSET_CRITERIA_MESSAGE};
use casereview::data_types::*;
use casereview::store::EntityStore;
use casereview::types::{FamilyGuid, ResultGuid, SubmissionGuid, TagTypeGuid, VariantGuid};
use casereview::web::config::Config;
use casereview::web::frequencies::{frequency_details, frequency_summary, is_mito};
use casereview::web::summary::{analysis_status_counts, TagTypeWithCount};
use casereview::web::views::{ProjectViews, ViewScope};

use util::*;

fn make_tag_type(guid: &str, project_guid: &str, name: &str, order: f64, num_tags: usize) -> TagType {
    TagType {
        variant_tag_type_guid: guid.into(),
        project_guid: project_guid.into(),
        name: name.into(),
        category: None,
        description: None,
        color: Some("#1f78b4".into()),
        order,
        num_tags,
    }
}

fn tag_type_counts(counts: &[(&str, usize)]) -> HashMap<TagTypeGuid, TagTypeCount> {
    counts.iter()
        .map(|(guid, count)| ((*guid).into(), TagTypeCount { count: *count }))
        .collect()
}

fn add_tag_types(store: &mut EntityStore) {
    let tag_types = vec![
        make_tag_type("TT1", PROJECT_GUID, "Tier 1", 1.0, 5),
        make_tag_type("TT2", PROJECT_GUID, "Known gene", 0.0, 2),
        make_tag_type("TT3", OTHER_PROJECT_GUID, "Review", 0.0, 9),
    ];
    store.variant_tag_types_by_guid =
        Arc::new(tag_types.into_iter()
                 .map(|tag_type| (tag_type.variant_tag_type_guid.clone(), tag_type))
                 .collect());

    let mut counts = HashMap::new();
    counts.insert("F1".into(), tag_type_counts(&[("TT1", 2)]));
    counts.insert("F2".into(), tag_type_counts(&[("TT1", 1), ("TT2", 1)]));
    counts.insert("F3".into(), tag_type_counts(&[("TT2", 4), ("TT3", 7)]));
    store.receive_family_tag_type_counts(counts);
}

// a frameshift in MFSD9 saved for F1 and submitted to matchmaker for I1
fn add_variants_and_matchmaker(store: &mut EntityStore) {
    let mut variant = make_test_variant("SV1", &["F1"], "1", 248367227, Some("TC"), Some("T"));
    variant.transcripts.insert("ENSG00000135953".into(), vec![Transcript {
        transcript_id: Some("ENST00000262340".into()),
        gene_id: Some("ENSG00000135953".into()),
        major_consequence: Some("frameshift_variant".into()),
        hgvsc: Some("ENST00000262340.5:c.3955_3957del".into()),
        hgvsp: Some("ENSP00000262340.5:p.Leu1319del".into()),
    }]);
    variant.main_transcript_id = Some("ENST00000262340".into());
    variant.genotypes.insert("I1".into(), Genotype { num_alt: Some(1), ..Genotype::default() });
    variant.tag_guids = vec!["VT1".into()];
    variant.note_guids = vec!["VN1".into()];
    let untagged = make_test_variant("SV2", &["F1"], "2", 1000, Some("A"), Some("G"));

    let mut variants = IndexMap::new();
    variants.insert(variant.variant_guid.clone(), variant);
    variants.insert(untagged.variant_guid.clone(), untagged);
    store.receive_saved_variants(variants);

    let tag = VariantTag {
        tag_guid: "VT1".into(),
        name: "Tier 1".into(),
        category: None,
        color: None,
        created_by: Some("Ann Analyst".into()),
        variant_guids: vec!["SV1".into()],
    };
    store.variant_tags_by_guid = Arc::new([(tag.tag_guid.clone(), tag)].into_iter().collect());
    let note = VariantNote {
        note_guid: "VN1".into(),
        note: "Segregates".into(),
        created_by: Some("Bob Reviewer".into()),
        variant_guids: vec!["SV1".into()],
    };
    store.variant_notes_by_guid = Arc::new([(note.note_guid.clone(), note)].into_iter().collect());

    let mut genes = HashMap::new();
    genes.insert("ENSG00000135953".into(), Gene {
        gene_id: "ENSG00000135953".into(),
        gene_symbol: Some("MFSD9".into()),
    });
    store.genes_by_id = Arc::new(genes);

    let gene_variant = MmeGeneVariant {
        gene_id: "ENSG00000135953".into(),
        chrom: Some("1".into()),
        pos: Some(248367227),
        reference: Some("TC".into()),
        alt: Some("T".into()),
        end: None,
        genome_version: Some("37".into()),
    };
    let phenotype = |label: &str, observed: &str| MmePhenotype {
        id: None,
        label: Some(label.into()),
        observed: Some(observed.into()),
    };

    let submission = MmeSubmission {
        submission_guid: "MS1".into(),
        individual_guid: "I1".into(),
        submission_id: "NA19675_1_01".into(),
        contact_name: Some("PI".into()),
        contact_href: "mailto:matchmaker@broadinstitute.org,pi@example.org".into(),
        gene_ids: vec!["ENSG00000135953".into()],
        gene_variants: vec![gene_variant],
        phenotypes: vec![phenotype("Seizures", "yes"), phenotype("Ataxia", "no"),
                         phenotype("Microcephaly", "yes")],
        mme_result_guids: vec!["MR1".into(), "MR2".into()],
        deleted_date: None,
    };
    let mut other_submission = submission.clone();
    other_submission.submission_guid = "MS2".into();
    other_submission.individual_guid = "I6".into();
    other_submission.mme_result_guids = vec![];

    store.mme_submissions_by_guid =
        Arc::new([submission, other_submission].into_iter()
                 .map(|submission| (submission.submission_guid.clone(), submission))
                 .collect());

    let result = MmeResult {
        matchmaker_result_guid: "MR1".into(),
        submission_guid: "MS1".into(),
        patient: MmePatient {
            id: "P0004515".into(),
            contact: MmeContact {
                name: "Dr Jones".into(),
                href: "mailto:jones@example.org".into(),
            },
        },
        gene_variants: vec![MmeGeneVariant {
            gene_id: "ENSG00000135953".into(),
            chrom: None,
            pos: None,
            reference: None,
            alt: None,
            end: None,
            genome_version: None,
        }],
        match_status: MmeMatchStatus::default(),
    };
    let mut removed_result = result.clone();
    removed_result.matchmaker_result_guid = "MR2".into();
    removed_result.match_status.match_removed = true;

    store.mme_results_by_guid =
        Arc::new([result, removed_result].into_iter()
                 .map(|result| (result.matchmaker_result_guid.clone(), result))
                 .collect());
}

#[test]
fn test_analysis_status_counts_of_options() {
    let families: FamiliesByGuid =
        [make_test_family("F1", PROJECT_GUID, "F1", &[], Some("Q")),
         make_test_family("F2", PROJECT_GUID, "F2", &[], Some("C"))]
        .into_iter()
        .map(|family| (family.family_guid.clone(), family))
        .collect();
    let options = vec![StatusOption::new("Q", ""), StatusOption::new("C", ""),
                       StatusOption::new("N", "")];

    let counts = analysis_status_counts(&families, &options);
    let values: Vec<(&str, usize)> =
        counts.iter().map(|count| (count.value.as_str(), count.count)).collect();
    assert_eq!(values, vec![("Q", 1), ("C", 1), ("N", 0)]);
}

fn names_and_counts(data: &[TagTypeWithCount]) -> Vec<(String, usize)> {
    data.iter()
        .map(|tag_type| (tag_type.tag_type.name.to_string(), tag_type.count))
        .collect()
}

#[test]
fn test_tag_type_data() {
    let mut store = get_test_store();
    let ui_state = get_test_ui_state();
    let views = ProjectViews::default();
    add_tag_types(&mut store);

    let project_data = views.tag_type_data(&store, &ui_state, &ViewScope::default());
    assert_eq!(names_and_counts(&project_data),
               vec![("Known gene".to_owned(), 2), ("Tier 1".to_owned(), 5)]);

    let group_scope = ViewScope::new(None, Some(ANALYSIS_GROUP_GUID));
    let group_data = views.tag_type_data(&store, &ui_state, &group_scope);
    assert_eq!(names_and_counts(&group_data),
               vec![("Known gene".to_owned(), 1), ("Tier 1".to_owned(), 3)]);

    let by_family = views.tag_type_data_by_family(&store, &ui_state);
    let f2_guid: FamilyGuid = "F2".into();
    assert_eq!(names_and_counts(by_family.get(&f2_guid).unwrap()),
               vec![("Known gene".to_owned(), 1), ("Tier 1".to_owned(), 1)]);
    // TT3 is a tag type of the other project
    let f3_guid: FamilyGuid = "F3".into();
    assert_eq!(by_family.get(&f3_guid).unwrap().len(), 1);

    let options = views.project_tag_type_options(&store, &ui_state);
    let option_values: Vec<&str> = options.iter().map(|option| option.value.as_str()).collect();
    assert_eq!(option_values, vec!["Known gene", "Tier 1"]);
}

#[test]
fn test_tagged_variants() {
    let mut store = get_test_store();
    let ui_state = get_test_ui_state();
    let views = ProjectViews::default();
    add_variants_and_matchmaker(&mut store);

    let tagged = views.tagged_variants_by_family(&store);
    let f1_guid: FamilyGuid = "F1".into();
    let f1_tagged = tagged.get(&f1_guid).unwrap();
    // SV2 has no tags
    assert_eq!(f1_tagged.len(), 1);
    assert_eq!(f1_tagged[0].tags[0].name.as_str(), "Tier 1");
    assert_eq!(f1_tagged[0].genes[0].gene_symbol.as_deref(), Some("MFSD9"));

    let by_type = views.tagged_variants_by_family_type(&store);
    let f1_by_type = by_type.get(&f1_guid).unwrap();
    assert!(f1_by_type.sv.is_empty());
    assert_eq!(f1_by_type.snv_indel.len(), 1);

    let individual_variants = views.individual_tagged_variants(&store, &"I1".into());
    assert_eq!(individual_variants.len(), 1);
    assert_eq!(individual_variants[0].variant_id, "1-248367227-TC-T-ENSG00000135953");
    assert_eq!(individual_variants[0].genotype.as_ref().and_then(|gt| gt.num_alt), Some(1));
    assert!(views.individual_tagged_variants(&store, &"I_missing".into()).is_empty());

    let saved_by = views.project_variant_saved_by_options(&store, &ui_state);
    let saved_by_values: Vec<Option<&str>> =
        saved_by.iter().map(|option| option.value.as_ref().map(|value| value.as_str())).collect();
    assert_eq!(saved_by_values, vec![None, Some("Ann Analyst"), Some("Bob Reviewer")]);

    let tag_notes = views.variant_tag_notes_by_family_variants(&store);
    let sv1_guid: VariantGuid = "SV1".into();
    let sv1_tag_notes = tag_notes.get(&f1_guid).unwrap().get(&sv1_guid).unwrap();
    assert_eq!(sv1_tag_notes.notes[0].note.as_str(), "Segregates");
}

#[test]
fn test_mme_submissions() {
    let mut store = get_test_store();
    let ui_state = get_test_ui_state();
    let views = ProjectViews::default();
    add_variants_and_matchmaker(&mut store);

    let group_scope = ViewScope::new(None, Some(ANALYSIS_GROUP_GUID));
    let details = views.mme_submission_details(&store, &ui_state, &group_scope);
    // MS2 is for an individual of the other project
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].family_name.as_str(), "Alpha family");
    let gene_symbols: Vec<&str> = details[0].gene_symbols.iter().map(|symbol| symbol.as_str()).collect();
    assert_eq!(gene_symbols, vec!["MFSD9"]);

    let results = views.mme_results_by_submission(&store);
    let ms1_guid: SubmissionGuid = "MS1".into();
    let ms1_results = results.get(&ms1_guid).unwrap();
    assert_eq!(ms1_results.active.len(), 1);
    assert_eq!(ms1_results.removed[0].matchmaker_result_guid.as_str(), "MR2");

    let default_submission = views.default_mme_submission(&store, &ui_state).unwrap();
    assert!(default_submission.gene_variants.is_empty());
}

#[test]
fn test_mme_default_contact_email() {
    let mut store = get_test_store();
    let ui_state = get_test_ui_state();
    let views = ProjectViews::default();
    add_variants_and_matchmaker(&mut store);

    let result_guid: ResultGuid = "MR1".into();
    let email = views.mme_default_contact_email(&store, &ui_state, &result_guid);
    let email = (*email).as_ref().unwrap();

    assert_eq!(email.patient_id.as_str(), "P0004515");
    assert_eq!(email.to, "jones@example.org,pi@example.org,ann@example.org");
    assert_eq!(email.subject, "MFSD9 Matchmaker Exchange connection (NA19675_1_01)");
    assert!(email.body.starts_with("Dear Dr Jones,\n\n"));
    assert!(email.body.contains("harboring a variant in MFSD9. Our patient has a heterozygous \
                                 frameshift variant 1:248367227 TC>T (GRCh37) \
                                 (c.3955_3957del/p.Leu1319del) and presents with seizures and \
                                 microcephaly."));
    assert!(email.body.ends_with("Best wishes,\nAnn Analyst"));

    // the same draft until an input changes
    let again = views.mme_default_contact_email(&store, &ui_state, &result_guid);
    assert!(Arc::ptr_eq(&again, &views.mme_default_contact_email(&store, &ui_state, &result_guid)));

    let missing_guid: ResultGuid = "MR_missing".into();
    assert!(views.mme_default_contact_email(&store, &ui_state, &missing_guid).is_none());
}

#[test]
fn test_mme_email_recipients_are_unique() {
    let mut store = get_test_store();
    let mut ui_state = get_test_ui_state();
    let views = ProjectViews::default();
    add_variants_and_matchmaker(&mut store);

    ui_state.user = Arc::new(make_test_user("pi@example.org", "PI"));

    let result_guid: ResultGuid = "MR1".into();
    let email = views.mme_default_contact_email(&store, &ui_state, &result_guid);
    assert_eq!((*email).as_ref().unwrap().to, "jones@example.org,pi@example.org");
}

fn population(af: Option<f64>, ac: Option<u64>, an: Option<u64>) -> PopulationFrequency {
    PopulationFrequency {
        af,
        ac,
        an,
        ..PopulationFrequency::default()
    }
}

#[test]
fn test_zero_frequency_is_shown() {
    let config = Config::default();
    let mut variant = make_test_variant("SV1", &["F1"], "X", 1000, Some("A"), Some("T"));

    let mut exomes = population(Some(0.0), Some(0), Some(1000));
    exomes.hemi = Some(2);
    variant.populations.insert("gnomad_exomes".into(), exomes);
    let mut callset = population(Some(0.00123), Some(3), Some(2440));
    callset.hom = Some(1);
    variant.populations.insert("callset".into(), callset);
    // no AF
    variant.populations.insert("gnomad_genomes".into(), PopulationFrequency {
        hom: Some(4),
        ..PopulationFrequency::default()
    });

    let details = frequency_details(&variant, &config.populations);
    assert!(!details.is_mito);
    assert_eq!(details.allele_counts_header, "Allele Counts");

    let fields: Vec<&str> = details.summaries.iter().map(|summary| summary.field.as_str()).collect();
    assert_eq!(fields, vec!["callset", "gnomad_exomes"]);

    let callset_summary = &details.summaries[0];
    assert_eq!(callset_summary.value, "0.0012");
    assert_eq!(callset_summary.allele_counts.as_deref(), Some("AC=3 out of 2440"));
    assert_eq!(callset_summary.hom, Some(1));
    assert!(callset_summary.link.is_none());

    let exomes_summary = &details.summaries[1];
    assert_eq!(exomes_summary.value, "0.0");
    assert_eq!(exomes_summary.display_value, "0.0");
    assert_eq!(exomes_summary.hemi, Some(2));
    assert_eq!(exomes_summary.link.as_deref(),
               Some("http://gnomad.broadinstitute.org/region/X-900-1100"));
    let title_link = exomes_summary.title_link.as_ref().unwrap();
    assert_eq!(title_link.text, "gnomAD v2");
    assert_eq!(title_link.detail, "exomes");

    assert_eq!(details.allele_counts, vec!["This Callset: 3 out of 2440"]);
    assert!(details.help_messages.is_empty());
}

#[test]
fn test_frequency_links_and_hemi() {
    let config = Config::default();
    let mut variant = make_test_variant("SV1", &["F1"], "1", 1000, Some("A"), Some("T"));
    variant.genome_version = Some("38".into());
    let mut genomes = population(Some(0.0123), Some(12), Some(31000));
    genomes.hemi = Some(3);
    genomes.filter_af = Some(0.0456);
    variant.populations.insert("gnomad_genomes".into(), genomes);

    let pop_config = config.population_config("gnomad_genomes").unwrap();
    let summary = frequency_summary(&variant, pop_config, false).unwrap();
    // hemizygous counts are for X only
    assert_eq!(summary.hemi, None);
    assert_eq!(summary.value, "0.0123");
    assert_eq!(summary.display_value, "0.0456");
    assert_eq!(summary.link.as_deref(),
               Some("http://gnomad.broadinstitute.org/variant/1-1000-A-T?dataset=gnomad_r3"));

    let details = frequency_details(&variant, &config.populations);
    assert_eq!(details.global_afs, vec!["gnomAD v3 genomes: 0.0123"]);

    // exomes have no GRCh38 link, so the lifted over coordinates are used
    variant.populations.insert("gnomad_exomes".into(), population(Some(0.5), None, None));
    variant.lifted_over_genome_version = Some("37".into());
    variant.lifted_over_chrom = Some("1".into());
    variant.lifted_over_pos = Some(900);
    let pop_config = config.population_config("gnomad_exomes").unwrap();
    let summary = frequency_summary(&variant, pop_config, false).unwrap();
    assert_eq!(summary.link.as_deref(),
               Some("http://gnomad.broadinstitute.org/variant/1-900-A-T"));
}

#[test]
fn test_sv_frequencies() {
    let config = Config::default();
    let mut variant = make_test_variant("SV3", &["F1"], "2", 5000, None, None);
    variant.end = Some(9000);
    variant.sv_type = Some("DEL".into());
    variant.populations.insert("sv_callset".into(), population(Some(0.01), Some(5), None));
    let mut gnomad_svs = population(Some(0.002), None, None);
    gnomad_svs.id = Some("gnomAD-SV_v2.1_DEL_2_1234".into());
    variant.populations.insert("gnomad_svs".into(), gnomad_svs);

    let details = frequency_details(&variant, &config.populations);
    assert_eq!(details.help_messages.len(), 2);
    assert_eq!(details.help_messages[0].as_str(), SV_CALLSET_CRITERIA_MESSAGE);
    assert_eq!(details.help_messages[1].as_str(), GNOMAD_SV_CRITERIA_MESSAGE);

    let sv_callset = &details.summaries[0];
    assert_eq!(sv_callset.allele_counts.as_deref(), Some("AC=5"));
    assert_eq!(details.allele_counts, vec!["This Callset: 5 out of ?"]);

    let gnomad_sv = details.summaries.iter().find(|summary| summary.field.as_str() == "gnomad_svs").unwrap();
    assert_eq!(gnomad_sv.value, "DEL_2_1234");
    assert_eq!(gnomad_sv.link.as_deref(),
               Some("http://gnomad.broadinstitute.org/variant/DEL_2_1234?dataset=gnomad_sv_r2_1"));
}

#[test]
fn test_mito_frequencies() {
    let config = Config::default();
    let mut variant = make_test_variant("SV4", &["F1"], "M", 8993, Some("T"), Some("G"));
    variant.genome_version = Some("38".into());

    assert!(!is_mito(&variant, &config.populations));

    let mut heteroplasmy = population(Some(0.1), Some(2), Some(100));
    heteroplasmy.max_hl = Some(0.85);
    variant.populations.insert("gnomad_mito_heteroplasmy".into(), heteroplasmy);
    variant.populations.insert("gnomad_mito".into(), population(Some(0.2), Some(4), Some(100)));

    let details = frequency_details(&variant, &config.populations);
    assert!(details.is_mito);
    assert_eq!(details.allele_counts_header, "Homoplasmy");

    let suffixes: Vec<(&str, Option<&str>)> =
        details.summaries.iter()
        .map(|summary| (summary.field.as_str(), summary.plasmy_suffix))
        .collect();
    assert_eq!(suffixes, vec![("gnomad_mito", Some(" homoplasmy")),
                              ("gnomad_mito_heteroplasmy", Some(" heteroplasmy"))]);

    assert_eq!(details.allele_counts, vec!["gnomAD mito: 4 out of 100"]);
    assert_eq!(details.heteroplasmy,
               vec!["gnomAD mito: 2 out of 100", "gnomAD mito max observed heteroplasmy: 0.850"]);
    assert!(details.has_details());
}

use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;
use regex::Regex;

use flexstr::SharedStr as FlexStr;

use crate::bio::variant::{main_transcript, same_variant};
use crate::data_types::*;
use crate::types::*;
use crate::web::config::Config;

lazy_static! {
    static ref VARIANT_SUFFIX_RE: Regex = Regex::new(r"_variant").unwrap();
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MmeSubmissionDetail {
    #[serde(flatten)]
    pub submission: MmeSubmission,
    #[serde(skip_serializing_if="Option::is_none")]
    pub mme_notes: Option<Vec<FamilyNote>>,
    pub family_name: FlexStr,
    pub family_guid: FamilyGuid,
    pub project_guid: ProjectGuid,
    pub gene_symbols: Vec<FlexStr>,
}

// The submissions of individuals in the given families, with family details
// and the symbols of the submitted genes (the gene ID if there's no symbol).
pub fn mme_submission_details(submissions_by_guid: &MmeSubmissionsByGuid,
                              families_by_guid: &FamiliesByGuid,
                              genes_by_id: &GenesById,
                              notes_by_family_type: &NotesByFamilyType)
    -> Vec<MmeSubmissionDetail>
{
    let individual_families: HashMap<&IndividualGuid, &Family> =
        families_by_guid.values()
        .flat_map(|family| family.individual_guids.iter().map(move |guid| (guid, family)))
        .collect();

    submissions_by_guid.values()
        .filter_map(|submission| {
            let family = individual_families.get(&submission.individual_guid)?;

            let gene_symbols =
                submission.gene_ids.iter()
                .map(|gene_id| {
                    genes_by_id.get(gene_id)
                        .and_then(|gene| gene.gene_symbol.clone())
                        .unwrap_or_else(|| gene_id.clone())
                })
                .collect();

            Some(MmeSubmissionDetail {
                submission: submission.clone(),
                mme_notes: notes_by_family_type.get(&family.family_guid)
                    .and_then(|notes| notes.get(crate::constants::NOTE_TYPE_MME))
                    .cloned(),
                family_name: family.display_name.clone(),
                family_guid: family.family_guid.clone(),
                project_guid: family.project_guid.clone(),
                gene_symbols,
            })
        })
        .collect()
}

#[derive(Serialize, Clone, Debug, PartialEq, Default)]
pub struct MmeResultsByStatus {
    pub active: Vec<MmeResult>,
    pub removed: Vec<MmeResult>,
}

// Results of deleted submissions and removed matches are "removed".
pub fn mme_results_by_submission(results_by_guid: &MmeResultsByGuid,
                                 submissions_by_guid: &MmeSubmissionsByGuid)
    -> IndexMap<SubmissionGuid, MmeResultsByStatus>
{
    submissions_by_guid.values()
        .map(|submission| {
            let mut by_status = MmeResultsByStatus::default();

            for result in submission.mme_result_guids.iter()
                .filter_map(|guid| results_by_guid.get(guid))
            {
                if result.match_status.match_removed || submission.deleted_date.is_some() {
                    by_status.removed.push(result.clone());
                } else {
                    by_status.active.push(result.clone());
                }
            }

            (submission.submission_guid.clone(), by_status)
        })
        .collect()
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DefaultMmeSubmission {
    #[serde(skip_serializing_if="Option::is_none")]
    pub contact_name: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub contact_href: Option<FlexStr>,
    pub gene_variants: Vec<MmeGeneVariant>,
    pub phenotypes: Vec<MmePhenotype>,
}

pub fn default_mme_submission(project: Option<&Project>) -> Option<DefaultMmeSubmission> {
    project.map(|project| DefaultMmeSubmission {
        contact_name: project.mme_primary_data_owner.clone(),
        contact_href: project.mme_contact_url.clone(),
        gene_variants: vec![],
        phenotypes: vec![],
    })
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MmeContactEmail {
    pub matchmaker_result_guid: ResultGuid,
    pub patient_id: FlexStr,
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub struct MmeEmailContext<'a> {
    pub results_by_guid: &'a MmeResultsByGuid,
    pub submissions_by_guid: &'a MmeSubmissionsByGuid,
    pub individuals_by_guid: &'a IndividualsByGuid,
    pub genes_by_id: &'a GenesById,
    pub saved_variants_by_guid: &'a SavedVariantsByGuid,
    pub user: &'a User,
    pub config: &'a Config,
}

impl MmeEmailContext<'_> {
    fn gene_symbol(&self, gene_id: &GeneId) -> Option<GeneSymbol> {
        self.genes_by_id.get(gene_id).and_then(|gene| gene.gene_symbol.clone())
    }
}

// "missense_variant" -> "missense variant"
fn consequence_text(major_consequence: &str) -> String {
    let consequence = VARIANT_SUFFIX_RE.replace_all(major_consequence, "").replace('_', " ");
    format!("{} variant", consequence)
}

// the part of an HGVS string after the last ':'
fn hgvs_suffix(hgvs: Option<&FlexStr>) -> &str {
    hgvs.map(|hgvs| hgvs.rsplit(':').next().unwrap_or(""))
        .unwrap_or("")
}

// eg. "a heterozygous missense variant 1:1000 A>T (GRCh38) (c.123A>T/p.Lys41Asn)"
fn describe_submitted_variant(gene_variant: &MmeGeneVariant, family_guid: Option<&FamilyGuid>,
                              individual_guid: &IndividualGuid, context: &MmeEmailContext)
    -> String
{
    let saved_variant =
        context.saved_variants_by_guid.values()
        .find(|saved_variant| {
            same_variant(gene_variant, *saved_variant) &&
                family_guid.is_some_and(|guid| saved_variant.family_guids.contains(guid))
        });

    let genotype =
        saved_variant
        .and_then(|saved_variant| saved_variant.genotypes.get(individual_guid))
        .cloned()
        .unwrap_or_default();
    let transcript = saved_variant.and_then(main_transcript).cloned().unwrap_or_default();

    let mut consequence =
        consequence_text(transcript.major_consequence.as_deref().unwrap_or(""));
    let mut variant_detail =
        [hgvs_suffix(transcript.hgvsc.as_ref()), hgvs_suffix(transcript.hgvsp.as_ref())]
        .into_iter()
        .filter(|part| !part.is_empty())
        .join("/");

    let inheritance =
        match genotype.num_alt {
            Some(1) => "heterozygous",
            Some(-1) => {
                consequence =
                    if genotype.cn.is_some_and(|cn| cn < 2) { "deletion" } else { "duplication" }
                    .into();
                variant_detail =
                    format!("CN={}", genotype.cn.map(|cn| cn.to_string())
                            .unwrap_or_else(|| "undefined".into()));
                "copy number"
            },
            _ => "homozygous",
        };

    let pos = gene_variant.pos.map(|pos| pos.to_string()).unwrap_or_default();
    let position =
        match gene_variant.reference.as_ref().filter(|reference| !reference.is_empty()) {
            Some(reference) =>
                format!("{} {}>{}", pos, reference, gene_variant.alt.as_deref().unwrap_or("")),
            None =>
                format!("{}-{}", pos, gene_variant.end.map(|end| end.to_string()).unwrap_or_default()),
        };

    let genome_version =
        gene_variant.genome_version.as_ref()
        .map(|version| context.config.genome_version_display(version).unwrap_or_else(|| version.clone()))
        .filter(|version| !version.is_empty())
        .map(|version| format!(" ({})", version))
        .unwrap_or_default();

    let detail =
        if variant_detail.is_empty() {
            String::new()
        } else {
            format!(" ({})", variant_detail)
        };

    format!("a {} {} {}:{}{}{}", inheritance, consequence,
            gene_variant.chrom.as_deref().unwrap_or(""), position, genome_version, detail)
}

// "a", "a and b", "a, b, and c"
pub fn join_phenotypes(mut labels: Vec<String>) -> String {
    let count = labels.len();

    if count > 2 {
        labels[count - 1] = format!("and {}", labels[count - 1]);
    }

    labels.join(if count == 2 { " and " } else { ", " })
}

fn recipients(result: &MmeResult, submission: &MmeSubmission, context: &MmeEmailContext) -> String {
    let default_contact = format!("{},", context.config.mme_default_contact_email);

    let contacts = [
        result.patient.contact.href.replace("mailto:", ""),
        submission.contact_href.replace("mailto:", "").replace(&default_contact, ""),
        context.user.email.as_ref().map(FlexStr::to_string).unwrap_or_default(),
    ];

    contacts.into_iter()
        .filter(|contact| !contact.is_empty())
        .unique()
        .join(",")
}

// Draft an email to the contact of a match result.  None if the result or
// its submission isn't in the store.
pub fn mme_default_contact_email(matchmaker_result_guid: &ResultGuid, context: &MmeEmailContext)
    -> Option<MmeContactEmail>
{
    let result = context.results_by_guid.get(matchmaker_result_guid)?;
    let submission = context.submissions_by_guid.get(&result.submission_guid)?;
    let family_guid =
        context.individuals_by_guid.get(&submission.individual_guid)
        .map(|individual| &individual.family_guid);

    let submitted_genes: Vec<GeneSymbol> =
        submission.gene_variants.iter()
        .filter_map(|gene_variant| context.gene_symbol(&gene_variant.gene_id))
        .unique()
        .collect();

    let gene_name =
        result.gene_variants.iter()
        .filter_map(|gene_variant| context.gene_symbol(&gene_variant.gene_id))
        .find(|symbol| submitted_genes.contains(symbol));

    let submitted_variants =
        submission.gene_variants.iter()
        .map(|gene_variant| {
            describe_submitted_variant(gene_variant, family_guid, &submission.individual_guid,
                                       context)
        })
        .join(", ");

    let phenotype_labels =
        submission.phenotypes.iter()
        .filter(|phenotype| phenotype.observed.as_ref().is_some_and(|observed| observed.as_str() == "yes"))
        .filter_map(|phenotype| phenotype.label.as_ref().filter(|label| !label.is_empty()))
        .map(|label| label.to_lowercase())
        .collect();
    let submitted_phenotypes = join_phenotypes(phenotype_labels);

    let patient = &result.patient;

    let subject =
        format!("{} Matchmaker Exchange connection ({})",
                gene_name.map(|name| name.to_string())
                .unwrap_or_else(|| format!("Patient {}", patient.id)),
                submission.submission_id);

    let presents_with =
        if submitted_phenotypes.is_empty() {
            String::new()
        } else {
            format!(" and presents with {}", submitted_phenotypes)
        };

    let body =
        format!("Dear {},\n\nWe recently matched with one of your patients in Matchmaker Exchange \
                 harboring {} in {}. Our patient has {}{}. Would you be willing to share whether \
                 your patient's phenotype and genotype match with ours? We are very grateful for \
                 your help and look forward to hearing more.\n\nBest wishes,\n{}",
                patient.contact.name,
                if submission.gene_variants.len() == 1 { "a variant" } else { "variants" },
                itertools::join(submitted_genes.iter(), ", "),
                submitted_variants, presents_with,
                context.user.display_name.as_ref().map(FlexStr::as_str).unwrap_or(""));

    Some(MmeContactEmail {
        matchmaker_result_guid: matchmaker_result_guid.clone(),
        patient_id: patient.id.clone(),
        to: recipients(result, submission, context),
        subject,
        body,
    })
}

#[test]
fn test_join_phenotypes() {
    assert_eq!(join_phenotypes(vec![]), "");
    assert_eq!(join_phenotypes(vec!["seizures".into()]), "seizures");
    assert_eq!(join_phenotypes(vec!["seizures".into(), "ataxia".into()]),
               "seizures and ataxia");
    assert_eq!(join_phenotypes(vec!["seizures".into(), "ataxia".into(), "microcephaly".into()]),
               "seizures, ataxia, and microcephaly");
}

#[test]
fn test_consequence_text() {
    assert_eq!(consequence_text("missense_variant"), "missense variant");
    assert_eq!(consequence_text("splice_region_variant"), "splice region variant");
    assert_eq!(consequence_text("frameshift"), "frameshift variant");
}

#[test]
fn test_hgvs_suffix() {
    let hgvsc: FlexStr = "ENST00000357033.8:c.123A>T".into();
    assert_eq!(hgvs_suffix(Some(&hgvsc)), "c.123A>T");
    assert_eq!(hgvs_suffix(None), "");
}

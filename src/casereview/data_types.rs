use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

use flexstr::SharedStr as FlexStr;

use crate::types::*;

pub type ProjectsByGuid = IndexMap<ProjectGuid, Project>;
pub type FamiliesByGuid = IndexMap<FamilyGuid, Family>;
pub type IndividualsByGuid = IndexMap<IndividualGuid, Individual>;
pub type SamplesByGuid = IndexMap<SampleGuid, Sample>;
pub type AnalysisGroupsByGuid = IndexMap<AnalysisGroupGuid, AnalysisGroup>;
pub type SavedVariantsByGuid = IndexMap<VariantGuid, SavedVariant>;
pub type GenesById = HashMap<GeneId, Gene>;
pub type VariantTagsByGuid = IndexMap<TagGuid, VariantTag>;
pub type VariantNotesByGuid = IndexMap<NoteGuid, VariantNote>;
pub type FamilyNotesByGuid = IndexMap<NoteGuid, FamilyNote>;
pub type TagTypesByGuid = IndexMap<TagTypeGuid, TagType>;
pub type MmeSubmissionsByGuid = IndexMap<SubmissionGuid, MmeSubmission>;
pub type MmeResultsByGuid = IndexMap<ResultGuid, MmeResult>;
pub type UsersByUsername = IndexMap<Username, User>;

pub type SamplesByFamily = HashMap<FamilyGuid, Vec<Sample>>;
pub type IndividualsByFamily = HashMap<FamilyGuid, Vec<Individual>>;
pub type NotesByFamilyType = HashMap<FamilyGuid, HashMap<NoteType, Vec<FamilyNote>>>;
pub type FamilyTagTypeCounts = HashMap<FamilyGuid, HashMap<TagTypeGuid, TagTypeCount>>;
pub type TagTypesByProject = HashMap<ProjectGuid, Vec<TagType>>;

// the per-sample-type counts of samples by loaded date, eg.
//   "WES__SNV_INDEL" -> { "2024-01-03" -> 12 }
pub type SampleCountsByType = BTreeMap<String, BTreeMap<String, usize>>;

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub username: Username,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub email: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub display_name: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub full_name: Option<FlexStr>,
    #[serde(skip_serializing_if="is_false", default)]
    pub is_analyst: bool,
}

// the short user details attached to analysts, notes and "analysed by" entries
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserShort {
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub full_name: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub email: Option<FlexStr>,
}

impl UserShort {
    pub fn display(&self) -> FlexStr {
        self.full_name.clone().filter(|name| !name.is_empty())
            .or_else(|| self.email.clone())
            .unwrap_or_default()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_guid: ProjectGuid,
    pub name: FlexStr,
    #[serde(default)]
    pub collaborators: Vec<User>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub mme_primary_data_owner: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub mme_contact_url: Option<FlexStr>,
    #[serde(default)]
    pub has_case_review: bool,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub workspace_name: Option<FlexStr>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysedBy {
    pub created_by: UserShort,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub data_type: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub last_modified_date: Option<FlexStr>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub family_guid: FamilyGuid,
    pub project_guid: ProjectGuid,
    pub family_id: FamilyId,
    #[serde(default)]
    pub display_name: FlexStr,
    #[serde(default)]
    pub individual_guids: Vec<IndividualGuid>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub analysis_status: Option<StatusCode>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub assigned_analyst: Option<UserShort>,
    #[serde(default)]
    pub analysed_by: Vec<AnalysedBy>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub created_date: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub description: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub coded_phenotype: Option<FlexStr>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Feature {
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub id: Option<FlexStr>,
    #[serde(default)]
    pub label: FlexStr,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Individual {
    pub individual_guid: IndividualGuid,
    pub family_guid: FamilyGuid,
    pub project_guid: ProjectGuid,
    pub individual_id: IndividualId,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub display_name: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub paternal_id: Option<IndividualId>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub maternal_id: Option<IndividualId>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub sex: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub affected: Option<FlexStr>,
    #[serde(default)]
    pub sample_guids: Vec<SampleGuid>,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub case_review_status: Option<StatusCode>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub case_review_status_last_modified_date: Option<FlexStr>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub sample_guid: SampleGuid,
    pub individual_guid: IndividualGuid,
    pub family_guid: FamilyGuid,
    pub project_guid: ProjectGuid,
    #[serde(default)]
    pub sample_id: FlexStr,
    #[serde(default)]
    pub sample_type: FlexStr,
    #[serde(default)]
    pub dataset_type: FlexStr,
    #[serde(default)]
    pub loaded_date: FlexStr,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisGroup {
    pub analysis_group_guid: AnalysisGroupGuid,
    pub project_guid: ProjectGuid,
    #[serde(default)]
    pub name: FlexStr,
    #[serde(default)]
    pub family_guids: Vec<FamilyGuid>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub description: Option<FlexStr>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Gene {
    pub gene_id: GeneId,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub gene_symbol: Option<GeneSymbol>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub transcript_id: Option<TranscriptId>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub gene_id: Option<GeneId>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub major_consequence: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub hgvsc: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub hgvsp: Option<FlexStr>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Genotype {
    // -1 for copy number calls
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub num_alt: Option<i32>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub cn: Option<i32>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub gq: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub ab: Option<f64>,
}

// Population frequency fields are tri-state: a value, zero or absent.
// Absent and zero must never be conflated.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct PopulationFrequency {
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub af: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub ac: Option<u64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub an: Option<u64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub hom: Option<u64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub het: Option<u64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub hemi: Option<u64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub filter_af: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub max_hl: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub id: Option<FlexStr>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedVariant {
    pub variant_guid: VariantGuid,
    #[serde(default)]
    pub family_guids: Vec<FamilyGuid>,
    pub chrom: Chromosome,
    pub pos: i64,
    #[serde(rename = "ref", skip_serializing_if="Option::is_none", default)]
    pub reference: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub alt: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub end: Option<i64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub gene_id: Option<GeneId>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub genome_version: Option<GenomeVersion>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub sv_type: Option<FlexStr>,
    #[serde(default)]
    pub transcripts: IndexMap<GeneId, Vec<Transcript>>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub main_transcript_id: Option<TranscriptId>,
    #[serde(default)]
    pub genotypes: HashMap<IndividualGuid, Genotype>,
    #[serde(default)]
    pub populations: HashMap<PopulationKey, PopulationFrequency>,
    #[serde(default)]
    pub tag_guids: Vec<TagGuid>,
    #[serde(default)]
    pub note_guids: Vec<NoteGuid>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub lifted_over_genome_version: Option<GenomeVersion>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub lifted_over_chrom: Option<Chromosome>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub lifted_over_pos: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariantTag {
    pub tag_guid: TagGuid,
    pub name: FlexStr,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub category: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub color: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub created_by: Option<FlexStr>,
    #[serde(default)]
    pub variant_guids: Vec<VariantGuid>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariantNote {
    pub note_guid: NoteGuid,
    #[serde(default)]
    pub note: FlexStr,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub created_by: Option<FlexStr>,
    #[serde(default)]
    pub variant_guids: Vec<VariantGuid>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FamilyNote {
    pub note_guid: NoteGuid,
    pub family_guid: FamilyGuid,
    pub note_type: NoteType,
    #[serde(default)]
    pub note: FlexStr,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub created_by: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub last_modified_date: Option<FlexStr>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagType {
    pub variant_tag_type_guid: TagTypeGuid,
    pub project_guid: ProjectGuid,
    pub name: FlexStr,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub category: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub description: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub color: Option<FlexStr>,
    #[serde(default)]
    pub order: f64,
    #[serde(default)]
    pub num_tags: usize,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TagTypeCount {
    pub count: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MmeGeneVariant {
    pub gene_id: GeneId,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub chrom: Option<Chromosome>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub pos: Option<i64>,
    #[serde(rename = "ref", skip_serializing_if="Option::is_none", default)]
    pub reference: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub alt: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub end: Option<i64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub genome_version: Option<GenomeVersion>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MmePhenotype {
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub id: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub label: Option<FlexStr>,
    // "yes" or "no"
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub observed: Option<FlexStr>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MmeSubmission {
    pub submission_guid: SubmissionGuid,
    pub individual_guid: IndividualGuid,
    #[serde(default)]
    pub submission_id: FlexStr,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub contact_name: Option<FlexStr>,
    #[serde(default)]
    pub contact_href: FlexStr,
    #[serde(default)]
    pub gene_ids: Vec<GeneId>,
    #[serde(default)]
    pub gene_variants: Vec<MmeGeneVariant>,
    #[serde(default)]
    pub phenotypes: Vec<MmePhenotype>,
    #[serde(default)]
    pub mme_result_guids: Vec<ResultGuid>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub deleted_date: Option<FlexStr>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct MmeContact {
    #[serde(default)]
    pub name: FlexStr,
    #[serde(default)]
    pub href: FlexStr,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct MmePatient {
    #[serde(default)]
    pub id: FlexStr,
    #[serde(default)]
    pub contact: MmeContact,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MmeMatchStatus {
    #[serde(default)]
    pub match_removed: bool,
    #[serde(default)]
    pub we_contacted: bool,
    #[serde(default)]
    pub host_contacted: bool,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub comments: Option<FlexStr>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MmeResult {
    pub matchmaker_result_guid: ResultGuid,
    pub submission_guid: SubmissionGuid,
    #[serde(default)]
    pub patient: MmePatient,
    #[serde(default)]
    pub gene_variants: Vec<MmeGeneVariant>,
    #[serde(default)]
    pub match_status: MmeMatchStatus,
}

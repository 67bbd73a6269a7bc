use flexstr::SharedStr as FlexStr;

pub type ProjectGuid = FlexStr;
pub type FamilyGuid = FlexStr;
pub type IndividualGuid = FlexStr;
pub type SampleGuid = FlexStr;
pub type AnalysisGroupGuid = FlexStr;
pub type VariantGuid = FlexStr;
pub type TagGuid = FlexStr;
pub type NoteGuid = FlexStr;
pub type TagTypeGuid = FlexStr;
pub type SubmissionGuid = FlexStr;
pub type ResultGuid = FlexStr;

pub type GeneId = FlexStr;
pub type GeneSymbol = FlexStr;
pub type TranscriptId = FlexStr;
pub type Username = FlexStr;

pub type FamilyId = FlexStr;
pub type IndividualId = FlexStr;

pub type Chromosome = FlexStr;
pub type GenomeVersion = FlexStr;

// one letter (or short) status codes, eg. "Q" or "Rncc"
pub type StatusCode = FlexStr;
pub type NoteType = FlexStr;

// a population key in a variant's "populations" map, eg. "gnomad_exomes"
pub type PopulationKey = FlexStr;

// "chrom-pos-ref-alt-geneId" or "chrom-pos-end-geneId"
pub type VariantUniqueId = String;

pub type TableName = String;

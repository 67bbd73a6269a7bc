use flexstr::SharedStr as FlexStr;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StatusOption {
    pub value: FlexStr,
    #[serde(default)]
    pub name: FlexStr,
}

impl StatusOption {
    pub fn new(value: &str, name: &str) -> StatusOption {
        StatusOption {
            value: value.into(),
            name: name.into(),
        }
    }
}

lazy_static! {
    pub static ref FAMILY_ANALYSIS_STATUS_OPTIONS: Vec<StatusOption> = vec![
        StatusOption::new(ANALYSIS_STATUS_SOLVED, "Solved"),
        StatusOption::new("S_kgfp", "Solved - known gene for phenotype"),
        StatusOption::new("S_kgdp", "Solved - gene linked to different phenotype"),
        StatusOption::new("S_ng", "Solved - novel gene"),
        StatusOption::new("Sc_kgfp", "Strong candidate - known gene for phenotype"),
        StatusOption::new("Sc_kgdp", "Strong candidate - gene linked to different phenotype"),
        StatusOption::new("Sc_ng", "Strong candidate - novel gene"),
        StatusOption::new("Rcpc", "Reviewed, currently pursuing candidates"),
        StatusOption::new("Rncc", "Reviewed, no clear candidate"),
        StatusOption::new(ANALYSIS_STATUS_CLOSED, "Closed, no longer under analysis"),
        StatusOption::new(ANALYSIS_STATUS_IN_PROGRESS, "Analysis in Progress"),
        StatusOption::new(ANALYSIS_STATUS_WAITING_FOR_DATA, "Waiting for data"),
    ];

    pub static ref CASE_REVIEW_STATUS_OPTIONS: Vec<StatusOption> = vec![
        StatusOption::new(CASE_REVIEW_STATUS_IN_REVIEW, "In Review"),
        StatusOption::new("U", "Uncertain"),
        StatusOption::new(CASE_REVIEW_STATUS_ACCEPTED, "Accepted"),
        StatusOption::new("R", "Not Accepted"),
        StatusOption::new(CASE_REVIEW_STATUS_MORE_INFO_NEEDED, "More Info Needed"),
        StatusOption::new("P", "Pending Results and Records"),
        StatusOption::new("W", "Waitlist"),
    ];
}

pub const ANALYSIS_STATUS_SOLVED: &str = "S";
pub const ANALYSIS_STATUS_CLOSED: &str = "C";
pub const ANALYSIS_STATUS_IN_PROGRESS: &str = "I";
pub const ANALYSIS_STATUS_WAITING_FOR_DATA: &str = "Q";

pub const SOLVED_ANALYSIS_STATUS_PREFIX: &str = "S_";
pub const STRONG_CANDIDATE_ANALYSIS_STATUS_PREFIX: &str = "Sc_";

pub const CASE_REVIEW_STATUS_IN_REVIEW: &str = "I";
pub const CASE_REVIEW_STATUS_ACCEPTED: &str = "A";
pub const CASE_REVIEW_STATUS_MORE_INFO_NEEDED: &str = "Q";

// note types of family notes
pub const NOTE_TYPE_ANALYSIS: &str = "A";
pub const NOTE_TYPE_MME: &str = "M";
pub const NOTE_TYPE_CASE_REVIEW: &str = "C";

// field id in export rows -> note type
pub const FAMILY_NOTES_FIELDS: &[(&str, &str)] = &[
    ("analysisNotes", NOTE_TYPE_ANALYSIS),
    ("mmeNotes", NOTE_TYPE_MME),
    ("caseReviewNotes", NOTE_TYPE_CASE_REVIEW),
];

pub const FAMILY_FIELD_ID: &str = "familyId";
pub const FAMILY_FIELD_FIRST_SAMPLE: &str = "firstSample";
pub const INDIVIDUAL_FIELD_ID: &str = "individualId";
pub const INDIVIDUAL_HAS_DATA_FIELD: &str = "hasActiveData";

pub const SHOW_ALL: &str = "SHOW_ALL";

pub const DEFAULT_TABLE_NAME: &str = "family";
pub const CASE_REVIEW_TABLE_NAME: &str = "Case Review";

pub const GENOME_VERSION_37: &str = "37";
pub const GENOME_VERSION_38: &str = "38";

pub const SV_CALLSET_CRITERIA_MESSAGE: &str =
    "Only an approximate SV callset frequency is available as variants are merged across \
     samples using overlap and breakpoint criteria";
pub const GNOMAD_SV_CRITERIA_MESSAGE: &str =
    "The gnomAD SV frequency is computed from a match on overlap and breakpoint criteria, \
     the exact same variant may not be present in gnomAD";

// prefix removed from population IDs before display
pub const GNOMAD_SV_ID_PREFIX: &str = "gnomAD-SV_v2.1_";

pub const DEFAULT_FREQUENCY_PRECISION: usize = 2;

pub const MME_DEFAULT_CONTACT_EMAIL: &str = "matchmaker@broadinstitute.org";

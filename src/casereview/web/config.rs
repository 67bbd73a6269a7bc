use std::collections::HashMap;
use std::io::BufReader;
use std::fs::File;

use anyhow::{Context, Result};

use flexstr::SharedStr as FlexStr;

use crate::constants::*;

// Named formatters for export cells, applied to the raw field value
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldFormat {
    // date part of a timestamp
    Date,
    // family notes, joined
    Notes,
    // full name or email of an analyst
    UserName,
    // "analysed by" audit entries, joined
    AnalysedBy,
    // "Yes" iff the value is present (not null)
    Present,
    // "Yes"/"No" for a boolean
    YesNo,
    // phenotype feature labels, joined
    FeatureLabels,
    // analysis status code -> display name
    AnalysisStatus,
    // case review status code -> display name
    CaseReviewStatus,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub field: String,
    pub header: String,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub format: Option<FieldFormat>,
}

impl FieldConfig {
    pub fn new(field: &str, header: &str, format: Option<FieldFormat>) -> FieldConfig {
        FieldConfig {
            field: field.into(),
            header: header.into(),
            format,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ExportFieldSets {
    pub family: Vec<FieldConfig>,
    pub case_review_family: Vec<FieldConfig>,
    pub individual: Vec<FieldConfig>,
    pub case_review_individual: Vec<FieldConfig>,
    pub sample: Vec<FieldConfig>,
}

impl Default for ExportFieldSets {
    fn default() -> ExportFieldSets {
        use FieldFormat::*;

        let family_id = FieldConfig::new("familyId", "Family ID", None);
        let display_name = FieldConfig::new("displayName", "Display Name", None);
        let individual_id = FieldConfig::new("individualId", "Individual ID", None);
        let features = FieldConfig::new("features", "HPO Terms", Some(FeatureLabels));

        ExportFieldSets {
            family: vec![
                family_id.clone(),
                display_name.clone(),
                FieldConfig::new("createdDate", "Created Date", Some(Date)),
                FieldConfig::new("description", "Description", None),
                FieldConfig::new("analysisStatus", "Analysis Status", Some(AnalysisStatus)),
                FieldConfig::new("assignedAnalyst", "Assigned Analyst", Some(UserName)),
                FieldConfig::new("analysedBy", "Analysed By", Some(AnalysedBy)),
                FieldConfig::new("codedPhenotype", "Coded Phenotype", None),
                FieldConfig::new("firstSample", "Data Loaded?", Some(Present)),
                FieldConfig::new("analysisNotes", "Analysis Notes", Some(Notes)),
                FieldConfig::new("mmeNotes", "Matchmaker Notes", Some(Notes)),
            ],
            case_review_family: vec![
                family_id.clone(),
                display_name,
                FieldConfig::new("createdDate", "Created Date", Some(Date)),
                FieldConfig::new("firstSample", "Data Loaded?", Some(Present)),
                FieldConfig::new("caseReviewNotes", "Case Review Notes", Some(Notes)),
            ],
            individual: vec![
                family_id.clone(),
                individual_id.clone(),
                FieldConfig::new("paternalId", "Paternal ID", None),
                FieldConfig::new("maternalId", "Maternal ID", None),
                FieldConfig::new("sex", "Sex", None),
                FieldConfig::new("affected", "Affected Status", None),
                FieldConfig::new("hasActiveData", "Individual Data Loaded", Some(YesNo)),
                features.clone(),
            ],
            case_review_individual: vec![
                family_id.clone(),
                individual_id.clone(),
                FieldConfig::new("sex", "Sex", None),
                FieldConfig::new("affected", "Affected Status", None),
                FieldConfig::new("caseReviewStatus", "Case Review Status", Some(CaseReviewStatus)),
                FieldConfig::new("caseReviewStatusLastModifiedDate",
                                 "Case Review Status Last Modified", Some(Date)),
                features,
            ],
            sample: vec![
                family_id,
                individual_id,
                FieldConfig::new("sampleId", "Sample ID", None),
                FieldConfig::new("sampleType", "Sample Type", None),
                FieldConfig::new("datasetType", "Dataset Type", None),
                FieldConfig::new("loadedDate", "Loaded Date", Some(Date)),
                FieldConfig::new("isActive", "Active", Some(YesNo)),
            ],
        }
    }
}

// configuration for one population in the variant frequency display
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PopulationConfig {
    // key in the variant "populations" map
    pub field: FlexStr,
    pub field_title: FlexStr,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub precision: Option<usize>,
    // if set, show "<ac_display>=<ac> out of <an>"
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub ac_display: Option<FlexStr>,
    #[serde(default)]
    pub is_het: bool,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub help_message: Option<FlexStr>,
    // the title links to the gene page of the site, eg. gnomAD
    #[serde(default)]
    pub gene_title_link: bool,
    // genome version -> host and path prefix
    #[serde(default)]
    pub urls: HashMap<FlexStr, FlexStr>,
    // genome version -> query string
    #[serde(default)]
    pub query_params: HashMap<FlexStr, FlexStr>,
}

impl PopulationConfig {
    fn new(field: &str, field_title: &str) -> PopulationConfig {
        PopulationConfig {
            field: field.into(),
            field_title: field_title.into(),
            precision: None,
            ac_display: None,
            is_het: false,
            help_message: None,
            gene_title_link: false,
            urls: HashMap::new(),
            query_params: HashMap::new(),
        }
    }

    fn with_precision(mut self, precision: usize) -> PopulationConfig {
        self.precision = Some(precision);
        self
    }

    fn with_ac_display(mut self) -> PopulationConfig {
        self.ac_display = Some("AC".into());
        self
    }

    fn het(mut self) -> PopulationConfig {
        self.is_het = true;
        self
    }

    fn with_help_message(mut self, message: &str) -> PopulationConfig {
        self.help_message = Some(message.into());
        self
    }

    fn with_url(mut self, genome_version: &str, url: &str, query: Option<&str>) -> PopulationConfig {
        self.urls.insert(genome_version.into(), url.into());
        if let Some(query) = query {
            self.query_params.insert(genome_version.into(), query.into());
        }
        self
    }

    fn with_gene_title_link(mut self) -> PopulationConfig {
        self.gene_title_link = true;
        self
    }

    pub fn precision(&self) -> usize {
        self.precision.unwrap_or(DEFAULT_FREQUENCY_PRECISION)
    }
}

pub fn default_populations() -> Vec<PopulationConfig> {
    const GNOMAD_URL: &str = "gnomad.broadinstitute.org";

    vec![
        PopulationConfig::new("sv_callset", "This Callset")
            .with_ac_display().with_help_message(SV_CALLSET_CRITERIA_MESSAGE),
        PopulationConfig::new("callset", "This Callset").with_ac_display(),
        PopulationConfig::new("g1k", "1kg WGS"),
        PopulationConfig::new("exac", "ExAC")
            .with_url(GENOME_VERSION_37, GNOMAD_URL, Some("dataset=exac")),
        PopulationConfig::new("gnomad_exomes", "gnomAD v2 exomes")
            .with_gene_title_link()
            .with_url(GENOME_VERSION_37, GNOMAD_URL, None),
        PopulationConfig::new("gnomad_genomes", "gnomAD v3 genomes")
            .with_gene_title_link().with_precision(3)
            .with_url(GENOME_VERSION_37, GNOMAD_URL, None)
            .with_url(GENOME_VERSION_38, GNOMAD_URL, Some("dataset=gnomad_r3")),
        PopulationConfig::new("topmed", "TopMed").with_precision(3)
            .with_url(GENOME_VERSION_37, "bravo.sph.umich.edu/freeze3a/hg19", None)
            .with_url(GENOME_VERSION_38, "bravo.sph.umich.edu/freeze5/hg38", None),
        PopulationConfig::new("gnomad_svs", "gnomAD SVs").with_precision(3)
            .with_url(GENOME_VERSION_37, GNOMAD_URL, Some("dataset=gnomad_sv_r2_1"))
            .with_help_message(GNOMAD_SV_CRITERIA_MESSAGE),
        PopulationConfig::new("callset_heteroplasmy", "This Callset")
            .with_ac_display().het().with_precision(3),
        PopulationConfig::new("gnomad_mito", "gnomAD mito").with_precision(3)
            .with_url(GENOME_VERSION_38, GNOMAD_URL, Some("dataset=gnomad_r3")),
        PopulationConfig::new("gnomad_mito_heteroplasmy", "gnomAD mito").het().with_precision(3)
            .with_url(GENOME_VERSION_38, GNOMAD_URL, Some("dataset=gnomad_r3")),
        PopulationConfig::new("helix", "Helix mito").with_precision(3),
        PopulationConfig::new("helix_heteroplasmy", "Helix mito").het().with_precision(3),
    ]
}

fn default_genome_version_display() -> HashMap<FlexStr, FlexStr> {
    let mut ret = HashMap::new();
    ret.insert(GENOME_VERSION_37.into(), "GRCh37".into());
    ret.insert(GENOME_VERSION_38.into(), "GRCh38".into());
    ret
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Config {
    pub export_fields: ExportFieldSets,
    pub populations: Vec<PopulationConfig>,
    // eg. "38" -> "GRCh38"
    pub genome_version_display: HashMap<FlexStr, FlexStr>,
    // removed from the submission contact when drafting a contact email
    pub mme_default_contact_email: FlexStr,
    pub case_review_table_name: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            export_fields: ExportFieldSets::default(),
            populations: default_populations(),
            genome_version_display: default_genome_version_display(),
            mme_default_contact_email: MME_DEFAULT_CONTACT_EMAIL.into(),
            case_review_table_name: CASE_REVIEW_TABLE_NAME.into(),
        }
    }
}

impl Config {

    pub fn read(config_file_name: &str) -> Result<Config> {
        let file = File::open(config_file_name)
            .with_context(|| format!("failed to read {}", config_file_name))?;
        let reader = BufReader::new(file);

        let config = serde_json::from_reader(reader)
            .with_context(|| format!("failed to parse {}", config_file_name))?;

        Ok(config)
    }

    pub fn genome_version_display(&self, genome_version: &str) -> Option<FlexStr> {
        self.genome_version_display.get(genome_version).cloned()
    }

    pub fn population_config(&self, field: &str) -> Option<&PopulationConfig> {
        self.populations.iter().find(|pop| pop.field.as_str() == field)
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.populations.len(), 13);
    assert_eq!(config.population_config("gnomad_genomes").unwrap().precision(), 3);
    assert_eq!(config.population_config("g1k").unwrap().precision(), 2);
    assert_eq!(config.genome_version_display("38").unwrap().as_str(), "GRCh38");
    assert!(config.genome_version_display("39").is_none());
}

#[test]
fn test_partial_config_json() {
    let config: Config =
        serde_json::from_str(r#"{ "case_review_table_name": "Review" }"#).unwrap();
    assert_eq!(config.case_review_table_name, "Review");
    assert_eq!(config.export_fields.sample.len(), 7);
    assert_eq!(config.mme_default_contact_email.as_str(), MME_DEFAULT_CONTACT_EMAIL);
}

use std::io;

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::constants::*;
use crate::data_types::*;
use crate::utils::{date_part, to_snakecase};
use crate::web::config::{Config, FieldConfig, FieldFormat};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFileFormat {
    Xls,
    Tsv,
}

impl ExportFileFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ExportFileFormat::Xls => "xls",
            ExportFileFormat::Tsv => "tsv",
        }
    }

    // the download link of a table, the format is a query parameter
    pub fn download_url(&self, url: &str) -> String {
        format!("{}?file_format={}", url, self.name())
    }

    pub fn file_name(&self, export_file_name: &str) -> String {
        format!("{}.{}", export_file_name, self.name())
    }
}

// Export file name:
//   <project name, lowercased with underscores>_[<table name snake cased>_]<file_name>
pub fn export_file_name(project_name: &str, table_name: Option<&str>, file_name: &str) -> String {
    let table_part =
        match table_name.filter(|name| !name.is_empty()) {
            Some(table_name) => format!("{}_", to_snakecase(table_name)),
            None => String::new(),
        };

    format!("{}_{}{}", project_name.replace(' ', "_").to_lowercase(), table_part, file_name)
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ExportConfig {
    pub filename: String,
    pub headers: Vec<String>,
    #[serde(skip)]
    pub fields: Vec<FieldConfig>,
}

impl ExportConfig {
    // one output cell per configured field
    pub fn process_row(&self, record: &Value) -> Vec<String> {
        self.fields.iter()
            .map(|field_config| {
                let value = record.get(&field_config.field).unwrap_or(&Value::Null);
                match field_config.format {
                    Some(format) => format_value(value, format),
                    None => value_to_cell(value),
                }
            })
            .collect()
    }

    pub fn process_rows(&self, records: &[Value]) -> Vec<Vec<String>> {
        records.iter().map(|record| self.process_row(record)).collect()
    }
}

pub fn entity_export_config(project: &Project, table_name: Option<&str>, file_name: &str,
                            fields: &[FieldConfig])
    -> ExportConfig
{
    ExportConfig {
        filename: export_file_name(&project.name, table_name, file_name),
        headers: fields.iter().map(|config| config.header.clone()).collect(),
        fields: fields.to_vec(),
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(values) => itertools::join(values.iter().map(value_to_cell), ", "),
        Value::Object(_) => value.to_string(),
    }
}

fn str_field<'a>(value: &'a Value, field_name: &str) -> Option<&'a str> {
    value.get(field_name).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn user_display(value: &Value) -> String {
    str_field(value, "fullName")
        .or_else(|| str_field(value, "email"))
        .unwrap_or("")
        .to_owned()
}

fn status_name(options: &[crate::constants::StatusOption], value: &Value) -> String {
    let Some(code) = value.as_str()
    else {
        return value_to_cell(value);
    };

    options.iter()
        .find(|option| option.value.as_str() == code)
        .map(|option| option.name.to_string())
        .unwrap_or_else(|| code.to_owned())
}

fn format_date(value: &Value) -> String {
    let Some(timestamp) = value.as_str()
    else {
        return value_to_cell(value);
    };

    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(datetime) => datetime.format("%Y-%m-%d").to_string(),
        Err(_) => date_part(timestamp).to_owned(),
    }
}

fn map_array<F>(value: &Value, f: F, separator: &str) -> String
  where F: Fn(&Value) -> String
{
    match value.as_array() {
        Some(values) => {
            itertools::join(values.iter().map(f).filter(|s| !s.is_empty()), separator)
        },
        None => String::new(),
    }
}

pub fn format_value(value: &Value, format: FieldFormat) -> String {
    let yes_no = |b: bool| if b { "Yes".to_owned() } else { "No".to_owned() };

    match format {
        FieldFormat::Date => format_date(value),
        FieldFormat::Notes =>
            map_array(value, |note| str_field(note, "note").unwrap_or("").to_owned(), "; "),
        FieldFormat::UserName => user_display(value),
        FieldFormat::AnalysedBy =>
            map_array(value, |analysed_by| {
                analysed_by.get("createdBy").map(user_display).unwrap_or_default()
            }, ", "),
        FieldFormat::Present => yes_no(!value.is_null()),
        FieldFormat::YesNo => yes_no(value.as_bool().unwrap_or(false)),
        FieldFormat::FeatureLabels =>
            map_array(value, |feature| str_field(feature, "label").unwrap_or("").to_owned(), ", "),
        FieldFormat::AnalysisStatus => status_name(&FAMILY_ANALYSIS_STATUS_OPTIONS, value),
        FieldFormat::CaseReviewStatus => status_name(&CASE_REVIEW_STATUS_OPTIONS, value),
    }
}

fn to_record<T: serde::Serialize>(entity: &T) -> Map<String, Value> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn to_value_or_null<T: serde::Serialize>(value: Option<&T>) -> Value {
    value.and_then(|v| serde_json::to_value(v).ok()).unwrap_or(Value::Null)
}

// the families with their notes and first sample, for export
pub fn families_export_data(visible_families: &[Family], samples_by_family: &SamplesByFamily,
                            notes_by_family_type: &NotesByFamilyType)
    -> Vec<Value>
{
    visible_families.iter()
        .map(|family| {
            let mut record = to_record(family);
            let family_notes = notes_by_family_type.get(&family.family_guid);

            for (field_id, note_type) in FAMILY_NOTES_FIELDS {
                let notes = family_notes.and_then(|notes| notes.get(*note_type));
                record.insert((*field_id).into(), to_value_or_null(notes));
            }

            let first_sample =
                samples_by_family.get(&family.family_guid).and_then(|samples| samples.first());
            record.insert(FAMILY_FIELD_FIRST_SAMPLE.into(), to_value_or_null(first_sample));

            Value::Object(record)
        })
        .collect()
}

// the individuals of the families, in family order
pub fn individuals_export_data(families: &[Family], individuals_by_family: &IndividualsByFamily,
                               samples_by_guid: &SamplesByGuid)
    -> Vec<Value>
{
    families.iter()
        .flat_map(|family| {
            individuals_by_family.get(&family.family_guid)
                .into_iter()
                .flatten()
                .map(move |individual| {
                    let mut record = to_record(individual);
                    let has_active_data =
                        individual.sample_guids.iter()
                        .filter_map(|guid| samples_by_guid.get(guid))
                        .any(|sample| sample.is_active);
                    record.insert(FAMILY_FIELD_ID.into(), Value::from(family.family_id.as_str()));
                    record.insert(INDIVIDUAL_HAS_DATA_FIELD.into(), Value::from(has_active_data));
                    Value::Object(record)
                })
        })
        .collect()
}

// the samples of the families, in family order
pub fn samples_export_data(families: &[Family], individuals_by_guid: &IndividualsByGuid,
                           samples_by_family: &SamplesByFamily)
    -> Vec<Value>
{
    families.iter()
        .flat_map(|family| {
            samples_by_family.get(&family.family_guid)
                .into_iter()
                .flatten()
                .map(move |sample| {
                    let mut record = to_record(sample);
                    let individual_id =
                        individuals_by_guid.get(&sample.individual_guid)
                        .map(|individual| Value::from(individual.individual_id.as_str()))
                        .unwrap_or(Value::Null);
                    record.insert(FAMILY_FIELD_ID.into(), Value::from(family.family_id.as_str()));
                    record.insert(INDIVIDUAL_FIELD_ID.into(), individual_id);
                    Value::Object(record)
                })
        })
        .collect()
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportEntity {
    Families,
    Individuals,
    Samples,
}

impl ExportEntity {
    pub fn name(&self) -> &'static str {
        match self {
            ExportEntity::Families => "Families",
            ExportEntity::Individuals => "Individuals",
            ExportEntity::Samples => "Samples",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportEntity::Families => "families",
            ExportEntity::Individuals => "individuals",
            ExportEntity::Samples => "samples",
        }
    }

    // "families", "individuals" or "samples"
    pub fn from_name(name: &str) -> Option<ExportEntity> {
        [ExportEntity::Families, ExportEntity::Individuals, ExportEntity::Samples]
            .into_iter()
            .find(|entity| entity.file_name() == name.to_lowercase())
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ExportTable {
    pub name: &'static str,
    pub entity: ExportEntity,
    #[serde(flatten)]
    pub config: ExportConfig,
}

// The Families, Individuals and Samples export tables of a project.  The case
// review table exports a different set of family and individual fields.
pub fn project_export_tables(project: &Project, table_name: Option<&str>, config: &Config)
    -> Vec<ExportTable>
{
    let is_case_review = table_name == Some(config.case_review_table_name.as_str());
    let fields = &config.export_fields;

    let family_fields =
        if is_case_review { &fields.case_review_family } else { &fields.family };
    let individual_fields =
        if is_case_review { &fields.case_review_individual } else { &fields.individual };

    [(ExportEntity::Families, family_fields),
     (ExportEntity::Individuals, individual_fields),
     (ExportEntity::Samples, &fields.sample)]
        .into_iter()
        .map(|(entity, entity_fields)| ExportTable {
            name: entity.name(),
            entity,
            config: entity_export_config(project, table_name, entity.file_name(), entity_fields),
        })
        .collect()
}

// write the header and rows as tab separated values
pub fn write_tsv<W: io::Write>(writer: W, config: &ExportConfig, records: &[Value])
    -> Result<(), csv::Error>
{
    let mut tsv_writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    tsv_writer.write_record(&config.headers)?;

    for row in config.process_rows(records) {
        tsv_writer.write_record(&row)?;
    }

    tsv_writer.flush()?;

    Ok(())
}

#[test]
fn test_export_file_name() {
    assert_eq!(export_file_name("My Project", Some("case review"), "families"),
               "my_project_case_review_families");
    assert_eq!(export_file_name("My Project", None, "samples"), "my_project_samples");
    assert_eq!(export_file_name("Rare Disease Cohort", Some(""), "individuals"),
               "rare_disease_cohort_individuals");
}

#[test]
fn test_download_url() {
    assert_eq!(ExportFileFormat::Tsv.download_url("/api/project/P1/export"),
               "/api/project/P1/export?file_format=tsv");
    assert_eq!(ExportFileFormat::Xls.file_name("my_project_families"),
               "my_project_families.xls");
}

#[test]
fn test_format_value() {
    use serde_json::json;

    assert_eq!(format_value(&json!("2024-02-01T10:00:00+00:00"), FieldFormat::Date), "2024-02-01");
    assert_eq!(format_value(&json!("2024-02-01T10:00:00.123"), FieldFormat::Date), "2024-02-01");
    assert_eq!(format_value(&Value::Null, FieldFormat::Date), "");
    assert_eq!(format_value(&json!({"fullName": "", "email": "a@b.org"}), FieldFormat::UserName),
               "a@b.org");
    assert_eq!(format_value(&Value::Null, FieldFormat::Present), "No");
    assert_eq!(format_value(&json!({"sampleId": "S1"}), FieldFormat::Present), "Yes");
    assert_eq!(format_value(&json!(true), FieldFormat::YesNo), "Yes");
    assert_eq!(format_value(&json!([{"label": "Seizures"}, {"label": "Ataxia"}]),
                            FieldFormat::FeatureLabels), "Seizures, Ataxia");
    assert_eq!(format_value(&json!("Q"), FieldFormat::AnalysisStatus), "Waiting for data");
    assert_eq!(format_value(&json!("XYZ"), FieldFormat::CaseReviewStatus), "XYZ");
    assert_eq!(format_value(&json!([{"note": "first"}, {"note": "second"}]), FieldFormat::Notes),
               "first; second");
}

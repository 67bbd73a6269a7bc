use indexmap::IndexMap;

use flexstr::SharedStr as FlexStr;

use crate::data_types::*;
use crate::store::GroupedByProject;
use crate::types::*;
use crate::utils::date_part;

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScopedIndividual {
    #[serde(flatten)]
    pub individual: Individual,
    pub family_id: FamilyId,
}

pub type ScopedIndividualsByGuid = IndexMap<IndividualGuid, ScopedIndividual>;

pub fn current_project(projects_by_guid: &ProjectsByGuid, project_guid: Option<&ProjectGuid>)
    -> Option<Project>
{
    project_guid.and_then(|guid| projects_by_guid.get(guid)).cloned()
}

// the entities of one project, empty if the project has none
pub fn entities_for_project<T: Clone>(grouped: &GroupedByProject<T>,
                                      project_guid: Option<&ProjectGuid>)
    -> IndexMap<FlexStr, T>
{
    project_guid
        .and_then(|guid| grouped.get(guid))
        .cloned()
        .unwrap_or_default()
}

// None if no group is selected or if the GUID isn't a group of this project
pub fn current_analysis_group(project_analysis_groups: &AnalysisGroupsByGuid,
                              analysis_group_guid: Option<&AnalysisGroupGuid>)
    -> Option<AnalysisGroup>
{
    analysis_group_guid
        .and_then(|guid| project_analysis_groups.get(guid))
        .cloned()
}

// The families of the current analysis group, in group order, or all the
// project families if there is no current group.  Group members that aren't
// families of the project are skipped.
pub fn analysis_group_families(project_families: &FamiliesByGuid,
                               analysis_group: Option<&AnalysisGroup>)
    -> FamiliesByGuid
{
    match analysis_group {
        Some(analysis_group) => {
            analysis_group.family_guids.iter()
                .filter_map(|family_guid| {
                    project_families.get(family_guid)
                        .map(|family| (family_guid.clone(), family.clone()))
                })
                .collect()
        },
        None => project_families.clone(),
    }
}

pub fn analysis_group_individuals_count(families_by_guid: &FamiliesByGuid,
                                        individuals_by_guid: &IndividualsByGuid)
    -> usize
{
    families_by_guid.values()
        .flat_map(|family| family.individual_guids.iter())
        .filter(|guid| individuals_by_guid.contains_key(*guid))
        .count()
}

// the individuals of the families, each carrying its family's ID
pub fn analysis_group_individuals(individuals_by_guid: &IndividualsByGuid,
                                  families_by_guid: &FamiliesByGuid)
    -> ScopedIndividualsByGuid
{
    let mut ret = IndexMap::new();

    for family in families_by_guid.values() {
        for individual_guid in &family.individual_guids {
            if let Some(individual) = individuals_by_guid.get(individual_guid) {
                ret.insert(individual_guid.clone(), ScopedIndividual {
                    individual: individual.clone(),
                    family_id: family.family_id.clone(),
                });
            }
        }
    }

    ret
}

// Count the samples by "sampleType__datasetType" and then by loaded date.
// Uses the samples of the group's families if there is a current group.
pub fn analysis_group_samples_by_types(project_samples: &SamplesByGuid,
                                       samples_by_family: &SamplesByFamily,
                                       analysis_group: Option<&AnalysisGroup>)
    -> SampleCountsByType
{
    let samples: Vec<&Sample> =
        match analysis_group {
            Some(analysis_group) => {
                analysis_group.family_guids.iter()
                    .filter_map(|family_guid| samples_by_family.get(family_guid))
                    .flatten()
                    .collect()
            },
            None => project_samples.values().collect(),
        };

    let mut ret = SampleCountsByType::new();

    for sample in samples {
        let type_key = format!("{}__{}", sample.sample_type, sample.dataset_type);
        let loaded_date = date_part(&sample.loaded_date).to_owned();
        *ret.entry(type_key).or_default().entry(loaded_date).or_insert(0) += 1;
    }

    ret
}

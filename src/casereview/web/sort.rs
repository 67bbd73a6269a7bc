use std::cmp::Ordering;

use crate::constants::FAMILY_ANALYSIS_STATUS_OPTIONS;
use crate::data_types::*;
use crate::web::cmp_utils::locale_cmp;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FamilySort {
    #[default]
    FamilyName,
    FamilyAddedDate,
    DataLoadedDate,
    ReviewStatusChangedDate,
    AnalysisStatus,
    AssignedAnalyst,
}

pub const ALL_FAMILY_SORTS: &[FamilySort] = &[
    FamilySort::FamilyName,
    FamilySort::FamilyAddedDate,
    FamilySort::DataLoadedDate,
    FamilySort::ReviewStatusChangedDate,
    FamilySort::AnalysisStatus,
    FamilySort::AssignedAnalyst,
];

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn multiplier(&self) -> i8 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }

    pub fn apply(&self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

pub struct SortContext<'a> {
    pub individuals_by_guid: &'a IndividualsByGuid,
    pub samples_by_family: &'a SamplesByFamily,
}

impl FamilySort {
    pub fn name(&self) -> &'static str {
        match self {
            FamilySort::FamilyName => "FAMILY_NAME",
            FamilySort::FamilyAddedDate => "FAMILY_ADDED_DATE",
            FamilySort::DataLoadedDate => "DATA_LOADED_DATE",
            FamilySort::ReviewStatusChangedDate => "REVIEW_STATUS_CHANGED_DATE",
            FamilySort::AnalysisStatus => "ANALYSIS_STATUS",
            FamilySort::AssignedAnalyst => "ASSIGNED_ANALYST",
        }
    }

    pub fn from_name(name: &str) -> Option<FamilySort> {
        ALL_FAMILY_SORTS.iter().find(|sort| sort.name() == name).copied()
    }

    // the string that families are ordered by
    pub fn sort_key(&self, family: &Family, context: &SortContext) -> String {
        match self {
            FamilySort::FamilyName => family.display_name.to_string(),
            FamilySort::FamilyAddedDate =>
                family.created_date.as_ref().map(|d| d.to_string()).unwrap_or_default(),
            FamilySort::DataLoadedDate => {
                context.samples_by_family.get(&family.family_guid)
                    .and_then(|samples| {
                        samples.iter()
                            .filter(|sample| sample.is_active)
                            .map(|sample| sample.loaded_date.to_string())
                            .max()
                    })
                    .unwrap_or_default()
            },
            FamilySort::ReviewStatusChangedDate => {
                family.individual_guids.iter()
                    .filter_map(|guid| context.individuals_by_guid.get(guid))
                    .filter_map(|individual| {
                        individual.case_review_status_last_modified_date.as_ref()
                            .map(|d| d.to_string())
                    })
                    .max()
                    .unwrap_or_default()
            },
            FamilySort::AnalysisStatus => {
                // position in the status option list, unknown statuses last
                let position =
                    family.analysis_status.as_ref()
                    .and_then(|status| {
                        FAMILY_ANALYSIS_STATUS_OPTIONS.iter()
                            .position(|option| option.value == *status)
                    })
                    .unwrap_or(FAMILY_ANALYSIS_STATUS_OPTIONS.len());
                format!("{:03}", position)
            },
            FamilySort::AssignedAnalyst => {
                family.assigned_analyst.as_ref()
                    .map(|analyst| analyst.display().to_string())
                    .unwrap_or_default()
            },
        }
    }
}

// Return a sorted copy of the families.  With no sort the input order is
// kept.  The sort is stable.
pub fn sort_families(families: &[Family], sort: Option<FamilySort>,
                     direction: SortDirection, context: &SortContext)
    -> Vec<Family>
{
    let Some(sort) = sort
    else {
        return families.to_vec();
    };

    let mut keyed: Vec<(String, &Family)> =
        families.iter()
        .map(|family| (sort.sort_key(family, context), family))
        .collect();

    keyed.sort_by(|(key1, _), (key2, _)| direction.apply(locale_cmp(key1, key2)));

    keyed.into_iter().map(|(_, family)| family.clone()).collect()
}

#[test]
fn test_sort_names() {
    for sort in ALL_FAMILY_SORTS {
        assert_eq!(FamilySort::from_name(sort.name()), Some(*sort));
    }
    assert_eq!(FamilySort::default(), FamilySort::FamilyName);
    assert!(FamilySort::from_name("UNKNOWN").is_none());
}

#[test]
fn test_direction() {
    assert_eq!(SortDirection::Ascending.multiplier(), 1);
    assert_eq!(SortDirection::Descending.multiplier(), -1);
    assert_eq!(SortDirection::Descending.apply(Ordering::Less), Ordering::Greater);
    assert_eq!(SortDirection::Ascending.apply(Ordering::Less), Ordering::Less);
}

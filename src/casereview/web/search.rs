use std::str::FromStr;

use flexstr::SharedStr as FlexStr;

use crate::constants::*;
use crate::data_types::*;

// Named family filters.  Unknown names (and SHOW_ALL) have no FamilyFilter,
// and filtering with no filter keeps every family.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FamilyFilter {
    DataLoaded,
    NoData,
    NeedsReview,
    InReview,
    Accepted,
    AssignedToMe,
    AnalysedByMe,
    NotAnalysedByMe,
    Analysed,
    NotAnalysed,
    Solved,
    StrongCandidate,
    Closed,
    InProgress,
}

pub const ALL_FAMILY_FILTERS: &[FamilyFilter] = &[
    FamilyFilter::DataLoaded,
    FamilyFilter::NoData,
    FamilyFilter::NeedsReview,
    FamilyFilter::InReview,
    FamilyFilter::Accepted,
    FamilyFilter::AssignedToMe,
    FamilyFilter::AnalysedByMe,
    FamilyFilter::NotAnalysedByMe,
    FamilyFilter::Analysed,
    FamilyFilter::NotAnalysed,
    FamilyFilter::Solved,
    FamilyFilter::StrongCandidate,
    FamilyFilter::Closed,
    FamilyFilter::InProgress,
];

// the data a filter predicate may look at
pub struct FilterContext<'a> {
    pub individuals_by_guid: &'a IndividualsByGuid,
    pub user: &'a User,
    pub samples_by_family: &'a SamplesByFamily,
}

impl FamilyFilter {
    pub fn name(&self) -> &'static str {
        match self {
            FamilyFilter::DataLoaded => "DATA_LOADED",
            FamilyFilter::NoData => "NO_DATA",
            FamilyFilter::NeedsReview => "NEEDS_REVIEW",
            FamilyFilter::InReview => "IN_REVIEW",
            FamilyFilter::Accepted => "ACCEPTED",
            FamilyFilter::AssignedToMe => "ASSIGNED_TO_ME",
            FamilyFilter::AnalysedByMe => "ANALYSED_BY_ME",
            FamilyFilter::NotAnalysedByMe => "NOT_ANALYSED_BY_ME",
            FamilyFilter::Analysed => "ANALYSED",
            FamilyFilter::NotAnalysed => "NOT_ANALYSED",
            FamilyFilter::Solved => "SOLVED",
            FamilyFilter::StrongCandidate => "STRONG_CANDIDATE",
            FamilyFilter::Closed => "CLOSED",
            FamilyFilter::InProgress => "IN_PROGRESS",
        }
    }

    pub fn from_name(name: &str) -> Option<FamilyFilter> {
        ALL_FAMILY_FILTERS.iter().find(|filter| filter.name() == name).copied()
    }

    pub fn matches(&self, family: &Family, context: &FilterContext) -> bool {
        let individual_statuses = || {
            family.individual_guids.iter()
                .filter_map(|guid| context.individuals_by_guid.get(guid))
                .filter_map(|individual| individual.case_review_status.clone())
        };
        let has_review_status = |statuses: &[&str]| {
            individual_statuses().any(|status| statuses.contains(&status.as_str()))
        };
        let user_email = context.user.email.as_ref().filter(|email| !email.is_empty());
        let analysed_by_user = || {
            user_email.is_some_and(|email| {
                family.analysed_by.iter()
                    .any(|analysed_by| analysed_by.created_by.email.as_ref() == Some(email))
            })
        };
        let analysis_status = family.analysis_status.as_ref().map(FlexStr::as_str).unwrap_or("");

        match self {
            FamilyFilter::DataLoaded => has_active_sample(family, context),
            FamilyFilter::NoData => !has_active_sample(family, context),
            FamilyFilter::NeedsReview =>
                has_review_status(&[CASE_REVIEW_STATUS_IN_REVIEW,
                                    CASE_REVIEW_STATUS_MORE_INFO_NEEDED]),
            FamilyFilter::InReview => has_review_status(&[CASE_REVIEW_STATUS_IN_REVIEW]),
            FamilyFilter::Accepted => has_review_status(&[CASE_REVIEW_STATUS_ACCEPTED]),
            FamilyFilter::AssignedToMe => {
                user_email.is_some_and(|email| {
                    family.assigned_analyst.as_ref()
                        .and_then(|analyst| analyst.email.as_ref()) == Some(email)
                })
            },
            FamilyFilter::AnalysedByMe => analysed_by_user(),
            FamilyFilter::NotAnalysedByMe => !analysed_by_user(),
            FamilyFilter::Analysed => !family.analysed_by.is_empty(),
            FamilyFilter::NotAnalysed => family.analysed_by.is_empty(),
            FamilyFilter::Solved =>
                analysis_status == ANALYSIS_STATUS_SOLVED ||
                analysis_status.starts_with(SOLVED_ANALYSIS_STATUS_PREFIX),
            FamilyFilter::StrongCandidate =>
                analysis_status.starts_with(STRONG_CANDIDATE_ANALYSIS_STATUS_PREFIX),
            FamilyFilter::Closed => analysis_status == ANALYSIS_STATUS_CLOSED,
            FamilyFilter::InProgress => analysis_status == ANALYSIS_STATUS_IN_PROGRESS,
        }
    }
}

impl FromStr for FamilyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FamilyFilter::from_name(s).ok_or_else(|| format!("unknown family filter: {}", s))
    }
}

fn has_active_sample(family: &Family, context: &FilterContext) -> bool {
    context.samples_by_family.get(&family.family_guid)
        .is_some_and(|samples| samples.iter().any(|sample| sample.is_active))
}

// The lowercased text that a family search string is matched against:
// names, IDs, analysts and the phenotype features of the individuals
pub fn family_search_text(family: &Family, individuals_by_guid: &IndividualsByGuid) -> String {
    let opt_str = |s: Option<&FlexStr>| s.map(FlexStr::to_string).unwrap_or_default();

    let analyst = family.assigned_analyst.clone().unwrap_or_default();

    let mut fields = vec![
        family.display_name.to_string(),
        family.family_id.to_string(),
        opt_str(analyst.full_name.as_ref()),
        opt_str(analyst.email.as_ref()),
    ];

    fields.extend(family.analysed_by.iter().map(|analysed_by| {
        format!("{}{}", opt_str(analysed_by.created_by.full_name.as_ref()),
                opt_str(analysed_by.created_by.email.as_ref()))
    }));

    fields.extend(family.individual_guids.iter()
                  .filter_map(|guid| individuals_by_guid.get(guid))
                  .map(|individual| {
                      itertools::join(individual.features.iter().map(|f| f.label.as_str()), ";")
                  }));

    fields.join(";").to_lowercase()
}

#[derive(Clone, Debug, PartialEq)]
pub struct FamilySearchEntry {
    pub search_text: String,
    pub family: Family,
}

// None when there is no search, so the text is only built when needed
pub fn families_by_search_string(families_by_guid: &FamiliesByGuid,
                                 individuals_by_guid: &IndividualsByGuid,
                                 should_search: bool)
    -> Option<Vec<FamilySearchEntry>>
{
    if !should_search {
        return None;
    }

    Some(families_by_guid.values()
         .map(|family| FamilySearchEntry {
             search_text: family_search_text(family, individuals_by_guid),
             family: family.clone(),
         })
         .collect())
}

// Apply the search string (substring match against the search text) and
// then the filter, if any.
pub fn visible_families(families_by_guid: &FamiliesByGuid,
                        search_entries: Option<&[FamilySearchEntry]>,
                        context: &FilterContext,
                        filter: Option<FamilyFilter>,
                        families_search: Option<&str>)
    -> Vec<Family>
{
    let searched_families: Vec<Family> =
        match (search_entries, families_search) {
            (Some(search_entries), Some(search)) => {
                let search = search.to_lowercase();
                search_entries.iter()
                    .filter(|entry| entry.search_text.contains(&search))
                    .map(|entry| entry.family.clone())
                    .collect()
            },
            _ => families_by_guid.values().cloned().collect(),
        };

    match filter {
        Some(filter) => {
            searched_families.into_iter()
                .filter(|family| filter.matches(family, context))
                .collect()
        },
        None => searched_families,
    }
}

#[test]
fn test_filter_names() {
    for filter in ALL_FAMILY_FILTERS {
        assert_eq!(FamilyFilter::from_name(filter.name()), Some(*filter));
        assert_eq!(filter.name().parse::<FamilyFilter>().unwrap(), *filter);
    }
    assert!(FamilyFilter::from_name(SHOW_ALL).is_none());
    assert!(FamilyFilter::from_name("NOT_A_FILTER").is_none());
}

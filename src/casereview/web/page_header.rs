use std::collections::HashMap;

use crate::data_types::*;
use crate::types::*;
use crate::utils::snakecase_to_titlecase;

const SEARCH_DISABLED_MESSAGE: &str = "Search is disabled until data is loaded";
const ANVIL_LOADING_MESSAGE: &str =
    ". Loading data from AnVIL to seqr is a slow process, and generally takes a week.";

// The parts of the current route the page header depends on
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteMatch {
    pub url: String,
    pub breadcrumb: Option<String>,
    pub analysis_group_guid: Option<String>,
    pub breadcrumb_id: Option<String>,
    pub breadcrumb_id_section: Option<String>,
    pub variant_page: Option<String>,
    pub tag: Option<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct BreadcrumbSection {
    pub content: String,
    pub link: String,
}

impl BreadcrumbSection {
    fn new(content: String, link: String) -> BreadcrumbSection {
        BreadcrumbSection { content, link }
    }
}

pub fn page_header_family<'a>(project_families: &'a FamiliesByGuid, route: &RouteMatch)
    -> Option<&'a Family>
{
    route.breadcrumb_id.as_deref().and_then(|guid| project_families.get(guid))
}

pub fn page_header_analysis_group<'a>(project_analysis_groups: &'a AnalysisGroupsByGuid,
                                      route: &RouteMatch)
    -> Option<&'a AnalysisGroup>
{
    route.breadcrumb_id.as_deref().and_then(|guid| project_analysis_groups.get(guid))
}

// the entity section, then the tag section if there is a tag
fn push_entity_sections(sections: &mut Vec<BreadcrumbSection>, route: &RouteMatch,
                        content: String, entity_path: String)
{
    if let Some(ref tag) = route.tag {
        let tag_path = format!("{}/{}", entity_path, tag);
        sections.push(BreadcrumbSection::new(content, entity_path));
        sections.push(BreadcrumbSection::new(tag.clone(), tag_path));
    } else {
        sections.push(BreadcrumbSection::new(content, entity_path));
    }
}

// The breadcrumb sections after the project.  None if there is no project or
// the breadcrumb isn't a project page.
pub fn page_header_breadcrumb_id_sections(project: Option<&Project>,
                                          family: Option<&Family>,
                                          analysis_group: Option<&AnalysisGroup>,
                                          route: &RouteMatch)
    -> Option<Vec<BreadcrumbSection>>
{
    let project = project?;

    let family_name = family.map(|family| family.display_name.as_str()).unwrap_or("");
    let family_guid = family.map(|family| family.family_guid.as_str()).unwrap_or("");
    let group_name = analysis_group.map(|group| group.name.as_str()).unwrap_or("");
    let group_guid = analysis_group.map(|group| group.analysis_group_guid.as_str()).unwrap_or("");

    match route.breadcrumb.as_deref()? {
        "project_page" => Some(vec![]),
        "family_page" => {
            let mut sections = vec![
                BreadcrumbSection::new(format!("Family: {}", family_name),
                                       format!("/project/{}/family_page/{}",
                                               project.project_guid, family_guid)),
            ];
            if let Some(ref id_section) = route.breadcrumb_id_section {
                sections.push(BreadcrumbSection::new(snakecase_to_titlecase(id_section),
                                                     route.url.clone()));
            }
            Some(sections)
        },
        "analysis_group" => {
            Some(vec![BreadcrumbSection::new(format!("Analysis Group: {}", group_name),
                                             route.url.clone())])
        },
        "saved_variants" => {
            let path = format!("/project/{}/saved_variants", project.project_guid);
            let mut sections = vec![BreadcrumbSection::new("Saved Variants".into(), path.clone())];

            match route.variant_page.as_deref() {
                Some("variant") => {
                    sections.push(BreadcrumbSection::new("Variant".into(), route.url.clone()));
                },
                Some("family") => {
                    push_entity_sections(&mut sections, route, format!("Family: {}", family_name),
                                         format!("{}/family/{}", path, family_guid));
                },
                Some("analysis_group") => {
                    push_entity_sections(&mut sections, route,
                                         format!("Analysis Group: {}", group_name),
                                         format!("{}/analysis_group/{}", path, group_guid));
                },
                Some(variant_page) if !variant_page.is_empty() => {
                    sections.push(BreadcrumbSection::new(variant_page.into(), route.url.clone()));
                },
                _ => (),
            }

            Some(sections)
        },
        _ => None,
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    Project,
    Family,
    AnalysisGroup,
}

impl SearchType {
    pub fn name(&self) -> &'static str {
        match self {
            SearchType::Project => "project",
            SearchType::Family => "family",
            SearchType::AnalysisGroup => "analysis_group",
        }
    }

    pub fn from_route(route: &RouteMatch) -> SearchType {
        let breadcrumb = route.breadcrumb.as_deref();
        let variant_page = route.variant_page.as_deref();

        if breadcrumb == Some("family_page") || variant_page == Some("family") {
            SearchType::Family
        } else if breadcrumb == Some("analysis_group") || variant_page == Some("analysis_group") {
            SearchType::AnalysisGroup
        } else {
            SearchType::Project
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityLink {
    pub to: String,
    pub content: String,
    pub disabled: bool,
    #[serde(skip_serializing_if="Option::is_none")]
    pub popup: Option<String>,
    // hidden when it's the current page
    pub hide_when_active: bool,
}

// The variant search link for the page's project, family or analysis group,
// disabled unless one of its families has searchable data, and a case review
// link for projects with case review.
pub fn page_header_entity_links(project: Option<&Project>,
                                family: Option<&Family>,
                                analysis_group: Option<&AnalysisGroup>,
                                route: &RouteMatch,
                                analysis_group_families: &FamiliesByGuid,
                                has_active_searchable_sample_by_family: &HashMap<FamilyGuid, bool>)
    -> Option<Vec<EntityLink>>
{
    let project = project?;
    let search_type = SearchType::from_route(route);

    let family_guid = family.map(|family| family.family_guid.clone());
    let search_id: Option<&str> =
        match search_type {
            SearchType::Project => Some(project.project_guid.as_str()),
            SearchType::Family => family.map(|family| family.family_guid.as_str()),
            SearchType::AnalysisGroup =>
                analysis_group.map(|group| group.analysis_group_guid.as_str()),
        };

    let is_searchable = |guid: &FamilyGuid| {
        has_active_searchable_sample_by_family.get(guid).copied().unwrap_or(false)
    };

    let disabled =
        match search_type {
            SearchType::Family => !family_guid.as_ref().is_some_and(is_searchable),
            _ => !analysis_group_families.keys().any(is_searchable),
        };

    let popup =
        if disabled {
            let anvil_message =
                if project.workspace_name.as_ref().is_some_and(|name| !name.is_empty()) {
                    ANVIL_LOADING_MESSAGE
                } else {
                    ""
                };
            Some(format!("{}{}", SEARCH_DISABLED_MESSAGE, anvil_message))
        } else {
            None
        };

    let mut links = vec![EntityLink {
        to: format!("/variant_search/{}/{}", search_type.name(), search_id.unwrap_or("")),
        content: format!("{} Variant Search", snakecase_to_titlecase(search_type.name())),
        disabled,
        popup,
        hide_when_active: false,
    }];

    if project.has_case_review {
        links.push(EntityLink {
            to: format!("/project/{}/case_review", project.project_guid),
            content: "Case Review".into(),
            disabled: false,
            popup: None,
            hide_when_active: true,
        });
    }

    Some(links)
}

#[test]
fn test_search_type() {
    let mut route = RouteMatch::default();
    assert_eq!(SearchType::from_route(&route), SearchType::Project);
    route.breadcrumb = Some("family_page".into());
    assert_eq!(SearchType::from_route(&route), SearchType::Family);
    route.breadcrumb = Some("saved_variants".into());
    route.variant_page = Some("analysis_group".into());
    assert_eq!(SearchType::from_route(&route), SearchType::AnalysisGroup);
}

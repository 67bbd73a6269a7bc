use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use flexstr::SharedStr as FlexStr;

use crate::bio::variant::{is_sv, variant_unique_id};
use crate::constants::StatusOption;
use crate::data_types::*;
use crate::store::VariantTagNotes;
use crate::types::*;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct StatusCount {
    pub value: FlexStr,
    pub name: FlexStr,
    pub count: usize,
}

// one StatusCount per option, in option order, including zero counts
fn counts_for_options<'a>(statuses: impl Iterator<Item = Option<&'a StatusCode>>,
                          options: &[StatusOption])
    -> Vec<StatusCount>
{
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for status in statuses.flatten() {
        *counts.entry(status.as_str()).or_insert(0) += 1;
    }

    options.iter()
        .map(|option| StatusCount {
            value: option.value.clone(),
            name: option.name.clone(),
            count: counts.get(option.value.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

// case review statuses of all the individuals of the project
pub fn case_review_status_counts(project_guid: Option<&ProjectGuid>,
                                 individuals_by_guid: &IndividualsByGuid,
                                 options: &[StatusOption])
    -> Vec<StatusCount>
{
    let statuses =
        individuals_by_guid.values()
        .filter(|individual| Some(&individual.project_guid) == project_guid)
        .map(|individual| individual.case_review_status.as_ref());

    counts_for_options(statuses, options)
}

pub fn analysis_status_counts(families_by_guid: &FamiliesByGuid, options: &[StatusOption])
    -> Vec<StatusCount>
{
    let statuses = families_by_guid.values().map(|family| family.analysis_status.as_ref());

    counts_for_options(statuses, options)
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TagTypeWithCount {
    #[serde(flatten)]
    pub tag_type: TagType,
    pub count: usize,
}

// The tag types of the project with their counts.  For an analysis group the
// count is the sum over the group's families, otherwise it's the project
// total from the tag type.
pub fn tag_type_data(project_guid: Option<&ProjectGuid>,
                     tag_types_by_project: &TagTypesByProject,
                     analysis_group: Option<&AnalysisGroup>,
                     family_tag_type_counts: &FamilyTagTypeCounts)
    -> Vec<TagTypeWithCount>
{
    let group_counts =
        analysis_group.map(|analysis_group| {
            let mut counts: HashMap<&TagTypeGuid, usize> = HashMap::new();
            for family_guid in &analysis_group.family_guids {
                for (tag_type_guid, count) in family_tag_type_counts.get(family_guid).into_iter().flatten() {
                    *counts.entry(tag_type_guid).or_insert(0) += count.count;
                }
            }
            counts
        });

    project_guid
        .and_then(|guid| tag_types_by_project.get(guid))
        .into_iter()
        .flatten()
        .map(|tag_type| {
            let count =
                match group_counts {
                    Some(ref counts) =>
                        counts.get(&tag_type.variant_tag_type_guid).copied().unwrap_or(0),
                    None => tag_type.num_tags,
                };
            TagTypeWithCount {
                tag_type: tag_type.clone(),
                count,
            }
        })
        .collect()
}

// the counted tag types of each family, in display order; counts of tag
// types that aren't in the project are skipped
pub fn tag_type_data_by_family(project_guid: Option<&ProjectGuid>,
                               tag_types_by_project: &TagTypesByProject,
                               family_tag_type_counts: &FamilyTagTypeCounts)
    -> HashMap<FamilyGuid, Vec<TagTypeWithCount>>
{
    let tag_types_by_guid: HashMap<&TagTypeGuid, &TagType> =
        project_guid
        .and_then(|guid| tag_types_by_project.get(guid))
        .into_iter()
        .flatten()
        .map(|tag_type| (&tag_type.variant_tag_type_guid, tag_type))
        .collect();

    family_tag_type_counts.iter()
        .map(|(family_guid, tag_type_counts)| {
            let mut family_tag_types: Vec<TagTypeWithCount> =
                tag_type_counts.iter()
                .filter_map(|(tag_type_guid, count)| {
                    tag_types_by_guid.get(tag_type_guid)
                        .map(|tag_type| TagTypeWithCount {
                            tag_type: (*tag_type).clone(),
                            count: count.count,
                        })
                })
                .collect();
            family_tag_types.sort_by(|t1, t2| t1.tag_type.order.total_cmp(&t2.tag_type.order));
            (family_guid.clone(), family_tag_types)
        })
        .collect()
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TaggedVariant {
    #[serde(flatten)]
    pub variant: SavedVariant,
    pub tags: Vec<VariantTag>,
    pub genes: Vec<Gene>,
}

// The variants with at least one tag, by family.  Genes missing from the
// store are returned with no symbol.
pub fn tagged_variants_by_family(saved_variants: &SavedVariantsByGuid,
                                 genes_by_id: &GenesById,
                                 tags_by_guid: &VariantTagsByGuid)
    -> HashMap<FamilyGuid, Vec<TaggedVariant>>
{
    let mut ret: HashMap<FamilyGuid, Vec<TaggedVariant>> = HashMap::new();

    for variant in saved_variants.values() {
        if variant.tag_guids.is_empty() {
            continue;
        }

        let tagged_variant = TaggedVariant {
            variant: variant.clone(),
            tags: variant.tag_guids.iter()
                .filter_map(|tag_guid| tags_by_guid.get(tag_guid))
                .cloned()
                .collect(),
            genes: variant.transcripts.keys()
                .map(|gene_id| {
                    genes_by_id.get(gene_id).cloned()
                        .unwrap_or_else(|| Gene {
                            gene_id: gene_id.clone(),
                            gene_symbol: None,
                        })
                })
                .collect(),
        };

        for family_guid in &variant.family_guids {
            ret.entry(family_guid.clone())
                .or_default()
                .push(tagged_variant.clone());
        }
    }

    ret
}

#[derive(Serialize, Clone, Debug, PartialEq, Default)]
pub struct TaggedVariantsByType {
    pub sv: Vec<TaggedVariant>,
    pub snv_indel: Vec<TaggedVariant>,
}

pub fn tagged_variants_by_family_type(tagged_by_family: &HashMap<FamilyGuid, Vec<TaggedVariant>>)
    -> HashMap<FamilyGuid, TaggedVariantsByType>
{
    tagged_by_family.iter()
        .map(|(family_guid, variants)| {
            let (sv, snv_indel): (Vec<TaggedVariant>, Vec<TaggedVariant>) =
                variants.iter().cloned()
                .partition(|tagged_variant| is_sv(&tagged_variant.variant));
            (family_guid.clone(), TaggedVariantsByType { sv, snv_indel })
        })
        .collect()
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndividualTaggedVariant {
    pub variant_id: VariantUniqueId,
    pub gene: Gene,
    #[serde(skip_serializing_if="Option::is_none")]
    pub genotype: Option<Genotype>,
    pub variant: TaggedVariant,
}

// One row per gene of each tagged variant of the individual's family
pub fn individual_tagged_variants(tagged_by_family: &HashMap<FamilyGuid, Vec<TaggedVariant>>,
                                  individuals_by_guid: &IndividualsByGuid,
                                  individual_guid: &IndividualGuid)
    -> Vec<IndividualTaggedVariant>
{
    let Some(individual) = individuals_by_guid.get(individual_guid)
    else {
        return vec![];
    };

    tagged_by_family.get(&individual.family_guid)
        .into_iter()
        .flatten()
        .flat_map(|tagged_variant| {
            let genotype = tagged_variant.variant.genotypes.get(individual_guid).cloned();
            tagged_variant.genes.iter()
                .map(move |gene| IndividualTaggedVariant {
                    variant_id: variant_unique_id(&tagged_variant.variant, Some(gene.gene_id.as_str())),
                    gene: gene.clone(),
                    genotype: genotype.clone(),
                    variant: tagged_variant.clone(),
                })
        })
        .collect()
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TagTypeOption {
    pub value: FlexStr,
    pub text: FlexStr,
    #[serde(skip_serializing_if="Option::is_none")]
    pub category: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub description: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub color: Option<FlexStr>,
    pub order: f64,
}

pub fn project_tag_type_options(project_guid: Option<&ProjectGuid>,
                                tag_types_by_project: &TagTypesByProject)
    -> Vec<TagTypeOption>
{
    project_guid
        .and_then(|guid| tag_types_by_project.get(guid))
        .into_iter()
        .flatten()
        .map(|tag_type| TagTypeOption {
            value: tag_type.name.clone(),
            text: tag_type.name.clone(),
            category: tag_type.category.clone(),
            description: tag_type.description.clone(),
            color: tag_type.color.clone(),
            order: tag_type.order,
        })
        .collect()
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SavedByOption {
    pub value: Option<FlexStr>,
}

// The users who tagged or annotated variants of the project families,
// preceded by an empty option
pub fn project_variant_saved_by_options(project_families: &FamiliesByGuid,
                                        tag_notes_by_family: &HashMap<FamilyGuid, IndexMap<VariantGuid, VariantTagNotes>>)
    -> Vec<SavedByOption>
{
    let mut saved_by: IndexSet<FlexStr> = IndexSet::new();

    for family_guid in project_families.keys() {
        for tag_notes in tag_notes_by_family.get(family_guid).into_iter().flat_map(IndexMap::values) {
            let created_by =
                tag_notes.tags.iter().map(|tag| &tag.created_by)
                .chain(tag_notes.notes.iter().map(|note| &note.created_by));
            saved_by.extend(created_by.flatten().cloned());
        }
    }

    std::iter::once(SavedByOption { value: None })
        .chain(saved_by.into_iter().map(|value| SavedByOption { value: Some(value) }))
        .collect()
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct UserOption {
    pub key: Username,
    pub value: User,
    #[serde(skip_serializing_if="Option::is_none")]
    pub text: Option<FlexStr>,
}

pub fn user_options(users_by_username: &UsersByUsername) -> Vec<UserOption> {
    users_by_username.values()
        .map(|user| UserOption {
            key: user.username.clone(),
            value: user.clone(),
            text: user.email.clone(),
        })
        .collect()
}

pub fn collaborators(project: Option<&Project>) -> Vec<User> {
    project.map(|project| project.collaborators.clone()).unwrap_or_default()
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AnalystOption {
    pub key: Username,
    pub value: Username,
    pub text: String,
}

// the project collaborators who aren't analysts, then all analysts
pub fn analyst_options(collaborators: &[User], users_by_username: &UsersByUsername)
    -> Vec<AnalystOption>
{
    let email_text = |user: &User| user.email.as_ref().map(FlexStr::to_string).unwrap_or_default();

    collaborators.iter()
        .filter(|collaborator| !collaborator.is_analyst)
        .chain(users_by_username.values().filter(|user| user.is_analyst))
        .map(|user| {
            let text =
                match user.display_name.as_ref().filter(|name| !name.is_empty()) {
                    Some(display_name) => format!("{} ({})", display_name, email_text(user)),
                    None => email_text(user),
                };
            AnalystOption {
                key: user.username.clone(),
                value: user.username.clone(),
                text,
            }
        })
        .collect()
}

#[test]
fn test_counts_for_options() {
    let options = vec![StatusOption::new("Q", "Waiting"), StatusOption::new("C", "Closed"),
                       StatusOption::new("N", "None")];
    let q: StatusCode = "Q".into();
    let x: StatusCode = "X".into();
    let statuses = vec![Some(&q), None, Some(&x), Some(&q)];

    let counts = counts_for_options(statuses.into_iter(), &options);

    assert_eq!(counts.len(), 3);
    assert_eq!(counts.iter().map(|c| c.count).collect::<Vec<_>>(), vec![2, 0, 0]);
    assert_eq!(counts[0].name.as_str(), "Waiting");
}

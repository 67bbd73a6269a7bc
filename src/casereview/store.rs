use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use anyhow::{Context, Result};
use indexmap::IndexMap;

use flexstr::SharedStr as FlexStr;

use tracing::{info, warn};

use crate::data_types::*;
use crate::types::*;
use crate::web::cmp_utils::locale_cmp;

// The normalized entity maps, as received from the REST API.  Each map is
// replaced rather than modified, so a changed map gets a new Arc and callers
// can detect changes by pointer identity.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityStore {
    pub projects_by_guid: Arc<ProjectsByGuid>,
    pub families_by_guid: Arc<FamiliesByGuid>,
    pub individuals_by_guid: Arc<IndividualsByGuid>,
    pub samples_by_guid: Arc<SamplesByGuid>,
    pub analysis_groups_by_guid: Arc<AnalysisGroupsByGuid>,
    pub saved_variants_by_guid: Arc<SavedVariantsByGuid>,
    pub genes_by_id: Arc<GenesById>,
    pub variant_tags_by_guid: Arc<VariantTagsByGuid>,
    pub variant_notes_by_guid: Arc<VariantNotesByGuid>,
    pub family_notes_by_guid: Arc<FamilyNotesByGuid>,
    pub variant_tag_types_by_guid: Arc<TagTypesByGuid>,
    pub mme_submissions_by_guid: Arc<MmeSubmissionsByGuid>,
    pub mme_results_by_guid: Arc<MmeResultsByGuid>,
    pub users_by_username: Arc<UsersByUsername>,
    pub family_tag_type_counts: Arc<FamilyTagTypeCounts>,
}

// merge updates into a copy of the map, returning the new map
fn merge_updates<K, V>(current: &Arc<IndexMap<K, V>>, updates: IndexMap<K, V>)
                       -> Arc<IndexMap<K, V>>
  where K: std::hash::Hash + Eq + Clone, V: Clone
{
    if updates.is_empty() {
        return current.clone();
    }
    let mut new_map = current.as_ref().clone();
    new_map.extend(updates);
    Arc::new(new_map)
}

impl EntityStore {
    pub fn read(store_file_name: &str) -> Result<EntityStore> {
        let file = File::open(store_file_name)
            .with_context(|| format!("failed to read {}", store_file_name))?;
        let reader = BufReader::new(file);

        let store: EntityStore = serde_json::from_reader(reader)
            .with_context(|| format!("failed to parse {}", store_file_name))?;

        info!("read {} projects, {} families, {} individuals, {} samples from {}",
              store.projects_by_guid.len(), store.families_by_guid.len(),
              store.individuals_by_guid.len(), store.samples_by_guid.len(),
              store_file_name);

        store.warn_dangling_references();

        Ok(store)
    }

    fn warn_dangling_references(&self) {
        for family in self.families_by_guid.values() {
            let missing_count =
                family.individual_guids.iter()
                .filter(|guid| !self.individuals_by_guid.contains_key(*guid))
                .count();
            if missing_count > 0 {
                warn!("family {} references {} missing individuals",
                      family.family_guid, missing_count);
            }
        }
        for group in self.analysis_groups_by_guid.values() {
            let missing_count =
                group.family_guids.iter()
                .filter(|guid| !self.families_by_guid.contains_key(*guid))
                .count();
            if missing_count > 0 {
                warn!("analysis group {} references {} missing families",
                      group.analysis_group_guid, missing_count);
            }
        }
    }

    pub fn receive_projects(&mut self, updates: ProjectsByGuid) {
        self.projects_by_guid = merge_updates(&self.projects_by_guid, updates);
    }

    pub fn receive_families(&mut self, updates: FamiliesByGuid) {
        self.families_by_guid = merge_updates(&self.families_by_guid, updates);
    }

    pub fn receive_individuals(&mut self, updates: IndividualsByGuid) {
        self.individuals_by_guid = merge_updates(&self.individuals_by_guid, updates);
    }

    pub fn receive_samples(&mut self, updates: SamplesByGuid) {
        self.samples_by_guid = merge_updates(&self.samples_by_guid, updates);
    }

    pub fn receive_analysis_groups(&mut self, updates: AnalysisGroupsByGuid) {
        self.analysis_groups_by_guid = merge_updates(&self.analysis_groups_by_guid, updates);
    }

    pub fn receive_saved_variants(&mut self, updates: SavedVariantsByGuid) {
        self.saved_variants_by_guid = merge_updates(&self.saved_variants_by_guid, updates);
    }

    pub fn receive_family_tag_type_counts(&mut self, counts: FamilyTagTypeCounts) {
        self.family_tag_type_counts = Arc::new(counts);
    }

    pub fn project(&self, project_guid: &ProjectGuid) -> Option<&Project> {
        self.projects_by_guid.get(project_guid)
    }

    pub fn family(&self, family_guid: &FamilyGuid) -> Option<&Family> {
        self.families_by_guid.get(family_guid)
    }

    pub fn gene_symbol(&self, gene_id: &GeneId) -> Option<GeneSymbol> {
        self.genes_by_id.get(gene_id).and_then(|gene| gene.gene_symbol.clone())
    }
}

// Entities that belong to exactly one project
pub trait ProjectEntity {
    fn project_guid(&self) -> &ProjectGuid;
}

impl ProjectEntity for Family {
    fn project_guid(&self) -> &ProjectGuid {
        &self.project_guid
    }
}

impl ProjectEntity for Individual {
    fn project_guid(&self) -> &ProjectGuid {
        &self.project_guid
    }
}

impl ProjectEntity for Sample {
    fn project_guid(&self) -> &ProjectGuid {
        &self.project_guid
    }
}

impl ProjectEntity for AnalysisGroup {
    fn project_guid(&self) -> &ProjectGuid {
        &self.project_guid
    }
}

pub type GroupedByProject<T> = HashMap<ProjectGuid, IndexMap<FlexStr, T>>;

pub fn group_by_project<T>(entities: &IndexMap<FlexStr, T>) -> GroupedByProject<T>
  where T: ProjectEntity + Clone
{
    let mut ret: GroupedByProject<T> = HashMap::new();

    for (guid, entity) in entities {
        ret.entry(entity.project_guid().clone())
            .or_default()
            .insert(guid.clone(), entity.clone());
    }

    ret
}

// samples of each family, most recently loaded first
pub fn samples_by_family(samples_by_guid: &SamplesByGuid) -> SamplesByFamily {
    let mut ret: SamplesByFamily = HashMap::new();

    for sample in samples_by_guid.values() {
        ret.entry(sample.family_guid.clone())
            .or_default()
            .push(sample.clone());
    }

    for samples in ret.values_mut() {
        samples.sort_by(|s1, s2| s2.loaded_date.cmp(&s1.loaded_date));
    }

    ret
}

// individuals of each family, ordered by individual ID.  Individual GUIDs
// that aren't in the store are skipped.
pub fn sorted_individuals_by_family(families_by_guid: &FamiliesByGuid,
                                    individuals_by_guid: &IndividualsByGuid)
    -> IndividualsByFamily
{
    families_by_guid.values()
        .map(|family| {
            let mut individuals: Vec<Individual> =
                family.individual_guids.iter()
                .filter_map(|guid| individuals_by_guid.get(guid))
                .cloned()
                .collect();
            individuals.sort_by(|i1, i2| locale_cmp(&i1.individual_id, &i2.individual_id));
            (family.family_guid.clone(), individuals)
        })
        .collect()
}

pub fn notes_by_family_type(family_notes_by_guid: &FamilyNotesByGuid) -> NotesByFamilyType {
    let mut ret: NotesByFamilyType = HashMap::new();

    for note in family_notes_by_guid.values() {
        ret.entry(note.family_guid.clone())
            .or_default()
            .entry(note.note_type.clone())
            .or_default()
            .push(note.clone());
    }

    ret
}

// true for a family iff it has at least one active sample
pub fn has_active_searchable_sample_by_family(samples_by_guid: &SamplesByGuid)
    -> HashMap<FamilyGuid, bool>
{
    let mut ret = HashMap::new();

    for sample in samples_by_guid.values() {
        let entry = ret.entry(sample.family_guid.clone()).or_insert(false);
        *entry = *entry || sample.is_active;
    }

    ret
}

// tag types of each project, in display order
pub fn tag_types_by_project(tag_types_by_guid: &TagTypesByGuid) -> TagTypesByProject {
    let mut ret: TagTypesByProject = HashMap::new();

    for tag_type in tag_types_by_guid.values() {
        ret.entry(tag_type.project_guid.clone())
            .or_default()
            .push(tag_type.clone());
    }

    for tag_types in ret.values_mut() {
        tag_types.sort_by(|tt1, tt2| tt1.order.total_cmp(&tt2.order));
    }

    ret
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct VariantTagNotes {
    pub tags: Vec<VariantTag>,
    pub notes: Vec<VariantNote>,
}

// the tags and notes of each saved variant, grouped by family and variant GUID
pub fn variant_tag_notes_by_family_variants(saved_variants: &SavedVariantsByGuid,
                                            tags_by_guid: &VariantTagsByGuid,
                                            notes_by_guid: &VariantNotesByGuid)
    -> HashMap<FamilyGuid, IndexMap<VariantGuid, VariantTagNotes>>
{
    let mut ret: HashMap<FamilyGuid, IndexMap<VariantGuid, VariantTagNotes>> = HashMap::new();

    for variant in saved_variants.values() {
        let tag_notes = VariantTagNotes {
            tags: variant.tag_guids.iter()
                .filter_map(|guid| tags_by_guid.get(guid)).cloned().collect(),
            notes: variant.note_guids.iter()
                .filter_map(|guid| notes_by_guid.get(guid)).cloned().collect(),
        };

        for family_guid in &variant.family_guids {
            ret.entry(family_guid.clone())
                .or_default()
                .insert(variant.variant_guid.clone(), tag_notes.clone());
        }
    }

    ret
}

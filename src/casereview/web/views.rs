use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use flexstr::SharedStr as FlexStr;

use crate::constants::{CASE_REVIEW_STATUS_OPTIONS, FAMILY_ANALYSIS_STATUS_OPTIONS};
use crate::data_types::*;
use crate::memo::Memo;
use crate::store::*;
use crate::types::*;
use crate::ui_state::UiState;
use crate::web::config::Config;
use crate::web::export::*;
use crate::web::frequencies::{frequency_details, FrequencyDetails};
use crate::web::matchmaker::*;
use crate::web::page_header::*;
use crate::web::scope::*;
use crate::web::search::*;
use crate::web::sort::*;
use crate::web::summary::*;

type TagNotesByFamily = HashMap<FamilyGuid, IndexMap<VariantGuid, VariantTagNotes>>;
type TaggedVariantsByFamily = HashMap<FamilyGuid, Vec<TaggedVariant>>;

// the contents of a memoized Option
fn opt<T>(value: &Arc<Option<T>>) -> Option<&T> {
    Option::as_ref(&**value)
}

// A table and analysis group that a set of family views is derived for.
// Each scope has its own caches so views of different tables don't evict
// each other.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ViewScope {
    pub table_name: Option<String>,
    pub analysis_group_guid: Option<AnalysisGroupGuid>,
}

impl ViewScope {
    pub fn new(table_name: Option<&str>, analysis_group_guid: Option<&str>) -> ViewScope {
        ViewScope {
            table_name: table_name.map(String::from),
            analysis_group_guid: analysis_group_guid.map(AnalysisGroupGuid::from),
        }
    }
}

struct ScopedViews {
    current_analysis_group:
        Memo<(Arc<AnalysisGroupsByGuid>, Option<AnalysisGroupGuid>), Option<AnalysisGroup>>,
    families: Memo<(Arc<FamiliesByGuid>, Arc<Option<AnalysisGroup>>), FamiliesByGuid>,
    individuals_count: Memo<(Arc<FamiliesByGuid>, Arc<IndividualsByGuid>), usize>,
    individuals: Memo<(Arc<IndividualsByGuid>, Arc<FamiliesByGuid>), ScopedIndividualsByGuid>,
    samples_by_types:
        Memo<(Arc<SamplesByGuid>, Arc<SamplesByFamily>, Arc<Option<AnalysisGroup>>), SampleCountsByType>,
    search_entries:
        Memo<(Arc<FamiliesByGuid>, Arc<IndividualsByGuid>, bool), Option<Vec<FamilySearchEntry>>>,
    visible: Memo<(Arc<FamiliesByGuid>, Arc<Option<Vec<FamilySearchEntry>>>, Arc<IndividualsByGuid>,
                   Arc<SamplesByFamily>, Arc<User>, FlexStr, Option<String>),
                  Vec<Family>>,
    sorted: Memo<(Arc<Vec<Family>>, Arc<IndividualsByGuid>, Arc<SamplesByFamily>, FlexStr,
                  SortDirection),
                 Vec<Family>>,
    families_export: Memo<(Arc<Vec<Family>>, Arc<SamplesByFamily>, Arc<NotesByFamilyType>), Vec<Value>>,
    individuals_export:
        Memo<(Arc<Vec<Family>>, Arc<IndividualsByFamily>, Arc<SamplesByGuid>), Vec<Value>>,
    samples_export: Memo<(Arc<Vec<Family>>, Arc<IndividualsByGuid>, Arc<SamplesByFamily>), Vec<Value>>,
    analysis_status_counts: Memo<Arc<FamiliesByGuid>, Vec<StatusCount>>,
    tag_type_data: Memo<(Option<ProjectGuid>, Arc<TagTypesByProject>, Arc<Option<AnalysisGroup>>,
                         Arc<FamilyTagTypeCounts>),
                        Vec<TagTypeWithCount>>,
    mme_submission_details: Memo<(Arc<MmeSubmissionsByGuid>, Arc<FamiliesByGuid>, Arc<GenesById>,
                                  Arc<NotesByFamilyType>),
                                 Vec<MmeSubmissionDetail>>,
}

impl ScopedViews {
    fn new() -> ScopedViews {
        ScopedViews {
            current_analysis_group: Memo::new("current analysis group"),
            families: Memo::new("analysis group families"),
            individuals_count: Memo::new("analysis group individuals count"),
            individuals: Memo::new("analysis group individuals"),
            samples_by_types: Memo::new("analysis group samples by types"),
            search_entries: Memo::new("families by search string"),
            visible: Memo::new("visible families"),
            sorted: Memo::new("visible families in sorted order"),
            families_export: Memo::new("families export data"),
            individuals_export: Memo::new("individuals export data"),
            samples_export: Memo::new("samples export data"),
            analysis_status_counts: Memo::new("analysis status counts"),
            tag_type_data: Memo::new("tag type data"),
            mme_submission_details: Memo::new("MME submission details"),
        }
    }
}

// The page header of a project page
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageHeader {
    pub breadcrumb_id_sections: Option<Vec<BreadcrumbSection>>,
    pub entity_links: Option<Vec<EntityLink>>,
}

// The memoized derived views of the store.  Each view is recomputed only when
// one of its inputs has changed, otherwise the same Arc is returned.
pub struct ProjectViews {
    config: Arc<Config>,

    families_by_project: Memo<Arc<FamiliesByGuid>, GroupedByProject<Family>>,
    analysis_groups_by_project: Memo<Arc<AnalysisGroupsByGuid>, GroupedByProject<AnalysisGroup>>,
    samples_by_project: Memo<Arc<SamplesByGuid>, GroupedByProject<Sample>>,
    samples_by_family: Memo<Arc<SamplesByGuid>, SamplesByFamily>,
    individuals_by_family: Memo<(Arc<FamiliesByGuid>, Arc<IndividualsByGuid>), IndividualsByFamily>,
    notes_by_family_type: Memo<Arc<FamilyNotesByGuid>, NotesByFamilyType>,
    has_active_searchable_sample: Memo<Arc<SamplesByGuid>, HashMap<FamilyGuid, bool>>,
    tag_types_by_project: Memo<Arc<TagTypesByGuid>, TagTypesByProject>,
    tag_notes_by_family:
        Memo<(Arc<SavedVariantsByGuid>, Arc<VariantTagsByGuid>, Arc<VariantNotesByGuid>), TagNotesByFamily>,
    tagged_variants_by_family:
        Memo<(Arc<SavedVariantsByGuid>, Arc<GenesById>, Arc<VariantTagsByGuid>), TaggedVariantsByFamily>,
    tagged_variants_by_family_type:
        Memo<Arc<TaggedVariantsByFamily>, HashMap<FamilyGuid, TaggedVariantsByType>>,

    current_project: Memo<(Arc<ProjectsByGuid>, Option<ProjectGuid>), Option<Project>>,
    project_families: Memo<(Arc<GroupedByProject<Family>>, Option<ProjectGuid>), FamiliesByGuid>,
    project_analysis_groups:
        Memo<(Arc<GroupedByProject<AnalysisGroup>>, Option<ProjectGuid>), AnalysisGroupsByGuid>,
    project_samples: Memo<(Arc<GroupedByProject<Sample>>, Option<ProjectGuid>), SamplesByGuid>,
    case_review_status_counts: Memo<(Option<ProjectGuid>, Arc<IndividualsByGuid>), Vec<StatusCount>>,
    tag_type_data_by_family: Memo<(Option<ProjectGuid>, Arc<TagTypesByProject>, Arc<FamilyTagTypeCounts>),
                                  HashMap<FamilyGuid, Vec<TagTypeWithCount>>>,
    project_tag_type_options: Memo<(Option<ProjectGuid>, Arc<TagTypesByProject>), Vec<TagTypeOption>>,
    project_variant_saved_by_options: Memo<(Arc<FamiliesByGuid>, Arc<TagNotesByFamily>), Vec<SavedByOption>>,
    mme_results_by_submission: Memo<(Arc<MmeResultsByGuid>, Arc<MmeSubmissionsByGuid>),
                                    IndexMap<SubmissionGuid, MmeResultsByStatus>>,
    mme_default_contact_email: Memo<(Arc<MmeResultsByGuid>, Arc<MmeSubmissionsByGuid>,
                                     Arc<IndividualsByGuid>, Arc<GenesById>,
                                     Arc<SavedVariantsByGuid>, Arc<User>, ResultGuid),
                                    Option<MmeContactEmail>>,
    user_options: Memo<Arc<UsersByUsername>, Vec<UserOption>>,
    analyst_options: Memo<(Arc<Option<Project>>, Arc<UsersByUsername>), Vec<AnalystOption>>,

    // one entry per table name and analysis group that has been viewed,
    // never evicted: a project has a handful of tables and groups
    scoped: RefCell<HashMap<ViewScope, Rc<ScopedViews>>>,
}

impl Default for ProjectViews {
    fn default() -> ProjectViews {
        ProjectViews::new(Arc::new(Config::default()))
    }
}

impl ProjectViews {
    pub fn new(config: Arc<Config>) -> ProjectViews {
        ProjectViews {
            config,
            families_by_project: Memo::new("families grouped by project"),
            analysis_groups_by_project: Memo::new("analysis groups grouped by project"),
            samples_by_project: Memo::new("samples grouped by project"),
            samples_by_family: Memo::new("samples by family"),
            individuals_by_family: Memo::new("sorted individuals by family"),
            notes_by_family_type: Memo::new("notes by family type"),
            has_active_searchable_sample: Memo::new("has active searchable sample by family"),
            tag_types_by_project: Memo::new("tag types by project"),
            tag_notes_by_family: Memo::new("variant tag notes by family variants"),
            tagged_variants_by_family: Memo::new("tagged variants by family"),
            tagged_variants_by_family_type: Memo::new("tagged variants by family type"),
            current_project: Memo::new("current project"),
            project_families: Memo::new("project families"),
            project_analysis_groups: Memo::new("project analysis groups"),
            project_samples: Memo::new("project samples"),
            case_review_status_counts: Memo::new("case review status counts"),
            tag_type_data_by_family: Memo::new("tag type data by family"),
            project_tag_type_options: Memo::new("project tag type options"),
            project_variant_saved_by_options: Memo::new("project variant saved by options"),
            mme_results_by_submission: Memo::new("MME results by submission"),
            mme_default_contact_email: Memo::new("MME default contact email"),
            user_options: Memo::new("user options"),
            analyst_options: Memo::new("analyst options"),
            scoped: RefCell::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn scoped(&self, scope: &ViewScope) -> Rc<ScopedViews> {
        self.scoped.borrow_mut()
            .entry(scope.clone())
            .or_insert_with(|| Rc::new(ScopedViews::new()))
            .clone()
    }

    // store level views

    pub fn samples_by_family(&self, store: &EntityStore) -> Arc<SamplesByFamily> {
        self.samples_by_family.get_or_compute(store.samples_by_guid.clone(),
                                              |samples| samples_by_family(samples))
    }

    pub fn sorted_individuals_by_family(&self, store: &EntityStore) -> Arc<IndividualsByFamily> {
        self.individuals_by_family
            .get_or_compute((store.families_by_guid.clone(), store.individuals_by_guid.clone()),
                            |(families, individuals)| sorted_individuals_by_family(families, individuals))
    }

    pub fn notes_by_family_type(&self, store: &EntityStore) -> Arc<NotesByFamilyType> {
        self.notes_by_family_type.get_or_compute(store.family_notes_by_guid.clone(),
                                                 |notes| notes_by_family_type(notes))
    }

    pub fn has_active_searchable_sample_by_family(&self, store: &EntityStore)
        -> Arc<HashMap<FamilyGuid, bool>>
    {
        self.has_active_searchable_sample
            .get_or_compute(store.samples_by_guid.clone(),
                            |samples| has_active_searchable_sample_by_family(samples))
    }

    pub fn tag_types_by_project(&self, store: &EntityStore) -> Arc<TagTypesByProject> {
        self.tag_types_by_project.get_or_compute(store.variant_tag_types_by_guid.clone(),
                                                 |tag_types| tag_types_by_project(tag_types))
    }

    pub fn variant_tag_notes_by_family_variants(&self, store: &EntityStore) -> Arc<TagNotesByFamily> {
        self.tag_notes_by_family
            .get_or_compute((store.saved_variants_by_guid.clone(), store.variant_tags_by_guid.clone(),
                             store.variant_notes_by_guid.clone()),
                            |(variants, tags, notes)| {
                                variant_tag_notes_by_family_variants(variants, tags, notes)
                            })
    }

    pub fn tagged_variants_by_family(&self, store: &EntityStore) -> Arc<TaggedVariantsByFamily> {
        self.tagged_variants_by_family
            .get_or_compute((store.saved_variants_by_guid.clone(), store.genes_by_id.clone(),
                             store.variant_tags_by_guid.clone()),
                            |(variants, genes, tags)| tagged_variants_by_family(variants, genes, tags))
    }

    pub fn tagged_variants_by_family_type(&self, store: &EntityStore)
        -> Arc<HashMap<FamilyGuid, TaggedVariantsByType>>
    {
        self.tagged_variants_by_family_type
            .get_or_compute(self.tagged_variants_by_family(store),
                            |tagged| tagged_variants_by_family_type(tagged))
    }

    pub fn individual_tagged_variants(&self, store: &EntityStore, individual_guid: &IndividualGuid)
        -> Vec<IndividualTaggedVariant>
    {
        individual_tagged_variants(&self.tagged_variants_by_family(store),
                                   &store.individuals_by_guid, individual_guid)
    }

    pub fn user_options(&self, store: &EntityStore) -> Arc<Vec<UserOption>> {
        self.user_options.get_or_compute(store.users_by_username.clone(),
                                         |users| user_options(users))
    }

    // project views

    pub fn current_project(&self, store: &EntityStore, ui_state: &UiState) -> Arc<Option<Project>> {
        self.current_project
            .get_or_compute((store.projects_by_guid.clone(), ui_state.current_project_guid.clone()),
                            |(projects, guid)| current_project(projects, guid.as_ref()))
    }

    pub fn project_families(&self, store: &EntityStore, ui_state: &UiState) -> Arc<FamiliesByGuid> {
        let grouped =
            self.families_by_project.get_or_compute(store.families_by_guid.clone(),
                                                    |families| group_by_project(&**families));
        self.project_families
            .get_or_compute((grouped, ui_state.current_project_guid.clone()),
                            |(grouped, guid)| entities_for_project(&**grouped, guid.as_ref()))
    }

    pub fn project_analysis_groups(&self, store: &EntityStore, ui_state: &UiState)
        -> Arc<AnalysisGroupsByGuid>
    {
        let grouped =
            self.analysis_groups_by_project.get_or_compute(store.analysis_groups_by_guid.clone(),
                                                           |groups| group_by_project(&**groups));
        self.project_analysis_groups
            .get_or_compute((grouped, ui_state.current_project_guid.clone()),
                            |(grouped, guid)| entities_for_project(&**grouped, guid.as_ref()))
    }

    pub fn project_samples(&self, store: &EntityStore, ui_state: &UiState) -> Arc<SamplesByGuid> {
        let grouped =
            self.samples_by_project.get_or_compute(store.samples_by_guid.clone(),
                                                   |samples| group_by_project(&**samples));
        self.project_samples
            .get_or_compute((grouped, ui_state.current_project_guid.clone()),
                            |(grouped, guid)| entities_for_project(&**grouped, guid.as_ref()))
    }

    pub fn case_review_status_counts(&self, store: &EntityStore, ui_state: &UiState)
        -> Arc<Vec<StatusCount>>
    {
        self.case_review_status_counts
            .get_or_compute((ui_state.current_project_guid.clone(), store.individuals_by_guid.clone()),
                            |(guid, individuals)| {
                                case_review_status_counts(guid.as_ref(), individuals,
                                                          &CASE_REVIEW_STATUS_OPTIONS)
                            })
    }

    pub fn tag_type_data_by_family(&self, store: &EntityStore, ui_state: &UiState)
        -> Arc<HashMap<FamilyGuid, Vec<TagTypeWithCount>>>
    {
        self.tag_type_data_by_family
            .get_or_compute((ui_state.current_project_guid.clone(), self.tag_types_by_project(store),
                             store.family_tag_type_counts.clone()),
                            |(guid, tag_types, counts)| {
                                tag_type_data_by_family(guid.as_ref(), tag_types, counts)
                            })
    }

    pub fn project_tag_type_options(&self, store: &EntityStore, ui_state: &UiState)
        -> Arc<Vec<TagTypeOption>>
    {
        self.project_tag_type_options
            .get_or_compute((ui_state.current_project_guid.clone(), self.tag_types_by_project(store)),
                            |(guid, tag_types)| project_tag_type_options(guid.as_ref(), tag_types))
    }

    pub fn project_variant_saved_by_options(&self, store: &EntityStore, ui_state: &UiState)
        -> Arc<Vec<SavedByOption>>
    {
        self.project_variant_saved_by_options
            .get_or_compute((self.project_families(store, ui_state),
                             self.variant_tag_notes_by_family_variants(store)),
                            |(families, tag_notes)| project_variant_saved_by_options(families, tag_notes))
    }

    pub fn mme_results_by_submission(&self, store: &EntityStore)
        -> Arc<IndexMap<SubmissionGuid, MmeResultsByStatus>>
    {
        self.mme_results_by_submission
            .get_or_compute((store.mme_results_by_guid.clone(), store.mme_submissions_by_guid.clone()),
                            |(results, submissions)| mme_results_by_submission(results, submissions))
    }

    pub fn default_mme_submission(&self, store: &EntityStore, ui_state: &UiState)
        -> Option<DefaultMmeSubmission>
    {
        default_mme_submission(opt(&self.current_project(store, ui_state)))
    }

    pub fn mme_default_contact_email(&self, store: &EntityStore, ui_state: &UiState,
                                     matchmaker_result_guid: &ResultGuid)
        -> Arc<Option<MmeContactEmail>>
    {
        let inputs = (store.mme_results_by_guid.clone(), store.mme_submissions_by_guid.clone(),
                      store.individuals_by_guid.clone(), store.genes_by_id.clone(),
                      store.saved_variants_by_guid.clone(), ui_state.user.clone(),
                      matchmaker_result_guid.clone());

        self.mme_default_contact_email
            .get_or_compute(inputs,
                            |(results, submissions, individuals, genes, saved_variants, user, guid)| {
                                let context = MmeEmailContext {
                                    results_by_guid: results,
                                    submissions_by_guid: submissions,
                                    individuals_by_guid: individuals,
                                    genes_by_id: genes,
                                    saved_variants_by_guid: saved_variants,
                                    user,
                                    config: &self.config,
                                };
                                mme_default_contact_email(guid, &context)
                            })
    }

    pub fn collaborators(&self, store: &EntityStore, ui_state: &UiState) -> Vec<User> {
        collaborators(opt(&self.current_project(store, ui_state)))
    }

    pub fn analyst_options(&self, store: &EntityStore, ui_state: &UiState) -> Arc<Vec<AnalystOption>> {
        self.analyst_options
            .get_or_compute((self.current_project(store, ui_state), store.users_by_username.clone()),
                            |(project, users)| {
                                analyst_options(&collaborators(opt(&project)), users)
                            })
    }

    pub fn frequency_details(&self, variant: &SavedVariant) -> FrequencyDetails {
        frequency_details(variant, &self.config.populations)
    }

    // analysis group and table views

    pub fn current_analysis_group(&self, store: &EntityStore, ui_state: &UiState, scope: &ViewScope)
        -> Arc<Option<AnalysisGroup>>
    {
        self.scoped(scope).current_analysis_group
            .get_or_compute((self.project_analysis_groups(store, ui_state),
                             scope.analysis_group_guid.clone()),
                            |(groups, guid)| current_analysis_group(groups, guid.as_ref()))
    }

    pub fn analysis_group_families(&self, store: &EntityStore, ui_state: &UiState, scope: &ViewScope)
        -> Arc<FamiliesByGuid>
    {
        let analysis_group = self.current_analysis_group(store, ui_state, scope);
        self.scoped(scope).families
            .get_or_compute((self.project_families(store, ui_state), analysis_group),
                            |(families, group)| analysis_group_families(families, opt(group)))
    }

    pub fn analysis_group_individuals_count(&self, store: &EntityStore, ui_state: &UiState,
                                            scope: &ViewScope)
        -> usize
    {
        let families = self.analysis_group_families(store, ui_state, scope);
        *self.scoped(scope).individuals_count
            .get_or_compute((families, store.individuals_by_guid.clone()),
                            |(families, individuals)| analysis_group_individuals_count(families, individuals))
    }

    pub fn analysis_group_individuals(&self, store: &EntityStore, ui_state: &UiState, scope: &ViewScope)
        -> Arc<ScopedIndividualsByGuid>
    {
        let families = self.analysis_group_families(store, ui_state, scope);
        self.scoped(scope).individuals
            .get_or_compute((store.individuals_by_guid.clone(), families),
                            |(individuals, families)| analysis_group_individuals(individuals, families))
    }

    pub fn analysis_group_samples_by_types(&self, store: &EntityStore, ui_state: &UiState,
                                           scope: &ViewScope)
        -> Arc<SampleCountsByType>
    {
        let inputs = (self.project_samples(store, ui_state), self.samples_by_family(store),
                      self.current_analysis_group(store, ui_state, scope));
        self.scoped(scope).samples_by_types
            .get_or_compute(inputs,
                            |(samples, samples_by_family, group)| {
                                analysis_group_samples_by_types(samples, samples_by_family,
                                                                opt(group))
                            })
    }

    pub fn visible_families(&self, store: &EntityStore, ui_state: &UiState, scope: &ViewScope)
        -> Arc<Vec<Family>>
    {
        let scoped = self.scoped(scope);
        let families = self.analysis_group_families(store, ui_state, scope);
        let table_state = ui_state.table_state(scope.table_name.as_deref());
        let search = table_state.search();

        let search_entries =
            scoped.search_entries
            .get_or_compute((families.clone(), store.individuals_by_guid.clone(), search.is_some()),
                            |(families, individuals, should_search)| {
                                families_by_search_string(families, individuals, *should_search)
                            });

        let inputs = (families, search_entries, store.individuals_by_guid.clone(),
                      self.samples_by_family(store), ui_state.user.clone(),
                      table_state.filter_name(), search);

        scoped.visible
            .get_or_compute(inputs,
                            |(families, search_entries, individuals, samples_by_family, user,
                              filter_name, search)| {
                                let context = FilterContext {
                                    individuals_by_guid: individuals,
                                    user,
                                    samples_by_family,
                                };
                                visible_families(families, (**search_entries).as_deref(), &context,
                                                 FamilyFilter::from_name(filter_name),
                                                 search.as_deref())
                            })
    }

    pub fn visible_families_in_sorted_order(&self, store: &EntityStore, ui_state: &UiState,
                                            scope: &ViewScope)
        -> Arc<Vec<Family>>
    {
        let table_state = ui_state.table_state(scope.table_name.as_deref());
        let inputs = (self.visible_families(store, ui_state, scope), store.individuals_by_guid.clone(),
                      self.samples_by_family(store), table_state.sort_name(),
                      table_state.sort_direction());

        self.scoped(scope).sorted
            .get_or_compute(inputs,
                            |(visible, individuals, samples_by_family, sort_name, direction)| {
                                let context = SortContext {
                                    individuals_by_guid: individuals,
                                    samples_by_family,
                                };
                                sort_families(visible, FamilySort::from_name(sort_name), *direction,
                                              &context)
                            })
    }

    pub fn export_data(&self, store: &EntityStore, ui_state: &UiState, scope: &ViewScope,
                       entity: ExportEntity)
        -> Arc<Vec<Value>>
    {
        let scoped = self.scoped(scope);
        let families = self.visible_families_in_sorted_order(store, ui_state, scope);

        match entity {
            ExportEntity::Families => {
                scoped.families_export
                    .get_or_compute((families, self.samples_by_family(store),
                                     self.notes_by_family_type(store)),
                                    |(families, samples_by_family, notes)| {
                                        families_export_data(families, samples_by_family, notes)
                                    })
            },
            ExportEntity::Individuals => {
                scoped.individuals_export
                    .get_or_compute((families, self.sorted_individuals_by_family(store),
                                     store.samples_by_guid.clone()),
                                    |(families, individuals_by_family, samples)| {
                                        individuals_export_data(families, individuals_by_family, samples)
                                    })
            },
            ExportEntity::Samples => {
                scoped.samples_export
                    .get_or_compute((families, store.individuals_by_guid.clone(),
                                     self.samples_by_family(store)),
                                    |(families, individuals, samples_by_family)| {
                                        samples_export_data(families, individuals, samples_by_family)
                                    })
            },
        }
    }

    // None if there is no current project
    pub fn project_export_tables(&self, store: &EntityStore, ui_state: &UiState, scope: &ViewScope)
        -> Option<Vec<ExportTable>>
    {
        let project = self.current_project(store, ui_state);

        opt(&project)
            .map(|project| project_export_tables(project, scope.table_name.as_deref(), &self.config))
    }

    pub fn analysis_status_counts(&self, store: &EntityStore, ui_state: &UiState, scope: &ViewScope)
        -> Arc<Vec<StatusCount>>
    {
        let families = self.analysis_group_families(store, ui_state, scope);
        self.scoped(scope).analysis_status_counts
            .get_or_compute(families,
                            |families| analysis_status_counts(families, &FAMILY_ANALYSIS_STATUS_OPTIONS))
    }

    pub fn tag_type_data(&self, store: &EntityStore, ui_state: &UiState, scope: &ViewScope)
        -> Arc<Vec<TagTypeWithCount>>
    {
        let inputs = (ui_state.current_project_guid.clone(), self.tag_types_by_project(store),
                      self.current_analysis_group(store, ui_state, scope),
                      store.family_tag_type_counts.clone());

        self.scoped(scope).tag_type_data
            .get_or_compute(inputs,
                            |(guid, tag_types, group, counts)| {
                                tag_type_data(guid.as_ref(), tag_types, opt(group), counts)
                            })
    }

    pub fn mme_submission_details(&self, store: &EntityStore, ui_state: &UiState, scope: &ViewScope)
        -> Arc<Vec<MmeSubmissionDetail>>
    {
        let inputs = (store.mme_submissions_by_guid.clone(),
                      self.analysis_group_families(store, ui_state, scope),
                      store.genes_by_id.clone(), self.notes_by_family_type(store));

        self.scoped(scope).mme_submission_details
            .get_or_compute(inputs,
                            |(submissions, families, genes, notes)| {
                                mme_submission_details(submissions, families, genes, notes)
                            })
    }

    pub fn page_header(&self, store: &EntityStore, ui_state: &UiState, route: &RouteMatch)
        -> PageHeader
    {
        let project = self.current_project(store, ui_state);
        let project_families = self.project_families(store, ui_state);
        let project_analysis_groups = self.project_analysis_groups(store, ui_state);

        let family = page_header_family(&project_families, route);
        let analysis_group = page_header_analysis_group(&project_analysis_groups, route);

        let scope = ViewScope::new(None, route.analysis_group_guid.as_deref());
        let group_families = self.analysis_group_families(store, ui_state, &scope);
        let has_searchable_sample = self.has_active_searchable_sample_by_family(store);

        PageHeader {
            breadcrumb_id_sections:
                page_header_breadcrumb_id_sections(opt(&project), family,
                                                   analysis_group, route),
            entity_links:
                page_header_entity_links(opt(&project), family, analysis_group, route,
                                         &group_families, &has_searchable_sample),
        }
    }
}

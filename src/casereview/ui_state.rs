use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use anyhow::{Context, Result};

use flexstr::SharedStr as FlexStr;

use crate::constants::{DEFAULT_TABLE_NAME, SHOW_ALL};
use crate::data_types::User;
use crate::types::*;
use crate::utils::to_camelcase;
use crate::web::search::FamilyFilter;
use crate::web::sort::{FamilySort, SortDirection};

// filter, search and sort settings of one family table
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TableState {
    pub families_filter: Option<FlexStr>,
    pub families_search: Option<String>,
    pub families_sort_order: Option<FlexStr>,
    pub families_sort_direction: Option<i8>,
}

impl TableState {
    // the filter name, SHOW_ALL if unset
    pub fn filter_name(&self) -> FlexStr {
        self.families_filter.clone()
            .filter(|filter| !filter.is_empty())
            .unwrap_or_else(|| SHOW_ALL.into())
    }

    pub fn filter(&self) -> Option<FamilyFilter> {
        FamilyFilter::from_name(&self.filter_name())
    }

    // the lowercased search string, None if there is no search
    pub fn search(&self) -> Option<String> {
        self.families_search.as_ref()
            .filter(|search| !search.is_empty())
            .map(|search| search.to_lowercase())
    }

    pub fn sort_name(&self) -> FlexStr {
        self.families_sort_order.clone()
            .filter(|sort| !sort.is_empty())
            .unwrap_or_else(|| FamilySort::default().name().into())
    }

    pub fn sort(&self) -> Option<FamilySort> {
        FamilySort::from_name(&self.sort_name())
    }

    pub fn sort_direction(&self) -> SortDirection {
        match self.families_sort_direction {
            Some(direction) if direction < 0 => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

// The UI state the derived views depend on.  Table states are keyed by the
// camelCased table name, "family" for the default table.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UiState {
    pub current_project_guid: Option<ProjectGuid>,
    pub user: Arc<User>,
    pub table_states: HashMap<String, TableState>,
}

pub fn table_state_key(table_name: Option<&str>) -> String {
    table_name
        .map(to_camelcase)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_TABLE_NAME.into())
}

impl UiState {
    pub fn read(ui_state_file_name: &str) -> Result<UiState> {
        let file = File::open(ui_state_file_name)
            .with_context(|| format!("failed to read {}", ui_state_file_name))?;
        let reader = BufReader::new(file);

        let ui_state = serde_json::from_reader(reader)
            .with_context(|| format!("failed to parse {}", ui_state_file_name))?;

        Ok(ui_state)
    }

    pub fn table_state(&self, table_name: Option<&str>) -> TableState {
        self.table_states.get(&table_state_key(table_name))
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_table_state(&mut self, table_name: Option<&str>, table_state: TableState) {
        self.table_states.insert(table_state_key(table_name), table_state);
    }
}

#[test]
fn test_table_state_defaults() {
    let ui_state = UiState::default();
    let table_state = ui_state.table_state(None);
    assert_eq!(table_state.filter_name().as_str(), SHOW_ALL);
    assert!(table_state.filter().is_none());
    assert!(table_state.search().is_none());
    assert_eq!(table_state.sort(), Some(FamilySort::FamilyName));
    assert_eq!(table_state.sort_direction(), SortDirection::Ascending);
}

#[test]
fn test_table_state_key() {
    assert_eq!(table_state_key(None), "family");
    assert_eq!(table_state_key(Some("")), "family");
    assert_eq!(table_state_key(Some("Case Review")), "caseReview");

    let mut ui_state = UiState::default();
    let table_state = TableState {
        families_search: Some("Epilepsy".into()),
        families_sort_direction: Some(-1),
        ..TableState::default()
    };
    ui_state.set_table_state(Some("Case Review"), table_state);
    let case_review_state = ui_state.table_state(Some("Case Review"));
    assert_eq!(case_review_state.search().as_deref(), Some("epilepsy"));
    assert_eq!(case_review_state.sort_direction(), SortDirection::Descending);
    assert!(ui_state.table_state(None).search().is_none());
}

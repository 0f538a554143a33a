use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::ProjectDirs;

use crate::domain::entities::page::{PaginationState, DEFAULT_PAGE_SIZE};
use crate::domain::entities::sorting::SortingState;

pub const DB_PATH_ENV: &str = "TABLE_QUERY_DB";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    pub table_id: String,
    pub page_size: u32,
    pub enable_persistence: bool,
    pub default_sorting: SortingState,
}

impl TableOptions {
    pub fn new(table_id: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
            page_size: DEFAULT_PAGE_SIZE,
            enable_persistence: true,
            default_sorting: Vec::new(),
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn persistence(mut self, enabled: bool) -> Self {
        self.enable_persistence = enabled;
        self
    }

    pub fn default_sorting(mut self, sorting: SortingState) -> Self {
        self.default_sorting = sorting;
        self
    }

    pub fn default_pagination(&self) -> PaginationState {
        PaginationState::with_page_size(self.page_size)
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "hellhbbd", "table-query")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_local_dir().join("table-state.sqlite"))
}

pub fn resolve_db_path() -> Result<PathBuf> {
    match std::env::var_os(DB_PATH_ENV) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => default_db_path(),
    }
}

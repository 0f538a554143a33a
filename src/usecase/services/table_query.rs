use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::TableOptions;
use crate::domain::entities::api_error::ApiError;
use crate::domain::entities::column::{ColumnDef, ColumnMetadataMap};
use crate::domain::entities::expression::FilterExpr;
use crate::domain::entities::filter::{
    normalize_filters, upsert_filter, ColumnFilter, ColumnFiltersState, FilterValue,
};
use crate::domain::entities::page::{PagedResult, PaginationMetadata, PaginationState};
use crate::domain::entities::sorting::{OrderBy, SortingState};
use crate::usecase::ports::fetch::{PageFetcher, QueryRequest};
use crate::usecase::ports::store::KeyValueStore;
use crate::usecase::services::filter_builder::build_filter_expression;
use crate::usecase::services::metadata::extract_column_metadata;
use crate::usecase::services::sort_builder::build_sort_expression;

pub type RowSelectionState = BTreeMap<String, bool>;

pub fn pagination_key(table_id: &str) -> String {
    format!("table-{table_id}-pagination")
}

pub fn sorting_key(table_id: &str) -> String {
    format!("table-{table_id}-sorting")
}

pub fn filters_key(table_id: &str) -> String {
    format!("table-{table_id}-filters")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Fetching,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
struct QueryKey {
    table_id: String,
    request: QueryRequest,
}

/// A fetch issued by [`TableQuery::start_fetch`]. Resolving it does not
/// borrow the table, so several can be in flight at once.
pub struct PendingFetch<T: Send> {
    generation: u64,
    request: QueryRequest,
    fetcher: Arc<dyn PageFetcher<T>>,
}

impl<T: Send> PendingFetch<T> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &QueryRequest {
        &self.request
    }

    pub async fn resolve(self) -> FetchOutcome<T> {
        let result = self.fetcher.fetch(self.request).await;
        FetchOutcome {
            generation: self.generation,
            result,
        }
    }
}

pub struct FetchOutcome<T> {
    pub generation: u64,
    pub result: Result<PagedResult<T>, ApiError>,
}

pub struct TableQuery<T: Send> {
    options: TableOptions,
    columns: Vec<ColumnDef>,
    metadata: ColumnMetadataMap,
    fetcher: Arc<dyn PageFetcher<T>>,
    store: Arc<dyn KeyValueStore>,

    pagination: PaginationState,
    sorting: SortingState,
    pending_filters: ColumnFiltersState,
    applied_filters: ColumnFiltersState,
    row_selection: RowSelectionState,

    filter_expression: Option<FilterExpr>,
    sort_expression: Option<Vec<OrderBy>>,

    status: QueryStatus,
    last_success: Option<PagedResult<T>>,
    error: Option<ApiError>,
    requested: Option<QueryKey>,
    generation: u64,
    in_flight: Option<u64>,
    torn_down: bool,
}

impl<T: Send> TableQuery<T> {
    pub fn new(
        options: TableOptions,
        columns: Vec<ColumnDef>,
        fetcher: Arc<dyn PageFetcher<T>>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let metadata = extract_column_metadata(&columns);
        let mut table = Self {
            pagination: options.default_pagination(),
            sorting: options.default_sorting.clone(),
            options,
            columns,
            metadata,
            fetcher,
            store,
            pending_filters: Vec::new(),
            applied_filters: Vec::new(),
            row_selection: RowSelectionState::new(),
            filter_expression: None,
            sort_expression: None,
            status: QueryStatus::Idle,
            last_success: None,
            error: None,
            requested: None,
            generation: 0,
            in_flight: None,
            torn_down: false,
        };
        table.restore();
        table
    }

    fn restore(&mut self) {
        let defaults = self.options.default_pagination();
        self.pagination = if self.options.enable_persistence {
            self.load::<PaginationState>(&pagination_key(&self.options.table_id))
                .filter(|pagination| pagination.page_size > 0)
                .unwrap_or(defaults)
        } else {
            defaults
        };

        self.sorting = if self.options.enable_persistence {
            self.load::<SortingState>(&sorting_key(&self.options.table_id))
                .unwrap_or_else(|| self.options.default_sorting.clone())
        } else {
            self.options.default_sorting.clone()
        };

        self.applied_filters = if self.options.enable_persistence {
            self.load::<Vec<ColumnFilter>>(&filters_key(&self.options.table_id))
                .map(normalize_filters)
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        self.pending_filters = self.applied_filters.clone();
        self.row_selection.clear();
        self.recompute();
    }

    fn load<V: DeserializeOwned>(&self, key: &str) -> Option<V> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!("failed to read persisted table state {key}: {err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("ignoring corrupted table state {key}: {err}");
                None
            }
        }
    }

    fn save<V: Serialize>(&self, key: &str, value: &V) {
        if !self.options.enable_persistence {
            return;
        }
        let result = serde_json::to_string(value)
            .map_err(|err| err.to_string())
            .and_then(|raw| self.store.set(key, &raw).map_err(|err| err.to_string()));
        if let Err(err) = result {
            warn!("failed to persist table state {key}: {err}");
        }
    }

    fn persist_pagination(&self) {
        self.save(&pagination_key(&self.options.table_id), &self.pagination);
    }

    fn persist_sorting(&self) {
        self.save(&sorting_key(&self.options.table_id), &self.sorting);
    }

    fn persist_filters(&self) {
        self.save(&filters_key(&self.options.table_id), &self.applied_filters);
    }

    fn recompute(&mut self) {
        self.filter_expression = build_filter_expression(&self.applied_filters, &self.metadata);
        self.sort_expression = build_sort_expression(&self.sorting, &self.metadata);
    }

    fn reset_page_index(&mut self) {
        self.pagination = self.pagination.first_page();
        self.persist_pagination();
    }

    pub fn table_id(&self) -> &str {
        &self.options.table_id
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column_metadata(&self) -> &ColumnMetadataMap {
        &self.metadata
    }

    pub fn set_columns(&mut self, columns: Vec<ColumnDef>) {
        self.metadata = extract_column_metadata(&columns);
        self.columns = columns;
        self.recompute();
    }

    /// Switches to another table id. Its persisted state is loaded and any
    /// fetch still in flight for the previous table is ignored.
    pub fn set_table_id(&mut self, table_id: impl Into<String>) {
        let table_id = table_id.into();
        if table_id == self.options.table_id {
            return;
        }
        debug!("switching table {} -> {table_id}", self.options.table_id);
        self.options.table_id = table_id;
        self.requested = None;
        self.in_flight = None;
        self.last_success = None;
        self.error = None;
        self.status = QueryStatus::Idle;
        self.restore();
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    pub fn set_pagination(&mut self, pagination: PaginationState) {
        self.pagination = pagination;
        self.persist_pagination();
    }

    pub fn sorting(&self) -> &SortingState {
        &self.sorting
    }

    pub fn set_sorting(&mut self, sorting: SortingState) {
        self.sorting = sorting;
        self.persist_sorting();
        self.recompute();
    }

    pub fn row_selection(&self) -> &RowSelectionState {
        &self.row_selection
    }

    pub fn set_row_selection(&mut self, selection: RowSelectionState) {
        self.row_selection = selection;
    }

    pub fn pending_filters(&self) -> &ColumnFiltersState {
        &self.pending_filters
    }

    pub fn applied_filters(&self) -> &ColumnFiltersState {
        &self.applied_filters
    }

    pub fn set_pending_filters(&mut self, filters: Vec<ColumnFilter>) {
        self.pending_filters = normalize_filters(filters);
    }

    pub fn set_pending_filter(&mut self, column_id: &str, value: Option<FilterValue>) {
        upsert_filter(&mut self.pending_filters, column_id, value);
    }

    pub fn set_applied_filters(&mut self, filters: Vec<ColumnFilter>) {
        self.applied_filters = normalize_filters(filters);
        self.persist_filters();
        self.reset_page_index();
        self.recompute();
    }

    pub fn apply_filters(&mut self) {
        self.applied_filters = self.pending_filters.clone();
        self.persist_filters();
        self.reset_page_index();
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.pending_filters.clear();
        self.applied_filters.clear();
        self.persist_filters();
        self.reset_page_index();
        self.recompute();
    }

    pub fn has_unapplied_filters(&self) -> bool {
        let pending = serde_json::to_string(&self.pending_filters).ok();
        let applied = serde_json::to_string(&self.applied_filters).ok();
        pending != applied
    }

    pub fn clear_persisted_state(&mut self) {
        if self.options.enable_persistence {
            let table_id = self.options.table_id.clone();
            for key in [
                pagination_key(&table_id),
                sorting_key(&table_id),
                filters_key(&table_id),
            ] {
                if let Err(err) = self.store.remove(&key) {
                    warn!("failed to remove persisted table state {key}: {err}");
                }
            }
        }
        self.pagination = self.options.default_pagination();
        self.sorting = self.options.default_sorting.clone();
        self.applied_filters.clear();
        self.pending_filters.clear();
        self.row_selection.clear();
        self.recompute();
    }

    pub fn filter_expression(&self) -> Option<&FilterExpr> {
        self.filter_expression.as_ref()
    }

    pub fn sort_expression(&self) -> Option<&[OrderBy]> {
        self.sort_expression.as_deref()
    }

    pub fn current_request(&self) -> QueryRequest {
        QueryRequest {
            pagination: self.pagination,
            order_by: self.sort_expression.clone(),
            filter: self.filter_expression.clone(),
        }
    }

    fn current_key(&self) -> QueryKey {
        QueryKey {
            table_id: self.options.table_id.clone(),
            request: self.current_request(),
        }
    }

    pub fn start_fetch(&mut self) -> Option<PendingFetch<T>> {
        if self.torn_down {
            return None;
        }
        let key = self.current_key();
        if self.requested.as_ref() == Some(&key) {
            return None;
        }

        self.generation += 1;
        debug!(
            "fetching table {} page {} (generation {})",
            key.table_id,
            key.request.pagination.page_index,
            self.generation
        );
        let request = key.request.clone();
        self.requested = Some(key);
        self.in_flight = Some(self.generation);
        self.status = QueryStatus::Fetching;

        Some(PendingFetch {
            generation: self.generation,
            request,
            fetcher: Arc::clone(&self.fetcher),
        })
    }

    /// Applies a fetch result if it answers the most recent request.
    /// Returns false when the outcome was stale and discarded.
    pub fn settle(&mut self, outcome: FetchOutcome<T>) -> bool {
        if self.torn_down || self.in_flight != Some(outcome.generation) {
            debug!(
                "discarding stale result for table {} (generation {})",
                self.options.table_id, outcome.generation
            );
            return false;
        }

        self.in_flight = None;
        match outcome.result {
            Ok(page) => {
                self.last_success = Some(page);
                self.error = None;
                self.status = QueryStatus::Success;
            }
            Err(err) => {
                warn!("fetch failed for table {}: {err}", self.options.table_id);
                self.error = Some(err);
                self.status = QueryStatus::Error;
            }
        }
        true
    }

    pub async fn refresh(&mut self) -> bool {
        let Some(pending) = self.start_fetch() else {
            return false;
        };
        let outcome = pending.resolve().await;
        self.settle(outcome)
    }

    pub fn invalidate(&mut self) {
        self.requested = None;
    }

    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.in_flight = None;
    }

    pub fn status(&self) -> QueryStatus {
        self.status
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_pending() && self.last_success.is_none()
    }

    pub fn is_placeholder_data(&self) -> bool {
        self.is_pending() && self.last_success.is_some()
    }

    pub fn table_data(&self) -> &[T] {
        self.last_success
            .as_ref()
            .map(|page| page.data.as_slice())
            .unwrap_or(&[])
    }

    pub fn pagination_metadata(&self) -> Option<&PaginationMetadata> {
        self.last_success.as_ref().map(|page| &page.pagination)
    }

    pub fn total_row_count(&self) -> u64 {
        self.pagination_metadata()
            .map(|meta| meta.total_count)
            .unwrap_or(0)
    }
}

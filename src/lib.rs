pub mod config;
pub mod domain;
pub mod infra;
pub mod usecase;


pub use config::TableOptions;
pub use domain::entities::api_error::ApiError;
pub use domain::entities::column::{
    AccessorKey, ColumnDef, ColumnMetadata, ColumnMetadataMap, FilterConfig,
};
pub use domain::entities::expression::{CompareOp, FilterExpr, Literal};
pub use domain::entities::filter::{ColumnFilter, ColumnFiltersState, FilterValue, RangeValue};
pub use domain::entities::page::{
    PageRequest, PagedResult, PaginationMetadata, PaginationState, DEFAULT_PAGE_SIZE,
};
pub use domain::entities::sorting::{ColumnSort, OrderBy, SortDirection, SortingState};
pub use infra::memory::store::MemoryStore;
pub use infra::sqlite::store::SqliteStore;
pub use usecase::ports::fetch::{fetcher_fn, PageFetcher, QueryRequest};
pub use usecase::ports::store::{KeyValueStore, StoreError};
pub use usecase::services::filter_builder::build_filter_expression;
pub use usecase::services::metadata::extract_column_metadata;
pub use usecase::services::sort_builder::build_sort_expression;
pub use usecase::services::table_query::{
    FetchOutcome, PendingFetch, QueryStatus, RowSelectionState, TableQuery,
};

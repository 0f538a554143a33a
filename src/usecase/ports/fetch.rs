use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::domain::entities::api_error::ApiError;
use crate::domain::entities::expression::FilterExpr;
use crate::domain::entities::page::{PagedResult, PaginationState};
use crate::domain::entities::sorting::OrderBy;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub pagination: PaginationState,
    pub order_by: Option<Vec<OrderBy>>,
    pub filter: Option<FilterExpr>,
}

#[async_trait]
pub trait PageFetcher<T: Send>: Send + Sync {
    async fn fetch(&self, request: QueryRequest) -> Result<PagedResult<T>, ApiError>;
}

pub struct FnFetcher<F, T> {
    f: F,
    _row: PhantomData<fn() -> T>,
}

pub fn fetcher_fn<F, Fut, T>(f: F) -> FnFetcher<F, T>
where
    F: Fn(QueryRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PagedResult<T>, ApiError>> + Send + 'static,
    T: Send,
{
    FnFetcher {
        f,
        _row: PhantomData,
    }
}

#[async_trait]
impl<F, Fut, T> PageFetcher<T> for FnFetcher<F, T>
where
    F: Fn(QueryRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PagedResult<T>, ApiError>> + Send + 'static,
    T: Send,
{
    async fn fetch(&self, request: QueryRequest) -> Result<PagedResult<T>, ApiError> {
        (self.f)(request).await
    }
}

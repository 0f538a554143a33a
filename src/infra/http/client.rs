use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::domain::entities::api_error::ApiError;
use crate::domain::entities::page::PagedResult;
use crate::infra::odata::endpoint::{build_endpoint, build_query_params, QueryParams};
use crate::infra::odata::query::ODataQuery;
use crate::usecase::ports::fetch::{PageFetcher, QueryRequest};

#[derive(Debug, Default, Deserialize)]
struct ProblemDetails {
    title: Option<String>,
    errors: Option<BTreeMap<String, Vec<String>>>,
    detail: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: if base_url.is_empty() {
                "/".to_string()
            } else {
                base_url
            },
            auth_token: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn set_auth_token(&mut self, token: Option<String>) {
        self.auth_token = token.filter(|token| !token.is_empty());
    }

    pub fn construct_url(&self, endpoint: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        format!("{base}/{endpoint}")
    }

    pub async fn get<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, ApiError> {
        let url = self.construct_url(endpoint);
        debug!("GET {url}");

        let mut request = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.auth_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|err| ApiError::network(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::network(err.to_string()))?;

        if !status.is_success() {
            return Err(api_error_from_body(status, &body));
        }

        let body = if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            "{}"
        } else {
            body.as_str()
        };
        serde_json::from_str(body)
            .map_err(|err| ApiError::network(format!("invalid response body: {err}")))
    }
}

pub fn api_error_from_body(status: StatusCode, body: &str) -> ApiError {
    let details: ProblemDetails = serde_json::from_str(body).unwrap_or_default();
    ApiError {
        title: details.title.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        }),
        status: status.as_u16(),
        errors: details.errors.map(transform_error_fields),
        detail: details.detail,
    }
}

/// Server validation errors are keyed by PascalCase property names; the
/// client works with camelCase.
pub fn transform_error_fields(
    errors: BTreeMap<String, Vec<String>>,
) -> BTreeMap<String, Vec<String>> {
    errors
        .into_iter()
        .map(|(key, messages)| {
            let mut chars = key.chars();
            let camel = match chars.next() {
                Some(first) => first.to_lowercase().chain(chars).collect(),
                None => String::new(),
            };
            (camel, messages)
        })
        .collect()
}

pub struct ODataFetcher<T> {
    client: Arc<HttpClient>,
    endpoint: String,
    params: QueryParams,
    _row: PhantomData<fn() -> T>,
}

impl<T> ODataFetcher<T> {
    pub fn new(client: Arc<HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            params: Vec::new(),
            _row: PhantomData,
        }
    }

    /// Plain query parameters sent alongside the OData options.
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    pub fn endpoint_for(&self, request: &QueryRequest) -> String {
        let mut query = ODataQuery::from_request(request).to_query_string();
        let extra = build_query_params(&self.params);
        if !extra.is_empty() {
            query.push(if query.is_empty() { '?' } else { '&' });
            query.push_str(&extra);
        }
        build_endpoint(&self.endpoint, "", Some(&query))
    }
}

#[async_trait]
impl<T> PageFetcher<T> for ODataFetcher<T>
where
    T: DeserializeOwned + Send,
{
    async fn fetch(&self, request: QueryRequest) -> Result<PagedResult<T>, ApiError> {
        let endpoint = self.endpoint_for(&request);
        self.client.get::<PagedResult<T>>(&endpoint).await
    }
}

use chrono::SecondsFormat;

use crate::domain::entities::expression::{FilterExpr, Literal};
use crate::domain::entities::page::PaginationState;
use crate::domain::entities::sorting::OrderBy;
use crate::usecase::ports::fetch::QueryRequest;

pub const UNPAGED_TOP: u64 = 10_000;

const LAMBDA_ALIAS: &str = "x";

/// Renders a filter expression in OData `$filter` syntax. `None` when the
/// expression constrains nothing.
pub fn render_filter(expr: &FilterExpr) -> Option<String> {
    render_scoped(expr, None)
}

fn render_scoped(expr: &FilterExpr, scope: Option<&str>) -> Option<String> {
    match expr {
        FilterExpr::Empty => None,
        FilterExpr::And(items) => render_group(items, "and", scope),
        FilterExpr::Or(items) => render_group(items, "or", scope),
        FilterExpr::Compare {
            property,
            op,
            value,
        } => Some(format!(
            "{} {} {}",
            scoped(property, scope),
            op.as_str(),
            render_literal(value)
        )),
        FilterExpr::Contains { property, value } => Some(format!(
            "contains(tolower({}), tolower({}))",
            scoped(property, scope),
            quote(value)
        )),
        FilterExpr::Any {
            collection,
            condition,
        } => {
            let inner = render_scoped(condition, Some(LAMBDA_ALIAS))?;
            Some(format!(
                "{}/any({LAMBDA_ALIAS}:{inner})",
                scoped(collection, scope)
            ))
        }
        FilterExpr::In { property, values } => {
            if values.is_empty() {
                return None;
            }
            let values = values
                .iter()
                .map(render_literal)
                .collect::<Vec<_>>()
                .join(",");
            Some(format!("{} in ({values})", scoped(property, scope)))
        }
    }
}

fn render_group(items: &[FilterExpr], joiner: &str, scope: Option<&str>) -> Option<String> {
    let mut rendered = items
        .iter()
        .filter_map(|item| render_scoped(item, scope))
        .collect::<Vec<_>>();

    match rendered.len() {
        0 => None,
        1 => rendered.pop(),
        _ => Some(
            rendered
                .iter()
                .map(|item| format!("({item})"))
                .collect::<Vec<_>>()
                .join(format!(" {joiner} ").as_str()),
        ),
    }
}

fn scoped(property: &str, scope: Option<&str>) -> String {
    match scope {
        Some(alias) => format!("{alias}/{property}"),
        None => property.to_string(),
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn render_literal(value: &Literal) -> String {
    match value {
        Literal::Text(text) => quote(text),
        Literal::Number(number) => format_number(*number),
        Literal::Bool(flag) => flag.to_string(),
        Literal::DateTime(at) => at.to_rfc3339_opts(SecondsFormat::Millis, true),
        Literal::Null => "null".to_string(),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

pub fn render_order_by(order: &[OrderBy]) -> Option<String> {
    if order.is_empty() {
        return None;
    }
    Some(
        order
            .iter()
            .map(|term| format!("{} {}", term.property, term.direction))
            .collect::<Vec<_>>()
            .join(","),
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ODataQuery {
    pub filter: Option<String>,
    pub order_by: Option<String>,
    pub top: Option<u64>,
    pub skip: Option<u64>,
}

impl ODataQuery {
    pub fn new(
        pagination: Option<PaginationState>,
        order_by: Option<&[OrderBy]>,
        filter: Option<&FilterExpr>,
    ) -> Self {
        Self {
            filter: filter.and_then(render_filter),
            order_by: order_by.and_then(render_order_by),
            top: Some(
                pagination
                    .map(|pagination| u64::from(pagination.page_size))
                    .filter(|size| *size > 0)
                    .unwrap_or(UNPAGED_TOP),
            ),
            skip: pagination.map(PaginationState::offset),
        }
    }

    pub fn from_request(request: &QueryRequest) -> Self {
        Self::new(
            Some(request.pagination),
            request.order_by.as_deref(),
            request.filter.as_ref(),
        )
    }

    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(order_by) = &self.order_by {
            parts.push(format!("$orderby={}", encode(order_by)));
        }
        if let Some(filter) = &self.filter {
            parts.push(format!("$filter={}", encode(filter)));
        }
        if let Some(top) = self.top {
            parts.push(format!("$top={top}"));
        }
        if let Some(skip) = self.skip {
            parts.push(format!("$skip={skip}"));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!("?{}", parts.join("&"))
        }
    }
}

// Query option values are percent-encoded, so spaces become `%20`.
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::domain::entities::column::{resolve_property_name, ColumnMetadata, ColumnMetadataMap};
use crate::domain::entities::expression::{CompareOp, FilterExpr, Literal};
use crate::domain::entities::filter::{ColumnFilter, FilterValue, ListItem, RangeValue};

pub fn build_filter_expression(
    filters: &[ColumnFilter],
    metadata: &ColumnMetadataMap,
) -> Option<FilterExpr> {
    if filters.is_empty() {
        return None;
    }

    let conditions = filters
        .iter()
        .map(|filter| build_condition(filter, metadata.get(&filter.id)))
        .collect();
    Some(FilterExpr::And(conditions))
}

fn build_condition(filter: &ColumnFilter, metadata: Option<&ColumnMetadata>) -> FilterExpr {
    let property = resolve_property_name(metadata, &filter.id);
    // Without metadata a plain string is treated as free text (best effort).
    let is_text_field = metadata
        .map(|metadata| metadata.is_text_field)
        .unwrap_or(matches!(filter.value, FilterValue::Text(_)));
    let is_date_range = metadata.is_some_and(|metadata| metadata.is_date_range);
    let is_number_range = metadata.is_some_and(|metadata| metadata.is_number_range);

    match &filter.value {
        FilterValue::Range(range) if is_date_range => date_range_condition(property, range),
        FilterValue::Range(range) if is_number_range => number_range_condition(property, range),
        FilterValue::Number(value) => FilterExpr::eq(property, *value),
        FilterValue::Text(value) if is_text_field => match metadata {
            Some(metadata) if metadata.is_collection => FilterExpr::Any {
                collection: property.to_string(),
                condition: Box::new(FilterExpr::contains(
                    metadata.collection_property.as_str(),
                    value.as_str(),
                )),
            },
            _ => FilterExpr::contains(property, value.as_str()),
        },
        FilterValue::Text(value) => FilterExpr::eq(property, value.as_str()),
        FilterValue::List(items) => list_condition(property, items, is_text_field),
        FilterValue::Bool(value) => FilterExpr::eq(property, *value),
        FilterValue::Range(_) | FilterValue::Other(_) => FilterExpr::Empty,
    }
}

fn list_condition(property: &str, items: &[ListItem], is_text_field: bool) -> FilterExpr {
    if items.is_empty() {
        return FilterExpr::Empty;
    }

    let texts: Option<Vec<&str>> = items
        .iter()
        .map(|item| match item {
            ListItem::Text(value) => Some(value.as_str()),
            ListItem::Number(_) | ListItem::Null => None,
        })
        .collect();

    match texts {
        Some(texts) if is_text_field => FilterExpr::Or(
            texts
                .into_iter()
                .map(|value| FilterExpr::contains(property, value))
                .collect(),
        ),
        _ => FilterExpr::In {
            property: property.to_string(),
            values: items
                .iter()
                .map(|item| match item {
                    ListItem::Text(value) => Literal::Text(value.clone()),
                    ListItem::Number(value) => Literal::Number(*value),
                    ListItem::Null => Literal::Null,
                })
                .collect(),
        },
    }
}

fn date_range_condition(property: &str, range: &RangeValue) -> FilterExpr {
    let from = range
        .from_bound()
        .and_then(parse_date_bound)
        .map(Literal::DateTime);
    let to = range
        .to_bound()
        .and_then(parse_date_bound)
        .map(Literal::DateTime);
    bounds_condition(property, from, to)
}

fn number_range_condition(property: &str, range: &RangeValue) -> FilterExpr {
    let from = range
        .from_bound()
        .and_then(parse_number_bound)
        .map(Literal::Number);
    let to = range
        .to_bound()
        .and_then(parse_number_bound)
        .map(Literal::Number);
    bounds_condition(property, from, to)
}

fn bounds_condition(property: &str, from: Option<Literal>, to: Option<Literal>) -> FilterExpr {
    let mut conditions: Vec<FilterExpr> = Vec::with_capacity(2);
    if let Some(from) = from {
        conditions.push(FilterExpr::compare(property, CompareOp::Ge, from));
    }
    if let Some(to) = to {
        conditions.push(FilterExpr::compare(property, CompareOp::Le, to));
    }

    match conditions.len() {
        0 => FilterExpr::Empty,
        1 => conditions.remove(0),
        _ => FilterExpr::And(conditions),
    }
}

/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` (read as UTC) and
/// plain `YYYY-MM-DD` dates (midnight UTC).
pub(crate) fn parse_date_bound(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

pub(crate) fn parse_number_bound(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    Text(String),
    Number(f64),
    Null,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RangeValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl RangeValue {
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        }
    }

    pub fn from_bound(&self) -> Option<&str> {
        non_blank(self.from.as_deref())
    }

    pub fn to_bound(&self) -> Option<&str> {
        non_blank(self.to.as_deref())
    }
}

fn non_blank(bound: Option<&str>) -> Option<&str> {
    bound.filter(|value| !value.trim().is_empty())
}

// Only JSON objects are ranges. Keys other than `from` and `to` are ignored,
// as are bounds that are neither strings nor numbers.
impl<'de> Deserialize<'de> for RangeValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RangeVisitor)
    }
}

struct RangeVisitor;

impl<'de> Visitor<'de> for RangeVisitor {
    type Value = RangeValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object with optional `from` and `to` bounds")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut range = RangeValue::default();
        while let Some(key) = map.next_key::<String>()? {
            let bound = bound_text(map.next_value::<serde_json::Value>()?);
            match key.as_str() {
                "from" => range.from = bound,
                "to" => range.to = bound,
                _ => {}
            }
        }
        Ok(range)
    }
}

fn bound_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(value) => Some(value),
        serde_json::Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

/// Value held by a column filter. Shapes that match nothing else are kept
/// verbatim in `Other` and never produce a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<ListItem>),
    Range(RangeValue),
    Other(serde_json::Value),
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        FilterValue::Text(value.into())
    }

    pub fn texts<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::List(
            values
                .into_iter()
                .map(|value| ListItem::Text(value.into()))
                .collect(),
        )
    }

    pub fn range(from: Option<&str>, to: Option<&str>) -> Self {
        FilterValue::Range(RangeValue::new(from, to))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Bool(_) | FilterValue::Number(_) => false,
            FilterValue::Text(value) => value.is_empty(),
            FilterValue::List(items) => items.is_empty(),
            FilterValue::Range(range) => range.from_bound().is_none() && range.to_bound().is_none(),
            FilterValue::Other(value) => value.is_null(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub id: String,
    pub value: FilterValue,
}

impl ColumnFilter {
    pub fn new(id: impl Into<String>, value: FilterValue) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

pub type ColumnFiltersState = Vec<ColumnFilter>;

/// Drops empty entries and collapses repeated column ids, keeping the
/// position of the first occurrence and the value of the last.
pub fn normalize_filters(filters: Vec<ColumnFilter>) -> ColumnFiltersState {
    let mut normalized: ColumnFiltersState = Vec::with_capacity(filters.len());
    for filter in filters {
        upsert_filter(&mut normalized, &filter.id, Some(filter.value));
    }
    normalized
}

pub fn upsert_filter(filters: &mut ColumnFiltersState, id: &str, value: Option<FilterValue>) {
    let position = filters.iter().position(|filter| filter.id == id);
    match (value.filter(|value| !value.is_empty()), position) {
        (Some(value), Some(index)) => filters[index].value = value,
        (Some(value), None) => filters.push(ColumnFilter::new(id, value)),
        (None, Some(index)) => {
            filters.remove(index);
        }
        (None, None) => {}
    }
}

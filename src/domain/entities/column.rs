use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_COLLECTION_PROPERTY: &str = "name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccessorKey {
    Name(String),
    Index(u64),
}

impl fmt::Display for AccessorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessorKey::Name(name) => f.write_str(name),
            AccessorKey::Index(index) => write!(f, "{index}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessor_key: Option<AccessorKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessor_key: Option<AccessorKey>,
    #[serde(default, rename = "columnDef", skip_serializing_if = "Option::is_none")]
    pub definition: Option<ColumnDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_config: Option<FilterConfig>,
}

impl ColumnDef {
    pub fn accessor(key: impl Into<String>) -> Self {
        Self {
            accessor_key: Some(AccessorKey::Name(key.into())),
            ..Self::default()
        }
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn filter(mut self, config: FilterConfig) -> Self {
        self.filter_config = Some(config);
        self
    }

    /// Resolves the column id the way the table does: explicit id, then the
    /// definition id, then the definition accessor key, then the accessor key.
    pub fn resolved_id(&self) -> Option<String> {
        if let Some(id) = &self.id {
            return Some(id.clone());
        }
        if let Some(definition) = &self.definition {
            if let Some(id) = &definition.id {
                return Some(id.clone());
            }
            if let Some(key) = &definition.accessor_key {
                return Some(key.to_string());
            }
        }
        self.accessor_key.as_ref().map(ToString::to_string)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterBase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_property_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFilter {
    #[serde(flatten)]
    pub base: FilterBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_case: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_collection: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_property: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: OptionValue,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectFilter {
    #[serde(flatten)]
    pub base: FilterBase,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrueFalseFilter {
    #[serde(flatten)]
    pub base: FilterBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub false_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_indeterminate: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeFilter {
    #[serde(flatten)]
    pub base: FilterBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberRangeFilter {
    #[serde(flatten)]
    pub base: FilterBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "camelCase")]
pub enum FilterConfig {
    Text(TextFilter),
    Select(SelectFilter),
    TrueFalse(TrueFalseFilter),
    DateRange(DateRangeFilter),
    NumberRange(NumberRangeFilter),
}

impl FilterConfig {
    pub fn text() -> Self {
        FilterConfig::Text(TextFilter::default())
    }

    pub fn collection_text(collection_property: impl Into<String>) -> Self {
        FilterConfig::Text(TextFilter {
            is_collection: Some(true),
            collection_property: Some(collection_property.into()),
            ..TextFilter::default()
        })
    }

    pub fn select(options: Vec<SelectOption>) -> Self {
        FilterConfig::Select(SelectFilter {
            options,
            ..SelectFilter::default()
        })
    }

    pub fn true_false() -> Self {
        FilterConfig::TrueFalse(TrueFalseFilter::default())
    }

    pub fn date_range() -> Self {
        FilterConfig::DateRange(DateRangeFilter::default())
    }

    pub fn number_range() -> Self {
        FilterConfig::NumberRange(NumberRangeFilter::default())
    }

    pub fn base(&self) -> &FilterBase {
        match self {
            FilterConfig::Text(config) => &config.base,
            FilterConfig::Select(config) => &config.base,
            FilterConfig::TrueFalse(config) => &config.base,
            FilterConfig::DateRange(config) => &config.base,
            FilterConfig::NumberRange(config) => &config.base,
        }
    }

    fn base_mut(&mut self) -> &mut FilterBase {
        match self {
            FilterConfig::Text(config) => &mut config.base,
            FilterConfig::Select(config) => &mut config.base,
            FilterConfig::TrueFalse(config) => &mut config.base,
            FilterConfig::DateRange(config) => &mut config.base,
            FilterConfig::NumberRange(config) => &mut config.base,
        }
    }

    pub fn alternative_property(mut self, name: impl Into<String>) -> Self {
        self.base_mut().alternative_property_name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub alternative_property_name: Option<String>,
    pub is_text_field: bool,
    pub is_collection: bool,
    pub collection_property: String,
    pub is_date_range: bool,
    pub is_number_range: bool,
}

impl Default for ColumnMetadata {
    fn default() -> Self {
        Self {
            alternative_property_name: None,
            is_text_field: false,
            is_collection: false,
            collection_property: DEFAULT_COLLECTION_PROPERTY.to_string(),
            is_date_range: false,
            is_number_range: false,
        }
    }
}

impl ColumnMetadata {
    pub fn text() -> Self {
        Self {
            is_text_field: true,
            ..Self::default()
        }
    }

    pub fn property_name<'a>(&'a self, column_id: &'a str) -> &'a str {
        self.alternative_property_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(column_id)
    }
}

pub type ColumnMetadataMap = BTreeMap<String, ColumnMetadata>;

pub fn resolve_property_name<'a>(
    metadata: Option<&'a ColumnMetadata>,
    column_id: &'a str,
) -> &'a str {
    match metadata {
        Some(metadata) => metadata.property_name(column_id),
        None => column_id,
    }
}

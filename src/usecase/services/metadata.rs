use crate::domain::entities::column::{
    ColumnDef, ColumnMetadata, ColumnMetadataMap, FilterConfig, DEFAULT_COLLECTION_PROPERTY,
};

pub fn extract_column_metadata(columns: &[ColumnDef]) -> ColumnMetadataMap {
    columns
        .iter()
        .filter_map(|column| {
            let config = column.filter_config.as_ref()?;
            let id = column.resolved_id()?;
            Some((id, metadata_for(config)))
        })
        .collect()
}

fn metadata_for(config: &FilterConfig) -> ColumnMetadata {
    let (is_collection, collection_property) = match config {
        FilterConfig::Text(text) => (
            text.is_collection.unwrap_or(false),
            text.collection_property
                .as_deref()
                .filter(|property| !property.is_empty()),
        ),
        _ => (false, None),
    };

    ColumnMetadata {
        alternative_property_name: config.base().alternative_property_name.clone(),
        is_text_field: matches!(config, FilterConfig::Text(_)),
        is_collection,
        collection_property: collection_property
            .unwrap_or(DEFAULT_COLLECTION_PROPERTY)
            .to_string(),
        is_date_range: matches!(config, FilterConfig::DateRange(_)),
        is_number_range: matches!(config, FilterConfig::NumberRange(_)),
    }
}
